//! Argument resolution
//!
//! Graphic arguments are `0x....` or a configured use name, colours are
//! always `0x....`, objects are `0x........` or an alias configured for
//! the character.

use crate::engine::Engine;
use uoinject_config::parse_number;
use uoinject_core::{InjectError, Serial};

/// Why a command argument could not be resolved
///
/// The messages are shown to the user as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid graphic index")]
    InvalidGraphic,

    #[error("Graphic name unknown")]
    UnknownGraphic,

    #[error("Invalid color index")]
    InvalidColour,

    #[error("Invalid serial index")]
    InvalidSerial,

    #[error("Object name unknown")]
    UnknownObject,
}

impl LookupError {
    /// Negative result code of the counting queries
    pub fn code(&self) -> i32 {
        match self {
            LookupError::UnknownGraphic | LookupError::UnknownObject => -1,
            LookupError::InvalidGraphic | LookupError::InvalidSerial => -2,
            LookupError::InvalidColour => -4,
        }
    }
}

impl From<LookupError> for InjectError {
    fn from(err: LookupError) -> Self {
        InjectError::NotFound(err.to_string())
    }
}

/// Value of a `0x` argument, `None` when the argument is not hex-prefixed
fn hex_argument(text: &str) -> Option<Option<u32>> {
    if text.len() > 2 && text.starts_with("0x") {
        Some(parse_number(text))
    } else {
        None
    }
}

/// Parse a colour argument
pub fn parse_colour(text: &str) -> Result<u16, LookupError> {
    match hex_argument(text) {
        Some(Some(value)) => u16::try_from(value).map_err(|_| LookupError::InvalidColour),
        _ => Err(LookupError::InvalidColour),
    }
}

impl Engine {
    /// Resolve a graphic argument
    pub fn resolve_graphic(&self, text: &str) -> Result<u16, LookupError> {
        match hex_argument(text) {
            Some(Some(value)) => u16::try_from(value).map_err(|_| LookupError::InvalidGraphic),
            Some(None) => Err(LookupError::InvalidGraphic),
            None => self.config.find_use(text).ok_or(LookupError::UnknownGraphic),
        }
    }

    /// Resolve an object argument
    pub fn resolve_object(&self, text: &str) -> Result<Serial, LookupError> {
        match hex_argument(text) {
            Some(Some(value)) => Ok(Serial(value)),
            Some(None) => Err(LookupError::InvalidSerial),
            None => self
                .character()
                .and_then(|character| self.config.find_object(character, text))
                .ok_or(LookupError::UnknownObject),
        }
    }

    /// Resolve an optional colour argument
    pub(crate) fn resolve_colour(text: Option<&String>) -> Result<Option<u16>, LookupError> {
        text.map(|text| parse_colour(text)).transpose()
    }

    /// Print a lookup failure to the user
    pub(crate) fn report<T>(&mut self, result: Result<T, LookupError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.client_print(&err.to_string());
                None
            }
        }
    }
}
