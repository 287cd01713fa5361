//! Player status figures

use serde::Serialize;

/// The player's vitals as last reported by the server
///
/// The presentation layer receives a reference to this after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Vitals {
    pub hits: u16,
    pub max_hits: u16,
    pub mana: u16,
    pub max_mana: u16,
    pub stamina: u16,
    pub max_stamina: u16,
    pub armor: u16,
    pub weight: u16,
    pub gold: u32,
}

impl Vitals {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}
