//! Light, weather, dye tubs and connection upkeep

use crate::engine::Engine;
use bytes::BytesMut;
use uoinject_config::ServerFlag;
use uoinject_core::Serial;
use uoinject_protocol::{
    build_single_click, byte_at, pack_big_u16, unpack_big_u16, unpack_big_u32, ERROR_IDLE_WARNING,
};

/// Offset of the colour in Dye Data
const DYE_COLOUR: usize = 7;

impl Engine {
    /// Global Light Level (0x4F)
    ///
    /// Remembered so `light` without an argument can restore it, and
    /// suppressed while the character has a fixed light level.
    pub(crate) fn handle_global_light_level(&mut self, buf: &mut [u8]) -> bool {
        self.normal_light = byte_at(buf, 1);
        match self.character() {
            Some(character) => self.config.light(character).is_none(),
            None => true,
        }
    }

    /// Error Code (0x53)
    ///
    /// The idle warning is answered with a harmless click and hidden.
    pub(crate) fn handle_error_code(&mut self, buf: &mut [u8]) -> bool {
        if byte_at(buf, 1) != ERROR_IDLE_WARNING {
            return true;
        }
        tracing::debug!("Idle warning, keeping the connection alive");
        let mut out = BytesMut::new();
        build_single_click(&mut out, Serial::NONE);
        self.send_server(&out);
        false
    }

    /// Set Weather (0x65)
    pub(crate) fn handle_weather_change(&mut self, _buf: &mut [u8]) -> bool {
        !self.server_flag(ServerFlag::FilterWeather)
    }

    /// Dye Data (0x95) from the client: the user picked a colour
    pub(crate) fn handle_dye_s(&mut self, buf: &mut [u8]) -> bool {
        if let Some(colour) = self.dye_colour.take() {
            self.client_print("Dye colour overridden.");
            pack_big_u16(buf, DYE_COLOUR, colour);
        }
        true
    }

    /// Dye Data (0x95) from the server: it asks for a colour
    ///
    /// With a colour set by `dye` the request is answered directly and
    /// the client never shows the colour picker.
    pub(crate) fn handle_dye_r(&mut self, buf: &mut [u8]) -> bool {
        let Some(colour) = self.dye_colour.take() else {
            return true;
        };
        self.client_print("Dye colour overridden.");
        let graphic = unpack_big_u16(buf, DYE_COLOUR);
        pack_big_u16(buf, 5, graphic);
        pack_big_u16(buf, DYE_COLOUR, colour);
        self.send_server(buf);
        false
    }

    /// Pause Control (0x33)
    pub(crate) fn handle_pause_control(&mut self, buf: &mut [u8]) -> bool {
        tracing::trace!("Pause control {}", byte_at(buf, 1));
        true
    }

    /// Get Player Status (0x34)
    pub(crate) fn handle_status_request(&mut self, buf: &mut [u8]) -> bool {
        tracing::trace!("Status request type {} for {:08x}", byte_at(buf, 5), unpack_big_u32(buf, 6));
        true
    }
}
