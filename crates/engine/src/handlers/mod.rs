//! # Message Handlers
//!
//! One method on [`Engine`] per handled opcode and direction, referenced
//! from the registry. Each receives the whole message and returns whether
//! the original bytes are forwarded.
//!
//! ## Modules
//!
//! - `login` - Shard and character selection, encryption and compression switches
//! - `objects` - World model updates: items, mobiles, containers, equipment, vitals
//! - `talk` - Speech from the client, command prefix and talk fixes
//! - `environment` - Light, weather, dye tubs and the idle warning
//!
//! Targeting, menu and vendor messages are handled next to their state
//! machines.

mod environment;
mod login;
mod objects;
mod talk;

use crate::engine::Engine;
use uoinject_config::ServerFlag;

impl Engine {
    /// Per-server protocol fix for the shard the client was relayed to
    pub(crate) fn server_flag(&self, flag: ServerFlag) -> bool {
        self.login
            .server
            .as_deref()
            .map_or(false, |server| self.config.server_flag(server, flag))
    }
}
