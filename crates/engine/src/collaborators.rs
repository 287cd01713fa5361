//! # Collaborator Interfaces
//!
//! The engine never touches sockets, windows or files itself. Everything
//! outside the message stream is reached through these traits.

use uoinject_core::{CharacterKey, EncryptionMode};
use uoinject_world::Vitals;

/// The layer sitting between client and server
///
/// # Purpose
/// Carries synthesized messages to either side and applies the stream
/// transformations decided during login.
pub trait Interceptor {
    /// Inject a complete message towards the server
    fn send_server(&mut self, buf: &[u8]);

    /// Inject a complete message towards the client
    fn send_client(&mut self, buf: &[u8]);

    /// Switch server-to-client compression on or off
    fn set_compressed(&mut self, _compressed: bool) {}

    /// Install the login-phase key pair
    fn set_login_encryption(&mut self, _key1: u32, _key2: u32) {}

    /// Switch to game-phase encryption
    fn set_game_encryption(&mut self, _mode: EncryptionMode) {}
}

/// Whatever shows the user their status
pub trait Presentation {
    /// The player's vitals changed
    fn update_display(&mut self, _vitals: &Vitals) {}

    /// A character entered the world; `None` when the account is unknown
    fn connected(&mut self, _character: Option<&CharacterKey>) {}

    fn disconnected(&mut self) {}
}

/// Presentation that shows nothing
impl Presentation for () {}

/// Hook for commands the engine does not know
pub trait CommandExtension {
    /// Try to run `text`
    ///
    /// # Returns
    /// `true` if the command was recognised
    fn handle_command(&mut self, text: &str) -> bool;
}
