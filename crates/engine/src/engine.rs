//! # Engine
//!
//! The object the interception layer talks to. It owns the collaborators,
//! the login bookkeeping that survives reconnects and the current
//! [`Session`].

use crate::collaborators::{CommandExtension, Interceptor, Presentation};
use crate::dispatcher::DispatchStats;
use crate::session::Session;
use bytes::BytesMut;
use std::sync::Arc;
use uoinject_config::ConfigManager;
use uoinject_core::{CharacterKey, EncryptionMode, Layer, Serial};
use uoinject_protocol::{
    build_move_to_container, build_move_to_layer, build_system_text, CharacterListPacket, ServerListPacket,
};

/// Name and version reported by the `version` command
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PRODUCT_NAME: &str = "uoinject";

/// Tiles within which "on the ground" queries look
pub const USE_DISTANCE: u16 = 2;

/// What the login sequence has told us so far
///
/// Kept across disconnects: the relay to the game server drops the
/// connection between choosing a shard and logging in to it.
#[derive(Debug, Default)]
pub(crate) struct LoginState {
    pub(crate) servers: Option<ServerListPacket>,
    pub(crate) server_id: Option<u16>,
    /// Shard name after the relay
    pub(crate) server: Option<String>,
    pub(crate) account: Option<String>,
    pub(crate) characters: Option<CharacterListPacket>,
}

/// The protocol engine
pub struct Engine {
    pub(crate) config: Arc<ConfigManager>,
    interceptor: Box<dyn Interceptor>,
    pub(crate) presentation: Box<dyn Presentation>,
    extension: Option<Box<dyn CommandExtension>>,
    /// Whether an interception connection exists to send through
    pub(crate) attached: bool,
    pub(crate) login: LoginState,
    pub(crate) session: Option<Session>,
    pub(crate) stats: DispatchStats,
    /// Colour forced onto the next dye tub use
    pub(crate) dye_colour: Option<u16>,
    /// Light level the server last asked for
    pub(crate) normal_light: u8,
}

impl Engine {
    /// Create an engine
    ///
    /// # Arguments
    /// * `config` - Settings store shared with the presentation layer
    /// * `interceptor` - Where synthesized messages go
    /// * `presentation` - Receives status updates
    pub fn new(
        config: Arc<ConfigManager>,
        interceptor: Box<dyn Interceptor>,
        presentation: Box<dyn Presentation>,
    ) -> Self {
        Self {
            config,
            interceptor,
            presentation,
            extension: None,
            attached: false,
            login: LoginState::default(),
            session: None,
            stats: DispatchStats::default(),
            dye_colour: None,
            normal_light: 0,
        }
    }

    /// Install the hook for unknown commands
    pub fn set_command_extension(&mut self, extension: Box<dyn CommandExtension>) {
        self.extension = Some(extension);
    }

    pub fn config(&self) -> &Arc<ConfigManager> {
        &self.config
    }

    /// The current session, `None` outside the game world
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Shard the client was relayed to
    pub fn server_name(&self) -> Option<&str> {
        self.login.server.as_deref()
    }

    pub fn account_name(&self) -> Option<&str> {
        self.login.account.as_deref()
    }

    pub(crate) fn character(&self) -> Option<&CharacterKey> {
        self.session.as_ref().and_then(|session| session.character.as_ref())
    }

    /// The connection went away
    ///
    /// Discards the session with its world and every pending interaction.
    /// Login bookkeeping other than the character list is kept for the
    /// reconnect to the game server.
    pub fn disconnected(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("Disconnected, session discarded");
            self.presentation.disconnected();
        } else {
            tracing::info!("Disconnected");
        }
        self.login.characters = None;
        self.attached = false;
    }

    /// Adjust the client's encryption key before login
    ///
    /// SphereClient marks an unencrypted client with an all-zero key.
    pub fn on_login_key(&mut self, key: &mut [u8; 4]) {
        if self.config.encryption_mode() == Some(EncryptionMode::SphereClient) {
            *key = [0; 4];
        }
    }

    /// Inject a message towards the server
    ///
    /// Dropped while no connection is attached.
    pub fn send_server(&mut self, buf: &[u8]) {
        if !self.attached {
            tracing::debug!("No connection, dropping {} bytes for the server", buf.len());
            return;
        }
        tracing::trace!("Injected to server: {:02x?}", buf);
        self.interceptor.send_server(buf);
    }

    /// Inject a message towards the client
    pub fn send_client(&mut self, buf: &[u8]) {
        if !self.attached {
            tracing::debug!("No connection, dropping {} bytes for the client", buf.len());
            return;
        }
        tracing::trace!("Injected to client: {:02x?}", buf);
        self.interceptor.send_client(buf);
    }

    pub(crate) fn interceptor_mut(&mut self) -> &mut dyn Interceptor {
        self.interceptor.as_mut()
    }

    /// Show text to the user as a system message
    pub fn client_print(&mut self, text: &str) {
        tracing::debug!("client_print: {}", text);
        let mut buf = BytesMut::new();
        build_system_text(&mut buf, text);
        self.send_client(&buf);
    }

    /// Pick up `quantity` of an item and drop it into a container
    pub fn move_container(&mut self, serial: Serial, quantity: u16, container: Serial) {
        let mut buf = BytesMut::new();
        build_move_to_container(&mut buf, serial, quantity, container);
        self.send_server(&buf);
    }

    /// Move one item into the player's backpack
    pub(crate) fn move_backpack(&mut self, serial: Serial) {
        if let Some(player) = self.session.as_ref().map(Session::player) {
            self.move_container(serial, 1, player);
        }
    }

    /// Equip an item on the player
    pub(crate) fn move_equip(&mut self, serial: Serial, layer: Layer) {
        if let Some(player) = self.session.as_ref().map(Session::player) {
            let mut buf = BytesMut::new();
            build_move_to_layer(&mut buf, serial, layer, player);
            self.send_server(&buf);
        }
    }

    /// Pass an unknown command to the extension hook
    ///
    /// # Returns
    /// `true` if the hook recognised it
    pub(crate) fn run_extension(&mut self, text: &str) -> bool {
        match self.extension.as_mut() {
            Some(extension) => extension.handle_command(text),
            None => false,
        }
    }

    /// Run the command bound to a hotkey
    ///
    /// # Returns
    /// `false` if the key is not bound
    pub fn run_hotkey(&mut self, key: &str) -> bool {
        let command = self.session.as_ref().and_then(|session| session.hotkeys.get(key).cloned());
        match command {
            Some(command) => {
                tracing::debug!("Hotkey {} runs '{}'", key, command);
                self.run_command(&command);
                true
            }
            None => false,
        }
    }

    /// Push the player's vitals to the presentation layer
    pub(crate) fn update_display(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.presentation.update_display(&session.vitals);
        }
    }
}
