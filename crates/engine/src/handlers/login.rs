//! Login sequence handlers
//!
//! ```text
//! client: First Login (0x80) -> Select Server (0xA0)
//! server: Server List (0xA8) -> Relay Server (0x8C)
//! client: Second Login (0x91) -> Select Character (0x5D)
//! server: Character List (0xA9)
//! ```
//!
//! The relay drops the connection, so what is learnt here lives in
//! [`LoginState`](crate::engine::LoginState) rather than in the session.

use crate::engine::Engine;
use uoinject_config::valid_key;
use uoinject_core::EncryptionMode;
use uoinject_protocol::{read_fixed_str, unpack_big_u16, CharacterListPacket, ServerListPacket};

/// Offset of the slot index in Select Character
const SELECT_CHARACTER_SLOT: usize = 68;

impl Engine {
    fn configured_encryption(&self) -> EncryptionMode {
        match self.config.encryption_mode() {
            Some(mode) => mode,
            None => panic!("Invalid encryption config: mode {}", self.config.encryption()),
        }
    }

    /// First Login (0x80)
    pub(crate) fn handle_first_login(&mut self, _buf: &mut [u8]) -> bool {
        let mode = self.configured_encryption();
        tracing::info!("Login, encryption {}", mode.as_str());

        let interceptor = self.interceptor_mut();
        interceptor.set_compressed(false);
        if let Some((key1, key2)) = mode.login_keys() {
            interceptor.set_login_encryption(key1, key2);
        }
        true
    }

    /// Second Login (0x91): the client logs in to the game server
    pub(crate) fn handle_second_login(&mut self, buf: &mut [u8]) -> bool {
        let mode = self.configured_encryption();
        let interceptor = self.interceptor_mut();
        interceptor.set_compressed(true);
        if mode.login_keys().is_some() {
            interceptor.set_game_encryption(mode);
        }

        let account = read_fixed_str(buf, 5, 30);
        if self.login.server.is_none() {
            tracing::error!("Logging in to unknown server");
            return true;
        }
        if !valid_key(&account) {
            tracing::warn!("Account name '{}' cannot be used as a settings key", account);
        }
        tracing::info!("Game login as {}", account);
        self.login.account = Some(account);
        true
    }

    /// Server List (0xA8)
    pub(crate) fn handle_server_list(&mut self, buf: &mut [u8]) -> bool {
        let list = match ServerListPacket::parse(buf) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!("Bad server list: {}", err);
                return true;
            }
        };
        if list.servers.is_empty() {
            tracing::warn!("Empty server list, keeping the previous one");
            return true;
        }
        if list.expected_len != buf.len() {
            tracing::warn!("Server list is {} bytes, expected {}", buf.len(), list.expected_len);
        }
        tracing::debug!("Server list: {:?}", list.servers);
        self.login.servers = Some(list);
        true
    }

    /// Select Server (0xA0)
    pub(crate) fn handle_select_server(&mut self, buf: &mut [u8]) -> bool {
        if self.login.servers.is_none() {
            tracing::error!("Server selected without a server list");
            self.login.server_id = None;
            return true;
        }
        let id = unpack_big_u16(buf, 1);
        tracing::debug!("Selected server {}", id);
        self.login.server_id = Some(id);
        true
    }

    /// Relay Server (0x8C): resolves the shard name used for settings
    pub(crate) fn handle_relay_server(&mut self, _buf: &mut [u8]) -> bool {
        self.login.server = None;
        let Some(id) = self.login.server_id else {
            tracing::error!("Relay without a selected server");
            return true;
        };
        let name = self
            .login
            .servers
            .as_ref()
            .and_then(|list| list.find(id))
            .map(|entry| entry.name.clone());
        let Some(name) = name else {
            tracing::warn!("Selected server {} is not in the server list", id);
            return true;
        };
        if !valid_key(&name) {
            tracing::warn!("Server name '{}' cannot be used as a settings key", name);
        }
        tracing::info!("Relayed to server {}", name);
        self.login.server = Some(name);
        true
    }

    /// Character List (0xA9)
    pub(crate) fn handle_character_list(&mut self, buf: &mut [u8]) -> bool {
        self.store_character_list(buf);
        true
    }

    /// Character List 2 (0x86), sent after deleting a character
    pub(crate) fn handle_character_list2(&mut self, buf: &mut [u8]) -> bool {
        self.store_character_list(buf);
        true
    }

    fn store_character_list(&mut self, buf: &[u8]) {
        self.login.characters = match CharacterListPacket::parse(buf) {
            Ok(list) if !list.names.is_empty() => {
                tracing::debug!("Characters: {:?}", list.names);
                Some(list)
            }
            Ok(_) => {
                tracing::warn!("Character list is empty");
                None
            }
            Err(err) => {
                tracing::warn!("Bad character list: {}", err);
                None
            }
        };
    }

    /// Select Character (0x5D): cross-checked against the roster
    pub(crate) fn handle_select_character(&mut self, buf: &mut [u8]) -> bool {
        let Some(list) = self.login.characters.as_ref() else {
            tracing::error!("Character selected without a character list");
            return true;
        };
        let slot = buf.get(SELECT_CHARACTER_SLOT).copied().unwrap_or(0) as usize;
        let name = read_fixed_str(buf, 5, 30);
        match list.names.get(slot) {
            None => tracing::warn!("Selected character slot {} out of range", slot),
            Some(listed) if *listed != name => {
                tracing::warn!("Selected character '{}' but slot {} holds '{}'", name, slot, listed)
            }
            Some(_) => tracing::info!("Playing {}", name),
        }
        true
    }
}
