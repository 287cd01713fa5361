//! Recording collaborators
//!
//! Stand-ins for the interception and presentation layers that remember
//! what the engine asked of them. Used by the test suites and by the
//! replay tool.

use crate::collaborators::{Interceptor, Presentation};
use parking_lot::Mutex;
use std::sync::Arc;
use uoinject_core::{CharacterKey, EncryptionMode};
use uoinject_protocol::{read_cstr, MessageCode};
use uoinject_world::Vitals;

/// Offset of the text in a system message built by the engine
const SYSTEM_TEXT_OFFSET: usize = 44;

/// Everything a [`RecordingInterceptor`] has seen
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub to_server: Vec<Vec<u8>>,
    pub to_client: Vec<Vec<u8>>,
    pub compressed: Option<bool>,
    pub login_keys: Option<(u32, u32)>,
    pub game_encryption: Option<EncryptionMode>,
}

impl Recorded {
    /// Texts of the system messages sent to the client, in order
    pub fn printed(&self) -> Vec<String> {
        self.to_client
            .iter()
            .filter(|msg| msg.len() > SYSTEM_TEXT_OFFSET && msg[0] == MessageCode::ServerTalk.as_u8())
            .map(|msg| read_cstr(msg, SYSTEM_TEXT_OFFSET))
            .collect()
    }

    /// Messages sent to the server with the given opcode
    pub fn server_messages(&self, opcode: u8) -> Vec<&[u8]> {
        self.to_server
            .iter()
            .filter(|msg| msg.first() == Some(&opcode))
            .map(Vec::as_slice)
            .collect()
    }

    /// Messages sent to the client with the given opcode
    pub fn client_messages(&self, opcode: u8) -> Vec<&[u8]> {
        self.to_client
            .iter()
            .filter(|msg| msg.first() == Some(&opcode))
            .map(Vec::as_slice)
            .collect()
    }
}

/// Interceptor that records instead of sending
///
/// Clones share one record, so a test keeps a handle while the engine owns
/// the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingInterceptor {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingInterceptor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn recorded(&self) -> Recorded {
        self.inner.lock().clone()
    }

    pub fn printed(&self) -> Vec<String> {
        self.inner.lock().printed()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.to_server.clear();
        inner.to_client.clear();
    }
}

impl Interceptor for RecordingInterceptor {
    fn send_server(&mut self, buf: &[u8]) {
        self.inner.lock().to_server.push(buf.to_vec());
    }

    fn send_client(&mut self, buf: &[u8]) {
        self.inner.lock().to_client.push(buf.to_vec());
    }

    fn set_compressed(&mut self, compressed: bool) {
        self.inner.lock().compressed = Some(compressed);
    }

    fn set_login_encryption(&mut self, key1: u32, key2: u32) {
        self.inner.lock().login_keys = Some((key1, key2));
    }

    fn set_game_encryption(&mut self, mode: EncryptionMode) {
        self.inner.lock().game_encryption = Some(mode);
    }
}

/// What a [`RecordingPresentation`] has been told
#[derive(Debug, Default, Clone)]
pub struct PresentationLog {
    pub display_updates: usize,
    pub last_vitals: Option<Vitals>,
    pub connected: Vec<Option<CharacterKey>>,
    pub disconnects: usize,
}

/// Presentation that counts calls
#[derive(Debug, Default, Clone)]
pub struct RecordingPresentation {
    inner: Arc<Mutex<PresentationLog>>,
}

impl RecordingPresentation {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> PresentationLog {
        self.inner.lock().clone()
    }
}

impl Presentation for RecordingPresentation {
    fn update_display(&mut self, vitals: &Vitals) {
        let mut inner = self.inner.lock();
        inner.display_updates += 1;
        inner.last_vitals = Some(*vitals);
    }

    fn connected(&mut self, character: Option<&CharacterKey>) {
        self.inner.lock().connected.push(character.cloned());
    }

    fn disconnected(&mut self) {
        self.inner.lock().disconnects += 1;
    }
}
