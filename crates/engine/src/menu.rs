//! # Menu Automation
//!
//! `waitmenu` queues prompt/choice pairs. Each incoming menu whose
//! question starts with the front prompt is answered with the first item
//! starting with the matching choice, and the client never sees it.

use crate::engine::Engine;
use bytes::BytesMut;
use std::collections::VecDeque;
use uoinject_protocol::{build_menu_choice, MenuGumpPacket};

/// Most prompt/choice pairs one `waitmenu` accepts
pub const MAX_MENU_PAIRS: usize = 3;

/// Queued menu answers
#[derive(Debug, Default)]
pub struct MenuQueue {
    entries: VecDeque<(String, String)>,
}

impl MenuQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text
            .bytes()
            .zip(prefix.bytes())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

impl Engine {
    /// Queue answers for the next menus
    ///
    /// # Arguments
    /// * `pairs` - (prompt, choice) pairs, answered in order
    pub fn wait_menu(&mut self, pairs: Vec<(String, String)>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.menus.entries.clear();
        session.menus.entries.extend(pairs.into_iter().take(MAX_MENU_PAIRS));
        tracing::debug!("Waiting for {} menus", session.menus.len());
    }

    /// Forget queued menu answers
    pub fn cancel_menu(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.menus.entries.clear();
        }
    }

    /// Open Menu Gump (0x7C)
    pub(crate) fn handle_open_menu_gump(&mut self, buf: &mut [u8]) -> bool {
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        let Some((prompt, choice)) = session.menus.entries.front() else {
            return true;
        };

        let menu = match MenuGumpPacket::parse(buf) {
            Ok(menu) => menu,
            Err(err) => {
                tracing::warn!("Bad menu gump: {}", err);
                return true;
            }
        };
        if menu.wire_len != buf.len() {
            tracing::warn!("Menu gump decoded {} bytes of {}", menu.wire_len, buf.len());
        }
        if !starts_with_ignore_case(&menu.question, prompt) {
            tracing::debug!("Menu '{}' does not match '{}'", menu.question, prompt);
            return true;
        }

        let found = menu
            .items
            .iter()
            .position(|item| starts_with_ignore_case(&item.text, choice));
        let Some(index) = found else {
            let message = format!("Menu item '{}' not found in '{}'", choice, menu.question);
            session.menus.entries.clear();
            self.client_print(&message);
            return true;
        };

        session.menus.entries.pop_front();
        let item = &menu.items[index];
        tracing::debug!("Answering menu '{}' with '{}'", menu.question, item.text);
        let mut out = BytesMut::new();
        build_menu_choice(&mut out, menu.dialog_id, menu.menu_id, index as u16 + 1, item.graphic, item.colour);
        self.send_server(&out);
        false
    }
}
