//! Speech handlers
//!
//! Client speech starting with `,` is a local command and never reaches
//! the server. With `fixtalk` set, Unicode speech is rewritten as plain
//! Client Talk for shards that only understand the old message.

use crate::engine::Engine;
use bytes::BytesMut;
use uoinject_config::ServerFlag;
use uoinject_protocol::{
    build_client_talk, byte_at, narrow_utf16, read_cstr, read_fixed_str, unpack_big_u16, TalkBody, UnicodeTalk,
    COMMAND_PREFIX, TEXT_OFFSET,
};

/// Offset of the text in Client Talk
const CLIENT_TALK_TEXT: usize = 8;

/// Speech mode bits that survive the downgrade to Client Talk
const TALK_MODE_MASK: u8 = 0x3f;

impl Engine {
    /// Client Talk (0x03)
    pub(crate) fn handle_client_talk(&mut self, buf: &mut [u8]) -> bool {
        if byte_at(buf, CLIENT_TALK_TEXT) != COMMAND_PREFIX {
            return true;
        }
        let command = read_cstr(buf, CLIENT_TALK_TEXT + 1);
        self.run_command(&command);
        false
    }

    /// Unicode Client Talk (0xAD)
    pub(crate) fn handle_unicode_client_talk(&mut self, buf: &mut [u8]) -> bool {
        let talk = UnicodeTalk::parse(buf);
        match &talk.body {
            TalkBody::Keywords { text, text_offset, count } => {
                tracing::trace!("Keyword speech with {} keywords: {}", count, text);
                if let Some(command) = text.strip_prefix(COMMAND_PREFIX as char) {
                    self.run_command(command);
                    return false;
                }
                if !self.server_flag(ServerFlag::FixTalk) {
                    return true;
                }
                let raw = buf.get(*text_offset..).unwrap_or_default();
                let mut out = BytesMut::new();
                build_client_talk(&mut out, talk.mode & TALK_MODE_MASK, talk.colour, talk.font, raw);
                self.send_server(&out);
                false
            }
            TalkBody::Unicode { text } => {
                if buf.len() >= TEXT_OFFSET + 6 && unpack_big_u16(buf, TEXT_OFFSET) == COMMAND_PREFIX as u16 {
                    let command = narrow_utf16(buf, TEXT_OFFSET + 2);
                    self.run_command(&command);
                    return false;
                }
                if !self.server_flag(ServerFlag::FixTalk) {
                    return true;
                }
                let mut out = BytesMut::new();
                build_client_talk(&mut out, talk.mode & TALK_MODE_MASK, talk.colour, talk.font, text.as_bytes());
                self.send_server(&out);
                false
            }
        }
    }

    /// Server Talk (0x1C)
    pub(crate) fn handle_server_talk(&mut self, buf: &mut [u8]) -> bool {
        tracing::trace!("{}: {}", read_fixed_str(buf, 14, 30), read_cstr(buf, 44));
        true
    }

    /// Walk Request (0x02)
    ///
    /// Some shards reject the fast-walk key newer clients append; with
    /// `fixwalk` set it is cut off and the short form sent instead.
    pub(crate) fn handle_walk_request(&mut self, buf: &mut [u8]) -> bool {
        if !self.server_flag(ServerFlag::FixWalk) {
            return true;
        }
        let end = buf.len().saturating_sub(4);
        self.send_server(&buf[..end]);
        false
    }
}
