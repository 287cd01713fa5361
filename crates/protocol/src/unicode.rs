//! Unicode Client Talk (0xAD) decoding
//!
//! Two layouts share the opcode. When the two top bits of the mode byte
//! are set, the text is preceded by a list of 12-bit speech keyword ids
//! and the text itself is plain ASCII. Otherwise the text is UTF-16BE.
//!
//! ```text
//! {ad}{len u16}{mode u8}{colour u16}{font u16}{lang 4 bytes}{text ...}
//! keyword form: {count:12 | first:4}{packed 12-bit ids ...}{ascii text}
//! ```

use crate::codecs::{byte_at, unpack_big_u16};

/// Mode bits marking the keyword form
pub const KEYWORD_MODE: u8 = 0xc0;

/// Offset of the text (or keyword header) in the message
pub const TEXT_OFFSET: usize = 12;

/// Decoded Unicode Client Talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeTalk {
    pub mode: u8,
    pub colour: u16,
    pub font: u16,
    pub body: TalkBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalkBody {
    /// Keyword-prefixed speech; `text_offset` is where the ASCII text starts
    Keywords { count: u16, text_offset: usize, text: String },
    /// UTF-16 speech, narrowed to single bytes
    Unicode { text: String },
}

impl UnicodeTalk {
    pub fn parse(buf: &[u8]) -> Self {
        let mode = byte_at(buf, 3);
        let body = if mode & KEYWORD_MODE == KEYWORD_MODE {
            let word = unpack_big_u16(buf, TEXT_OFFSET);
            let count = word >> 4;
            let text_offset = keyword_text_offset(count);
            TalkBody::Keywords { count, text_offset, text: ascii_text(buf, text_offset) }
        } else {
            TalkBody::Unicode { text: narrow_utf16(buf, TEXT_OFFSET) }
        };
        Self {
            mode,
            colour: unpack_big_u16(buf, 4),
            font: unpack_big_u16(buf, 6),
            body,
        }
    }

    /// The spoken text regardless of layout
    pub fn text(&self) -> &str {
        match &self.body {
            TalkBody::Keywords { text, .. } | TalkBody::Unicode { text } => text,
        }
    }
}

/// Offset of the ASCII text after `count` packed keyword ids
///
/// The first id's top 4 bits share the count word, so `count * 12 - 4`
/// bits follow it. Any partial byte counts as a whole one, including the
/// negative remainder of an empty list, which still skips one byte.
pub fn keyword_text_offset(count: u16) -> usize {
    let bits = count as isize * 12 - 4;
    let bytes = bits / 8 + isize::from(bits % 8 != 0);
    (TEXT_OFFSET as isize + 2 + bytes) as usize
}

/// Unpack the 12-bit keyword ids
pub fn keyword_ids(buf: &[u8], count: u16) -> Vec<u16> {
    let mut ids = Vec::with_capacity(count as usize);
    let mut bits = (unpack_big_u16(buf, TEXT_OFFSET) & 0x0f) as u32;
    let mut available = 4u32;
    let mut pos = TEXT_OFFSET + 2;
    for _ in 0..count {
        while available < 12 {
            bits = (bits << 8) | byte_at(buf, pos) as u32;
            pos += 1;
            available += 8;
        }
        ids.push(((bits >> (available - 12)) & 0xfff) as u16);
        available -= 12;
        bits &= (1 << available) - 1;
    }
    ids
}

fn ascii_text(buf: &[u8], offset: usize) -> String {
    buf.get(offset..)
        .unwrap_or_default()
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Decode UTF-16BE text up to the terminating NUL
///
/// Characters outside the single-byte range become `?`.
pub fn narrow_utf16(buf: &[u8], offset: usize) -> String {
    buf.get(offset..)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .take_while(|&(high, low)| high != 0 || low != 0)
        .map(|(high, low)| if high == 0 { low as char } else { '?' })
        .collect()
}
