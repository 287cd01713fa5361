//! Big-endian codec primitives
//!
//! Every multi-byte integer on the wire is big-endian and lives at a fixed
//! offset defined by the message layout. The helpers here read and write
//! those fields in caller-owned buffers.
//!
//! The offset helpers never panic: reading past the end of the buffer
//! yields 0 and writing past the end is a no-op, so a truncated message
//! decodes to garbage values instead of aborting the dispatch thread.

/// Read a big-endian u16 at `offset`
#[inline]
pub fn unpack_big_u16(buf: &[u8], offset: usize) -> u16 {
    match buf.get(offset..offset.saturating_add(2)) {
        Some(bytes) => u16::from_be_bytes([bytes[0], bytes[1]]),
        None => 0,
    }
}

/// Read a big-endian u32 at `offset`
#[inline]
pub fn unpack_big_u32(buf: &[u8], offset: usize) -> u32 {
    match buf.get(offset..offset.saturating_add(4)) {
        Some(bytes) => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        None => 0,
    }
}

/// Write a big-endian u16 at `offset`
#[inline]
pub fn pack_big_u16(buf: &mut [u8], offset: usize, value: u16) {
    if let Some(bytes) = buf.get_mut(offset..offset.saturating_add(2)) {
        bytes.copy_from_slice(&value.to_be_bytes());
    }
}

/// Write a big-endian u32 at `offset`
#[inline]
pub fn pack_big_u32(buf: &mut [u8], offset: usize, value: u32) {
    if let Some(bytes) = buf.get_mut(offset..offset.saturating_add(4)) {
        bytes.copy_from_slice(&value.to_be_bytes());
    }
}

/// Read a single byte at `offset`, 0 when out of range
#[inline]
pub fn byte_at(buf: &[u8], offset: usize) -> u8 {
    buf.get(offset).copied().unwrap_or(0)
}

/// Read a NUL-padded fixed-width text field
///
/// Stops at the first NUL or at `width` bytes, whichever comes first.
/// Bytes are interpreted as Latin-1 so no input is rejected.
pub fn read_fixed_str(buf: &[u8], offset: usize, width: usize) -> String {
    let start = offset.min(buf.len());
    let end = offset.saturating_add(width).min(buf.len());
    buf[start..end]
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Read a NUL-terminated text field running to the end of the buffer
pub fn read_cstr(buf: &[u8], offset: usize) -> String {
    read_fixed_str(buf, offset, buf.len().saturating_sub(offset))
}

/// Forward-only cursor over a received message
///
/// Used for the variable-layout messages whose fields shift depending on
/// flag bits and counts. Reads past the end return 0 and still advance,
/// so [`PacketReader::position`] reports the offset the layout implies;
/// handlers compare it against the real size to detect drift.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Create a reader positioned at `offset`
    pub fn new(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, pos: offset }
    }

    pub fn u8(&mut self) -> u8 {
        let value = byte_at(self.buf, self.pos);
        self.pos += 1;
        value
    }

    pub fn u16(&mut self) -> u16 {
        let value = unpack_big_u16(self.buf, self.pos);
        self.pos += 2;
        value
    }

    pub fn u32(&mut self) -> u32 {
        let value = unpack_big_u32(self.buf, self.pos);
        self.pos += 4;
        value
    }

    /// Read a fixed-width, NUL-padded text field
    pub fn fixed_str(&mut self, width: usize) -> String {
        let text = read_fixed_str(self.buf, self.pos, width);
        self.pos += width;
        text
    }

    pub fn skip(&mut self, count: usize) {
        self.pos += count;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the message
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// The unread tail of the message
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }
}
