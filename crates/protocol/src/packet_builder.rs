//! # Packet Builder
//!
//! Builder functions for the messages the engine synthesizes, either to
//! inject into the client's view (system text, target cursors, container
//! gumps) or to send to the server on the user's behalf (item moves,
//! double clicks, vendor and menu replies).
//!
//! Every builder appends one complete message to `buf`. Variable-size
//! messages get their embedded length patched once the body is written.
//!
//! ```rust
//! use uoinject_protocol::packet_builder::*;
//! use uoinject_core::Serial;
//! use bytes::BytesMut;
//!
//! let mut buf = BytesMut::new();
//! build_double_click(&mut buf, Serial::new(0x4000_1234));
//! assert_eq!(&buf[..], &[0x06, 0x40, 0x00, 0x12, 0x34]);
//! ```

use bytes::{BufMut, BytesMut};
use uoinject_core::{Layer, Serial};

use crate::packets::*;
use crate::packet_structures::TargetPacket;

/// Sender name shown on injected system text
pub const SYSTEM_NAME: &str = "uoinject";

/// Colour of injected system text
pub const SYSTEM_COLOUR: u16 = 0x0440;

/// Font of injected system text
pub const SYSTEM_FONT: u16 = 3;

/// Placeholder coordinate meaning "let the server choose"
pub const INVALID_XY: u16 = 0xffff;

/// Start a variable-size message, returning the offset of its opcode
fn begin_variable(buf: &mut BytesMut, code: MessageCode) -> usize {
    let start = buf.len();
    buf.put_u8(code.as_u8());
    buf.put_u16(0);
    start
}

/// Patch the length field of a message started with [`begin_variable`]
fn finish_variable(buf: &mut BytesMut, start: usize) {
    let len = (buf.len() - start) as u16;
    buf[start + LENGTH_OFFSET..start + LENGTH_OFFSET + 2].copy_from_slice(&len.to_be_bytes());
}

/// Build a Server Talk message (0x1C) carrying local system text
///
/// # Purpose
/// The only way to show text to the user is to make it look like the
/// server said it. The sender serial is 0xFFFFFFFF so the client treats
/// it as a system message.
///
/// # Packet Format
/// ```text
/// {1c}{len u16}{serial u32}{graphic u16}{mode u8}{colour u16}{font u16}{name 30}{text NUL}
/// ```
///
/// # Arguments
/// * `buf` - Buffer to write the message to
/// * `text` - Text to display, non-ASCII characters are replaced by `?`
pub fn build_system_text(buf: &mut BytesMut, text: &str) {
    let start = begin_variable(buf, MessageCode::ServerTalk);
    buf.put_u32(Serial::SYSTEM.get());
    buf.put_u16(0); // graphic
    buf.put_u8(0); // mode: normal
    buf.put_u16(SYSTEM_COLOUR);
    buf.put_u16(SYSTEM_FONT);
    put_fixed_str(buf, SYSTEM_NAME, 30);
    for ch in text.chars() {
        buf.put_u8(if ch.is_ascii() && ch != '\0' { ch as u8 } else { b'?' });
    }
    buf.put_u8(0);
    finish_variable(buf, start);
}

/// Build a Double Click message (0x06), the generic "use this object"
pub fn build_double_click(buf: &mut BytesMut, serial: Serial) {
    buf.put_u8(MessageCode::DoubleClick.as_u8());
    buf.put_u32(serial.get());
}

/// Build a Single Click message (0x09)
///
/// Sent with serial 0 in reply to the idle warning, which keeps the
/// session alive without side effects.
pub fn build_single_click(buf: &mut BytesMut, serial: Serial) {
    buf.put_u8(MessageCode::SingleClick.as_u8());
    buf.put_u32(serial.get());
}

/// Build a Pick Up Item (0x07) followed by a Drop Item (0x08)
///
/// # Purpose
/// Moves `quantity` of a stack into `container`. Both messages go out in a
/// single send so nothing can slip between them.
///
/// # Packet Format
/// ```text
/// {07}{serial u32}{quantity u16}
/// {08}{serial u32}{x ffff}{y ffff}{z 0}{container u32}
/// ```
pub fn build_move_to_container(buf: &mut BytesMut, serial: Serial, quantity: u16, container: Serial) {
    buf.put_u8(MessageCode::PickUpItem.as_u8());
    buf.put_u32(serial.get());
    buf.put_u16(quantity);

    buf.put_u8(MessageCode::DropItem.as_u8());
    buf.put_u32(serial.get());
    buf.put_u16(INVALID_XY);
    buf.put_u16(INVALID_XY);
    buf.put_u8(0);
    buf.put_u32(container.get());
}

/// Build a Pick Up Item (0x07) followed by a Client Equip Item (0x13)
///
/// # Packet Format
/// ```text
/// {07}{serial u32}{1 u16}
/// {13}{serial u32}{layer u8}{owner u32}
/// ```
pub fn build_move_to_layer(buf: &mut BytesMut, serial: Serial, layer: Layer, owner: Serial) {
    buf.put_u8(MessageCode::PickUpItem.as_u8());
    buf.put_u32(serial.get());
    buf.put_u16(1);

    buf.put_u8(MessageCode::ClientEquipItem.as_u8());
    buf.put_u32(serial.get());
    buf.put_u8(layer.get());
    buf.put_u32(owner.get());
}

/// Build a locally originated target request (0x6C)
///
/// The cursor id is the player's serial so the reply can be recognised;
/// every other field is zero, asking for an object target.
pub fn build_target_request(buf: &mut BytesMut, source: Serial) {
    let request = TargetPacket { cursor_id: source.get(), ..TargetPacket::default() };
    buf.put_slice(&request.to_bytes());
}

/// Build a target reply (0x6C) answering `request` with `serial`
///
/// A serial of 0 with coordinates 0xFFFF is the cancel form.
pub fn build_target_reply(buf: &mut BytesMut, request: &TargetPacket, serial: Serial) {
    let cancel = !serial.is_valid();
    let reply = TargetPacket {
        target_type: 0,
        cursor_id: request.cursor_id,
        cursor_flag: request.cursor_flag,
        serial,
        x: if cancel { INVALID_XY } else { 0 },
        y: if cancel { INVALID_XY } else { 0 },
        unknown: 0,
        z: 0,
        graphic: 0,
    };
    buf.put_slice(&reply.to_bytes());
}

/// Build an Open Container message (0x24) shown to the client
pub fn build_open_container(buf: &mut BytesMut, serial: Serial, gump: u16) {
    buf.put_u8(MessageCode::OpenContainer.as_u8());
    buf.put_u32(serial.get());
    buf.put_u16(gump);
}

/// Build a Delete Object message (0x1D), used to hide things client side
pub fn build_delete_object(buf: &mut BytesMut, serial: Serial) {
    buf.put_u8(MessageCode::DeleteObject.as_u8());
    buf.put_u32(serial.get());
}

/// Build a Global Light Level message (0x4F)
///
/// 0 is brightest, 31 darkest.
pub fn build_global_light(buf: &mut BytesMut, level: u8) {
    buf.put_u8(MessageCode::GlobalLightLevel.as_u8());
    buf.put_u8(level);
}

/// Build a Client Talk message (0x03)
///
/// # Packet Format
/// ```text
/// {03}{len u16}{mode u8}{colour u16}{font u16}{text NUL}
/// ```
///
/// `text` is copied as-is; a terminating NUL is added if it is missing.
pub fn build_client_talk(buf: &mut BytesMut, mode: u8, colour: u16, font: u16, text: &[u8]) {
    let start = begin_variable(buf, MessageCode::ClientTalk);
    buf.put_u8(mode);
    buf.put_u16(colour);
    buf.put_u16(font);
    buf.put_slice(text);
    if text.last() != Some(&0) {
        buf.put_u8(0);
    }
    finish_variable(buf, start);
}

/// Build a Menu Choice message (0x7D) for a 1-based item index
pub fn build_menu_choice(buf: &mut BytesMut, dialog_id: u32, menu_id: u16, index: u16, graphic: u16, colour: u16) {
    buf.put_u8(MessageCode::MenuChoice.as_u8());
    buf.put_u32(dialog_id);
    buf.put_u16(menu_id);
    buf.put_u16(index);
    buf.put_u16(graphic);
    buf.put_u16(colour);
}

/// Build a Vendor Buy Reply (0x3B)
///
/// # Packet Format
/// ```text
/// {3b}{len u16}{vendor u32}{flag 02}({layer 1a}{serial u32}{amount u16})*
/// ```
pub fn build_vendor_buy_reply(buf: &mut BytesMut, vendor: Serial, items: &[(Serial, u16)]) {
    let start = begin_variable(buf, MessageCode::VendorBuyReply);
    buf.put_u32(vendor.get());
    buf.put_u8(VENDOR_BUY_ITEMS);
    for &(serial, amount) in items {
        buf.put_u8(Layer::VENDOR_BUY_RESTOCK.get());
        buf.put_u32(serial.get());
        buf.put_u16(amount);
    }
    finish_variable(buf, start);
}

/// Build a Vendor Sell Reply (0x9F)
///
/// # Packet Format
/// ```text
/// {9f}{len u16}{vendor u32}{count u16}({serial u32}{amount u16})*
/// ```
pub fn build_vendor_sell_reply(buf: &mut BytesMut, vendor: Serial, items: &[(Serial, u16)]) {
    let start = begin_variable(buf, MessageCode::VendorSellReply);
    buf.put_u32(vendor.get());
    buf.put_u16(items.len() as u16);
    for &(serial, amount) in items {
        buf.put_u32(serial.get());
        buf.put_u16(amount);
    }
    finish_variable(buf, start);
}

/// Build a Perform Action message (0x12)
///
/// Spells use [`ACTION_CAST_SPELL`] with the spell number as text, skills
/// use [`ACTION_USE_SKILL`] with `"<id> 0"`.
pub fn build_perform_action(buf: &mut BytesMut, action: u8, text: &str) {
    let start = begin_variable(buf, MessageCode::PerformAction);
    buf.put_u8(action);
    buf.put_slice(text.as_bytes());
    buf.put_u8(0);
    finish_variable(buf, start);
}

fn put_fixed_str(buf: &mut BytesMut, text: &str, width: usize) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(width - 1);
    buf.put_slice(&bytes[..len]);
    buf.put_bytes(0, width - len);
}
