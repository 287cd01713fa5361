//! # Message Type Registry
//!
//! Static description of every opcode from 0x00 to 0xCC: its name, its
//! declared size, the direction it normally travels and the handlers the
//! engine runs for it.
//!
//! The table is data. Sizes and directions are protocol constants; names
//! only feed the logs. Opcodes past the end of the table are unknown
//! protocol extensions and are passed through untouched.

use crate::engine::Engine;
use uoinject_core::MessageDirection;
use uoinject_protocol::SIZE_VARIABLE;

/// Number of opcodes the registry describes
pub const MESSAGE_TYPE_COUNT: usize = 0xcd;

/// Handler for one direction of one opcode
///
/// Receives the whole message, which it may rewrite in place, and
/// returns whether the original bytes are forwarded.
pub type MessageHandler = fn(&mut Engine, &mut [u8]) -> bool;

/// Declared size of a message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSize {
    /// Always exactly this many bytes
    Fixed(u16),
    /// Length carried in the 16-bit field after the opcode
    Variable,
}

impl MessageSize {
    const fn from_raw(raw: i32) -> Self {
        if raw == SIZE_VARIABLE {
            MessageSize::Variable
        } else {
            MessageSize::Fixed(raw as u16)
        }
    }

    /// The size in the interception layer's convention, -1 for variable
    pub fn as_raw(&self) -> i32 {
        match *self {
            MessageSize::Fixed(size) => size as i32,
            MessageSize::Variable => SIZE_VARIABLE,
        }
    }
}

/// Registry entry for one opcode
#[derive(Clone, Copy)]
pub struct MessageType {
    pub name: &'static str,
    pub size: MessageSize,
    pub direction: MessageDirection,
    send_handler: Option<MessageHandler>,
    recv_handler: Option<MessageHandler>,
}

impl MessageType {
    /// Handler for a message observed travelling `observed`
    pub fn handler(&self, observed: MessageDirection) -> Option<MessageHandler> {
        match observed {
            MessageDirection::Send => self.send_handler,
            MessageDirection::Recv => self.recv_handler,
            MessageDirection::Both => self.send_handler.or(self.recv_handler),
        }
    }
}

impl std::fmt::Debug for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageType")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("direction", &self.direction)
            .field("send_handler", &self.send_handler.is_some())
            .field("recv_handler", &self.recv_handler.is_some())
            .finish()
    }
}

/// Look up an opcode
///
/// # Returns
/// `None` for opcodes past the end of the table
pub fn message_type(opcode: u8) -> Option<&'static MessageType> {
    MESSAGE_TYPES.get(opcode as usize)
}

/// Declared size of an opcode, `None` when the opcode is unknown
pub fn message_size(opcode: u8) -> Option<MessageSize> {
    message_type(opcode).map(|entry| entry.size)
}

const VAR: i32 = SIZE_VARIABLE;

const fn entry(
    name: &'static str,
    size: i32,
    direction: MessageDirection,
    send_handler: Option<MessageHandler>,
    recv_handler: Option<MessageHandler>,
) -> MessageType {
    MessageType { name, size: MessageSize::from_raw(size), direction, send_handler, recv_handler }
}

/// Unknown, unverified or obsolete
const fn unknown(size: i32) -> MessageType {
    entry("?", size, MessageDirection::Both, None, None)
}

const fn send(name: &'static str, size: i32) -> MessageType {
    entry(name, size, MessageDirection::Send, None, None)
}

const fn recv(name: &'static str, size: i32) -> MessageType {
    entry(name, size, MessageDirection::Recv, None, None)
}

const fn both(name: &'static str, size: i32) -> MessageType {
    entry(name, size, MessageDirection::Both, None, None)
}

const fn send_h(name: &'static str, size: i32, handler: MessageHandler) -> MessageType {
    entry(name, size, MessageDirection::Send, Some(handler), None)
}

const fn recv_h(name: &'static str, size: i32, handler: MessageHandler) -> MessageType {
    entry(name, size, MessageDirection::Recv, None, Some(handler))
}

const fn both_h(name: &'static str, size: i32, send: MessageHandler, recv: MessageHandler) -> MessageType {
    entry(name, size, MessageDirection::Both, Some(send), Some(recv))
}

/// The registry, indexed by opcode
pub static MESSAGE_TYPES: [MessageType; MESSAGE_TYPE_COUNT] = [
    send("Create Character", 0x68), // 0x00
    send("Disconnect", 0x05),
    send_h("Walk Request", 0x07, Engine::handle_walk_request),
    send_h("Client Talk", VAR, Engine::handle_client_talk),
    unknown(0x02),
    send("Attack", 0x05),
    send("Double Click", 0x05),
    send("Pick Up Item", 0x07),
    send("Drop Item", 0x0e), // 0x08
    send("Single Click", 0x05),
    unknown(0x0b),
    unknown(0x10a),
    unknown(VAR),
    unknown(0x03),
    unknown(VAR),
    unknown(0x3d),
    unknown(0xd7), // 0x10
    recv_h("Character Status", VAR, Engine::handle_character_status),
    send("Perform Action", VAR),
    send("Client Equip Item", 0x0a),
    unknown(0x06),
    unknown(0x09),
    unknown(0x01),
    unknown(VAR),
    unknown(VAR), // 0x18
    unknown(VAR),
    recv_h("Update Item", VAR, Engine::handle_update_item),
    recv_h("Enter World", 0x25, Engine::handle_enter_world),
    recv_h("Server Talk", VAR, Engine::handle_server_talk),
    recv_h("Delete Object", 0x05, Engine::handle_delete_object),
    unknown(0x04),
    unknown(0x08),
    recv_h("Update Player", 0x13, Engine::handle_update_player), // 0x20
    recv("Deny Walk", 0x08),
    both("Confirm Walk", 0x03),
    recv("Drag Animation", 0x1a),
    recv_h("Open Container", 0x07, Engine::handle_open_container),
    recv_h("Update Contained Item", 0x14, Engine::handle_update_contained_item),
    unknown(0x05),
    recv("Deny Move Item", 0x02),
    unknown(0x05), // 0x28
    unknown(0x01),
    unknown(0x05),
    unknown(0x02),
    both("Death Dialog", 0x02),
    unknown(0x11),
    recv_h("Server Equip Item", 0x0f, Engine::handle_server_equip_item),
    recv("Combat Notification", 0x0a),
    unknown(0x05), // 0x30
    unknown(0x01),
    unknown(0x02),
    recv_h("Pause Control", 0x02, Engine::handle_pause_control),
    send_h("Status Request", 0x0a, Engine::handle_status_request),
    unknown(0x28d),
    unknown(VAR),
    unknown(0x08),
    unknown(0x07), // 0x38
    unknown(0x09),
    both("Update Skills", VAR),
    both_h("Vendor Buy Reply", VAR, Engine::handle_vendor_buy_reply, Engine::handle_vendor_buy_reply),
    recv_h("Update Contained Items", VAR, Engine::handle_update_contained_items),
    unknown(0x02),
    unknown(0x25),
    unknown(VAR),
    unknown(0xc9), // 0x40
    unknown(VAR),
    unknown(VAR),
    unknown(0x229),
    unknown(0x2c9),
    unknown(0x05),
    unknown(VAR),
    unknown(0x0b),
    unknown(0x49), // 0x48
    unknown(0x5d),
    unknown(0x05),
    unknown(0x09),
    unknown(VAR),
    unknown(VAR),
    recv("Object Light Level", 0x06),
    recv_h("Global Light Level", 0x02, Engine::handle_global_light_level),
    unknown(VAR), // 0x50
    unknown(VAR),
    unknown(VAR),
    recv_h("Error Code", 0x02, Engine::handle_error_code),
    recv("Sound Effect", 0x0c),
    recv("Login Complete", 0x01),
    both("Map Data", 0x0b),
    unknown(0x6e),
    unknown(0x6a), // 0x58
    unknown(VAR),
    unknown(VAR),
    recv("Set Time?", 0x04),
    unknown(0x02),
    send_h("Select Character", 0x49, Engine::handle_select_character),
    unknown(VAR),
    unknown(0x31),
    unknown(0x05), // 0x60
    unknown(0x09),
    unknown(0x0f),
    unknown(0x0d),
    unknown(0x01),
    recv_h("Set Weather", 0x04, Engine::handle_weather_change),
    both("Book Page Data", VAR),
    unknown(0x15),
    unknown(VAR), // 0x68
    unknown(VAR),
    unknown(0x03),
    unknown(0x09),
    both_h("Target Data", 0x13, Engine::handle_target_s, Engine::handle_target_r),
    recv("Play Music", 0x03),
    recv("Character Animation", 0x0e),
    both("Secure Trading", VAR),
    recv("Graphic Effect", 0x1c), // 0x70
    both("Message Board Data", VAR),
    both("War Mode", 0x05),
    both("Ping", 0x02),
    recv_h("Vendor Buy List", VAR, Engine::handle_vendor_buy_list),
    send("Rename Character", 0x23),
    unknown(0x10),
    recv("Update Character", 0x11),
    recv_h("Update Object", VAR, Engine::handle_update_object), // 0x78
    unknown(0x09),
    unknown(VAR),
    unknown(0x02),
    recv_h("Open Menu Gump", VAR, Engine::handle_open_menu_gump),
    send("Menu Choice", 0x0d),
    unknown(0x02),
    unknown(VAR),
    send_h("First Login", 0x3e, Engine::handle_first_login), // 0x80
    unknown(VAR),
    recv("Login Error", 0x02),
    send("Delete Character", 0x27),
    unknown(0x45),
    unknown(0x02),
    recv_h("Character List 2", VAR, Engine::handle_character_list2),
    unknown(VAR),
    recv("Open Paperdoll", 0x42), // 0x88
    recv("Corpse Equipment", VAR),
    unknown(VAR),
    unknown(VAR),
    recv_h("Relay Server", 0x0b, Engine::handle_relay_server),
    unknown(VAR),
    unknown(VAR),
    unknown(VAR),
    recv("Display Map", 0x13), // 0x90
    send_h("Second Login", 0x41, Engine::handle_second_login),
    unknown(VAR),
    recv("Open Book", 0x63),
    unknown(VAR),
    both_h("Dye Data", 0x09, Engine::handle_dye_s, Engine::handle_dye_r),
    unknown(VAR),
    unknown(0x02),
    unknown(VAR), // 0x98
    both("Multi Placement", 0x1a),
    unknown(VAR),
    send("Help Request", 0x102),
    unknown(0x135),
    unknown(0x33),
    recv_h("Vendor Sell List", VAR, Engine::handle_vendor_sell_list),
    send_h("Vendor Sell Reply", VAR, Engine::handle_vendor_sell_reply),
    send_h("Select Server", 0x03, Engine::handle_select_server), // 0xa0
    recv_h("Update Hitpoints", 0x09, Engine::handle_update_hitpoints),
    recv_h("Update Mana", 0x09, Engine::handle_update_mana),
    recv_h("Update Stamina", 0x09, Engine::handle_update_stamina),
    send("System Information", 0x95),
    recv("Open URL", VAR),
    recv("Tip Window", VAR),
    send("Request Tip", 0x04),
    recv_h("Server List", VAR, Engine::handle_server_list), // 0xa8
    recv_h("Character List", VAR, Engine::handle_character_list),
    recv("Attack Reply", 0x05),
    recv("Text Input Dialog", VAR),
    send("Text Input Reply", VAR),
    send_h("Unicode Client Talk", VAR, Engine::handle_unicode_client_talk),
    recv("Unicode Server Talk", VAR),
    unknown(0x0d),
    recv("Open Dialog Gump", VAR), // 0xb0
    send("Dialog Choice", VAR),
    both("Chat Data", VAR),
    recv("Chat Text ?", VAR),
    unknown(VAR),
    recv("Open Chat Window", 0x40),
    send("Popup Help Request", 0x09),
    recv("Popup Help Data", VAR),
    both("Character Profile", VAR), // 0xb8
    recv("Chat Enable", 0x03),
    recv("Display Guidance Arrow", 0x06),
    send("Account ID ?", 0x09),
    recv("Season ?", 0x03),
    send("Client Version", VAR),
    unknown(VAR),
    both("New Commands", VAR),
    unknown(0x24), // 0xc0
    recv("Display cliloc String", VAR),
    unknown(VAR),
    unknown(VAR),
    unknown(0x06),
    unknown(0xcb),
    unknown(0x01),
    unknown(0x31),
    unknown(0x02), // 0xc8
    unknown(0x06),
    unknown(0x06),
    unknown(0x07),
    unknown(VAR),
];
