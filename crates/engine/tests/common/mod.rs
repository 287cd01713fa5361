//! Shared fixtures: an engine wired to recording collaborators and
//! builders for the server messages the scenarios need.

#![allow(dead_code)]

use bytes::BytesMut;
use std::sync::Arc;
use uoinject_config::{ConfigData, ConfigManager};
use uoinject_core::{Layer, Serial};
use uoinject_engine::testing::{RecordingInterceptor, RecordingPresentation};
use uoinject_engine::Engine;
use uoinject_protocol::{build_client_talk, pack_big_u16, pack_big_u32, SYSTEM_FONT};

pub const SHARD: &str = "Shard";
pub const ACCOUNT: &str = "bob";
pub const PLAYER: Serial = Serial(0x0000_1234);
pub const BACKPACK: Serial = Serial(0x4000_0001);

pub struct Harness {
    pub engine: Engine,
    pub wire: RecordingInterceptor,
    pub screen: RecordingPresentation,
    pub config: Arc<ConfigManager>,
}

impl Harness {
    pub fn new(config_text: &str) -> Self {
        let config = Arc::new(ConfigManager::from_data(ConfigData::parse(config_text)));
        let wire = RecordingInterceptor::new();
        let screen = RecordingPresentation::new();
        let engine = Engine::new(config.clone(), Box::new(wire.clone()), Box::new(screen.clone()));
        Self { engine, wire, screen, config }
    }

    /// An engine whose player has entered the world on `SHARD` as `ACCOUNT`
    pub fn in_world(config_text: &str) -> Self {
        let mut harness = Self::new(config_text);
        harness.login();
        harness.server(&mut enter_world(PLAYER));
        harness.wire.clear();
        harness
    }

    /// Run the login sequence up to the character list
    pub fn login(&mut self) {
        self.client(&mut first_login());
        self.server(&mut server_list(&[(7, SHARD)]));
        self.client(&mut select_server(7));
        self.server(&mut relay_server());
        self.client(&mut second_login(ACCOUNT));
        self.server(&mut character_list(&["Bob"]));
        self.client(&mut select_character("Bob", 0));
    }

    pub fn server(&mut self, buf: &mut [u8]) -> bool {
        self.engine.on_inbound_message(buf)
    }

    pub fn client(&mut self, buf: &mut [u8]) -> bool {
        self.engine.on_outbound_message(buf)
    }

    /// Type a command in the client's chat line
    pub fn say(&mut self, text: &str) -> bool {
        let mut msg = talk(text);
        self.client(&mut msg)
    }

    pub fn printed(&self) -> Vec<String> {
        self.wire.printed()
    }

    /// Give the player a backpack
    pub fn equip_backpack(&mut self) {
        self.server(&mut equip_item(BACKPACK, 0x0e75, Layer::BACKPACK, PLAYER));
    }
}

fn with_len(mut buf: Vec<u8>) -> Vec<u8> {
    let len = buf.len() as u16;
    pack_big_u16(&mut buf, 1, len);
    buf
}

fn put_str(buf: &mut [u8], offset: usize, text: &str) {
    buf[offset..offset + text.len()].copy_from_slice(text.as_bytes());
}

pub fn first_login() -> Vec<u8> {
    let mut buf = vec![0u8; 0x3e];
    buf[0] = 0x80;
    buf
}

pub fn server_list(servers: &[(u16, &str)]) -> Vec<u8> {
    let mut buf = vec![0u8; 6 + servers.len() * 40];
    buf[0] = 0xa8;
    pack_big_u16(&mut buf, 4, servers.len() as u16);
    for (i, (id, name)) in servers.iter().enumerate() {
        let offset = 6 + i * 40;
        pack_big_u16(&mut buf, offset, *id);
        put_str(&mut buf, offset + 2, name);
    }
    with_len(buf)
}

pub fn select_server(id: u16) -> Vec<u8> {
    let mut buf = vec![0xa0, 0, 0];
    pack_big_u16(&mut buf, 1, id);
    buf
}

pub fn relay_server() -> Vec<u8> {
    let mut buf = vec![0u8; 0x0b];
    buf[0] = 0x8c;
    buf
}

pub fn second_login(account: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 0x41];
    buf[0] = 0x91;
    put_str(&mut buf, 5, account);
    buf
}

pub fn character_list(names: &[&str]) -> Vec<u8> {
    let mut buf = vec![0u8; 4 + names.len() * 60];
    buf[0] = 0xa9;
    buf[3] = names.len() as u8;
    for (i, name) in names.iter().enumerate() {
        put_str(&mut buf, 4 + i * 60, name);
    }
    with_len(buf)
}

pub fn select_character(name: &str, slot: u8) -> Vec<u8> {
    let mut buf = vec![0u8; 0x49];
    buf[0] = 0x5d;
    put_str(&mut buf, 5, name);
    buf[68] = slot;
    buf
}

pub fn enter_world(player: Serial) -> Vec<u8> {
    let mut buf = vec![0u8; 0x25];
    buf[0] = 0x1b;
    pack_big_u32(&mut buf, 1, player.get());
    pack_big_u16(&mut buf, 9, 0x0190);
    pack_big_u16(&mut buf, 11, 1000);
    pack_big_u16(&mut buf, 13, 2000);
    buf
}

/// Client Talk (0x03) carrying `text`
pub fn talk(text: &str) -> Vec<u8> {
    let mut out = BytesMut::new();
    build_client_talk(&mut out, 0, 0x0034, SYSTEM_FONT, text.as_bytes());
    out.to_vec()
}

/// Character Status (0x11), short form
pub fn character_status(serial: Serial, name: &str, hits: u16, max_hits: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 43];
    buf[0] = 0x11;
    pack_big_u32(&mut buf, 3, serial.get());
    put_str(&mut buf, 7, name);
    pack_big_u16(&mut buf, 37, hits);
    pack_big_u16(&mut buf, 39, max_hits);
    with_len(buf)
}

/// Update Hitpoints (0xA1)
pub fn update_hitpoints(serial: Serial, hits: u16, max_hits: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 9];
    buf[0] = 0xa1;
    pack_big_u32(&mut buf, 1, serial.get());
    pack_big_u16(&mut buf, 5, max_hits);
    pack_big_u16(&mut buf, 7, hits);
    buf
}

/// Update Item (0x1A) without any optional fields
pub fn ground_item(serial: Serial, graphic: u16, x: u16, y: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 14];
    buf[0] = 0x1a;
    pack_big_u32(&mut buf, 3, serial.get());
    pack_big_u16(&mut buf, 7, graphic);
    pack_big_u16(&mut buf, 9, x);
    pack_big_u16(&mut buf, 11, y);
    with_len(buf)
}

/// Update Contained Item (0x25)
pub fn contained_item(serial: Serial, graphic: u16, quantity: u16, container: Serial) -> Vec<u8> {
    let mut buf = vec![0u8; 0x14];
    buf[0] = 0x25;
    pack_big_u32(&mut buf, 1, serial.get());
    pack_big_u16(&mut buf, 5, graphic);
    pack_big_u16(&mut buf, 8, quantity);
    pack_big_u32(&mut buf, 14, container.get());
    buf
}

/// Update Contained Items (0x3C)
pub fn contained_items(items: &[(Serial, u16, u16)], container: Serial) -> Vec<u8> {
    let mut buf = vec![0u8; 5 + items.len() * 19];
    buf[0] = 0x3c;
    pack_big_u16(&mut buf, 3, items.len() as u16);
    for (i, &(serial, graphic, quantity)) in items.iter().enumerate() {
        let offset = 5 + i * 19;
        pack_big_u32(&mut buf, offset, serial.get());
        pack_big_u16(&mut buf, offset + 4, graphic);
        pack_big_u16(&mut buf, offset + 7, quantity);
        pack_big_u32(&mut buf, offset + 13, container.get());
    }
    with_len(buf)
}

/// Server Equip Item (0x2E)
pub fn equip_item(serial: Serial, graphic: u16, layer: Layer, owner: Serial) -> Vec<u8> {
    let mut buf = vec![0u8; 0x0f];
    buf[0] = 0x2e;
    pack_big_u32(&mut buf, 1, serial.get());
    pack_big_u16(&mut buf, 5, graphic);
    buf[8] = layer.get();
    pack_big_u32(&mut buf, 9, owner.get());
    buf
}

/// Target Data (0x6C) as the server sends it
pub fn target_request(cursor_id: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 0x13];
    buf[0] = 0x6c;
    pack_big_u32(&mut buf, 2, cursor_id);
    buf
}

/// Target Data (0x6C) as the client answers, picking an object
pub fn target_object(cursor_id: u32, serial: Serial) -> Vec<u8> {
    let mut buf = target_request(cursor_id);
    pack_big_u32(&mut buf, 7, serial.get());
    buf
}

/// Vendor Buy List (0x74)
pub fn vendor_buy_list(container: Serial, entries: &[(u32, &str)]) -> Vec<u8> {
    let mut buf = vec![0x74, 0, 0];
    buf.extend_from_slice(&container.get().to_be_bytes());
    buf.push(entries.len() as u8);
    for (price, name) in entries {
        buf.extend_from_slice(&price.to_be_bytes());
        buf.push(name.len() as u8);
        buf.extend_from_slice(name.as_bytes());
    }
    with_len(buf)
}

/// Open Container (0x24)
pub fn open_container(serial: Serial, gump: u16) -> Vec<u8> {
    let mut buf = vec![0u8; 7];
    buf[0] = 0x24;
    pack_big_u32(&mut buf, 1, serial.get());
    pack_big_u16(&mut buf, 5, gump);
    buf
}

/// Open Menu Gump (0x7C)
pub fn menu_gump(question: &str, items: &[&str]) -> Vec<u8> {
    let mut buf = vec![0x7c, 0, 0];
    buf.extend_from_slice(&0x0102_0304u32.to_be_bytes());
    buf.extend_from_slice(&0x0009u16.to_be_bytes());
    buf.push(question.len() as u8);
    buf.extend_from_slice(question.as_bytes());
    buf.push(items.len() as u8);
    for (i, text) in items.iter().enumerate() {
        buf.extend_from_slice(&(0x1000 + i as u16).to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.push(text.len() as u8);
        buf.extend_from_slice(text.as_bytes());
    }
    with_len(buf)
}
