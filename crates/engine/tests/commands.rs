//! Text commands typed by the user

mod common;

use common::*;
use parking_lot::Mutex;
use std::sync::Arc;
use uoinject_config::{DressKind, ServerFlag};
use uoinject_core::{Layer, Serial};
use uoinject_engine::{CommandExtension, PRODUCT_NAME, VERSION};
use uoinject_protocol::{read_cstr, unpack_big_u16, unpack_big_u32};

const BANDAGES: Serial = Serial(0x4000_0010);

fn with_bandages(config: &str) -> Harness {
    let mut h = Harness::in_world(config);
    h.equip_backpack();
    h.server(&mut contained_item(BANDAGES, 0x0e21, 12, BACKPACK));
    h.wire.clear();
    h
}

#[test]
fn test_command_is_not_sent_to_server() {
    let mut h = Harness::in_world("");
    assert!(!h.say(",version"));
    assert_eq!(h.printed(), vec![format!("{} version: {}", PRODUCT_NAME, VERSION)]);
    assert!(h.wire.recorded().to_server.is_empty());

    // Ordinary speech passes
    assert!(h.say("hail"));
}

#[test]
fn test_empty_and_unknown_commands() {
    let mut h = Harness::in_world("");
    h.say(",");
    h.say(",frobnicate now");
    assert_eq!(h.printed(), vec!["Error: empty command", "Unknown command: frobnicate"]);
}

struct Recorder(Arc<Mutex<Vec<String>>>);

impl CommandExtension for Recorder {
    fn handle_command(&mut self, text: &str) -> bool {
        self.0.lock().push(text.to_string());
        text.starts_with("custom")
    }
}

#[test]
fn test_unknown_commands_reach_extension() {
    let mut h = Harness::in_world("");
    let seen = Arc::new(Mutex::new(Vec::new()));
    h.engine.set_command_extension(Box::new(Recorder(seen.clone())));

    h.say(",custom 1 2");
    h.say(",other");
    assert_eq!(*seen.lock(), vec!["custom 1 2", "other"]);
    assert_eq!(h.printed(), vec!["Unknown command: other"]);
}

#[test]
fn test_commands_outside_session_are_ignored() {
    let mut h = Harness::new("");
    h.login();
    assert!(!h.say(",version"));
    assert!(h.printed().is_empty());
}

#[test]
fn test_fixwalk_trims_walk_requests() {
    let mut h = Harness::in_world("");
    let mut walk = [0x02, 0x01, 0x05, 0xaa, 0xbb, 0xcc, 0xdd];
    assert!(h.client(&mut walk));

    h.say(",fixwalk");
    assert_eq!(h.printed(), vec!["fixwalk is now on"]);
    assert!(h.config.server_flag(SHARD, ServerFlag::FixWalk));
    h.wire.clear();

    assert!(!h.client(&mut walk));
    assert_eq!(h.wire.recorded().to_server, vec![vec![0x02u8, 0x01, 0x05]]);

    h.say(",fixwalk");
    assert_eq!(h.printed(), vec!["fixwalk is now off"]);
}

#[test]
fn test_filterweather_drops_weather() {
    let mut h = Harness::in_world("");
    let mut weather = [0x65, 0x01, 0x0a, 0x00];
    assert!(h.server(&mut weather));

    h.say(",filterweather");
    assert!(!h.server(&mut weather));
    h.say(",filterweather");
    assert!(h.server(&mut weather));
    assert_eq!(h.printed(), vec!["weather is now off", "weather is now on"]);
}

#[test]
fn test_fixtalk_downgrades_unicode_speech() {
    let mut h = Harness::in_world("server.Shard.fixtalk = true");
    let mut speech = vec![0xad, 0, 0, 0x00, 0x00, 0x34, 0x00, 0x03, b'E', b'N', b'U', 0];
    for ch in "hi".encode_utf16() {
        speech.extend_from_slice(&ch.to_be_bytes());
    }
    speech.extend_from_slice(&[0, 0]);
    let len = speech.len() as u16;
    speech[1..3].copy_from_slice(&len.to_be_bytes());

    assert!(!h.client(&mut speech));
    let sent = h.wire.recorded().server_messages(0x03)[0].to_vec();
    assert_eq!(unpack_big_u16(&sent, 4), 0x0034);
    assert_eq!(read_cstr(&sent, 8), "hi");
}

#[test]
fn test_unicode_speech_runs_commands() {
    let mut h = Harness::in_world("");
    let mut speech = vec![0xad, 0, 0, 0x00, 0x00, 0x34, 0x00, 0x03, b'E', b'N', b'U', 0];
    for ch in ",version".encode_utf16() {
        speech.extend_from_slice(&ch.to_be_bytes());
    }
    speech.extend_from_slice(&[0, 0]);
    let len = speech.len() as u16;
    speech[1..3].copy_from_slice(&len.to_be_bytes());

    assert!(!h.client(&mut speech));
    assert_eq!(h.printed().len(), 1);
}

#[test]
fn test_usetype_finds_carried_items() {
    let mut h = with_bandages("use.bandage = 0x0e21");
    h.say(",usetype bandage");
    assert_eq!(h.wire.recorded().to_server, vec![vec![0x06u8, 0x40, 0x00, 0x00, 0x10]]);

    h.say(",usetype 0x1111");
    h.say(",usetype rope");
    h.say(",usetype bandage 1153");
    h.say(",usetype 0xzz");
    h.say(",usetype bandage 0x0481");
    assert_eq!(
        h.printed(),
        vec![
            "No item found.",
            "Graphic name unknown",
            "Invalid color index",
            "Invalid graphic index",
            "No item found."
        ]
    );
    assert_eq!(h.wire.recorded().server_messages(0x06).len(), 1);
}

#[test]
fn test_usetype_usage() {
    let mut h = Harness::in_world("");
    h.say(",usetype");
    assert_eq!(
        h.printed(),
        vec![
            "Usage: usetype (type) [color]",
            "Where type is a registered name or a graphic 0x....",
            "and optionally color is the hex value of the color ex: 0x....",
        ]
    );
}

#[test]
fn test_usefromground_stays_within_reach() {
    let mut h = Harness::in_world("");
    h.server(&mut ground_item(Serial(0x4000_0060), 0x0eed, 1010, 2000));
    h.server(&mut ground_item(Serial(0x4000_0050), 0x0eed, 1001, 2001));
    h.say(",usefromground 0x0eed");
    assert_eq!(h.wire.recorded().server_messages(0x06), vec![&[0x06u8, 0x40, 0x00, 0x00, 0x50][..]]);

    h.server(&mut ground_item(Serial(0x4000_0050), 0x0eed, 1005, 2001));
    h.say(",usefromground 0x0eed");
    assert_eq!(h.printed(), vec!["No item found."]);
}

#[test]
fn test_useobject_by_alias() {
    let mut h = Harness::in_world("character.Shard.bob.0x00001234.object.horse = 0x00005555");
    h.say(",useobject horse");
    h.say(",useobject 0x00000042");
    h.say(",useobject cow");
    let clicks = h.wire.recorded().server_messages(0x06).iter().map(|m| unpack_big_u32(m, 1)).collect::<Vec<_>>();
    assert_eq!(clicks, vec![0x5555, 0x42]);
    assert_eq!(h.printed(), vec!["Object name unknown"]);
}

#[test]
fn test_count_queries() {
    let mut h = with_bandages("use.bandage = 0x0e21");
    let pouch = Serial(0x4000_0030);
    h.server(&mut contained_item(pouch, 0x0e79, 0, BACKPACK));
    h.server(&mut contained_item(Serial(0x4000_0031), 0x0e21, 0, pouch));
    h.server(&mut ground_item(Serial(0x4000_0032), 0x0e21, 1000, 2002));

    assert_eq!(h.engine.count_object_type("bandage", None), 13);
    assert_eq!(h.engine.count_object_type("0x0e21", Some("0x0000")), 13);
    assert_eq!(h.engine.count_object_type("0x0e21", Some("0x0481")), 0);
    assert_eq!(h.engine.count_on_ground("bandage", None), 1);

    assert_eq!(h.engine.count_object_type("rope", None), -1);
    assert_eq!(h.engine.count_object_type("0xzz", None), -2);
    assert_eq!(h.engine.count_object_type("bandage", Some("12")), -4);

    h.engine.disconnected();
    assert_eq!(h.engine.count_object_type("bandage", None), -3);
    assert_eq!(h.engine.count_on_ground("bandage", None), -3);
}

#[test]
fn test_light_fixes_and_restores() {
    let mut h = Harness::in_world("");
    assert!(h.server(&mut [0x4f, 20]));
    h.wire.clear();

    h.say(",light 5");
    assert_eq!(h.wire.recorded().client_messages(0x4f), vec![&[0x4fu8, 5][..]]);
    // The server's light is hidden while fixed
    assert!(!h.server(&mut [0x4f, 18]));
    h.wire.clear();

    h.say(",light");
    assert_eq!(h.wire.recorded().client_messages(0x4f), vec![&[0x4fu8, 18][..]]);
    assert!(h.server(&mut [0x4f, 18]));

    h.say(",light");
    h.say(",light 40");
    h.say(",light 1 2");
    assert_eq!(
        h.printed(),
        vec![
            "Light level returned to normal",
            "Light level permanently fixed",
            "Light amount must be 0 to 31",
            "usage: light [amount]"
        ]
    );
    let character = h.engine.session().unwrap().character().unwrap().clone();
    assert_eq!(h.config.light(&character), Some(0));
}

#[test]
fn test_fixed_light_applies_on_enter_world() {
    let mut h = Harness::new("character.Shard.bob.0x00001234.light = 3");
    h.login();
    h.server(&mut enter_world(PLAYER));
    assert_eq!(h.wire.recorded().client_messages(0x4f), vec![&[0x4fu8, 3][..]]);
}

#[test]
fn test_dye_overrides_next_dye_request() {
    let mut h = Harness::in_world("");
    h.say(",dye red");
    h.say(",dye 0x0481");
    assert_eq!(h.printed(), vec!["Invalid colour number", "Waiting for dye window..."]);
    h.wire.clear();

    let mut request = [0x95, 0x40, 0x00, 0x00, 0x60, 0x00, 0x00, 0x0f, 0xab];
    assert!(!h.server(&mut request));
    let sent = &h.wire.recorded().to_server[0];
    assert_eq!(unpack_big_u16(sent, 5), 0x0fab);
    assert_eq!(unpack_big_u16(sent, 7), 0x0481);
    assert_eq!(h.printed(), vec!["Dye colour overridden."]);

    // Only the next dye tub is affected
    assert!(h.server(&mut request));
}

#[test]
fn test_hotkeys_run_commands() {
    let mut h = Harness::in_world("character.Shard.bob.0x00001234.hotkey.F1 = waittargetself");
    assert!(h.engine.run_hotkey("F1"));
    assert!(!h.engine.run_hotkey("F2"));

    assert!(!h.server(&mut target_request(0x99)));
    let reply = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 2), 0x99);
    assert_eq!(unpack_big_u32(&reply, 7), PLAYER.get());
}

#[test]
fn test_fixhotkeys_reloads_bindings() {
    let mut h = Harness::in_world("");
    let character = h.engine.session().unwrap().character().unwrap().clone();
    h.config.set_hotkey(&character, "F2", "version").unwrap();
    assert!(!h.engine.run_hotkey("F2"));

    h.say(",fixhotkeys");
    assert!(h.engine.run_hotkey("F2"));
    h.say(",fixhotkeys now");
    assert_eq!(h.printed().last().map(String::as_str), Some("Usage: fixhotkeys"));
}

#[test]
fn test_dress_sets() {
    let mut h = Harness::in_world("");
    h.equip_backpack();
    h.server(&mut equip_item(Serial(0x4000_0020), 0x1715, Layer::HAT, PLAYER));
    h.server(&mut equip_item(Serial(0x4000_0021), 0x1517, Layer(0x05), PLAYER));
    h.server(&mut equip_item(Serial(0x4000_0022), 0x0f5e, Layer::RIGHT_HAND, PLAYER));

    h.say(",setdress town");
    h.say(",setarm fight");
    h.say(",setdress");
    assert_eq!(
        h.printed(),
        vec![
            "Dress set 'town' saved with 2 items.",
            "Arm set 'fight' saved with 1 items.",
            "usage: setdress (identifier)"
        ]
    );
    let character = h.engine.session().unwrap().character().unwrap().clone();
    assert_eq!(
        h.config.dress(&character, DressKind::Arm, "fight"),
        Some(vec![(Layer::RIGHT_HAND, Serial(0x4000_0022))])
    );
    h.wire.clear();

    h.say(",undress");
    let moved: Vec<u32> = h.wire.recorded().server_messages(0x07).iter().map(|m| unpack_big_u32(m, 1)).collect();
    assert_eq!(moved, vec![0x4000_0020, 0x4000_0021]);
    let drop = h.wire.recorded().server_messages(0x07)[0].to_vec();
    assert_eq!(unpack_big_u32(&drop, 17), PLAYER.get());
    h.wire.clear();

    h.say(",removering");
    h.say(",unsetdress town");
    h.say(",dress town");
    assert_eq!(
        h.printed(),
        vec!["Nothing worn there.", "Dress set 'town' removed.", "Dress set 'town' not found."]
    );
}

#[test]
fn test_arm_swaps_weapons() {
    let mut h = Harness::in_world("character.Shard.bob.0x00001234.arm.bow = 0x01:0x40000030");
    h.server(&mut equip_item(Serial(0x4000_0022), 0x0f5e, Layer::RIGHT_HAND, PLAYER));
    h.wire.clear();

    h.say(",arm bow");
    let messages = h.wire.recorded().server_messages(0x07).iter().map(|m| m.to_vec()).collect::<Vec<_>>();
    assert_eq!(messages.len(), 2);
    // Sword to the backpack first, then the bow into the hand
    assert_eq!(unpack_big_u32(&messages[0], 1), 0x4000_0022);
    assert_eq!(messages[0][7], 0x08);
    assert_eq!(unpack_big_u32(&messages[1], 1), 0x4000_0030);
    assert_eq!(messages[1][7], 0x13);
    assert_eq!(messages[1][12], Layer::RIGHT_HAND.get());
}

#[test]
fn test_mount_and_dismount() {
    let mut h = Harness::in_world("");
    h.say(",dismount");
    h.say(",mount");
    assert_eq!(h.printed(), vec!["You are not on a mount.", "Target a mount item."]);
    assert_eq!(h.wire.recorded().client_messages(0x6c).len(), 1);
    h.wire.clear();

    assert!(!h.client(&mut target_object(PLAYER.get(), Serial(0x4000_0400))));
    assert_eq!(h.printed(), vec!["Equipping object."]);
    let equip = h.wire.recorded().server_messages(0x07)[0].to_vec();
    assert_eq!(equip[7], 0x13);
    assert_eq!(equip[12], Layer::MOUNT.get());
    h.wire.clear();

    h.server(&mut equip_item(Serial(0x4000_0400), 0x3ea2, Layer::MOUNT, PLAYER));
    h.say(",mount");
    h.say(",dismount");
    assert_eq!(h.printed(), vec!["You are already on a mount.", "Moving mount to backpack."]);
}

#[test]
fn test_cast_and_useskill() {
    let mut h = Harness::in_world("");
    h.say(",cast 'Greater Heal' self");
    let action = h.wire.recorded().server_messages(0x12)[0].to_vec();
    assert_eq!(action[3], 0x56);
    assert_eq!(read_cstr(&action, 4), "29");

    assert!(!h.server(&mut target_request(1)));
    let reply = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 7), PLAYER.get());
    h.wire.clear();

    h.say(",useskill hiding");
    let action = h.wire.recorded().server_messages(0x12)[0].to_vec();
    assert_eq!(action[3], 0x24);
    assert_eq!(read_cstr(&action, 4), "21 0");

    h.say(",cast heal last");
    h.say(",cast fireball bogus");
    h.say(",cast Nope");
    h.say(",useskill Necromancy");
    h.say(",cast");
    assert_eq!(
        h.printed(),
        vec![
            "No Last Target available",
            "Object name unknown",
            "Unknown spell: Nope",
            "Unknown skill: Necromancy",
            "Usage: cast (spell name) [last or self or object]"
        ]
    );
}

#[test]
fn test_poison_uses_bottle_then_object() {
    let mut h = with_bandages("use.poison = 0x0f0a\ncharacter.Shard.bob.0x00001234.object.blade = 0x40000022");
    h.say(",poison blade");
    assert_eq!(h.printed(), vec!["No poison found in pack."]);

    h.server(&mut contained_item(Serial(0x4000_0040), 0x0f0a, 1, BACKPACK));
    h.wire.clear();
    h.say(",poison blade");
    let action = h.wire.recorded().server_messages(0x12)[0].to_vec();
    assert_eq!(read_cstr(&action, 4), "30 0");

    h.server(&mut target_request(1));
    h.server(&mut target_request(2));
    let answers: Vec<u32> = h.wire.recorded().server_messages(0x6c).iter().map(|m| unpack_big_u32(m, 7)).collect();
    assert_eq!(answers, vec![0x4000_0040, 0x4000_0022]);
}

#[test]
fn test_poison_needs_use_name() {
    let mut h = Harness::in_world("");
    h.say(",poison 0x40000022");
    assert_eq!(h.printed(), vec!["poison not defined in object types"]);
}

#[test]
fn test_bandageself() {
    let mut h = Harness::in_world("");
    h.say(",bandageself");
    assert_eq!(h.printed(), vec!["No bandages found."]);

    let mut h = with_bandages("");
    h.say(",bandageself");
    assert_eq!(h.wire.recorded().server_messages(0x06), vec![&[0x06u8, 0x40, 0x00, 0x00, 0x10][..]]);
    assert_eq!(h.engine.session().unwrap().world().find(BANDAGES).unwrap().quantity, 12);

    h.server(&mut target_request(3));
    let reply = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 7), PLAYER.get());
}

#[test]
fn test_saveconfig_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uoinject.cfg");
    let config = Arc::new(uoinject_config::ConfigManager::load_from_file(&path).unwrap());
    let wire = uoinject_engine::testing::RecordingInterceptor::new();
    let mut engine = uoinject_engine::Engine::new(config, Box::new(wire.clone()), Box::new(()));
    engine.on_inbound_message(&mut enter_world(PLAYER));

    engine.run_command("saveconfig");
    assert_eq!(wire.printed(), vec!["Configuration saved."]);
    assert!(path.exists());
}
