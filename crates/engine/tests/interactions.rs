//! Target cursors, menus, vendors and container handling

mod common;

use common::*;
use uoinject_core::Serial;
use uoinject_protocol::{read_cstr, unpack_big_u16, unpack_big_u32, INVALID_XY};

const PEBBLE: Serial = Serial(0x4000_0050);

fn with_pebble() -> Harness {
    let mut h = Harness::in_world("");
    h.server(&mut ground_item(PEBBLE, 0x0eed, 1001, 2000));
    h.wire.clear();
    h
}

/// Serials answered to the server's cursors, in order
fn target_answers(h: &Harness) -> Vec<u32> {
    h.wire.recorded().server_messages(0x6c).iter().map(|msg| unpack_big_u32(msg, 7)).collect()
}

/// (item, quantity, destination) of every move sent to the server
fn moves(h: &Harness) -> Vec<(u32, u16, u32)> {
    h.wire
        .recorded()
        .server_messages(0x07)
        .iter()
        .map(|msg| (unpack_big_u32(msg, 1), unpack_big_u16(msg, 5), unpack_big_u32(msg, 17)))
        .collect()
}

#[test]
fn test_queued_target_answers_server_cursor() {
    let mut h = Harness::in_world("");
    h.say(",waittargetself");
    assert!(!h.server(&mut target_request(0x55)));

    let reply = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 2), 0x55);
    assert_eq!(unpack_big_u32(&reply, 7), PLAYER.get());
    assert!(h.wire.recorded().client_messages(0x6c).is_empty());

    // Queue drained, the next cursor reaches the client
    assert!(h.server(&mut target_request(0x56)));
}

#[test]
fn test_missing_type_cancels_next_cursor() {
    let mut h = Harness::in_world("");
    h.say(",waittargettype 0x1111");
    assert_eq!(h.printed(), vec!["No item found. Next target request will be canceled"]);

    assert!(!h.server(&mut target_request(5)));
    let reply = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 2), 5);
    assert_eq!(unpack_big_u32(&reply, 7), 0);
    assert_eq!(unpack_big_u16(&reply, 11), INVALID_XY);
    assert_eq!(unpack_big_u16(&reply, 13), INVALID_XY);
}

#[test]
fn test_waittargetground_finds_nearby_item() {
    let mut h = with_pebble();
    h.say(",waittargetground 0x0eed");
    h.server(&mut target_request(5));
    assert_eq!(target_answers(&h), vec![PEBBLE.get()]);
}

#[test]
fn test_queued_targets_answer_in_order() {
    let mut h = Harness::in_world("");
    h.say(",waittargetobject 0x40000001 0x40000002");
    h.server(&mut target_request(1));
    h.server(&mut target_request(2));
    assert_eq!(target_answers(&h), vec![0x4000_0001, 0x4000_0002]);

    h.say(",waittargetobject 0x40000001 cow");
    h.say(",waittargetobject");
    assert_eq!(
        h.printed(),
        vec![
            "Object name unknown",
            "Usage: waittargetobject (object) [object2]",
            "Where object is a registered object name or serial 0x........",
            "Where object2 is optionally a registered object name or serial 0x........",
        ]
    );
    // Nothing was queued by the failed command
    assert!(h.server(&mut target_request(3)));
}

#[test]
fn test_waittargetobjecttype_queues_both() {
    let mut h = Harness::in_world("use.bandage = 0x0e21");
    h.equip_backpack();
    h.server(&mut contained_item(Serial(0x4000_0010), 0x0e21, 5, BACKPACK));
    h.wire.clear();

    h.say(",waittargetobjecttype 0x00000042 bandage");
    h.server(&mut target_request(1));
    h.server(&mut target_request(2));
    assert_eq!(target_answers(&h), vec![0x42, 0x4000_0010]);
}

#[test]
fn test_last_target_follows_user() {
    let mut h = Harness::in_world("");
    h.say(",waittargetlast");
    assert_eq!(h.printed(), vec!["No last target available"]);

    assert!(h.server(&mut target_request(1)));
    assert!(h.client(&mut target_object(1, Serial(0x4000_0077))));
    assert_eq!(h.engine.session().unwrap().last_target(), Some(Serial(0x4000_0077)));

    // Targeting oneself does not count
    h.server(&mut target_request(2));
    h.client(&mut target_object(2, PLAYER));
    assert_eq!(h.engine.session().unwrap().last_target(), Some(Serial(0x4000_0077)));

    h.wire.clear();
    h.say(",waittargetlast");
    h.server(&mut target_request(3));
    assert_eq!(target_answers(&h), vec![0x4000_0077]);
}

#[test]
fn test_canceltarget_empties_queue() {
    let mut h = Harness::in_world("");
    h.say(",waittargetself");
    h.say(",canceltarget");
    assert!(h.server(&mut target_request(1)));
    assert!(target_answers(&h).is_empty());
}

#[test]
fn test_info_reports_object() {
    let mut h = with_pebble();
    h.say(",info");
    let request = h.wire.recorded().client_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&request, 2), PLAYER.get());

    // Our own cursor's answer never reaches the server
    assert!(!h.client(&mut target_object(PLAYER.get(), PEBBLE)));
    assert_eq!(
        h.printed(),
        vec![
            "Target an object for information.",
            "Serial: 0x40000050  Graphic: 0x0EED  Quantity: 0  Colour: 0x0000"
        ]
    );
    assert!(h.wire.recorded().to_server.is_empty());
}

#[test]
fn test_info_cancelled() {
    let mut h = with_pebble();
    h.say(",info");
    assert!(!h.client(&mut target_object(PLAYER.get(), Serial::NONE)));
    assert_eq!(h.printed(), vec!["Target an object for information.", "Cancelled info targetting."]);
}

#[test]
fn test_new_request_cancels_waiting_one() {
    let mut h = with_pebble();
    h.say(",info");
    h.say(",hide");
    assert_eq!(
        h.printed(),
        vec!["Target an object for information.", "Target an object to hide.", "Cancelled info targetting."]
    );

    h.client(&mut target_object(PLAYER.get(), PEBBLE));
    assert_eq!(h.wire.recorded().client_messages(0x1d), vec![&[0x1du8, 0x40, 0x00, 0x00, 0x50][..]]);
    // Hidden from the client only
    assert!(h.engine.session().unwrap().world().find(PEBBLE).is_some());
}

#[test]
fn test_server_cursor_cancels_waiting_request() {
    let mut h = with_pebble();
    h.say(",info");
    assert!(h.server(&mut target_request(9)));
    assert_eq!(h.printed(), vec!["Target an object for information.", "Cancelled info targetting."]);
}

#[test]
fn test_own_cursor_replaces_server_cursor() {
    let mut h = with_pebble();
    let mut request = target_request(0x77);
    assert!(h.server(&mut request));
    assert_eq!(request, target_request(0x77));
    h.say(",info");

    // The server's cursor is cancelled before ours is shown
    let cancel = h.wire.recorded().server_messages(0x6c)[0].to_vec();
    assert_eq!(unpack_big_u32(&cancel, 2), 0x77);
    assert_eq!(unpack_big_u32(&cancel, 7), 0);
    assert_eq!(unpack_big_u16(&cancel, 11), INVALID_XY);
    assert_eq!(h.wire.recorded().client_messages(0x6c).len(), 1);
}

#[test]
fn test_snoop_opens_container() {
    let mut h = Harness::in_world("");
    let bag = Serial(0x4000_0800);
    h.server(&mut ground_item(bag, 0x0e76, 1000, 2001));
    h.say(",snoop");
    h.client(&mut target_object(PLAYER.get(), bag));
    assert_eq!(h.printed(), vec!["Target a container.", "Opening container."]);
    assert_eq!(
        h.wire.recorded().client_messages(0x24),
        vec![&[0x24u8, 0x40, 0x00, 0x08, 0x00, 0x00, 0x3d][..]]
    );
}

#[test]
fn test_catchbag_moves_backpack_drops_once() {
    let mut h = Harness::in_world("");
    h.equip_backpack();
    let catchbag = Serial(0x4000_0500);
    h.server(&mut contained_item(catchbag, 0x0e76, 0, BACKPACK));
    h.say(",setcatchbag 0x40000500");
    assert_eq!(h.printed(), vec!["Catchbag set: 0x40000500"]);

    let ore = Serial(0x4000_0600);
    h.server(&mut contained_item(ore, 0x19b9, 50, BACKPACK));
    h.server(&mut contained_item(ore, 0x19b9, 50, BACKPACK));
    // Things arriving elsewhere, and the bag itself, stay put
    h.server(&mut contained_item(Serial(0x4000_0601), 0x19b9, 5, Serial(0x4000_0700)));
    h.server(&mut contained_item(catchbag, 0x0e76, 0, BACKPACK));
    assert_eq!(moves(&h), vec![(ore.get(), 50, catchbag.get())]);

    h.say(",unsetcatchbag");
    h.server(&mut contained_item(Serial(0x4000_0602), 0x19b9, 5, BACKPACK));
    assert_eq!(moves(&h).len(), 1);
    assert_eq!(h.printed().last().map(String::as_str), Some("Catchbag unset."));
}

#[test]
fn test_grab_uses_receiving_container() {
    let mut h = with_pebble();
    h.say(",setreceivingcontainer 0x40000777");
    h.say(",grab");
    h.client(&mut target_object(PLAYER.get(), PEBBLE));
    assert_eq!(moves(&h), vec![(PEBBLE.get(), 1, 0x4000_0777)]);

    h.say(",unsetreceivingcontainer");
    h.say(",grab");
    h.client(&mut target_object(PLAYER.get(), PEBBLE));
    assert_eq!(moves(&h)[1], (PEBBLE.get(), 1, PLAYER.get()));
    assert_eq!(
        h.printed(),
        vec![
            "Receiving container set: 0x40000777",
            "Target object to grab.",
            "Receiving container unset: 0x00000000",
            "Target object to grab.",
        ]
    );
}

#[test]
fn test_setreceivingcontainer_by_target() {
    let mut h = Harness::in_world("");
    h.say(",setreceivingcontainer");
    h.client(&mut target_object(PLAYER.get(), Serial(0x4000_0900)));
    assert_eq!(h.engine.session().unwrap().receiving_container(), Some(Serial(0x4000_0900)));
}

#[test]
fn test_emptycontainer_moves_contents() {
    let mut h = Harness::in_world("");
    let chest = Serial(0x4000_0800);
    h.server(&mut contained_items(
        &[(Serial(0x4000_0801), 0x0eed, 100), (Serial(0x4000_0802), 0x0f0e, 0)],
        chest,
    ));
    h.say(",emptycontainer soon");
    h.say(",emptycontainer 250");
    h.client(&mut target_object(PLAYER.get(), chest));
    assert_eq!(
        moves(&h),
        vec![(0x4000_0801, 100, PLAYER.get()), (0x4000_0802, 1, PLAYER.get())]
    );
    assert_eq!(
        h.printed(),
        vec![
            "usage: emptycontainer (pause in milisecs)",
            "example: 'emptycontainer 500'   pauses 1/2 sec between moves",
            "Target container to empty.",
        ]
    );
}

#[test]
fn test_menu_answered_by_prefix() {
    let mut h = Harness::in_world("");
    h.say(",waitmenu 'what do' 'leather g'");
    let menu = || menu_gump("What do you want to make?", &["Leather Cap", "Leather Gloves", "Leather Tunic"]);
    assert!(!h.server(&mut menu()));

    let choice = h.wire.recorded().server_messages(0x7d)[0].to_vec();
    assert_eq!(choice.len(), 13);
    assert_eq!(unpack_big_u32(&choice, 1), 0x0102_0304);
    assert_eq!(unpack_big_u16(&choice, 5), 9);
    assert_eq!(unpack_big_u16(&choice, 7), 2);
    assert_eq!(unpack_big_u16(&choice, 9), 0x1001);

    // One answer per pair
    assert!(h.server(&mut menu()));
}

#[test]
fn test_menu_pairs_in_order() {
    let mut h = Harness::in_world("");
    h.say(",waitmenu 'Pick a' 'wood' 'Pick b' 'stone'");
    // Another menu first: shown, and the queue waits
    assert!(h.server(&mut menu_gump("Pick b", &["stone"])));
    assert!(!h.server(&mut menu_gump("Pick a", &["iron", "wood"])));
    assert!(!h.server(&mut menu_gump("Pick b", &["stone"])));
    let indexes: Vec<u16> = h.wire.recorded().server_messages(0x7d).iter().map(|m| unpack_big_u16(m, 7)).collect();
    assert_eq!(indexes, vec![2, 1]);
}

#[test]
fn test_menu_without_choice_is_shown() {
    let mut h = Harness::in_world("");
    h.say(",waitmenu 'What' 'bone'");
    assert!(h.server(&mut menu_gump("What do you want to make?", &["Leather Cap"])));
    assert_eq!(h.printed(), vec!["Menu item 'bone' not found in 'What do you want to make?'"]);
    // The queue was dropped
    assert!(h.server(&mut menu_gump("What do you want to make?", &["bone armor"])));
}

#[test]
fn test_cancelmenu_and_usage() {
    let mut h = Harness::in_world("");
    h.say(",waitmenu 'What' 'Leather'");
    h.say(",cancelmenu");
    assert!(h.server(&mut menu_gump("What do you want to make?", &["Leather Cap"])));
    h.say(",waitmenu 'What'");
    assert_eq!(
        h.printed(),
        vec!["Usage: waitmenu 'prompt' 'choice' ['prompt2' 'choice2' ['prompt3' 'choice3'] ]"]
    );
}

#[test]
fn test_vendor_buy() {
    let mut h = Harness::in_world("shop.regs = 5 Garlic; all Ginseng; 2 Nightshade");
    let stock = Serial(0x4000_0900);
    let vendor = Serial(0x0000_0777);
    h.server(&mut contained_items(
        &[(Serial(0x4000_0901), 0x0f84, 10), (Serial(0x4000_0902), 0x0f85, 3)],
        stock,
    ));

    h.say(",buy regs");
    let speech = h.wire.recorded().server_messages(0x03)[0].to_vec();
    assert_eq!(read_cstr(&speech, 8), "vendor buy");
    h.wire.clear();

    assert!(h.server(&mut vendor_buy_list(stock, &[(3, "Garlic"), (4, "Ginseng")])));
    assert!(!h.server(&mut open_container(vendor, 0x30)));

    let reply = h.wire.recorded().server_messages(0x3b)[0].to_vec();
    assert_eq!(unpack_big_u16(&reply, 1) as usize, reply.len());
    assert_eq!(unpack_big_u32(&reply, 3), vendor.get());
    assert_eq!(reply[7], 0x02);
    assert_eq!((reply[8], unpack_big_u32(&reply, 9), unpack_big_u16(&reply, 13)), (0x1a, 0x4000_0901, 5));
    assert_eq!((unpack_big_u32(&reply, 16), unpack_big_u16(&reply, 20)), (0x4000_0902, 3));
    assert_eq!(
        h.printed(),
        vec![
            "Bought 5/5 of 'Garlic'",
            "Bought 3/3 of 'Ginseng'",
            "Bought 0/2 of 'Nightshade'",
            "Total cost: 27 gp"
        ]
    );

    // The trip is over, the next vendor window is left alone
    assert!(h.server(&mut open_container(vendor, 0x30)));
}

#[test]
fn test_vendor_buy_names_vendor() {
    let mut h = Harness::in_world("shop.regs = 5 Garlic");
    h.say(",buy regs Lucy");
    h.say(",buy nothing");
    let speech = h.wire.recorded().server_messages(0x03)[0].to_vec();
    assert_eq!(read_cstr(&speech, 8), "Lucy buy");
    assert_eq!(h.printed(), vec!["Shopping list 'nothing' not found"]);
}

#[test]
fn test_vendor_sell_and_shop() {
    let mut h = Harness::in_world("shop.loot = all Hides; 5 Feathers");
    let vendor = Serial(0x0000_0777);
    h.say(",sell loot");
    h.wire.clear();

    let mut list = vec![0x9e, 0, 0];
    list.extend_from_slice(&vendor.get().to_be_bytes());
    list.extend_from_slice(&2u16.to_be_bytes());
    for (serial, amount, price, name) in [(0x4000_0a01u32, 20u16, 2u16, "Hides"), (0x4000_0a02, 3, 1, "Feathers")] {
        list.extend_from_slice(&serial.to_be_bytes());
        list.extend_from_slice(&0x1079u16.to_be_bytes());
        list.extend_from_slice(&0u16.to_be_bytes());
        list.extend_from_slice(&amount.to_be_bytes());
        list.extend_from_slice(&price.to_be_bytes());
        list.extend_from_slice(&(name.len() as u16).to_be_bytes());
        list.extend_from_slice(name.as_bytes());
    }
    let len = list.len() as u16;
    list[1..3].copy_from_slice(&len.to_be_bytes());

    assert!(!h.server(&mut list.clone()));
    let reply = h.wire.recorded().server_messages(0x9f)[0].to_vec();
    assert_eq!(unpack_big_u32(&reply, 3), vendor.get());
    assert_eq!(unpack_big_u16(&reply, 7), 2);
    assert_eq!((unpack_big_u32(&reply, 9), unpack_big_u16(&reply, 13)), (0x4000_0a01, 20));
    assert_eq!((unpack_big_u32(&reply, 15), unpack_big_u16(&reply, 19)), (0x4000_0a02, 3));
    assert_eq!(h.printed(), vec!["Sold 20/20 of 'Hides'", "Sold 3/5 of 'Feathers'", "Total: 43 gp"]);
    h.wire.clear();

    // Without a trip the list is shown, and remembered for `shop`
    assert!(h.server(&mut list));
    h.say(",shop");
    assert_eq!(h.printed(), vec!["Hides (20): 2 gp", "Feathers (3): 1 gp"]);
}
