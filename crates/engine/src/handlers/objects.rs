//! World model updates
//!
//! Server messages describing characters and items. Every one of them
//! may name serials never seen before; those are created on the spot.

use crate::engine::Engine;
use crate::session::Session;
use uoinject_core::{CharacterKey, Layer, Serial};
use uoinject_protocol::{
    build_global_light, unpack_big_u32, CharacterStatusPacket, ContainedItem, ContainerContentsPacket,
    EnterWorldPacket, EquipItemPacket, GroundItemPacket, MobilePacket, UpdatePlayerPacket, VitalUpdatePacket,
};
use uoinject_world::World;

use bytes::BytesMut;

/// Which of the three vitals a 0xA1..=0xA3 message carries
#[derive(Debug, Clone, Copy)]
enum Vital {
    Hits,
    Mana,
    Stamina,
}

fn apply_contained(world: &mut World, item: &ContainedItem) {
    if !item.serial.is_valid() || !item.container.is_valid() {
        tracing::warn!("Ignoring contained item {} in {}", item.serial, item.container);
        return;
    }
    let obj = world.get_or_create(item.serial);
    obj.graphic = item.graphic;
    obj.quantity = item.quantity;
    obj.position.x = item.x;
    obj.position.y = item.y;
    obj.colour = item.colour;
    world.put_container(item.serial, item.container);
}

impl Engine {
    /// Enter World (0x1B): starts the session
    pub(crate) fn handle_enter_world(&mut self, buf: &mut [u8]) -> bool {
        let packet = EnterWorldPacket::parse(buf);

        let character = match (self.login.server.as_ref(), self.login.account.as_ref()) {
            (Some(server), Some(account)) => Some(CharacterKey::new(server.clone(), account.clone(), packet.serial)),
            _ => {
                tracing::error!("Entered world with unknown account");
                None
            }
        };

        let mut light = None;
        match self.session.as_mut() {
            Some(session) => {
                tracing::warn!("Duplicate enter world for {}", packet.serial);
                if session.player() != packet.serial {
                    session.world.set_player(packet.serial);
                }
            }
            None => {
                let mut session = Session::new(packet.serial, character.clone());
                if let Some(key) = character.as_ref() {
                    session.hotkeys = self.config.hotkeys(key);
                    light = self.config.light(key);
                }
                self.presentation.connected(character.as_ref());
                self.session = Some(session);
            }
        }

        if let Some(session) = self.session.as_mut() {
            let player = session.world.player_mut();
            player.graphic = packet.graphic;
            player.position = packet.position;
            player.direction = packet.direction;
        }

        if let Some(level) = light {
            let mut out = BytesMut::new();
            build_global_light(&mut out, level);
            self.send_client(&out);
        }
        true
    }

    /// Character Status (0x11)
    ///
    /// Another character's status is only reported to the user; the
    /// player's own status updates the vitals.
    pub(crate) fn handle_character_status(&mut self, buf: &mut [u8]) -> bool {
        let status = match CharacterStatusPacket::parse(buf) {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!("Bad character status: {}", err);
                return true;
            }
        };
        let Some(session) = self.session.as_mut() else {
            return true;
        };

        if status.serial != session.player() {
            self.client_print(&format!("{} has {}/{} hitpoints", status.name, status.hits, status.max_hits));
            return true;
        }

        let vitals = &mut session.vitals;
        vitals.hits = status.hits;
        vitals.max_hits = status.max_hits;
        if let Some(details) = status.details {
            vitals.stamina = details.stamina;
            vitals.max_stamina = details.max_stamina;
            vitals.mana = details.mana;
            vitals.max_mana = details.max_mana;
            vitals.gold = details.gold;
            vitals.armor = details.armor;
            vitals.weight = details.weight;
        }
        self.update_display();
        true
    }

    pub(crate) fn handle_update_hitpoints(&mut self, buf: &mut [u8]) -> bool {
        self.update_vital(Vital::Hits, buf)
    }

    pub(crate) fn handle_update_mana(&mut self, buf: &mut [u8]) -> bool {
        self.update_vital(Vital::Mana, buf)
    }

    pub(crate) fn handle_update_stamina(&mut self, buf: &mut [u8]) -> bool {
        self.update_vital(Vital::Stamina, buf)
    }

    fn update_vital(&mut self, vital: Vital, buf: &[u8]) -> bool {
        let packet = VitalUpdatePacket::parse(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if packet.serial != session.player() {
            return true;
        }

        let vitals = &mut session.vitals;
        let (current, maximum) = match vital {
            Vital::Hits => (&mut vitals.hits, &mut vitals.max_hits),
            Vital::Mana => (&mut vitals.mana, &mut vitals.max_mana),
            Vital::Stamina => (&mut vitals.stamina, &mut vitals.max_stamina),
        };
        *maximum = packet.maximum;
        *current = packet.current;
        tracing::trace!("{:?} {}/{}", vital, packet.current, packet.maximum);
        self.update_display();
        true
    }

    /// Update Item (0x1A): an item on the ground
    pub(crate) fn handle_update_item(&mut self, buf: &mut [u8]) -> bool {
        let packet = match GroundItemPacket::parse(buf) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!("Bad update item: {}", err);
                return true;
            }
        };
        if packet.wire_len != buf.len() {
            tracing::warn!("Update item decoded {} bytes of {}", packet.wire_len, buf.len());
        }
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if !packet.serial.is_valid() {
            tracing::warn!("Ignoring update item for serial 0");
            return true;
        }

        let obj = session.world.get_or_create(packet.serial);
        obj.graphic = packet.graphic;
        obj.position = packet.position;
        if let Some(amount) = packet.amount {
            obj.quantity = amount;
        }
        if let Some(increment) = packet.increment {
            obj.increment = increment as u16;
        }
        if let Some(direction) = packet.direction {
            obj.direction = direction;
        }
        if let Some(colour) = packet.colour {
            obj.colour = colour;
        }
        session.world.put_ground(packet.serial);
        true
    }

    /// Delete Object (0x1D)
    pub(crate) fn handle_delete_object(&mut self, buf: &mut [u8]) -> bool {
        let serial = Serial(unpack_big_u32(buf, 1));
        if let Some(session) = self.session.as_mut() {
            if !session.world.remove(serial) {
                tracing::trace!("Delete of unknown object {}", serial);
            }
        }
        true
    }

    /// Update Player (0x20)
    pub(crate) fn handle_update_player(&mut self, buf: &mut [u8]) -> bool {
        let packet = UpdatePlayerPacket::parse(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if !packet.serial.is_valid() {
            tracing::warn!("Ignoring update player for serial 0");
            return true;
        }
        if packet.serial != session.player() {
            tracing::warn!("Player changed from {} to {}", session.player(), packet.serial);
            session.world.set_player(packet.serial);
        }

        let player = session.world.player_mut();
        player.graphic = packet.graphic;
        player.colour = packet.colour;
        player.position = packet.position;
        player.direction = packet.direction;
        true
    }

    /// Update Contained Item (0x25)
    ///
    /// Also where the catch bag acts: an item landing in the player's
    /// backpack is moved on into the catch bag.
    pub(crate) fn handle_update_contained_item(&mut self, buf: &mut [u8]) -> bool {
        let item = ContainedItem::parse_single(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        apply_contained(&mut session.world, &item);

        let Some(catchbag) = session.catchbag else {
            return true;
        };
        let backpack = session.world.find_layer(session.player(), Layer::BACKPACK).map(|obj| obj.serial);
        if backpack != Some(item.container) || item.serial == session.last_caught || item.serial == catchbag {
            return true;
        }
        session.last_caught = item.serial;
        tracing::debug!("Catch bag takes {}", item.serial);
        self.move_container(item.serial, item.quantity.max(1), catchbag);
        true
    }

    /// Update Contained Items (0x3C): a container's full contents
    pub(crate) fn handle_update_contained_items(&mut self, buf: &mut [u8]) -> bool {
        let packet = match ContainerContentsPacket::parse(buf) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!("Bad container contents: {}", err);
                return true;
            }
        };
        if packet.wire_len != buf.len() {
            tracing::warn!("Container contents decoded {} bytes of {}", packet.wire_len, buf.len());
        }
        if let Some(session) = self.session.as_mut() {
            for item in &packet.items {
                apply_contained(&mut session.world, item);
            }
        }
        true
    }

    /// Server Equip Item (0x2E)
    ///
    /// Only the player's equipment and shopkeepers' stock layers are
    /// tracked.
    pub(crate) fn handle_server_equip_item(&mut self, buf: &mut [u8]) -> bool {
        let packet = EquipItemPacket::parse(buf);
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if !packet.layer.is_vendor() && packet.owner != session.player() {
            return true;
        }
        if !packet.serial.is_valid() || !packet.owner.is_valid() {
            tracing::warn!("Ignoring equip of {} on {}", packet.serial, packet.owner);
            return true;
        }

        let obj = session.world.get_or_create(packet.serial);
        obj.graphic = packet.graphic;
        obj.colour = packet.colour;
        session.world.put_equipment(packet.serial, packet.owner, packet.layer);
        true
    }

    /// Update Object (0x78): a mobile and what it wears
    ///
    /// Only the player's own description is kept.
    pub(crate) fn handle_update_object(&mut self, buf: &mut [u8]) -> bool {
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        let player = session.player();
        if Serial(unpack_big_u32(buf, 3)) != player {
            return true;
        }

        let packet = match MobilePacket::parse(buf) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!("Bad update object: {}", err);
                return true;
            }
        };
        if packet.wire_len != buf.len() {
            tracing::warn!("Update object decoded {} bytes of {}", packet.wire_len, buf.len());
        }

        let obj = session.world.player_mut();
        obj.graphic = packet.graphic;
        if let Some(quantity) = packet.quantity {
            obj.quantity = quantity;
        }
        if let Some(increment) = packet.increment {
            obj.increment = increment;
        }
        obj.position = packet.position;
        obj.direction = packet.direction;
        obj.colour = packet.colour;
        obj.notoriety = packet.notoriety;

        for worn in &packet.equipment {
            let item = session.world.get_or_create(worn.serial);
            item.graphic = worn.graphic;
            if let Some(colour) = worn.colour {
                item.colour = colour;
            }
            session.world.put_equipment(worn.serial, player, worn.layer);
        }
        true
    }
}
