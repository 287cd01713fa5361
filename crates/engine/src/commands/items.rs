//! Commands that move or inspect items
//!
//! Most of these ask the user to target something and finish in a
//! continuation.

use crate::engine::Engine;
use crate::gumps::gump_from_graphic;
use bytes::BytesMut;
use uoinject_core::{Layer, Serial};
use uoinject_protocol::{build_delete_object, build_open_container};

impl Engine {
    fn worn_on(&self, layer: Layer) -> Option<Serial> {
        let session = self.session.as_ref()?;
        session.world.find_layer(session.player(), layer).map(|obj| obj.serial)
    }

    /// Quantity to pick up so the whole stack moves
    fn stack_size(&self, serial: Serial) -> u16 {
        self.session
            .as_ref()
            .and_then(|session| session.world.find(serial))
            .map_or(1, |obj| obj.quantity.max(1))
    }

    pub(super) fn command_dismount(&mut self) {
        match self.worn_on(Layer::MOUNT) {
            Some(mount) => {
                self.client_print("Moving mount to backpack.");
                self.move_backpack(mount);
            }
            None => self.client_print("You are not on a mount."),
        }
    }

    pub(super) fn command_mount(&mut self) {
        if self.worn_on(Layer::MOUNT).is_some() {
            self.client_print("You are already on a mount.");
            return;
        }
        self.client_print("Target a mount item.");
        self.request_target(|engine, target| match target {
            Some(serial) => {
                engine.client_print("Equipping object.");
                engine.move_equip(serial, Layer::MOUNT);
            }
            None => engine.client_print("Cancelled mount targetting."),
        });
    }

    pub(super) fn command_snoop(&mut self) {
        self.client_print("Target a container.");
        self.request_target(|engine, target| {
            let Some(serial) = target else {
                engine.client_print("Cancelled snoop targetting.");
                return;
            };
            let graphic = engine
                .session
                .as_ref()
                .and_then(|session| session.world.find(serial))
                .map_or(0, |obj| obj.graphic);
            engine.client_print("Opening container.");
            tracing::debug!("Snooping {} graphic {:#06x}", serial, graphic);
            let mut out = BytesMut::new();
            build_open_container(&mut out, serial, gump_from_graphic(graphic));
            engine.send_client(&out);
        });
    }

    pub(super) fn command_info(&mut self) {
        self.client_print("Target an object for information.");
        self.request_target(|engine, target| {
            let Some(serial) = target else {
                engine.client_print("Cancelled info targetting.");
                return;
            };
            let description = engine
                .session
                .as_ref()
                .and_then(|session| session.world.find(serial))
                .map(|obj| {
                    format!(
                        "Serial: 0x{:08X}  Graphic: 0x{:04X}  Quantity: {}  Colour: 0x{:04X}",
                        obj.serial.get(),
                        obj.graphic,
                        obj.quantity,
                        obj.colour
                    )
                });
            if let Some(description) = description {
                engine.client_print(&description);
            }
        });
    }

    /// Remove an object from the client's view only
    pub(super) fn command_hide(&mut self) {
        self.client_print("Target an object to hide.");
        self.request_target(|engine, target| match target {
            Some(serial) => {
                let mut out = BytesMut::new();
                build_delete_object(&mut out, serial);
                engine.send_client(&out);
            }
            None => engine.client_print("Cancelled 'hide' targetting."),
        });
    }

    fn set_receiving_container(&mut self, serial: Serial) {
        if let Some(session) = self.session.as_mut() {
            session.receiving_container = Some(serial);
        }
        self.client_print(&format!("Receiving container set: 0x{:08X}", serial.get()));
    }

    pub(super) fn command_setreceivingcontainer(&mut self, args: &[String]) {
        match args.len() {
            1 => {
                self.client_print("Target container to place items into from the emptycontainer command.");
                self.request_target(|engine, target| match target {
                    Some(serial) => engine.set_receiving_container(serial),
                    None => engine.client_print("Cancelled 'settargetcontainer' targetting."),
                });
            }
            2 => {
                let serial = self.resolve_object(&args[1]);
                if let Some(serial) = self.report(serial) {
                    self.set_receiving_container(serial);
                }
            }
            _ => self.client_print("Usage: setreceivingcontainer [object]"),
        }
    }

    pub(super) fn command_unsetreceivingcontainer(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.receiving_container = None;
        }
        self.client_print("Receiving container unset: 0x00000000");
    }

    /// Move everything in a targeted container to the receiving container
    ///
    /// The pause argument is remembered for callers that pace the moves;
    /// the moves themselves are sent at once.
    pub(super) fn command_emptycontainer(&mut self, args: &[String]) {
        let pause = match args {
            [_, pause] => pause.parse::<u64>().ok(),
            _ => None,
        };
        let Some(pause) = pause else {
            self.client_print("usage: emptycontainer (pause in milisecs)");
            self.client_print("example: 'emptycontainer 500'   pauses 1/2 sec between moves");
            return;
        };
        if let Some(session) = self.session.as_mut() {
            session.empty_pause_ms = pause;
        }

        self.client_print("Target container to empty.");
        self.request_target(|engine, target| {
            let Some(container) = target else {
                return;
            };
            let Some(session) = engine.session.as_ref() else {
                return;
            };
            let destination = session.destination();
            let moves: Vec<(Serial, u16)> = session
                .world
                .contents(container)
                .into_iter()
                .filter(|obj| obj.serial != destination)
                .map(|obj| (obj.serial, obj.quantity.max(1)))
                .collect();
            tracing::debug!("Emptying {} items from {} into {}", moves.len(), container, destination);
            for (serial, quantity) in moves {
                engine.move_container(serial, quantity, destination);
            }
        });
    }

    pub(super) fn command_grab(&mut self) {
        self.client_print("Target object to grab.");
        self.request_target(|engine, target| {
            let Some(serial) = target else {
                return;
            };
            let Some(destination) = engine.session.as_ref().map(|session| session.destination()) else {
                return;
            };
            let quantity = engine.stack_size(serial);
            engine.move_container(serial, quantity, destination);
        });
    }

    fn set_catchbag(&mut self, serial: Serial) {
        if let Some(session) = self.session.as_mut() {
            session.catchbag = Some(serial);
        }
        self.client_print(&format!("Catchbag set: 0x{:08X}", serial.get()));
    }

    pub(super) fn command_setcatchbag(&mut self, args: &[String]) {
        match args.len() {
            1 => {
                self.client_print("Target container to catch items that fall into backpack.");
                self.request_target(|engine, target| match target {
                    Some(serial) => engine.set_catchbag(serial),
                    None => engine.client_print("Cancelled 'setcatchbag' targetting."),
                });
            }
            2 => {
                let serial = self.resolve_object(&args[1]);
                if let Some(serial) = self.report(serial) {
                    self.set_catchbag(serial);
                }
            }
            _ => self.client_print("Usage: setcatchbag [object]"),
        }
    }

    pub(super) fn command_unsetcatchbag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.catchbag = None;
        }
        self.client_print("Catchbag unset.");
    }
}
