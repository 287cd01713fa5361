//! # Dress and Arm Sets
//!
//! Named sets of worn items remembered per character: clothing and
//! armour for `dress`, hand layers for `arm`. Putting a set on first moves
//! whatever occupies each layer into the backpack.

use crate::engine::Engine;
use uoinject_config::DressKind;
use uoinject_core::{Layer, Serial};

fn layer_fits(kind: DressKind, layer: Layer) -> bool {
    match kind {
        DressKind::Dress => layer.is_clothing(),
        DressKind::Arm => layer.is_hand(),
    }
}

fn set_word(kind: DressKind) -> &'static str {
    match kind {
        DressKind::Dress => "Dress",
        DressKind::Arm => "Arm",
    }
}

impl Engine {
    /// Items the player currently wears on layers of `kind`
    fn worn(&self, kind: DressKind) -> Vec<(Layer, Serial)> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        session
            .world
            .contents(session.player())
            .into_iter()
            .filter_map(|obj| obj.layer().map(|layer| (layer, obj.serial)))
            .filter(|&(layer, _)| layer_fits(kind, layer))
            .collect()
    }

    /// Remember what the player wears as a named set
    pub fn save_dress(&mut self, kind: DressKind, name: &str) {
        let Some(character) = self.character().cloned() else {
            self.client_print("No character settings available.");
            return;
        };
        let items = self.worn(kind);
        let count = items.len();
        match self.config.set_dress(&character, kind, name, items) {
            Ok(()) => self.client_print(&format!("{} set '{}' saved with {} items.", set_word(kind), name, count)),
            Err(err) => self.client_print(&format!("Error: {}", err)),
        }
    }

    pub fn forget_dress(&mut self, kind: DressKind, name: &str) {
        let Some(character) = self.character().cloned() else {
            return;
        };
        if self.config.remove_dress(&character, kind, name) {
            self.client_print(&format!("{} set '{}' removed.", set_word(kind), name));
        } else {
            self.client_print(&format!("{} set '{}' not found.", set_word(kind), name));
        }
    }

    /// Put on a named set
    pub fn wear_dress(&mut self, kind: DressKind, name: &str) {
        let Some(character) = self.character().cloned() else {
            return;
        };
        let Some(items) = self.config.dress(&character, kind, name) else {
            self.client_print(&format!("{} set '{}' not found.", set_word(kind), name));
            return;
        };

        for (layer, serial) in items {
            let occupant = self.session.as_ref().and_then(|session| {
                session
                    .world
                    .find_layer(session.player(), layer)
                    .map(|obj| obj.serial)
            });
            match occupant {
                Some(current) if current == serial => continue,
                Some(current) => self.move_backpack(current),
                None => {}
            }
            self.move_equip(serial, layer);
        }
    }

    /// Take off a named set, or everything of `kind` when no name is given
    pub fn remove_dress(&mut self, kind: DressKind, name: Option<&str>) {
        let items = match name {
            Some(name) => {
                let Some(character) = self.character().cloned() else {
                    return;
                };
                let Some(set) = self.config.dress(&character, kind, name) else {
                    self.client_print(&format!("{} set '{}' not found.", set_word(kind), name));
                    return;
                };
                let worn = self.worn(kind);
                set.into_iter().filter(|item| worn.contains(item)).collect()
            }
            None => self.worn(kind),
        };
        for (_, serial) in items {
            self.move_backpack(serial);
        }
    }

    /// Move whatever the player wears on `layer` into the backpack
    pub fn remove_layer(&mut self, layer: Layer) {
        let worn = self
            .session
            .as_ref()
            .and_then(|session| session.world.find_layer(session.player(), layer).map(|obj| obj.serial));
        match worn {
            Some(serial) => self.move_backpack(serial),
            None => self.client_print("Nothing worn there."),
        }
    }
}
