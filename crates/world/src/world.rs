//! # World
//!
//! Serial-keyed store of every object seen during a session.
//!
//! Objects are created implicitly: any message naming an unknown serial
//! materialises a blank object, since the server does not always send a
//! creation message before referring to something. Containment and
//! equipment form a tree rooted at free objects; each parent keeps an
//! ordered list of its children so that walks are deterministic.
//!
//! Distances use the Chebyshev metric, see [`Position::distance_to`].

use crate::object::{GameObject, Relation};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uoinject_core::{Layer, Position, Serial};

/// The object graph of one session
#[derive(Debug, Clone)]
pub struct World {
    /// All objects
    /// Key: serial, Value: object
    objects: HashMap<Serial, GameObject>,

    /// The character the user controls
    player: Serial,
}

impl World {
    /// Create a world holding only the player
    ///
    /// # Arguments
    /// * `player` - Serial from the Enter World message
    pub fn new(player: Serial) -> Self {
        tracing::debug!("Creating world for player {}", player);

        let mut objects = HashMap::new();
        objects.insert(player, GameObject::new(player));
        Self { objects, player }
    }

    /// Look up an object, creating a blank one if it is unknown
    ///
    /// Calling this twice with the same serial yields the same object.
    pub fn get_or_create(&mut self, serial: Serial) -> &mut GameObject {
        self.objects.entry(serial).or_insert_with(|| GameObject::new(serial))
    }

    /// Look up an object without creating it
    pub fn find(&self, serial: Serial) -> Option<&GameObject> {
        self.objects.get(&serial)
    }

    pub fn find_mut(&mut self, serial: Serial) -> Option<&mut GameObject> {
        self.objects.get_mut(&serial)
    }

    /// Number of known objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove an object together with everything inside it or worn by it
    ///
    /// # Returns
    /// `false` if the object was unknown or is the player, which is never
    /// removed.
    pub fn remove(&mut self, serial: Serial) -> bool {
        if serial == self.player {
            tracing::warn!("Refusing to remove the player {}", serial);
            return false;
        }
        let Some(obj) = self.objects.get(&serial) else {
            return false;
        };
        if let Some(parent) = obj.relation.parent() {
            self.detach_child(parent, serial);
        }

        let mut pending = vec![serial];
        while let Some(next) = pending.pop() {
            // The player can end up below a removed object only through a
            // malformed stream; keep it and cut it loose instead.
            if next == self.player {
                if let Some(player) = self.objects.get_mut(&next) {
                    player.relation = Relation::Free;
                }
                continue;
            }
            if let Some(removed) = self.objects.remove(&next) {
                tracing::trace!("Removed object {}", next);
                pending.extend(removed.children);
            }
        }
        true
    }

    /// Change which object is the player
    ///
    /// The previous player stays in the world as an ordinary object.
    pub fn set_player(&mut self, serial: Serial) {
        self.get_or_create(serial);
        self.player = serial;
    }

    pub fn player_serial(&self) -> Serial {
        self.player
    }

    /// The player object
    ///
    /// Always present: the world creates it and never removes it.
    pub fn player(&self) -> Option<&GameObject> {
        self.objects.get(&self.player)
    }

    pub fn player_mut(&mut self) -> &mut GameObject {
        let player = self.player;
        self.get_or_create(player)
    }

    pub fn player_position(&self) -> Position {
        self.player().map(|player| player.position).unwrap_or_default()
    }

    /// Place an object inside a container, dropping any equipment relation
    pub fn put_container(&mut self, serial: Serial, container: Serial) {
        self.relate(serial, Relation::Container(container));
    }

    /// Equip an object on a character, dropping any container relation
    ///
    /// Whatever the owner already wore on that layer is removed: a layer
    /// holds one item.
    pub fn put_equipment(&mut self, serial: Serial, owner: Serial, layer: Layer) {
        let displaced = self
            .find_layer(owner, layer)
            .map(|obj| obj.serial)
            .filter(|&previous| previous != serial);
        if let Some(previous) = displaced {
            tracing::debug!("{} replaces {} on layer {:#04x}", serial, previous, layer.get());
            self.remove(previous);
        }
        self.relate(serial, Relation::Equipped { owner, layer });
    }

    /// Put an object on the ground, dropping any container or equipment relation
    pub fn put_ground(&mut self, serial: Serial) {
        let previous = self.get_or_create(serial).relation;
        if let Some(parent) = previous.parent() {
            self.detach_child(parent, serial);
        }
        self.get_or_create(serial).relation = Relation::Free;
    }

    fn relate(&mut self, serial: Serial, relation: Relation) {
        let Some(parent) = relation.parent() else {
            return;
        };
        if !serial.is_valid() {
            tracing::warn!("Ignoring relation for serial 0");
            return;
        }
        if !parent.is_valid() {
            tracing::warn!("{} placed under serial 0, leaving it free", serial);
            self.put_ground(serial);
            return;
        }
        if parent == serial {
            tracing::warn!("Ignoring attempt to place {} inside itself", serial);
            return;
        }

        let previous = self.get_or_create(serial).relation;
        if let Some(old_parent) = previous.parent() {
            self.detach_child(old_parent, serial);
        }
        self.get_or_create(serial).relation = relation;
        let parent_obj = self.get_or_create(parent);
        if !parent_obj.children.contains(&serial) {
            parent_obj.children.push(serial);
        }
    }

    fn detach_child(&mut self, parent: Serial, child: Serial) {
        if let Some(parent_obj) = self.objects.get_mut(&parent) {
            parent_obj.children.retain(|&serial| serial != child);
        }
    }

    /// Item worn by `owner` on `layer`
    pub fn find_layer(&self, owner: Serial, layer: Layer) -> Option<&GameObject> {
        self.find(owner)?
            .children
            .iter()
            .filter_map(|serial| self.find(*serial))
            .find(|obj| obj.layer() == Some(layer))
    }

    /// Everything directly inside or worn by `serial`, in arrival order
    pub fn contents(&self, serial: Serial) -> Vec<&GameObject> {
        self.find(serial)
            .map(|obj| obj.children.iter().filter_map(|child| self.find(*child)).collect())
            .unwrap_or_default()
    }

    /// Everything the player carries or wears, at any depth
    ///
    /// Depth-first in arrival order, so the first match of a query is
    /// stable for a given message history.
    pub fn inventory(&self) -> Vec<&GameObject> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(self.player);
        let mut stack: Vec<Serial> = match self.player() {
            Some(player) => player.children.iter().rev().copied().collect(),
            None => return found,
        };
        while let Some(serial) = stack.pop() {
            if !visited.insert(serial) {
                continue;
            }
            if let Some(obj) = self.find(serial) {
                found.push(obj);
                stack.extend(obj.children.iter().rev().copied());
            }
        }
        found
    }

    /// First item in the player's possession with the graphic (and colour)
    pub fn find_inventory_graphic(&self, graphic: u16, colour: Option<u16>) -> Option<&GameObject> {
        self.inventory().into_iter().find(|obj| obj.matches(graphic, colour))
    }

    /// Total quantity the player carries of a graphic (and colour)
    pub fn count_inventory_graphic(&self, graphic: u16, colour: Option<u16>) -> u32 {
        self.inventory()
            .into_iter()
            .filter(|obj| obj.matches(graphic, colour))
            .map(GameObject::count)
            .sum()
    }

    /// Free objects other than the player within `max_distance` tiles
    fn on_ground(&self, graphic: u16, colour: Option<u16>, max_distance: u16) -> impl Iterator<Item = &GameObject> {
        let origin = self.player_position();
        let player = self.player;
        self.objects.values().filter(move |obj| {
            obj.serial != player
                && obj.relation == Relation::Free
                && obj.matches(graphic, colour)
                && origin.in_range(obj.position, max_distance)
        })
    }

    /// Nearest matching object lying on the ground within range
    ///
    /// Ties are broken by the lower serial.
    pub fn find_world_graphic(&self, graphic: u16, colour: Option<u16>, max_distance: u16) -> Option<&GameObject> {
        let origin = self.player_position();
        self.on_ground(graphic, colour, max_distance)
            .min_by_key(|obj| (origin.distance_to(obj.position), obj.serial))
    }

    /// Total quantity of a graphic (and colour) on the ground within range
    pub fn count_on_ground(&self, graphic: u16, colour: Option<u16>, max_distance: u16) -> u32 {
        self.on_ground(graphic, colour, max_distance).map(GameObject::count).sum()
    }

    /// Serialise the whole world for diagnostics, objects sorted by serial
    pub fn dump(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Dump<'a> {
            player: Serial,
            objects: Vec<&'a GameObject>,
        }

        let mut objects: Vec<&GameObject> = self.objects.values().collect();
        objects.sort_by_key(|obj| obj.serial);
        serde_json::to_string_pretty(&Dump { player: self.player, objects })
    }
}
