//! # Session
//!
//! Everything that lives from Enter World until disconnect. Dropping the
//! session discards the world and every pending interaction at once.

use crate::menu::MenuQueue;
use crate::targeting::Targeting;
use crate::vendor::VendorState;
use std::collections::BTreeMap;
use uoinject_core::{CharacterKey, Serial};
use uoinject_world::{Vitals, World};

/// Per-connection game state
pub struct Session {
    pub(crate) world: World,
    pub(crate) vitals: Vitals,
    /// Settings key of the character, `None` if the account was not seen
    pub(crate) character: Option<CharacterKey>,
    pub(crate) targeting: Targeting,
    pub(crate) menus: MenuQueue,
    pub(crate) vendor: VendorState,
    /// Hotkey bindings loaded at login or by `fixhotkeys`
    pub(crate) hotkeys: BTreeMap<String, String>,
    pub(crate) catchbag: Option<Serial>,
    /// Last item moved by the catch bag, so it is not moved twice
    pub(crate) last_caught: Serial,
    pub(crate) receiving_container: Option<Serial>,
    /// Requested pause between `emptycontainer` moves
    pub(crate) empty_pause_ms: u64,
}

impl Session {
    /// Start a session for the player named in Enter World
    pub fn new(player: Serial, character: Option<CharacterKey>) -> Self {
        tracing::info!(
            "Session started for {} ({})",
            player,
            character.as_ref().map(ToString::to_string).unwrap_or_else(|| "unknown account".into())
        );

        Self {
            world: World::new(player),
            vitals: Vitals::new(),
            character,
            targeting: Targeting::new(),
            menus: MenuQueue::new(),
            vendor: VendorState::new(),
            hotkeys: BTreeMap::new(),
            catchbag: None,
            last_caught: Serial::NONE,
            receiving_container: None,
            empty_pause_ms: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn character(&self) -> Option<&CharacterKey> {
        self.character.as_ref()
    }

    pub fn player(&self) -> Serial {
        self.world.player_serial()
    }

    /// Last object the user targeted themselves
    pub fn last_target(&self) -> Option<Serial> {
        self.targeting.last_target
    }

    pub fn catchbag(&self) -> Option<Serial> {
        self.catchbag
    }

    pub fn receiving_container(&self) -> Option<Serial> {
        self.receiving_container
    }

    /// Where `emptycontainer` and `grab` put things
    pub(crate) fn destination(&self) -> Serial {
        self.receiving_container.unwrap_or_else(|| self.player())
    }
}
