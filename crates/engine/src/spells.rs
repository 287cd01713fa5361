//! # Spells and Skills
//!
//! Name tables for `cast` and `useskill`. Names match ignoring case and
//! spaces, so `greaterheal` finds "Greater Heal".

use crate::engine::Engine;
use bytes::BytesMut;
use uoinject_core::Serial;
use uoinject_protocol::{build_perform_action, ACTION_CAST_SPELL, ACTION_USE_SKILL};

/// The magery spells, in spellbook order from 1
pub const SPELLS: [&str; 64] = [
    "Clumsy", "Create Food", "Feeblemind", "Heal", "Magic Arrow", "Night Sight", "Reactive Armor", "Weaken",
    "Agility", "Cunning", "Cure", "Harm", "Magic Trap", "Magic Untrap", "Protection", "Strength",
    "Bless", "Fireball", "Magic Lock", "Poison", "Telekinesis", "Teleport", "Unlock", "Wall of Stone",
    "Arch Cure", "Arch Protection", "Curse", "Fire Field", "Greater Heal", "Lightning", "Mana Drain", "Recall",
    "Blade Spirits", "Dispel Field", "Incognito", "Magic Reflection", "Mind Blast", "Paralyze", "Poison Field",
    "Summon Creature",
    "Dispel", "Energy Bolt", "Explosion", "Invisibility", "Mark", "Mass Curse", "Paralyze Field", "Reveal",
    "Chain Lightning", "Energy Field", "Flamestrike", "Gate Travel", "Mana Vampire", "Mass Dispel", "Meteor Swarm",
    "Polymorph",
    "Earthquake", "Energy Vortex", "Resurrection", "Air Elemental", "Summon Daemon", "Earth Elemental",
    "Fire Elemental", "Water Elemental",
];

/// The skills, indexed by skill id
pub const SKILLS: [&str; 49] = [
    "Alchemy", "Anatomy", "Animal Lore", "Item Identification", "Arms Lore", "Parrying", "Begging", "Blacksmithy",
    "Bowcraft", "Peacemaking", "Camping", "Carpentry", "Cartography", "Cooking", "Detecting Hidden", "Enticement",
    "Evaluating Intelligence", "Healing", "Fishing", "Forensic Evaluation", "Herding", "Hiding", "Provocation",
    "Inscription", "Lockpicking", "Magery", "Resisting Spells", "Tactics", "Snooping", "Musicianship", "Poisoning",
    "Archery", "Spirit Speak", "Stealing", "Tailoring", "Animal Taming", "Taste Identification", "Tinkering",
    "Tracking", "Veterinary", "Swordsmanship", "Mace Fighting", "Fencing", "Wrestling", "Lumberjacking", "Mining",
    "Meditation", "Stealth", "Remove Trap",
];

fn normalise(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn find_name(table: &[&str], name: &str) -> Option<usize> {
    let wanted = normalise(name);
    table.iter().position(|entry| normalise(entry) == wanted)
}

/// Spell number (1..=64) of a spell name
pub fn spell_number(name: &str) -> Option<u16> {
    find_name(&SPELLS, name).map(|index| index as u16 + 1)
}

/// Skill id of a skill name
pub fn skill_id(name: &str) -> Option<u16> {
    find_name(&SKILLS, name).map(|index| index as u16)
}

impl Engine {
    /// Cast a spell, answering its target cursor with `target` if given
    pub fn cast(&mut self, spell: &str, target: Option<Serial>) {
        let Some(number) = spell_number(spell) else {
            self.client_print(&format!("Unknown spell: {}", spell));
            return;
        };
        if let Some(target) = target {
            self.wait_target(target);
        }
        tracing::debug!("Casting {} ({})", spell, number);
        let mut out = BytesMut::new();
        build_perform_action(&mut out, ACTION_CAST_SPELL, &number.to_string());
        self.send_server(&out);
    }

    /// Use a skill, answering up to two target cursors
    pub fn use_skill(&mut self, skill: &str, targets: &[Serial]) {
        let Some(id) = skill_id(skill) else {
            self.client_print(&format!("Unknown skill: {}", skill));
            return;
        };
        for &target in targets.iter().take(2) {
            self.wait_target(target);
        }
        tracing::debug!("Using skill {} ({})", skill, id);
        let mut out = BytesMut::new();
        build_perform_action(&mut out, ACTION_USE_SKILL, &format!("{} 0", id));
        self.send_server(&out);
    }
}
