//! # Command Interpreter
//!
//! Text commands typed as `,name args...` in the client's chat line or
//! bound to hotkeys. Every command checks its own arguments and reports
//! misuse to the user; nothing here fails towards the protocol layer.
//!
//! ## Modules
//!
//! - `resolve` - Graphic, colour and object argument lookup
//! - `targets` - Using and targeting items by type or name
//! - `items` - Moving and inspecting items and containers

mod items;
mod resolve;
mod targets;

pub use resolve::{parse_colour, LookupError};

use crate::engine::{Engine, PRODUCT_NAME, USE_DISTANCE, VERSION};
use bytes::BytesMut;
use std::io::Write;
use uoinject_config::{DressKind, ServerFlag};
use uoinject_core::Layer;
use uoinject_protocol::build_global_light;

/// Brightest and darkest light levels
const LIGHT_RANGE: std::ops::RangeInclusive<u8> = 0..=31;

/// Split a command line into words
///
/// Words are separated by spaces. A word starting with `'` runs to the
/// next `'` and may contain spaces; the quotes are dropped. An unclosed
/// quote runs to the end of the line.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        let (word, remainder) = match rest.strip_prefix('\'') {
            Some(quoted) => match quoted.find('\'') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            },
            None => match rest.find(' ') {
                Some(end) => (&rest[..end], &rest[end + 1..]),
                None => (rest, ""),
            },
        };
        // A lone quote at the end of the line yields nothing
        if !(word.is_empty() && remainder.is_empty() && rest == "'") {
            words.push(word.to_string());
        }
        rest = remainder;
    }
    words
}

impl Engine {
    /// Run one command line
    ///
    /// Commands need a character in the world; outside a session they are
    /// ignored.
    pub fn run_command(&mut self, text: &str) {
        if self.session.is_none() {
            tracing::debug!("Ignoring command outside a session: {}", text);
            return;
        }
        let args = tokenize(text);
        let Some(name) = args.first() else {
            self.client_print("Error: empty command");
            return;
        };
        tracing::debug!("Command: {:?}", args);

        match name.as_str() {
            "fixwalk" => self.toggle_flag(ServerFlag::FixWalk, "fixwalk is now on", "fixwalk is now off"),
            "filterweather" => self.toggle_flag(ServerFlag::FilterWeather, "weather is now off", "weather is now on"),
            "fixtalk" => self.toggle_flag(ServerFlag::FixTalk, "fixtalk is now on", "fixtalk is now off"),
            "dump" => self.command_dump(),
            "flush" => self.command_flush(),
            "usetype" => self.command_usetype(&args),
            "usefromground" => self.command_usefromground(&args),
            "useobject" => self.command_useobject(&args),
            "waittargettype" => self.command_waittargettype(&args),
            "waittargetground" => self.command_waittargetground(&args),
            "waittargetobject" => self.command_waittargetobject(&args),
            "waittargetobjecttype" => self.command_waittargetobjecttype(&args),
            "waittargetlast" => self.command_waittargetlast(&args),
            "waittargetself" => self.command_waittargetself(&args),
            "canceltarget" => self.cancel_target(),
            "setarm" => self.command_dress_set(&args, DressKind::Arm, "setarm"),
            "unsetarm" => self.command_dress_set(&args, DressKind::Arm, "unsetarm"),
            "arm" => self.command_dress_set(&args, DressKind::Arm, "arm"),
            "disarm" => self.remove_dress(DressKind::Arm, args.get(1).map(String::as_str)),
            "setdress" => self.command_dress_set(&args, DressKind::Dress, "setdress"),
            "unsetdress" => self.command_dress_set(&args, DressKind::Dress, "unsetdress"),
            "dress" => self.command_dress_set(&args, DressKind::Dress, "dress"),
            "undress" => self.remove_dress(DressKind::Dress, args.get(1).map(String::as_str)),
            "removehat" => self.remove_layer(Layer::HAT),
            "removeearrings" => self.remove_layer(Layer::EARRINGS),
            "removeneckless" => self.remove_layer(Layer::NECK),
            "removering" => self.remove_layer(Layer::RING),
            "dismount" => self.command_dismount(),
            "mount" => self.command_mount(),
            "waitmenu" => self.command_waitmenu(&args),
            "cancelmenu" => self.cancel_menu(),
            "buy" => self.command_shopping(&args, true),
            "sell" => self.command_shopping(&args, false),
            "shop" => self.shop(),
            "light" => self.command_light(&args),
            "saveconfig" => self.command_saveconfig(),
            "version" => self.client_print(&format!("{} version: {}", PRODUCT_NAME, VERSION)),
            "dye" => self.command_dye(&args),
            "snoop" => self.command_snoop(),
            "info" => self.command_info(),
            "hide" => self.command_hide(),
            "setreceivingcontainer" => self.command_setreceivingcontainer(&args),
            "unsetreceivingcontainer" => self.command_unsetreceivingcontainer(),
            "emptycontainer" => self.command_emptycontainer(&args),
            "grab" => self.command_grab(),
            "cast" => self.command_cast(&args),
            "setcatchbag" => self.command_setcatchbag(&args),
            "unsetcatchbag" => self.command_unsetcatchbag(),
            "bandageself" => self.command_bandageself(&args),
            "useskill" => self.command_useskill(&args),
            "poison" => self.command_poison(&args),
            "fixhotkeys" => self.command_fixhotkeys(&args),
            _ => {
                if !self.run_extension(text) {
                    self.client_print(&format!("Unknown command: {}", name));
                }
            }
        }
    }

    /// Number of items of a type the player carries
    ///
    /// # Returns
    /// The count, or -3 outside a session, -1 for an unknown use name,
    /// -2 for a bad graphic and -4 for a bad colour
    pub fn count_object_type(&self, name: &str, colour: Option<&str>) -> i32 {
        let Some(session) = self.session.as_ref() else {
            return -3;
        };
        match self.resolve_count_args(name, colour) {
            Ok((graphic, colour)) => session.world.count_inventory_graphic(graphic, colour) as i32,
            Err(err) => err.code(),
        }
    }

    /// Number of items of a type lying within reach
    ///
    /// Same result codes as [`Engine::count_object_type`].
    pub fn count_on_ground(&self, name: &str, colour: Option<&str>) -> i32 {
        let Some(session) = self.session.as_ref() else {
            return -3;
        };
        match self.resolve_count_args(name, colour) {
            Ok((graphic, colour)) => session.world.count_on_ground(graphic, colour, USE_DISTANCE) as i32,
            Err(err) => err.code(),
        }
    }

    fn resolve_count_args(&self, name: &str, colour: Option<&str>) -> Result<(u16, Option<u16>), LookupError> {
        let graphic = self.resolve_graphic(name)?;
        let colour = colour.map(parse_colour).transpose()?;
        Ok((graphic, colour))
    }

    fn toggle_flag(&mut self, flag: ServerFlag, on: &str, off: &str) {
        let Some(server) = self.login.server.clone() else {
            return;
        };
        let enabled = self.config.toggle_server_flag(&server, flag);
        self.client_print(if enabled { on } else { off });
    }

    fn command_dump(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match session.world.dump() {
            Ok(json) => tracing::info!("World dump: {}", json),
            Err(err) => tracing::warn!("World dump failed: {}", err),
        }
    }

    fn command_flush(&mut self) {
        // Flush failures leave nothing to report to
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        self.client_print("Log flushed.");
    }

    fn command_dress_set(&mut self, args: &[String], kind: DressKind, command: &str) {
        if args.len() != 2 {
            self.client_print(&format!("usage: {} (identifier)", command));
            return;
        }
        let name = args[1].as_str();
        match command {
            "setarm" | "setdress" => self.save_dress(kind, name),
            "unsetarm" | "unsetdress" => self.forget_dress(kind, name),
            _ => self.wear_dress(kind, name),
        }
    }

    fn command_waitmenu(&mut self, args: &[String]) {
        if !matches!(args.len(), 3 | 5 | 7) {
            self.client_print("Usage: waitmenu 'prompt' 'choice' ['prompt2' 'choice2' ['prompt3' 'choice3'] ]");
            return;
        }
        let pairs = args[1..]
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        self.wait_menu(pairs);
    }

    fn command_shopping(&mut self, args: &[String], buying: bool) {
        if !(2..=3).contains(&args.len()) {
            let command = if buying { "buy" } else { "sell" };
            self.client_print(&format!("usage: {} (shopping list name) [vendor name]", command));
            return;
        }
        let vendor = args.get(2).map(String::as_str);
        if buying {
            self.buy(&args[1], vendor);
        } else {
            self.sell(&args[1], vendor);
        }
    }

    /// `light` toggles between normal and brightest; `light n` fixes it
    fn command_light(&mut self, args: &[String]) {
        let Some(character) = self.character().cloned() else {
            return;
        };
        if args.len() > 2 {
            self.client_print("usage: light [amount]");
            return;
        }

        let fixed = match args.get(1) {
            None => match self.config.light(&character) {
                None => Some(*LIGHT_RANGE.start()),
                Some(_) => None,
            },
            Some(amount) => match amount.parse::<u8>() {
                Ok(level) if LIGHT_RANGE.contains(&level) => Some(level),
                _ => {
                    self.client_print("Light amount must be 0 to 31");
                    return;
                }
            },
        };

        match fixed {
            Some(_) => self.client_print("Light level permanently fixed"),
            None => self.client_print("Light level returned to normal"),
        }
        self.config.set_light(&character, fixed);
        let level = fixed.unwrap_or(self.normal_light);
        tracing::debug!("Global light level set to {}", level);
        let mut out = BytesMut::new();
        build_global_light(&mut out, level);
        self.send_client(&out);
    }

    fn command_saveconfig(&mut self) {
        match self.config.save() {
            Ok(()) => self.client_print("Configuration saved."),
            Err(err) => {
                tracing::error!("Saving configuration failed: {}", err);
                self.client_print(&format!("Error: {}", err));
            }
        }
    }

    fn command_dye(&mut self, args: &[String]) {
        if args.len() != 2 {
            self.client_print("usage: dye (colour number)");
            return;
        }
        match uoinject_config::parse_number(&args[1]) {
            Some(colour) if colour < 0xffff => {
                self.client_print("Waiting for dye window...");
                self.dye_colour = Some(colour as u16);
            }
            _ => self.client_print("Invalid colour number"),
        }
    }

    fn command_fixhotkeys(&mut self, args: &[String]) {
        if args.len() != 1 {
            self.client_print("Usage: fixhotkeys");
            return;
        }
        let Some(character) = self.character().cloned() else {
            return;
        };
        let hotkeys = self.config.hotkeys(&character);
        tracing::debug!("Reloaded {} hotkeys", hotkeys.len());
        if let Some(session) = self.session.as_mut() {
            session.hotkeys = hotkeys;
        }
    }
}
