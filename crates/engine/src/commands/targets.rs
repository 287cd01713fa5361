//! Using and targeting things by type, name or serial

use super::resolve::LookupError;
use crate::engine::{Engine, USE_DISTANCE};
use bytes::BytesMut;
use uoinject_core::Serial;
use uoinject_protocol::build_double_click;

/// Graphic of a clean bandage
const BANDAGE: u16 = 0x0e21;

const TYPE_USAGE: [&str; 2] = [
    "Where type is a registered name or a graphic 0x....",
    "and optionally color is the hex value of the color ex: 0x....",
];

/// Where to look for an item by type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Inventory,
    Ground,
}

impl Engine {
    fn print_lines(&mut self, lines: &[&str]) {
        for line in lines {
            self.client_print(line);
        }
    }

    fn print_type_usage(&mut self, command: &str) {
        self.client_print(&format!("Usage: {} (type) [color]", command));
        self.print_lines(&TYPE_USAGE);
    }

    /// First item matching a graphic argument and optional colour argument
    ///
    /// # Returns
    /// `Err` when an argument does not resolve, `Ok(None)` when nothing
    /// matches
    fn find_type(&self, scope: Scope, graphic: &str, colour: Option<&String>) -> Result<Option<Serial>, LookupError> {
        let graphic = self.resolve_graphic(graphic)?;
        let colour = Engine::resolve_colour(colour)?;
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };
        let found = match scope {
            Scope::Inventory => session.world.find_inventory_graphic(graphic, colour),
            Scope::Ground => session.world.find_world_graphic(graphic, colour, USE_DISTANCE),
        };
        Ok(found.map(|obj| obj.serial))
    }

    /// Double click an object on the user's behalf
    pub fn use_object(&mut self, serial: Serial) {
        tracing::debug!("Using item {}", serial);
        let mut out = BytesMut::new();
        build_double_click(&mut out, serial);
        self.send_server(&out);
    }

    fn use_type(&mut self, scope: Scope, args: &[String]) {
        let found = self.find_type(scope, &args[1], args.get(2));
        match self.report(found) {
            Some(Some(serial)) => self.use_object(serial),
            Some(None) => self.client_print("No item found."),
            None => {}
        }
    }

    fn target_type(&mut self, scope: Scope, args: &[String]) {
        let found = self.find_type(scope, &args[1], args.get(2));
        match self.report(found) {
            Some(Some(serial)) => {
                tracing::debug!("Targeting item {}", serial);
                self.wait_target(serial);
            }
            Some(None) => {
                self.client_print("No item found. Next target request will be canceled");
                self.wait_target(Serial::NONE);
            }
            None => {}
        }
    }

    pub(super) fn command_usetype(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.print_type_usage("usetype");
            return;
        }
        self.use_type(Scope::Inventory, args);
    }

    pub(super) fn command_usefromground(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.print_type_usage("usefromground");
            return;
        }
        self.use_type(Scope::Ground, args);
    }

    pub(super) fn command_useobject(&mut self, args: &[String]) {
        if args.len() != 2 {
            self.print_lines(&[
                "Usage: useobject (object)",
                "Where object is a registered object name or serial 0x........",
            ]);
            return;
        }
        let serial = self.resolve_object(&args[1]);
        if let Some(serial) = self.report(serial) {
            self.use_object(serial);
        }
    }

    pub(super) fn command_waittargettype(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.print_type_usage("waittargettype");
            return;
        }
        self.target_type(Scope::Inventory, args);
    }

    pub(super) fn command_waittargetground(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.print_type_usage("waittargetground");
            return;
        }
        self.target_type(Scope::Ground, args);
    }

    pub(super) fn command_waittargetobject(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.print_lines(&[
                "Usage: waittargetobject (object) [object2]",
                "Where object is a registered object name or serial 0x........",
                "Where object2 is optionally a registered object name or serial 0x........",
            ]);
            return;
        }
        let targets = args[1..]
            .iter()
            .map(|name| self.resolve_object(name))
            .collect::<Result<Vec<_>, _>>();
        let Some(targets) = self.report(targets) else {
            return;
        };
        tracing::debug!("Targeting objects {:?}", targets);
        for serial in targets {
            self.wait_target(serial);
        }
    }

    pub(super) fn command_waittargetobjecttype(&mut self, args: &[String]) {
        if !(3..=4).contains(&args.len()) {
            self.print_lines(&[
                "Usage: waittargetobjecttype (target) (target2) [color]",
                "Where target is a registered object name or serial 0x........",
                "Where target2 is a registered object type name or serial 0x....",
                "Where color is an optional color index 0x....",
            ]);
            return;
        }
        let first = self.resolve_object(&args[1]);
        let Some(first) = self.report(first) else {
            return;
        };
        let found = self.find_type(Scope::Inventory, &args[2], args.get(3));
        match self.report(found) {
            Some(Some(second)) => self.wait_target2(first, second),
            Some(None) => self.client_print("No item found."),
            None => {}
        }
    }

    pub(super) fn command_waittargetlast(&mut self, args: &[String]) {
        if args.len() != 1 {
            self.client_print("Usage: waittargetlast");
            return;
        }
        match self.session.as_ref().and_then(|session| session.last_target()) {
            Some(serial) => self.wait_target(serial),
            None => self.client_print("No last target available"),
        }
    }

    pub(super) fn command_waittargetself(&mut self, args: &[String]) {
        if args.len() != 1 {
            self.client_print("Usage: waittargetself");
            return;
        }
        if let Some(player) = self.session.as_ref().map(|session| session.player()) {
            self.wait_target(player);
        }
    }

    /// Target of `cast` and `useskill`: an object, `last` or `self`
    ///
    /// A configured object name wins over the words `last` and `self`.
    fn resolve_action_target(&mut self, text: &str) -> Option<Serial> {
        match self.resolve_object(text) {
            Ok(serial) => Some(serial),
            Err(LookupError::UnknownObject) if text == "last" => {
                let last = self.session.as_ref().and_then(|session| session.last_target());
                if last.is_none() {
                    self.client_print("No Last Target available");
                }
                last
            }
            Err(LookupError::UnknownObject) if text == "self" => self.session.as_ref().map(|session| session.player()),
            Err(err) => {
                self.client_print(&err.to_string());
                None
            }
        }
    }

    pub(super) fn command_cast(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.client_print("Usage: cast (spell name) [last or self or object]");
            return;
        }
        let target = match args.get(2) {
            Some(text) => match self.resolve_action_target(text) {
                Some(serial) => Some(serial),
                None => return,
            },
            None => None,
        };
        self.cast(&args[1], target);
    }

    pub(super) fn command_useskill(&mut self, args: &[String]) {
        if !(2..=3).contains(&args.len()) {
            self.client_print("Usage: useskill (skill name) [last or self or object]");
            return;
        }
        let targets = match args.get(2) {
            Some(text) => match self.resolve_action_target(text) {
                Some(serial) => vec![serial],
                None => return,
            },
            None => Vec::new(),
        };
        self.use_skill(&args[1], &targets);
    }

    /// Poison an object with the first poison bottle carried
    pub(super) fn command_poison(&mut self, args: &[String]) {
        if args.len() != 2 {
            self.client_print("Usage: poison (object)");
            return;
        }
        let object = self.resolve_object(&args[1]);
        let Some(object) = self.report(object) else {
            return;
        };
        let Some(graphic) = self.config.find_use("poison") else {
            self.client_print("poison not defined in object types");
            return;
        };
        let bottle = self
            .session
            .as_ref()
            .and_then(|session| session.world.find_inventory_graphic(graphic, None).map(|obj| obj.serial));
        match bottle {
            // The skill asks for the poison first and then what to apply it to
            Some(bottle) => self.use_skill("Poisoning", &[bottle, object]),
            None => self.client_print("No poison found in pack."),
        }
    }

    pub(super) fn command_bandageself(&mut self, args: &[String]) {
        if args.len() != 1 {
            self.client_print("Usage: bandageself");
            return;
        }
        let found = self.session.as_ref().map(|session| {
            let bandage = session.world.find_inventory_graphic(BANDAGE, None).map(|obj| obj.serial);
            (session.player(), bandage)
        });
        match found {
            Some((player, Some(bandage))) => {
                self.wait_target(player);
                self.use_object(bandage);
            }
            Some((_, None)) => self.client_print("No bandages found."),
            None => {}
        }
    }
}
