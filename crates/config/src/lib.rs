//! uoinject Configuration Management
//!
//! Settings the engine consults while running: the client encryption
//! mode, named graphics for the `use` commands, per-shard protocol fixes,
//! per-character aliases, hotkeys, dress sets and light level, and named
//! shopping lists.
//!
//! Settings are stored in a plain `key = value` text file with `#`
//! comments. Keys are dotted paths:
//!
//! ```text
//! encryption = 1.26.4
//! use.bandage = 0x0e21
//! server.Shard.fixwalk = true
//! character.Shard.bob.0x00001234.object.runebook = 0x40001111
//! character.Shard.bob.0x00001234.hotkey.F1 = cast 'Greater Heal' self
//! character.Shard.bob.0x00001234.dress.battle = 0x01:0x40000001,0x02:0x40000002
//! character.Shard.bob.0x00001234.light = 0
//! shop.regs = all Bandage; 10 Black Pearl
//! ```

mod manager;

pub use manager::{ConfigManager, DressKind, ServerFlag};

use std::collections::BTreeMap;
use std::fmt;
use uoinject_core::{CharacterKey, InjectError, Layer, Serial};

/// Configuration failures
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no configuration file to save to")]
    NoPath,
    #[error("invalid name '{0}': use letters, digits, spaces, '_' or '-'")]
    InvalidName(String),
}

impl From<ConfigError> for InjectError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => InjectError::Io(io),
            other => InjectError::Config(other.to_string()),
        }
    }
}

/// Whether a name can be stored as one segment of a dotted key
pub fn valid_key(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == ' ' || ch == '_' || ch == '-')
}

/// Protocol fixes that differ from shard to shard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    /// Strip the trailing 4 bytes some servers reject from walk requests
    pub fixwalk: bool,
    /// Drop weather changes
    pub filter_weather: bool,
    /// Downgrade unicode speech to plain client talk
    pub fixtalk: bool,
}

/// Settings kept per character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSettings {
    /// Named objects
    /// Key: alias, Value: object serial
    pub objects: BTreeMap<String, Serial>,
    /// Key: hotkey name, Value: command text
    pub hotkeys: BTreeMap<String, String>,
    pub dress_sets: BTreeMap<String, Vec<(Layer, Serial)>>,
    pub arm_sets: BTreeMap<String, Vec<(Layer, Serial)>>,
    /// Fixed global light level, `None` while the server decides
    pub light: Option<u8>,
}

/// How many of an item a shopping list asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Want {
    /// Everything the vendor has, or everything the player carries
    All,
    Count(u32),
}

/// One line of a shopping list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    /// Item name as the vendor lists it
    pub name: String,
    pub want: Want,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, want: Want) -> Self {
        Self { name: name.into(), want }
    }

    /// Parse `all Bandage` or `10 Black Pearl`
    pub fn parse(text: &str) -> Option<Self> {
        let (amount, name) = text.trim().split_once(' ')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let want = if amount.eq_ignore_ascii_case("all") {
            Want::All
        } else {
            Want::Count(amount.parse().ok()?)
        };
        Some(Self::new(name, want))
    }
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.want {
            Want::All => write!(f, "all {}", self.name),
            Want::Count(count) => write!(f, "{} {}", count, self.name),
        }
    }
}

/// Everything stored in the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigData {
    /// Raw encryption code, see [`uoinject_core::EncryptionMode`]
    pub encryption: u8,
    /// Key: use name, Value: graphic
    pub uses: BTreeMap<String, u16>,
    /// Key: shard name
    pub servers: BTreeMap<String, ServerSettings>,
    pub characters: BTreeMap<CharacterKey, CharacterSettings>,
    /// Key: list name
    pub shopping_lists: BTreeMap<String, Vec<ShoppingItem>>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            encryption: 0,
            uses: BTreeMap::new(),
            servers: BTreeMap::new(),
            characters: BTreeMap::new(),
            shopping_lists: BTreeMap::new(),
        }
    }
}

/// Parse `0x1234` as hex, anything else as decimal
pub fn parse_number(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn parse_items(value: &str) -> Vec<(Layer, Serial)> {
    value
        .split(',')
        .filter_map(|pair| {
            let (layer, serial) = pair.split_once(':')?;
            let layer = u8::try_from(parse_number(layer)?).ok()?;
            Some((Layer::new(layer), Serial::new(parse_number(serial)?)))
        })
        .collect()
}

fn format_items(items: &[(Layer, Serial)]) -> String {
    items
        .iter()
        .map(|(layer, serial)| format!("0x{:02x}:0x{:08x}", layer.get(), serial.get()))
        .collect::<Vec<_>>()
        .join(",")
}

impl ConfigData {
    /// Parse configuration text
    ///
    /// Unknown keys and malformed values are logged and skipped so that a
    /// hand-edited file never prevents startup.
    pub fn parse(content: &str) -> Self {
        let mut data = Self::default();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    if !data.parse_option(key.trim(), value.trim()) {
                        tracing::warn!("Ignoring config line {}: {}", number + 1, line);
                    }
                }
                None => tracing::warn!("Config line {} has no '=': {}", number + 1, line),
            }
        }

        data
    }

    fn parse_option(&mut self, key: &str, value: &str) -> bool {
        if key == "encryption" {
            let code = uoinject_core::EncryptionMode::from_name(value)
                .map(|mode| mode as u8)
                .or_else(|| value.parse().ok());
            return match code {
                Some(code) => {
                    self.encryption = code;
                    true
                }
                None => false,
            };
        }

        let mut parts = key.splitn(2, '.');
        match (parts.next(), parts.next()) {
            (Some("use"), Some(name)) => match parse_number(value).and_then(|g| u16::try_from(g).ok()) {
                Some(graphic) => {
                    self.uses.insert(name.to_string(), graphic);
                    true
                }
                None => false,
            },
            (Some("shop"), Some(name)) => {
                let items = value.split(';').filter_map(ShoppingItem::parse).collect();
                self.shopping_lists.insert(name.to_string(), items);
                true
            }
            (Some("server"), Some(rest)) => self.parse_server_option(rest, value),
            (Some("character"), Some(rest)) => self.parse_character_option(rest, value),
            _ => false,
        }
    }

    fn parse_server_option(&mut self, rest: &str, value: &str) -> bool {
        let Some((server, flag)) = rest.rsplit_once('.') else {
            return false;
        };
        let Ok(enabled) = value.parse::<bool>() else {
            return false;
        };
        let settings = self.servers.entry(server.to_string()).or_default();
        match flag {
            "fixwalk" => settings.fixwalk = enabled,
            "filterweather" => settings.filter_weather = enabled,
            "fixtalk" => settings.fixtalk = enabled,
            _ => return false,
        }
        true
    }

    fn parse_character_option(&mut self, rest: &str, value: &str) -> bool {
        // <server>.<account>.<serial>.<setting>[.<name>]
        let parts: Vec<&str> = rest.splitn(5, '.').collect();
        if parts.len() < 4 {
            return false;
        }
        let Some(serial) = parse_number(parts[2]) else {
            return false;
        };
        let key = CharacterKey::new(parts[0], parts[1], Serial::new(serial));
        let name = parts.get(4).map(|name| name.to_string());
        let settings = self.characters.entry(key).or_default();

        match (parts[3], name) {
            ("light", None) => match value.parse::<u8>() {
                Ok(level) => settings.light = Some(level),
                Err(_) => return false,
            },
            ("object", Some(name)) => match parse_number(value) {
                Some(serial) => {
                    settings.objects.insert(name, Serial::new(serial));
                }
                None => return false,
            },
            ("hotkey", Some(name)) => {
                settings.hotkeys.insert(name, value.to_string());
            }
            ("dress", Some(name)) => {
                settings.dress_sets.insert(name, parse_items(value));
            }
            ("arm", Some(name)) => {
                settings.arm_sets.insert(name, parse_items(value));
            }
            _ => return false,
        }
        true
    }

    /// Render the configuration in the format [`ConfigData::parse`] reads
    pub fn to_text(&self) -> String {
        let mut out = String::from("# uoinject configuration\n");

        let encryption = uoinject_core::EncryptionMode::from_u8(self.encryption)
            .map(|mode| mode.as_str().to_string())
            .unwrap_or_else(|| self.encryption.to_string());
        out.push_str(&format!("encryption = {}\n", encryption));

        for (name, graphic) in &self.uses {
            out.push_str(&format!("use.{} = 0x{:04x}\n", name, graphic));
        }
        for (server, settings) in &self.servers {
            out.push_str(&format!("server.{}.fixwalk = {}\n", server, settings.fixwalk));
            out.push_str(&format!("server.{}.filterweather = {}\n", server, settings.filter_weather));
            out.push_str(&format!("server.{}.fixtalk = {}\n", server, settings.fixtalk));
        }
        for (key, settings) in &self.characters {
            let prefix = format!("character.{}.{}.0x{:08x}", key.server, key.account, key.serial.get());
            if let Some(light) = settings.light {
                out.push_str(&format!("{}.light = {}\n", prefix, light));
            }
            for (name, serial) in &settings.objects {
                out.push_str(&format!("{}.object.{} = 0x{:08x}\n", prefix, name, serial.get()));
            }
            for (name, command) in &settings.hotkeys {
                out.push_str(&format!("{}.hotkey.{} = {}\n", prefix, name, command));
            }
            for (name, items) in &settings.dress_sets {
                out.push_str(&format!("{}.dress.{} = {}\n", prefix, name, format_items(items)));
            }
            for (name, items) in &settings.arm_sets {
                out.push_str(&format!("{}.arm.{} = {}\n", prefix, name, format_items(items)));
            }
        }
        for (name, items) in &self.shopping_lists {
            let line = items.iter().map(ShoppingItem::to_string).collect::<Vec<_>>().join("; ");
            out.push_str(&format!("shop.{} = {}\n", name, line));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# comment
encryption = 2.0.0
use.bandage = 0x0e21
use.poison = 3850
server.Test Shard.fixwalk = true
server.Test Shard.fixtalk = false
character.Test Shard.bob.0x00001234.object.runebook = 0x40001111
character.Test Shard.bob.0x00001234.hotkey.F1 = cast 'Greater Heal' self
character.Test Shard.bob.0x00001234.dress.battle = 0x06:0x40000001,0x02:0x40000002
character.Test Shard.bob.0x00001234.light = 0
shop.regs = all Bandage; 10 Black Pearl
bogus line
nonsense.key = 1
"#;

    fn bob() -> CharacterKey {
        CharacterKey::new("Test Shard", "bob", Serial::new(0x1234))
    }

    #[test]
    fn test_default_config() {
        let data = ConfigData::default();
        assert_eq!(data.encryption, 0);
        assert!(data.uses.is_empty());
    }

    #[test]
    fn test_parse_sample() {
        let data = ConfigData::parse(SAMPLE);
        assert_eq!(data.encryption, 3);
        assert_eq!(data.uses.get("bandage"), Some(&0x0e21));
        assert_eq!(data.uses.get("poison"), Some(&3850));
        assert!(data.servers["Test Shard"].fixwalk);
        assert!(!data.servers["Test Shard"].filter_weather);

        let bob = &data.characters[&bob()];
        assert_eq!(bob.objects.get("runebook"), Some(&Serial::new(0x4000_1111)));
        assert_eq!(bob.hotkeys.get("F1").map(String::as_str), Some("cast 'Greater Heal' self"));
        assert_eq!(bob.dress_sets["battle"], vec![
            (Layer::HAT, Serial::new(0x4000_0001)),
            (Layer::LEFT_HAND, Serial::new(0x4000_0002)),
        ]);
        assert_eq!(bob.light, Some(0));

        assert_eq!(data.shopping_lists["regs"], vec![
            ShoppingItem::new("Bandage", Want::All),
            ShoppingItem::new("Black Pearl", Want::Count(10)),
        ]);
    }

    #[test]
    fn test_numeric_encryption_kept() {
        let data = ConfigData::parse("encryption = 9\n");
        assert_eq!(data.encryption, 9);
        assert!(ConfigData::parse(&data.to_text()).encryption == 9);
    }

    #[test]
    fn test_text_round_trip() {
        let data = ConfigData::parse(SAMPLE);
        let reparsed = ConfigData::parse(&data.to_text());
        assert_eq!(reparsed, data);
    }

    #[test]
    fn test_valid_key() {
        assert!(valid_key("Test Shard"));
        assert!(valid_key("bob_2-x"));
        assert!(!valid_key("a.b"));
        assert!(!valid_key(""));
        assert!(!valid_key("x=y"));
    }

    #[test]
    fn test_shopping_item_parse() {
        assert_eq!(ShoppingItem::parse("ALL Garlic"), Some(ShoppingItem::new("Garlic", Want::All)));
        assert_eq!(ShoppingItem::parse("five Garlic"), None);
        assert_eq!(ShoppingItem::parse("5"), None);
        assert_eq!(ShoppingItem::new("Ginseng", Want::Count(3)).to_string(), "3 Ginseng");
    }
}
