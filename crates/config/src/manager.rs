//! # Configuration Manager
//!
//! Shared, lockable access to [`ConfigData`] plus the file it came from.

use crate::{valid_key, ConfigData, ConfigError, ShoppingItem};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uoinject_core::{CharacterKey, EncryptionMode, Layer, Serial};

/// Per-server protocol fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerFlag {
    FixWalk,
    FilterWeather,
    FixTalk,
}

/// Which kind of equipment set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DressKind {
    /// Clothing and armour
    Dress,
    /// Weapons and shields
    Arm,
}

/// Key/value settings store
///
/// # Purpose
/// Both the engine and the presentation layer hold an `Arc<ConfigManager>`
/// and read or change settings through it. Changes stay in memory until
/// [`ConfigManager::save`] is called.
#[derive(Debug, Default)]
pub struct ConfigManager {
    data: RwLock<ConfigData>,
    path: RwLock<Option<PathBuf>>,
}

impl ConfigManager {
    /// Create an empty store with no backing file
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already parsed settings
    pub fn from_data(data: ConfigData) -> Self {
        Self { data: RwLock::new(data), path: RwLock::new(None) }
    }

    /// Load settings from a file
    ///
    /// A missing file yields an empty store that will be created by the
    /// next save.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(content) => ConfigData::parse(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No configuration at {}, starting empty", path.display());
                ConfigData::default()
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(Self { data: RwLock::new(data), path: RwLock::new(Some(path.to_path_buf())) })
    }

    /// Write settings back to the file they were loaded from
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.read().clone().ok_or(ConfigError::NoPath)?;
        self.save_to(path)
    }

    /// Write settings to `path` and make it the file used by [`ConfigManager::save`]
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_text())?;
        *self.path.write() = Some(path.to_path_buf());
        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Settings rendered in file format
    pub fn to_text(&self) -> String {
        self.data.read().to_text()
    }

    /// Copy of everything stored
    pub fn snapshot(&self) -> ConfigData {
        self.data.read().clone()
    }

    /// Raw encryption code
    pub fn encryption(&self) -> u8 {
        self.data.read().encryption
    }

    pub fn set_encryption(&self, code: u8) {
        self.data.write().encryption = code;
    }

    /// Encryption mode, `None` when the stored code is not a known mode
    pub fn encryption_mode(&self) -> Option<EncryptionMode> {
        EncryptionMode::from_u8(self.encryption())
    }

    /// Graphic registered under a use name
    pub fn find_use(&self, name: &str) -> Option<u16> {
        self.data.read().uses.get(name).copied()
    }

    pub fn set_use(&self, name: &str, graphic: u16) -> Result<(), ConfigError> {
        check_name(name)?;
        self.data.write().uses.insert(name.to_string(), graphic);
        Ok(())
    }

    /// Value of a per-server flag, `false` for unknown servers
    pub fn server_flag(&self, server: &str, flag: ServerFlag) -> bool {
        self.data.read().servers.get(server).map_or(false, |settings| match flag {
            ServerFlag::FixWalk => settings.fixwalk,
            ServerFlag::FilterWeather => settings.filter_weather,
            ServerFlag::FixTalk => settings.fixtalk,
        })
    }

    /// Flip a per-server flag
    ///
    /// # Returns
    /// The new value
    pub fn toggle_server_flag(&self, server: &str, flag: ServerFlag) -> bool {
        let mut data = self.data.write();
        let settings = data.servers.entry(server.to_string()).or_default();
        let value = match flag {
            ServerFlag::FixWalk => &mut settings.fixwalk,
            ServerFlag::FilterWeather => &mut settings.filter_weather,
            ServerFlag::FixTalk => &mut settings.fixtalk,
        };
        *value = !*value;
        *value
    }

    /// Serial registered under an object alias
    pub fn find_object(&self, character: &CharacterKey, name: &str) -> Option<Serial> {
        self.data
            .read()
            .characters
            .get(character)
            .and_then(|settings| settings.objects.get(name).copied())
    }

    pub fn set_object(&self, character: &CharacterKey, name: &str, serial: Serial) -> Result<(), ConfigError> {
        check_name(name)?;
        self.data
            .write()
            .characters
            .entry(character.clone())
            .or_default()
            .objects
            .insert(name.to_string(), serial);
        Ok(())
    }

    /// Command bound to a hotkey
    pub fn hotkey(&self, character: &CharacterKey, key: &str) -> Option<String> {
        self.data
            .read()
            .characters
            .get(character)
            .and_then(|settings| settings.hotkeys.get(key).cloned())
    }

    /// Bind a hotkey, an empty command removes the binding
    pub fn set_hotkey(&self, character: &CharacterKey, key: &str, command: &str) -> Result<(), ConfigError> {
        check_name(key)?;
        let mut data = self.data.write();
        let hotkeys = &mut data.characters.entry(character.clone()).or_default().hotkeys;
        if command.trim().is_empty() {
            hotkeys.remove(key);
        } else {
            hotkeys.insert(key.to_string(), command.trim().to_string());
        }
        Ok(())
    }

    pub fn hotkeys(&self, character: &CharacterKey) -> BTreeMap<String, String> {
        self.data
            .read()
            .characters
            .get(character)
            .map(|settings| settings.hotkeys.clone())
            .unwrap_or_default()
    }

    /// Items of a dress or arm set
    pub fn dress(&self, character: &CharacterKey, kind: DressKind, name: &str) -> Option<Vec<(Layer, Serial)>> {
        let data = self.data.read();
        let settings = data.characters.get(character)?;
        let sets = match kind {
            DressKind::Dress => &settings.dress_sets,
            DressKind::Arm => &settings.arm_sets,
        };
        sets.get(name).cloned()
    }

    pub fn set_dress(
        &self,
        character: &CharacterKey,
        kind: DressKind,
        name: &str,
        items: Vec<(Layer, Serial)>,
    ) -> Result<(), ConfigError> {
        check_name(name)?;
        let mut data = self.data.write();
        let settings = data.characters.entry(character.clone()).or_default();
        let sets = match kind {
            DressKind::Dress => &mut settings.dress_sets,
            DressKind::Arm => &mut settings.arm_sets,
        };
        sets.insert(name.to_string(), items);
        Ok(())
    }

    /// Forget a dress or arm set
    ///
    /// # Returns
    /// `true` if the set existed
    pub fn remove_dress(&self, character: &CharacterKey, kind: DressKind, name: &str) -> bool {
        let mut data = self.data.write();
        let Some(settings) = data.characters.get_mut(character) else {
            return false;
        };
        let sets = match kind {
            DressKind::Dress => &mut settings.dress_sets,
            DressKind::Arm => &mut settings.arm_sets,
        };
        sets.remove(name).is_some()
    }

    /// Fixed light level for a character
    pub fn light(&self, character: &CharacterKey) -> Option<u8> {
        self.data.read().characters.get(character).and_then(|settings| settings.light)
    }

    pub fn set_light(&self, character: &CharacterKey, level: Option<u8>) {
        self.data.write().characters.entry(character.clone()).or_default().light = level;
    }

    pub fn shopping_list(&self, name: &str) -> Option<Vec<ShoppingItem>> {
        self.data.read().shopping_lists.get(name).cloned()
    }

    pub fn set_shopping_list(&self, name: &str, items: Vec<ShoppingItem>) -> Result<(), ConfigError> {
        check_name(name)?;
        self.data.write().shopping_lists.insert(name.to_string(), items);
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    if valid_key(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName(name.to_string()))
    }
}
