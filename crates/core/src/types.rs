//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Object serial (32-bit unsigned)
///
/// Every character and item in the world is identified by a serial.
/// Serial 0 is reserved and never names a real object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Serial(pub u32);

impl Serial {
    /// The reserved "no object" serial
    pub const NONE: Serial = Serial(0);

    /// Serial used as the sender of system messages
    pub const SYSTEM: Serial = Serial(0xffff_ffff);

    /// Top bit set on the wire when an item record carries a stack quantity
    pub const STACK_FLAG: u32 = 0x8000_0000;

    pub const fn new(serial: u32) -> Self {
        Self(serial)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// `false` for the reserved serial 0
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// The serial with the stack flag stripped
    pub fn masked(&self) -> Serial {
        Serial(self.0 & !Self::STACK_FLAG)
    }

    /// Whether the stack flag is set
    pub fn has_stack_flag(&self) -> bool {
        self.0 & Self::STACK_FLAG != 0
    }
}

impl From<u32> for Serial {
    fn from(serial: u32) -> Self {
        Self(serial)
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Equipment slot an item occupies on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    pub const RIGHT_HAND: Layer = Layer(0x01);
    pub const LEFT_HAND: Layer = Layer(0x02);
    pub const HAT: Layer = Layer(0x06);
    pub const RING: Layer = Layer(0x08);
    pub const NECK: Layer = Layer(0x0a);
    pub const HAIR: Layer = Layer(0x0b);
    pub const BEARD: Layer = Layer(0x10);
    pub const EARRINGS: Layer = Layer(0x12);
    pub const BACKPACK: Layer = Layer(0x15);
    pub const MOUNT: Layer = Layer(0x19);
    pub const VENDOR_BUY_RESTOCK: Layer = Layer(0x1a);
    pub const VENDOR_BUY: Layer = Layer(0x1b);
    pub const VENDOR_SELL: Layer = Layer(0x1c);
    pub const BANK: Layer = Layer(0x1d);

    pub const fn new(layer: u8) -> Self {
        Self(layer)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Layers used by shopkeepers to hold their stock
    pub fn is_vendor(&self) -> bool {
        matches!(*self, Self::VENDOR_BUY_RESTOCK | Self::VENDOR_BUY | Self::VENDOR_SELL)
    }

    /// Weapon and shield slots
    pub fn is_hand(&self) -> bool {
        matches!(*self, Self::RIGHT_HAND | Self::LEFT_HAND)
    }

    /// Slots that hold clothing or armour
    ///
    /// Excludes hands, hair and beard, the backpack, the mount and the
    /// vendor and bank containers.
    pub fn is_clothing(&self) -> bool {
        (0x03..=0x18).contains(&self.0)
            && !matches!(*self, Self::HAIR | Self::BEARD | Self::BACKPACK)
    }
}

impl From<u8> for Layer {
    fn from(layer: u8) -> Self {
        Self(layer)
    }
}

/// Direction a message type is allowed to flow in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    /// Client to server
    Send,
    /// Server to client
    Recv,
    /// Either way
    Both,
}

impl MessageDirection {
    /// Whether a message observed travelling `observed` is allowed
    pub fn allows(&self, observed: MessageDirection) -> bool {
        *self == MessageDirection::Both || *self == observed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Send => "client",
            Self::Recv => "server",
            Self::Both => "both",
        }
    }
}

/// Client encryption scheme selected in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionMode {
    /// Ignition-patched client, no encryption
    Ignition = 0,
    /// SphereClient, no encryption, login key zeroed
    SphereClient = 1,
    /// Clients before 2.0.0
    V1_26_4 = 2,
    /// Client 2.0.0
    V2_0_0 = 3,
    /// Clients from 3.0.5
    V3_0_5 = 4,
}

impl EncryptionMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ignition),
            1 => Some(Self::SphereClient),
            2 => Some(Self::V1_26_4),
            3 => Some(Self::V2_0_0),
            4 => Some(Self::V3_0_5),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ignition" | "none" => Some(Self::Ignition),
            "sphereclient" => Some(Self::SphereClient),
            "1.26.4" => Some(Self::V1_26_4),
            "2.0.0" => Some(Self::V2_0_0),
            "3.0.5" => Some(Self::V3_0_5),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignition => "ignition",
            Self::SphereClient => "sphereclient",
            Self::V1_26_4 => "1.26.4",
            Self::V2_0_0 => "2.0.0",
            Self::V3_0_5 => "3.0.5",
        }
    }

    /// Login-phase key pair, `None` for the unencrypted modes
    pub fn login_keys(&self) -> Option<(u32, u32)> {
        match self {
            Self::Ignition | Self::SphereClient => None,
            Self::V1_26_4 => Some((0x3275_0719, 0x0a2d_100b)),
            Self::V2_0_0 => Some((0x2d13_a5fd, 0xa39d_527f)),
            Self::V3_0_5 => Some((0x2c8b_97ad, 0xa350_de7f)),
        }
    }
}

/// Identifies one character's settings: shard, account and serial
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterKey {
    pub server: String,
    pub account: String,
    pub serial: Serial,
}

impl CharacterKey {
    pub fn new(server: impl Into<String>, account: impl Into<String>, serial: Serial) -> Self {
        Self { server: server.into(), account: account.into(), serial }
    }
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.server, self.account, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_flags() {
        let serial = Serial::new(0x8000_1234);
        assert!(serial.has_stack_flag());
        assert_eq!(serial.masked(), Serial::new(0x1234));
        assert!(!Serial::NONE.is_valid());
        assert_eq!(format!("{}", Serial::new(0xab)), "0x000000AB");
    }

    #[test]
    fn test_serial_default_is_none() {
        assert_eq!(Serial::default(), Serial::NONE);
    }

    #[test]
    fn test_layer_groups() {
        assert!(Layer::LEFT_HAND.is_hand());
        assert!(Layer::HAT.is_clothing());
        assert!(Layer::EARRINGS.is_clothing());
        assert!(!Layer::HAIR.is_clothing());
        assert!(!Layer::BACKPACK.is_clothing());
        assert!(!Layer::MOUNT.is_clothing());
        assert!(!Layer::RIGHT_HAND.is_clothing());
    }

    #[test]
    fn test_direction_allows() {
        assert!(MessageDirection::Both.allows(MessageDirection::Send));
        assert!(MessageDirection::Recv.allows(MessageDirection::Recv));
        assert!(!MessageDirection::Send.allows(MessageDirection::Recv));
    }

    #[test]
    fn test_encryption_codes() {
        for code in 0..=4u8 {
            let mode = EncryptionMode::from_u8(code).unwrap();
            assert_eq!(mode as u8, code);
            assert_eq!(EncryptionMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(EncryptionMode::from_u8(5), None);
        assert!(EncryptionMode::SphereClient.login_keys().is_none());
        assert_eq!(EncryptionMode::V2_0_0.login_keys(), Some((0x2d13_a5fd, 0xa39d_527f)));
    }
}
