//! # Message Codes
//!
//! Opcodes of the message types the engine decodes or synthesizes. The
//! first byte of every message is its opcode; the complete per-opcode
//! table (names, sizes, directions) lives in the engine's registry.

/// Marker used in size tables for messages that embed their own length
pub const SIZE_VARIABLE: i32 = -1;

/// Offset of the embedded 16-bit length in variable-size messages
pub const LENGTH_OFFSET: usize = 1;

/// Prefix that turns a chat line into a local command
pub const COMMAND_PREFIX: u8 = b',';

/// Opcodes handled or emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageCode {
    WalkRequest = 0x02,
    ClientTalk = 0x03,
    DoubleClick = 0x06,
    PickUpItem = 0x07,
    DropItem = 0x08,
    SingleClick = 0x09,
    CharacterStatus = 0x11,
    PerformAction = 0x12,
    ClientEquipItem = 0x13,
    UpdateItem = 0x1a,
    EnterWorld = 0x1b,
    ServerTalk = 0x1c,
    DeleteObject = 0x1d,
    UpdatePlayer = 0x20,
    OpenContainer = 0x24,
    UpdateContainedItem = 0x25,
    ServerEquipItem = 0x2e,
    VendorBuyReply = 0x3b,
    UpdateContainedItems = 0x3c,
    GlobalLightLevel = 0x4f,
    ErrorCode = 0x53,
    SelectCharacter = 0x5d,
    SetWeather = 0x65,
    TargetData = 0x6c,
    VendorBuyList = 0x74,
    UpdateObject = 0x78,
    OpenMenuGump = 0x7c,
    MenuChoice = 0x7d,
    FirstLogin = 0x80,
    CharacterList2 = 0x86,
    RelayServer = 0x8c,
    SecondLogin = 0x91,
    DyeData = 0x95,
    VendorSellList = 0x9e,
    VendorSellReply = 0x9f,
    SelectServer = 0xa0,
    UpdateHitpoints = 0xa1,
    UpdateMana = 0xa2,
    UpdateStamina = 0xa3,
    ServerList = 0xa8,
    CharacterList = 0xa9,
    UnicodeClientTalk = 0xad,
}

impl MessageCode {
    /// Map an opcode byte to a known code
    pub fn from_u8(value: u8) -> Option<Self> {
        use MessageCode::*;
        let code = match value {
            0x02 => WalkRequest,
            0x03 => ClientTalk,
            0x06 => DoubleClick,
            0x07 => PickUpItem,
            0x08 => DropItem,
            0x09 => SingleClick,
            0x11 => CharacterStatus,
            0x12 => PerformAction,
            0x13 => ClientEquipItem,
            0x1a => UpdateItem,
            0x1b => EnterWorld,
            0x1c => ServerTalk,
            0x1d => DeleteObject,
            0x20 => UpdatePlayer,
            0x24 => OpenContainer,
            0x25 => UpdateContainedItem,
            0x2e => ServerEquipItem,
            0x3b => VendorBuyReply,
            0x3c => UpdateContainedItems,
            0x4f => GlobalLightLevel,
            0x53 => ErrorCode,
            0x5d => SelectCharacter,
            0x65 => SetWeather,
            0x6c => TargetData,
            0x74 => VendorBuyList,
            0x78 => UpdateObject,
            0x7c => OpenMenuGump,
            0x7d => MenuChoice,
            0x80 => FirstLogin,
            0x86 => CharacterList2,
            0x8c => RelayServer,
            0x91 => SecondLogin,
            0x95 => DyeData,
            0x9e => VendorSellList,
            0x9f => VendorSellReply,
            0xa0 => SelectServer,
            0xa1 => UpdateHitpoints,
            0xa2 => UpdateMana,
            0xa3 => UpdateStamina,
            0xa8 => ServerList,
            0xa9 => CharacterList,
            0xad => UnicodeClientTalk,
            _ => return None,
        };
        Some(code)
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Error code sent by the server before an idle disconnect
pub const ERROR_IDLE_WARNING: u8 = 7;

/// Gump id of a shopkeeper's buy window
pub const GUMP_VENDOR: u16 = 0x30;

/// Perform Action subtypes
pub const ACTION_USE_SKILL: u8 = 0x24;
pub const ACTION_CAST_SPELL: u8 = 0x56;

/// Vendor Buy Reply flag meaning "items follow"
pub const VENDOR_BUY_ITEMS: u8 = 0x02;
