//! # Decoded Message Structures
//!
//! Typed views of the server and client messages whose layout is more than
//! a handful of fixed offsets. Each `parse` reads through a
//! [`PacketReader`] so that flag-gated optional fields and counted
//! sub-records advance the cursor exactly as the wire layout dictates.
//!
//! Composite messages record `wire_len`, the offset the layout ended at.
//! Callers compare it with the real message size and log on mismatch; a
//! mismatch never causes a parse failure because servers disagree on
//! several trailing fields.

use crate::codecs::{read_fixed_str, unpack_big_u16, unpack_big_u32, PacketReader};
use uoinject_core::{InjectError, Layer, Position, Result, Serial};

fn require_len(buf: &[u8], len: usize, what: &str) -> Result<()> {
    if buf.len() < len {
        return Err(InjectError::InvalidData(format!(
            "{} needs at least {} bytes, got {}",
            what,
            len,
            buf.len()
        )));
    }
    Ok(())
}

// ============================================================================
// VITALS
// ============================================================================

/// Fields of Character Status (0x11) present only in the long form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusDetails {
    pub stamina: u16,
    pub max_stamina: u16,
    pub mana: u16,
    pub max_mana: u16,
    pub gold: u32,
    pub armor: u16,
    pub weight: u16,
}

/// Character Status (0x11)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterStatusPacket {
    pub serial: Serial,
    /// 30-byte name field
    pub name: String,
    pub hits: u16,
    pub max_hits: u16,
    /// Present when the message is long enough to carry the player's own stats
    pub details: Option<StatusDetails>,
}

impl CharacterStatusPacket {
    /// Shortest status message that carries the extended block
    pub const DETAILED_LEN: usize = 66;

    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 41, "character status")?;
        let details = (buf.len() >= Self::DETAILED_LEN).then(|| StatusDetails {
            stamina: unpack_big_u16(buf, 50),
            max_stamina: unpack_big_u16(buf, 52),
            mana: unpack_big_u16(buf, 54),
            max_mana: unpack_big_u16(buf, 56),
            gold: unpack_big_u32(buf, 58),
            armor: unpack_big_u16(buf, 62),
            weight: unpack_big_u16(buf, 64),
        });
        Ok(Self {
            serial: Serial(unpack_big_u32(buf, 3)),
            name: read_fixed_str(buf, 7, 30),
            hits: unpack_big_u16(buf, 37),
            max_hits: unpack_big_u16(buf, 39),
            details,
        })
    }
}

/// Update Hitpoints / Mana / Stamina (0xA1..=0xA3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalUpdatePacket {
    pub serial: Serial,
    pub maximum: u16,
    pub current: u16,
}

impl VitalUpdatePacket {
    pub fn parse(buf: &[u8]) -> Self {
        Self {
            serial: Serial(unpack_big_u32(buf, 1)),
            maximum: unpack_big_u16(buf, 5),
            current: unpack_big_u16(buf, 7),
        }
    }
}

// ============================================================================
// OBJECT UPDATES
// ============================================================================

/// Enter World (0x1B)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterWorldPacket {
    pub serial: Serial,
    pub graphic: u16,
    pub position: Position,
    pub direction: u8,
}

impl EnterWorldPacket {
    pub fn parse(buf: &[u8]) -> Self {
        Self {
            serial: Serial(unpack_big_u32(buf, 1)),
            graphic: unpack_big_u16(buf, 9),
            position: Position::new(
                unpack_big_u16(buf, 11),
                unpack_big_u16(buf, 13),
                buf.get(16).copied().unwrap_or(0) as i8,
            ),
            direction: buf.get(17).copied().unwrap_or(0),
        }
    }
}

/// Update Player (0x20)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePlayerPacket {
    pub serial: Serial,
    pub graphic: u16,
    pub colour: u16,
    pub position: Position,
    pub direction: u8,
}

impl UpdatePlayerPacket {
    pub fn parse(buf: &[u8]) -> Self {
        Self {
            serial: Serial(unpack_big_u32(buf, 1)),
            graphic: unpack_big_u16(buf, 5),
            colour: unpack_big_u16(buf, 8),
            position: Position::new(
                unpack_big_u16(buf, 11),
                unpack_big_u16(buf, 13),
                buf.get(18).copied().unwrap_or(0) as i8,
            ),
            direction: buf.get(17).copied().unwrap_or(0),
        }
    }
}

/// Update Item (0x1A): an item lying on the ground
///
/// ```text
/// {1a}{len u16}{serial u32 | 0x80000000 amount follows}
///     {graphic u16 | 0x8000 increment follows}[amount u16][increment u8]
///     {x u16 | 0x8000 direction follows}
///     {y u16 | 0x8000 hue follows | 0x4000 flags follow}
///     [direction u8]{z i8}[hue u16][flags u8]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundItemPacket {
    pub serial: Serial,
    pub graphic: u16,
    pub amount: Option<u16>,
    pub increment: Option<u8>,
    pub position: Position,
    pub direction: Option<u8>,
    pub colour: Option<u16>,
    pub flags: Option<u8>,
    pub wire_len: usize,
}

impl GroundItemPacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 14, "update item")?;
        let mut reader = PacketReader::new(buf, 3);
        let raw_serial = Serial(reader.u32());
        let raw_graphic = reader.u16();
        let amount = raw_serial.has_stack_flag().then(|| reader.u16());
        let increment = (raw_graphic & 0x8000 != 0).then(|| reader.u8());
        let raw_x = reader.u16();
        let raw_y = reader.u16();
        let direction = (raw_x & 0x8000 != 0).then(|| reader.u8());
        let z = reader.u8() as i8;
        let colour = (raw_y & 0x8000 != 0).then(|| reader.u16());
        let flags = (raw_y & 0x4000 != 0).then(|| reader.u8());
        Ok(Self {
            serial: raw_serial.masked(),
            graphic: raw_graphic & 0x7fff,
            amount,
            increment,
            position: Position::new(raw_x & 0x7fff, raw_y & 0x3fff, z),
            direction,
            colour,
            flags,
            wire_len: reader.position(),
        })
    }
}

/// One item inside a container, from 0x25 or a 0x3C sub-record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainedItem {
    pub serial: Serial,
    pub graphic: u16,
    pub quantity: u16,
    pub x: u16,
    pub y: u16,
    pub container: Serial,
    pub colour: u16,
}

impl ContainedItem {
    /// Size of one record in Update Contained Items
    pub const RECORD_LEN: usize = 19;

    fn read(reader: &mut PacketReader<'_>) -> Self {
        let serial = Serial(reader.u32());
        let graphic = reader.u16();
        reader.skip(1); // graphic increment
        let quantity = reader.u16();
        let x = reader.u16();
        let y = reader.u16();
        let container = Serial(reader.u32());
        let colour = reader.u16();
        Self { serial, graphic, quantity, x, y, container, colour }
    }

    /// Update Contained Item (0x25)
    pub fn parse_single(buf: &[u8]) -> Self {
        Self::read(&mut PacketReader::new(buf, 1))
    }
}

/// Update Contained Items (0x3C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerContentsPacket {
    pub items: Vec<ContainedItem>,
    pub wire_len: usize,
}

impl ContainerContentsPacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 5, "update contained items")?;
        let count = unpack_big_u16(buf, 3) as usize;
        // A count larger than the message stops at the last whole record
        let count = count.min((buf.len() - 5) / ContainedItem::RECORD_LEN);
        let mut reader = PacketReader::new(buf, 5);
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(ContainedItem::read(&mut reader));
        }
        Ok(Self { items, wire_len: reader.position() })
    }
}

/// Server Equip Item (0x2E)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipItemPacket {
    pub serial: Serial,
    pub graphic: u16,
    pub layer: Layer,
    pub owner: Serial,
    pub colour: u16,
}

impl EquipItemPacket {
    pub fn parse(buf: &[u8]) -> Self {
        Self {
            serial: Serial(unpack_big_u32(buf, 1)),
            graphic: unpack_big_u16(buf, 5),
            layer: Layer(buf.get(8).copied().unwrap_or(0)),
            owner: Serial(unpack_big_u32(buf, 9)),
            colour: unpack_big_u16(buf, 13),
        }
    }
}

/// One worn item listed in Update Object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WornItem {
    pub serial: Serial,
    pub graphic: u16,
    pub layer: Layer,
    pub colour: Option<u16>,
}

/// Update Object (0x78): a mobile and everything it wears
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobilePacket {
    pub serial: Serial,
    pub graphic: u16,
    pub quantity: Option<u16>,
    pub increment: Option<u16>,
    pub position: Position,
    pub direction: u8,
    pub colour: u16,
    pub flags: u8,
    pub notoriety: u8,
    pub equipment: Vec<WornItem>,
    pub wire_len: usize,
}

impl MobilePacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 19, "update object")?;
        let mut reader = PacketReader::new(buf, 3);
        let raw_serial = Serial(reader.u32());
        let raw_graphic = reader.u16();
        let quantity = raw_serial.has_stack_flag().then(|| reader.u16());
        let increment = (raw_graphic & 0x8000 != 0).then(|| reader.u16());
        let raw_x = reader.u16();
        let y = reader.u16();
        if raw_x & 0x8000 != 0 {
            reader.skip(1); // second direction byte
        }
        let z = reader.u8() as i8;
        let direction = reader.u8();
        let colour = reader.u16();
        let flags = reader.u8();
        let notoriety = reader.u8();

        let mut equipment = Vec::new();
        loop {
            let serial = Serial(reader.u32());
            // A list cut short by the end of the message ends here too
            if !serial.is_valid() || reader.remaining() < 3 {
                break;
            }
            let graphic = reader.u16();
            let layer = Layer(reader.u8());
            let colour = (graphic & 0x8000 != 0).then(|| reader.u16());
            equipment.push(WornItem { serial, graphic: graphic & 0x7fff, layer, colour });
        }

        Ok(Self {
            serial: raw_serial.masked(),
            graphic: raw_graphic & 0x7fff,
            quantity,
            increment,
            position: Position::new(raw_x & 0x7fff, y, z),
            direction,
            colour,
            flags,
            notoriety,
            equipment,
            wire_len: reader.position(),
        })
    }
}

// ============================================================================
// TARGETING
// ============================================================================

/// Target Data (0x6C), identical layout in both directions
///
/// ```text
/// {6c}{type u8}{cursor u32}{flag u8}{serial u32}{x u16}{y u16}{unk u8}{z i8}{graphic u16}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetPacket {
    /// 0 = object, 1 = location
    pub target_type: u8,
    pub cursor_id: u32,
    pub cursor_flag: u8,
    pub serial: Serial,
    pub x: u16,
    pub y: u16,
    pub unknown: u8,
    pub z: i8,
    pub graphic: u16,
}

impl TargetPacket {
    pub const LEN: usize = 19;

    pub fn parse(buf: &[u8]) -> Self {
        Self {
            target_type: buf.get(1).copied().unwrap_or(0),
            cursor_id: unpack_big_u32(buf, 2),
            cursor_flag: buf.get(6).copied().unwrap_or(0),
            serial: Serial(unpack_big_u32(buf, 7)),
            x: unpack_big_u16(buf, 11),
            y: unpack_big_u16(buf, 13),
            unknown: buf.get(15).copied().unwrap_or(0),
            z: buf.get(16).copied().unwrap_or(0) as i8,
            graphic: unpack_big_u16(buf, 17),
        }
    }

    /// Encode into the fixed 19-byte wire form
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0] = crate::packets::MessageCode::TargetData.as_u8();
        out[1] = self.target_type;
        out[2..6].copy_from_slice(&self.cursor_id.to_be_bytes());
        out[6] = self.cursor_flag;
        out[7..11].copy_from_slice(&self.serial.get().to_be_bytes());
        out[11..13].copy_from_slice(&self.x.to_be_bytes());
        out[13..15].copy_from_slice(&self.y.to_be_bytes());
        out[15] = self.unknown;
        out[16] = self.z as u8;
        out[17..19].copy_from_slice(&self.graphic.to_be_bytes());
        out
    }
}

// ============================================================================
// VENDORS AND MENUS
// ============================================================================

/// Price line of a shopkeeper's buy list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyListEntry {
    pub price: u32,
    pub name: String,
}

/// Vendor Buy List (0x74)
///
/// Prices and names, in the same order as the items of the buy container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorBuyListPacket {
    pub container: Serial,
    pub entries: Vec<BuyListEntry>,
    pub wire_len: usize,
}

impl VendorBuyListPacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 8, "vendor buy list")?;
        let mut reader = PacketReader::new(buf, 3);
        let container = Serial(reader.u32());
        let count = reader.u8();
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            if reader.remaining() < 5 {
                break;
            }
            let price = reader.u32();
            let len = reader.u8() as usize;
            let name = reader.fixed_str(len);
            entries.push(BuyListEntry { price, name });
        }
        Ok(Self { container, entries, wire_len: reader.position() })
    }
}

/// Item a shopkeeper is willing to buy from the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellListEntry {
    pub serial: Serial,
    pub graphic: u16,
    pub colour: u16,
    pub amount: u16,
    pub price: u16,
    pub name: String,
}

/// Vendor Sell List (0x9E)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSellListPacket {
    pub vendor: Serial,
    pub entries: Vec<SellListEntry>,
    pub wire_len: usize,
}

impl VendorSellListPacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 9, "vendor sell list")?;
        let mut reader = PacketReader::new(buf, 3);
        let vendor = Serial(reader.u32());
        let count = reader.u16();
        let mut entries = Vec::with_capacity(count.min(256) as usize);
        for _ in 0..count {
            if reader.remaining() < 14 {
                break;
            }
            let serial = Serial(reader.u32());
            let graphic = reader.u16();
            let colour = reader.u16();
            let amount = reader.u16();
            let price = reader.u16();
            let len = reader.u16() as usize;
            let name = reader.fixed_str(len);
            entries.push(SellListEntry { serial, graphic, colour, amount, price, name });
        }
        Ok(Self { vendor, entries, wire_len: reader.position() })
    }
}

/// One choice of a menu gump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub graphic: u16,
    pub colour: u16,
    pub text: String,
}

/// Open Menu Gump (0x7C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGumpPacket {
    pub dialog_id: u32,
    pub menu_id: u16,
    pub question: String,
    pub items: Vec<MenuItem>,
    pub wire_len: usize,
}

impl MenuGumpPacket {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 11, "menu gump")?;
        let mut reader = PacketReader::new(buf, 3);
        let dialog_id = reader.u32();
        let menu_id = reader.u16();
        let question_len = reader.u8() as usize;
        let question = reader.fixed_str(question_len);
        let count = reader.u8();
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let graphic = reader.u16();
            let colour = reader.u16();
            let len = reader.u8() as usize;
            let text = reader.fixed_str(len);
            items.push(MenuItem { graphic, colour, text });
        }
        Ok(Self { dialog_id, menu_id, question, items, wire_len: reader.position() })
    }
}

// ============================================================================
// LOGIN ROSTERS
// ============================================================================

/// Entry of the shard list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub id: u16,
    pub name: String,
}

/// Server List (0xA8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerListPacket {
    pub servers: Vec<ServerEntry>,
    /// Size the message should have for its server count
    pub expected_len: usize,
}

impl ServerListPacket {
    pub const ENTRY_LEN: usize = 40;

    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 6, "server list")?;
        let count = unpack_big_u16(buf, 4) as usize;
        let servers = (0..count)
            .map(|i| {
                let offset = 6 + i * Self::ENTRY_LEN;
                ServerEntry {
                    id: unpack_big_u16(buf, offset),
                    name: read_fixed_str(buf, offset + 2, 32),
                }
            })
            .collect();
        Ok(Self { servers, expected_len: 6 + count * Self::ENTRY_LEN })
    }

    /// Index of the server with `id`
    pub fn find(&self, id: u16) -> Option<&ServerEntry> {
        self.servers.iter().find(|server| server.id == id)
    }
}

/// Character List (0xA9) and Character List 2 (0x86)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterListPacket {
    pub names: Vec<String>,
}

impl CharacterListPacket {
    pub const NAME_LEN: usize = 60;

    pub fn parse(buf: &[u8]) -> Result<Self> {
        require_len(buf, 4, "character list")?;
        let count = buf[3] as usize;
        let names = (0..count)
            .map(|i| read_fixed_str(buf, 4 + i * Self::NAME_LEN, Self::NAME_LEN))
            .collect();
        Ok(Self { names })
    }
}
