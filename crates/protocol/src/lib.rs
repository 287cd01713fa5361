//! # uoinject Protocol Library
//!
//! Wire-level pieces of the game protocol as seen by an interception layer
//! sitting between client and server.
//!
//! ## Architecture
//!
//! ### 1. Codecs ([`codecs`])
//! Big-endian integer pack/unpack at explicit offsets, plus a forward-only
//! [`PacketReader`] for layouts with optional and repeated fields.
//!
//! ### 2. Message Codes ([`packets`])
//! Opcodes of every message the engine decodes or synthesizes.
//!
//! ### 3. Message Structures ([`packet_structures`])
//! Typed decoders for composite messages: object updates with flag-gated
//! fields, container contents, equipment lists, vendor lists, menus and
//! the login rosters.
//!
//! ### 4. Builders ([`packet_builder`])
//! Functions appending complete synthesized messages to a `BytesMut`.
//!
//! ### 5. Unicode Talk ([`unicode`])
//! The two layouts of Unicode Client Talk, including packed 12-bit keywords.
//!
//! ## Byte Order
//!
//! All multi-byte fields are big-endian. Offsets are fixed per message
//! type and treated as data, not derived.

pub mod codecs;
pub mod packets;
pub mod packet_structures;
pub mod packet_builder;
pub mod unicode;

// Re-export commonly used items
pub use codecs::*;
pub use packets::*;
pub use packet_structures::*;
pub use packet_builder::*;
pub use unicode::*;
