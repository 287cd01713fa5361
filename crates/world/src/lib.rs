//! # uoinject World Model
//!
//! The object graph rebuilt from the server's message stream.
//!
//! ## Modules
//!
//! - `object` - A single character or item and its relation to others
//! - `world` - The serial-keyed object store and its graph queries
//! - `vitals` - The player's status figures shown by the presentation layer

pub mod object;
pub mod world;
pub mod vitals;

// Re-export commonly used types
pub use object::{GameObject, Relation};
pub use world::World;
pub use vitals::Vitals;
