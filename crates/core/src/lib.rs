//! uoinject Core - Fundamental types and utilities

mod error;
mod types;
mod positions;

pub use error::*;
pub use types::*;
pub use positions::*;
