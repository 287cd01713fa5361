//! # uoinject Engine
//!
//! Sits inside the message stream between a game client and its server.
//! Every complete message is handed to [`Engine::dispatch`], which tracks
//! the world it describes, may rewrite or suppress it, and may inject
//! messages of its own in either direction.
//!
//! ## Architecture
//!
//! ### 1. Registry and Dispatcher
//! A static table per opcode ([`registry`]) names the message, its size,
//! its direction and its handlers. The dispatcher validates each message
//! against that table and runs the handler.
//!
//! ### 2. Session
//! Created at Enter World, discarded at disconnect. Holds the world model,
//! the player's vitals and the pending interactions: target cursors, menu
//! answers and vendor trips.
//!
//! ### 3. Commands
//! Text commands typed with a leading `,` or bound to hotkeys, run by
//! [`Engine::run_command`].
//!
//! ### 4. Collaborators
//! The interception layer, the presentation layer and an optional command
//! extension are reached through the traits in [`collaborators`].
//!
//! ## Threading
//!
//! The engine is driven from one thread. Callers serialize every entry
//! point: message dispatch, hotkeys, commands and disconnect.

pub mod collaborators;
pub mod commands;
pub mod dispatcher;
pub mod dress;
pub mod engine;
pub mod gumps;
mod handlers;
pub mod menu;
pub mod registry;
pub mod session;
pub mod spells;
pub mod targeting;
pub mod testing;
pub mod vendor;

// Re-export commonly used items
pub use collaborators::{CommandExtension, Interceptor, Presentation};
pub use commands::{parse_colour, tokenize, LookupError};
pub use dispatcher::DispatchStats;
pub use engine::{Engine, PRODUCT_NAME, USE_DISTANCE, VERSION};
pub use menu::MenuQueue;
pub use registry::{message_type, MessageSize, MessageType, MESSAGE_TYPE_COUNT};
pub use session::Session;
pub use spells::{skill_id, spell_number, SKILLS, SPELLS};
pub use targeting::{TargetContinuation, Targeting};
pub use vendor::{VendorMode, VendorState};
