//! # Game Objects
//!
//! Characters and items share one representation: the server describes
//! both with a serial, an appearance and a location, and only the
//! relation to other objects tells them apart.

use serde::Serialize;
use uoinject_core::{Layer, Position, Serial};

/// Where an object lives relative to other objects
///
/// # Purpose
/// Containment and equipment exclude each other, so they are one enum
/// rather than two optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Relation {
    /// On the ground, or a character walking around
    #[default]
    Free,

    /// Inside a container
    Container(Serial),

    /// Worn by a character on a layer
    Equipped { owner: Serial, layer: Layer },
}

impl Relation {
    /// Serial of the containing or wearing object
    pub fn parent(&self) -> Option<Serial> {
        match *self {
            Relation::Free => None,
            Relation::Container(container) => Some(container),
            Relation::Equipped { owner, .. } => Some(owner),
        }
    }
}

/// A character or item known to the world
///
/// Created empty on first reference and filled in field by field as
/// messages mention it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameObject {
    pub serial: Serial,
    pub graphic: u16,
    pub colour: u16,
    /// Stack size, 0 when the server never said
    pub quantity: u16,
    pub increment: u16,
    pub position: Position,
    pub direction: u8,
    pub notoriety: u8,
    pub(crate) relation: Relation,
    /// Contents and equipment, in the order they arrived
    pub(crate) children: Vec<Serial>,
}

impl GameObject {
    /// Create a blank object
    ///
    /// # Arguments
    /// * `serial` - Identifier of the object
    #[inline]
    pub fn new(serial: Serial) -> Self {
        tracing::trace!("Creating object {}", serial);

        Self {
            serial,
            graphic: 0,
            colour: 0,
            quantity: 0,
            increment: 0,
            position: Position::default(),
            direction: 0,
            notoriety: 0,
            relation: Relation::Free,
            children: Vec::new(),
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn container(&self) -> Option<Serial> {
        match self.relation {
            Relation::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn equipped(&self) -> Option<(Serial, Layer)> {
        match self.relation {
            Relation::Equipped { owner, layer } => Some((owner, layer)),
            _ => None,
        }
    }

    /// Layer the object is worn on
    pub fn layer(&self) -> Option<Layer> {
        self.equipped().map(|(_, layer)| layer)
    }

    /// Serials of everything inside or worn by this object
    pub fn children(&self) -> &[Serial] {
        &self.children
    }

    /// Quantity used for counting, an unstacked item counts as one
    pub fn count(&self) -> u32 {
        self.quantity.max(1) as u32
    }

    /// Whether the object has the graphic and, if given, the colour
    pub fn matches(&self, graphic: u16, colour: Option<u16>) -> bool {
        self.graphic == graphic && colour.map_or(true, |colour| self.colour == colour)
    }
}
