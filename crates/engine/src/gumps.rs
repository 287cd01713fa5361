//! Container graphics to container gumps
//!
//! The client picks the gump of a container it opens from the container's
//! graphic. `snoop` opens containers the server never opened, so it has to
//! make the same choice itself.

/// Gump of a backpack, used for unknown graphics
pub const GUMP_BACKPACK: u16 = 0x3c;

/// Gump id for a container graphic
pub fn gump_from_graphic(graphic: u16) -> u16 {
    match graphic {
        0x0e75 | 0x0e79 | 0x09b0 => GUMP_BACKPACK,
        0x0e76 => 0x3d,                            // leather bag
        0x0e77 | 0x0e7f | 0x0fae | 0x1ad7 | 0x1940 => 0x3e, // barrels and kegs
        0x0e7a => 0x3f,                            // square basket
        0x0990 | 0x09ac | 0x09b1 => 0x41,          // round baskets
        0x0e40 | 0x0e41 => 0x42,                   // metal and gold chest
        // 0x0e83 has always opened as a wooden box
        0x0e7d | 0x09aa | 0x0e83 => 0x43,
        0x0e3c..=0x0e3f | 0x0e7e | 0x09a9 => 0x44, // crates
        0x0a30 | 0x0a38 => 0x48,                   // fancy chest of drawers
        0x0e42 | 0x0e43 => 0x49,                   // wooden and gold chest
        0x0e7c | 0x09ab | 0x09b2 => 0x4a,          // silver chests, bank box
        0x0e80 | 0x09a8 => 0x4b,                   // brass and metal boxes
        0x0a97..=0x0a9e => 0x4d,                   // bookcases
        0x0a4c | 0x0a4d | 0x0a50 | 0x0a51 => 0x4e, // fancy armoires
        0x0a4e | 0x0a4f | 0x0a52 | 0x0a53 => 0x4f, // wooden armoires
        0x0a2c | 0x0a34 | 0x0a35 | 0x0a3c | 0x0a3d | 0x0a44 => 0x51, // dressers
        0x2006 => 0x09,                            // coffin
        _ => GUMP_BACKPACK,
    }
}
