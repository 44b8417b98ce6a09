//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One step per animation frame, no wall-clock time
//! - Stable iteration order (platform list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod levels;
pub mod state;
pub mod tick;

pub use collision::{Contact, aabb_overlap, classify_contact, overlaps_platform};
pub use levels::{LEVEL_COUNT, Level};
pub use state::{
    Accessory, Customization, Facing, GameState, GameStatus, Helm, PALETTE, Platform,
    PlatformKind, Player,
};
pub use tick::{LossCause, Step, TickInput, TickOutcome, integrate_velocity, step_player, tick};
