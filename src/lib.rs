//! Stick Hero - a customizable stick figure platformer
//!
//! Core modules:
//! - `sim`: Frame-stepped physics, collisions and level data
//! - `input`: Held-key sampling
//! - `game`: Status machine driving level transitions, saves and narration
//! - `renderer`: WebGPU rendering pipeline
//! - `persistence`: Save/load of progress in LocalStorage
//! - `narration`: Text-generation requests reacting to game events
//! - `settings`: Persisted display and narration toggles

pub mod game;
pub mod input;
pub mod narration;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{App, Effect};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Downward acceleration (pixels/frame²)
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity set on jump (negative is up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Horizontal run speed (pixels/frame)
    pub const RUN_SPEED: f32 = 5.0;
    /// Horizontal velocity multiplier when no direction is held
    pub const FRICTION: f32 = 0.8;
    /// Velocity magnitude below which facing doesn't change
    pub const FACING_DEAD_ZONE: f32 = 0.1;

    /// World dimensions (origin top-left, y down)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Falling past this y ends the run
    pub const FALL_THRESHOLD: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: Vec2 = Vec2::new(30.0, 50.0);
    pub const SPAWN_POINT: Vec2 = Vec2::new(50.0, 500.0);

    /// Animation phase advances by |vx| * this per frame
    pub const ANIM_RATE: f32 = 0.1;
    /// Animation phase wraps at this value
    pub const ANIM_CYCLE: f32 = 10.0;

    /// First level of a fresh run
    pub const INITIAL_LEVEL: u32 = 1;
}
