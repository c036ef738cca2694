//! Balloon Dash - a single-screen side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, collisions, cleanup)
//! - `session`: Binds the simulation to a rendering sink and input events
//! - `render`: Rendering sink abstraction plus a headless backend
//! - `config`: Data-driven game tuning and variant presets

pub mod config;
pub mod render;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig, LiftMode, Span, Variant};
pub use render::{HeadlessSink, RenderSink, VisualHandle};
pub use session::{InputEvent, Schedule, Session};

/// Default tuning constants (the Classic variant)
pub mod consts {
    /// Player horizontal position (never changes, the world scrolls instead)
    pub const PLAYER_LEFT: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 200.0;
    pub const PLAYER_HEIGHT: f32 = 200.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.7;
    /// Upward velocity applied by a grounded jump
    pub const JUMP_POWER: f32 = 20.0;
    /// Leftward world displacement per tick
    pub const SCROLL_SPEED: f32 = 7.0;

    /// Every platform has the same thickness
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const COLLECTIBLE_SIZE: f32 = 50.0;
    /// Gap between a platform top and the collectible resting above it
    pub const COLLECTIBLE_CLEARANCE: f32 = 15.0;
    /// Generate ahead once the rightmost platform edge is this close to the viewport edge
    pub const GENERATION_LOOKAHEAD: f32 = 200.0;

    pub const CHEESE_POINTS: u64 = 10;
    pub const BALLOON_POINTS: u64 = 5;

    /// Held balloon sits this far below the top of the player
    pub const BALLOON_HOLD_OFFSET: f32 = 30.0;
    /// Fixed lift multiplier applied to gravity while holding a balloon
    pub const BALLOON_LIFT_MULTIPLIER: f32 = 1.3;
}
