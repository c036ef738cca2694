//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generate;
pub mod state;
pub mod tick;

pub use collision::{Aabb, landing_height};
pub use generate::{Placement, extend_world, maybe_extend, placement_for_roll, seed_world};
pub use state::{Entity, EntityId, EntityKind, GamePhase, GameState, Player};
pub use tick::{TickReport, tick};
