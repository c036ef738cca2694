//! Procedural world generation
//!
//! The world is built one platform at a time. Each new platform sits a random gap past
//! the previous rightmost edge and may carry a cheese/bone resting on top or a balloon
//! floating high above it.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, GameState};
use crate::config::GameConfig;

/// What gets placed with a new platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Nothing,
    /// Cheese or bone resting on the platform
    Ground,
    /// Balloon floating above the platform
    Balloon,
}

/// Lower bounds of the Ground and Balloon bands within `[0, 1)`
///
/// With the default chances: `[0.7, 1)` is Ground, `[0.4, 0.7)` is Balloon and
/// `[0, 0.4)` is Nothing.
pub fn band_thresholds(config: &GameConfig) -> (f64, f64) {
    let ground = 1.0 - config.collectible_chance;
    let balloon = ground - config.balloon_chance;
    (ground, balloon)
}

/// Map a uniform roll in `[0, 1)` to a placement band
pub fn placement_for_roll(roll: f64, config: &GameConfig) -> Placement {
    let (ground, balloon) = band_thresholds(config);
    if roll >= ground {
        Placement::Ground
    } else if roll >= balloon {
        Placement::Balloon
    } else {
        Placement::Nothing
    }
}

/// Append one platform (and maybe a collectible) starting a gap past `after_x`
///
/// Returns the new platform's right edge.
pub fn extend_world(state: &mut GameState, after_x: f32) -> f32 {
    let width = state.config.platform_width.sample(&mut state.rng);
    let gap = state.config.platform_gap.sample(&mut state.rng);
    let bottom = state.config.platform_bottom.sample(&mut state.rng);
    let left = after_x + gap;
    let height = state.config.platform_height;

    let id = state.next_entity_id();
    state
        .world
        .push(Entity::platform(id, left, bottom, width, height));
    log::debug!(
        "Platform {} at x={:.0} y={:.0} w={:.0}",
        id,
        left,
        bottom,
        width
    );

    let roll: f64 = state.rng.random();
    let center_x = left + width / 2.0;
    match placement_for_roll(roll, &state.config) {
        Placement::Ground => {
            let kind = if state.rng.random_bool(0.5) {
                EntityKind::Cheese
            } else {
                EntityKind::Bone
            };
            let size = state.config.collectible_size;
            let item_bottom = bottom + height + state.config.collectible_clearance;
            let id = state.next_entity_id();
            state.world.push(Entity::collectible(
                id,
                kind,
                center_x - size / 2.0,
                item_bottom,
                size,
            ));
            log::debug!("{} {} above platform", kind.as_str(), id);
        }
        Placement::Balloon => {
            let size = state.config.balloon_size;
            let item_bottom = state.config.balloon_bottom.sample(&mut state.rng);
            let id = state.next_entity_id();
            state.world.push(Entity::collectible(
                id,
                EntityKind::Balloon,
                center_x - size / 2.0,
                item_bottom,
                size,
            ));
            log::debug!("balloon {} at y={:.0}", id, item_bottom);
        }
        Placement::Nothing => {}
    }

    left + width
}

/// Build the opening world: a full-width ground platform, then platforms until the world
/// spans `initial_span_factor` viewport widths
pub fn seed_world(state: &mut GameState, viewport: Vec2) {
    let id = state.next_entity_id();
    let height = state.config.platform_height;
    state
        .world
        .push(Entity::platform(id, 0.0, 0.0, viewport.x, height));

    let span = viewport.x * state.config.initial_span_factor;
    let mut current_x = viewport.x;
    while current_x < span {
        current_x = extend_world(state, current_x);
    }
}

/// Right edge of the rightmost platform (0 when there are none)
pub fn rightmost_platform_edge(state: &GameState) -> f32 {
    state
        .world
        .iter()
        .filter(|e| e.kind == EntityKind::Platform)
        .map(Entity::right)
        .fold(0.0, f32::max)
}

/// Generate one more platform if the world is about to run out ahead of the viewport
///
/// Returns whether anything was generated.
pub fn maybe_extend(state: &mut GameState, viewport: Vec2) -> bool {
    let rightmost = rightmost_platform_edge(state);
    if rightmost < viewport.x + state.config.lookahead {
        extend_world(state, rightmost);
        true
    } else {
        false
    }
}
