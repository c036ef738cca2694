//! Demo-mode controller
//!
//! Plays the game by deciding each frame whether to press jump. Deterministic: the
//! decision depends only on the current state.

use super::state::{EntityKind, GameState};

/// Frames of scrolling left on the supporting platform before the autopilot jumps
const EDGE_MARGIN_TICKS: f32 = 3.0;

/// Height above a landing spot at which a held balloon is let go
const RELEASE_CLEARANCE: f32 = 40.0;

/// Decide whether to press jump this frame
pub fn wants_jump(state: &GameState) -> bool {
    if state.is_over() {
        return false;
    }
    let player = &state.player;

    if player.holding_balloon() {
        // Drop when something is below to land on, or before drifting off the top
        let landing_below = landing_top_below(state)
            .is_some_and(|top| player.bottom() >= top + RELEASE_CLEARANCE);
        let rising_too_far = player.bottom() > state.config.balloon_bottom.max;
        return landing_below || rising_too_far;
    }

    if !player.grounded {
        return false;
    }

    // Jump at the last moment before running out of platform
    let support_right = state
        .world
        .iter()
        .filter(|e| e.kind == EntityKind::Platform && e.top() == player.bottom())
        .filter(|e| player.aabb().overlaps_x(&e.aabb()))
        .map(|e| e.right())
        .fold(f32::MIN, f32::max);
    support_right - player.left() <= state.config.scroll_speed * EDGE_MARGIN_TICKS
}

/// Top of the highest platform under the player's center
fn landing_top_below(state: &GameState) -> Option<f32> {
    let center = state.player.left() + state.player.size.x / 2.0;
    state
        .world
        .iter()
        .filter(|e| e.kind == EntityKind::Platform)
        .filter(|e| e.pos.x <= center && e.right() >= center)
        .map(|e| e.top())
        .filter(|&top| top <= state.player.bottom())
        .reduce(f32::max)
}
