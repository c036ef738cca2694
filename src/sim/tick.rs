//! Per-frame simulation tick
//!
//! One call advances the session by exactly one frame, in this order: physics, scroll,
//! generation, cleanup, platform landing, collectible pickup, balloon ceiling pop, held
//! balloon tracking, terminal check. Rendering is left to the caller.

use glam::Vec2;

use super::collision::{exceeds_ceiling, fell_out, landing_height};
use super::generate;
use super::state::{Entity, EntityKind, GamePhase, GameState};

/// What happened during a tick that the caller has to reflect on screen
#[derive(Debug, Default)]
pub struct TickReport {
    /// Entities pruned this tick; their visuals must be released
    pub removed: Vec<Entity>,
    /// New world content was generated
    pub generated: bool,
    pub score_changed: bool,
    /// The session ended on this tick
    pub game_over: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, viewport: Vec2) -> TickReport {
    let mut report = TickReport::default();
    if state.phase == GamePhase::GameOver {
        return report;
    }
    state.time_ticks += 1;

    let prev_bottom = apply_physics(state);
    scroll_world(state);
    report.generated = generate::maybe_extend(state, viewport);
    report.removed = prune(state);
    resolve_platforms(state, prev_bottom);
    report.score_changed = resolve_collectibles(state);

    if state.config.balloon_pops_at_ceiling
        && state.player.holding_balloon()
        && exceeds_ceiling(&state.player.aabb(), viewport.y)
    {
        log::debug!("Balloon popped at the ceiling");
        state.release_balloon();
    }
    carry_balloon(state);

    if fell_out(&state.player.aabb()) {
        state.phase = GamePhase::GameOver;
        report.game_over = true;
        log::info!(
            "Game over after {} ticks, score {}",
            state.time_ticks,
            state.score
        );
    }

    report
}

/// Gravity, balloon lift, then vertical integration
///
/// Returns the player's bottom from before the displacement.
fn apply_physics(state: &mut GameState) -> f32 {
    let prev_bottom = state.player.bottom();
    let gravity = state.config.gravity;
    state.player.vel_y -= gravity;
    if state.player.holding_balloon() {
        state.player.vel_y += state.config.balloon_lift.lift(gravity, &mut state.rng);
    }
    state.player.pos.y += state.player.vel_y;
    prev_bottom
}

/// Move everything left by the scroll speed; the held balloon follows the player instead
fn scroll_world(state: &mut GameState) {
    let speed = state.config.scroll_speed;
    let held = state.player.attached_balloon;
    for entity in state.world.iter_mut().filter(|e| Some(e.id) != held) {
        entity.pos.x -= speed;
    }
}

/// Remove entities that scrolled fully off the left edge or were consumed
///
/// The right edge must be strictly negative to prune. The held balloon is never pruned.
fn prune(state: &mut GameState) -> Vec<Entity> {
    let held = state.player.attached_balloon;
    let (removed, kept): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut state.world)
        .into_iter()
        .partition(|e| Some(e.id) != held && (e.right() < 0.0 || e.consumed));
    state.world = kept;

    if !removed.is_empty() {
        log::trace!("Pruned {} entities, {} live", removed.len(), state.world.len());
    }
    removed
}

/// Land on the highest platform whose top the player crossed this tick
///
/// Every platform is tested against the same pre-snap position, so iteration order does
/// not matter. Grounded is cleared first and only set again by an actual landing, so
/// walking off a platform makes the player airborne immediately.
fn resolve_platforms(state: &mut GameState, prev_bottom: f32) {
    let player = state.player.aabb();
    let vel_y = state.player.vel_y;

    state.player.grounded = false;

    let landing = state
        .world
        .iter()
        .filter(|e| e.kind == EntityKind::Platform)
        .filter_map(|e| landing_height(&player, prev_bottom, vel_y, &e.aabb()))
        .reduce(f32::max);

    if let Some(top) = landing {
        state.player.pos.y = top;
        state.player.vel_y = 0.0;
        state.player.grounded = true;
    }
}

/// Collect overlapping cheese/bone and grab an overlapping balloon if hands are free
fn resolve_collectibles(state: &mut GameState) -> bool {
    let player = state.player.aabb();
    let mut scored = false;

    for entity in state.world.iter_mut() {
        if entity.consumed || !entity.kind.is_collectible() || !player.overlaps(&entity.aabb()) {
            continue;
        }
        match entity.kind {
            EntityKind::Cheese | EntityKind::Bone => {
                entity.consumed = true;
                state.score += state.config.collectible_points;
                scored = true;
            }
            EntityKind::Balloon => {
                if state.player.attached_balloon.is_none() {
                    state.player.attached_balloon = Some(entity.id);
                    state.score += state.config.balloon_points;
                    scored = true;
                    log::debug!("Grabbed balloon {}", entity.id);
                }
            }
            EntityKind::Platform => {}
        }
    }

    scored
}

/// Keep the held balloon above the player's head
fn carry_balloon(state: &mut GameState) {
    let Some(id) = state.player.attached_balloon else {
        return;
    };
    let player_center = state.player.left() + state.player.size.x / 2.0;
    let bottom = state.player.top() - state.config.balloon_hold_offset;
    if let Some(balloon) = state.world.iter_mut().find(|e| e.id == id) {
        balloon.pos = Vec2::new(player_center - balloon.size.x / 2.0, bottom);
    }
}
