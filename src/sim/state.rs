//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; there is no global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::generate;
use crate::config::GameConfig;
use crate::render::VisualHandle;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Loop is advancing
    Running,
    /// Player fell below the world; frozen until restart
    GameOver,
}

pub type EntityId = u32;

/// World entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Cheese,
    Bone,
    Balloon,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Platform => "platform",
            EntityKind::Cheese => "cheese",
            EntityKind::Bone => "bone",
            EntityKind::Balloon => "balloon",
        }
    }

    pub fn is_collectible(&self) -> bool {
        !matches!(self, EntityKind::Platform)
    }
}

/// The player character
///
/// Never moves horizontally; the world scrolls past instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Bottom-left corner (x = left, y = bottom)
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    /// Balloon currently held. Refers into the world by id; the entity stays owned there.
    pub attached_balloon: Option<EntityId>,
}

impl Player {
    /// Player standing on the ground platform
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.player_left, config.platform_height),
            size: Vec2::new(config.player_width, config.player_height),
            vel_y: 0.0,
            grounded: true,
            attached_balloon: None,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn holding_balloon(&self) -> bool {
        self.attached_balloon.is_some()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_corner(self.pos, self.size)
    }
}

/// A platform or collectible in the scrolling world
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Bottom-left corner (x = left, y = bottom)
    pub pos: Vec2,
    /// Platforms have independent width; collectibles are square
    pub size: Vec2,
    /// Logically removed, waiting for the next cleanup pass
    pub consumed: bool,
    /// Visual owned by this entity, assigned when the frame is synced to a sink
    pub visual: Option<VisualHandle>,
}

impl Entity {
    pub fn platform(id: EntityId, left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Platform,
            pos: Vec2::new(left, bottom),
            size: Vec2::new(width, height),
            consumed: false,
            visual: None,
        }
    }

    pub fn collectible(id: EntityId, kind: EntityKind, left: f32, bottom: f32, size: f32) -> Self {
        debug_assert!(kind.is_collectible());
        Self {
            id,
            kind,
            pos: Vec2::new(left, bottom),
            size: Vec2::splat(size),
            consumed: false,
            visual: None,
        }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_corner(self.pos, self.size)
    }
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    /// Seed the current run was generated from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Ticks since the last (re)start
    pub time_ticks: u64,
    pub player: Player,
    /// Live entities in generation order
    pub world: Vec<Entity>,
    next_id: u32,
}

impl GameState {
    /// New session: ground platform plus a freshly generated stretch of world
    pub fn new(config: GameConfig, viewport: Vec2, seed: u64) -> Self {
        let mut state = Self::empty(config, seed);
        generate::seed_world(&mut state, viewport);
        state
    }

    /// Running state with the player placed but no world at all
    pub fn empty(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(&config);
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            player,
            world: Vec::new(),
            next_id: 1,
        }
    }

    /// Reinitialize for a new run
    ///
    /// Returns the previous entities so the caller can release their visuals.
    pub fn reset(&mut self, viewport: Vec2, seed: u64) -> Vec<Entity> {
        let previous = std::mem::take(&mut self.world);

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Running;
        self.score = 0;
        self.time_ticks = 0;
        self.player = Player::new(&self.config);
        self.next_id = 1;
        generate::seed_world(self, viewport);

        previous
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.world.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.world.iter_mut().find(|e| e.id == id)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Let go of the held balloon; it is consumed and removed on the next cleanup
    pub fn release_balloon(&mut self) -> bool {
        let Some(id) = self.player.attached_balloon.take() else {
            return false;
        };
        if let Some(balloon) = self.entity_mut(id) {
            balloon.consumed = true;
        }
        log::debug!("Balloon {} released", id);
        true
    }

    /// Apply a jump input; returns whether anything changed
    ///
    /// Releasing a held balloon takes priority over a ground jump. Airborne jumps and
    /// jumps after game over do nothing.
    pub fn jump(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        if self.release_balloon() {
            return true;
        }
        if self.player.grounded {
            self.player.vel_y = self.config.jump_power;
            self.player.grounded = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    fn balloon_state() -> GameState {
        let mut state = GameState::empty(GameConfig::default(), 1);
        let id = state.next_entity_id();
        state
            .world
            .push(Entity::collectible(id, EntityKind::Balloon, 125.0, 190.0, 50.0));
        state.player.attached_balloon = Some(id);
        state
    }

    #[test]
    fn test_new_state_starts_grounded() {
        let state = GameState::new(GameConfig::default(), VIEWPORT, 42);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.player.grounded);
        assert!(!state.player.holding_balloon());
        assert_eq!(state.player.pos, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_exactly_one_ground_platform() {
        let state = GameState::new(GameConfig::default(), VIEWPORT, 42);
        let grounds: Vec<_> = state
            .world
            .iter()
            .filter(|e| e.kind == EntityKind::Platform && e.pos.y == 0.0)
            .collect();
        assert_eq!(grounds.len(), 1);
        assert_eq!(grounds[0].pos.x, 0.0);
        assert_eq!(grounds[0].size.x, VIEWPORT.x);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut state = GameState::empty(GameConfig::default(), 1);
        assert!(state.jump());
        assert_eq!(state.player.vel_y, 20.0);
        assert!(!state.player.grounded);
    }

    #[test]
    fn test_airborne_jump_changes_nothing() {
        let mut state = GameState::empty(GameConfig::default(), 1);
        state.player.grounded = false;
        state.player.vel_y = -3.5;
        state.player.pos.y = 140.0;
        let before = state.player.clone();

        assert!(!state.jump());
        assert_eq!(state.player, before);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_jump_releases_balloon_first() {
        let mut state = balloon_state();
        state.player.grounded = true;
        let id = state.player.attached_balloon.unwrap();

        assert!(state.jump());
        assert!(!state.player.holding_balloon());
        assert!(state.entity(id).unwrap().consumed);
        // Releasing is the whole input: no ground jump on top of it
        assert_eq!(state.player.vel_y, 0.0);
        assert!(state.player.grounded);
    }

    #[test]
    fn test_jump_ignored_after_game_over() {
        let mut state = balloon_state();
        state.phase = GamePhase::GameOver;
        assert!(!state.jump());
        assert!(state.player.holding_balloon());
    }

    #[test]
    fn test_reset_returns_previous_world() {
        let mut state = GameState::new(GameConfig::default(), VIEWPORT, 3);
        state.score = 70;
        state.phase = GamePhase::GameOver;
        let old_len = state.world.len();

        let previous = state.reset(VIEWPORT, 4);
        assert_eq!(previous.len(), old_len);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.seed, 4);
        assert!(!state.world.is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = GameState::new(GameConfig::default(), VIEWPORT, 1);
        once.reset(VIEWPORT, 77);

        let mut twice = GameState::new(GameConfig::default(), VIEWPORT, 2);
        twice.score = 35;
        twice.reset(VIEWPORT, 77);
        twice.reset(VIEWPORT, 77);

        assert_eq!(once.score, twice.score);
        assert_eq!(once.player, twice.player);
        assert_eq!(once.world.len(), twice.world.len());
        for (a, b) in once.world.iter().zip(&twice.world) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.size, b.size);
        }
    }
}
