//! Rendering sink abstraction
//!
//! The simulation never draws anything itself. A session computes the new frame and then
//! issues one batch of calls against a [`RenderSink`]. Coordinates are in world units with
//! the origin at the bottom-left corner of the viewport (`left`, `bottom`).

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::EntityKind;

/// Opaque handle to a visual element owned by the sink
///
/// Deliberately neither `Clone` nor `Copy`: whoever holds the handle owns the visual, and
/// giving it back through [`RenderSink::remove`] consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct VisualHandle(u32);

impl VisualHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Everything the simulation needs from a display backend
pub trait RenderSink {
    /// Current viewport size (width, height)
    fn viewport(&self) -> Vec2;

    fn create_player_visual(&mut self, size: Vec2, left: f32, bottom: f32) -> VisualHandle;

    fn create_platform_visual(
        &mut self,
        width: f32,
        height: f32,
        left: f32,
        bottom: f32,
    ) -> VisualHandle;

    /// Collectibles are square (`size` x `size`)
    fn create_collectible_visual(
        &mut self,
        kind: EntityKind,
        size: f32,
        left: f32,
        bottom: f32,
    ) -> VisualHandle;

    fn set_position(&mut self, handle: &VisualHandle, left: f32, bottom: f32);

    /// Release a visual. Each handle is released exactly once.
    fn remove(&mut self, handle: VisualHandle);

    fn set_visible(&mut self, handle: &VisualHandle, visible: bool);

    fn set_score_text(&mut self, score: u64);

    fn show_game_over(&mut self, final_score: u64);

    fn hide_game_over(&mut self);
}

/// What a headless visual represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Player,
    Platform,
    Collectible(EntityKind),
}

/// Last known state of a headless visual
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRecord {
    pub kind: VisualKind,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub visible: bool,
}

/// In-memory sink that records every call
///
/// Used by the native runner and as the test double for session tests.
#[derive(Debug, Clone)]
pub struct HeadlessSink {
    viewport: Vec2,
    next_id: u32,
    visuals: HashMap<u32, VisualRecord>,
    /// Total visuals ever created
    pub created: usize,
    /// Total visuals released
    pub removed: usize,
    /// Number of `set_position` calls
    pub position_updates: usize,
    pub score_text: String,
    /// Final score while the game-over screen is shown
    pub game_over: Option<u64>,
}

impl HeadlessSink {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            next_id: 1,
            visuals: HashMap::new(),
            created: 0,
            removed: 0,
            position_updates: 0,
            score_text: String::new(),
            game_over: None,
        }
    }

    /// Simulate a window resize
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Number of visuals currently alive
    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn visual(&self, handle: &VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&handle.0)
    }

    pub fn visuals(&self) -> impl Iterator<Item = &VisualRecord> {
        self.visuals.values()
    }

    fn insert(&mut self, kind: VisualKind, pos: Vec2, size: Vec2) -> VisualHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.visuals.insert(
            id,
            VisualRecord {
                kind,
                pos,
                size,
                visible: true,
            },
        );
        VisualHandle(id)
    }
}

impl RenderSink for HeadlessSink {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn create_player_visual(&mut self, size: Vec2, left: f32, bottom: f32) -> VisualHandle {
        self.insert(VisualKind::Player, Vec2::new(left, bottom), size)
    }

    fn create_platform_visual(
        &mut self,
        width: f32,
        height: f32,
        left: f32,
        bottom: f32,
    ) -> VisualHandle {
        self.insert(
            VisualKind::Platform,
            Vec2::new(left, bottom),
            Vec2::new(width, height),
        )
    }

    fn create_collectible_visual(
        &mut self,
        kind: EntityKind,
        size: f32,
        left: f32,
        bottom: f32,
    ) -> VisualHandle {
        self.insert(
            VisualKind::Collectible(kind),
            Vec2::new(left, bottom),
            Vec2::splat(size),
        )
    }

    fn set_position(&mut self, handle: &VisualHandle, left: f32, bottom: f32) {
        self.position_updates += 1;
        match self.visuals.get_mut(&handle.0) {
            Some(record) => record.pos = Vec2::new(left, bottom),
            None => log::warn!("set_position on unknown visual {}", handle.0),
        }
    }

    fn remove(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle.0).is_some() {
            self.removed += 1;
        } else {
            log::warn!("remove on unknown visual {}", handle.0);
        }
    }

    fn set_visible(&mut self, handle: &VisualHandle, visible: bool) {
        if let Some(record) = self.visuals.get_mut(&handle.0) {
            record.visible = visible;
        }
    }

    fn set_score_text(&mut self, score: u64) {
        self.score_text = format!("Score: {}", score);
    }

    fn show_game_over(&mut self, final_score: u64) {
        self.game_over = Some(final_score);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_tracks_lifecycle() {
        let mut sink = HeadlessSink::new(800.0, 600.0);
        let platform = sink.create_platform_visual(200.0, 20.0, 10.0, 0.0);
        let cheese = sink.create_collectible_visual(EntityKind::Cheese, 50.0, 60.0, 35.0);
        assert_eq!(sink.live_count(), 2);

        sink.set_position(&platform, 3.0, 0.0);
        assert_eq!(sink.visual(&platform).unwrap().pos, Vec2::new(3.0, 0.0));
        assert_eq!(
            sink.visual(&cheese).unwrap().kind,
            VisualKind::Collectible(EntityKind::Cheese)
        );

        sink.remove(cheese);
        assert_eq!(sink.live_count(), 1);
        assert_eq!(sink.created, 2);
        assert_eq!(sink.removed, 1);
    }

    #[test]
    fn test_headless_hud() {
        let mut sink = HeadlessSink::new(800.0, 600.0);
        sink.set_score_text(15);
        assert_eq!(sink.score_text, "Score: 15");

        sink.show_game_over(15);
        assert_eq!(sink.game_over, Some(15));
        sink.hide_game_over();
        assert_eq!(sink.game_over, None);
    }

    #[test]
    fn test_headless_visibility() {
        let mut sink = HeadlessSink::new(800.0, 600.0);
        let player = sink.create_player_visual(Vec2::splat(200.0), 50.0, 20.0);
        sink.set_visible(&player, false);
        assert!(!sink.visual(&player).unwrap().visible);
    }
}
