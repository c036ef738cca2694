//! Game session: simulation state bound to a rendering sink
//!
//! The session owns the [`GameState`] and the sink. Input events are applied between
//! frames, each frame runs one simulation tick and then syncs the sink in a single batch.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::render::{RenderSink, VisualHandle};
use crate::sim::{EntityKind, GameState, tick};

/// Discrete inputs from the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Jump,
    /// Tap or click anywhere in the play area; same as `Jump`
    PrimaryAction,
    Restart,
    /// Single "action" key: restarts after game over, jumps otherwise
    Activate,
}

/// Whether the caller should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    NextFrame,
    Stop,
}

/// A play-through bound to a rendering sink
pub struct Session<R: RenderSink> {
    state: GameState,
    sink: R,
    player_visual: VisualHandle,
    /// Source of seeds for restarts
    seeder: Pcg32,
}

impl<R: RenderSink> Session<R> {
    /// Start a session; the first world is generated from `seed`
    pub fn new(config: GameConfig, mut sink: R, seed: u64) -> Self {
        let viewport = sink.viewport();
        let state = GameState::new(config, viewport, seed);
        let player = &state.player;
        let player_visual = sink.create_player_visual(player.size, player.left(), player.bottom());

        let mut session = Self {
            state,
            sink,
            player_visual,
            seeder: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
        };
        session.sync_visuals();
        session.sink.set_score_text(0);
        session.sink.hide_game_over();

        log::info!(
            "Session started: seed {}, viewport {}x{}, {} entities",
            seed,
            viewport.x,
            viewport.y,
            session.state.world.len()
        );
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn player_visual(&self) -> &VisualHandle {
        &self.player_visual
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Apply an input event; returns whether it changed anything
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Jump | InputEvent::PrimaryAction => self.state.jump(),
            InputEvent::Restart => {
                self.restart();
                true
            }
            InputEvent::Activate => {
                if self.state.is_over() {
                    self.restart();
                    true
                } else {
                    self.state.jump()
                }
            }
        }
    }

    /// Start over with a fresh world
    pub fn restart(&mut self) {
        let seed = self.seeder.next_u64();
        self.restart_with_seed(seed);
    }

    /// Start over with a world generated from `seed`
    ///
    /// Safe in any phase. Every visual of the previous run is released before the new
    /// world is created.
    pub fn restart_with_seed(&mut self, seed: u64) {
        let viewport = self.sink.viewport();
        let previous = self.state.reset(viewport, seed);
        let released = previous.len();
        for entity in previous {
            if let Some(handle) = entity.visual {
                self.sink.remove(handle);
            }
        }

        self.sync_visuals();
        self.sink.set_score_text(0);
        self.sink.hide_game_over();
        self.sink.set_visible(&self.player_visual, true);

        log::info!(
            "Session restarted: seed {}, released {} entities",
            seed,
            released
        );
    }

    /// Run one frame
    ///
    /// Returns [`Schedule::NextFrame`] while running; the caller must request the next
    /// frame itself. After game over the loop stays frozen until a restart.
    pub fn frame(&mut self) -> Schedule {
        if self.state.is_over() {
            return Schedule::Stop;
        }

        let viewport = self.sink.viewport();
        let report = tick(&mut self.state, viewport);

        for entity in report.removed {
            if let Some(handle) = entity.visual {
                self.sink.remove(handle);
            }
        }
        self.sync_visuals();

        if report.score_changed {
            self.sink.set_score_text(self.state.score);
        }

        if report.game_over {
            self.sink.show_game_over(self.state.score);
            self.sink.set_visible(&self.player_visual, false);
            return Schedule::Stop;
        }
        Schedule::NextFrame
    }

    /// Run frames until game over or `max_frames`, asking `controller` for input before
    /// each frame. Returns the number of frames run.
    pub fn run<F>(&mut self, max_frames: u64, mut controller: F) -> u64
    where
        F: FnMut(&GameState) -> Option<InputEvent>,
    {
        let mut frames = 0;
        while frames < max_frames {
            if let Some(event) = controller(&self.state) {
                self.handle_input(event);
            }
            frames += 1;
            if self.frame() == Schedule::Stop {
                break;
            }
        }
        frames
    }

    /// Hand the sink back, releasing every visual the session still owns
    pub fn into_sink(mut self) -> R {
        for entity in self.state.world.drain(..) {
            if let Some(handle) = entity.visual {
                self.sink.remove(handle);
            }
        }
        self.sink.remove(self.player_visual);
        self.sink
    }

    /// Create visuals for new entities and push positions for the rest
    fn sync_visuals(&mut self) {
        for entity in &mut self.state.world {
            let Vec2 { x: left, y: bottom } = entity.pos;
            match &entity.visual {
                Some(handle) => self.sink.set_position(handle, left, bottom),
                None => {
                    let handle = match entity.kind {
                        EntityKind::Platform => self.sink.create_platform_visual(
                            entity.size.x,
                            entity.size.y,
                            left,
                            bottom,
                        ),
                        kind => self
                            .sink
                            .create_collectible_visual(kind, entity.size.x, left, bottom),
                    };
                    entity.visual = Some(handle);
                }
            }
        }

        let player = &self.state.player;
        self.sink
            .set_position(&self.player_visual, player.left(), player.bottom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::render::{HeadlessSink, VisualKind};
    use crate::sim::GamePhase;

    fn new_session(seed: u64) -> Session<HeadlessSink> {
        Session::new(
            GameConfig::default(),
            HeadlessSink::new(1280.0, 720.0),
            seed,
        )
    }

    /// One visual per live entity plus the player
    fn assert_no_leaks(session: &Session<HeadlessSink>) {
        assert_eq!(session.sink().live_count(), session.state().world.len() + 1);
        assert!(session.state().world.iter().all(|e| e.visual.is_some()));
    }

    fn run_until_over(session: &mut Session<HeadlessSink>) {
        for _ in 0..10_000 {
            if session.frame() == Schedule::Stop {
                return;
            }
        }
        panic!("session never ended");
    }

    #[test]
    fn test_new_session_creates_visuals() {
        let session = new_session(1);
        assert_no_leaks(&session);
        assert_eq!(session.sink().score_text, "Score: 0");
        assert_eq!(session.sink().game_over, None);

        let player = session.sink().visual(session.player_visual()).unwrap();
        assert_eq!(player.kind, VisualKind::Player);
        assert_eq!(player.pos, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_frames_keep_sink_in_sync() {
        let mut session = new_session(2);
        for _ in 0..150 {
            if session.frame() == Schedule::Stop {
                break;
            }
            assert_no_leaks(&session);
            for entity in &session.state().world {
                let handle = entity.visual.as_ref().unwrap();
                assert_eq!(session.sink().visual(handle).unwrap().pos, entity.pos);
            }
        }
    }

    #[test]
    fn test_game_over_screen() {
        let mut session = new_session(3);
        run_until_over(&mut session);

        assert!(session.is_over());
        let score = session.state().score;
        assert_eq!(session.sink().game_over, Some(score));
        let player = session.sink().visual(session.player_visual()).unwrap();
        assert!(!player.visible);

        // Frozen: further frames and jumps do nothing
        assert_eq!(session.frame(), Schedule::Stop);
        assert!(!session.handle_input(InputEvent::Jump));
        assert!(!session.handle_input(InputEvent::PrimaryAction));
    }

    #[test]
    fn test_restart_releases_everything() {
        let mut session = new_session(4);
        for _ in 0..60 {
            session.frame();
        }
        let created_before = session.sink().created;

        session.restart();
        assert_no_leaks(&session);
        assert!(session.sink().created > created_before);
        assert_eq!(session.state().phase, GamePhase::Running);
        assert_eq!(session.sink().score_text, "Score: 0");
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = new_session(5);
        run_until_over(&mut session);

        assert!(session.handle_input(InputEvent::Activate));
        assert!(!session.is_over());
        assert_eq!(session.sink().game_over, None);
        assert!(session.sink().visual(session.player_visual()).unwrap().visible);
        assert_eq!(session.frame(), Schedule::NextFrame);
        assert_no_leaks(&session);
    }

    #[test]
    fn test_activate_jumps_while_running() {
        let mut session = new_session(6);
        assert!(session.handle_input(InputEvent::Activate));
        assert_eq!(session.state().player.vel_y, 20.0);
        // Already airborne
        assert!(!session.handle_input(InputEvent::Jump));
    }

    #[test]
    fn test_restart_twice_matches_once() {
        let mut once = new_session(7);
        once.restart_with_seed(99);

        let mut twice = new_session(8);
        twice.frame();
        twice.restart_with_seed(99);
        twice.restart_with_seed(99);

        let (a, b) = (once.state(), twice.state());
        assert_eq!(a.score, 0);
        assert_eq!(b.score, 0);
        assert!(b.player.grounded);
        assert!(!b.player.holding_balloon());
        assert_eq!(a.player, b.player);
        assert_eq!(a.world.len(), b.world.len());
        for (x, y) in a.world.iter().zip(&b.world) {
            assert_eq!((x.kind, x.pos, x.size), (y.kind, y.pos, y.size));
        }
        assert_eq!(once.sink().live_count(), twice.sink().live_count());
        assert_no_leaks(&twice);
    }

    #[test]
    fn test_score_text_follows_pickups() {
        let mut session = new_session(9);
        let id = session.state.next_entity_id();
        session.state.world.push(crate::sim::Entity::collectible(
            id,
            EntityKind::Cheese,
            120.0,
            60.0,
            50.0,
        ));

        session.frame();
        assert_eq!(session.state().score, 10);
        assert_eq!(session.sink().score_text, "Score: 10");

        // Consumed cheese is pruned and its visual released
        session.frame();
        assert!(session.state().entity(id).is_none());
        assert_no_leaks(&session);
    }

    #[test]
    fn test_restart_while_holding_balloon() {
        let mut session = new_session(11);
        let id = session.state.next_entity_id();
        session.state.world.push(crate::sim::Entity::collectible(
            id,
            EntityKind::Balloon,
            120.0,
            150.0,
            50.0,
        ));

        session.frame();
        assert_eq!(session.state().player.attached_balloon, Some(id));
        for _ in 0..10 {
            session.frame();
        }
        assert!(session.state().player.holding_balloon());

        session.restart();
        assert!(!session.state().player.holding_balloon());
        assert_eq!(session.state().score, 0);
        assert_no_leaks(&session);
    }

    #[test]
    fn test_run_with_controller() {
        let mut session = Session::new(
            GameConfig::from_variant(Variant::Breezy),
            HeadlessSink::new(1280.0, 720.0),
            10,
        );
        let frames = session.run(300, |state| {
            crate::sim::autopilot::wants_jump(state).then_some(InputEvent::Jump)
        });
        assert!(frames > 0 && frames <= 300);
        assert_no_leaks(&session);
    }

    #[test]
    fn test_into_sink_releases_all() {
        let mut session = new_session(12);
        for _ in 0..20 {
            session.frame();
        }
        let sink = session.into_sink();
        assert_eq!(sink.live_count(), 0);
        assert_eq!(sink.created, sink.removed);
    }
}
