//! Balloon Dash entry point
//!
//! Runs a headless session under the autopilot and reports how it went.
//!
//! Usage: `balloon-dash [classic|breezy|<config.json>] [seed] [max_frames]`

fn main() {
    env_logger::init();
    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

mod native {
    use balloon_dash::sim::autopilot;
    use balloon_dash::{ConfigError, GameConfig, HeadlessSink, InputEvent, Session, Variant};

    const VIEWPORT_WIDTH: f32 = 1280.0;
    const VIEWPORT_HEIGHT: f32 = 720.0;
    const DEFAULT_SEED: u64 = 0x5EED;
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 5;

    /// First argument is a variant name or a path to a JSON config
    fn load_config(arg: Option<&String>) -> Result<GameConfig, ConfigError> {
        let Some(arg) = arg else {
            return Ok(GameConfig::default());
        };
        if let Some(variant) = Variant::from_str(arg) {
            log::info!("Using {} variant", variant.as_str());
            return Ok(GameConfig::from_variant(variant));
        }
        log::info!("Loading config from {}", arg);
        GameConfig::load(arg)
    }

    fn parse_number(arg: Option<&String>, default: u64) -> u64 {
        match arg.map(|s| s.parse::<u64>()) {
            Some(Ok(n)) => n,
            Some(Err(_)) => {
                log::warn!("Ignoring non-numeric argument, using {}", default);
                default
            }
            None => default,
        }
    }

    pub fn run(args: Vec<String>) -> Result<(), ConfigError> {
        let config = load_config(args.first())?;
        config.validate()?;
        let seed = parse_number(args.get(1), DEFAULT_SEED);
        let max_frames = parse_number(args.get(2), DEFAULT_MAX_FRAMES);

        log::info!("Balloon Dash (headless) starting...");
        let sink = HeadlessSink::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        let mut session = Session::new(config, sink, seed);

        let frames = session.run(max_frames, |state| {
            autopilot::wants_jump(state).then_some(InputEvent::Jump)
        });

        let state = session.state();
        let outcome = if state.is_over() { "game over" } else { "frame cap reached" };
        println!(
            "{} after {} frames ({:.1}s at 60 fps): score {}",
            outcome,
            frames,
            frames as f64 / 60.0,
            state.score
        );

        let sink = session.into_sink();
        log::info!(
            "Visuals created {}, released {}, position updates {}",
            sink.created,
            sink.removed,
            sink.position_updates
        );
        Ok(())
    }
}
