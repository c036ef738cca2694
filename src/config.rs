//! Game tuning and variant presets
//!
//! Every constant the simulation reads lives in [`GameConfig`], selected once when a
//! session starts. Configs can be loaded from JSON; missing fields fall back to the
//! Classic defaults.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("span `{name}` is empty or negative ({min}..{max})")]
    BadSpan { name: &'static str, min: f32, max: f32 },
    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("collectible chances must lie in [0, 1] and sum to at most 1 (got {collectible} + {balloon})")]
    BadChances { collectible: f64, balloon: f64 },
    #[error("expected balloon lift {lift} does not exceed gravity {gravity}")]
    WeakLift { lift: f32, gravity: f32 },
}

/// Half-open range `[min, max)` drawn uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)`; a degenerate span yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min < 0.0 || self.max <= self.min {
            return Err(ConfigError::BadSpan {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How a held balloon lifts the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LiftMode {
    /// Lift is always `gravity * multiplier`
    Fixed { multiplier: f32 },
    /// Lift is `gravity * m` with `m` redrawn every tick from `[min, max)`
    Jittered { min: f32, max: f32 },
}

impl LiftMode {
    /// Upward velocity added this tick
    pub fn lift<R: Rng + ?Sized>(&self, gravity: f32, rng: &mut R) -> f32 {
        match *self {
            LiftMode::Fixed { multiplier } => gravity * multiplier,
            LiftMode::Jittered { min, max } => gravity * Span::new(min, max).sample(rng),
        }
    }

    /// Mean lift per tick
    pub fn expected_lift(&self, gravity: f32) -> f32 {
        match *self {
            LiftMode::Fixed { multiplier } => gravity * multiplier,
            LiftMode::Jittered { min, max } => gravity * (min + max) * 0.5,
        }
    }
}

/// Named presets for the two shipped game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Classic,
    Breezy,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Breezy => "Breezy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "breezy" => Some(Variant::Breezy),
            _ => None,
        }
    }
}

/// All simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Player ===
    pub player_left: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub gravity: f32,
    pub jump_power: f32,

    // === World ===
    pub scroll_speed: f32,
    pub platform_height: f32,
    pub platform_width: Span,
    pub platform_gap: Span,
    /// Bottom edge of generated platforms
    pub platform_bottom: Span,
    /// Generate when the rightmost platform is within this distance of the viewport edge
    pub lookahead: f32,
    /// Initial world spans `viewport width * initial_span_factor`
    pub initial_span_factor: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    pub collectible_clearance: f32,
    /// Probability a platform carries a cheese or bone
    pub collectible_chance: f64,
    /// Probability a platform carries a balloon instead
    pub balloon_chance: f64,
    pub collectible_points: u64,

    // === Balloon ===
    pub balloon_size: f32,
    pub balloon_bottom: Span,
    pub balloon_points: u64,
    pub balloon_lift: LiftMode,
    pub balloon_pops_at_ceiling: bool,
    /// Held balloon bottom sits this far below the player's top
    pub balloon_hold_offset: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_left: PLAYER_LEFT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            gravity: GRAVITY,
            jump_power: JUMP_POWER,

            scroll_speed: SCROLL_SPEED,
            platform_height: PLATFORM_HEIGHT,
            platform_width: Span::new(150.0, 300.0),
            platform_gap: Span::new(150.0, 350.0),
            platform_bottom: Span::new(50.0, 200.0),
            lookahead: GENERATION_LOOKAHEAD,
            initial_span_factor: 2.0,

            collectible_size: COLLECTIBLE_SIZE,
            collectible_clearance: COLLECTIBLE_CLEARANCE,
            collectible_chance: 0.3,
            balloon_chance: 0.3,
            collectible_points: CHEESE_POINTS,

            balloon_size: COLLECTIBLE_SIZE,
            balloon_bottom: Span::new(250.0, 450.0),
            balloon_points: BALLOON_POINTS,
            balloon_lift: LiftMode::Fixed {
                multiplier: BALLOON_LIFT_MULTIPLIER,
            },
            balloon_pops_at_ceiling: false,
            balloon_hold_offset: BALLOON_HOLD_OFFSET,
        }
    }
}

impl GameConfig {
    /// Create a config from a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::default(),
            Variant::Breezy => Self {
                collectible_size: 40.0,
                balloon_size: 60.0,
                balloon_lift: LiftMode::Jittered { min: 1.1, max: 1.5 },
                balloon_pops_at_ceiling: true,
                ..Self::default()
            },
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("jump_power", self.jump_power),
            ("scroll_speed", self.scroll_speed),
            ("platform_height", self.platform_height),
            ("collectible_size", self.collectible_size),
            ("balloon_size", self.balloon_size),
            ("initial_span_factor", self.initial_span_factor),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        self.platform_width.check("platform_width")?;
        self.platform_gap.check("platform_gap")?;
        self.platform_bottom.check("platform_bottom")?;
        self.balloon_bottom.check("balloon_bottom")?;

        let chance_ok = |c: f64| (0.0..=1.0).contains(&c);
        if !chance_ok(self.collectible_chance)
            || !chance_ok(self.balloon_chance)
            || self.collectible_chance + self.balloon_chance > 1.0
        {
            return Err(ConfigError::BadChances {
                collectible: self.collectible_chance,
                balloon: self.balloon_chance,
            });
        }

        if let LiftMode::Jittered { min, max } = self.balloon_lift {
            if max <= min {
                return Err(ConfigError::BadSpan {
                    name: "balloon_lift",
                    min,
                    max,
                });
            }
        }
        let lift = self.balloon_lift.expected_lift(self.gravity);
        if lift <= self.gravity {
            return Err(ConfigError::WeakLift {
                lift,
                gravity: self.gravity,
            });
        }

        Ok(())
    }

    /// Net upward acceleration per tick while holding a balloon (on average)
    pub fn net_balloon_ascent(&self) -> f32 {
        self.balloon_lift.expected_lift(self.gravity) - self.gravity
    }
}
