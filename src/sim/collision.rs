//! Axis-aligned collision tests
//!
//! The world uses a y-up coordinate system: `min` is the bottom-left corner.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its bottom-left corner and size
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    /// Horizontal ranges overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Interiors intersect on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max.y && self.max.y > other.min.y
    }
}

/// Check whether a player box lands on top of a platform this tick
///
/// `prev_bottom` is the player's bottom before this tick's vertical displacement. A
/// landing needs horizontal overlap, the current bottom inside the platform's vertical
/// band, non-upward motion, and a previous bottom at or above the platform top. That last
/// condition rejects hits from the side or from below.
///
/// Returns the height to snap the player's bottom to.
pub fn landing_height(player: &Aabb, prev_bottom: f32, vel_y: f32, platform: &Aabb) -> Option<f32> {
    let top = platform.max.y;
    let bottom = player.min.y;

    let in_band = bottom >= platform.min.y && bottom <= top;
    let from_above = vel_y <= 0.0 && prev_bottom >= top;

    (player.overlaps_x(platform) && in_band && from_above).then_some(top)
}

/// Player's top edge is above the viewport
#[inline]
pub fn exceeds_ceiling(player: &Aabb, viewport_height: f32) -> bool {
    player.max.y > viewport_height
}

/// Player has dropped fully below the bottom of the world
#[inline]
pub fn fell_out(player: &Aabb) -> bool {
    let height = player.max.y - player.min.y;
    player.min.y < -height
}
