//! Collision and geometry helpers
//!
//! Everything in the scene is an axis-aligned box anchored at its bottom-left
//! corner. The horizontal axis is cyclic: leaving one edge re-enters at the
//! other.

use glam::DVec2;

use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Box from bottom-left corner and size
    pub fn from_corner(corner: DVec2, size: DVec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    /// Strict overlap; boxes that only share an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Hitbox of the vehicle at `pos`
pub fn vehicle_box(pos: DVec2, tuning: &Tuning) -> Aabb {
    Aabb::from_corner(pos, DVec2::new(tuning.vehicle_width, tuning.vehicle_height))
}

/// Hitbox of the coin at `pos`
pub fn coin_box(pos: DVec2, tuning: &Tuning) -> Aabb {
    Aabb::from_corner(pos, DVec2::new(tuning.coin_width, tuning.coin_height))
}

/// Does a vehicle at `vehicle` touch a coin at `coin`
pub fn vehicle_coin_overlap(vehicle: DVec2, coin: DVec2, tuning: &Tuning) -> bool {
    vehicle_box(vehicle, tuning).overlaps(&coin_box(coin, tuning))
}

/// Wrap `x` into `[0, width)`
#[inline]
pub fn wrap(x: f64, width: f64) -> f64 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid of a tiny negative value can round up to exactly `width`
    if wrapped >= width { 0.0 } else { wrapped }
}

/// Next coin position after a collect-and-land cycle
pub fn next_coin_position(coin: DVec2, tuning: &Tuning) -> DVec2 {
    DVec2::new(
        (coin.x + 0.7 * tuning.scene_width) % (0.9 * tuning.scene_width),
        (coin.y + 0.25 * tuning.scene_height) % (0.9 * tuning.scene_height),
    )
}
