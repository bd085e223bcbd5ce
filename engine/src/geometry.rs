use core::ops::Range;
use std::f32::consts::PI;

use glam::Vec2;
use turborand::{TurboRand, rng::Rng};

/// Wraps an angle into `[0, 360)`.
pub fn normalize_angle(angle: f32) -> f32 {
  let angle = angle.rem_euclid(360.0);
  // `rem_euclid` rounds tiny negative inputs up to exactly 360.
  if angle >= 360.0 { 0.0 } else { angle }
}

/// The signed shortest turn from `current` to `target`, in `[-180, 180)`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
  ((target - current + 540.0) % 360.0) - 180.0
}

/// Moves a point along a heading on the radar screen, where 0 degrees is up
/// (towards negative y) and headings increase clockwise.
pub fn move_point(point: Vec2, degrees: f32, length: f32) -> Vec2 {
  let radians = degrees * (PI / 180.0);

  let x = length * radians.sin();
  let y = -length * radians.cos();

  point + Vec2::new(x, y)
}

/// The screen bearing from `a` to `b` (0 degrees is up, clockwise).
pub fn angle_between_points(a: Vec2, b: Vec2) -> f32 {
  let dx = b.x - a.x;
  let up = a.y - b.y;
  normalize_angle(dx.atan2(up).to_degrees())
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
  (a + b) * 0.5
}

pub fn random_in(rng: &mut Rng, range: Range<f32>) -> f32 {
  range.start + rng.f32() * (range.end - range.start)
}
