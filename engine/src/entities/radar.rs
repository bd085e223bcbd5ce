use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How far past the radar edge an aircraft may drift before it is turned back.
pub const BOUNDS_MARGIN: f32 = 50.0;
/// How far inside the margin a drifting aircraft is put back.
pub const BOUNDS_INSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radar {
  pub width: f32,
  pub height: f32,
}

impl Default for Radar {
  fn default() -> Self {
    Self {
      width: 800.0,
      height: 600.0,
    }
  }
}

impl Radar {
  pub fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  pub fn center(&self) -> Vec2 {
    Vec2::new(self.width * 0.5, self.height * 0.5)
  }

  pub fn is_out_of_bounds(&self, point: Vec2) -> bool {
    point.x < -BOUNDS_MARGIN
      || point.x > self.width + BOUNDS_MARGIN
      || point.y < -BOUNDS_MARGIN
      || point.y > self.height + BOUNDS_MARGIN
  }

  /// Moves an out-of-bounds point back inside the margin on whichever axes
  /// it escaped. In-bounds axes are left alone.
  pub fn pull_inside(&self, point: Vec2) -> Vec2 {
    let pull = |value: f32, max: f32| {
      if value < -BOUNDS_MARGIN {
        -BOUNDS_MARGIN + BOUNDS_INSET
      } else if value > max + BOUNDS_MARGIN {
        max + BOUNDS_MARGIN - BOUNDS_INSET
      } else {
        value
      }
    };

    Vec2::new(pull(point.x, self.width), pull(point.y, self.height))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingZone {
  pub center: Vec2,
  pub radius: f32,
}

impl LandingZone {
  /// Distance of the zone center above the bottom edge of the radar.
  pub const BOTTOM_OFFSET: f32 = 50.0;
  pub const DEFAULT_RADIUS: f32 = 80.0;

  /// The zone at the bottom middle of the radar.
  pub fn for_radar(radar: &Radar, radius: f32) -> Self {
    Self {
      center: Vec2::new(radar.width * 0.5, radar.height - Self::BOTTOM_OFFSET),
      radius,
    }
  }

  pub fn contains_point(&self, point: Vec2) -> bool {
    let distance = point.distance_squared(self.center);
    distance <= self.radius.powf(2.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_out_of_bounds_uses_margin() {
    let radar = Radar::default();

    assert!(!radar.is_out_of_bounds(Vec2::new(-50.0, 300.0)));
    assert!(radar.is_out_of_bounds(Vec2::new(-50.1, 300.0)));
    assert!(radar.is_out_of_bounds(Vec2::new(851.0, 300.0)));
    assert!(radar.is_out_of_bounds(Vec2::new(400.0, -51.0)));
    assert!(radar.is_out_of_bounds(Vec2::new(400.0, 651.0)));
    assert!(!radar.is_out_of_bounds(Vec2::new(400.0, 300.0)));
  }

  #[test]
  fn test_pull_inside() {
    let radar = Radar::default();

    assert_eq!(
      radar.pull_inside(Vec2::new(-60.0, 300.0)),
      Vec2::new(-40.0, 300.0)
    );
    assert_eq!(
      radar.pull_inside(Vec2::new(900.0, 700.0)),
      Vec2::new(840.0, 640.0)
    );
    assert_eq!(
      radar.pull_inside(Vec2::new(400.0, -80.0)),
      Vec2::new(400.0, -40.0)
    );
  }

  #[test]
  fn test_landing_zone_placement() {
    let zone = LandingZone::for_radar(&Radar::default(), 80.0);
    assert_eq!(zone.center, Vec2::new(400.0, 550.0));

    assert!(zone.contains_point(Vec2::new(400.0, 550.0)));
    assert!(zone.contains_point(Vec2::new(480.0, 550.0)));
    assert!(!zone.contains_point(Vec2::new(481.0, 550.0)));
  }
}
