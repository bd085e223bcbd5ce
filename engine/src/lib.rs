pub mod command;
pub mod entities;
pub mod events;
pub mod game;
pub mod geometry;
pub mod parser;

pub use geometry::*;

pub const DEFAULT_TICK_RATE_TPS: usize = 20;

pub const UP: f32 = 0.0;
pub const DOWN: f32 = 180.0;
pub const LEFT: f32 = 270.0;
pub const RIGHT: f32 = 90.0;

pub fn heading_to_direction(heading: f32) -> &'static str {
  // Normalize the heading to be between 0 and 360
  let normalized_heading = normalize_angle(heading);

  match normalized_heading {
    h if h < 22.5 => "North",
    h if h < 67.5 => "Northeast",
    h if h < 112.5 => "East",
    h if h < 157.5 => "Southeast",
    h if h < 202.5 => "South",
    h if h < 247.5 => "Southwest",
    h if h < 292.5 => "West",
    h if h < 337.5 => "Northwest",
    _ => "North",
  }
}
