use core::fmt;

use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};
use turborand::{TurboRand, rng::Rng};

use crate::{angle_between_points, delta_angle, move_point, normalize_angle};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 3;

/// In knots.
pub const MIN_SPEED: f32 = 150.0;
pub const MAX_SPEED: f32 = 500.0;

/// Percent of the tank burned per second (a full tank lasts about 70s).
pub const FUEL_CONSUMPTION_RATE: f32 = 1.43;
pub const CRITICAL_FUEL_LEVEL: f32 = 15.0;

pub const COLLISION_DISTANCE: f32 = 30.0;
pub const SAFE_DISTANCE: f32 = 80.0;

/// Degrees per update while turning onto the landing zone.
pub const TURN_RATE: f32 = 2.0;
/// Radar units travelled per knot per second.
pub const SPEED_SCALE: f32 = 0.1;

pub const AIRLINES: [&str; 7] = ["AFR", "BAW", "LH", "DLH", "UAE", "AAL", "UAL"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type", content = "value")]
pub enum AircraftState {
  #[default]
  Flying,
  /// Turning towards and flying to the landing target.
  Landing(Vec2),
  /// Out of the sky. Both fuel exhaustion and touchdown end here.
  Landed,
  Holding,
  Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
  FuelCritical,
  FuelExhausted,
  /// Toggles an approach to the given target.
  Land(Vec2),
  /// Toggles the hold.
  Hold,
  /// Explicit movement commands take an aircraft out of a hold.
  Resume,
  AbortLanding,
}

impl AircraftState {
  pub fn transition(self, transition: Transition) -> Self {
    match (self, transition) {
      (Self::Landed, _) => Self::Landed,

      (_, Transition::FuelExhausted) => Self::Landed,
      (_, Transition::FuelCritical) => Self::Emergency,

      (Self::Landing(_), Transition::Land(_)) => Self::Flying,
      (_, Transition::Land(target)) => Self::Landing(target),

      (Self::Holding, Transition::Hold) => Self::Flying,
      (_, Transition::Hold) => Self::Holding,

      (Self::Holding, Transition::Resume) => Self::Flying,
      (Self::Landing(_), Transition::AbortLanding) => Self::Flying,

      (state, Transition::Resume | Transition::AbortLanding) => state,
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Flying => "flying",
      Self::Landing(_) => "landing",
      Self::Landed => "landed",
      Self::Holding => "holding",
      Self::Emergency => "emergency",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
  pub id: u32,
  pub name: Intern<String>,

  pub pos: Vec2,
  pub level: u8,
  pub speed: f32,
  pub heading: f32,
  pub fuel: f32,

  pub state: AircraftState,
  pub has_emergency: bool,
  pub selected: bool,
}

impl Default for Aircraft {
  fn default() -> Self {
    Self {
      id: 0,
      name: Intern::from_ref(""),

      pos: Vec2::ZERO,
      level: MAX_LEVEL,
      speed: 250.0,
      heading: 0.0,
      fuel: 100.0,

      state: AircraftState::Flying,
      has_emergency: false,
      selected: false,
    }
  }
}

// Helper methods
impl Aircraft {
  pub fn new(
    name: Intern<String>,
    pos: Vec2,
    level: u8,
    speed: f32,
    heading: f32,
    fuel: f32,
  ) -> Self {
    Self {
      name,
      pos,
      level: level.clamp(MIN_LEVEL, MAX_LEVEL),
      speed: speed.clamp(MIN_SPEED, MAX_SPEED),
      heading: normalize_angle(heading),
      fuel: fuel.clamp(0.0, 100.0),
      ..Default::default()
    }
  }

  pub fn random_name(rng: &mut Rng) -> String {
    let airline = rng.sample(&AIRLINES).copied().unwrap_or(AIRLINES[0]);
    format!("{airline}{}", rng.u16(100..=999))
  }

  pub fn landing_target(&self) -> Option<Vec2> {
    match self.state {
      AircraftState::Landing(target) => Some(target),
      _ => None,
    }
  }

  pub fn is_landing(&self) -> bool {
    matches!(self.state, AircraftState::Landing(_))
  }

  pub fn is_landed(&self) -> bool {
    matches!(self.state, AircraftState::Landed)
  }

  fn apply(&mut self, transition: Transition) {
    self.state = self.state.transition(transition);
  }
}

// Simulation
impl Aircraft {
  pub fn update(&mut self, dt: f32) {
    if self.is_landed() {
      return;
    }

    let dt = dt.max(0.0);
    self.fuel = (self.fuel - FUEL_CONSUMPTION_RATE * dt).max(0.0);

    if self.fuel <= CRITICAL_FUEL_LEVEL && !self.has_emergency {
      self.has_emergency = true;
      self.apply(Transition::FuelCritical);
    }

    if self.fuel <= 0.0 {
      self.apply(Transition::FuelExhausted);
      return;
    }

    if matches!(self.state, AircraftState::Holding) {
      return;
    }

    if let Some(target) = self.landing_target() {
      self.turn_towards(target);
    }

    self.pos = move_point(self.pos, self.heading, self.speed * dt * SPEED_SCALE);
  }

  fn turn_towards(&mut self, target: Vec2) {
    let bearing = angle_between_points(self.pos, target);
    let delta = delta_angle(self.heading, bearing);

    if delta.abs() > TURN_RATE {
      self.heading = normalize_angle(self.heading + TURN_RATE * delta.signum());
    } else {
      self.heading = bearing;
    }
  }
}

// Commands
impl Aircraft {
  pub fn climb(&mut self) {
    if self.level < MAX_LEVEL {
      self.level += 1;
    }
    self.apply(Transition::Resume);
  }

  pub fn descend(&mut self) {
    if self.level > MIN_LEVEL {
      self.level -= 1;
    }
    self.apply(Transition::Resume);
  }

  /// Starts or cancels an approach. Only accepted at the lowest level.
  pub fn land(&mut self, target: Vec2) -> bool {
    if self.level != MIN_LEVEL {
      return false;
    }

    self.apply(Transition::Land(target));
    true
  }

  pub fn hold(&mut self) {
    self.apply(Transition::Hold);
  }

  pub fn abort_landing(&mut self) {
    self.apply(Transition::AbortLanding);
  }

  pub fn change_heading(&mut self, heading: f32) {
    self.heading = normalize_angle(heading);
    self.apply(Transition::Resume);
  }

  pub fn change_speed(&mut self, speed: f32) {
    self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
  }
}

// Proximity
impl Aircraft {
  pub fn is_in_danger(&self) -> bool {
    self.fuel <= CRITICAL_FUEL_LEVEL
      || matches!(self.state, AircraftState::Emergency)
  }

  pub fn distance_to(&self, other: &Aircraft) -> f32 {
    self.pos.distance(other.pos)
  }

  /// Close enough to collide. Aircraft on different levels never are.
  pub fn is_too_close(&self, other: &Aircraft) -> bool {
    self.level == other.level && self.distance_to(other) < COLLISION_DISTANCE
  }

  /// Close enough for a proximity warning.
  pub fn is_near(&self, other: &Aircraft) -> bool {
    self.level == other.level && self.distance_to(other) < SAFE_DISTANCE
  }
}

impl fmt::Display for Aircraft {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} - Level: {}, Speed: {}kts, Fuel: {}%, State: {}",
      self.name,
      self.level,
      self.speed as u32,
      self.fuel as u32,
      self.state.name()
    )
  }
}
