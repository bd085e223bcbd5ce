use glam::Vec2;
use internment::Intern;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use turborand::{TurboRand, rng::Rng};

use crate::{
  DOWN, LEFT, RIGHT, UP, angle_between_points,
  command::Task,
  entities::{
    aircraft::{Aircraft, CRITICAL_FUEL_LEVEL, MAX_LEVEL, MIN_LEVEL},
    radar::{LandingZone, Radar},
  },
  events::Event,
  midpoint, normalize_angle, random_in,
};

pub const INITIAL_LIVES: u32 = 3;
pub const INITIAL_POPULATION: usize = 8;
/// Starts past the first interval so a new aircraft spawns on the first tick.
pub const INITIAL_SPAWN_TIMER: f32 = 8.0;
pub const INITIAL_SPAWN_INTERVAL: f32 = 5.0;
pub const MIN_SPAWN_INTERVAL: f32 = 2.5;
/// Seconds of play per difficulty level.
pub const DIFFICULTY_PERIOD: f32 = 30.0;

pub const SPAWN_MARGIN: f32 = 100.0;
/// Minimum distance to any same-level aircraft when picking a spawn point.
pub const SPAWN_SEPARATION: f32 = 150.0;
pub const SPAWN_ATTEMPTS: usize = 10;
/// How far a new aircraft's heading may stray from straight inwards.
pub const SPAWN_SPREAD: f32 = 45.0;

pub const SELECTION_RADIUS: f32 = 30.0;
pub const FLASH_DURATION: f32 = 1.0;

pub const LANDING_POINTS: u32 = 100;
pub const FUEL_POINTS: u32 = 2;
pub const EMERGENCY_LANDING_BONUS: u32 = 200;
pub const CRASH_PENALTY: u32 = 150;
pub const COLLISION_PENALTY: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  pub width: f32,
  pub height: f32,
  pub landing_zone_radius: f32,
  pub initial_population: usize,
  pub lives: u32,
}

impl Default for GameConfig {
  fn default() -> Self {
    let radar = Radar::default();
    Self {
      width: radar.width,
      height: radar.height,
      landing_zone_radius: LandingZone::DEFAULT_RADIUS,
      initial_population: INITIAL_POPULATION,
      lives: INITIAL_LIVES,
    }
  }
}

/// The on-screen marker left behind by a collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionFlash {
  pub pos: Vec2,
  pub time_remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
  pub score: u32,
  pub best_score: u32,
  pub elapsed_time: f32,
  pub planes_landed: u32,
  pub lives: u32,
  pub active_count: usize,
  pub difficulty: u32,
}

#[derive(Debug)]
pub struct Game {
  pub config: GameConfig,
  pub radar: Radar,
  pub landing_zone: LandingZone,

  pub aircraft: Vec<Aircraft>,
  pub flashes: Vec<CollisionFlash>,

  pub score: u32,
  pub best_score: u32,
  pub lives: u32,
  pub planes_landed: u32,

  pub elapsed_time: f32,
  pub difficulty: u32,
  pub spawn_timer: f32,
  pub spawn_interval: f32,
  pub game_over: bool,

  selected: Option<u32>,
  next_id: u32,
  events: Vec<Event>,
  rng: Rng,
}

impl Game {
  pub fn new(config: GameConfig, rng: Rng) -> Self {
    let radar = Radar::new(config.width, config.height);
    let mut game = Self {
      config,
      radar,
      landing_zone: LandingZone::for_radar(&radar, config.landing_zone_radius),

      aircraft: Vec::new(),
      flashes: Vec::new(),

      score: 0,
      best_score: 0,
      lives: config.lives,
      planes_landed: 0,

      elapsed_time: 0.0,
      difficulty: 1,
      spawn_timer: INITIAL_SPAWN_TIMER,
      spawn_interval: INITIAL_SPAWN_INTERVAL,
      game_over: false,

      selected: None,
      next_id: 1,
      events: Vec::new(),
      rng,
    };

    game.populate();
    game
  }

  fn populate(&mut self) {
    for _ in 0..self.config.initial_population {
      self.spawn_airplane();
    }
  }

  /// Restarts the session. Only the best score carries over.
  pub fn reset(&mut self) {
    self.ratchet_best_score();

    self.aircraft.clear();
    self.flashes.clear();
    self.events.clear();

    self.score = 0;
    self.lives = self.config.lives;
    self.planes_landed = 0;

    self.elapsed_time = 0.0;
    self.difficulty = 1;
    self.spawn_timer = INITIAL_SPAWN_TIMER;
    self.spawn_interval = INITIAL_SPAWN_INTERVAL;
    self.game_over = false;

    self.selected = None;
    self.next_id = 1;

    tracing::info!(best_score = self.best_score, "game reset");
    self.populate();
  }

  pub fn stats(&self) -> Stats {
    Stats {
      score: self.score,
      best_score: self.best_score.max(self.score),
      elapsed_time: self.elapsed_time,
      planes_landed: self.planes_landed,
      lives: self.lives,
      active_count: self.aircraft.len(),
      difficulty: self.difficulty,
    }
  }

  pub fn get(&self, id: u32) -> Option<&Aircraft> {
    self.aircraft.iter().find(|a| a.id == id)
  }

  pub fn get_mut(&mut self, id: u32) -> Option<&mut Aircraft> {
    self.aircraft.iter_mut().find(|a| a.id == id)
  }

  pub fn in_landing_zone(&self, aircraft: &Aircraft) -> bool {
    self.landing_zone.contains_point(aircraft.pos)
  }

  /// Adds an aircraft under a fresh id, which is returned.
  pub fn add_aircraft(&mut self, mut aircraft: Aircraft) -> u32 {
    aircraft.id = self.next_id;
    aircraft.selected = false;
    self.next_id += 1;

    self.events.push(Event::Spawned {
      id: aircraft.id,
      name: aircraft.name,
      level: aircraft.level,
    });

    let id = aircraft.id;
    self.aircraft.push(aircraft);
    id
  }

  fn remove(&mut self, id: u32) -> Option<Aircraft> {
    let index = self.aircraft.iter().position(|a| a.id == id)?;
    if self.selected == Some(id) {
      self.selected = None;
    }

    Some(self.aircraft.remove(index))
  }

  fn ratchet_best_score(&mut self) {
    self.best_score = self.best_score.max(self.score);
  }
}

// Tick
impl Game {
  /// Advances the game by `dt` seconds and returns what happened, including
  /// anything queued by commands since the last tick.
  pub fn update(&mut self, dt: f32) -> Vec<Event> {
    if self.game_over {
      return std::mem::take(&mut self.events);
    }

    self.elapsed_time += dt;
    self.spawn_timer += dt;

    self.update_difficulty();

    if self.spawn_timer >= self.spawn_interval {
      self.spawn_airplane();
      self.spawn_timer = 0.0;
    }

    self.update_aircraft(dt);
    self.check_collisions();
    self.update_flashes(dt);

    if self.lives == 0 {
      self.game_over = true;
      tracing::info!(score = self.score, "game over");
      self.events.push(Event::GameOver { score: self.score });
    }

    self.ratchet_best_score();
    tracing::trace!(
      elapsed = self.elapsed_time,
      active = self.aircraft.len(),
      "tick"
    );

    std::mem::take(&mut self.events)
  }

  fn update_difficulty(&mut self) {
    let difficulty = 1 + (self.elapsed_time / DIFFICULTY_PERIOD) as u32;
    if difficulty > self.difficulty {
      self.difficulty = difficulty;

      let interval = (7.0 - difficulty as f32 * 0.7).max(MIN_SPAWN_INTERVAL);
      self.spawn_interval = self.spawn_interval.min(interval);

      tracing::info!(
        difficulty,
        spawn_interval = self.spawn_interval,
        "difficulty increased"
      );
    }
  }

  fn update_aircraft(&mut self, dt: f32) {
    // Aircraft are removed as we go, so walk a snapshot of the ids.
    let ids: Vec<u32> = self.aircraft.iter().map(|a| a.id).collect();
    let center = self.radar.center();

    for id in ids {
      let Some(aircraft) = self.aircraft.iter_mut().find(|a| a.id == id)
      else {
        continue;
      };

      aircraft.update(dt);

      if aircraft.fuel <= 0.0 {
        self.handle_crash(id);
        continue;
      }

      if aircraft.is_landing() {
        let in_zone = self.landing_zone.contains_point(aircraft.pos);
        let at_level_1 = aircraft.level == MIN_LEVEL;

        if in_zone && at_level_1 {
          self.handle_landing(id);
          continue;
        } else if !in_zone && !at_level_1 {
          // An aircraft that climbs out while over the zone stays on
          // approach until it leaves the zone.
          aircraft.abort_landing();
          tracing::debug!(name = %aircraft.name, "approach aborted");
          self.events.push(Event::LandingAborted { id });
        }
      }

      if self.radar.is_out_of_bounds(aircraft.pos) {
        aircraft.pos = self.radar.pull_inside(aircraft.pos);
        aircraft.heading =
          normalize_angle(angle_between_points(aircraft.pos, center));
        aircraft.abort_landing();

        tracing::debug!(name = %aircraft.name, "turned back onto the radar");
        self.events.push(Event::Bounced { id });
      }
    }
  }

  fn check_collisions(&mut self) {
    let collisions: Vec<(u32, u32)> = self
      .aircraft
      .iter()
      .tuple_combinations()
      .filter(|(a, b)| a.is_too_close(b))
      .map(|(a, b)| (a.id, b.id))
      .collect();

    // Resolving a collision removes aircraft the later pairs may refer to,
    // so only one is resolved per tick.
    if let Some(&(a, b)) = collisions.first() {
      if collisions.len() > 1 {
        tracing::debug!(
          deferred = collisions.len() - 1,
          "more than one collision this tick"
        );
      }

      self.handle_collision(a, b);
    }
  }

  fn update_flashes(&mut self, dt: f32) {
    for flash in self.flashes.iter_mut() {
      flash.time_remaining -= dt;
    }

    self.flashes.retain(|f| f.time_remaining > 0.0);
  }
}

// Spawning
impl Game {
  /// Spawns an aircraft on a random edge, heading into the radar.
  pub fn spawn_airplane(&mut self) -> u32 {
    let mut candidate = self.random_spawn();
    let mut attempts = 1;
    while attempts < SPAWN_ATTEMPTS && self.spawn_conflicts(&candidate) {
      candidate = self.random_spawn();
      attempts += 1;
    }

    if self.spawn_conflicts(&candidate) {
      tracing::debug!(
        name = %candidate.name,
        "no clear spawn point after {SPAWN_ATTEMPTS} attempts"
      );
    }

    tracing::info!(
      name = %candidate.name,
      level = candidate.level,
      fuel = candidate.fuel,
      "aircraft spawned"
    );

    self.add_aircraft(candidate)
  }

  pub fn spawn_conflicts(&self, candidate: &Aircraft) -> bool {
    self.aircraft.iter().any(|a| {
      a.level == candidate.level
        && a.distance_to(candidate) < SPAWN_SEPARATION
    })
  }

  fn random_spawn(&mut self) -> Aircraft {
    let width = self.radar.width;
    let height = self.radar.height;
    let margin = SPAWN_MARGIN;

    let (x, y, heading) = match self.rng.u8(0..4) {
      0 => (
        random_in(&mut self.rng, margin..width - margin),
        margin,
        DOWN,
      ),
      1 => (
        width - margin,
        random_in(&mut self.rng, margin..height - margin),
        LEFT,
      ),
      2 => (
        random_in(&mut self.rng, margin..width - margin),
        height - margin,
        UP,
      ),
      _ => (
        margin,
        random_in(&mut self.rng, margin..height - margin),
        RIGHT,
      ),
    };
    let spread = random_in(&mut self.rng, -SPAWN_SPREAD..SPAWN_SPREAD);
    let heading = normalize_angle(heading + spread);

    let level = self.rng.u8(MIN_LEVEL..=MAX_LEVEL);
    let speed = self.rng.u16(200..=400) as f32;
    let mut fuel = self.rng.u8(60..=100) as f32;

    // Low-fuel arrivals get more likely as the game goes on.
    if self.rng.chance((0.01 * self.difficulty as f64).min(1.0)) {
      fuel = self.rng.u8(5..=20) as f32;
    }

    let name = Intern::from(Aircraft::random_name(&mut self.rng));
    Aircraft::new(name, Vec2::new(x, y), level, speed, heading, fuel)
  }
}

// Outcomes
impl Game {
  /// Removes a landed aircraft and awards points for the fuel it saved.
  pub fn handle_landing(&mut self, id: u32) -> Option<u32> {
    let aircraft = self.remove(id)?;
    self.planes_landed += 1;

    let mut points = LANDING_POINTS + aircraft.fuel.floor() as u32 * FUEL_POINTS;
    if aircraft.fuel <= CRITICAL_FUEL_LEVEL {
      points += EMERGENCY_LANDING_BONUS;
    }

    self.score = self.score.saturating_add(points);
    self.ratchet_best_score();

    tracing::info!(
      name = %aircraft.name,
      points,
      score = self.score,
      "aircraft landed"
    );
    self.events.push(Event::Landed {
      id,
      name: aircraft.name,
      points,
    });

    Some(points)
  }

  /// Removes an aircraft that ran out of fuel.
  pub fn handle_crash(&mut self, id: u32) {
    let Some(aircraft) = self.remove(id) else {
      return;
    };

    self.lives = self.lives.saturating_sub(1);
    self.score = self.score.saturating_sub(CRASH_PENALTY);

    tracing::info!(
      name = %aircraft.name,
      lives = self.lives,
      "aircraft ran out of fuel"
    );
    self.events.push(Event::Crashed {
      id,
      name: aircraft.name,
    });
  }

  /// Removes both aircraft of a collision. The pair costs a single life,
  /// which is still charged if one of them is already gone. Does nothing
  /// when neither exists.
  pub fn handle_collision(&mut self, a: u32, b: u32) {
    let involved: Vec<(Vec2, Intern<String>, u8)> = [a, b]
      .iter()
      .filter_map(|id| self.get(*id))
      .map(|aircraft| (aircraft.pos, aircraft.name, aircraft.level))
      .collect();

    let (pos, level) = match involved.as_slice() {
      [] => return,
      [(first, _, level), (second, ..)] => (midpoint(*first, *second), *level),
      [(only, _, level), ..] => (*only, *level),
    };
    let names: Vec<Intern<String>> =
      involved.iter().map(|(_, name, _)| *name).collect();

    self.flashes.push(CollisionFlash {
      pos,
      time_remaining: FLASH_DURATION,
    });

    self.remove(a);
    self.remove(b);

    self.lives = self.lives.saturating_sub(1);
    self.score = self.score.saturating_sub(COLLISION_PENALTY);

    tracing::info!(
      ?names,
      level,
      lives = self.lives,
      "collision"
    );
    self.events.push(Event::Collided {
      ids: (a, b),
      names,
      pos,
      level,
    });
  }
}

// Commands
impl Game {
  pub fn spawn(&mut self) -> u32 {
    self.spawn_airplane()
  }

  /// Selects the closest aircraft within [`SELECTION_RADIUS`] of `point`, or
  /// clears the selection if there is none.
  pub fn select_airplane(&mut self, point: Vec2) -> Option<&Aircraft> {
    for aircraft in self.aircraft.iter_mut() {
      aircraft.selected = false;
    }

    let closest = self
      .aircraft
      .iter_mut()
      .map(|a| (a.pos.distance(point), a))
      .filter(|(distance, _)| *distance < SELECTION_RADIUS)
      .min_by(|(a, _), (b, _)| a.total_cmp(b))
      .map(|(_, a)| a);

    match closest {
      Some(aircraft) => {
        aircraft.selected = true;
        self.selected = Some(aircraft.id);
        Some(&*aircraft)
      }
      None => {
        self.selected = None;
        None
      }
    }
  }

  pub fn select_at(&mut self, x: f32, y: f32) -> Option<&Aircraft> {
    self.select_airplane(Vec2::new(x, y))
  }

  pub fn selected(&self) -> Option<&Aircraft> {
    self.selected.and_then(|id| self.get(id))
  }

  fn selected_mut(&mut self) -> Option<&mut Aircraft> {
    let id = self.selected?;
    self.get_mut(id)
  }

  fn with_selected(&mut self, f: impl FnOnce(&mut Aircraft)) -> bool {
    match self.selected_mut() {
      Some(aircraft) => {
        f(aircraft);
        true
      }
      None => false,
    }
  }

  pub fn climb(&mut self) -> bool {
    self.with_selected(Aircraft::climb)
  }

  pub fn descend(&mut self) -> bool {
    self.with_selected(Aircraft::descend)
  }

  /// Toggles an approach to the landing zone. False when nothing is
  /// selected or the selection is above level 1.
  pub fn land(&mut self) -> bool {
    let target = self.landing_zone.center;
    self.selected_mut().is_some_and(|a| a.land(target))
  }

  pub fn hold(&mut self) -> bool {
    self.with_selected(Aircraft::hold)
  }

  pub fn change_heading(&mut self, heading: f32) -> bool {
    self.with_selected(|a| a.change_heading(heading))
  }

  pub fn change_speed(&mut self, speed: f32) -> bool {
    self.with_selected(|a| a.change_speed(speed))
  }

  /// Runs a parsed task. Returns whether it was accepted.
  pub fn apply(&mut self, task: Task) -> bool {
    match task {
      Task::Climb => self.climb(),
      Task::Descend => self.descend(),
      Task::Land => self.land(),
      Task::Hold => self.hold(),
      Task::Heading(heading) => self.change_heading(heading),
      Task::Speed(speed) => self.change_speed(speed),
      Task::Select(point) => self.select_airplane(point).is_some(),
      Task::Spawn => {
        self.spawn();
        true
      }
      Task::Reset => {
        self.reset();
        true
      }
    }
  }
}
