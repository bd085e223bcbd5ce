use std::time::Duration;

use tokio::{
  sync::mpsc::{self, error::TryRecvError},
  time::MissedTickBehavior,
};

use engine::{
  command::Task,
  entities::aircraft::Aircraft,
  events::Event,
  game::Game,
  heading_to_direction,
};

use crate::request::{HELP, Request};

#[derive(Debug)]
pub struct Runner {
  pub game: Game,
  requests: mpsc::UnboundedReceiver<Request>,

  rate: usize,
  json: bool,
  ticks: u64,
}

impl Runner {
  pub fn new(
    game: Game,
    requests: mpsc::UnboundedReceiver<Request>,
    rate: usize,
    json: bool,
  ) -> Self {
    Self {
      game,
      requests,

      rate: rate.max(1),
      json,
      ticks: 0,
    }
  }

  /// The fixed step, regardless of how late a tick actually runs.
  pub fn dt(&self) -> f32 {
    1.0 / self.rate as f32
  }

  pub async fn begin_loop(&mut self) {
    let mut interval =
      tokio::time::interval(Duration::from_secs_f32(self.dt()));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
      interval.tick().await;
      if !self.tick() {
        break;
      }
    }

    tracing::info!("console closed, stopping");
  }

  /// Runs `ticks` steps back to back, ignoring the console. Stops early if
  /// the game ends.
  pub fn run_for(&mut self, ticks: u64) {
    for _ in 0..ticks {
      let events = self.game.update(self.dt());
      self.ticks += 1;
      self.report(&events);

      if self.game.game_over {
        break;
      }
    }

    tracing::info!(
      ticks = self.ticks,
      "done ({} simulated seconds)",
      self.game.elapsed_time.round()
    );
  }

  /// Applies everything typed since the last tick, then steps the game.
  /// Returns false once the console quits or hangs up.
  pub fn tick(&mut self) -> bool {
    loop {
      let request = match self.requests.try_recv() {
        Ok(request) => request,
        Err(TryRecvError::Empty) => break,
        Err(TryRecvError::Disconnected) => return false,
      };

      if !self.handle(request) {
        return false;
      }
    }

    let events = self.game.update(self.dt());
    self.ticks += 1;
    self.report(&events);

    if self.json && self.ticks % self.rate as u64 == 0 {
      self.print_stats();
    }

    true
  }

  fn handle(&mut self, request: Request) -> bool {
    match request {
      Request::Tasks(tasks) => {
        for task in tasks {
          self.execute_task(task);
        }
      }
      Request::Status => self.print_status(),
      Request::Help => println!("{HELP}"),
      Request::Quit => return false,
    }

    true
  }

  fn execute_task(&mut self, task: Task) {
    if task.needs_selection() && self.game.selected().is_none() {
      println!("no aircraft selected");
      return;
    }

    let accepted = self.game.apply(task);
    match task {
      Task::Select(point) => match self.game.selected() {
        Some(aircraft) => println!("selected {}", describe(aircraft)),
        None => println!("nothing near ({:.0}, {:.0})", point.x, point.y),
      },
      Task::Land if !accepted => {
        println!("unable, descend to level 1 before landing")
      }
      _ if accepted => {
        if let Some(aircraft) = self.game.selected() {
          println!("{}", describe(aircraft));
        }
      }
      _ => tracing::warn!(?task, "task was not accepted"),
    }
  }

  fn report(&self, events: &[Event]) {
    for event in events {
      match event {
        Event::Landed { name, points, .. } => {
          println!("{name} landed, +{points} (score {})", self.game.score)
        }
        Event::Crashed { name, .. } => {
          println!("{name} ran out of fuel, {} lives left", self.game.lives)
        }
        Event::Collided { names, level, .. } => {
          let names: Vec<String> =
            names.iter().map(|n| n.to_string()).collect();
          println!(
            "{} collided at level {level}, {} lives left",
            names.join(" and "),
            self.game.lives
          )
        }
        Event::GameOver { score } => println!(
          "game over, final score {score} (best {}). type `reset` to play again",
          self.game.stats().best_score
        ),
        Event::Spawned { .. }
        | Event::Bounced { .. }
        | Event::LandingAborted { .. } => {}
      }
    }
  }

  fn print_status(&self) {
    for line in self.status_lines() {
      println!("{line}");
    }
  }

  /// The stats line, then one line per aircraft. Same-level aircraft within
  /// the safe distance of each other are flagged as traffic.
  fn status_lines(&self) -> Vec<String> {
    let stats = self.game.stats();
    let mut lines = vec![format!(
      "score {} (best {}) | lives {} | landed {} | difficulty {} | {:.0}s",
      stats.score,
      stats.best_score,
      stats.lives,
      stats.planes_landed,
      stats.difficulty,
      stats.elapsed_time
    )];

    for aircraft in self.game.aircraft.iter() {
      let marker = if aircraft.selected { '>' } else { ' ' };
      let zone = if self.game.in_landing_zone(aircraft) {
        " [zone]"
      } else {
        ""
      };
      let danger = if aircraft.is_in_danger() { " [!]" } else { "" };
      let traffic = if self
        .game
        .aircraft
        .iter()
        .any(|other| other.id != aircraft.id && aircraft.is_near(other))
      {
        " [traffic]"
      } else {
        ""
      };

      lines.push(format!(
        "{marker} {}{zone}{danger}{traffic}",
        describe(aircraft)
      ));
    }

    lines
  }

  fn print_stats(&self) {
    match serde_json::to_string(&self.game.stats()) {
      Ok(json) => println!("{json}"),
      Err(e) => tracing::error!("Unable to serialise stats: {e}"),
    }
  }
}

fn describe(aircraft: &Aircraft) -> String {
  format!(
    "#{} {}, heading {:03.0} ({}) at ({:.0}, {:.0})",
    aircraft.id,
    aircraft,
    aircraft.heading,
    heading_to_direction(aircraft.heading),
    aircraft.pos.x,
    aircraft.pos.y
  )
}

#[cfg(test)]
mod tests {
  use engine::game::GameConfig;
  use glam::Vec2;
  use turborand::{SeededCore, rng::Rng};

  use super::*;

  fn runner() -> (mpsc::UnboundedSender<Request>, Runner) {
    let config = GameConfig {
      initial_population: 0,
      ..Default::default()
    };
    let mut game = Game::new(config, Rng::with_seed(5));
    game.spawn_timer = 0.0;

    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Runner::new(game, rx, 20, false))
  }

  #[test]
  fn test_tick_steps_by_fixed_dt() {
    let (_tx, mut runner) = runner();

    assert!(runner.tick());
    assert!(runner.tick());

    assert!((runner.game.elapsed_time - 0.1).abs() < 1e-6);
  }

  #[test]
  fn test_tasks_apply_before_the_tick() {
    let (tx, mut runner) = runner();
    tx.send(Request::Tasks(vec![Task::Spawn])).unwrap();

    assert!(runner.tick());
    assert_eq!(runner.game.aircraft.len(), 1);
  }

  #[test]
  fn test_select_then_command() {
    let (tx, mut runner) = runner();
    let id = runner.game.spawn();
    let pos = runner.game.get(id).map(|a| a.pos).unwrap_or_default();
    let level = runner.game.get(id).map(|a| a.level).unwrap_or_default();

    tx.send(Request::Tasks(vec![Task::Select(pos), Task::Hold]))
      .unwrap();
    assert!(runner.tick());

    let aircraft = runner.game.get(id).unwrap();
    assert!(aircraft.selected);
    assert_eq!(aircraft.pos, pos);
    assert_eq!(aircraft.level, level);
  }

  #[test]
  fn test_quit_stops() {
    let (tx, mut runner) = runner();
    tx.send(Request::Quit).unwrap();

    assert!(!runner.tick());
    assert_eq!(runner.game.elapsed_time, 0.0);
  }

  #[test]
  fn test_hang_up_stops() {
    let (tx, mut runner) = runner();
    drop(tx);

    assert!(!runner.tick());
  }

  #[test]
  fn test_status_flags_same_level_traffic() {
    let (_tx, mut runner) = runner();
    let placements = [
      (Vec2::new(400.0, 300.0), 2),
      (Vec2::new(450.0, 300.0), 2),
      (Vec2::new(400.0, 300.0), 3),
    ];
    for (pos, level) in placements {
      let id = runner.game.spawn();
      if let Some(aircraft) = runner.game.get_mut(id) {
        aircraft.pos = pos;
        aircraft.level = level;
      }
    }

    let lines = runner.status_lines();

    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with(" [traffic]"));
    assert!(lines[2].ends_with(" [traffic]"));
    assert!(!lines[3].contains("[traffic]"));
  }

  #[test]
  fn test_run_for_stops_at_game_over() {
    let (_tx, mut runner) = runner();
    runner.game.lives = 0;

    runner.run_for(100);

    assert!(runner.game.game_over);
    assert_eq!(runner.ticks, 1);
  }
}
