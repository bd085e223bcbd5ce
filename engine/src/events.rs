use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};

/// Something that happened during a tick. These are for hosts to report on;
/// the game state itself is always the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Event {
  Spawned {
    id: u32,
    name: Intern<String>,
    level: u8,
  },
  Landed {
    id: u32,
    name: Intern<String>,
    points: u32,
  },
  /// Ran out of fuel.
  Crashed {
    id: u32,
    name: Intern<String>,
  },
  Collided {
    ids: (u32, u32),
    /// Only the aircraft that were still on the radar.
    names: Vec<Intern<String>>,
    pos: Vec2,
    level: u8,
  },
  /// Drifted off the radar and was turned back towards the center.
  Bounced {
    id: u32,
  },
  /// Left the approach because it was neither in the zone nor at level 1.
  LandingAborted {
    id: u32,
  },
  GameOver {
    score: u32,
  },
}
