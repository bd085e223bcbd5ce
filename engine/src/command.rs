use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A player command for the game. Aircraft tasks apply to the selected
/// aircraft and are ignored when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum Task {
  Climb,
  Descend,
  Land,
  Hold,
  Heading(f32),
  Speed(f32),

  Select(Vec2),
  Spawn,
  Reset,
}

impl Task {
  /// Whether the task needs a selected aircraft to do anything.
  pub fn needs_selection(&self) -> bool {
    !matches!(self, Self::Select(_) | Self::Spawn | Self::Reset)
  }
}
