use engine::{command::Task, parser::parse};

/// A line typed into the tower console.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
  Tasks(Vec<Task>),
  /// List every aircraft on the radar.
  Status,
  Help,
  Quit,
}

impl Request {
  pub fn from_line(line: &str) -> Option<Self> {
    match line.trim().to_lowercase().as_str() {
      "" => None,
      "status" | "ls" => Some(Self::Status),
      "help" | "?" => Some(Self::Help),
      "quit" | "exit" | "q" => Some(Self::Quit),
      line => {
        let tasks = parse(line);
        (!tasks.is_empty()).then_some(Self::Tasks(tasks))
      }
    }
  }
}

pub const HELP: &str = "\
commands (separate with ';'):
  sel <x> <y>   select the aircraft nearest to a radar point
  c | d         climb / descend one level
  l             land (only at level 1) or cancel an approach
  h             hold position or resume
  t <deg>       turn to a heading
  s <kts>       change speed
  spawn         spawn an aircraft
  reset         start a new game
  status        list aircraft
  quit          leave";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_console_words() {
    assert_eq!(Request::from_line("status"), Some(Request::Status));
    assert_eq!(Request::from_line("  QUIT "), Some(Request::Quit));
    assert_eq!(Request::from_line("?"), Some(Request::Help));
    assert_eq!(Request::from_line("   "), None);
  }

  #[test]
  fn test_tasks() {
    assert_eq!(
      Request::from_line("c; l"),
      Some(Request::Tasks(vec![Task::Climb, Task::Land]))
    );
    assert_eq!(Request::from_line("do a barrel roll"), None);
  }
}
