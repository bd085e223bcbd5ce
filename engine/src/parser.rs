use std::slice::Iter;

use glam::Vec2;

use crate::command::Task;

fn parse_number(parts: &mut Iter<&str>) -> Option<f32> {
  parts.next().and_then(|a| a.parse::<f32>().ok())
}

fn parse_task(mut parts: Iter<&str>) -> Option<Task> {
  let first = parts.next()?;
  match *first {
    "c" | "climb" => Some(Task::Climb),
    "d" | "descend" => Some(Task::Descend),
    "l" | "land" => Some(Task::Land),
    "h" | "hold" => Some(Task::Hold),
    "t" | "turn" => parse_number(&mut parts).map(Task::Heading),
    "s" | "speed" => parse_number(&mut parts).map(Task::Speed),
    "sel" | "select" => {
      let x = parse_number(&mut parts)?;
      let y = parse_number(&mut parts)?;
      Some(Task::Select(Vec2::new(x, y)))
    }
    "spawn" => Some(Task::Spawn),
    "reset" => Some(Task::Reset),
    _ => None,
  }
}

/// Parses `;`-separated commands such as `sel 120 80; d; l`. Anything that
/// isn't understood is skipped.
pub fn parse<T>(commands: T) -> Vec<Task>
where
  T: AsRef<str>,
{
  let mut tasks: Vec<Task> = Vec::new();

  let commands = commands.as_ref().split(";");
  for command in commands {
    let lowercase = command.trim().to_lowercase();
    let parts = lowercase.split_whitespace().collect::<Vec<_>>();
    if let Some(t) = parse_task(parts.iter()) {
      tasks.push(t)
    }
  }

  tasks
}
