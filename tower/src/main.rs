use std::path::Path;

use clap::Parser;
use engine::game::Game;
use radar_tower::{
  Cli, Error,
  config::Config,
  request::{HELP, Request},
  runner::Runner,
};
use tokio::{
  io::{AsyncBufReadExt, BufReader},
  sync::mpsc,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use turborand::{SeededCore, rng::Rng};

fn load_config(cli: &Cli) -> Result<Config, Error> {
  match cli.config_path.clone().or_else(Config::default_path) {
    Some(path) => Config::from_path(path),
    None => Ok(Config::default()),
  }
}

fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, Error> {
  let (file_layer, guard) = match log_dir {
    Some(dir) => {
      std::fs::create_dir_all(dir).map_err(|source| Error::LogDir {
        path: dir.to_path_buf(),
        source,
      })?;

      let appender = tracing_appender::rolling::never(dir, "tower.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let layer = fmt::layer().with_ansi(false).with_writer(writer);

      (Some(layer), Some(guard))
    }
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .init();

  Ok(guard)
}

fn spawn_console(sender: mpsc::UnboundedSender<Request>) {
  tokio::spawn(async move {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
      match lines.next_line().await {
        Ok(Some(line)) => match Request::from_line(&line) {
          Some(request) => {
            if sender.send(request).is_err() {
              break;
            }
          }
          None if line.trim().is_empty() => {}
          None => println!("unknown command {:?}, try `help`", line.trim()),
        },
        Ok(None) => break,
        Err(e) => {
          tracing::error!("Unable to read from stdin: {e}");
          break;
        }
      }
    }
  });
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  let config = match load_config(&cli) {
    Ok(config) => config,
    Err(e) => {
      tracing_subscriber::fmt().with_writer(std::io::stderr).init();
      tracing::error!("{e}");
      std::process::exit(1);
    }
  };
  let tower = config.tower();

  let _guard = match init_tracing(tower.log_dir.as_deref()) {
    Ok(guard) => guard,
    Err(e) => {
      eprintln!("{e}");
      std::process::exit(1);
    }
  };

  let rng = match cli.seed.or(tower.seed) {
    Some(seed) => {
      tracing::info!(seed, "using a fixed seed");
      Rng::with_seed(seed)
    }
    None => Rng::new(),
  };

  let game = Game::new(config.game(), rng);
  let rate = tower.tick_rate();

  if let Some(ticks) = cli.ticks {
    let (_, receiver) = mpsc::unbounded_channel();
    let mut runner = Runner::new(game, receiver, rate, cli.json);
    runner.run_for(ticks);

    match serde_json::to_string_pretty(&runner.game.stats()) {
      Ok(json) => println!("{json}"),
      Err(e) => tracing::error!("Unable to serialise stats: {e}"),
    }
    return;
  }

  let (sender, receiver) = mpsc::unbounded_channel();
  spawn_console(sender);

  tracing::info!(rate, "tower open");
  println!("{HELP}");

  let mut runner = Runner::new(game, receiver, rate, cli.json);
  runner.begin_loop().await;
}
