use std::path::PathBuf;

use clap::Parser;

pub mod config;
pub mod request;
pub mod runner;

#[derive(Debug, Parser)]
pub struct Cli {
  /// The path to the config file.
  #[arg(short, long, default_value = None)]
  pub config_path: Option<PathBuf>,

  /// The seed to use for the random number generator.
  #[arg(short, long)]
  pub seed: Option<u64>,

  /// Run this many ticks as fast as possible, print the stats and exit.
  #[arg(short, long)]
  pub ticks: Option<u64>,

  /// Print the stats as a JSON line once per second.
  #[arg(long)]
  pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to read config file {}: {source}", .path.display())]
  ReadConfig {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("failed to parse config file {}: {source}", .path.display())]
  ParseConfig {
    path: PathBuf,
    source: toml::de::Error,
  },
  #[error("failed to create log directory {}: {source}", .path.display())]
  LogDir {
    path: PathBuf,
    source: std::io::Error,
  },
}
