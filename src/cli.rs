//! Command-line flags and logging setup shared by both binaries.

use crate::config::GameConfig;
use clap::Args;
use std::env;
use std::path::PathBuf;

pub const LOG_VAR: &str = "DUNKEMON_LOG";

/// Flags that override the environment-derived `GameConfig`.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory with species, moves and areas tables
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Overworld map file
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Local save file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Seed for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save to and load from the remote server, falling back to the local file
    #[arg(long)]
    pub online: bool,
}

impl GameArgs {
    /// Environment first, then these flags on top.
    pub fn to_config(&self) -> GameConfig {
        let mut config = GameConfig::from_env();
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(map) = &self.map {
            config.map_path = Some(map.clone());
        }
        if let Some(save) = &self.save {
            config.save_path = save.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.online {
            config.remote.online = true;
        }
        config
    }

    /// Install the stderr subscriber. `log` records from the library are
    /// forwarded to it.
    pub fn init_logging(&self, default_level: tracing_core::Level) {
        let requested = self.log_level.clone().or_else(|| env::var(LOG_VAR).ok());
        let level = match requested {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                eprintln!("Unknown log level '{}', using {}", raw, default_level);
                default_level
            }),
            None => default_level,
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
