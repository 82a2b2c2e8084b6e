//! Command-line flags for the `chorus` binary.
//!
//! A flag beats its environment variable, which beats the config file.

use std::path::PathBuf;

use clap::Parser;

use chorus_core::config::ChorusConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHORUS_CONFIG";
/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "CHORUS_PORT";
/// Port used when neither flag, env nor config give one.
pub const DEFAULT_PORT: u16 = 3040;

/// Chorus - several learning chat bots answering side by side.
#[derive(Parser, Debug)]
#[command(name = "chorus", version, about)]
pub struct CliArgs {
    /// Config file (TOML).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Listen port on 127.0.0.1.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory holding chorus.db.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error.
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// `--config`, else `$CHORUS_CONFIG`, else `~/.chorus/config.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(default_config_path)
    }

    /// Write flag and env overrides into a loaded config.
    pub fn apply_overrides(&self, config: &mut ChorusConfig) {
        self.apply_with_env_port(config, std::env::var(PORT_ENV).ok());
    }

    fn apply_with_env_port(&self, config: &mut ChorusConfig, env_port: Option<String>) {
        if let Some(dir) = &self.data_dir {
            config.general.data_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }

        let env_port = env_port.and_then(|p| p.parse::<u16>().ok());
        config.general.port = match (self.port, env_port, config.general.port) {
            (Some(p), _, _) => p,
            (None, Some(p), _) => p,
            (None, None, 0) => DEFAULT_PORT,
            (None, None, p) => p,
        };
    }
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");

    match home {
        Ok(home) => PathBuf::from(home).join(".chorus").join("config.toml"),
        Err(_) => PathBuf::from("config.toml"),
    }
}
