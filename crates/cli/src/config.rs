//! Settings for a terminal session: a TOML file, then command-line
//! overrides on top.

use std::path::{Path, PathBuf};

use chess_core::{Color, Engine, TimeControl};
use random_engine::RandomEngine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Starting time per side, in minutes
    pub minutes: u32,
    /// Seconds added after each move
    pub increment: u32,
    /// Side the person at the keyboard plays
    pub human: Color,
    /// Move-selection policy for the computer side
    pub engine: String,
    /// Fixed seed for a reproducible computer opponent
    pub seed: Option<u64>,
    /// Pause before the computer answers
    pub engine_delay_ms: u64,
    /// How often the running clock is charged
    pub tick_interval_ms: u64,
    /// Remaining time below which a clock is flagged as low
    pub low_time_seconds: f64,
    /// Start from this position instead of the initial one
    pub fen: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            minutes: 5,
            increment: 5,
            human: Color::White,
            engine: "random".to_string(),
            seed: None,
            engine_delay_ms: 500,
            tick_interval_ms: 100,
            low_time_seconds: 30.0,
            fen: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minutes == 0 || self.minutes > TimeControl::MAX_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "minutes must be between 1 and {}",
                TimeControl::MAX_MINUTES
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.engine_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "engine_delay_ms must be positive".to_string(),
            ));
        }
        if !self.low_time_seconds.is_finite() || self.low_time_seconds < 0.0 {
            return Err(ConfigError::Invalid(
                "low_time_seconds must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn time_control(&self) -> TimeControl {
        TimeControl::new(self.minutes, self.increment)
    }

    pub fn engine_color(&self) -> Color {
        self.human.other()
    }

    pub fn create_engine(&self) -> Result<Box<dyn Engine>, ConfigError> {
        match self.engine.to_lowercase().as_str() {
            "random" | "rand" => Ok(Box::new(match self.seed {
                Some(seed) => RandomEngine::with_seed(seed),
                None => RandomEngine::new(),
            })),
            other => Err(ConfigError::Invalid(format!("unknown engine: {other}"))),
        }
    }
}

/// Parsed command-line flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub minutes: Option<u32>,
    pub increment: Option<u32>,
    pub seed: Option<u64>,
    pub fen: Option<String>,
    pub play_black: bool,
    pub help: bool,
}

fn flag_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, ConfigError> {
    let raw = args
        .get(i + 1)
        .ok_or_else(|| ConfigError::Invalid(format!("{flag} needs a value")))?;
    raw.parse()
        .map_err(|_| ConfigError::Invalid(format!("invalid value for {flag}: {raw}")))
}

impl CliArgs {
    /// Parse everything after the program name.
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let mut out = CliArgs::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    out.config_path = Some(PathBuf::from(flag_value::<String>(args, i, "--config")?));
                    i += 1;
                }
                "--minutes" | "-m" => {
                    out.minutes = Some(flag_value(args, i, "--minutes")?);
                    i += 1;
                }
                "--increment" | "-i" => {
                    out.increment = Some(flag_value(args, i, "--increment")?);
                    i += 1;
                }
                "--seed" | "-s" => {
                    out.seed = Some(flag_value(args, i, "--seed")?);
                    i += 1;
                }
                "--fen" | "-f" => {
                    out.fen = Some(flag_value(args, i, "--fen")?);
                    i += 1;
                }
                "--black" | "-b" => out.play_black = true,
                "--help" | "-h" | "help" => out.help = true,
                other => return Err(ConfigError::Invalid(format!("unknown argument: {other}"))),
            }
            i += 1;
        }
        Ok(out)
    }

    /// Load the config file if one was given and apply flag overrides.
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config_path {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(minutes) = self.minutes {
            config.minutes = minutes;
        }
        if let Some(increment) = self.increment {
            config.increment = increment;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.fen.is_some() {
            config.fen = self.fen.clone();
        }
        if self.play_black {
            config.human = Color::Black;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
