//! Game configuration
//!
//! Balance numbers and player-facing texts live here rather than in the
//! state machine, so they can be tuned from a JSON file without touching
//! the transition logic. Every field has a default; a config file only needs
//! to name what it overrides.

use crate::data::catalog::{CatalogError, CrisisCatalog, DEFAULT_MAX_PLAN_B_DEPTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "CRISIS_CONFIG";

/// Upper bound of the hope scale
pub const MAX_HOPE: u8 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub balance: Balance,
    pub messages: Messages,

    /// Load crises from this file instead of the built-in catalog
    pub catalog_path: Option<PathBuf>,

    /// Seed crisis draws from today's date
    pub daily_challenge: bool,
}

/// Numbers that shape how forgiving the game is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub initial_hope: u8,
    pub success_increment: u8,
    pub failure_decrement: u8,

    /// At or below this, a failure with no Plan B ends the run
    pub warning_threshold: u8,

    /// At or below this, any outcome ends the run
    pub game_over_floor: u8,

    /// Share prompt every N successes
    pub milestone_interval: u32,

    /// Pause before an outcome is revealed
    pub reveal_delay_ms: u64,

    pub max_plan_b_depth: usize,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            initial_hope: 50,
            success_increment: 15,
            failure_decrement: 20,
            warning_threshold: 10,
            game_over_floor: 0,
            milestone_interval: 3,
            reveal_delay_ms: 1500,
            max_plan_b_depth: DEFAULT_MAX_PLAN_B_DEPTH,
        }
    }
}

/// Texts the state machine writes into `GameState::message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub welcome: String,
    pub new_crisis: String,
    pub skipped: String,
    pub default_success: String,
    pub default_failure: String,
    pub plan_b_activated: String,
    pub low_hope: String,
    pub hope_exhausted: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            welcome: "Pick a way to save the world!".to_string(),
            new_crisis: "A new crisis is here. How will you save us this time?".to_string(),
            skipped: "Crisis skipped. Here comes a fresh challenge!".to_string(),
            default_success: "It worked! The world is a little more saved.".to_string(),
            default_failure: "Uh oh, that didn't go as planned...".to_string(),
            plan_b_activated: "Activating Plan B!".to_string(),
            low_hope: "Hope is running dangerously low and the world is in trouble. Time to start over!".to_string(),
            hope_exhausted: "Hope has run out! The world sinks into despair... but dust yourself off and try again!".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        info!(target: "config", path = %path.display(), "Loaded game config");
        Ok(config)
    }

    /// Config from an explicit path, else `CRISIS_CONFIG`, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.balance;
        if b.initial_hope > MAX_HOPE {
            return Err(ConfigError::Invalid(format!(
                "initial_hope {} exceeds {}",
                b.initial_hope, MAX_HOPE
            )));
        }
        if b.game_over_floor > b.warning_threshold {
            return Err(ConfigError::Invalid(format!(
                "game_over_floor {} is above warning_threshold {}",
                b.game_over_floor, b.warning_threshold
            )));
        }
        if b.initial_hope <= b.game_over_floor {
            return Err(ConfigError::Invalid(
                "initial_hope must be above game_over_floor".to_string(),
            ));
        }
        if b.success_increment == 0 || b.failure_decrement == 0 {
            return Err(ConfigError::Invalid(
                "hope increments must be non-zero".to_string(),
            ));
        }
        if b.milestone_interval == 0 {
            return Err(ConfigError::Invalid(
                "milestone_interval must be non-zero".to_string(),
            ));
        }
        if b.max_plan_b_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_plan_b_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured catalog, or the built-in one
    pub fn catalog(&self) -> Result<CrisisCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => CrisisCatalog::from_file(path, self.balance.max_plan_b_depth),
            None => CrisisCatalog::from_json_str(
                crate::data::catalog::BUILTIN_CATALOG,
                self.balance.max_plan_b_depth,
            ),
        }
    }
}
