//! Crisis Response: Save the World, One Questionable Fix at a Time
//!
//! A terminal game where the world lurches from crisis to crisis and you pick
//! the fix. Good picks raise the world's hope, bad ones drain it, and some
//! crises come with a Plan B waiting in the wings.
//!
//! # Game Mechanics
//!
//! - **Hope**: a 0-100 score. Hit the floor and the run is over
//! - **Plan B**: failing a crisis that has a fallback moves you onto it
//! - **Milestones**: every third save offers a share report
//! - **Daily challenge**: everyone gets the same crises on the same day
//!
//! # Architecture
//!
//! - `data` - Crises, solutions and the validated catalog
//! - `game` - The state machine, crisis selector, milestones and session
//! - `config` - Balance numbers and player-facing texts
//! - `tui` - Terminal user interface with ratatui

pub mod config;
pub mod data;
pub mod game;
pub mod tui;

pub use config::GameConfig;
pub use data::*;
pub use game::{GameEngine, GameState, Session, Transition};

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("solution `{solution}` does not belong to crisis `{crisis}`")]
    UnknownSolution { crisis: String, solution: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
