//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A front-end drives it through [`GameEngine::tick`] and [`GameEngine::set_new_direction`]
//! and draws it through [`GameEngine::classify_cell`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod fruit;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{Cell, GameEngine, TickInfo, TickResult};
pub use error::GameError;
pub use fruit::Fruit;
pub use state::{CollisionType, Position, Snake, SnakeStatus, StepOutcome};
