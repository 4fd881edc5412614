//! grid_snake - classic Snake on a square grid
//!
//! This library provides:
//! - Core simulation: snake, fruit, collisions, scoring (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal game loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
