use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Game over is not an error; it is reported through
/// [`Snake::is_game_over`](super::Snake::is_game_over).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("position ({x}, {y}) is outside the {field_size}x{field_size} field")]
    InvalidPosition { x: i32, y: i32, field_size: usize },
    #[error("no free cell left on the field to place a fruit")]
    BoardFull,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
