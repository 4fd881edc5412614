use super::{
    action::Direction,
    config::GameConfig,
    error::GameError,
    fruit::Fruit,
    state::{CollisionType, Position, Snake, StepOutcome},
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// What a renderer should draw in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Snake,
    Fruit,
    Empty,
}

/// Information about a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickInfo {
    /// Whether the snake ate the fruit this tick
    pub ate_fruit: bool,
    /// Points gained this tick
    pub points: u32,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Whether the game has ended
    pub terminated: bool,
    /// The snake filled every cell and no fruit could be placed
    pub board_cleared: bool,
    /// Additional information about the tick
    pub info: TickInfo,
}

/// The game engine: owns the snake, the fruit and the random source
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    snake: Snake,
    fruit: Fruit,
    rng: R,
    steps: u32,
    board_cleared: bool,
}

impl GameEngine<StdRng> {
    /// Create an engine whose fruit placement is reproducible from `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Create an engine seeded from the operating system
    pub fn from_entropy(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game with the given configuration and random source
    pub fn new(config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;

        let snake = Snake::new(config.field_size, config.initial_snake_length)?;
        let fruit = Fruit::new(config.normal_fruit_value);
        let mut engine = Self {
            config,
            snake,
            fruit,
            rng,
            steps: 0,
            board_cleared: false,
        };
        engine.spawn_fruit()?;

        info!(
            "New game on a {0}x{0} field, snake length {1}",
            engine.config.field_size,
            engine.snake.len()
        );
        Ok(engine)
    }

    /// Reset the game to its initial state
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.snake = Snake::new(self.config.field_size, self.config.initial_snake_length)?;
        self.fruit = Fruit::new(self.config.normal_fruit_value);
        self.steps = 0;
        self.board_cleared = false;
        self.spawn_fruit()?;

        info!("Game restarted");
        Ok(())
    }

    /// Queue a heading for the next tick
    pub fn set_new_direction(&mut self, direction: Direction) {
        self.snake.set_new_direction(direction);
    }

    /// Execute one tick of the game
    ///
    /// The snake eats the fruit when its next cell holds it, otherwise it
    /// moves. Once the game is over further ticks change nothing.
    pub fn tick(&mut self) -> TickResult {
        if self.is_game_over() {
            return TickResult {
                terminated: true,
                board_cleared: self.board_cleared,
                info: TickInfo::default(),
            };
        }

        let eats = self
            .snake
            .next_head()
            .is_some_and(|p| self.fruit.is_fruit_position(p.x(), p.y()));

        let outcome = if eats {
            self.snake.eat_fruit(&self.fruit)
        } else {
            self.snake.move_forward()
        };
        self.steps += 1;

        let mut info = TickInfo::default();
        match outcome {
            StepOutcome::Collided(collision) => {
                info!(
                    "Game over after {} steps: {:?}, score {}",
                    self.steps,
                    collision,
                    self.snake.score()
                );
                info.collision_type = Some(collision);
            }
            StepOutcome::Grew => {
                info.ate_fruit = true;
                info.points = self.fruit.value();
                self.on_fruit_eaten();
            }
            StepOutcome::Moved | StepOutcome::Halted => {}
        }

        TickResult {
            terminated: self.is_game_over(),
            board_cleared: self.board_cleared,
            info,
        }
    }

    fn on_fruit_eaten(&mut self) {
        let eaten = self.snake.fruits_eaten();
        let next_value = self.config.fruit_value_after(eaten);
        debug!(
            "Fruit #{} eaten, score {}, next fruit worth {}",
            eaten,
            self.snake.score(),
            next_value
        );

        self.fruit.set_value(next_value);
        if let Err(err) = self.spawn_fruit() {
            info!("Board cleared with score {}: {}", self.snake.score(), err);
            self.board_cleared = true;
        }
    }

    /// Put the fruit on a random cell not covered by the snake
    fn spawn_fruit(&mut self) -> Result<(), GameError> {
        let snake = &self.snake;
        let position = self.fruit.generate_random_position(
            self.config.field_size,
            &mut self.rng,
            |x, y| snake.is_snake_position(x, y),
        )?;
        debug!("Fruit placed at ({}, {})", position.x(), position.y());
        Ok(())
    }

    /// Move the fruit to a chosen cell, keeping its value
    pub fn place_fruit(&mut self, x: i32, y: i32) -> Result<(), GameError> {
        let position = Position::new(x, y, Direction::North, self.config.field_size)?;
        self.fruit = Fruit::with_position(position, self.fruit.value());
        Ok(())
    }

    /// Classify a cell for drawing; the snake wins over the fruit
    pub fn classify_cell(&self, x: i32, y: i32) -> Cell {
        if self.snake.is_snake_position(x, y) {
            Cell::Snake
        } else if self.fruit.is_fruit_position(x, y) {
            Cell::Fruit
        } else {
            Cell::Empty
        }
    }

    /// True once the snake has died or the board is full
    pub fn is_game_over(&self) -> bool {
        self.snake.is_game_over() || self.board_cleared
    }

    /// True if the fruit on the field is worth the special value
    pub fn fruit_is_special(&self) -> bool {
        self.config.is_special_after(self.snake.fruits_eaten())
    }

    pub fn is_board_cleared(&self) -> bool {
        self.board_cleared
    }

    pub fn score(&self) -> u32 {
        self.snake.score()
    }

    pub fn fruits_eaten(&self) -> u32 {
        self.snake.fruits_eaten()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// How long the driver should wait between ticks at the current score
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval(self.snake.fruits_eaten())
    }
}
