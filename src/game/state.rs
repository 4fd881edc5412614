use std::collections::VecDeque;

use super::action::Direction;
use super::config::MAX_FIELD_SIZE;
use super::error::GameError;
use super::fruit::Fruit;

/// A validated cell on the field together with the heading it was entered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    x: i32,
    y: i32,
    direction: Direction,
}

impl Position {
    /// Create a position, failing if it lies outside a `field_size` square
    pub fn new(x: i32, y: i32, direction: Direction, field_size: usize) -> Result<Self, GameError> {
        if !in_bounds(x, y, field_size) {
            return Err(GameError::InvalidPosition { x, y, field_size });
        }
        Ok(Self { x, y, direction })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// True if both positions cover the same cell, whatever their heading
    pub fn same_cell(&self, other: &Position) -> bool {
        self.coords() == other.coords()
    }

    /// Position one cell ahead in `direction`, or `None` past the border
    pub fn stepped(&self, direction: Direction, field_size: usize) -> Option<Position> {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy, direction, field_size).ok()
    }
}

/// Reject fields the engine cannot address or allocate for
pub(crate) fn check_field_size(field_size: usize) -> Result<(), GameError> {
    if field_size == 0 || field_size > MAX_FIELD_SIZE {
        return Err(GameError::InvalidConfig(format!(
            "field_size must be between 1 and {}, got {}",
            MAX_FIELD_SIZE, field_size
        )));
    }
    Ok(())
}

fn in_bounds(x: i32, y: i32, field_size: usize) -> bool {
    let size = field_size as i64;
    (0..size).contains(&i64::from(x)) && (0..size).contains(&i64::from(y))
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake ran off the field
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Whether the snake can still move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeStatus {
    Alive,
    GameOver(CollisionType),
}

/// What a single advance of the snake did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Body shifted one cell, length unchanged
    Moved,
    /// Body shifted one cell and kept its tail
    Grew,
    /// The advance hit something; the snake is now dead
    Collided(CollisionType),
    /// The snake was already dead, nothing happened
    Halted,
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the front
    body: VecDeque<Position>,
    field_size: usize,
    pending_direction: Option<Direction>,
    score: u32,
    fruits_eaten: u32,
    status: SnakeStatus,
}

impl Snake {
    /// Create a snake whose head sits in the centre of the field, facing North,
    /// with the rest of the body trailing south of it
    pub fn new(field_size: usize, length: usize) -> Result<Self, GameError> {
        check_field_size(field_size)?;
        if length == 0 {
            return Err(GameError::InvalidConfig(
                "snake needs at least one segment".into(),
            ));
        }

        let centre = (field_size / 2) as i32;
        // The ring buffer never holds more than every cell of the field.
        let mut body = VecDeque::with_capacity(field_size * field_size);
        for i in 0..length {
            body.push_back(Position::new(
                centre,
                centre + i as i32,
                Direction::North,
                field_size,
            )?);
        }

        Ok(Self {
            body,
            field_size,
            pending_direction: None,
            score: 0,
            fruits_eaten: 0,
            status: SnakeStatus::Alive,
        })
    }

    /// Create a snake from explicit segments, head first
    ///
    /// Segments must be distinct cells, each next to the one before it.
    pub fn from_segments(
        field_size: usize,
        segments: impl IntoIterator<Item = Position>,
    ) -> Result<Self, GameError> {
        check_field_size(field_size)?;
        let mut body: VecDeque<Position> = VecDeque::with_capacity(field_size * field_size);
        for segment in segments {
            let (x, y) = segment.coords();
            if !in_bounds(x, y, field_size) {
                return Err(GameError::InvalidPosition { x, y, field_size });
            }
            if body.iter().any(|p| p.same_cell(&segment)) {
                return Err(GameError::InvalidConfig(format!(
                    "segment ({}, {}) appears twice",
                    x, y
                )));
            }
            if let Some(prev) = body.back() {
                let gap = (prev.x() - x).abs() + (prev.y() - y).abs();
                if gap != 1 {
                    return Err(GameError::InvalidConfig(format!(
                        "segment ({}, {}) is not next to ({}, {})",
                        x,
                        y,
                        prev.x(),
                        prev.y()
                    )));
                }
            }
            body.push_back(segment);
        }
        if body.is_empty() {
            return Err(GameError::InvalidConfig(
                "snake needs at least one segment".into(),
            ));
        }

        Ok(Self {
            body,
            field_size,
            pending_direction: None,
            score: 0,
            fruits_eaten: 0,
            status: SnakeStatus::Alive,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Body segments, head first
    pub fn body(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn field_size(&self) -> usize {
        self.field_size
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn fruits_eaten(&self) -> u32 {
        self.fruits_eaten
    }

    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    /// Heading of the current head segment
    pub fn heading(&self) -> Direction {
        self.head().direction()
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Queue a heading for the next advance
    ///
    /// A later call before the next advance replaces an earlier one. Reversing
    /// onto the body is ignored.
    pub fn set_new_direction(&mut self, direction: Direction) {
        if !self.is_snake_alive() || self.heading().is_opposite(direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Heading the next advance will use
    fn effective_heading(&self) -> Direction {
        self.pending_direction.unwrap_or_else(|| self.heading())
    }

    /// Cell the head would enter on the next advance, `None` if off the field
    pub fn next_head(&self) -> Option<Position> {
        self.head().stepped(self.effective_heading(), self.field_size)
    }

    /// Advance one cell; the tail follows so the length stays the same
    pub fn move_forward(&mut self) -> StepOutcome {
        self.advance(false)
    }

    /// Advance one cell keeping the tail, and score the fruit
    pub fn eat_fruit(&mut self, fruit: &Fruit) -> StepOutcome {
        let outcome = self.advance(true);
        if outcome == StepOutcome::Grew {
            self.score += fruit.value();
            self.fruits_eaten += 1;
        }
        outcome
    }

    fn advance(&mut self, grow: bool) -> StepOutcome {
        if !self.is_snake_alive() {
            return StepOutcome::Halted;
        }

        let direction = self.effective_heading();
        self.pending_direction = None;

        let Some(new_head) = self.head().stepped(direction, self.field_size) else {
            return self.collide(CollisionType::Wall);
        };

        // On a plain move the tail cell is vacated in the same tick.
        let checked = if grow {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self
            .body
            .iter()
            .take(checked)
            .any(|segment| segment.same_cell(&new_head))
        {
            return self.collide(CollisionType::SelfCollision);
        }

        if !grow {
            self.body.pop_back();
        }
        self.body.push_front(new_head);

        if grow {
            StepOutcome::Grew
        } else {
            StepOutcome::Moved
        }
    }

    fn collide(&mut self, collision: CollisionType) -> StepOutcome {
        self.status = SnakeStatus::GameOver(collision);
        StepOutcome::Collided(collision)
    }

    /// True if the head covers the fruit
    pub fn snake_reached_fruit(&self, fruit: &Fruit) -> bool {
        let (x, y) = self.head().coords();
        fruit.is_fruit_position(x, y)
    }

    /// True if any segment covers (x, y)
    pub fn is_snake_position(&self, x: i32, y: i32) -> bool {
        self.body.iter().any(|segment| segment.coords() == (x, y))
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, SnakeStatus::GameOver(_))
    }

    pub fn is_snake_alive(&self) -> bool {
        self.status == SnakeStatus::Alive
    }

    /// What ended the game, if it is over
    pub fn collision(&self) -> Option<CollisionType> {
        match self.status {
            SnakeStatus::Alive => None,
            SnakeStatus::GameOver(collision) => Some(collision),
        }
    }

    /// Boundary-only check: true if the snake died by leaving the field
    pub fn snake_run_out_of_field(&self) -> bool {
        self.status == SnakeStatus::GameOver(CollisionType::Wall)
    }
}
