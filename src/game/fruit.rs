use rand::Rng;
use rand::seq::SliceRandom;

use super::action::Direction;
use super::error::GameError;
use super::state::{Position, check_field_size};

/// Random draws per field cell before falling back to enumerating free cells
const DRAWS_PER_CELL: usize = 4;

/// The single collectible on the field
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    position: Option<Position>,
    value: u32,
}

impl Fruit {
    /// A fruit worth `value` points that has not been placed yet
    pub fn new(value: u32) -> Self {
        Self {
            position: None,
            value,
        }
    }

    pub fn with_position(position: Position, value: u32) -> Self {
        Self {
            position: Some(position),
            value,
        }
    }

    /// Place the fruit on a random cell that `is_occupied` does not claim
    ///
    /// Cells are drawn uniformly; occupied draws are retried a bounded number
    /// of times, after which one of the remaining free cells is picked
    /// directly. Fails with [`GameError::BoardFull`] when no free cell exists,
    /// leaving the fruit unplaced.
    pub fn generate_random_position<R, F>(
        &mut self,
        field_size: usize,
        rng: &mut R,
        is_occupied: F,
    ) -> Result<Position, GameError>
    where
        R: Rng,
        F: Fn(i32, i32) -> bool,
    {
        check_field_size(field_size)?;
        let max = field_size as i32;

        for _ in 0..field_size * field_size * DRAWS_PER_CELL {
            let x = rng.gen_range(0..max);
            let y = rng.gen_range(0..max);
            if !is_occupied(x, y) {
                return self.place(x, y, field_size);
            }
        }

        let free: Vec<(i32, i32)> = (0..max)
            .flat_map(|x| (0..max).map(move |y| (x, y)))
            .filter(|&(x, y)| !is_occupied(x, y))
            .collect();

        match free.choose(rng) {
            Some(&(x, y)) => self.place(x, y, field_size),
            None => {
                self.position = None;
                Err(GameError::BoardFull)
            }
        }
    }

    fn place(&mut self, x: i32, y: i32, field_size: usize) -> Result<Position, GameError> {
        let position = Position::new(x, y, Direction::North, field_size)?;
        self.position = Some(position);
        Ok(position)
    }

    /// True if the fruit is placed on (x, y)
    pub fn is_fruit_position(&self, x: i32, y: i32) -> bool {
        self.position.is_some_and(|p| p.coords() == (x, y))
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Take the fruit off the field
    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value;
    }
}
