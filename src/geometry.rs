use std::fmt;

use crate::board::BoardError;

/// Largest supported width or height.
pub const MAX_SIZE: usize = 64;

/// Row-major cell index, `0..width * height`.
pub type Position = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    pub fn flip(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn from_char(ch: char) -> Option<Direction> {
        match ch {
            'n' => Some(Direction::North),
            'e' => Some(Direction::East),
            's' => Some(Direction::South),
            'w' => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}

/// Board dimensions and the coordinate math on top of them.
///
/// Coordinates are 1-based: `(1, 1)` is index 0 and sits in the northwest
/// corner, x grows eastwards and y grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 || width > MAX_SIZE || height > MAX_SIZE {
            return Err(BoardError::BadDimensions { width, height });
        }
        Ok(Grid {
            width: width as u8,
            height: height as u8,
        })
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains_xy(&self, x: usize, y: usize) -> bool {
        (1..=self.width()).contains(&x) && (1..=self.height()).contains(&y)
    }

    /// Callers must check `contains_xy` first.
    pub fn xy_to_position(&self, x: usize, y: usize) -> Position {
        debug_assert!(self.contains_xy(x, y), "({}, {}) is off the board", x, y);
        ((y - 1) * self.width() + x - 1) as Position
    }

    pub fn position_to_xy(&self, position: Position) -> (usize, usize) {
        let position = position as usize;
        (position % self.width() + 1, position / self.width() + 1)
    }

    /// The adjacent cell in `direction`, or `None` when that step leaves the board.
    pub fn neighbour(&self, position: Position, direction: Direction) -> Option<Position> {
        let position = position as usize;
        let width = self.width();
        let next = match direction {
            Direction::North => position.checked_sub(width)?,
            Direction::East => {
                if (position + 1) % width == 0 {
                    return None;
                }
                position + 1
            }
            Direction::South => {
                let next = position + width;
                if next >= self.len() {
                    return None;
                }
                next
            }
            Direction::West => {
                if position % width == 0 {
                    return None;
                }
                position - 1
            }
        };
        Some(next as Position)
    }

    pub fn position_to_chess(&self, position: Position) -> String {
        let (x, y) = self.position_to_xy(position);
        xy_to_chess(x, y)
    }
}

/// Letter column plus numeric row, e.g. `(2, 3)` is `b3`.
pub fn xy_to_chess(x: usize, y: usize) -> String {
    match u8::try_from(x) {
        Ok(x @ 1..=26) => format!("{}{}", (b'a' + x - 1) as char, y),
        _ => format!("({}, {})", x, y),
    }
}
