use std::fmt;

use crate::board::{Board, BoardError};
use crate::cells::Marker;
use crate::geometry::{Direction, Position};

/// Orientation of a bouncer, named after its two open faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagonal {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

pub const ALL_DIAGONALS: [Diagonal; 4] = [
    Diagonal::NorthEast,
    Diagonal::SouthEast,
    Diagonal::SouthWest,
    Diagonal::NorthWest,
];

impl Diagonal {
    pub fn index(self) -> usize {
        match self {
            Diagonal::NorthEast => 0,
            Diagonal::SouthEast => 1,
            Diagonal::SouthWest => 2,
            Diagonal::NorthWest => 3,
        }
    }

    pub fn from_index(idx: usize) -> Diagonal {
        match idx {
            0 => Diagonal::NorthEast,
            1 => Diagonal::SouthEast,
            2 => Diagonal::SouthWest,
            3 => Diagonal::NorthWest,
            _ => unreachable!(),
        }
    }

    pub fn from_faces(a: Direction, b: Direction) -> Option<Diagonal> {
        match (a, b) {
            (Direction::North, Direction::East) => Some(Diagonal::NorthEast),
            (Direction::South, Direction::East) => Some(Diagonal::SouthEast),
            (Direction::South, Direction::West) => Some(Diagonal::SouthWest),
            (Direction::North, Direction::West) => Some(Diagonal::NorthWest),
            _ => None,
        }
    }

    pub fn faces(self) -> (Direction, Direction) {
        match self {
            Diagonal::NorthEast => (Direction::North, Direction::East),
            Diagonal::SouthEast => (Direction::South, Direction::East),
            Diagonal::SouthWest => (Direction::South, Direction::West),
            Diagonal::NorthWest => (Direction::North, Direction::West),
        }
    }

    /// Direction a robot leaves in after sliding into the tile while
    /// travelling `travel`, or `None` if it hits a closed face.
    pub fn redirect(self, travel: Direction) -> Option<Direction> {
        let entry = travel.flip();
        let (a, b) = self.faces();
        if entry == a {
            Some(b)
        } else if entry == b {
            Some(a)
        } else {
            None
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Diagonal::NorthEast | Diagonal::SouthWest => '\\',
            Diagonal::SouthEast | Diagonal::NorthWest => '/',
        }
    }
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagonal::NorthEast => write!(f, "ne"),
            Diagonal::SouthEast => write!(f, "se"),
            Diagonal::SouthWest => write!(f, "sw"),
            Diagonal::NorthWest => write!(f, "nw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieceKind {
    Wall(Direction),
    Block,
    Bouncer(Diagonal),
    /// Robots without a name are labelled by their place in the robot list.
    Robot(Option<String>),
    Goal,
}

/// Something to put on the board at 1-based coordinates `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub kind: PieceKind,
}

impl Placement {
    pub fn new(x: usize, y: usize, kind: PieceKind) -> Self {
        Placement { x, y, kind }
    }

    pub fn marker(&self) -> Marker {
        match &self.kind {
            PieceKind::Wall(direction) => Marker::wall(*direction),
            PieceKind::Block => Marker::BLOCK,
            PieceKind::Bouncer(diagonal) => Marker::bouncer(*diagonal),
            PieceKind::Robot(_) => Marker::ROBOT,
            PieceKind::Goal => Marker::GOAL,
        }
    }

    /// Registers this piece with the board, returning the cell it landed on.
    ///
    /// A wall also places its mirror on the neighbouring cell it faces, so
    /// both cells agree that the segment between them is blocked.
    pub fn place(&self, board: &mut Board) -> Result<Position, BoardError> {
        let grid = board.grid();
        if !grid.contains_xy(self.x, self.y) {
            return Err(BoardError::BadPosition {
                x: self.x,
                y: self.y,
            });
        }
        let position = grid.xy_to_position(self.x, self.y);

        match &self.kind {
            PieceKind::Robot(name) => {
                let name = name
                    .clone()
                    .unwrap_or_else(|| default_robot_name(board.robots().len() + 1));
                board.add_robot(Robot::new(name, position))?;
            }
            PieceKind::Wall(direction) => {
                if let Some(other) = grid.neighbour(position, *direction) {
                    board.add_marker(other, Marker::wall(direction.flip()));
                }
            }
            PieceKind::Goal => board.set_goal(position),
            PieceKind::Block | PieceKind::Bouncer(_) => {}
        }

        board.add_marker(position, self.marker());
        Ok(position)
    }
}

pub fn default_robot_name(n: usize) -> String {
    format!("R{n}D{n}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    name: String,
    position: Position,
}

impl Robot {
    pub fn new(name: String, position: Position) -> Self {
        Robot { name, position }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
