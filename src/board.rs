use arrayvec::ArrayVec;
use std::error::Error;
use std::fmt;

use crate::cells::{Cells, Marker};
use crate::geometry::{ALL_DIRECTIONS, Direction, Grid, MAX_SIZE, Position, xy_to_chess};
use crate::moves::{Move, Moves};
use crate::pieces::{PieceKind, Placement, Robot};

pub const MAX_ROBOTS: usize = 16;

/// Sorted robot positions. Two boards with the same key are interchangeable
/// for the search since any robot may claim the goal.
pub type RobotState = ArrayVec<Position, MAX_ROBOTS>;

/// Errors raised while assembling a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    BadDimensions { width: usize, height: usize },
    BadPosition { x: usize, y: usize },
    TooManyRobots,
    RobotCollision { x: usize, y: usize },
    DuplicateGoal { x: usize, y: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BadDimensions { width, height } => write!(
                f,
                "Bad board dimensions: {}x{} (each side must be between 1 and {})",
                width,
                height,
                MAX_SIZE
            ),
            BoardError::BadPosition { x, y } => {
                write!(f, "Bad board position: {}", xy_to_chess(*x, *y))
            }
            BoardError::TooManyRobots => {
                write!(f, "Too many robots: at most {} are supported", MAX_ROBOTS)
            }
            BoardError::RobotCollision { x, y } => {
                write!(f, "More than one robot placed on {}", xy_to_chess(*x, *y))
            }
            BoardError::DuplicateGoal { x, y } => {
                write!(f, "Board already has a goal, cannot add {}", xy_to_chess(*x, *y))
            }
        }
    }
}

impl Error for BoardError {}

/// A slide bounced more often than the board allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BounceLoop;

impl fmt::Display for BounceLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounce limit exceeded")
    }
}

impl Error for BounceLoop {}

/// Everything needed to build a board, already converted from notation.
#[derive(Debug, Clone)]
pub struct Setup {
    pub width: usize,
    pub height: usize,
    pub max_bounces: usize,
    pub goal: (usize, usize),
    /// Placed in order after the goal.
    pub pieces: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    cells: Cells,
    robots: ArrayVec<Robot, MAX_ROBOTS>,
    goal: Position,
    max_bounces: usize,
}

impl Board {
    pub fn new(setup: &Setup) -> Result<Self, BoardError> {
        let grid = Grid::new(setup.width, setup.height)?;
        let mut board = Board {
            grid,
            cells: Cells::new(grid.len()),
            robots: ArrayVec::new(),
            goal: 0,
            max_bounces: setup.max_bounces,
        };

        let (goal_x, goal_y) = setup.goal;
        board.place(&Placement::new(goal_x, goal_y, PieceKind::Goal))?;
        for piece in &setup.pieces {
            board.place(piece)?;
        }
        Ok(board)
    }

    pub fn place(&mut self, piece: &Placement) -> Result<Position, BoardError> {
        if piece.kind == PieceKind::Goal && self.cells.has(self.goal, Marker::GOAL) {
            return Err(BoardError::DuplicateGoal {
                x: piece.x,
                y: piece.y,
            });
        }
        piece.place(self)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, index: usize) -> &Robot {
        &self.robots[index]
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn max_bounces(&self) -> usize {
        self.max_bounces
    }

    pub(crate) fn add_marker(&mut self, position: Position, marker: Marker) {
        self.cells.add(position, marker);
    }

    pub(crate) fn set_goal(&mut self, position: Position) {
        self.goal = position;
    }

    pub(crate) fn add_robot(&mut self, robot: Robot) -> Result<(), BoardError> {
        let position = robot.position();
        if self.cells.has(position, Marker::ROBOT) {
            let (x, y) = self.grid.position_to_xy(position);
            return Err(BoardError::RobotCollision { x, y });
        }
        self.robots
            .try_push(robot)
            .map_err(|_| BoardError::TooManyRobots)
    }

    /// Moves a robot's marker along with it. Only `Move` calls this, which keeps
    /// every change on the search path undoable.
    pub(crate) fn move_robot(&mut self, index: usize, position: Position) {
        let robot = &mut self.robots[index];
        self.cells.remove(robot.position(), Marker::ROBOT);
        robot.set_position(position);
        self.cells.add(position, Marker::ROBOT);
    }

    /// Resting cell of a robot sliding from `position` towards `direction`.
    ///
    /// The slide stops in front of the board edge, robots, blocks, walls and
    /// closed bouncer faces. Sliding into an open bouncer face turns the robot
    /// out of the bouncer's other face; more than `max_bounces` turns in one
    /// slide is reported as a `BounceLoop`.
    pub fn trace(&self, position: Position, direction: Direction) -> Result<Position, BounceLoop> {
        let mut position = position;
        let mut direction = direction;
        let mut bounces = 0;

        loop {
            let Some(next) = self.grid.neighbour(position, direction) else {
                return Ok(position);
            };
            let blocker = Marker::ROBOT
                .union(Marker::BLOCK)
                .union(Marker::wall(direction.flip()));
            let cell = self.cells.get(next);
            if cell.intersects(blocker) {
                return Ok(position);
            }

            if let Some(diagonal) = cell.diagonal() {
                let Some(exit) = diagonal.redirect(direction) else {
                    return Ok(position);
                };
                if bounces >= self.max_bounces {
                    return Err(BounceLoop);
                }
                bounces += 1;
                direction = exit;
            }
            position = next;
        }
    }

    /// Every slide that changes the board, robots in placement order and
    /// directions in north, east, south, west order.
    pub fn possible_moves(&self) -> Moves {
        let mut moves = Moves::new();
        for (index, robot) in self.robots.iter().enumerate() {
            let start = robot.position();
            for direction in ALL_DIRECTIONS {
                match self.trace(start, direction) {
                    Ok(stop) if stop != start => {
                        moves.push(Move::new(index, direction, start, stop));
                    }
                    _ => {}
                }
            }
        }
        moves
    }

    pub fn robot_state(&self) -> RobotState {
        let mut state: RobotState = self.robots.iter().map(Robot::position).collect();
        state.sort_unstable();
        state
    }

    pub fn is_won(&self) -> bool {
        self.cells.has(self.goal, Marker::ROBOT)
    }

    fn glyph(&self, position: Position) -> char {
        let marker = self.cells.get(position);
        if marker.intersects(Marker::ROBOT) {
            if marker.intersects(Marker::GOAL) {
                return '*';
            }
            let index = self
                .robots
                .iter()
                .position(|robot| robot.position() == position)
                .unwrap_or(0);
            return char::from_digit(index as u32 + 1, 36).unwrap_or('R');
        }
        if marker.intersects(Marker::GOAL) {
            'G'
        } else if marker.intersects(Marker::BLOCK) {
            '#'
        } else if let Some(diagonal) = marker.diagonal() {
            diagonal.glyph()
        } else {
            '.'
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.grid;
        for y in 1..=grid.height() {
            let mut line = String::new();
            let mut below = String::new();
            for x in 1..=grid.width() {
                let position = grid.xy_to_position(x, y);
                let marker = self.cells.get(position);
                line.push(self.glyph(position));
                line.push(if marker.has_wall(Direction::East) { '|' } else { ' ' });
                below.push(if marker.has_wall(Direction::South) { '-' } else { ' ' });
                below.push(' ');
            }
            writeln!(f, "{}", line.trim_end())?;
            let below = below.trim_end();
            if !below.is_empty() && y < grid.height() {
                writeln!(f, "{}", below)?;
            }
        }
        Ok(())
    }
}
