use arrayvec::ArrayVec;
use std::fmt;

use crate::board::{Board, MAX_ROBOTS};
use crate::geometry::{Direction, Position};

pub const MAX_MOVES: usize = MAX_ROBOTS * 4;

/// Moves available from one board state.
pub type Moves = ArrayVec<Move, MAX_MOVES>;

/// One slide of one robot, from `start` to `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Index into the board's robot list.
    pub robot: usize,
    pub direction: Direction,
    pub start: Position,
    pub stop: Position,
}

impl Move {
    pub fn new(robot: usize, direction: Direction, start: Position, stop: Position) -> Self {
        Move {
            robot,
            direction,
            start,
            stop,
        }
    }

    pub fn execute(&self, board: &mut Board) {
        debug_assert_eq!(board.robot(self.robot).position(), self.start);
        board.move_robot(self.robot, self.stop);
    }

    pub fn undo(&self, board: &mut Board) {
        debug_assert_eq!(board.robot(self.robot).position(), self.stop);
        board.move_robot(self.robot, self.start);
    }

    /// Formats as `<robot> moves <direction>: <from> => <to>`.
    pub fn describe<'a>(&'a self, board: &'a Board) -> MoveDisplay<'a> {
        MoveDisplay { move_: self, board }
    }
}

pub struct MoveDisplay<'a> {
    move_: &'a Move,
    board: &'a Board,
}

impl fmt::Display for MoveDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.board.grid();
        write!(
            f,
            "{} moves {}: {} => {}",
            self.board.robot(self.move_.robot).name(),
            self.move_.direction,
            grid.position_to_chess(self.move_.start),
            grid.position_to_chess(self.move_.stop)
        )
    }
}
