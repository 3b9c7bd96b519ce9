use tracing::debug;

use crate::board::Board;
use crate::moves::Move;
use crate::zobrist::{TranspositionTable, Zobrist};

/// Inclusive window of solution lengths to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    min_moves: usize,
    max_moves: usize,
}

impl SearchLimits {
    /// `max_moves` below `min_moves` is raised to `min_moves`.
    pub fn new(min_moves: usize, max_moves: usize) -> Self {
        SearchLimits {
            min_moves,
            max_moves: max_moves.max(min_moves),
        }
    }

    pub fn min_moves(&self) -> usize {
        self.min_moves
    }

    pub fn max_moves(&self) -> usize {
        self.max_moves
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved(Vec<Move>),
    NoSolution,
}

/// Observes every move the search applies.
pub trait Tracer {
    fn trace(&self, board: &Board, nodes_explored: usize, remaining: usize, move_: &Move);
}

pub struct NullTracer;

impl Tracer for NullTracer {
    fn trace(&self, _board: &Board, _nodes_explored: usize, _remaining: usize, _move: &Move) {}
}

pub struct Solver<T: Tracer = NullTracer> {
    limits: SearchLimits,
    nodes_explored: usize,
    tpn_table: TranspositionTable,
    zobrist: Zobrist,
    tracer: Option<T>,
    path: Vec<Move>,
}

impl Solver<NullTracer> {
    pub fn new(limits: SearchLimits) -> Self {
        Solver::with_tracer(limits, None)
    }
}

impl<T: Tracer> Solver<T> {
    pub fn with_tracer(limits: SearchLimits, tracer: Option<T>) -> Self {
        Solver {
            limits,
            nodes_explored: 0,
            tpn_table: TranspositionTable::new(),
            zobrist: Zobrist::new(),
            tracer,
            path: Vec::new(),
        }
    }

    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// Find a shortest sequence of moves that puts any robot on the goal,
    /// using iterative deepening DFS.
    ///
    /// The goal is only checked after a move, so a robot starting on the goal
    /// still needs at least one move. On success the board is left in the
    /// solved position; otherwise it is restored to where it started.
    pub fn solve(&mut self, board: &mut Board) -> SolveResult {
        self.path.clear();
        self.tpn_table.clear();
        let hash = self.zobrist.compute_hash(board);

        for remaining in self.limits.min_moves()..=self.limits.max_moves() {
            let nodes_before = self.nodes_explored;
            if self.dfs(board, remaining, hash) {
                debug!(
                    moves = self.path.len(),
                    nodes = self.nodes_explored,
                    "solution found"
                );
                return SolveResult::Solved(std::mem::take(&mut self.path));
            }
            debug!(
                depth = remaining,
                nodes = self.nodes_explored - nodes_before,
                table = self.tpn_table.len(),
                "depth exhausted"
            );
        }

        SolveResult::NoSolution
    }

    fn dfs(&mut self, board: &mut Board, remaining: usize, hash: u64) -> bool {
        self.nodes_explored += 1;

        // Skip configurations that already failed with at least this budget
        let state = board.robot_state();
        if self.tpn_table.failed_depth(hash, &state) >= remaining {
            return false;
        }

        for move_ in board.possible_moves() {
            move_.execute(board);
            self.path.push(move_);

            if let Some(tracer) = &self.tracer {
                tracer.trace(board, self.nodes_explored, remaining, &move_);
            }

            if board.is_won() {
                return true;
            }

            let next_hash =
                hash ^ self.zobrist.robot_hash(move_.start) ^ self.zobrist.robot_hash(move_.stop);
            if remaining > 1 && self.dfs(board, remaining - 1, next_hash) {
                return true;
            }

            self.path.pop();
            move_.undo(board);
        }

        self.tpn_table.record_failure(hash, state, remaining);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Setup;
    use crate::cells::Marker;
    use crate::geometry::{Direction, Position};
    use crate::pieces::{Diagonal, PieceKind, Placement};
    use std::cell::Cell;

    fn nine_by_nine(goal: (usize, usize), pieces: Vec<Placement>) -> Board {
        Board::new(&Setup {
            width: 9,
            height: 9,
            max_bounces: 50,
            goal,
            pieces,
        })
        .unwrap()
    }

    fn robot(x: usize, y: usize) -> Placement {
        Placement::new(x, y, PieceKind::Robot(None))
    }

    fn at(board: &Board, x: usize, y: usize) -> Position {
        board.grid().xy_to_position(x, y)
    }

    /// Replays a solution on a fresh copy of the starting board.
    fn assert_solves(start: &Board, moves: &[Move]) {
        let mut board = start.clone();
        for move_ in moves {
            assert!(board.possible_moves().contains(move_), "{:?}", move_);
            move_.execute(&mut board);
        }
        assert!(board.is_won());
    }

    fn solve(board: &mut Board, min_moves: usize, max_moves: usize) -> SolveResult {
        Solver::new(SearchLimits::new(min_moves, max_moves)).solve(board)
    }

    #[test]
    fn test_limits_clamp_max() {
        let limits = SearchLimits::new(5, 2);
        assert_eq!(limits.min_moves(), 5);
        assert_eq!(limits.max_moves(), 5);
        assert_eq!(SearchLimits::new(1, 20).max_moves(), 20);
    }

    #[test]
    fn test_open_board_has_no_solution() {
        let mut board = nine_by_nine((6, 6), vec![robot(5, 5)]);
        let original = board.clone();
        assert_eq!(solve(&mut board, 1, 20), SolveResult::NoSolution);
        assert_eq!(board, original);
    }

    #[test]
    fn test_walls_without_approach_have_no_solution() {
        // The robot only ever reaches row 5, column 5 and the corners.
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(6, 6, PieceKind::Wall(Direction::South)),
                Placement::new(6, 6, PieceKind::Wall(Direction::East)),
                robot(5, 5),
            ],
        );
        assert_eq!(solve(&mut board, 1, 20), SolveResult::NoSolution);
    }

    #[test]
    fn test_walled_goal_two_moves() {
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(6, 6, PieceKind::Wall(Direction::South)),
                Placement::new(6, 6, PieceKind::Wall(Direction::East)),
                Placement::new(7, 5, PieceKind::Block),
                robot(5, 5),
            ],
        );
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 1, 20) else {
            panic!("expected a solution");
        };
        assert_eq!(
            moves,
            vec![
                Move::new(0, Direction::East, at(&start, 5, 5), at(&start, 6, 5)),
                Move::new(0, Direction::South, at(&start, 6, 5), at(&start, 6, 6)),
            ]
        );
        assert_solves(&start, &moves);

        // The winning position is left on the board.
        assert!(board.is_won());
        assert_eq!(board.robot(0).position(), at(&start, 6, 6));
    }

    #[test]
    fn test_single_move_east_into_wall() {
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(6, 6, PieceKind::Wall(Direction::East)),
                robot(1, 6),
            ],
        );
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 1, 20) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].direction, Direction::East);
        assert_solves(&start, &moves);
    }

    #[test]
    fn test_bounce_shortens_solution() {
        let mut board = nine_by_nine(
            (9, 5),
            vec![
                Placement::new(2, 5, PieceKind::Bouncer(Diagonal::NorthEast)),
                robot(2, 1),
            ],
        );
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 1, 20) else {
            panic!("expected a solution");
        };
        assert_eq!(
            moves,
            vec![Move::new(
                0,
                Direction::South,
                at(&start, 2, 1),
                at(&start, 9, 5)
            )]
        );
    }

    #[test]
    fn test_bounce_limit_removes_solution() {
        let mut board = Board::new(&Setup {
            width: 9,
            height: 9,
            max_bounces: 0,
            goal: (9, 5),
            pieces: vec![
                Placement::new(2, 5, PieceKind::Bouncer(Diagonal::NorthEast)),
                robot(2, 1),
            ],
        })
        .unwrap();
        assert_eq!(solve(&mut board, 1, 10), SolveResult::NoSolution);
    }

    #[test]
    fn test_robot_as_blocker() {
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(7, 7, PieceKind::Block),
                robot(6, 1),
                robot(1, 7),
            ],
        );
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 1, 20) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 2);
        assert_solves(&start, &moves);
    }

    #[test]
    fn test_min_moves_is_only_the_first_budget() {
        // A win inside the budget ends the search even when shorter than min_moves.
        let mut board = nine_by_nine(
            (9, 5),
            vec![
                Placement::new(2, 5, PieceKind::Bouncer(Diagonal::NorthEast)),
                robot(2, 1),
            ],
        );
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 3, 3) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 1);
        assert_solves(&start, &moves);
    }

    #[test]
    fn test_no_zero_move_solution() {
        let mut board = nine_by_nine((1, 1), vec![robot(1, 1)]);
        let start = board.clone();
        let SolveResult::Solved(moves) = solve(&mut board, 0, 5) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 2);
        assert_solves(&start, &moves);
    }

    #[test]
    fn test_max_below_min_searches_min() {
        let mut board = nine_by_nine((1, 1), vec![robot(1, 1)]);
        let SolveResult::Solved(moves) = solve(&mut board, 2, 0) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn test_deeper_budget_revisits_failed_states() {
        // Budget 1 records the start as failed; budget 2 must search it again.
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(6, 6, PieceKind::Wall(Direction::South)),
                Placement::new(7, 5, PieceKind::Block),
                robot(5, 5),
            ],
        );
        let original = board.clone();
        let mut solver = Solver::new(SearchLimits::new(1, 1));
        assert_eq!(solver.solve(&mut board), SolveResult::NoSolution);
        assert_eq!(board, original);

        let mut solver = Solver::new(SearchLimits::new(1, 2));
        let SolveResult::Solved(moves) = solver.solve(&mut board) else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 2);
        assert_solves(&original, &moves);
    }

    /// Nodes a search without the transposition table would visit.
    fn count_full_tree(board: &mut Board, remaining: usize) -> usize {
        let mut nodes = 1;
        for move_ in board.possible_moves() {
            move_.execute(board);
            if !board.is_won() && remaining > 1 {
                nodes += count_full_tree(board, remaining - 1);
            }
            move_.undo(board);
        }
        nodes
    }

    #[test]
    fn test_table_prunes_repeated_states() {
        // The goal is boxed in by blocks, so every budget fails.
        let mut board = nine_by_nine(
            (6, 6),
            vec![
                Placement::new(5, 6, PieceKind::Block),
                Placement::new(7, 6, PieceKind::Block),
                Placement::new(6, 5, PieceKind::Block),
                Placement::new(6, 7, PieceKind::Block),
                robot(1, 1),
                robot(9, 9),
            ],
        );
        let mut solver = Solver::new(SearchLimits::new(1, 6));
        assert_eq!(solver.solve(&mut board), SolveResult::NoSolution);

        let full: usize = (1..=6).map(|depth| count_full_tree(&mut board, depth)).sum();
        assert!(solver.nodes_explored() < full);
    }

    struct CountingTracer {
        calls: Cell<usize>,
    }

    impl Tracer for CountingTracer {
        fn trace(&self, board: &Board, _nodes_explored: usize, remaining: usize, move_: &Move) {
            assert!(remaining >= 1);
            assert!(board.cells().has(move_.stop, Marker::ROBOT));
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn test_tracer_sees_every_move() {
        let mut board = nine_by_nine(
            (9, 5),
            vec![
                Placement::new(2, 5, PieceKind::Bouncer(Diagonal::NorthEast)),
                robot(2, 1),
            ],
        );
        let tracer = CountingTracer {
            calls: Cell::new(0),
        };
        let mut solver = Solver::with_tracer(SearchLimits::new(1, 5), Some(tracer));
        assert!(matches!(solver.solve(&mut board), SolveResult::Solved(_)));
        let tracer = solver.tracer.take().unwrap();
        assert!(tracer.calls.get() >= 1);
    }
}
