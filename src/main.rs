mod board;
mod cells;
mod geometry;
mod moves;
mod notation;
mod pieces;
mod solver;
mod zobrist;

use clap::Parser;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    board::{Board, Setup},
    moves::Move,
    pieces::Placement,
    solver::{SearchLimits, SolveResult, Solver, Tracer},
};

fn print_solution(start: &Board, solution: &[Move], show_board: bool) {
    println!("Solution found in {} moves!", solution.len());
    let mut board = start.clone();
    for move_ in solution {
        println!("{}", move_.describe(&board));
        move_.execute(&mut board);
        if show_board {
            println!("{}", board);
        }
    }
}

struct VerboseTracer {
    trace_start: usize,
    trace_end: usize,
}

impl VerboseTracer {
    fn new(from_node: usize, to_node: usize) -> Self {
        Self {
            trace_start: from_node,
            trace_end: to_node,
        }
    }
}

impl Tracer for VerboseTracer {
    fn trace(&self, board: &Board, nodes_explored: usize, remaining: usize, move_: &Move) {
        if self.trace_start <= nodes_explored && nodes_explored <= self.trace_end {
            println!(
                "move={}, count={}, remaining={}:\n{}",
                move_.describe(board),
                nodes_explored,
                remaining,
                board
            );
        }
    }
}

#[derive(Parser)]
#[command(name = "ricochet")]
#[command(about = "Finds the shortest way to slide any robot onto the goal", long_about = None)]
struct Args {
    /// Board width
    #[arg(long, default_value_t = 9)]
    width: usize,

    /// Board height
    #[arg(long, default_value_t = 9)]
    height: usize,

    /// Starting search depth in number of moves
    #[arg(long, default_value_t = 1)]
    min_moves: usize,

    /// Maximum search depth in number of moves before giving up
    #[arg(long, default_value_t = 50)]
    max_moves: usize,

    /// Maximum number of bounces in one move before calling it a loop
    #[arg(long, default_value_t = 50)]
    max_bounces: usize,

    /// Place a wall with chess notation plus a direction, i.e. a1n, b2w.
    /// Mirror walls are placed automatically
    #[arg(short = 'w', long = "wall", value_parser = notation::parse_wall)]
    walls: Vec<Placement>,

    /// Place a block that walls off an entire coordinate, similar to a fixed robot
    #[arg(short = 'b', long = "block", value_parser = notation::parse_block)]
    blocks: Vec<Placement>,

    /// Place a bouncer with chess notation plus its two open faces, i.e. b2ne.
    /// A robot entering through one open face leaves through the other as part
    /// of the same move; the closed faces act as walls
    #[arg(short = 'o', long = "bouncer", value_parser = notation::parse_bouncer)]
    bouncers: Vec<Placement>,

    /// Place a robot with chess notation, i.e. a1, b2. Additional characters
    /// are used as the robot name
    #[arg(short = 'r', long = "robot", required = true, value_parser = notation::parse_robot)]
    robots: Vec<Placement>,

    /// Place the goal with chess notation, i.e. a1, b2
    #[arg(short = 'g', long, value_parser = notation::parse_position)]
    goal: (usize, usize),

    /// Print the board before and after every move of the solution
    #[arg(short, long)]
    print_board: bool,

    /// Range of node counts to trace (start, end)
    #[arg(long, num_args = 2)]
    trace_range: Option<Vec<usize>>,
}

impl Args {
    fn setup(&self) -> Setup {
        let pieces = self
            .walls
            .iter()
            .chain(&self.blocks)
            .chain(&self.bouncers)
            .chain(&self.robots)
            .cloned()
            .collect();
        Setup {
            width: self.width,
            height: self.height,
            max_bounces: self.max_bounces,
            goal: self.goal,
            pieces,
        }
    }
}

fn solve<T: Tracer>(board: &Board, limits: SearchLimits, tracer: Option<T>) -> (SolveResult, usize) {
    let mut solver = Solver::with_tracer(limits, tracer);
    let result = solver.solve(&mut board.clone());
    (result, solver.nodes_explored())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    // Validate trace_range
    let trace_range = args.trace_range.as_ref().map(|v| (v[0], v[1]));
    if let Some((start, end)) = trace_range {
        if start > end {
            eprintln!("Error: trace range start must be <= end");
            std::process::exit(1);
        }
    }

    let board = match Board::new(&args.setup()) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        width = args.width,
        height = args.height,
        robots = board.robots().len(),
        max_bounces = board.max_bounces(),
        "board ready"
    );

    if args.print_board {
        println!("Starting position:\n{}", board);
    }

    let limits = SearchLimits::new(args.min_moves, args.max_moves);
    let start = Instant::now();
    let (result, nodes_explored) = match trace_range {
        Some((from, to)) => solve(&board, limits, Some(VerboseTracer::new(from, to))),
        None => solve::<VerboseTracer>(&board, limits, None),
    };
    let elapsed_ms = start.elapsed().as_millis();

    match &result {
        SolveResult::Solved(solution) => print_solution(&board, solution, args.print_board),
        SolveResult::NoSolution => {
            println!("No solution found in {} moves.", limits.max_moves())
        }
    }
    info!(solved = matches!(result, SolveResult::Solved(_)), "search finished");
    println!("states: {:<12}  elapsed: {} ms", nodes_explored, elapsed_ms);
}
