use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use crate::board::{Board, RobotState};
use crate::geometry::{MAX_SIZE, Position};

/// Zobrist hash for robot configurations.
///
/// Robots are hashed by position only, so the hash of a board matches the hash
/// of any relabelling of its robots.
pub struct Zobrist {
    robot_hashes: Vec<u64>,
}

impl Zobrist {
    pub fn new() -> Self {
        // Use a seeded PRNG for reproducible Zobrist hashes
        let mut rng = ChaCha8Rng::seed_from_u64(0x123456789abcdef0);
        let robot_hashes = (0..MAX_SIZE * MAX_SIZE).map(|_| rng.next_u64()).collect();
        Zobrist { robot_hashes }
    }

    pub fn robot_hash(&self, position: Position) -> u64 {
        self.robot_hashes[position as usize]
    }

    pub fn compute_hash(&self, board: &Board) -> u64 {
        board
            .robots()
            .iter()
            .fold(0, |hash, robot| hash ^ self.robot_hash(robot.position()))
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Self::new()
    }
}

struct Entry {
    state: RobotState,
    depth: usize,
}

/// Remembers the largest move budget each configuration was searched with and
/// failed. Entries are keyed by Zobrist hash and carry the full state, so a
/// hash collision only costs the older entry.
pub struct TranspositionTable {
    entries: HashMap<u64, Entry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            entries: HashMap::new(),
        }
    }

    /// Budget at which `state` is known to fail, 0 if unknown.
    pub fn failed_depth(&self, hash: u64, state: &RobotState) -> usize {
        match self.entries.get(&hash) {
            Some(entry) if entry.state == *state => entry.depth,
            _ => 0,
        }
    }

    pub fn record_failure(&mut self, hash: u64, state: RobotState, depth: usize) {
        if self.failed_depth(hash, &state) >= depth {
            return;
        }
        self.entries.insert(hash, Entry { state, depth });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
