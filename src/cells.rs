use crate::geometry::{Direction, Position};
use crate::pieces::Diagonal;

/// Set of markers occupying a single cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    bits: u16,
}

impl Marker {
    pub const EMPTY: Marker = Marker { bits: 0 };
    pub const ROBOT: Marker = Marker { bits: 1 << 4 };
    pub const GOAL: Marker = Marker { bits: 1 << 5 };
    pub const BLOCK: Marker = Marker { bits: 1 << 6 };
    pub const BOUNCER: Marker = Marker { bits: 1 << 7 };

    // Wall segments use bits 0..4, bouncer orientations bits 8..12.
    const WALL_SHIFT: usize = 0;
    const DIAGONAL_SHIFT: usize = 8;

    /// The wall segment on the `direction` side of a cell.
    pub fn wall(direction: Direction) -> Marker {
        Marker {
            bits: 1 << (Self::WALL_SHIFT + direction.index()),
        }
    }

    pub fn bouncer(diagonal: Diagonal) -> Marker {
        Marker {
            bits: Self::BOUNCER.bits | 1 << (Self::DIAGONAL_SHIFT + diagonal.index()),
        }
    }

    pub fn intersects(&self, other: Marker) -> bool {
        (self.bits & other.bits) != 0
    }

    pub fn union(&self, other: Marker) -> Marker {
        Marker {
            bits: self.bits | other.bits,
        }
    }

    pub fn without(&self, other: Marker) -> Marker {
        Marker {
            bits: self.bits & !other.bits,
        }
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.intersects(Marker::wall(direction))
    }

    /// Orientation of the bouncer on this cell, if there is one.
    pub fn diagonal(&self) -> Option<Diagonal> {
        if !self.intersects(Marker::BOUNCER) {
            return None;
        }
        let orientation = (self.bits >> Self::DIAGONAL_SHIFT) & 0b1111;
        if orientation == 0 {
            None
        } else {
            Some(Diagonal::from_index(orientation.trailing_zeros() as usize))
        }
    }
}

/// Per-cell marker grid backing a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cells {
    markers: Vec<Marker>,
}

impl Cells {
    pub fn new(len: usize) -> Self {
        Cells {
            markers: vec![Marker::EMPTY; len],
        }
    }

    pub fn get(&self, position: Position) -> Marker {
        self.markers[position as usize]
    }

    pub fn has(&self, position: Position, mask: Marker) -> bool {
        self.get(position).intersects(mask)
    }

    pub fn add(&mut self, position: Position, marker: Marker) {
        let cell = &mut self.markers[position as usize];
        *cell = cell.union(marker);
    }

    pub fn remove(&mut self, position: Position, marker: Marker) {
        let cell = &mut self.markers[position as usize];
        *cell = cell.without(marker);
    }
}
