//! Chess-style board coordinates as typed on the command line.
//!
//! - `e5`: column letter (`a` is x = 1) followed by the row number
//! - `e5n`: wall on the north side of e5
//! - `b2ne`: bouncer on b2 whose north and east faces are open
//! - `c3Red`: robot on c3 named "Red"

use std::error::Error;
use std::fmt;

use crate::geometry::Direction;
use crate::pieces::{Diagonal, PieceKind, Placement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    Position(String),
    Wall(String),
    Bouncer(String),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::Position(arg) => write!(f, "Bad board position: {}", arg),
            NotationError::Wall(arg) => write!(f, "Bad wall position: {}", arg),
            NotationError::Bouncer(arg) => write!(f, "Bad bouncer position: {}", arg),
        }
    }
}

impl Error for NotationError {}

/// Splits `arg` into its coordinate and whatever text follows it.
fn split_coordinate(arg: &str) -> Option<(usize, usize, &str)> {
    let column = arg.chars().next()?;
    if !column.is_ascii_lowercase() {
        return None;
    }
    let x = (column as u8 - b'a' + 1) as usize;

    let digits = &arg[1..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let y = digits[..end].parse().ok()?;
    Some((x, y, &digits[end..]))
}

pub fn parse_position(arg: &str) -> Result<(usize, usize), NotationError> {
    match split_coordinate(arg) {
        Some((x, y, "")) => Ok((x, y)),
        _ => Err(NotationError::Position(arg.to_string())),
    }
}

pub fn parse_block(arg: &str) -> Result<Placement, NotationError> {
    let (x, y) = parse_position(arg)?;
    Ok(Placement::new(x, y, PieceKind::Block))
}

pub fn parse_wall(arg: &str) -> Result<Placement, NotationError> {
    let err = || NotationError::Wall(arg.to_string());
    let (x, y, rest) = split_coordinate(arg).ok_or_else(err)?;

    let mut chars = rest.chars();
    let direction = match (chars.next(), chars.next()) {
        (Some(ch), None) => Direction::from_char(ch).ok_or_else(err)?,
        _ => return Err(err()),
    };
    Ok(Placement::new(x, y, PieceKind::Wall(direction)))
}

pub fn parse_bouncer(arg: &str) -> Result<Placement, NotationError> {
    let err = || NotationError::Bouncer(arg.to_string());
    let (x, y, rest) = split_coordinate(arg).ok_or_else(err)?;

    let mut chars = rest.chars();
    let diagonal = match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => {
            let a = Direction::from_char(a).ok_or_else(err)?;
            let b = Direction::from_char(b).ok_or_else(err)?;
            Diagonal::from_faces(a, b).ok_or_else(err)?
        }
        _ => return Err(err()),
    };
    Ok(Placement::new(x, y, PieceKind::Bouncer(diagonal)))
}

/// Any text after the coordinate becomes the robot's name.
pub fn parse_robot(arg: &str) -> Result<Placement, NotationError> {
    let (x, y, rest) =
        split_coordinate(arg).ok_or_else(|| NotationError::Position(arg.to_string()))?;
    let name = rest.trim();
    let name = (!name.is_empty()).then(|| name.to_string());
    Ok(Placement::new(x, y, PieceKind::Robot(name)))
}
