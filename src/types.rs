//! This module defines the core data structures and types shared by the tape, the transition
//! table and the explorer, including symbols, moves, run outcomes and error types.

use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// A single tape cell value.
pub type Symbol = char;
/// Identifier of a machine state. Identifiers are contiguous from `0`.
pub type StateId = usize;

/// The blank symbol filling every cell that has not been written yet.
pub const BLANK_SYMBOL: Symbol = '_';
/// The lowest symbol of the tape alphabet.
pub const FIRST_SYMBOL: Symbol = '0';
/// The highest symbol of the tape alphabet.
pub const LAST_SYMBOL: Symbol = 'z';
/// Number of symbols in the tape alphabet (`'0'..='z'`).
pub const ALPHABET_SIZE: usize = (LAST_SYMBOL as usize) - (FIRST_SYMBOL as usize) + 1;
/// Upper bound (exclusive) on state identifiers.
pub const MAX_STATES: usize = 1 << 24;
/// The state every run starts in.
pub const INITIAL_STATE: StateId = 0;
/// Number of cells added to the tape buffer whenever the head leaves it.
pub const DEFAULT_TAPE_CHUNK: usize = 1000;
/// The step budget used when none is given.
pub const DEFAULT_MAX_STEPS: u64 = 10000;
/// The maximum allowed size for a protocol file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Maps a symbol to its slot in a per-state transition array.
///
/// Returns `None` for symbols outside of the tape alphabet.
pub fn symbol_index(symbol: Symbol) -> Option<usize> {
    (FIRST_SYMBOL..=LAST_SYMBOL)
        .contains(&symbol)
        .then(|| symbol as usize - FIRST_SYMBOL as usize)
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the protocol letter for this direction (`L`, `R` or `S`).
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = MachineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            'S' => Ok(Direction::Stay),
            _ => Err(MachineError::ValidationError(format!(
                "Unsupported direction: {c}"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single candidate move out of a (state, symbol) pair.
///
/// The input symbol is not stored: it is the key the transition is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol written under the head.
    pub write: Symbol,
    /// The direction the head moves after writing.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: StateId,
}

/// The decision reached by a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Some branch reached an acceptor state.
    Accepted,
    /// Every branch died and no branch was ever skipped as a loop.
    Rejected,
    /// The step budget ran out, or every branch died after a loop was skipped.
    Unknown,
}

impl Outcome {
    /// Returns the single result character printed for this outcome.
    pub fn as_char(self) -> char {
        match self {
            Outcome::Accepted => '1',
            Outcome::Rejected => '0',
            Outcome::Unknown => 'U',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents various errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// An operation named a state the table does not know.
    #[error("Unknown state: {0}")]
    UnknownState(StateId),
    /// A symbol falls outside of the `'0'..='z'` tape alphabet.
    #[error("Unsupported symbol: {0:?}")]
    UnsupportedSymbol(Symbol),
    /// Growing or cloning a tape failed to allocate.
    #[error("Tape allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    /// Indicates an error during the parsing of a protocol.
    #[error("Protocol parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates values that are well-formed but not acceptable.
    #[error("Protocol validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading protocol files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_direction_from_char() {
        assert_eq!(Direction::try_from('L').unwrap(), Direction::Left);
        assert_eq!(Direction::try_from('R').unwrap(), Direction::Right);
        assert_eq!(Direction::try_from('S').unwrap(), Direction::Stay);
        assert!(matches!(
            Direction::try_from('X'),
            Err(MachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_symbol_index_bounds() {
        assert_eq!(ALPHABET_SIZE, 75);
        assert_eq!(symbol_index('0'), Some(0));
        assert_eq!(symbol_index('z'), Some(74));
        assert_eq!(symbol_index(BLANK_SYMBOL), Some(47));
        assert_eq!(symbol_index(' '), None);
        assert_eq!(symbol_index('{'), None);
    }

    #[test]
    fn test_outcome_chars() {
        assert_eq!(Outcome::Accepted.to_string(), "1");
        assert_eq!(Outcome::Rejected.to_string(), "0");
        assert_eq!(Outcome::Unknown.to_string(), "U");
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::UnknownState(7);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown state"));
        assert!(error_msg.contains('7'));
    }
}
