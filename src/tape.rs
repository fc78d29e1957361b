//! This module defines the `Tape`, a symbol buffer with a movable head that grows lazily in
//! both directions.
//!
//! The tape separates its *buffer*, which grows by a whole chunk of blank cells at a time, from
//! its *logical window*, which grows by exactly one cell whenever the head steps over its edge.
//! Heads, lengths and edge checks are all reported against the logical window, so the chunk
//! size only affects how often the buffer is reallocated, never what a run observes.

use crate::types::{Direction, MachineError, Symbol, BLANK_SYMBOL, DEFAULT_TAPE_CHUNK};
use std::fmt;

/// A single tape owned by one configuration.
#[derive(Debug)]
pub struct Tape {
    cells: Vec<Symbol>,
    /// Buffer index of the first logical cell.
    start: usize,
    /// Buffer index one past the last logical cell.
    end: usize,
    /// Buffer index of the head.
    head: usize,
    chunk: usize,
}

impl Tape {
    /// Creates a tape holding `input` with the head on its first cell.
    ///
    /// An empty input yields a tape made of a single blank cell.
    pub fn new(input: &str) -> Self {
        Self::with_chunk(input, DEFAULT_TAPE_CHUNK)
    }

    /// Creates a tape like [`Tape::new`], growing by `chunk` cells at a time.
    pub fn with_chunk(input: &str, chunk: usize) -> Self {
        let mut cells: Vec<Symbol> = input.chars().collect();
        if cells.is_empty() {
            cells.push(BLANK_SYMBOL);
        }

        Self {
            end: cells.len(),
            cells,
            start: 0,
            head: 0,
            chunk: chunk.max(1),
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell in `direction`, extending the tape with a blank cell when the
    /// head crosses an edge of the logical window.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the head has moved.
    /// * `Err(MachineError::Allocation)` if the buffer could not grow; the tape is left unchanged.
    pub fn shift(&mut self, direction: Direction) -> Result<(), MachineError> {
        match direction {
            Direction::Left => {
                if self.head == self.start {
                    if self.start == 0 {
                        self.grow_left()?;
                    }
                    self.start -= 1;
                }
                self.head -= 1;
            }
            Direction::Right => {
                if self.head + 1 == self.end {
                    if self.end == self.cells.len() {
                        self.grow_right()?;
                    }
                    self.end += 1;
                }
                self.head += 1;
            }
            Direction::Stay => {}
        }

        Ok(())
    }

    /// Returns a fully independent copy of this tape, or an allocation error.
    ///
    /// Only the logical window is copied; spare buffer cells are not carried over.
    pub fn try_clone(&self) -> Result<Self, MachineError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(self.len())?;
        cells.extend_from_slice(self.cells());

        Ok(self.with_cells(cells))
    }

    /// Returns the head position within the logical window (0-based).
    pub fn head(&self) -> usize {
        self.head - self.start
    }

    /// Returns the number of cells in the logical window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always `false`: a tape holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Returns `true` if moving in `direction` would step over the edge of the logical window.
    /// `Stay` never crosses an edge.
    pub fn is_at_edge(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.head == self.start,
            Direction::Right => self.head + 1 == self.end,
            Direction::Stay => false,
        }
    }

    /// Returns the cells of the logical window.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells[self.start..self.end]
    }

    /// Returns the number of cells currently allocated, including spare blank cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    // A saturated length is never reservable, so an oversized chunk surfaces as an
    // allocation error.
    fn grown_len(&self) -> usize {
        self.cells.len().saturating_add(self.chunk)
    }

    fn grow_left(&mut self) -> Result<(), MachineError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(self.grown_len())?;
        cells.resize(self.chunk, BLANK_SYMBOL);
        cells.extend_from_slice(&self.cells);

        self.cells = cells;
        self.start += self.chunk;
        self.end += self.chunk;
        self.head += self.chunk;
        Ok(())
    }

    fn grow_right(&mut self) -> Result<(), MachineError> {
        let len = self.grown_len();
        self.cells.try_reserve_exact(self.chunk)?;
        self.cells.resize(len, BLANK_SYMBOL);
        Ok(())
    }

    fn with_cells(&self, cells: Vec<Symbol>) -> Self {
        Self {
            end: cells.len(),
            cells,
            start: 0,
            head: self.head(),
            chunk: self.chunk,
        }
    }
}

impl Clone for Tape {
    fn clone(&self) -> Self {
        self.with_cells(self.cells().to_vec())
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells().iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape() {
        let tape = Tape::new("abc");

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.read(), 'a');
        assert_eq!(tape.to_string(), "abc");
    }

    #[test]
    fn test_empty_input_is_single_blank() {
        let tape = Tape::new("");

        assert_eq!(tape.len(), 1);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert!(!tape.is_empty());
    }

    #[test]
    fn test_write_and_stay() {
        let mut tape = Tape::new("01");

        tape.write('x');
        tape.shift(Direction::Stay).unwrap();

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.to_string(), "x1");
    }

    #[test]
    fn test_grow_right_past_end() {
        let mut tape = Tape::with_chunk("1", 4);

        for n in 1..=10 {
            tape.shift(Direction::Right).unwrap();
            assert!(tape.len() >= tape.head() + 1);
            assert_eq!(tape.head(), n);
            assert_eq!(tape.read(), BLANK_SYMBOL);
        }

        assert_eq!(tape.len(), 11);
        assert_eq!(tape.cells()[0], '1');
        assert!(tape.cells()[1..].iter().all(|&c| c == BLANK_SYMBOL));
        // Buffer grows by whole chunks, not cell by cell.
        assert_eq!(tape.capacity(), 1 + 3 * 4);
    }

    #[test]
    fn test_grow_left_preserves_cells() {
        let mut tape = Tape::with_chunk("ab", 3);

        for _ in 0..5 {
            tape.shift(Direction::Left).unwrap();
            assert_eq!(tape.head(), 0);
            assert_eq!(tape.read(), BLANK_SYMBOL);
        }
        tape.write('x');

        assert_eq!(tape.len(), 7);
        assert_eq!(tape.to_string(), "x____ab");

        for _ in 0..5 {
            tape.shift(Direction::Right).unwrap();
        }
        assert_eq!(tape.read(), 'a');
    }

    #[test]
    fn test_edges_follow_logical_window() {
        let mut tape = Tape::with_chunk("0", 100);

        assert!(tape.is_at_edge(Direction::Left));
        assert!(tape.is_at_edge(Direction::Right));
        assert!(!tape.is_at_edge(Direction::Stay));

        tape.shift(Direction::Right).unwrap();
        assert!(tape.is_at_edge(Direction::Right));
        assert!(!tape.is_at_edge(Direction::Left));

        tape.shift(Direction::Left).unwrap();
        assert!(!tape.is_at_edge(Direction::Right));
    }

    #[test]
    fn test_clone_independence() {
        let mut original = Tape::new("0101");
        original.shift(Direction::Right).unwrap();

        let mut copy = original.try_clone().unwrap();
        copy.write('z');
        copy.shift(Direction::Right).unwrap();
        copy.write('y');

        assert_eq!(original.to_string(), "0101");
        assert_eq!(original.head(), 1);
        assert_eq!(copy.to_string(), "0zy1");
        assert_eq!(copy.head(), 2);

        let mut other = original.clone();
        other.write('q');
        assert_eq!(original.read(), '1');
    }

    #[test]
    fn test_clone_keeps_logical_window_only() {
        let mut tape = Tape::with_chunk("01", 50);
        tape.shift(Direction::Left).unwrap();

        let copy = tape.try_clone().unwrap();

        assert_eq!(copy.len(), 3);
        assert_eq!(copy.capacity(), 3);
        assert_eq!(copy.head(), 0);
        assert_eq!(copy.to_string(), "_01");
    }

    #[test]
    fn test_oversized_chunk_fails_without_moving() {
        for direction in [Direction::Left, Direction::Right] {
            let mut tape = Tape::with_chunk("ab", usize::MAX);
            if direction == Direction::Right {
                tape.shift(Direction::Right).unwrap();
            }
            let head = tape.head();

            let result = tape.shift(direction);

            assert!(matches!(result, Err(MachineError::Allocation(_))));
            assert_eq!(tape.head(), head);
            assert_eq!(tape.len(), 2);
            assert_eq!(tape.to_string(), "ab");
            assert_eq!(tape.capacity(), 2);
        }
    }
}
