//! This module defines the `TransitionTable`, the read-only description of a (possibly
//! non-deterministic) single-tape Turing Machine: its states, their acceptor flags and the
//! candidate transitions out of every (state, symbol) pair.

use crate::types::{
    symbol_index, Direction, MachineError, StateId, Symbol, Transition, ALPHABET_SIZE,
    FIRST_SYMBOL, MAX_STATES,
};
use std::fmt;

/// A machine state and the transitions leaving it.
///
/// Transitions are filed by input symbol in a fixed array covering the whole tape alphabet,
/// so a lookup is a single index operation. The array is only allocated once the state gets its
/// first transition; placeholder states stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    id: StateId,
    acceptor: bool,
    transitions: Vec<Vec<Transition>>,
}

impl State {
    fn new(id: StateId) -> Self {
        Self {
            id,
            acceptor: false,
            transitions: Vec::new(),
        }
    }

    /// Returns the identifier of this state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns `true` if reaching this state accepts the input.
    pub fn is_acceptor(&self) -> bool {
        self.acceptor
    }

    /// Returns the candidate transitions for `symbol`, most recently declared first.
    pub fn transitions(&self, symbol: Symbol) -> &[Transition] {
        symbol_index(symbol)
            .and_then(|i| self.transitions.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over the symbols that have at least one transition, with their transitions.
    pub fn rules(&self) -> impl Iterator<Item = (Symbol, &[Transition])> + '_ {
        self.transitions
            .iter()
            .enumerate()
            .filter(|(_, transitions)| !transitions.is_empty())
            .map(|(i, transitions)| (index_symbol(i), transitions.as_slice()))
    }

    /// Returns `true` if no transition leaves this state.
    pub fn is_halting(&self) -> bool {
        self.transitions.iter().all(Vec::is_empty)
    }
}

/// The transition table of a machine.
///
/// Built once through [`TransitionTable::declare_transition`] and
/// [`TransitionTable::mark_acceptor`], then shared by reference across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    states: Vec<State>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one transition `(state, read) -> (write, direction, next_state)`.
    ///
    /// Both `state` and `next_state` are created if not yet known, along with every id below
    /// them, as non-accepting states without transitions. The new transition is placed in front
    /// of those already declared for the same (state, symbol) pair.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the transition was registered.
    /// * `Err(MachineError::UnsupportedSymbol)` if `read` or `write` is outside of the tape alphabet.
    /// * `Err(MachineError::ValidationError)` if a state id is not below `MAX_STATES`.
    pub fn declare_transition(
        &mut self,
        state: StateId,
        read: Symbol,
        write: Symbol,
        direction: Direction,
        next_state: StateId,
    ) -> Result<(), MachineError> {
        let slot = symbol_index(read).ok_or(MachineError::UnsupportedSymbol(read))?;
        symbol_index(write).ok_or(MachineError::UnsupportedSymbol(write))?;

        let highest = state.max(next_state);
        if highest >= MAX_STATES {
            return Err(MachineError::ValidationError(format!(
                "State id {highest} exceeds the limit of {MAX_STATES} states"
            )));
        }

        self.materialize(highest);
        let transitions = &mut self.states[state].transitions;
        if transitions.is_empty() {
            transitions.resize(ALPHABET_SIZE, Vec::new());
        }
        transitions[slot].insert(
            0,
            Transition {
                write,
                direction,
                next_state,
            },
        );

        Ok(())
    }

    /// Flags an existing state as an acceptor.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the state exists.
    /// * `Err(MachineError::UnknownState)` if no state has this id.
    pub fn mark_acceptor(&mut self, id: StateId) -> Result<(), MachineError> {
        let state = self
            .states
            .get_mut(id)
            .ok_or(MachineError::UnknownState(id))?;
        state.acceptor = true;
        Ok(())
    }

    /// Returns the candidate transitions for `symbol` in `state`, most recently declared first.
    /// Unknown states and symbols outside of the alphabet yield an empty list.
    pub fn transitions_for(&self, state: StateId, symbol: Symbol) -> &[Transition] {
        self.states
            .get(state)
            .map(|state| state.transitions(symbol))
            .unwrap_or_default()
    }

    /// Returns `true` if `id` names an acceptor state.
    pub fn is_acceptor(&self, id: StateId) -> bool {
        self.states.get(id).is_some_and(State::is_acceptor)
    }

    /// Returns the state with the given id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// Returns all states, indexed by id.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no transition has been declared.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over the ids of acceptor states.
    pub fn acceptors(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .filter(|state| state.acceptor)
            .map(State::id)
    }

    /// Returns the total number of declared transitions.
    pub fn transition_count(&self) -> usize {
        self.states
            .iter()
            .flat_map(|state| state.transitions.iter())
            .map(Vec::len)
            .sum()
    }

    fn materialize(&mut self, id: StateId) {
        while self.states.len() <= id {
            self.states.push(State::new(self.states.len()));
        }
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.states {
            write!(f, "State: {}", state.id)?;
            if state.acceptor {
                write!(f, " (Acceptor)")?;
            }
            writeln!(f)?;

            for (symbol, transitions) in state.rules() {
                for t in transitions {
                    writeln!(
                        f,
                        "  {symbol} -> {}, {}, {}",
                        t.write, t.direction, t.next_state
                    )?;
                }
            }
        }

        Ok(())
    }
}

fn index_symbol(index: usize) -> Symbol {
    char::from(FIRST_SYMBOL as u8 + index as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BLANK_SYMBOL;

    #[test]
    fn test_declare_materializes_states() {
        let mut table = TransitionTable::new();
        table
            .declare_transition(0, 'a', 'b', Direction::Right, 3)
            .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.state(3).unwrap().id(), 3);
        assert!(table.state(3).unwrap().is_halting());
        assert!(table.state(2).unwrap().is_halting());
        assert!(!table.is_acceptor(3));
        assert_eq!(table.transition_count(), 1);
    }

    #[test]
    fn test_most_recent_declaration_first() {
        let mut table = TransitionTable::new();
        table
            .declare_transition(0, '0', '0', Direction::Right, 1)
            .unwrap();
        table
            .declare_transition(0, '0', '1', Direction::Left, 2)
            .unwrap();
        table
            .declare_transition(0, '0', '_', Direction::Stay, 0)
            .unwrap();

        let next: Vec<_> = table
            .transitions_for(0, '0')
            .iter()
            .map(|t| t.next_state)
            .collect();
        assert_eq!(next, vec![0, 2, 1]);
        assert_eq!(
            table.transitions_for(0, '0')[1],
            Transition {
                write: '1',
                direction: Direction::Left,
                next_state: 2,
            }
        );
    }

    #[test]
    fn test_transitions_for_missing_entries() {
        let mut table = TransitionTable::new();
        table
            .declare_transition(0, 'a', 'a', Direction::Right, 1)
            .unwrap();

        assert!(table.transitions_for(0, 'b').is_empty());
        assert!(table.transitions_for(0, BLANK_SYMBOL).is_empty());
        assert!(table.transitions_for(0, ' ').is_empty());
        assert!(table.transitions_for(9, 'a').is_empty());
    }

    #[test]
    fn test_mark_acceptor() {
        let mut table = TransitionTable::new();
        table
            .declare_transition(0, 'a', 'a', Direction::Right, 2)
            .unwrap();

        table.mark_acceptor(2).unwrap();
        assert!(table.is_acceptor(2));
        assert!(!table.is_acceptor(0));
        assert_eq!(table.acceptors().collect::<Vec<_>>(), vec![2]);

        assert_eq!(table.mark_acceptor(5), Err(MachineError::UnknownState(5)));
        assert!(!table.is_acceptor(5));
    }

    #[test]
    fn test_unsupported_symbols() {
        let mut table = TransitionTable::new();

        assert_eq!(
            table.declare_transition(0, '#', 'a', Direction::Right, 0),
            Err(MachineError::UnsupportedSymbol('#'))
        );
        assert_eq!(
            table.declare_transition(0, 'a', '~', Direction::Right, 0),
            Err(MachineError::UnsupportedSymbol('~'))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_state_limit() {
        let mut table = TransitionTable::new();

        let result = table.declare_transition(0, 'a', 'a', Direction::Right, MAX_STATES);
        assert!(matches!(result, Err(MachineError::ValidationError(_))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_display() {
        let mut table = TransitionTable::new();
        table
            .declare_transition(0, '1', 'x', Direction::Right, 1)
            .unwrap();
        table.mark_acceptor(1).unwrap();

        assert_eq!(
            table.to_string(),
            "State: 0\n  1 -> x, R, 1\nState: 1 (Acceptor)\n"
        );
    }
}
