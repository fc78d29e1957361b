//! This module defines a `Configuration`, one branch of a non-deterministic computation, and the
//! `ConfigurationSet` that holds every live branch of a run.
//!
//! The set is an arena of slots with an intrusive free list: a configuration keeps its
//! [`ConfigId`] for as long as it lives, removal is O(1), and freed slots are reused by the
//! next insertion.

use crate::tape::Tape;
use crate::types::{Direction, MachineError, StateId, Symbol, Transition, BLANK_SYMBOL};

/// One candidate computation path: the current state and an exclusively owned tape.
#[derive(Debug, Clone)]
pub struct Configuration {
    state: StateId,
    tape: Tape,
}

impl Configuration {
    /// Creates a configuration in `state` over `tape`.
    pub fn new(state: StateId, tape: Tape) -> Self {
        Self { state, tape }
    }

    /// Returns the current state.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Returns the tape of this branch.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read()
    }

    /// Returns `true` if taking `transition` could never make progress.
    ///
    /// That is the case when the transition re-enters the current state and either stays in
    /// place rewriting the symbol already under the head, or reads and writes a blank while
    /// stepping over the edge of the tape into more blanks.
    pub fn is_stationary(&self, transition: &Transition) -> bool {
        if transition.next_state != self.state {
            return false;
        }

        let symbol = self.tape.read();
        match transition.direction {
            Direction::Stay => transition.write == symbol,
            direction => {
                symbol == BLANK_SYMBOL
                    && transition.write == BLANK_SYMBOL
                    && self.tape.is_at_edge(direction)
            }
        }
    }

    /// Applies `transition` in place: writes, moves the head and changes state.
    ///
    /// On an allocation failure the configuration is left as it was.
    pub fn apply(&mut self, transition: &Transition) -> Result<(), MachineError> {
        let previous = self.tape.read();
        self.tape.write(transition.write);

        if let Err(e) = self.tape.shift(transition.direction) {
            self.tape.write(previous);
            return Err(e);
        }

        self.state = transition.next_state;
        Ok(())
    }

    /// Returns a new configuration obtained by applying `transition` to a copy of this one.
    pub fn branch(&self, transition: &Transition) -> Result<Self, MachineError> {
        let mut next = Self::new(self.state, self.tape.try_clone()?);
        next.apply(transition)?;
        Ok(next)
    }
}

/// Stable handle of a configuration inside a [`ConfigurationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId(usize);

#[derive(Debug)]
enum Slot {
    Occupied(Configuration),
    Vacant { next_free: Option<usize> },
}

/// The live configurations of a single run.
#[derive(Debug, Default)]
pub struct ConfigurationSet {
    slots: Vec<Slot>,
    free: Option<usize>,
    len: usize,
}

impl ConfigurationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration, reusing a freed slot when one is available.
    pub fn insert(&mut self, configuration: Configuration) -> Result<ConfigId, MachineError> {
        let index = match self.free {
            Some(index) => {
                if let Slot::Vacant { next_free } = self.slots[index] {
                    self.free = next_free;
                }
                self.slots[index] = Slot::Occupied(configuration);
                index
            }
            None => {
                self.slots.try_reserve(1)?;
                self.slots.push(Slot::Occupied(configuration));
                self.slots.len() - 1
            }
        };

        self.len += 1;
        Ok(ConfigId(index))
    }

    /// Removes and returns the configuration behind `id`, or `None` if it is no longer live.
    pub fn remove(&mut self, id: ConfigId) -> Option<Configuration> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        let Slot::Occupied(configuration) = std::mem::replace(slot, vacant) else {
            return None;
        };

        self.free = Some(id.0);
        self.len -= 1;
        Some(configuration)
    }

    /// Returns the configuration behind `id`.
    pub fn get(&self, id: ConfigId) -> Option<&Configuration> {
        match self.slots.get(id.0)? {
            Slot::Occupied(configuration) => Some(configuration),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns the configuration behind `id` for in-place updates.
    pub fn get_mut(&mut self, id: ConfigId) -> Option<&mut Configuration> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(configuration) => Some(configuration),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns the number of live configurations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no configuration is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the ids of live configurations in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ConfigId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Slot::Occupied(_)))
            .map(|(index, _)| ConfigId(index))
    }

    /// Iterates over live configurations.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigId, &Configuration)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied(configuration) => Some((ConfigId(index), configuration)),
                Slot::Vacant { .. } => None,
            })
    }

    /// Drops every configuration and its tape.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(state: StateId, input: &str) -> Configuration {
        Configuration::new(state, Tape::new(input))
    }

    fn transition(write: Symbol, direction: Direction, next_state: StateId) -> Transition {
        Transition {
            write,
            direction,
            next_state,
        }
    }

    #[test]
    fn test_apply_in_place() {
        let mut conf = config(0, "ab");

        conf.apply(&transition('x', Direction::Right, 2)).unwrap();

        assert_eq!(conf.state(), 2);
        assert_eq!(conf.tape().to_string(), "xb");
        assert_eq!(conf.symbol(), 'b');
    }

    #[test]
    fn test_branch_leaves_source_untouched() {
        let conf = config(1, "ab");

        let next = conf.branch(&transition('z', Direction::Left, 4)).unwrap();

        assert_eq!(conf.state(), 1);
        assert_eq!(conf.tape().to_string(), "ab");
        assert_eq!(next.state(), 4);
        assert_eq!(next.tape().to_string(), "_zb");
        assert_eq!(next.tape().head(), 0);
    }

    #[test]
    fn test_stationary_stay() {
        let conf = config(3, "a");

        assert!(conf.is_stationary(&transition('a', Direction::Stay, 3)));
        assert!(!conf.is_stationary(&transition('b', Direction::Stay, 3)));
        assert!(!conf.is_stationary(&transition('a', Direction::Stay, 4)));
    }

    #[test]
    fn test_stationary_edge_moves() {
        // Head on a blank at the right edge, with a symbol to its left.
        let mut conf = config(0, "1_");
        conf.apply(&transition('1', Direction::Right, 0)).unwrap();
        assert_eq!(conf.symbol(), BLANK_SYMBOL);

        assert!(conf.is_stationary(&transition('_', Direction::Right, 0)));
        // Moving left does not cross the left edge.
        assert!(!conf.is_stationary(&transition('_', Direction::Left, 0)));
        // Writing something else changes the tape.
        assert!(!conf.is_stationary(&transition('1', Direction::Right, 0)));
        assert!(!conf.is_stationary(&transition('_', Direction::Right, 1)));

        let edge = config(0, "_1");
        assert!(edge.is_stationary(&transition('_', Direction::Left, 0)));
        assert!(!edge.is_stationary(&transition('_', Direction::Right, 0)));
    }

    #[test]
    fn test_set_insert_remove_reuses_slots() {
        let mut set = ConfigurationSet::new();
        let a = set.insert(config(0, "a")).unwrap();
        let b = set.insert(config(1, "b")).unwrap();
        let c = set.insert(config(2, "c")).unwrap();
        assert_eq!(set.len(), 3);

        let removed = set.remove(b).unwrap();
        assert_eq!(removed.state(), 1);
        assert_eq!(set.len(), 2);
        assert!(set.get(b).is_none());
        assert!(set.remove(b).is_none());

        let d = set.insert(config(3, "d")).unwrap();
        assert_eq!(d, b);
        assert_eq!(set.get(d).unwrap().state(), 3);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![a, d, c]);
    }

    #[test]
    fn test_set_free_list_order() {
        let mut set = ConfigurationSet::new();
        let ids: Vec<_> = (0..4).map(|s| set.insert(config(s, "0")).unwrap()).collect();

        set.remove(ids[0]);
        set.remove(ids[2]);
        assert_eq!(set.len(), 2);

        // Most recently freed slot is reused first.
        assert_eq!(set.insert(config(7, "0")).unwrap(), ids[2]);
        assert_eq!(set.insert(config(8, "0")).unwrap(), ids[0]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_set_get_mut_and_clear() {
        let mut set = ConfigurationSet::new();
        let id = set.insert(config(0, "a")).unwrap();

        set.get_mut(id)
            .unwrap()
            .apply(&transition('b', Direction::Stay, 5))
            .unwrap();
        let states: Vec<_> = set.iter().map(|(_, c)| c.state()).collect();
        assert_eq!(states, vec![5]);

        set.clear();
        assert!(set.is_empty());
        assert!(set.get(id).is_none());
    }

    #[test]
    fn test_failed_apply_leaves_configuration_unchanged() {
        for direction in [Direction::Left, Direction::Right] {
            let mut conf = Configuration::new(3, Tape::with_chunk("a", usize::MAX));

            let result = conf.apply(&transition('b', direction, 4));

            assert!(matches!(result, Err(MachineError::Allocation(_))));
            assert_eq!(conf.state(), 3);
            assert_eq!(conf.symbol(), 'a');
            assert_eq!(conf.tape().head(), 0);
            assert_eq!(conf.tape().to_string(), "a");

            assert!(conf.branch(&transition('b', direction, 4)).is_err());
            assert_eq!(conf.tape().to_string(), "a");
        }
    }
}
