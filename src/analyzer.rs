//! This module provides static checks over a built `TransitionTable`. The checks never block a
//! run; they point out machines whose runs can only ever end with `0` or `U`, and states that
//! no run can enter.

use crate::machine::TransitionTable;
use crate::types::{StateId, INITIAL_STATE};
use std::collections::VecDeque;
use std::fmt;

/// Represents the findings of an analysis of a transition table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisWarning {
    /// No state is flagged as an acceptor, so no input can be accepted.
    NoAcceptors,
    /// States that cannot be reached from the initial state by any sequence of transitions.
    UnreachableStates(Vec<StateId>),
    /// Acceptors exist, but none of them can be reached from the initial state.
    NoReachableAcceptor,
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::NoAcceptors => write!(f, "No acceptor state declared"),
            AnalysisWarning::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
            AnalysisWarning::NoReachableAcceptor => {
                write!(f, "No acceptor state is reachable from state {INITIAL_STATE}")
            }
        }
    }
}

/// Analyzes a transition table and returns every finding, in a fixed order.
///
/// # Arguments
///
/// * `machine` - A reference to the `TransitionTable` to be analyzed.
///
/// # Returns
///
/// * An empty vector if nothing was found.
/// * Otherwise one `AnalysisWarning` per failed check.
pub fn analyze(machine: &TransitionTable) -> Vec<AnalysisWarning> {
    let reachable = reachable_states(machine);

    [
        check_acceptors,
        check_unreachable_states,
        check_reachable_acceptor,
    ]
    .iter()
    .filter_map(|f| f(machine, &reachable).err())
    .collect()
}

/// Checks that at least one acceptor is declared.
fn check_acceptors(
    machine: &TransitionTable,
    _reachable: &[bool],
) -> Result<(), AnalysisWarning> {
    if machine.acceptors().next().is_none() {
        return Err(AnalysisWarning::NoAcceptors);
    }

    Ok(())
}

/// Checks that every state can be entered from the initial state.
fn check_unreachable_states(
    _machine: &TransitionTable,
    reachable: &[bool],
) -> Result<(), AnalysisWarning> {
    let unreachable: Vec<StateId> = reachable
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| !seen)
        .map(|(id, _)| id)
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisWarning::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that some acceptor can be entered from the initial state.
///
/// Skipped when there are no acceptors at all, which `check_acceptors` reports.
fn check_reachable_acceptor(
    machine: &TransitionTable,
    reachable: &[bool],
) -> Result<(), AnalysisWarning> {
    let mut acceptors = machine.acceptors().peekable();

    if acceptors.peek().is_none() {
        return Ok(());
    }

    if !acceptors.any(|id| reachable[id]) {
        return Err(AnalysisWarning::NoReachableAcceptor);
    }

    Ok(())
}

/// Marks the states reachable from the initial state, ignoring tape contents.
fn reachable_states(machine: &TransitionTable) -> Vec<bool> {
    let mut reachable = vec![false; machine.len()];
    if machine.is_empty() {
        return reachable;
    }

    let mut queue = VecDeque::from([INITIAL_STATE]);
    reachable[INITIAL_STATE] = true;

    while let Some(id) = queue.pop_front() {
        let Some(state) = machine.state(id) else {
            continue;
        };

        for (_, transitions) in state.rules() {
            for transition in transitions {
                if !reachable[transition.next_state] {
                    reachable[transition.next_state] = true;
                    queue.push_back(transition.next_state);
                }
            }
        }
    }

    reachable
}
