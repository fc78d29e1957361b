//! This module drives a run: it explores every branch of a non-deterministic machine in
//! synchronized, breadth-first steps until some branch accepts, every branch dies, or the step
//! budget runs out.
//!
//! Each step visits the configurations that were live when the step began. For a configuration
//! with `n` candidate transitions, the first `n - 1` are taken on cloned tapes and the last one
//! is applied to the configuration itself, so a deterministic step never copies a tape.

use crate::configuration::{ConfigId, Configuration, ConfigurationSet};
use crate::machine::TransitionTable;
use crate::tape::Tape;
use crate::types::{MachineError, Outcome, DEFAULT_MAX_STEPS, DEFAULT_TAPE_CHUNK, INITIAL_STATE};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Per-run settings, passed explicitly to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Maximum number of synchronized steps before the run gives up with `Unknown`.
    pub max_steps: u64,
    /// Number of blank cells a tape buffer grows by.
    pub tape_chunk: usize,
}

impl RunContext {
    /// Creates a context with the given step budget and the default tape chunk.
    pub fn new(max_steps: u64) -> Self {
        Self {
            max_steps,
            ..Self::default()
        }
    }

    /// Sets the tape growth chunk.
    pub fn with_tape_chunk(mut self, tape_chunk: usize) -> Self {
        self.tape_chunk = tape_chunk;
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            tape_chunk: DEFAULT_TAPE_CHUNK,
        }
    }
}

/// The outcome of a run together with counters describing the exploration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: Outcome,
    /// Completed synchronized steps.
    pub steps: u64,
    /// Configurations created by cloning a tape.
    pub branches: u64,
    /// Configurations removed because no transition applied.
    pub dead_ends: u64,
    /// Transitions skipped because they could never make progress.
    pub ambiguous: u64,
    /// Largest number of live configurations at the start of a step.
    pub peak_frontier: usize,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            outcome: Outcome::Unknown,
            steps: 0,
            branches: 0,
            dead_ends: 0,
            ambiguous: 0,
            peak_frontier: 0,
        }
    }

    fn finish(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        debug!(
            %outcome,
            steps = self.steps,
            branches = self.branches,
            dead_ends = self.dead_ends,
            ambiguous = self.ambiguous,
            peak_frontier = self.peak_frontier,
            "run finished"
        );
        self
    }
}

/// Runs inputs against a shared, read-only transition table.
#[derive(Debug, Clone, Copy)]
pub struct Explorer<'m> {
    machine: &'m TransitionTable,
}

impl<'m> Explorer<'m> {
    /// Creates an explorer for `machine`.
    pub fn new(machine: &'m TransitionTable) -> Self {
        Self { machine }
    }

    /// Runs `input` from the initial state with the head on its first symbol.
    pub fn run(&self, context: &RunContext, input: &str) -> Result<RunReport, MachineError> {
        debug!(input, max_steps = context.max_steps, "run started");
        let tape = Tape::with_chunk(input, context.tape_chunk);
        self.run_configuration(context, Configuration::new(INITIAL_STATE, tape))
    }

    /// Explores every branch reachable from `initial` and decides the run.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` with `Outcome::Accepted` as soon as any branch enters an acceptor state.
    /// * `Ok(RunReport)` with `Outcome::Rejected` if every branch dies and none was skipped.
    /// * `Ok(RunReport)` with `Outcome::Unknown` if the budget runs out, or every branch dies
    ///   after some transition was skipped as non-advancing.
    /// * `Err(MachineError::Allocation)` if a tape could not be grown or cloned.
    ///
    /// A budget of zero is `Unknown` before anything else is looked at. Otherwise an initial
    /// configuration already in an acceptor state is accepted without taking a step.
    pub fn run_configuration(
        &self,
        context: &RunContext,
        initial: Configuration,
    ) -> Result<RunReport, MachineError> {
        let mut report = RunReport::new();

        if context.max_steps == 0 {
            return Ok(report.finish(Outcome::Unknown));
        }
        if self.machine.is_acceptor(initial.state()) {
            return Ok(report.finish(Outcome::Accepted));
        }

        let mut set = ConfigurationSet::new();
        set.insert(initial)?;
        let mut frontier = Vec::new();

        while report.steps < context.max_steps {
            if set.is_empty() {
                let outcome = if report.ambiguous > 0 {
                    Outcome::Unknown
                } else {
                    Outcome::Rejected
                };
                return Ok(report.finish(outcome));
            }

            report.peak_frontier = report.peak_frontier.max(set.len());
            trace!(step = report.steps, frontier = set.len(), "step");

            frontier.clear();
            frontier.extend(set.ids());
            for &id in &frontier {
                if self.expand(&mut set, id, &mut report)? {
                    set.clear();
                    return Ok(report.finish(Outcome::Accepted));
                }
            }

            report.steps += 1;
        }

        set.clear();
        Ok(report.finish(Outcome::Unknown))
    }

    /// Advances a single configuration by one step.
    ///
    /// Returns `true` if a branch entered an acceptor state.
    fn expand(
        &self,
        set: &mut ConfigurationSet,
        id: ConfigId,
        report: &mut RunReport,
    ) -> Result<bool, MachineError> {
        let Some(conf) = set.get(id) else {
            return Ok(false);
        };
        let transitions = self.machine.transitions_for(conf.state(), conf.symbol());

        let Some((last, rest)) = transitions.split_last() else {
            trace!(state = conf.state(), symbol = %conf.symbol(), "dead end");
            set.remove(id);
            report.dead_ends += 1;
            return Ok(false);
        };

        for transition in rest {
            let branch = match set.get(id) {
                Some(conf) if conf.is_stationary(transition) => {
                    trace!(state = conf.state(), "skipping non-advancing transition");
                    report.ambiguous += 1;
                    continue;
                }
                Some(conf) => conf.branch(transition)?,
                None => return Ok(false),
            };

            report.branches += 1;
            if self.machine.is_acceptor(branch.state()) {
                return Ok(true);
            }
            set.insert(branch)?;
        }

        let Some(conf) = set.get_mut(id) else {
            return Ok(false);
        };
        if conf.is_stationary(last) {
            trace!(state = conf.state(), "skipping non-advancing transition");
            report.ambiguous += 1;
            set.remove(id);
            return Ok(false);
        }

        conf.apply(last)?;
        Ok(self.machine.is_acceptor(conf.state()))
    }
}
