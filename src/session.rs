//! This module provides the `Session`, which owns a built machine and runs one input after
//! another against it, reporting a single result character per run.

use crate::explorer::{Explorer, RunContext, RunReport};
use crate::machine::TransitionTable;
use crate::parser::Protocol;
use crate::types::{MachineError, Outcome};
use std::io::{self, Write};
use tracing::{error, info};

/// A machine and the run context shared by every run of a session.
#[derive(Debug, Clone)]
pub struct Session {
    machine: TransitionTable,
    context: RunContext,
}

impl Session {
    /// Creates a session over `machine`.
    pub fn new(machine: TransitionTable, context: RunContext) -> Self {
        Self { machine, context }
    }

    /// Returns the machine of this session.
    pub fn machine(&self) -> &TransitionTable {
        &self.machine
    }

    /// Returns the run context used for every run.
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Runs `input` and returns the full report.
    pub fn run(&self, input: &str) -> Result<RunReport, MachineError> {
        Explorer::new(&self.machine).run(&self.context, input)
    }

    /// Runs `input` and returns its report, never failing.
    ///
    /// A run aborted by an allocation failure is logged and reported as `Unknown` with empty
    /// counters.
    pub fn report(&self, input: &str) -> RunReport {
        self.run(input).unwrap_or_else(|e| {
            error!(input, %e, "run aborted");
            RunReport::new()
        })
    }

    /// Runs `input` and returns its outcome.
    pub fn decide(&self, input: &str) -> Outcome {
        self.report(input).outcome
    }

    /// Runs every input in order, writing one result character and a newline per input.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` with the number of runs performed.
    /// * `Err(io::Error)` if writing a result fails.
    pub fn run_all<I, S, W>(&self, inputs: I, writer: &mut W) -> io::Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let mut runs = 0;
        for input in inputs {
            writeln!(writer, "{}", self.decide(input.as_ref()))?;
            runs += 1;
        }

        info!(runs, "session finished");
        Ok(runs)
    }
}

impl From<Protocol> for Session {
    fn from(protocol: Protocol) -> Self {
        let context = protocol.context();
        Self::new(protocol.machine, context)
    }
}
