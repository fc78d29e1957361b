//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use ndtm::{Protocol, RunContext, DEFAULT_TAPE_CHUNK};

/// Runs a non-deterministic Turing machine protocol and prints one result per input:
/// `1` accepted, `0` rejected, `U` undecided within the step budget.
#[derive(Parser, Debug, Clone)]
#[command(name = "ndtm-cli")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  ndtm-cli demos/even-ones.tm
  ndtm-cli --demo contains-11 -i 0110 -i 0101
  cat session.tm | ndtm-cli --max-steps 5000")]
pub struct Cli {
    /// Path to a protocol file. If omitted, the protocol is read from piped stdin.
    pub program: Option<PathBuf>,

    /// Run a built-in demo protocol.
    #[arg(long, conflicts_with = "program")]
    pub demo: Option<String>,

    /// List the built-in demo protocols and exit.
    #[arg(long)]
    pub list: bool,

    /// Input to run; may be repeated. Replaces the protocol's run section.
    #[arg(short, long)]
    pub input: Vec<String>,

    /// Override the protocol's step budget.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Number of blank cells a tape grows by when the head leaves it.
    #[arg(long, default_value_t = DEFAULT_TAPE_CHUNK)]
    pub tape_chunk: usize,

    /// Print the transition table and analysis findings, then exit.
    #[arg(long)]
    pub check: bool,

    /// Print a JSON run report per input instead of the result character.
    #[arg(long)]
    pub stats: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Builds the run context from the protocol, applying command-line overrides.
    pub fn context(&self, protocol: &Protocol) -> RunContext {
        let max_steps = self.max_steps.unwrap_or(protocol.max_steps);
        RunContext::new(max_steps).with_tape_chunk(self.tape_chunk)
    }

    /// Returns the inputs to run: those given with `--input`, else the protocol's own.
    pub fn inputs(&self, protocol: &Protocol) -> Vec<String> {
        if self.input.is_empty() {
            protocol.inputs.clone()
        } else {
            self.input.clone()
        }
    }
}
