//! This crate provides the core logic for a non-deterministic single-tape Turing Machine
//! simulator. It includes modules for parsing the session protocol, building transition
//! tables, exploring every branch of a run breadth-first, and reporting accept, reject or
//! unknown for each input.

pub mod analyzer;
pub mod configuration;
pub mod explorer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod session;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisWarning` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisWarning};
/// Re-exports configuration types from the configuration module.
pub use configuration::{ConfigId, Configuration, ConfigurationSet};
/// Re-exports the execution engine from the explorer module.
pub use explorer::{Explorer, RunContext, RunReport};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TransitionTable` and `State` structs from the machine module.
pub use machine::{State, TransitionTable};
/// Re-exports the `parse` function and `Protocol` struct from the parser module.
pub use parser::{parse, Protocol};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Session` struct from the session module.
pub use session::Session;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types shared by the modules.
pub use types::{
    Direction, MachineError, Outcome, StateId, Symbol, Transition, BLANK_SYMBOL,
    DEFAULT_MAX_STEPS, DEFAULT_TAPE_CHUNK, MAX_PROGRAM_SIZE,
};
