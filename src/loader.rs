//! This module provides the `ProgramLoader` struct, responsible for loading session protocols
//! from files and strings.

use crate::analyzer::analyze;
use crate::parser::{parse, Protocol};
use crate::types::MachineError;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// `ProgramLoader` is a utility struct for loading protocols.
///
/// Loaded machines are analyzed and any findings are logged as warnings; they never prevent
/// the protocol from loading.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a protocol from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Protocol)` if the file is successfully read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid protocol.
    pub fn load_program(path: &Path) -> Result<Protocol, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a protocol from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<Protocol, MachineError> {
        let protocol = parse(content)?;

        debug!(
            states = protocol.machine.len(),
            transitions = protocol.machine.transition_count(),
            max_steps = protocol.max_steps,
            inputs = protocol.inputs.len(),
            "protocol loaded"
        );
        for warning in analyze(&protocol.machine) {
            warn!(%warning, "machine analysis");
        }

        Ok(protocol)
    }
}
