//! Demo protocols embedded in the binary, parsed once on first use.

use crate::parser::{parse, Protocol};
use crate::types::MachineError;
use tracing::error;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("even-ones", include_str!("../demos/even-ones.tm")),
    ("contains-11", include_str!("../demos/contains-11.tm")),
    ("runaway", include_str!("../demos/runaway.tm")),
];

/// A named demo protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub protocol: Protocol,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, text)| match parse(text) {
            Ok(protocol) => Some(ProgramInfo { name, protocol }),
            Err(e) => {
                error!(name, %e, "failed to parse embedded program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get the names of all programs, in order
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|info| info.name).collect()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<ProgramInfo, MachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            MachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<ProgramInfo, MachineError> {
        PROGRAMS
            .iter()
            .find(|info| info.name == name)
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_embedded_programs_parse() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
        assert_eq!(
            ProgramManager::list_program_names(),
            vec!["even-ones", "contains-11", "runaway"]
        );
    }

    #[test]
    fn test_get_program_by_name() {
        let info = ProgramManager::get_program_by_name("contains-11").unwrap();
        assert_eq!(info.protocol.max_steps, 100);
        assert_eq!(info.protocol.inputs.len(), 4);

        assert!(matches!(
            ProgramManager::get_program_by_name("missing"),
            Err(MachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_get_program_by_index() {
        let info = ProgramManager::get_program_by_index(0).unwrap();
        assert_eq!(info.name, "even-ones");
        assert!(ProgramManager::get_program_by_index(99).is_err());
    }
}
