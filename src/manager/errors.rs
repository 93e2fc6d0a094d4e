//! Diagnostics raised by the process manager
//!
//! This module defines [`ManagerError`]. Apart from a failed boot, every
//! variant is local: it is reported to the output sink and the simulation
//! carries on with the next command.

use crate::program::LoadError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// Fork found every PCB slot already assigned
    NoFreeSlots { capacity: usize },

    /// Fork offset negative or not inside the running program
    InvalidForkOffset { offset: i32, program_len: usize },

    /// A command needed a running process and the CPU is idle
    NoProcessRunning,

    /// Replace could not load the named program; the process is left empty
    ReplaceFailed { name: String, cause: LoadError },

    /// Command character outside Q/U/P/T
    InvalidCommand { ch: char },

    /// The init program could not be loaded at boot
    InitLoadFailed(LoadError),
}

impl ManagerError {
    /// Whether the error ends the whole run rather than one command
    pub fn is_fatal(&self) -> bool {
        matches!(self, ManagerError::InitLoadFailed(_))
    }
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::NoFreeSlots { capacity } => {
                write!(f, "No free PCBs available (capacity {})", capacity)
            }
            ManagerError::InvalidForkOffset {
                offset,
                program_len,
            } => write!(
                f,
                "Invalid fork value {} for program of {} instruction{}",
                offset,
                program_len,
                if *program_len == 1 { "" } else { "s" }
            ),
            ManagerError::NoProcessRunning => write!(f, "No processes are running"),
            ManagerError::ReplaceFailed { name, cause } => {
                write!(f, "Failed to load program from file {}: {}", name, cause)
            }
            ManagerError::InvalidCommand { ch } => {
                write!(f, "Invalid command character {:?}", ch)
            }
            ManagerError::InitLoadFailed(cause) => {
                write!(f, "Could not start init process: {}", cause)
            }
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManagerError::ReplaceFailed { cause, .. } => Some(cause),
            ManagerError::InitLoadFailed(cause) => Some(cause),
            _ => None,
        }
    }
}
