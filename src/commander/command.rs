//! Operator commands

use crate::manager::ManagerError;
use std::fmt;

/// One command character sent from the commander to the process manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `Q`: execute one instruction of the running process
    Quantum,
    /// `U`: move the front of the blocked queue to the ready queue
    Unblock,
    /// `P`: print the system state
    Print,
    /// `T`: report average turnaround and stop
    Terminate,
}

impl Command {
    pub fn from_char(ch: char) -> Result<Command, ManagerError> {
        match ch {
            'Q' => Ok(Command::Quantum),
            'U' => Ok(Command::Unblock),
            'P' => Ok(Command::Print),
            'T' => Ok(Command::Terminate),
            _ => Err(ManagerError::InvalidCommand { ch }),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Command::Quantum => 'Q',
            Command::Unblock => 'U',
            Command::Print => 'P',
            Command::Terminate => 'T',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Command character carried by an operator input line.
///
/// Only the first non-blank character counts, uppercased. `None` for a
/// blank line.
pub fn command_char(line: &str) -> Option<char> {
    line.trim().chars().next().map(|ch| ch.to_ascii_uppercase())
}
