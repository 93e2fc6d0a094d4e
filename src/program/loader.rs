//! Program loading
//!
//! [`parse_program`] does the line-level work; a [`ProgramLoader`] decides where
//! program text comes from. The process manager only sees the trait, so the
//! same engine runs against files on disk ([`FileLoader`]) or an in-memory
//! library of programs ([`MemoryLoader`]).

use super::instruction::{Instruction, Program};
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Reasons a program could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The program text could not be read at all
    Unreadable { source_name: String, reason: String },

    /// `S`, `A`, `D` or `F` without a valid base-10 integer
    InvalidInteger {
        source_name: String,
        line: usize,
        opcode: char,
        text: String,
    },

    /// `R` without a program name
    MissingArgument {
        source_name: String,
        line: usize,
        opcode: char,
    },

    /// Leading character is not an opcode
    UnknownOpcode {
        source_name: String,
        line: usize,
        opcode: char,
    },
}

impl LoadError {
    pub fn source_name(&self) -> &str {
        match self {
            LoadError::Unreadable { source_name, .. }
            | LoadError::InvalidInteger { source_name, .. }
            | LoadError::MissingArgument { source_name, .. }
            | LoadError::UnknownOpcode { source_name, .. } => source_name,
        }
    }

    /// 1-based line of the offending instruction, if the text was readable
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Unreadable { .. } => None,
            LoadError::InvalidInteger { line, .. }
            | LoadError::MissingArgument { line, .. }
            | LoadError::UnknownOpcode { line, .. } => Some(*line),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unreadable {
                source_name,
                reason,
            } => write!(f, "Error opening program {}: {}", source_name, reason),
            LoadError::InvalidInteger {
                source_name,
                line,
                opcode,
                text,
            } => write!(
                f,
                "{}:{} - Invalid integer argument '{}' for {} operation",
                source_name, line, text, opcode
            ),
            LoadError::MissingArgument {
                source_name,
                line,
                opcode,
            } => write!(
                f,
                "{}:{} - Missing string argument for {} operation",
                source_name, line, opcode
            ),
            LoadError::UnknownOpcode {
                source_name,
                line,
                opcode,
            } => write!(f, "{}:{} - Invalid operation, {}", source_name, line, opcode),
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse program text into instructions.
///
/// `source_name` only labels errors. Fails fast on the first bad line.
pub fn parse_program(source_name: &str, text: &str) -> Result<Program, LoadError> {
    let mut program = Program::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let mut chars = line.chars();
        let Some(first) = chars.next() else {
            continue;
        };

        let line_number = index + 1;
        let opcode = first.to_ascii_uppercase();
        let argument = chars.as_str().trim();

        let int_argument = || {
            argument
                .parse::<i32>()
                .map_err(|_| LoadError::InvalidInteger {
                    source_name: source_name.to_string(),
                    line: line_number,
                    opcode,
                    text: argument.to_string(),
                })
        };

        let instruction = match opcode {
            'S' => Instruction::Set(int_argument()?),
            'A' => Instruction::Add(int_argument()?),
            'D' => Instruction::Decrement(int_argument()?),
            'F' => Instruction::Fork(int_argument()?),
            'B' => Instruction::Block,
            'E' => Instruction::End,
            'R' => {
                if argument.is_empty() {
                    return Err(LoadError::MissingArgument {
                        source_name: source_name.to_string(),
                        line: line_number,
                        opcode,
                    });
                }
                Instruction::Replace(argument.to_string())
            }
            _ => {
                return Err(LoadError::UnknownOpcode {
                    source_name: source_name.to_string(),
                    line: line_number,
                    opcode,
                })
            }
        };

        program.push(instruction);
    }

    Ok(program)
}

/// Source of simulated programs, looked up by name
pub trait ProgramLoader: Send {
    fn load(&self, name: &str) -> Result<Program, LoadError>;
}

/// Loads programs from files under a root directory
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileLoader { root: root.into() }
    }
}

impl ProgramLoader for FileLoader {
    fn load(&self, name: &str) -> Result<Program, LoadError> {
        let path = self.root.join(name);
        let text = fs::read_to_string(&path).map_err(|err| LoadError::Unreadable {
            source_name: name.to_string(),
            reason: err.to_string(),
        })?;
        parse_program(name, &text)
    }
}

/// In-memory program library keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    programs: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryLoader::insert`]
    pub fn with_program(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.programs.insert(name.to_string(), text.to_string());
    }
}

impl ProgramLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<Program, LoadError> {
        let text = self
            .programs
            .get(name)
            .ok_or_else(|| LoadError::Unreadable {
                source_name: name.to_string(),
                reason: "no such program".to_string(),
            })?;
        parse_program(name, text)
    }
}
