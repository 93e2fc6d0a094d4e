//! Simulated program representation
//!
//! This module turns program text into an ordered instruction list:
//! - [`instruction`]: the closed [`instruction::Instruction`] set
//! - [`loader`]: line parser, load errors, and program sources
//!
//! # Program Text
//!
//! One instruction per line, opcode first, case-insensitive:
//! ```text
//! S 5        set value
//! A 3        add
//! D 1        decrement
//! B          block
//! F 2        fork, parent skips 2 instructions
//! R other    replace program with `other`
//! E          end
//! ```
//! Blank lines are ignored. Parsing stops at the first malformed line.

pub mod instruction;
pub mod loader;

pub use instruction::{Instruction, Program};
pub use loader::{parse_program, FileLoader, LoadError, MemoryLoader, ProgramLoader};
