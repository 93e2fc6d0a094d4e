//! Instruction set of the simulated machine

use std::fmt;

/// A parsed program: instructions in execution order.
pub type Program = Vec<Instruction>;

/// One instruction of a simulated program.
///
/// Arguments are validated by the loader, so every variant is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `S n`: value register := n
    Set(i32),
    /// `A n`: value register += n
    Add(i32),
    /// `D n`: value register -= n
    Decrement(i32),
    /// `B`: move the running process to the blocked queue
    Block,
    /// `E`: terminate the running process
    End,
    /// `F n`: spawn a ready child, then skip `n` instructions in the parent
    Fork(i32),
    /// `R name`: swap the running program for the one called `name`
    Replace(String),
}

impl Instruction {
    /// Opcode letter as it appears in program text
    pub fn opcode(&self) -> char {
        match self {
            Instruction::Set(_) => 'S',
            Instruction::Add(_) => 'A',
            Instruction::Decrement(_) => 'D',
            Instruction::Block => 'B',
            Instruction::End => 'E',
            Instruction::Fork(_) => 'F',
            Instruction::Replace(_) => 'R',
        }
    }

    /// Integer argument, for the opcodes that carry one
    pub fn int_arg(&self) -> Option<i32> {
        match self {
            Instruction::Set(v)
            | Instruction::Add(v)
            | Instruction::Decrement(v)
            | Instruction::Fork(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Set(v)
            | Instruction::Add(v)
            | Instruction::Decrement(v)
            | Instruction::Fork(v) => write!(f, "{} {}", self.opcode(), v),
            Instruction::Block | Instruction::End => write!(f, "{}", self.opcode()),
            Instruction::Replace(name) => write!(f, "R {}", name),
        }
    }
}
