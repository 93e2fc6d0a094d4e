//! Process manager: the simulated kernel
//!
//! This module owns all scheduling state and interprets simulated programs:
//! - [`table`]: fixed-capacity PCB arena with ready and blocked queues
//! - [`cpu`]: the single CPU context (running slot, program counter, value)
//! - [`scheduler`]: running-slot transitions (schedule, block, unblock)
//! - [`engine`]: [`engine::ProcessManager`], the command dispatcher and
//!   instruction interpreter
//! - [`errors`]: diagnostics raised while executing commands
//!
//! # Execution Model
//!
//! Exactly one instruction runs per Quantum command. The scheduler never
//! preempts: a process keeps the CPU until it blocks or ends, and the ready
//! queue is served in strict FIFO order regardless of priority.

pub mod constants;
pub mod cpu;
pub mod engine;
pub mod errors;
pub mod scheduler;
pub mod table;

pub use cpu::Cpu;
pub use engine::{Flow, ProcessManager};
pub use errors::ManagerError;
pub use table::{Pcb, PcbTable, Pid, ProcessState};
