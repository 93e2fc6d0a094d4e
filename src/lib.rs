//! # Introduction
//!
//! procsim simulates a single-CPU process scheduler. A commander reads
//! one-letter operator commands and sends them over a channel to a process
//! manager, which runs tiny simulated programs one instruction at a time.
//!
//! ## Command pipeline
//!
//! ```text
//! Operator → Commander → Channel → ProcessManager → Scheduler → Output sink
//! ```
//!
//! 1. [`program`]: parses program text into [`program::Instruction`]s and
//!    resolves program names through a [`program::ProgramLoader`].
//! 2. [`manager`]: the PCB table, CPU context, scheduler, and the
//!    [`manager::ProcessManager`] that interprets instructions.
//! 3. [`snapshot`]: turnaround accounting, the Print report, and output
//!    sinks ([`snapshot::ConsoleSink`], [`snapshot::Transcript`]).
//! 4. [`commander`]: operator commands, the command channel, and the two
//!    cooperating loops.
//! 5. [`config`]: command-line options.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Commands
//!
//! `Q` executes one instruction, `U` unblocks the oldest blocked process,
//! `P` prints the system state, `T` prints the average turnaround time and
//! stops.

pub mod commander;
pub mod config;
pub mod manager;
pub mod program;
pub mod snapshot;
pub mod ui;
