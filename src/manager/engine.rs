// Command dispatch and instruction interpretation for the process manager

use super::constants::{DEFAULT_TABLE_CAPACITY, INIT_PROGRAM};
use super::cpu::Cpu;
use super::errors::ManagerError;
use super::scheduler;
use super::table::{Pcb, PcbTable, Pid, ProcessState};
use crate::commander::Command;
use crate::program::{Instruction, ProgramLoader};
use crate::snapshot::{Accounting, LineKind, OutputLine, OutputSink, SystemSnapshot};

/// Whether the dispatch loop should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The simulated kernel: PCB table, CPU context, clock and accounting
pub struct ProcessManager {
    table: PcbTable,

    /// Context of the running process; meaningless while idle
    cpu: Cpu,

    /// Resolves program names for boot and Replace
    loader: Box<dyn ProgramLoader>,

    /// Ticks once per Quantum command
    timestamp: u64,

    accounting: Accounting,

    /// Set by Terminate; later commands are ignored
    terminated: bool,
}

impl ProcessManager {
    /// Boot with the default init program name and table capacity
    pub fn boot(loader: impl ProgramLoader + 'static) -> Result<Self, ManagerError> {
        Self::boot_with(loader, INIT_PROGRAM, DEFAULT_TABLE_CAPACITY)
    }

    /// Load `init_name` as process 0 and make it the running process.
    ///
    /// Fails with [`ManagerError::InitLoadFailed`] if the program cannot be
    /// loaded, which is fatal for the whole run.
    pub fn boot_with(
        loader: impl ProgramLoader + 'static,
        init_name: &str,
        capacity: usize,
    ) -> Result<Self, ManagerError> {
        let program = loader
            .load(init_name)
            .map_err(ManagerError::InitLoadFailed)?;

        let mut table = PcbTable::with_capacity(capacity);
        let pid = table.allocate(|pid| Pcb {
            pid,
            parent: None,
            program,
            program_counter: 0,
            value: 0,
            priority: 0,
            state: ProcessState::Running,
            start_time: 0,
            time_used: 0,
        })?;

        let mut cpu = Cpu::new();
        if let Some(pcb) = table.get(pid) {
            cpu.install(pcb);
        }

        Ok(ProcessManager {
            table,
            cpu,
            loader: Box::new(loader),
            timestamp: 0,
            accounting: Accounting::new(),
            terminated: false,
        })
    }

    pub fn table(&self) -> &PcbTable {
        &self.table
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn accounting(&self) -> Accounting {
        self.accounting
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Instructions of the running process, if any
    pub fn running_program(&self) -> Option<&[Instruction]> {
        self.cpu
            .running()
            .and_then(|pid| self.table.get(pid))
            .map(|pcb| pcb.program.as_slice())
    }

    /// Current state as the Print command reports it
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::capture(&self.table, &self.cpu, self.timestamp, self.accounting)
    }

    /// Run one command to completion
    pub fn dispatch(&mut self, command: Command, sink: &mut dyn OutputSink) -> Flow {
        if self.terminated {
            return Flow::Exit;
        }

        match command {
            Command::Quantum => self.quantum(sink),
            Command::Unblock => self.unblock(sink),
            Command::Print => self.print(sink),
            Command::Terminate => {
                self.terminate(sink);
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Decode a raw command character and dispatch it.
    ///
    /// Unknown characters are reported and otherwise ignored.
    pub fn dispatch_char(&mut self, ch: char, sink: &mut dyn OutputSink) -> Flow {
        if self.terminated {
            return Flow::Exit;
        }

        match Command::from_char(ch) {
            Ok(command) => self.dispatch(command, sink),
            Err(err) => {
                sink.diagnostic(err.to_string());
                Flow::Continue
            }
        }
    }

    /// Q: execute one instruction of the running process.
    ///
    /// The clock ticks and the scheduler runs even when the CPU was idle.
    pub fn quantum(&mut self, sink: &mut dyn OutputSink) {
        match self.cpu.running() {
            Some(pid) => self.execute_next(pid, sink),
            None => sink.diagnostic(ManagerError::NoProcessRunning.to_string()),
        }

        self.timestamp += 1;
        self.schedule(sink);
    }

    /// U: move the front blocked process to the ready queue, then schedule
    pub fn unblock(&mut self, sink: &mut dyn OutputSink) {
        match scheduler::unblock_front(&mut self.table) {
            Some(pid) => sink.trace(format!("process {} unblocked", pid)),
            None => sink.trace("no blocked processes".to_string()),
        }
        self.schedule(sink);
    }

    /// P: report the full system state
    pub fn print(&self, sink: &mut dyn OutputSink) {
        let report = self
            .snapshot()
            .lines()
            .into_iter()
            .map(|line| OutputLine::new(LineKind::Report, line))
            .collect();
        sink.emit_all(report);
    }

    /// T: report average turnaround and stop accepting commands
    pub fn terminate(&mut self, sink: &mut dyn OutputSink) {
        sink.report(self.accounting.summary());
        self.terminated = true;
    }

    fn execute_next(&mut self, pid: Pid, sink: &mut dyn OutputSink) {
        let instruction = match self.fetch(pid) {
            Some(instruction) => instruction,
            None => {
                sink.diagnostic(format!(
                    "process {} reached the end of its program without E; ending it",
                    pid
                ));
                Instruction::End
            }
        };

        if let Some(pcb) = self.table.get_mut(pid) {
            pcb.time_used += 1;
        }

        sink.trace(format!("process {}: {}", pid, instruction));
        match self.execute(pid, instruction) {
            Ok(Some(child)) => sink.trace(format!("process {} forked process {}", pid, child)),
            Ok(None) => {}
            Err(err) => sink.diagnostic(err.to_string()),
        }
    }

    /// Fetch the instruction at the program counter and advance past it.
    ///
    /// `None` when the counter has run off the end of the program.
    fn fetch(&mut self, pid: Pid) -> Option<Instruction> {
        let pcb = self.table.get(pid)?;
        let instruction = pcb.program.get(self.cpu.program_counter)?.clone();
        self.cpu.program_counter += 1;
        Some(instruction)
    }

    /// Apply one instruction for the running process `pid`.
    ///
    /// Returns the new child's pid for a successful Fork.
    fn execute(&mut self, pid: Pid, instruction: Instruction) -> Result<Option<Pid>, ManagerError> {
        match instruction {
            Instruction::Set(v) => self.cpu.value = v,
            Instruction::Add(v) => self.cpu.value = self.cpu.value.wrapping_add(v),
            Instruction::Decrement(v) => self.cpu.value = self.cpu.value.wrapping_sub(v),
            Instruction::Block => {
                scheduler::block_running(&mut self.table, &mut self.cpu);
            }
            Instruction::End => self.end_running()?,
            Instruction::Fork(offset) => return self.fork(pid, offset).map(Some),
            Instruction::Replace(name) => self.replace(pid, &name)?,
        }
        Ok(None)
    }

    fn end_running(&mut self) -> Result<(), ManagerError> {
        let pid = scheduler::terminate_running(&mut self.table, &mut self.cpu)
            .ok_or(ManagerError::NoProcessRunning)?;

        if let Some(pcb) = self.table.get(pid) {
            let turnaround = (self.timestamp + 1).saturating_sub(pcb.start_time);
            self.accounting.record(turnaround);
        }
        Ok(())
    }

    /// Create a ready child that resumes where the parent is now, then move
    /// the parent's program counter `offset` instructions further on.
    ///
    /// The offset is checked against the parent's current program.
    fn fork(&mut self, parent: Pid, offset: i32) -> Result<Pid, ManagerError> {
        if self.table.next_free().is_none() {
            return Err(ManagerError::NoFreeSlots {
                capacity: self.table.capacity(),
            });
        }

        let (program, priority) = {
            let pcb = self
                .table
                .get(parent)
                .ok_or(ManagerError::NoProcessRunning)?;
            let program_len = pcb.program.len();
            if offset < 0 || offset as usize >= program_len {
                return Err(ManagerError::InvalidForkOffset {
                    offset,
                    program_len,
                });
            }
            (pcb.program.clone(), pcb.priority)
        };

        let program_counter = self.cpu.program_counter;
        let value = self.cpu.value;
        let start_time = self.timestamp;

        let child = self.table.allocate(|pid| Pcb {
            pid,
            parent: Some(parent),
            program,
            program_counter,
            value,
            priority,
            state: ProcessState::Ready,
            start_time,
            time_used: 0,
        })?;
        self.table.enqueue_ready(child);

        self.cpu.program_counter += offset as usize;
        Ok(child)
    }

    /// Discard the running program and load `name` in its place.
    ///
    /// On failure the process keeps an empty program and the counter moves
    /// on by one, so the next Quantum ends it.
    fn replace(&mut self, pid: Pid, name: &str) -> Result<(), ManagerError> {
        let loaded = self.loader.load(name);
        let pcb = self
            .table
            .get_mut(pid)
            .ok_or(ManagerError::NoProcessRunning)?;
        pcb.program.clear();

        match loaded {
            Ok(program) => {
                pcb.program = program;
                self.cpu.program_counter = 0;
                Ok(())
            }
            Err(cause) => {
                self.cpu.program_counter += 1;
                Err(ManagerError::ReplaceFailed {
                    name: name.to_string(),
                    cause,
                })
            }
        }
    }

    fn schedule(&mut self, sink: &mut dyn OutputSink) {
        if let Some(pid) = scheduler::schedule(&mut self.table, &mut self.cpu) {
            sink.trace(format!("process {} dispatched", pid));
        }

        debug_assert!(!self.cpu.is_idle() || self.table.ready().is_empty());
        let consistency = self.table.check_consistency(self.cpu.running());
        debug_assert!(
            consistency.is_ok(),
            "inconsistent scheduler state: {:?}",
            consistency
        );
    }
}
