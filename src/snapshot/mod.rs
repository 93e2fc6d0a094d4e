// System state snapshots and reporting

pub mod accounting;
pub mod output;

pub use accounting::Accounting;
pub use output::{ConsoleSink, LineKind, OutputLine, OutputSink, Transcript};

use crate::manager::constants::PRIORITY_LEVELS;
use crate::manager::{Cpu, Pcb, PcbTable, Pid};
use std::fmt;

/// Reportable fields of one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    pub pid: Pid,
    pub parent: Option<Pid>,
    pub priority: u8,
    pub value: i32,
    pub program_counter: usize,
    pub program_len: usize,
    pub start_time: u64,
    pub time_used: u64,
}

impl ProcessView {
    fn from_pcb(pcb: &Pcb) -> Self {
        ProcessView {
            pid: pcb.pid,
            parent: pcb.parent,
            priority: pcb.priority,
            value: pcb.value,
            program_counter: pcb.program_counter,
            program_len: pcb.program.len(),
            start_time: pcb.start_time,
            time_used: pcb.time_used,
        }
    }

    fn parent_display(&self) -> i64 {
        self.parent.map_or(-1, |p| p.0 as i64)
    }

    /// `pid, ppid, priority, value, start, used`
    pub fn full_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}",
            self.pid,
            self.parent_display(),
            self.priority,
            self.value,
            self.start_time,
            self.time_used
        )
    }

    /// `pid, ppid, value, start, used` (priority is the group header)
    pub fn ready_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.pid,
            self.parent_display(),
            self.value,
            self.start_time,
            self.time_used
        )
    }
}

/// Ready processes sharing one priority, in queue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityGroup {
    pub priority: u8,
    pub processes: Vec<ProcessView>,
}

/// Live CPU registers of the running process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuRegisters {
    pub program_counter: usize,
    pub value: i32,
}

/// Point-in-time copy of everything the Print command reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSnapshot {
    pub time: u64,
    /// Saved PCB fields of the running process
    pub running: Option<ProcessView>,
    /// Registers the running process is actually using, ahead of its PCB
    pub registers: Option<CpuRegisters>,
    pub blocked: Vec<ProcessView>,
    /// Non-empty groups only, lowest priority number first
    pub ready: Vec<PriorityGroup>,
    pub accounting: Accounting,
}

impl SystemSnapshot {
    /// Capture the current state without modifying it.
    ///
    /// The running process's view holds its PCB fields as last saved; the
    /// CPU registers are kept apart in `registers`.
    pub fn capture(table: &PcbTable, cpu: &Cpu, time: u64, accounting: Accounting) -> Self {
        let running = cpu
            .running()
            .and_then(|pid| table.get(pid))
            .map(ProcessView::from_pcb);
        let registers = running.as_ref().map(|_| CpuRegisters {
            program_counter: cpu.program_counter,
            value: cpu.value,
        });

        let blocked = table
            .blocked()
            .iter()
            .filter_map(|pid| table.get(*pid))
            .map(ProcessView::from_pcb)
            .collect();

        let mut by_priority: Vec<Vec<ProcessView>> = vec![Vec::new(); PRIORITY_LEVELS as usize];
        for pcb in table.ready().iter().filter_map(|pid| table.get(*pid)) {
            let level = (pcb.priority as usize).min(PRIORITY_LEVELS as usize - 1);
            by_priority[level].push(ProcessView::from_pcb(pcb));
        }

        let ready = by_priority
            .into_iter()
            .enumerate()
            .filter(|(_, processes)| !processes.is_empty())
            .map(|(priority, processes)| PriorityGroup {
                priority: priority as u8,
                processes,
            })
            .collect();

        SystemSnapshot {
            time,
            running,
            registers,
            blocked,
            ready,
            accounting,
        }
    }

    /// Report text, one entry per line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("CURRENT TIME: {}", self.time)];

        lines.push(String::new());
        lines.push("RUNNING PROCESS:".to_string());
        match &self.running {
            Some(view) => lines.push(view.full_line()),
            None => lines.push("None".to_string()),
        }

        lines.push(String::new());
        lines.push("BLOCKED PROCESSES:".to_string());
        if self.blocked.is_empty() {
            lines.push("None".to_string());
        } else {
            lines.push("Queue of blocked processes:".to_string());
            lines.extend(self.blocked.iter().map(ProcessView::full_line));
        }

        lines.push(String::new());
        lines.push("PROCESSES READY TO EXECUTE:".to_string());
        if self.ready.is_empty() {
            lines.push("None".to_string());
        } else {
            for group in &self.ready {
                lines.push(format!(
                    "Queue of processes with priority {}:",
                    group.priority
                ));
                lines.extend(group.processes.iter().map(ProcessView::ready_line));
            }
        }

        lines
    }
}

impl fmt::Display for SystemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
