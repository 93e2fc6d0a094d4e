//! Process control blocks and the PCB table
//!
//! The table is an arena indexed by [`Pid`]: slot `n` always holds process
//! `n`, and a slot is never freed once assigned. Terminated processes keep
//! their entry, so running out of slots is a real, reportable condition
//! ([`ManagerError::NoFreeSlots`]) rather than something compaction fixes.
//!
//! The ready and blocked queues live next to the arena and hold pids only.
//! [`PcbTable::check_consistency`] verifies that queue membership agrees with
//! each PCB's [`ProcessState`].

use super::errors::ManagerError;
use crate::program::Program;
use std::collections::VecDeque;
use std::fmt;

/// Process identifier; doubles as the table slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub usize);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a process
///
/// ```text
/// Ready -> Running -> Blocked -> Ready
///                  -> Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
    Blocked,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Ready => "ready",
            ProcessState::Running => "running",
            ProcessState::Blocked => "blocked",
            ProcessState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Process control block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcb {
    pub pid: Pid,
    /// `None` for the root process
    pub parent: Option<Pid>,
    pub program: Program,
    /// Saved program counter; stale while the process is running
    pub program_counter: usize,
    /// Saved value register; stale while the process is running
    pub value: i32,
    pub priority: u8,
    pub state: ProcessState,
    pub start_time: u64,
    pub time_used: u64,
}

impl Pcb {
    /// Parent id as printed in reports (`-1` for the root)
    pub fn parent_display(&self) -> i64 {
        self.parent.map_or(-1, |p| p.0 as i64)
    }
}

/// Fixed-capacity PCB arena plus the ready and blocked queues
#[derive(Debug, Clone)]
pub struct PcbTable {
    slots: Vec<Option<Pcb>>,
    ready: VecDeque<Pid>,
    blocked: VecDeque<Pid>,
}

impl PcbTable {
    pub fn with_capacity(capacity: usize) -> Self {
        PcbTable {
            slots: vec![None; capacity],
            ready: VecDeque::new(),
            blocked: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots ever assigned
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// First slot that has never been assigned, without claiming it
    pub fn next_free(&self) -> Option<Pid> {
        self.slots.iter().position(|slot| slot.is_none()).map(Pid)
    }

    /// Claim the first free slot and fill it with the PCB built for that pid
    pub fn allocate(&mut self, build: impl FnOnce(Pid) -> Pcb) -> Result<Pid, ManagerError> {
        let pid = self.next_free().ok_or(ManagerError::NoFreeSlots {
            capacity: self.capacity(),
        })?;
        let mut pcb = build(pid);
        pcb.pid = pid;
        self.slots[pid.0] = Some(pcb);
        Ok(pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Pcb> {
        self.slots.get(pid.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Pcb> {
        self.slots.get_mut(pid.0).and_then(|slot| slot.as_mut())
    }

    /// All assigned PCBs in pid order
    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.slots.iter().flatten()
    }

    pub fn enqueue_ready(&mut self, pid: Pid) {
        self.ready.push_back(pid);
    }

    pub fn enqueue_blocked(&mut self, pid: Pid) {
        self.blocked.push_back(pid);
    }

    pub fn dequeue_ready(&mut self) -> Option<Pid> {
        self.ready.pop_front()
    }

    pub fn dequeue_blocked(&mut self) -> Option<Pid> {
        self.blocked.pop_front()
    }

    /// Ready queue, front first
    pub fn ready(&self) -> &VecDeque<Pid> {
        &self.ready
    }

    /// Blocked queue, front first
    pub fn blocked(&self) -> &VecDeque<Pid> {
        &self.blocked
    }

    /// Verify that queue membership and the running slot agree with PCB states.
    ///
    /// Every assigned process must be in exactly one of: the ready queue
    /// (state Ready), the blocked queue (Blocked), the running slot
    /// (Running), or nowhere (Terminated).
    pub fn check_consistency(&self, running: Option<Pid>) -> Result<(), String> {
        for pcb in self.iter() {
            let in_ready = self.ready.iter().filter(|&&p| p == pcb.pid).count();
            let in_blocked = self.blocked.iter().filter(|&&p| p == pcb.pid).count();
            let is_running = running == Some(pcb.pid);

            let expected = match pcb.state {
                ProcessState::Ready => (1, 0, false),
                ProcessState::Blocked => (0, 1, false),
                ProcessState::Running => (0, 0, true),
                ProcessState::Terminated => (0, 0, false),
            };

            if (in_ready, in_blocked, is_running) != expected {
                return Err(format!(
                    "process {} is {} but appears {} time(s) in ready, {} time(s) in blocked, running: {}",
                    pcb.pid, pcb.state, in_ready, in_blocked, is_running
                ));
            }
        }

        for pid in self.ready.iter().chain(self.blocked.iter()) {
            if self.get(*pid).is_none() {
                return Err(format!("queued pid {} has no PCB", pid));
            }
        }

        if let Some(pid) = running {
            if self.get(pid).is_none() {
                return Err(format!("running pid {} has no PCB", pid));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Instruction;

    fn pcb(pid: Pid, state: ProcessState) -> Pcb {
        Pcb {
            pid,
            parent: None,
            program: vec![Instruction::End],
            program_counter: 0,
            value: 0,
            priority: 0,
            state,
            start_time: 0,
            time_used: 0,
        }
    }

    #[test]
    fn test_allocate_uses_first_unassigned_slot() {
        let mut table = PcbTable::with_capacity(3);

        assert!(table.is_empty());
        assert_eq!(table.next_free(), Some(Pid(0)));
        let a = table.allocate(|pid| pcb(pid, ProcessState::Ready)).unwrap();
        let b = table.allocate(|pid| pcb(pid, ProcessState::Ready)).unwrap();

        assert_eq!(a, Pid(0));
        assert_eq!(b, Pid(1));
        assert_eq!(table.get(b).map(|p| p.pid), Some(Pid(1)));
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_allocate_fails_when_full() {
        let mut table = PcbTable::with_capacity(1);
        table.allocate(|pid| pcb(pid, ProcessState::Terminated)).unwrap();

        assert_eq!(table.next_free(), None);
        let err = table
            .allocate(|pid| pcb(pid, ProcessState::Ready))
            .unwrap_err();
        assert_eq!(err, ManagerError::NoFreeSlots { capacity: 1 });
    }

    #[test]
    fn test_queues_are_fifo() {
        let mut table = PcbTable::with_capacity(4);
        table.enqueue_ready(Pid(2));
        table.enqueue_ready(Pid(0));
        table.enqueue_blocked(Pid(3));

        assert_eq!(table.dequeue_ready(), Some(Pid(2)));
        assert_eq!(table.dequeue_ready(), Some(Pid(0)));
        assert_eq!(table.dequeue_ready(), None);
        assert_eq!(table.dequeue_blocked(), Some(Pid(3)));
        assert_eq!(table.dequeue_blocked(), None);
    }

    #[test]
    fn test_consistency_detects_mismatch() {
        let mut table = PcbTable::with_capacity(2);
        let pid = table.allocate(|pid| pcb(pid, ProcessState::Ready)).unwrap();

        assert!(table.check_consistency(None).is_err());
        table.enqueue_ready(pid);
        assert!(table.check_consistency(None).is_ok());
        assert!(table.check_consistency(Some(pid)).is_err());
    }

    #[test]
    fn test_parent_display() {
        let mut child = pcb(Pid(1), ProcessState::Ready);
        assert_eq!(child.parent_display(), -1);
        child.parent = Some(Pid(0));
        assert_eq!(child.parent_display(), 0);
    }
}
