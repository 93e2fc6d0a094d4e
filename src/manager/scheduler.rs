//! Running-slot transitions
//!
//! Free functions over the PCB table and the CPU context. None of them
//! preempt: [`schedule`] only fills an empty running slot, and it always
//! takes the front of the ready queue (priority does not reorder dispatch).

use super::cpu::Cpu;
use super::table::{PcbTable, Pid, ProcessState};

/// Dispatch the front of the ready queue if the CPU is idle.
///
/// Returns the pid that was installed, if any. Afterwards either the CPU is
/// busy or the ready queue is empty.
pub fn schedule(table: &mut PcbTable, cpu: &mut Cpu) -> Option<Pid> {
    if !cpu.is_idle() {
        return None;
    }

    while let Some(pid) = table.dequeue_ready() {
        if let Some(pcb) = table.get_mut(pid) {
            pcb.state = ProcessState::Running;
            cpu.install(pcb);
            return Some(pid);
        }
    }

    None
}

/// Move the running process to the back of the blocked queue.
///
/// Saves the live registers into its PCB and empties the running slot.
/// Does nothing when the CPU is idle.
pub fn block_running(table: &mut PcbTable, cpu: &mut Cpu) -> Option<Pid> {
    let pid = cpu.release()?;
    if let Some(pcb) = table.get_mut(pid) {
        pcb.state = ProcessState::Blocked;
        cpu.save_into(pcb);
    }
    table.enqueue_blocked(pid);
    Some(pid)
}

/// Mark the running process terminated and empty the running slot.
///
/// Registers are saved so the final value stays visible in the PCB.
pub fn terminate_running(table: &mut PcbTable, cpu: &mut Cpu) -> Option<Pid> {
    let pid = cpu.release()?;
    if let Some(pcb) = table.get_mut(pid) {
        pcb.state = ProcessState::Terminated;
        cpu.save_into(pcb);
    }
    Some(pid)
}

/// Move the front of the blocked queue to the back of the ready queue.
///
/// Does not schedule; callers follow up with [`schedule`].
pub fn unblock_front(table: &mut PcbTable) -> Option<Pid> {
    let pid = table.dequeue_blocked()?;
    if let Some(pcb) = table.get_mut(pid) {
        pcb.state = ProcessState::Ready;
    }
    table.enqueue_ready(pid);
    Some(pid)
}
