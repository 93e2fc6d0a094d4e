//! The simulated CPU context
//!
//! [`Cpu`] is the running slot plus the live register pair. The running
//! process's instructions are read from its own PCB, so the context never
//! holds a second copy of any program.

use super::table::{Pcb, Pid};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cpu {
    running: Option<Pid>,
    pub program_counter: usize,
    pub value: i32,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pid currently holding the CPU
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    /// Load a process's saved registers and give it the running slot.
    ///
    /// The slot must be empty; installing over a running process would lose
    /// its registers.
    pub fn install(&mut self, pcb: &Pcb) {
        debug_assert!(
            self.running.is_none(),
            "installing process {} over running process {:?}",
            pcb.pid,
            self.running
        );
        self.running = Some(pcb.pid);
        self.program_counter = pcb.program_counter;
        self.value = pcb.value;
    }

    /// Copy the live registers into the PCB's saved fields
    pub fn save_into(&self, pcb: &mut Pcb) {
        pcb.program_counter = self.program_counter;
        pcb.value = self.value;
    }

    /// Empty the running slot, returning who held it
    pub fn release(&mut self) -> Option<Pid> {
        self.running.take()
    }
}
