// Turnaround-time accounting

/// Running totals over terminated processes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    cumulative_turnaround: u64,
    terminated: usize,
}

impl Accounting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminated process that ran `turnaround` ticks
    pub fn record(&mut self, turnaround: u64) {
        self.cumulative_turnaround += turnaround;
        self.terminated += 1;
    }

    pub fn cumulative_turnaround(&self) -> u64 {
        self.cumulative_turnaround
    }

    pub fn terminated(&self) -> usize {
        self.terminated
    }

    /// Truncating mean turnaround, or `None` before anything has terminated
    pub fn average_turnaround(&self) -> Option<u64> {
        if self.terminated == 0 {
            None
        } else {
            Some(self.cumulative_turnaround / self.terminated as u64)
        }
    }

    /// Line printed by the Terminate command
    pub fn summary(&self) -> String {
        match self.average_turnaround() {
            Some(avg) => format!("Average turnaround time: {}", avg),
            None => "Average turnaround time: undefined (no processes terminated)".to_string(),
        }
    }
}
