// Constants for the process manager

/// Number of PCB slots; slots are never reused, so this bounds total forks
pub const DEFAULT_TABLE_CAPACITY: usize = 10;

/// Priorities run from 0 (highest) to PRIORITY_LEVELS - 1
pub const PRIORITY_LEVELS: u8 = 10;

/// Program loaded as process 0 at boot
pub const INIT_PROGRAM: &str = "init";
