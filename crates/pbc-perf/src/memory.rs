//! Memory snapshots.

use sysinfo::{Pid, System};

/// Source of memory usage readings, in bytes.
pub trait MemoryProbe {
    fn snapshot(&mut self) -> Option<u64>;
}

/// Reads the resident memory of the current process. Yields no reading when
/// the process cannot be inspected, so baselines only ever hold process
/// figures.
pub struct SysinfoProbe {
    system: System,
    pid: Option<Pid>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SysinfoProbe {
    fn snapshot(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system.process(pid).map(|process| process.memory())
    }
}
