//! Post-start collision grace window
//!
//! Armed once when a run starts, then reports immune for a fixed wall-clock
//! duration. Nothing during the run re-arms it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImmunityGate {
    duration_ms: f64,
    /// Wall-clock instant the current run started
    armed_at: Option<f64>,
}

impl ImmunityGate {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now_ms: f64) {
        self.armed_at = Some(now_ms);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    /// True while less than `duration_ms` has elapsed since arming
    pub fn is_immune(&self, now_ms: f64) -> bool {
        match self.armed_at {
            Some(start) => now_ms - start < self.duration_ms,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_is_not_immune() {
        let gate = ImmunityGate::new(1500.0);
        assert!(!gate.is_immune(0.0));
    }

    #[test]
    fn test_window_expires() {
        let mut gate = ImmunityGate::new(1500.0);
        gate.arm(10_000.0);
        assert!(gate.is_immune(10_000.0));
        assert!(gate.is_immune(11_499.9));
        assert!(!gate.is_immune(11_500.0));
        assert!(!gate.is_immune(20_000.0));
    }

    #[test]
    fn test_rearm_restarts_window() {
        let mut gate = ImmunityGate::new(1500.0);
        gate.arm(0.0);
        assert!(!gate.is_immune(2000.0));
        gate.arm(2000.0);
        assert!(gate.is_immune(2000.0));
        gate.disarm();
        assert!(!gate.is_immune(2000.0));
    }
}
