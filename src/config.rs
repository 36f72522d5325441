use crate::domain::planner::CapacityCheck;

/// Runtime settings for the withdrawal engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtmConfig {
    /// How the machine total is computed before a dispense plan is attempted.
    pub capacity_check: CapacityCheck,
}

impl AtmConfig {
    pub fn with_capacity_check(mut self, capacity_check: CapacityCheck) -> Self {
        self.capacity_check = capacity_check;
        self
    }
}
