// memory.rs

/// Single memory slot. Lives as long as the process; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Memory {
    value: f64,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn clear(&mut self) {
        self.value = 0.0;
    }
    pub fn recall(&self) -> f64 {
        self.value
    }
    /// Sums that leave the finite range are dropped.
    pub fn add(&mut self, value: f64) {
        self.store(self.value + value);
    }
    pub fn subtract(&mut self, value: f64) {
        self.store(self.value - value);
    }
    fn store(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value;
        }
    }
    /// Whether the `M` indicator should be shown.
    pub fn is_set(&self) -> bool {
        self.value != 0.0
    }
}
