use std::{thread, time::Duration};

/// Pacing policy applied between consecutive store writes and between
/// accumulation sub-batches. Injected so the policy is swappable and
/// tests can run unpaced.
pub trait Pacer {
    fn pause(&self);
}

/// Fixed-interval pacing backed by `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer {
    interval: Duration,
}

impl FixedPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Pacer for FixedPacer {
    fn pause(&self) {
        thread::sleep(self.interval);
    }
}

/// No-op pacing, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&self) {}
}
