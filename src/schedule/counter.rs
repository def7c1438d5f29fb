use std::sync::atomic::{AtomicUsize, Ordering};

/// Work counter shared by the workers of one dynamic pass.
#[derive(Debug, Default)]
pub struct SharedCounter {
    next: AtomicUsize,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next unit index.
    /// No two callers ever observe the same value.
    pub fn claim(&self) -> usize {
        // Only atomicity matters here, the frame writes carry no dependency on
        // the counter.
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of claims made so far, including the ones past the end.
    pub fn claimed(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}
