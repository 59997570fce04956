use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter. A response is applied only if its ticket is still the
/// latest one issued; anything older is stale.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
