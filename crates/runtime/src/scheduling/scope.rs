use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Cancellation token shared by a controller and the deferred work it starts.
///
/// Clones observe the same flag. [`renew`](Self::renew) cancels the current
/// scope and replaces it with a fresh one, so work captured under the old
/// scope sees the cancellation while new work starts clean.
#[derive(Clone, Debug)]
pub struct CancellationScope {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancellationScope {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancels this scope and swaps in a new one.
    pub fn renew(&mut self) {
        self.cancel();
        *self = Self::new();
    }

    /// True when both handles share the same underlying token.
    pub fn same_scope(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}
