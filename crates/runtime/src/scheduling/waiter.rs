use std::sync::Arc;

use tokio::sync::watch;

/// Handle a script runner blocks on until the movement it started is over.
///
/// Released exactly once, either when the path ends or when the request is
/// abandoned (no path found, interrupted by another command). Releasing an
/// already released waiter is a no-op.
#[derive(Clone, Debug)]
pub struct ScriptWaiter {
    released: Arc<watch::Sender<bool>>,
}

impl ScriptWaiter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            released: Arc::new(tx),
        }
    }

    pub fn release(&self) {
        self.released.send_if_modified(|released| !std::mem::replace(released, true));
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    /// Resolves once [`release`](Self::release) has been called.
    pub async fn wait(&self) {
        let mut rx = self.released.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|released| *released).await;
    }
}

impl Default for ScriptWaiter {
    fn default() -> Self {
        Self::new()
    }
}
