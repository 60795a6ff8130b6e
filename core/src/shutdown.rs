//! Run-wide shutdown signal
//!
//! Shutdown is a level, not an event: once [`ShutdownHandle::shutdown`] has
//! been called, every current and future [`ShutdownSignal`] reports it,
//! including signals subscribed after the fact.

use std::sync::Arc;
use tokio::sync::watch;

/// Create a connected handle/signal pair, initially not shut down
pub fn channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

/// Triggers shutdown; cheap to clone and share with signal handlers or timers
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Request shutdown. Idempotent and never fails, even with no listeners.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// A new signal observing this handle
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observes a [`ShutdownHandle`]
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been requested (immediately if it already was)
    ///
    /// If every handle is dropped without requesting shutdown, this never
    /// resolves.
    pub async fn cancelled(&mut self) {
        let requested = self.rx.wait_for(|stopped| *stopped).await.is_ok();
        if !requested {
            std::future::pending::<()>().await;
        }
    }
}
