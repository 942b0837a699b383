//! One-way boundary to background work.
//!
//! A job computes a value off the dispatch thread; the result is polled back
//! on the dispatch thread before it may touch any shared state. This is the
//! only place the manager uses real parallelism.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

pub struct BackgroundWorker<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T: Send + 'static> Default for BackgroundWorker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> BackgroundWorker<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let tx = self.tx.clone();
        thread::spawn(move || {
            // the receiver may already be gone during shutdown
            let _ = tx.send(job());
        });
    }

    /// A finished result, if any. Never blocks.
    pub fn poll(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub(crate) fn wait(&self) -> Option<T> {
        self.rx.recv_timeout(std::time::Duration::from_secs(5)).ok()
    }
}

impl<T> std::fmt::Debug for BackgroundWorker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundWorker").finish_non_exhaustive()
    }
}
