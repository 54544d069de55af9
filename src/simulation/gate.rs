//! Stop switch shared by the background loops
//!
//! A loop runs each unit of work through [`RunGate::run`]. Closing the gate
//! takes the same lock, so once `close` returns no work is in progress and
//! none will start.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub struct RunGate {
    open: Arc<Mutex<bool>>,
}

impl RunGate {
    pub fn new() -> Self {
        Self {
            open: Arc::new(Mutex::new(true)),
        }
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` if the gate is still open
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let open = self.state();
        if *open {
            Some(f())
        } else {
            None
        }
    }

    /// Close the gate, waiting for any run in progress
    pub fn close(&self) {
        *self.state() = false;
    }

    pub fn is_open(&self) -> bool {
        *self.state()
    }
}

impl Default for RunGate {
    fn default() -> Self {
        Self::new()
    }
}
