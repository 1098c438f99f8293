//! In-flight tracking and drain-on-close shutdown.
//!
//! The pending count and the input-closed flag live behind one lock, and the
//! termination check runs inside that same critical section both when an
//! operation finishes and when input closes. Whichever happens last flips
//! the drained signal, exactly once.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

/// Coarse lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input still open.
    Running,
    /// Input closed, operations still in flight.
    Draining,
    /// Input closed and nothing in flight.
    Done,
}

#[derive(Debug, Default)]
struct State {
    pending: usize,
    input_closed: bool,
}

impl State {
    const fn phase(&self) -> Phase {
        match (self.input_closed, self.pending) {
            (false, _) => Phase::Running,
            (true, 0) => Phase::Done,
            (true, _) => Phase::Draining,
        }
    }
}

/// Shared coordinator for relay operations.
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<State>,
    drained_tx: watch::Sender<bool>,
}

impl Lifecycle {
    pub fn new() -> Arc<Self> {
        let (drained_tx, _) = watch::channel(false);
        Arc::new(Self {
            state: Mutex::new(State::default()),
            drained_tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a relay operation. It counts as pending until the returned
    /// guard is dropped.
    pub fn begin(self: &Arc<Self>) -> InFlight {
        self.lock().pending += 1;
        InFlight {
            lifecycle: Arc::clone(self),
        }
    }

    /// Mark the input stream as closed.
    pub fn close_input(&self) {
        let mut state = self.lock();
        state.input_closed = true;
        debug!(pending = state.pending, "Input closed");
        self.settle(&state);
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.pending = state.pending.saturating_sub(1);
        self.settle(&state);
    }

    fn settle(&self, state: &State) {
        if state.phase() != Phase::Done {
            return;
        }
        let first = self.drained_tx.send_if_modified(|drained| {
            let first = !*drained;
            *drained = true;
            first
        });
        if first {
            debug!("All relay operations drained");
        }
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Resolves once input is closed and every operation has completed.
    pub async fn drained(&self) {
        let mut rx = self.drained_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|drained| *drained).await;
    }
}

/// Guard for one in-flight relay operation.
#[derive(Debug)]
pub struct InFlight {
    lifecycle: Arc<Lifecycle>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.lifecycle.finish();
    }
}
