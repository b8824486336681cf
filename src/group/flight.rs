//! Request Coalescing Module
//!
//! Collapses concurrent loads of the same key into one execution.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

type Calls<T> = HashMap<String, watch::Receiver<Option<T>>>;

enum Role<T> {
    Leader(watch::Sender<Option<T>>),
    Waiter(watch::Receiver<Option<T>>),
}

// == Flight ==
/// Per-key request coalescing.
///
/// The first caller for a key runs the load; callers arriving while it runs
/// wait for and share its result, errors included. The in-flight record is
/// dropped as soon as the result is published, so later calls load again.
/// Calls for different keys never wait on each other.
#[derive(Debug)]
pub struct Flight<T> {
    calls: Mutex<Calls<T>>,
}

impl<T> Default for Flight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> Flight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Run ==
    /// Runs `load` for `key` unless a load for it is already in flight, in
    /// which case that load's result is returned instead.
    ///
    /// If the running caller is cancelled before publishing, one of its
    /// waiters takes over and runs its own `load`.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        loop {
            let role = {
                let mut calls = self.lock_calls();
                match calls.get(key) {
                    Some(rx) => Role::Waiter(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        calls.insert(key.to_string(), rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let call = Call {
                        flight: self,
                        key,
                        tx,
                    };
                    let value = load().await;
                    call.tx.send_replace(Some(value.clone()));
                    return value;
                }
                Role::Waiter(mut rx) => {
                    if let Ok(shared) = rx.wait_for(Option::is_some).await {
                        if let Some(value) = (*shared).clone() {
                            return value;
                        }
                    }
                    debug!(key, "In-flight load abandoned, retrying");
                }
            }
        }
    }

    /// Number of keys with a load in flight.
    pub fn in_flight(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Calls<T>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Leader's claim on a key; releases the record when dropped, including on
/// cancellation. The sender is dropped after the record is gone, so woken
/// waiters never find a stale entry.
struct Call<'a, T: Clone> {
    flight: &'a Flight<T>,
    key: &'a str,
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Drop for Call<'_, T> {
    fn drop(&mut self) {
        self.flight.lock_calls().remove(self.key);
    }
}
