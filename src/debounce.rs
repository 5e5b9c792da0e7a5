//! Debounced fetch trigger.
//!
//! [`DebounceState`] is the bare state machine (Idle / Pending with a
//! deadline). [`Debouncer`] runs it on a tokio task: values sent with
//! [`Debouncer::push`] re-arm the timer, and only the latest value is handed
//! to the dispatch function once the window passes without changes.
//!
//! Dispatches are spawned and never cancelled. If two fetches overlap,
//! whichever finishes last is what the caller ends up with.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { deadline: Instant, generation: u64 },
}

/// Timer bookkeeping for one debounced input
#[derive(Debug, Clone)]
pub struct DebounceMachine {
    window: Duration,
    state: DebounceState,
    generation: u64,
}

impl DebounceMachine {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline, .. } => Some(deadline),
        }
    }

    /// Input changed at `now`: arm the timer, or push it back if armed
    pub fn on_change(&mut self, now: Instant) {
        self.generation += 1;
        self.state = DebounceState::Pending {
            deadline: now + self.window,
            generation: self.generation,
        };
    }

    /// Timer check at `now`. Returns the generation to dispatch once the
    /// deadline has passed, and goes back to Idle.
    pub fn on_timer(&mut self, now: Instant) -> Option<u64> {
        match self.state {
            DebounceState::Pending {
                deadline,
                generation,
            } if now >= deadline => {
                self.state = DebounceState::Idle;
                Some(generation)
            }
            _ => None,
        }
    }
}

/// Handle to a running debounce task
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the debounce task; `dispatch` runs on its own task per firing
    pub fn spawn<F, Fut>(window: Duration, mut dispatch: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let handle = tokio::spawn(async move {
            let mut machine = DebounceMachine::new(window);
            let mut latest: Option<T> = None;

            loop {
                let Some(deadline) = machine.deadline() else {
                    match rx.recv().await {
                        Some(value) => {
                            latest = Some(value);
                            machine.on_change(Instant::now());
                            continue;
                        }
                        None => break,
                    }
                };

                tokio::select! {
                    received = rx.recv() => match received {
                        Some(value) => {
                            latest = Some(value);
                            machine.on_change(Instant::now());
                        }
                        None => break,
                    },
                    _ = tokio::time::sleep_until(deadline) => {
                        if let Some(generation) = machine.on_timer(Instant::now()) {
                            if let Some(value) = latest.take() {
                                debug!("Debounce window elapsed, dispatching generation {}", generation);
                                tokio::spawn(dispatch(value));
                            }
                        }
                    }
                }
            }

            if latest.is_some() {
                debug!("Debouncer closed with a pending change; dropping it");
            }
        });

        Self { tx, handle }
    }

    /// Record a change. Returns `false` once the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
