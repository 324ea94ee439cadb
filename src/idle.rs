// src/idle.rs

//! Idle timer: a debounced "nothing happened for a while" callback.
//!
//! - [`IdleTimer::start`] spawns a Tokio task holding a deadline.
//! - [`IdleTimer::pulse`] records activity and pushes the deadline out to
//!   `now + duration`.
//! - When the deadline passes without a pulse, the callback fires once if any
//!   activity was recorded since the previous firing, and the countdown is
//!   re-armed either way. A long quiet period therefore yields exactly one
//!   callback, not one per `duration`.
//!
//! Pulses and the firing decision share one mutex and the deadline is
//! re-checked under it, so a pulse that lands while the task is waking up
//! wins over the fire.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

#[derive(Debug)]
struct IdleState {
    deadline: Instant,
    active: bool,
}

#[derive(Debug)]
struct Shared {
    duration: Duration,
    state: Mutex<IdleState>,
    pulses: AtomicU64,
}

/// Roughly thirty years; stands in for durations `Instant` cannot represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + duration`, saturating at a far-future deadline.
fn deadline_after(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl Shared {
    /// Called when the sleeping task wakes up. Returns whether the idle
    /// callback should run.
    fn on_deadline(&self) -> Tick {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        if now < state.deadline {
            // A pulse moved the deadline while we slept.
            return Tick::Rearmed;
        }

        state.deadline = deadline_after(now, self.duration);
        if state.active {
            state.active = false;
            Tick::Fire
        } else {
            Tick::Quiet
        }
    }

    fn deadline(&self) -> Instant {
        match self.state.lock() {
            Ok(guard) => guard.deadline,
            Err(poisoned) => poisoned.into_inner().deadline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Fire,
    Quiet,
    Rearmed,
}

/// Handle to a running idle countdown.
///
/// Dropping the handle stops the countdown task.
pub struct IdleTimer {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for IdleTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleTimer")
            .field("duration", &self.shared.duration)
            .finish_non_exhaustive()
    }
}

impl IdleTimer {
    /// Start the countdown. Must be called from within a Tokio runtime.
    ///
    /// `on_idle` runs on the timer task, never concurrently with itself.
    pub fn start<F>(duration: Duration, on_idle: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            duration,
            state: Mutex::new(IdleState {
                deadline: deadline_after(Instant::now(), duration),
                active: false,
            }),
            pulses: AtomicU64::new(0),
        });

        let task_shared = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            loop {
                sleep_until(task_shared.deadline()).await;

                match task_shared.on_deadline() {
                    Tick::Fire => {
                        debug!("idle period elapsed after activity; firing");
                        on_idle();
                    }
                    Tick::Quiet => trace!("idle period elapsed without activity"),
                    Tick::Rearmed => {}
                }
            }
        });

        Self { shared, task }
    }

    /// Record activity and restart the countdown from now.
    pub fn pulse(&self) {
        let mut state = match self.shared.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.active = true;
        state.deadline = deadline_after(Instant::now(), self.shared.duration);
        self.shared.pulses.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of pulses recorded since the timer started.
    pub fn pulse_count(&self) -> u64 {
        self.shared.pulses.load(Ordering::Relaxed)
    }

    pub fn duration(&self) -> Duration {
        self.shared.duration
    }

    /// Stop the countdown task. Safe to call more than once.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
