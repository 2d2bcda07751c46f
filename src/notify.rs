use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// How long a toast stays up unless dismissed
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Info,
    Error,
}

/// A visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub variant: Variant,
    pub expires_at: Instant,
}

#[derive(Default)]
struct Slot {
    current: Option<Toast>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Single-slot notification area.
///
/// Showing a toast replaces the visible one and restarts the dismiss timer.
/// Each timer only clears the toast it was started for.
#[derive(Clone)]
pub struct Toaster {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self::with_duration(TOAST_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A poisoned slot still holds a usable toast
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show `message`, replacing anything on screen. Must be called inside a
    /// tokio runtime.
    pub fn show(&self, message: impl Into<String>, variant: Variant) {
        let expires_at = Instant::now() + self.duration;
        let mut slot = self.lock();

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        let message = message.into();
        debug!("Toast ({:?}): {}", variant, message);
        slot.current = Some(Toast {
            message,
            variant,
            expires_at,
        });

        let shared = Arc::clone(&self.slot);
        slot.timer = Some(tokio::spawn(async move {
            sleep_until(expires_at).await;
            let mut slot = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
    }

    /// Hide the current toast and cancel its timer. Safe to call repeatedly.
    pub fn dismiss(&self) {
        let mut slot = self.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.current = None;
    }

    pub fn current(&self) -> Option<Toast> {
        self.lock().current.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().current.is_some()
    }
}
