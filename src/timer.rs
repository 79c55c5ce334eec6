//! One-shot refresh timer on top of `embassy-time`.

use embassy_time::{Duration, Instant, Timer};
use temp_beacon::{TimerHandle, TimerService};

pub struct RefreshTimer {
    deadline: Option<Instant>,
    next: u16,
}

impl RefreshTimer {
    pub const fn new() -> Self {
        Self {
            deadline: None,
            next: 0,
        }
    }

    /// Resolve when the armed timer expires; never resolves if none is armed.
    ///
    /// The deadline is consumed only on expiry, so dropping this future
    /// leaves the timer armed.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                Timer::at(deadline).await;
                self.deadline = None;
            }
            None => core::future::pending().await,
        }
    }
}

impl TimerService for RefreshTimer {
    fn arm(&mut self, delay_ms: u32) -> TimerHandle {
        self.deadline = Some(Instant::now() + Duration::from_millis(delay_ms as u64));
        self.next = self.next.wrapping_add(1);
        TimerHandle(self.next)
    }
}
