//! Round countdown timer
//!
//! Counts whole seconds down to zero. Ticks are scheduled as absolute
//! deadlines and processed by `poll`, so a stopped timer simply has no
//! deadline left to fire.
//!
//! Expiry is reported twice over: as `TimerEvent::Expired` from `poll`, and
//! through the optional `set_on_expire` handler. The session coordinator
//! reads the events and installs no handler. The handler slot is for hosts
//! that drive a bare timer and only care about the end of the countdown.

use std::fmt;

use crate::consts::TIMER_TICK_MS;

/// Something that happened while polling the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed
    Tick { time_left: u32 },
    /// The countdown reached zero (fires once per start)
    Expired,
}

/// Countdown clock with a replaceable expiry handler
pub struct RoundTimer {
    time_left: u32,
    /// Deadline of the next tick; `None` while stopped
    next_tick_at: Option<u64>,
    on_expire: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for RoundTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundTimer")
            .field("time_left", &self.time_left)
            .field("next_tick_at", &self.next_tick_at)
            .field("has_on_expire", &self.on_expire.is_some())
            .finish()
    }
}

impl RoundTimer {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            time_left: initial_secs,
            next_tick_at: None,
            on_expire: None,
        }
    }

    /// Install the expiry handler, replacing any previous one. The handler
    /// is looked up when the timer fires, so the latest one always wins.
    pub fn set_on_expire(&mut self, handler: impl FnMut() + 'static) {
        self.on_expire = Some(Box::new(handler));
    }

    pub fn clear_on_expire(&mut self) {
        self.on_expire = None;
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.next_tick_at.is_some()
    }

    /// Begin counting from `now_ms`. No-op if already running or at zero.
    pub fn start(&mut self, now_ms: u64) {
        if self.is_running() || self.time_left == 0 {
            return;
        }
        self.next_tick_at = Some(now_ms + TIMER_TICK_MS);
    }

    /// Halt and drop the pending tick
    pub fn stop(&mut self) {
        self.next_tick_at = None;
    }

    /// Stop and rewind to `initial_secs`
    pub fn reset(&mut self, initial_secs: u32) {
        self.stop();
        self.time_left = initial_secs;
    }

    /// Fire every tick due at `now_ms`, in order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        while let Some(deadline) = self.next_tick_at {
            if now_ms < deadline {
                break;
            }

            self.time_left = self.time_left.saturating_sub(1);
            events.push(TimerEvent::Tick {
                time_left: self.time_left,
            });

            if self.time_left == 0 {
                self.stop();
                if let Some(handler) = self.on_expire.as_mut() {
                    handler();
                }
                events.push(TimerEvent::Expired);
            } else {
                self.next_tick_at = Some(deadline + TIMER_TICK_MS);
            }
        }

        events
    }
}
