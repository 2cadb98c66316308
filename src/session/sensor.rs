//! Accelerometer feed boundary
//!
//! Samples are pushed into the coordinator by whoever owns the platform
//! sensor; this trait only controls the subscription.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("accelerometer not available on this device")]
    Unavailable,
    #[error("motion sensor permission denied")]
    PermissionDenied,
}

pub trait SensorFeed {
    /// Start delivering samples every `interval_ms`
    fn subscribe(&mut self, interval_ms: u32) -> Result<(), SensorError>;
    /// Stop delivering samples. Safe to call when not subscribed.
    fn unsubscribe(&mut self);
}

/// Feed for hosts that push samples without a subscription step
#[derive(Debug, Clone, Default)]
pub struct PushFeed {
    interval_ms: Option<u32>,
}

impl PushFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested cadence while subscribed
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    pub fn is_subscribed(&self) -> bool {
        self.interval_ms.is_some()
    }
}

impl SensorFeed for PushFeed {
    fn subscribe(&mut self, interval_ms: u32) -> Result<(), SensorError> {
        self.interval_ms = Some(interval_ms);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.interval_ms = None;
    }
}
