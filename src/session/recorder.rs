//! Video recorder boundary
//!
//! The coordinator only ever talks to a [`Recorder`]. Finished recordings
//! arrive later through `SessionCoordinator::on_recording_finished`, since
//! flushing a video file is asynchronous on every platform we target.
//!
//! [`QueuedRecorder`] adapts a raw [`CaptureDevice`] that needs a warm-up
//! before it can record: a start requested too early is queued and issued
//! once the device reports ready.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque reference to a finished recording (usually a file URI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingHandle(String);

impl RecordingHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

/// Recorder failure. Never fatal to a round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("camera or microphone permission denied")]
    PermissionDenied,
    #[error("capture device failed: {0}")]
    Device(String),
}

/// Start/stop capture for a session
pub trait Recorder {
    /// Begin capture. Duplicate starts are ignored by the implementation.
    fn start_recording(&mut self) -> Result<(), RecorderError>;

    /// End capture. Returns the handle if it is available right away;
    /// `Ok(None)` means either nothing was recording or the handle will be
    /// delivered through the completion callback.
    fn stop_recording(&mut self) -> Result<Option<RecordingHandle>, RecorderError>;
}

/// Recorder used when video is switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecorder;

impl Recorder for NoRecorder {
    fn start_recording(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }

    fn stop_recording(&mut self) -> Result<Option<RecordingHandle>, RecorderError> {
        Ok(None)
    }
}

/// Raw camera primitive
pub trait CaptureDevice {
    fn begin_capture(&mut self) -> Result<(), RecorderError>;
    fn end_capture(&mut self) -> Result<(), RecorderError>;
}

/// Recorder over a capture device with a readiness signal
#[derive(Debug)]
pub struct QueuedRecorder<D: CaptureDevice> {
    device: D,
    ready: bool,
    recording: bool,
    pending_start: bool,
}

impl<D: CaptureDevice> QueuedRecorder<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            ready: false,
            recording: false,
            pending_start: false,
        }
    }

    /// The device finished warming up. Issues a queued start, if any.
    pub fn on_ready(&mut self) -> Result<(), RecorderError> {
        self.ready = true;
        if self.pending_start {
            self.pending_start = false;
            log::info!("Capture device ready, starting queued recording");
            self.begin()?;
        }
        Ok(())
    }

    /// The device stopped on its own (max duration, interruption)
    pub fn on_capture_ended(&mut self) {
        self.recording = false;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn has_pending_start(&self) -> bool {
        self.pending_start
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    fn begin(&mut self) -> Result<(), RecorderError> {
        self.recording = true;
        if let Err(e) = self.device.begin_capture() {
            self.recording = false;
            return Err(e);
        }
        Ok(())
    }
}

impl<D: CaptureDevice> Recorder for QueuedRecorder<D> {
    fn start_recording(&mut self) -> Result<(), RecorderError> {
        if self.recording {
            log::debug!("Recording already in progress, ignoring start");
            return Ok(());
        }
        if !self.ready {
            log::info!("Capture device not ready, queuing start");
            self.pending_start = true;
            return Ok(());
        }
        self.begin()
    }

    fn stop_recording(&mut self) -> Result<Option<RecordingHandle>, RecorderError> {
        self.pending_start = false;
        if self.recording {
            self.recording = false;
            self.device.end_capture()?;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeCamera {
        begins: u32,
        ends: u32,
        fail_begin: bool,
    }

    impl CaptureDevice for FakeCamera {
        fn begin_capture(&mut self) -> Result<(), RecorderError> {
            if self.fail_begin {
                return Err(RecorderError::Device("busy".into()));
            }
            self.begins += 1;
            Ok(())
        }

        fn end_capture(&mut self) -> Result<(), RecorderError> {
            self.ends += 1;
            Ok(())
        }
    }

    #[test]
    fn test_start_before_ready_is_queued() {
        let mut recorder = QueuedRecorder::new(FakeCamera::default());
        recorder.start_recording().unwrap();
        assert!(recorder.has_pending_start());
        assert_eq!(recorder.device().begins, 0);

        recorder.on_ready().unwrap();
        assert!(recorder.is_recording());
        assert!(!recorder.has_pending_start());
        assert_eq!(recorder.device().begins, 1);
    }

    #[test]
    fn test_stop_cancels_pending_start() {
        let mut recorder = QueuedRecorder::new(FakeCamera::default());
        recorder.start_recording().unwrap();
        assert_eq!(recorder.stop_recording(), Ok(None));

        recorder.on_ready().unwrap();
        assert!(!recorder.is_recording());
        assert_eq!(recorder.device().begins, 0);
        assert_eq!(recorder.device().ends, 0);
    }

    #[test]
    fn test_duplicate_start_ignored() {
        let mut recorder = QueuedRecorder::new(FakeCamera::default());
        recorder.on_ready().unwrap();
        recorder.start_recording().unwrap();
        recorder.start_recording().unwrap();
        assert_eq!(recorder.device().begins, 1);

        recorder.stop_recording().unwrap();
        recorder.stop_recording().unwrap();
        assert_eq!(recorder.device().ends, 1);
    }

    #[test]
    fn test_failed_begin_leaves_idle() {
        let mut recorder = QueuedRecorder::new(FakeCamera {
            fail_begin: true,
            ..Default::default()
        });
        recorder.on_ready().unwrap();
        assert!(recorder.start_recording().is_err());
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_capture_ended_on_its_own() {
        let mut recorder = QueuedRecorder::new(FakeCamera::default());
        recorder.on_ready().unwrap();
        recorder.start_recording().unwrap();
        recorder.on_capture_ended();
        recorder.stop_recording().unwrap();
        assert_eq!(recorder.device().ends, 0);
    }
}
