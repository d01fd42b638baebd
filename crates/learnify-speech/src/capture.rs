//! Speech-capture ports.
//!
//! Capture is push-model: the embedding application (or a test script)
//! receives recognizer output and feeds `CaptureEvent`s into the session.
//! The port itself only carries the control surface — supported/start/stop
//! — so the session can gate reading mode and restart a stream that ended
//! under it.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use learnify_core::error::CaptureError;
use learnify_core::session::SessionController;
use learnify_core::traits::{CaptureEvent, SpeechCapture};

/// Shared view into a capture port's control calls. Lets a test (or the
/// embedding app) observe starts, stops, and running state after the port
/// has been moved into the session.
#[derive(Debug, Default)]
pub struct CaptureProbe {
    starts: AtomicU32,
    stops: AtomicU32,
    running: AtomicBool,
}

impl CaptureProbe {
    pub fn start_count(&self) -> u32 {
        self.starts.load(Ordering::Relaxed)
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// A capture port whose transcript events are delivered by the embedding
/// application. Always supported.
pub struct ManualCapture {
    probe: Arc<CaptureProbe>,
}

impl ManualCapture {
    pub fn new() -> Self {
        Self {
            probe: Arc::new(CaptureProbe::default()),
        }
    }

    /// Grab a probe handle before moving the port into a session.
    pub fn probe(&self) -> Arc<CaptureProbe> {
        Arc::clone(&self.probe)
    }
}

impl Default for ManualCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechCapture for ManualCapture {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        self.probe.starts.fetch_add(1, Ordering::Relaxed);
        self.probe.running.store(true, Ordering::Relaxed);
        tracing::debug!("capture started");
        Ok(())
    }

    fn stop(&mut self) {
        self.probe.stops.fetch_add(1, Ordering::Relaxed);
        self.probe.running.store(false, Ordering::Relaxed);
        tracing::debug!("capture stopped");
    }
}

/// Stands in for a platform without speech recognition. Attaching it to a
/// session fails up front and disables reading practice.
pub struct UnsupportedCapture;

impl SpeechCapture for UnsupportedCapture {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn stop(&mut self) {}
}

/// Feed a scripted event sequence into a listening session, in order.
pub fn replay(session: &mut SessionController, events: impl IntoIterator<Item = CaptureEvent>) {
    for event in events {
        session.handle_capture_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_capture_tracks_control_calls() {
        let mut capture = ManualCapture::new();
        let probe = capture.probe();

        assert!(capture.is_supported());
        assert!(!probe.is_running());

        capture.start().unwrap();
        assert!(probe.is_running());
        assert_eq!(probe.start_count(), 1);

        capture.stop();
        assert!(!probe.is_running());
        assert_eq!(probe.stop_count(), 1);
    }

    #[test]
    fn unsupported_capture_refuses_to_start() {
        let mut capture = UnsupportedCapture;
        assert!(!capture.is_supported());
        assert!(matches!(capture.start(), Err(CaptureError::Unsupported)));
    }
}
