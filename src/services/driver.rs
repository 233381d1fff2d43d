use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::SessionSettings;
use crate::core::{SwipeController, SwipeObserver};
use crate::models::Decision;
use crate::services::sessions::Session;

/// Drives a controller's in-flight animation on a fixed frame interval
#[derive(Debug, Clone, Copy)]
pub struct FrameDriver {
    frame: Duration,
}

impl FrameDriver {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame: frame.max(Duration::from_millis(1)),
        }
    }

    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::new(Duration::from_millis(settings.frame_interval_ms))
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Tick until the in-flight animation settles
    ///
    /// Returns the settled decision, or `None` if nothing was in flight.
    pub async fn run<O: SwipeObserver>(&self, controller: &mut SwipeController<O>) -> Option<Decision> {
        if controller.pending_decision().is_none() {
            return None;
        }

        let mut interval = tokio::time::interval(self.frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately
        let mut last = interval.tick().await;

        loop {
            let now = interval.tick().await;
            let elapsed = now.saturating_duration_since(last);
            last = now;

            if let Some(decision) = controller.tick(elapsed) {
                tracing::debug!("Animation settled as {:?}", decision);
                return Some(decision);
            }
            if controller.pending_decision().is_none() {
                return None;
            }
        }
    }
}

impl FrameDriver {
    /// Keep a shared session's animation in step with the wall clock until it settles
    ///
    /// The lock is held only for one frame's work at a time, so requests can
    /// interleave with the driver.
    pub async fn drive_session(&self, handle: Arc<Mutex<Session>>) -> Option<Decision> {
        let mut interval = tokio::time::interval(self.frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            interval.tick().await;

            let mut session = handle.lock().await;
            let settled = session.advance_clock();
            if settled.is_some() || session.controller().pending_decision().is_none() {
                session.release_driver();
                return settled;
            }
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

/// Wall-clock time since `since`, as the session host measures it
pub(crate) fn elapsed_since(since: Instant) -> Duration {
    Instant::now().saturating_duration_since(since)
}
