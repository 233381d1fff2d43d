use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::Settings;
use crate::core::{ControllerSettings, Deck, SwipeController, SwipeError};
use crate::models::{Candidate, Decision, RenderFrame, Viewport};
use crate::services::decisions::DecisionLog;
use crate::services::driver::{elapsed_since, FrameDriver};

/// Controller type hosted by a session
pub type SessionController = SwipeController<DecisionLog>;

/// Errors that can occur with session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Swipe(#[from] SwipeError),
}

/// One client's swipe deck and its controller
pub struct Session {
    controller: SessionController,
    last_event: Instant,
    realtime: bool,
    driven: bool,
}

impl Session {
    fn new(controller: SessionController, realtime: bool) -> Self {
        Self {
            controller,
            last_event: Instant::now(),
            realtime,
            driven: false,
        }
    }

    /// Advance any in-flight animation by the wall-clock time since the last event
    pub fn catch_up(&mut self) -> Option<Decision> {
        if self.realtime {
            self.advance_clock()
        } else {
            self.last_event = Instant::now();
            None
        }
    }

    pub(crate) fn advance_clock(&mut self) -> Option<Decision> {
        let elapsed = elapsed_since(self.last_event);
        self.last_event = Instant::now();
        self.controller.tick(elapsed)
    }

    /// Whether a background frame driver currently owns this session's animation
    pub fn is_driven(&self) -> bool {
        self.driven
    }

    pub(crate) fn release_driver(&mut self) {
        self.driven = false;
    }

    /// Advance any in-flight animation by an explicit amount
    pub fn tick(&mut self, elapsed: Duration) -> Option<Decision> {
        self.last_event = Instant::now();
        self.controller.tick(elapsed)
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    pub fn frame(&self) -> RenderFrame {
        self.controller.frame()
    }
}

/// Live swipe sessions keyed by id
///
/// Sessions idle for longer than the configured TTL are evicted.
#[derive(Clone)]
pub struct SessionStore {
    sessions: moka::future::Cache<Uuid, Arc<Mutex<Session>>>,
    controller_settings: ControllerSettings,
    default_viewport: Viewport,
    realtime: bool,
    driver: FrameDriver,
}

impl SessionStore {
    pub fn new(
        max_sessions: u64,
        idle_ttl: Duration,
        controller_settings: ControllerSettings,
        default_viewport: Viewport,
        realtime: bool,
    ) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(idle_ttl)
            .build();

        Self {
            sessions,
            controller_settings,
            default_viewport,
            realtime,
            driver: FrameDriver::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.sessions.max_sessions,
            Duration::from_secs(settings.sessions.idle_ttl_secs),
            settings.swipe.controller_settings(),
            settings.viewport.viewport(),
            settings.sessions.realtime_animation,
        )
        .with_driver(FrameDriver::from_settings(&settings.sessions))
    }

    /// Frame driver used for realtime sessions
    pub fn with_driver(mut self, driver: FrameDriver) -> Self {
        self.driver = driver;
        self
    }

    pub fn driver(&self) -> FrameDriver {
        self.driver
    }

    /// Hand a realtime session's in-flight animation to a background driver
    ///
    /// At most one driver task runs per session; it exits once nothing is in flight.
    pub fn drive(&self, handle: &Arc<Mutex<Session>>, session: &mut Session) {
        if !self.realtime || session.driven || session.controller.pending_decision().is_none() {
            return;
        }

        session.driven = true;
        let driver = self.driver;
        let handle = Arc::clone(handle);
        tokio::spawn(async move {
            if let Some(decision) = driver.drive_session(handle).await {
                tracing::debug!("Background driver settled {:?}", decision);
            }
        });
    }

    /// Open a session over a caller-supplied deck
    pub async fn create(
        &self,
        candidates: Vec<Candidate>,
        viewport: Option<Viewport>,
    ) -> Result<(Uuid, RenderFrame), SessionError> {
        let viewport = viewport.unwrap_or(self.default_viewport);
        let deck = Deck::new(candidates);
        let controller = SwipeController::new(deck, viewport, self.controller_settings, DecisionLog::new())?;
        let frame = controller.frame();

        let id = Uuid::new_v4();
        self.sessions
            .insert(id, Arc::new(Mutex::new(Session::new(controller, self.realtime))))
            .await;

        tracing::info!("Opened session {} with {} candidates", id, frame.remaining);
        Ok((id, frame))
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions.get(&id).await.ok_or(SessionError::NotFound(id))
    }

    /// Drop a session; returns whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).await.is_some();
        if removed {
            tracing::info!("Closed session {}", id);
        }
        removed
    }

    pub fn active_sessions(&self) -> u64 {
        self.sessions.entry_count()
    }
}
