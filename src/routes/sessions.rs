use actix_web::{web, HttpResponse, Responder};
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

use crate::core::SwipeError;
use crate::models::{
    CreateSessionRequest, DecideRequest, Decision, DecisionsResponse, ErrorResponse, GestureRequest,
    GestureResponse, GestureStatus, HealthResponse, RefillRequest, RefillResponse, SessionResponse,
    TickRequest,
};
use crate::services::{Session, SessionError, SessionStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
}

/// Configure all session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{id}", web::get().to(get_session))
        .route("/sessions/{id}", web::delete().to(delete_session))
        .route("/sessions/{id}/drag/start", web::post().to(begin_drag))
        .route("/sessions/{id}/drag/move", web::post().to(update_drag))
        .route("/sessions/{id}/drag/end", web::post().to(end_drag))
        .route("/sessions/{id}/decide", web::post().to(force_decide))
        .route("/sessions/{id}/tick", web::post().to(tick))
        .route("/sessions/{id}/candidates", web::post().to(refill))
        .route("/sessions/{id}/decisions", web::get().to(get_decisions));
}

fn error_body(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn session_error(err: &SessionError) -> HttpResponse {
    use actix_web::http::StatusCode;

    match err {
        SessionError::NotFound(_) => error_body(StatusCode::NOT_FOUND, "Session not found", err.to_string()),
        SessionError::Swipe(SwipeError::InvalidViewport { .. }) => {
            error_body(StatusCode::BAD_REQUEST, "Invalid viewport", err.to_string())
        }
        SessionError::Swipe(_) => error_body(StatusCode::CONFLICT, "Invalid state transition", err.to_string()),
    }
}

/// Map a controller result onto the gesture response
///
/// An empty deck is the normal end of a session, not an error. `settled` is a
/// decision that the wall-clock catch-up committed during this same request.
fn gesture_response(
    session: &Session,
    settled: Option<Decision>,
    result: Result<Option<Decision>, SwipeError>,
) -> HttpResponse {
    match result {
        Ok(decision) => HttpResponse::Ok().json(GestureResponse {
            status: GestureStatus::Ok,
            decision: decision.or(settled),
            frame: session.frame(),
        }),
        Err(SwipeError::EmptyDeck) => HttpResponse::Ok().json(GestureResponse {
            status: GestureStatus::EmptyDeck,
            decision: settled,
            frame: session.frame(),
        }),
        Err(e) => session_error(&SessionError::Swipe(e)),
    }
}

/// Look up a session, catch its animation up, and run one operation on it
async fn with_session<F>(state: &AppState, id: Uuid, op: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> Result<Option<Decision>, SwipeError>,
{
    let handle = match state.sessions.get(id).await {
        Ok(handle) => handle,
        Err(e) => return session_error(&e),
    };

    let mut session = handle.lock().await;
    let settled = session.catch_up();
    if let Some(decision) = settled {
        tracing::debug!("Session {} settled {:?} before the next event", id, decision);
    }

    let result = op(&mut *session);
    state.sessions.drive(&handle, &mut *session);
    gesture_response(&*session, settled, result)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.active_sessions(),
        timestamp: chrono::Utc::now(),
    })
}

/// Open a session
///
/// POST /api/v1/sessions
///
/// Request body:
/// ```json
/// {
///   "candidates": [{"id": "1", "name": "Sarah", "age": 26, "image": "...", "bio": "..."}],
///   "viewport": {"width": 390, "height": 844}
/// }
/// ```
async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<CreateSessionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_session request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    match state.sessions.create(req.candidates, req.viewport).await {
        Ok((session_id, frame)) => HttpResponse::Created().json(SessionResponse { session_id, frame }),
        Err(e) => session_error(&e),
    }
}

async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let session = match state.sessions.get(id).await {
        Ok(session) => session,
        Err(e) => return session_error(&e),
    };

    let mut session = session.lock().await;
    session.catch_up();
    HttpResponse::Ok().json(SessionResponse {
        session_id: id,
        frame: session.frame(),
    })
}

async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    if state.sessions.remove(id).await {
        HttpResponse::NoContent().finish()
    } else {
        session_error(&SessionError::NotFound(id))
    }
}

/// POST /api/v1/sessions/{id}/drag/start
async fn begin_drag(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    with_session(&state, path.into_inner(), |session| {
        session.controller_mut().begin_drag().map(|_| None)
    })
    .await
}

/// POST /api/v1/sessions/{id}/drag/move
async fn update_drag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<GestureRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    with_session(&state, path.into_inner(), |session| {
        session.controller_mut().update_drag(req.dx, req.dy).map(|_| None)
    })
    .await
}

/// POST /api/v1/sessions/{id}/drag/end
async fn end_drag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<GestureRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    with_session(&state, path.into_inner(), |session| {
        session.controller_mut().end_drag(req.dx, req.dy).map(Some)
    })
    .await
}

/// POST /api/v1/sessions/{id}/decide
async fn force_decide(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<DecideRequest>,
) -> impl Responder {
    with_session(&state, path.into_inner(), |session| {
        session.controller_mut().force_decide(req.direction).map(Some)
    })
    .await
}

/// POST /api/v1/sessions/{id}/tick
async fn tick(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<TickRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let elapsed = Duration::from_millis(req.elapsed_ms);
    with_session(&state, path.into_inner(), |session| Ok(session.tick(elapsed))).await
}

/// POST /api/v1/sessions/{id}/candidates
async fn refill(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<RefillRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let id = path.into_inner();
    let session = match state.sessions.get(id).await {
        Ok(session) => session,
        Err(e) => return session_error(&e),
    };

    let mut session = session.lock().await;
    session.catch_up();
    let summary = session.controller_mut().refill(req.into_inner().candidates);
    tracing::info!("Session {} refilled: {} added, {} skipped", id, summary.added, summary.skipped);

    HttpResponse::Ok().json(RefillResponse {
        added: summary.added,
        skipped: summary.skipped,
        frame: session.frame(),
    })
}

/// GET /api/v1/sessions/{id}/decisions
async fn get_decisions(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let session = match state.sessions.get(id).await {
        Ok(session) => session,
        Err(e) => return session_error(&e),
    };

    let mut session = session.lock().await;
    session.catch_up();
    HttpResponse::Ok().json(DecisionsResponse {
        session_id: id,
        decisions: session.controller().observer().records().to_vec(),
    })
}
