// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BusyPolicy, Candidate, Decision, DecisionRecord, Offset, Phase, MAX_DRAG_OFFSET, RenderFrame, SwipeDirection, Transform, Viewport};
pub use requests::{CreateSessionRequest, MAX_BATCH_CANDIDATES, DecideRequest, GestureRequest, RefillRequest, TickRequest};
pub use responses::{DecisionsResponse, ErrorResponse, GestureResponse, GestureStatus, HealthResponse, RefillResponse, SessionResponse};
