use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Candidate, SwipeDirection, Viewport};

/// Most candidates accepted in one create or refill request
pub const MAX_BATCH_CANDIDATES: usize = 500;

/// Request to open a new swipe session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(max = 500), nested)]
    pub candidates: Vec<Candidate>,
    #[validate(nested)]
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

/// Pointer offset for drag move and release events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct GestureRequest {
    #[validate(range(min = -100000.0, max = 100000.0))]
    pub dx: f64,
    #[serde(default)]
    #[validate(range(min = -100000.0, max = 100000.0))]
    pub dy: f64,
}

/// Programmatic accept/reject from an explicit button
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecideRequest {
    pub direction: SwipeDirection,
}

/// Advance the session's in-flight animation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct TickRequest {
    #[validate(range(max = 10000))]
    #[serde(alias = "elapsed_ms", rename = "elapsedMs")]
    pub elapsed_ms: u64,
}

/// Append candidates to a session deck
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefillRequest {
    #[validate(length(min = 1, max = 500), nested)]
    pub candidates: Vec<Candidate>,
}
