use serde::{Deserialize, Serialize};
use crate::models::domain::{Decision, DecisionRecord, RenderFrame};

/// Response for session creation and lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: uuid::Uuid,
    pub frame: RenderFrame,
}

/// Outcome of a gesture, decide or tick call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureResponse {
    pub status: GestureStatus,
    pub decision: Option<Decision>,
    pub frame: RenderFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureStatus {
    Ok,
    EmptyDeck,
}

/// Response for a deck refill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefillResponse {
    pub added: usize,
    pub skipped: usize,
    pub frame: RenderFrame,
}

/// Decisions committed within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionsResponse {
    #[serde(rename = "sessionId")]
    pub session_id: uuid::Uuid,
    pub decisions: Vec<DecisionRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "activeSessions")]
    pub active_sessions: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
