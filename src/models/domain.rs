use serde::{Deserialize, Serialize};
use validator::Validate;

/// A profile card eligible for an accept/reject decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Candidate {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 18, max = 120))]
    pub age: u8,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u8,
        image: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            image: image.into(),
            bio: bio.into(),
        }
    }
}

/// Resolved outcome of one gesture cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
    Cancelled,
}

impl Decision {
    /// Whether this decision removes the front candidate from the deck
    pub fn is_commit(self) -> bool {
        !matches!(self, Decision::Cancelled)
    }

    /// Fly-off direction of a committed decision
    pub fn direction(self) -> Option<SwipeDirection> {
        match self {
            Decision::Accepted => Some(SwipeDirection::Right),
            Decision::Rejected => Some(SwipeDirection::Left),
            Decision::Cancelled => None,
        }
    }
}

/// Horizontal direction of a committed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn decision(self) -> Decision {
        match self {
            SwipeDirection::Right => Decision::Accepted,
            SwipeDirection::Left => Decision::Rejected,
        }
    }

    /// +1.0 for right, -1.0 for left
    pub fn sign(self) -> f64 {
        match self {
            SwipeDirection::Right => 1.0,
            SwipeDirection::Left => -1.0,
        }
    }
}

/// Largest drag distance the controller tracks on either axis
pub const MAX_DRAG_OFFSET: f64 = 100_000.0;

/// Drag offset relative to the gesture origin, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Pointer input made safe to animate: NaN reads as rest and each axis
    /// is clamped to [`MAX_DRAG_OFFSET`]
    pub fn sanitized(dx: f64, dy: f64) -> Self {
        let axis = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(-MAX_DRAG_OFFSET, MAX_DRAG_OFFSET)
            }
        };
        Self::new(axis(dx), axis(dy))
    }
}

/// Viewport dimensions that parameterize thresholds and interpolation domains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Viewport {
    #[validate(range(min = 1.0, max = 100000.0))]
    pub width: f64,
    #[validate(range(min = 1.0, max = 100000.0))]
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    #[inline]
    pub fn quarter_width(&self) -> f64 {
        self.width / 4.0
    }

    /// Horizontal commit threshold for a fraction of the viewport width
    #[inline]
    pub fn threshold(&self, fraction: f64) -> f64 {
        self.width * fraction
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

/// Phase of the swipe state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Dragging,
    Resolving,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Dragging => "dragging",
            Phase::Resolving => "resolving",
        };
        f.write_str(name)
    }
}

/// What to do with input that arrives while a committed card is still flying off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Reject the input; the fly-off finishes undisturbed
    #[default]
    Ignore,
    /// Commit the in-flight decision immediately, then handle the input
    ForceComplete,
}

/// A committed decision as recorded by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "candidateName")]
    pub candidate_name: String,
    pub decision: Decision,
    #[serde(rename = "decidedAt")]
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// Card transform applied to the front candidate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    #[serde(rename = "translateX")]
    pub translate_x: f64,
    #[serde(rename = "translateY")]
    pub translate_y: f64,
    #[serde(rename = "rotationDegrees")]
    pub rotation_degrees: f64,
}

/// Everything a presentation layer needs to draw the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub front: Option<Candidate>,
    pub next: Option<Candidate>,
    pub transform: Transform,
    #[serde(rename = "acceptOpacity")]
    pub accept_opacity: f64,
    #[serde(rename = "rejectOpacity")]
    pub reject_opacity: f64,
    #[serde(rename = "nextOpacity")]
    pub next_opacity: f64,
    #[serde(rename = "nextScale")]
    pub next_scale: f64,
    pub phase: Phase,
    pub remaining: usize,
    pub exhausted: bool,
}
