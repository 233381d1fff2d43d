//! Lume Swipe - swipe interaction engine for the Lume dating app
//!
//! This library provides the gesture state machine behind the discovery deck:
//! drag tracking, derived visual signals, threshold decisions, and the
//! fly-off / spring-back animations that resolve them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ControllerSettings, Deck, SwipeController, SwipeError, SwipeObserver};
pub use models::{Candidate, Decision, Offset, Phase, RenderFrame, SwipeDirection, Viewport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let deck = Deck::new(vec![Candidate::new("1", "Sarah", 26, "", "")]);
        let controller = SwipeController::new(deck, Viewport::default(), ControllerSettings::default(), ()).unwrap();
        assert_eq!(controller.phase(), Phase::Idle);
    }
}
