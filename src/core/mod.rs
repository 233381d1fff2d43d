// Core swipe engine exports
pub mod animation;
pub mod controller;
pub mod deck;
pub mod error;
pub mod interpolate;
pub mod signals;

pub use animation::{Animation, AnimationStep, Spring, SpringConfig, Timing};
pub use controller::{ControllerSettings, FnObserver, SwipeController, SwipeObserver};
pub use deck::{Deck, ExtendSummary};
pub use error::{Operation, SwipeError};
pub use interpolate::Interpolation;
pub use signals::{
    accept_opacity, next_item_opacity, next_item_scale, reject_opacity, rotation_degrees,
    SignalCurves, VisualSignals,
};
