use serde::{Deserialize, Serialize};

use crate::core::error::SwipeError;
use crate::core::interpolate::Interpolation;
use crate::models::{Transform, Viewport, Offset};

/// Tilt of the front card at half a viewport width of travel
pub const MAX_ROTATION_DEGREES: f64 = 10.0;

/// Opacity of the second card while the front card is at rest
pub const NEXT_ITEM_REST_OPACITY: f64 = 0.5;

/// Scale of the second card while the front card is at rest
pub const NEXT_ITEM_REST_SCALE: f64 = 0.9;

/// Visual feedback derived from the current drag offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualSignals {
    pub transform: Transform,
    pub accept_opacity: f64,
    pub reject_opacity: f64,
    pub next_opacity: f64,
    pub next_scale: f64,
}

impl VisualSignals {
    /// Signals for a card at rest
    pub fn at_rest() -> Self {
        Self {
            transform: Transform::default(),
            accept_opacity: 0.0,
            reject_opacity: 0.0,
            next_opacity: NEXT_ITEM_REST_OPACITY,
            next_scale: NEXT_ITEM_REST_SCALE,
        }
    }
}

/// Interpolation curves for one viewport
///
/// All curves are functions of the horizontal offset only:
/// - rotation:      [-w/2, 0, w/2] -> [-max, 0, max]
/// - accept:        [0, w/4]       -> [0, 1]
/// - reject:        [-w/4, 0]      -> [1, 0]
/// - next opacity:  [-w/2, 0, w/2] -> [1, 0.5, 1]
/// - next scale:    [-w/2, 0, w/2] -> [1, 0.9, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalCurves {
    rotation: Interpolation<3>,
    accept: Interpolation<2>,
    reject: Interpolation<2>,
    next_opacity: Interpolation<3>,
    next_scale: Interpolation<3>,
}

impl SignalCurves {
    pub fn new(viewport: &Viewport, max_rotation_degrees: f64) -> Result<Self, SwipeError> {
        let invalid = || SwipeError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        };

        if !(viewport.width > 0.0 && viewport.height > 0.0) || !max_rotation_degrees.is_finite() {
            return Err(invalid());
        }

        let half = viewport.half_width();
        let quarter = viewport.quarter_width();

        Ok(Self {
            rotation: Interpolation::new(
                [-half, 0.0, half],
                [-max_rotation_degrees, 0.0, max_rotation_degrees],
            )
            .ok_or_else(invalid)?,
            accept: Interpolation::new([0.0, quarter], [0.0, 1.0]).ok_or_else(invalid)?,
            reject: Interpolation::new([-quarter, 0.0], [1.0, 0.0]).ok_or_else(invalid)?,
            next_opacity: Interpolation::new(
                [-half, 0.0, half],
                [1.0, NEXT_ITEM_REST_OPACITY, 1.0],
            )
            .ok_or_else(invalid)?,
            next_scale: Interpolation::new(
                [-half, 0.0, half],
                [1.0, NEXT_ITEM_REST_SCALE, 1.0],
            )
            .ok_or_else(invalid)?,
        })
    }

    #[inline]
    pub fn rotation_degrees(&self, dx: f64) -> f64 {
        self.rotation.at(dx)
    }

    #[inline]
    pub fn accept_opacity(&self, dx: f64) -> f64 {
        self.accept.at(dx)
    }

    #[inline]
    pub fn reject_opacity(&self, dx: f64) -> f64 {
        self.reject.at(dx)
    }

    #[inline]
    pub fn next_item_opacity(&self, dx: f64) -> f64 {
        self.next_opacity.at(dx)
    }

    #[inline]
    pub fn next_item_scale(&self, dx: f64) -> f64 {
        self.next_scale.at(dx)
    }

    /// Derive every signal for an offset
    pub fn derive(&self, offset: Offset) -> VisualSignals {
        VisualSignals {
            transform: Transform {
                translate_x: offset.dx,
                translate_y: offset.dy,
                rotation_degrees: self.rotation_degrees(offset.dx),
            },
            accept_opacity: self.accept_opacity(offset.dx),
            reject_opacity: self.reject_opacity(offset.dx),
            next_opacity: self.next_item_opacity(offset.dx),
            next_scale: self.next_item_scale(offset.dx),
        }
    }
}

// Standalone helpers using the default rotation. An unusable viewport yields
// the at-rest value so every helper stays total.

pub fn rotation_degrees(dx: f64, viewport: &Viewport) -> f64 {
    SignalCurves::new(viewport, MAX_ROTATION_DEGREES)
        .map(|c| c.rotation_degrees(dx))
        .unwrap_or(0.0)
}

pub fn accept_opacity(dx: f64, viewport: &Viewport) -> f64 {
    SignalCurves::new(viewport, MAX_ROTATION_DEGREES)
        .map(|c| c.accept_opacity(dx))
        .unwrap_or(0.0)
}

pub fn reject_opacity(dx: f64, viewport: &Viewport) -> f64 {
    SignalCurves::new(viewport, MAX_ROTATION_DEGREES)
        .map(|c| c.reject_opacity(dx))
        .unwrap_or(0.0)
}

pub fn next_item_opacity(dx: f64, viewport: &Viewport) -> f64 {
    SignalCurves::new(viewport, MAX_ROTATION_DEGREES)
        .map(|c| c.next_item_opacity(dx))
        .unwrap_or(NEXT_ITEM_REST_OPACITY)
}

pub fn next_item_scale(dx: f64, viewport: &Viewport) -> f64 {
    SignalCurves::new(viewport, MAX_ROTATION_DEGREES)
        .map(|c| c.next_item_scale(dx))
        .unwrap_or(NEXT_ITEM_REST_SCALE)
}
