use std::time::Duration;

use crate::core::{
    animation::{Animation, Spring, SpringConfig, Timing},
    deck::{Deck, ExtendSummary},
    error::{Operation, SwipeError},
    signals::{SignalCurves, VisualSignals, MAX_ROTATION_DEGREES},
};
use crate::models::{BusyPolicy, Candidate, Decision, Offset, Phase, RenderFrame, SwipeDirection, Viewport};

/// Tuning for the swipe state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Commit threshold as a fraction of the viewport width
    pub threshold_fraction: f64,
    pub fly_off_duration: Duration,
    /// Extra distance past the viewport edge a committed card travels
    pub fly_off_margin: f64,
    pub max_rotation_degrees: f64,
    pub spring: SpringConfig,
    pub busy_policy: BusyPolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.25,
            fly_off_duration: Duration::from_millis(250),
            fly_off_margin: 100.0,
            max_rotation_degrees: MAX_ROTATION_DEGREES,
            spring: SpringConfig::default(),
            busy_policy: BusyPolicy::Ignore,
        }
    }
}

/// Hooks through which the controller reports to its host
pub trait SwipeObserver {
    /// Called whenever derived signals or deck contents change
    fn on_render(&mut self, _frame: &RenderFrame) {}

    /// Called once per committed decision, after the fly-off finished
    fn on_decision(&mut self, candidate: &Candidate, decision: Decision);
}

impl SwipeObserver for () {
    fn on_decision(&mut self, _candidate: &Candidate, _decision: Decision) {}
}

/// Adapts a closure into a decision-only observer
pub struct FnObserver<F>(pub F);

impl<F> SwipeObserver for FnObserver<F>
where
    F: FnMut(&Candidate, Decision),
{
    fn on_decision(&mut self, candidate: &Candidate, decision: Decision) {
        (self.0)(candidate, decision)
    }
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    decision: Decision,
    animation: Animation,
}

/// Gesture state machine for the front card of a deck
///
/// Phases: `Idle -> Dragging -> Resolving -> Idle`. Committed decisions pop
/// the front candidate only once their fly-off completes through [`tick`].
///
/// [`tick`]: SwipeController::tick
pub struct SwipeController<O: SwipeObserver = ()> {
    deck: Deck,
    viewport: Viewport,
    settings: ControllerSettings,
    curves: SignalCurves,
    phase: Phase,
    offset: Offset,
    resolution: Option<Resolution>,
    observer: O,
}

impl<O: SwipeObserver> SwipeController<O> {
    pub fn new(
        deck: Deck,
        viewport: Viewport,
        settings: ControllerSettings,
        observer: O,
    ) -> Result<Self, SwipeError> {
        let curves = SignalCurves::new(&viewport, settings.max_rotation_degrees)?;

        Ok(Self {
            deck,
            viewport,
            settings,
            curves,
            phase: Phase::Idle,
            offset: Offset::ZERO,
            resolution: None,
            observer,
        })
    }

    /// Start tracking a new gesture from (0, 0)
    pub fn begin_drag(&mut self) -> Result<(), SwipeError> {
        self.ensure_not_empty(Operation::BeginDrag)?;
        self.settle_busy(Operation::BeginDrag)?;

        if let Some(resolution) = self.resolution.take() {
            tracing::debug!("Abandoning {:?} spring-back for a new drag", resolution.decision);
        }

        self.offset = Offset::ZERO;
        self.phase = Phase::Dragging;
        tracing::debug!("Drag started on {:?}", self.deck.front().map(|c| &c.id));
        self.emit_render();
        Ok(())
    }

    /// Track the latest pointer offset
    pub fn update_drag(&mut self, dx: f64, dy: f64) -> Result<(), SwipeError> {
        self.ensure_not_empty(Operation::UpdateDrag)?;
        self.ensure_dragging(Operation::UpdateDrag)?;

        self.offset = Offset::sanitized(dx, dy);
        self.emit_render();
        Ok(())
    }

    /// Release the pointer and resolve the gesture against the threshold
    pub fn end_drag(&mut self, dx: f64, dy: f64) -> Result<Decision, SwipeError> {
        self.ensure_not_empty(Operation::EndDrag)?;
        self.ensure_dragging(Operation::EndDrag)?;

        self.offset = Offset::sanitized(dx, dy);
        let decision = self.classify(self.offset.dx);
        tracing::debug!("Drag released at ({}, {}) -> {:?}", dx, dy, decision);

        self.start_resolution(decision);
        Ok(decision)
    }

    /// Commit a decision without a gesture, as an accept/reject button would
    pub fn force_decide(&mut self, direction: SwipeDirection) -> Result<Decision, SwipeError> {
        self.ensure_not_empty(Operation::ForceDecide)?;
        self.settle_busy(Operation::ForceDecide)?;

        let decision = direction.decision();
        tracing::debug!("Forced {:?} from ({}, {})", decision, self.offset.dx, self.offset.dy);

        self.start_resolution(decision);
        Ok(decision)
    }

    /// Advance the in-flight animation
    ///
    /// Returns the decision that settled during this tick, if any.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Decision> {
        let resolution = self.resolution.as_mut()?;
        let step = resolution.animation.advance(elapsed);
        self.offset = step.offset;

        if step.finished {
            Some(self.finish_resolution())
        } else {
            self.emit_render();
            None
        }
    }

    /// Drop the in-flight animation without committing anything
    ///
    /// The offset snaps to rest and the phase returns to idle. Dropping a
    /// commit is reported as [`SwipeError::AnimationInterrupted`].
    pub fn abort_animation(&mut self) -> Result<(), SwipeError> {
        let Some(resolution) = self.resolution.take() else {
            return Ok(());
        };

        self.offset = Offset::ZERO;
        self.phase = Phase::Idle;
        self.emit_render();

        if resolution.decision.is_commit() {
            tracing::warn!("Dropped in-flight {:?} for {:?}", resolution.decision, self.deck.front().map(|c| &c.id));
            return Err(SwipeError::AnimationInterrupted {
                dropped: resolution.decision,
            });
        }
        Ok(())
    }

    /// Append candidates to the deck
    pub fn refill(&mut self, candidates: impl IntoIterator<Item = Candidate>) -> ExtendSummary {
        let summary = self.deck.extend(candidates);
        if summary.added > 0 {
            self.emit_render();
        }
        summary
    }

    /// Replace the viewport; thresholds and curves follow
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SwipeError> {
        self.curves = SignalCurves::new(&viewport, self.settings.max_rotation_degrees)?;
        self.viewport = viewport;
        self.emit_render();
        Ok(())
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> RenderFrame {
        let signals = self.signals();
        RenderFrame {
            front: self.deck.front().cloned(),
            next: self.deck.next().cloned(),
            transform: signals.transform,
            accept_opacity: signals.accept_opacity,
            reject_opacity: signals.reject_opacity,
            next_opacity: signals.next_opacity,
            next_scale: signals.next_scale,
            phase: self.phase,
            remaining: self.deck.len(),
            exhausted: self.deck.is_empty(),
        }
    }

    pub fn signals(&self) -> VisualSignals {
        self.curves.derive(self.offset)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Horizontal distance a release must exceed to commit
    pub fn threshold(&self) -> f64 {
        self.viewport.threshold(self.settings.threshold_fraction)
    }

    pub fn is_exhausted(&self) -> bool {
        self.deck.is_empty()
    }

    /// Decision whose animation is still running
    pub fn pending_decision(&self) -> Option<Decision> {
        self.resolution.map(|r| r.decision)
    }

    /// Normalized progress of the in-flight animation
    pub fn progress(&self) -> Option<f64> {
        self.resolution.map(|r| r.animation.progress())
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn classify(&self, dx: f64) -> Decision {
        let threshold = self.threshold();
        if dx > threshold {
            Decision::Accepted
        } else if dx < -threshold {
            Decision::Rejected
        } else {
            Decision::Cancelled
        }
    }

    fn ensure_not_empty(&self, operation: Operation) -> Result<(), SwipeError> {
        if self.deck.is_empty() {
            tracing::debug!("{} on an empty deck", operation);
            return Err(SwipeError::EmptyDeck);
        }
        Ok(())
    }

    fn ensure_dragging(&self, operation: Operation) -> Result<(), SwipeError> {
        if self.phase != Phase::Dragging {
            return Err(self.invalid(operation));
        }
        Ok(())
    }

    // Apply the busy policy when a commit is still flying off
    fn settle_busy(&mut self, operation: Operation) -> Result<(), SwipeError> {
        let committing = self.resolution.is_some_and(|r| r.decision.is_commit());
        if !committing {
            return Ok(());
        }

        match self.settings.busy_policy {
            BusyPolicy::Ignore => Err(self.invalid(operation)),
            BusyPolicy::ForceComplete => {
                tracing::debug!("{} force-completes the in-flight fly-off", operation);
                self.finish_resolution();
                self.ensure_not_empty(operation)
            }
        }
    }

    fn invalid(&self, operation: Operation) -> SwipeError {
        tracing::warn!("Ignoring {} while {}", operation, self.phase);
        SwipeError::InvalidStateTransition {
            operation,
            phase: self.phase,
        }
    }

    fn start_resolution(&mut self, decision: Decision) {
        let animation = if let Some(direction) = decision.direction() {
            let target = Offset::new(
                direction.sign() * (self.viewport.width + self.settings.fly_off_margin),
                0.0,
            );
            Animation::FlyOff(Timing::new(self.offset, target, self.settings.fly_off_duration))
        } else {
            Animation::SpringBack(Spring::new(self.offset, self.settings.spring))
        };

        let finished = animation.is_finished();
        self.resolution = Some(Resolution { decision, animation });
        self.phase = Phase::Resolving;

        // Zero-length animations settle on the spot
        if finished {
            self.finish_resolution();
        } else {
            self.emit_render();
        }
    }

    fn finish_resolution(&mut self) -> Decision {
        let Some(resolution) = self.resolution.take() else {
            return Decision::Cancelled;
        };

        if resolution.decision.is_commit() {
            if let Some(candidate) = self.deck.pop_decided() {
                tracing::info!(
                    "Candidate {} {:?}, {} remaining",
                    candidate.id,
                    resolution.decision,
                    self.deck.len()
                );
                self.observer.on_decision(&candidate, resolution.decision);
            }
        }

        self.offset = Offset::ZERO;
        self.phase = Phase::Idle;
        self.emit_render();
        resolution.decision
    }

    fn emit_render(&mut self) {
        let frame = self.frame();
        self.observer.on_render(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        decisions: Vec<(String, Decision)>,
    }

    impl SwipeObserver for Recorder {
        fn on_render(&mut self, _frame: &RenderFrame) {
            self.frames += 1;
        }

        fn on_decision(&mut self, candidate: &Candidate, decision: Decision) {
            self.decisions.push((candidate.id.clone(), decision));
        }
    }

    fn candidate(id: &str) -> Candidate {
        Candidate::new(id, format!("User {}", id), 25, "", "")
    }

    fn controller(ids: &[&str], settings: ControllerSettings) -> SwipeController<Recorder> {
        let deck = Deck::new(ids.iter().map(|id| candidate(id)));
        SwipeController::new(deck, Viewport::new(400.0, 800.0), settings, Recorder::default()).unwrap()
    }

    #[test]
    fn test_threshold_classification() {
        let c = controller(&["1"], ControllerSettings::default());
        assert_eq!(c.threshold(), 100.0);
        assert_eq!(c.classify(100.0), Decision::Cancelled);
        assert_eq!(c.classify(100.5), Decision::Accepted);
        assert_eq!(c.classify(-100.0), Decision::Cancelled);
        assert_eq!(c.classify(-101.0), Decision::Rejected);
        assert_eq!(c.classify(f64::NAN), Decision::Cancelled);
    }

    #[test]
    fn test_update_outside_drag_is_rejected() {
        let mut c = controller(&["1"], ControllerSettings::default());
        let err = c.update_drag(10.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            SwipeError::InvalidStateTransition {
                operation: Operation::UpdateDrag,
                phase: Phase::Idle
            }
        );
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.observer().frames, 0);
    }

    #[test]
    fn test_begin_drag_restarts_offset() {
        let mut c = controller(&["1"], ControllerSettings::default());
        c.begin_drag().unwrap();
        c.update_drag(80.0, 5.0).unwrap();
        c.begin_drag().unwrap();
        assert_eq!(c.phase(), Phase::Dragging);
        assert_eq!(c.offset(), Offset::ZERO);
    }

    #[test]
    fn test_commit_pops_only_after_fly_off() {
        let mut c = controller(&["1", "2"], ControllerSettings::default());
        c.begin_drag().unwrap();
        assert_eq!(c.end_drag(150.0, 10.0).unwrap(), Decision::Accepted);
        assert_eq!(c.phase(), Phase::Resolving);
        assert_eq!(c.deck().len(), 2);

        assert_eq!(c.tick(Duration::from_millis(100)), None);
        assert_eq!(c.deck().len(), 2);

        assert_eq!(c.tick(Duration::from_millis(150)), Some(Decision::Accepted));
        assert_eq!(c.deck().len(), 1);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.observer().decisions, vec![("1".to_string(), Decision::Accepted)]);
    }

    #[test]
    fn test_busy_ignore_blocks_new_gesture() {
        let mut c = controller(&["1", "2"], ControllerSettings::default());
        c.force_decide(SwipeDirection::Left).unwrap();

        assert!(matches!(
            c.begin_drag(),
            Err(SwipeError::InvalidStateTransition { operation: Operation::BeginDrag, .. })
        ));
        assert!(c.force_decide(SwipeDirection::Right).is_err());
        assert_eq!(c.pending_decision(), Some(Decision::Rejected));
        assert_eq!(c.deck().len(), 2);
    }

    #[test]
    fn test_busy_force_complete_commits_first() {
        let settings = ControllerSettings {
            busy_policy: BusyPolicy::ForceComplete,
            ..ControllerSettings::default()
        };
        let mut c = controller(&["1", "2"], settings);
        c.force_decide(SwipeDirection::Left).unwrap();
        c.begin_drag().unwrap();

        assert_eq!(c.phase(), Phase::Dragging);
        assert_eq!(c.deck().front().map(|x| x.id.as_str()), Some("2"));
        assert_eq!(c.observer().decisions, vec![("1".to_string(), Decision::Rejected)]);
    }

    #[test]
    fn test_force_complete_on_last_card_reports_empty() {
        let settings = ControllerSettings {
            busy_policy: BusyPolicy::ForceComplete,
            ..ControllerSettings::default()
        };
        let mut c = controller(&["1"], settings);
        c.force_decide(SwipeDirection::Right).unwrap();
        assert_eq!(c.begin_drag(), Err(SwipeError::EmptyDeck));
        assert!(c.is_exhausted());
    }

    #[test]
    fn test_new_drag_during_spring_back() {
        let mut c = controller(&["1"], ControllerSettings::default());
        c.begin_drag().unwrap();
        assert_eq!(c.end_drag(60.0, 0.0).unwrap(), Decision::Cancelled);
        c.tick(Duration::from_millis(20));
        assert_eq!(c.phase(), Phase::Resolving);

        c.begin_drag().unwrap();
        assert_eq!(c.phase(), Phase::Dragging);
        assert_eq!(c.offset(), Offset::ZERO);
        assert!(c.pending_decision().is_none());
    }

    #[test]
    fn test_abort_commit_reports_interruption() {
        let mut c = controller(&["1"], ControllerSettings::default());
        c.force_decide(SwipeDirection::Right).unwrap();
        c.tick(Duration::from_millis(50));

        assert_eq!(
            c.abort_animation(),
            Err(SwipeError::AnimationInterrupted { dropped: Decision::Accepted })
        );
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.offset(), Offset::ZERO);
        assert_eq!(c.deck().len(), 1);
        assert!(c.observer().decisions.is_empty());
    }

    #[test]
    fn test_zero_duration_fly_off_commits_immediately() {
        let settings = ControllerSettings {
            fly_off_duration: Duration::ZERO,
            ..ControllerSettings::default()
        };
        let mut c = controller(&["1", "2"], settings);
        c.force_decide(SwipeDirection::Right).unwrap();
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.deck().len(), 1);
    }

    #[test]
    fn test_release_at_rest_settles_immediately() {
        let mut c = controller(&["1"], ControllerSettings::default());
        c.begin_drag().unwrap();
        assert_eq!(c.end_drag(0.0, 0.0).unwrap(), Decision::Cancelled);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn test_nan_release_springs_back_from_rest() {
        let mut c = controller(&["1"], ControllerSettings::default());
        c.begin_drag().unwrap();
        c.update_drag(f64::NAN, 30.0).unwrap();
        assert_eq!(c.frame().transform.translate_x, 0.0);

        assert_eq!(c.end_drag(f64::NAN, 30.0).unwrap(), Decision::Cancelled);
        assert_eq!(c.offset(), Offset::new(0.0, 30.0));
        let progress = c.progress().unwrap();
        assert!((0.0..=1.0).contains(&progress));

        assert_eq!(c.tick(Duration::from_secs(3)), Some(Decision::Cancelled));
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.deck().len(), 1);
    }

    #[test]
    fn test_infinite_release_flies_off_on_finite_path() {
        for (dx, expected) in [(f64::INFINITY, Decision::Accepted), (f64::NEG_INFINITY, Decision::Rejected)] {
            let mut c = controller(&["1", "2"], ControllerSettings::default());
            c.begin_drag().unwrap();
            assert_eq!(c.end_drag(dx, 0.0).unwrap(), expected);

            c.tick(Duration::from_millis(100));
            let frame = c.frame();
            assert!(frame.transform.translate_x.is_finite());
            assert!(frame.transform.rotation_degrees.is_finite());
            assert!(c.progress().is_some_and(|p| (0.0..=1.0).contains(&p)));

            assert_eq!(c.tick(Duration::from_millis(150)), Some(expected));
            assert_eq!(c.deck().len(), 1);
            assert_eq!(c.offset(), Offset::ZERO);
        }
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        let deck = Deck::new(vec![candidate("1")]);
        let result = SwipeController::new(deck, Viewport::new(-1.0, 800.0), ControllerSettings::default(), ());
        assert!(matches!(result, Err(SwipeError::InvalidViewport { .. })));
    }
}
