// Integration tests for Lume Swipe

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lume_swipe::core::{ControllerSettings, Deck, FnObserver, SwipeController, SwipeError, SwipeObserver};
use lume_swipe::models::{BusyPolicy, Candidate, Decision, Offset, Phase, RenderFrame, SwipeDirection, Viewport};
use lume_swipe::services::{DecisionLog, FrameDriver};

fn create_candidate(id: &str, name: &str, age: u8) -> Candidate {
    Candidate::new(id, name, age, format!("https://example.com/{}.jpg", id), format!("Bio of {}", name))
}

fn create_deck() -> Deck {
    Deck::new(vec![
        create_candidate("1", "Sarah", 26),
        create_candidate("2", "Jessica", 24),
        create_candidate("3", "Michael", 28),
    ])
}

/// Observer that keeps every frame and decision
#[derive(Default)]
struct Recorder {
    frames: Vec<RenderFrame>,
    decisions: Vec<(Candidate, Decision)>,
}

impl SwipeObserver for Recorder {
    fn on_render(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }

    fn on_decision(&mut self, candidate: &Candidate, decision: Decision) {
        self.decisions.push((candidate.clone(), decision));
    }
}

fn create_controller(deck: Deck) -> SwipeController<Recorder> {
    SwipeController::new(
        deck,
        Viewport::new(400.0, 800.0),
        ControllerSettings::default(),
        Recorder::default(),
    )
    .unwrap()
}

#[test]
fn test_accept_scenario() {
    let mut controller = create_controller(create_deck());
    assert_eq!(controller.threshold(), 100.0);

    controller.begin_drag().unwrap();
    controller.update_drag(150.0, 10.0).unwrap();
    let decision = controller.end_drag(150.0, 10.0).unwrap();
    assert_eq!(decision, Decision::Accepted);

    // Nothing is removed while the card is still flying off
    assert_eq!(controller.deck().len(), 3);
    assert!(controller.observer().decisions.is_empty());

    assert_eq!(controller.tick(Duration::from_millis(250)), Some(Decision::Accepted));
    assert_eq!(controller.deck().len(), 2);
    assert_eq!(controller.deck().front().map(|c| c.id.as_str()), Some("2"));
    assert_eq!(controller.offset(), Offset::ZERO);
    assert_eq!(controller.phase(), Phase::Idle);

    let decisions = &controller.observer().decisions;
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].0.name, "Sarah");
    assert_eq!(decisions[0].1, Decision::Accepted);
}

#[test]
fn test_reject_scenario() {
    let mut controller = create_controller(create_deck());

    controller.begin_drag().unwrap();
    controller.update_drag(-140.0, 0.0).unwrap();
    assert_eq!(controller.end_drag(-140.0, 0.0).unwrap(), Decision::Rejected);

    // Fly-off heads off-screen to the left
    controller.tick(Duration::from_millis(125));
    assert!(controller.offset().dx < -140.0);

    assert_eq!(controller.tick(Duration::from_millis(125)), Some(Decision::Rejected));
    assert_eq!(controller.deck().len(), 2);
    assert!(!controller.deck().iter().any(|c| c.id == "1"));
}

#[test]
fn test_cancel_scenario() {
    let mut controller = create_controller(create_deck());

    controller.begin_drag().unwrap();
    controller.update_drag(50.0, 0.0).unwrap();
    assert_eq!(controller.end_drag(50.0, 0.0).unwrap(), Decision::Cancelled);
    assert_eq!(controller.phase(), Phase::Resolving);

    assert_eq!(controller.tick(Duration::from_secs(3)), Some(Decision::Cancelled));
    assert_eq!(controller.offset(), Offset::ZERO);
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.deck().len(), 3);
    assert!(controller.observer().decisions.is_empty());
}

#[test]
fn test_releases_inside_threshold_never_mutate_deck() {
    for dx in [-100.0, -99.9, -42.0, 0.0, 17.5, 99.0, 100.0] {
        let mut controller = create_controller(create_deck());
        controller.begin_drag().unwrap();
        assert_eq!(controller.end_drag(dx, 25.0).unwrap(), Decision::Cancelled, "dx={}", dx);
        controller.tick(Duration::from_secs(5));
        assert_eq!(controller.deck().len(), 3, "dx={}", dx);
    }
}

#[test]
fn test_update_is_idempotent() {
    let mut controller = create_controller(create_deck());
    controller.begin_drag().unwrap();

    controller.update_drag(75.0, -12.0).unwrap();
    let once = controller.signals();
    controller.update_drag(75.0, -12.0).unwrap();
    let twice = controller.signals();

    assert_eq!(once, twice);
}

#[test]
fn test_render_frames_track_the_drag() {
    let mut controller = create_controller(create_deck());
    controller.begin_drag().unwrap();
    controller.update_drag(200.0, 0.0).unwrap();

    let frame = controller.observer().frames.last().cloned().unwrap();
    assert_eq!(frame.front.map(|c| c.id), Some("1".to_string()));
    assert_eq!(frame.next.map(|c| c.id), Some("2".to_string()));
    assert_eq!(frame.transform.translate_x, 200.0);
    assert_eq!(frame.transform.rotation_degrees, 10.0);
    assert_eq!(frame.accept_opacity, 1.0);
    assert_eq!(frame.reject_opacity, 0.0);
    assert_eq!(frame.next_opacity, 1.0);
    assert_eq!(frame.next_scale, 1.0);
    assert_eq!(frame.phase, Phase::Dragging);
}

#[test]
fn test_end_drag_while_idle_is_ignored() {
    let mut controller = create_controller(create_deck());
    let err = controller.end_drag(300.0, 0.0).unwrap_err();

    assert!(matches!(err, SwipeError::InvalidStateTransition { phase: Phase::Idle, .. }));
    assert!(!err.is_terminal());
    assert_eq!(controller.deck().len(), 3);
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(controller.observer().frames.is_empty());
}

#[test]
fn test_single_candidate_then_empty_deck() {
    let mut controller = create_controller(Deck::new(vec![create_candidate("1", "Emily", 27)]));

    controller.force_decide(SwipeDirection::Right).unwrap();
    controller.tick(Duration::from_millis(300));
    assert!(controller.is_exhausted());

    let frames_before = controller.observer().frames.len();
    assert_eq!(controller.begin_drag(), Err(SwipeError::EmptyDeck));
    assert_eq!(controller.update_drag(10.0, 0.0), Err(SwipeError::EmptyDeck));
    assert_eq!(controller.end_drag(300.0, 0.0), Err(SwipeError::EmptyDeck));
    assert_eq!(controller.force_decide(SwipeDirection::Left), Err(SwipeError::EmptyDeck));
    assert!(SwipeError::EmptyDeck.is_terminal());

    assert_eq!(controller.observer().frames.len(), frames_before);
    assert_eq!(controller.offset(), Offset::ZERO);
    assert!(controller.frame().exhausted);
    assert!(controller.frame().front.is_none());
}

#[test]
fn test_every_candidate_decided_exactly_once() {
    let mut controller = create_controller(create_deck());

    for direction in [SwipeDirection::Right, SwipeDirection::Left, SwipeDirection::Right] {
        controller.force_decide(direction).unwrap();
        // Input during the fly-off is ignored
        assert!(controller.begin_drag().is_err());
        controller.tick(Duration::from_millis(250));
    }

    let ids: Vec<&str> = controller
        .observer()
        .decisions
        .iter()
        .map(|(c, _)| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(controller.is_exhausted());
}

#[test]
fn test_force_complete_policy() {
    let settings = ControllerSettings {
        busy_policy: BusyPolicy::ForceComplete,
        ..ControllerSettings::default()
    };
    let mut controller =
        SwipeController::new(create_deck(), Viewport::new(400.0, 800.0), settings, DecisionLog::new()).unwrap();

    controller.force_decide(SwipeDirection::Right).unwrap();
    controller.force_decide(SwipeDirection::Left).unwrap();

    assert_eq!(controller.observer().len(), 1);
    assert_eq!(controller.pending_decision(), Some(Decision::Rejected));
    assert_eq!(controller.deck().front().map(|c| c.id.as_str()), Some("2"));
}

#[test]
fn test_refill_never_reoffers_decided_candidates() {
    let mut controller = create_controller(create_deck());
    controller.force_decide(SwipeDirection::Left).unwrap();
    controller.tick(Duration::from_millis(250));

    let summary = controller.refill(vec![
        create_candidate("1", "Sarah", 26),
        create_candidate("4", "David", 30),
    ]);

    assert_eq!(summary.added, 1);
    assert_eq!(summary.skipped, 1);
    let ids: Vec<&str> = controller.deck().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3", "4"]);
}

#[test]
fn test_viewport_change_moves_threshold() {
    let mut controller = create_controller(create_deck());
    controller.set_viewport(Viewport::new(800.0, 1200.0)).unwrap();
    assert_eq!(controller.threshold(), 200.0);

    controller.begin_drag().unwrap();
    assert_eq!(controller.end_drag(150.0, 0.0).unwrap(), Decision::Cancelled);

    assert!(controller.set_viewport(Viewport::new(0.0, 100.0)).is_err());
    assert_eq!(controller.viewport(), Viewport::new(800.0, 1200.0));
}

#[test]
fn test_closure_observer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observer = FnObserver(move |candidate: &Candidate, decision: Decision| {
        sink.borrow_mut().push((candidate.id.clone(), decision));
    });

    let mut controller =
        SwipeController::new(create_deck(), Viewport::new(400.0, 800.0), ControllerSettings::default(), observer)
            .unwrap();
    controller.force_decide(SwipeDirection::Left).unwrap();
    controller.tick(Duration::from_millis(250));

    assert_eq!(*seen.borrow(), vec![("1".to_string(), Decision::Rejected)]);
}

#[tokio::test]
async fn test_frame_driver_completes_fly_off() {
    let mut controller =
        SwipeController::new(create_deck(), Viewport::new(400.0, 800.0), ControllerSettings::default(), DecisionLog::new())
            .unwrap();

    controller.begin_drag().unwrap();
    controller.end_drag(180.0, 0.0).unwrap();

    let driver = FrameDriver::new(Duration::from_millis(16));
    let settled = driver.run(&mut controller).await;

    assert_eq!(settled, Some(Decision::Accepted));
    assert_eq!(controller.deck().len(), 2);
    assert_eq!(controller.observer().count(Decision::Accepted), 1);
}

#[tokio::test]
async fn test_frame_driver_without_animation() {
    let mut controller =
        SwipeController::new(create_deck(), Viewport::new(400.0, 800.0), ControllerSettings::default(), ()).unwrap();

    assert_eq!(FrameDriver::default().run(&mut controller).await, None);
}
