use std::time::Duration;

use crate::models::Offset;

/// Integration step for spring physics
const SPRING_STEP: Duration = Duration::from_millis(1);

/// Springs that have not settled after this long are snapped to rest
const SPRING_MAX_DURATION: Duration = Duration::from_secs(10);

/// Result of advancing an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub offset: Offset,
    /// Normalized progress in [0, 1]
    pub progress: f64,
    pub finished: bool,
}

/// Cubic ease-in-out over normalized time
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Fixed-duration transition between two offsets (fly-off)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    from: Offset,
    to: Offset,
    duration: Duration,
    elapsed: Duration,
}

impl Timing {
    pub fn new(from: Offset, to: Offset, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn value(&self) -> Offset {
        let eased = ease_in_out(self.progress());
        Offset {
            dx: self.from.dx + (self.to.dx - self.from.dx) * eased,
            dy: self.from.dy + (self.to.dy - self.from.dy) * eased,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: Duration) -> AnimationStep {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        let finished = self.is_finished();
        AnimationStep {
            // Land exactly on the target, free of easing round-off
            offset: if finished { self.to } else { self.value() },
            progress: self.progress(),
            finished,
        }
    }
}

/// Spring parameters in friction/tension form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub friction: f64,
    pub tension: f64,
    pub rest_displacement: f64,
    pub rest_speed: f64,
}

impl SpringConfig {
    /// Stiffness from tension (origami mapping)
    pub fn stiffness(&self) -> f64 {
        ((self.tension - 30.0) * 3.62 + 194.0).max(1.0)
    }

    /// Damping from friction (origami mapping)
    pub fn damping(&self) -> f64 {
        ((self.friction - 8.0) * 3.0 + 25.0).max(0.0)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            friction: 5.0,
            tension: 40.0,
            rest_displacement: 0.01,
            rest_speed: 0.01,
        }
    }
}

/// Damped spring pulling an offset back to (0, 0) (spring-back)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: Offset,
    velocity: Offset,
    initial_distance: f64,
    elapsed: Duration,
    settled: bool,
}

impl Spring {
    pub fn new(from: Offset, config: SpringConfig) -> Self {
        let initial_distance = from.dx.hypot(from.dy);
        let mut spring = Self {
            config,
            position: from,
            velocity: Offset::ZERO,
            initial_distance,
            elapsed: Duration::ZERO,
            settled: false,
        };
        spring.check_rest();
        spring
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn progress(&self) -> f64 {
        if self.settled || self.initial_distance == 0.0 {
            return 1.0;
        }
        let distance = self.position.dx.hypot(self.position.dy);
        (1.0 - distance / self.initial_distance).clamp(0.0, 1.0)
    }

    pub fn advance(&mut self, dt: Duration) -> AnimationStep {
        let mut remaining = dt;
        while !self.settled && !remaining.is_zero() {
            let h = remaining.min(SPRING_STEP);
            self.step(h.as_secs_f64());
            remaining -= h;
            self.elapsed += h;
            self.check_rest();
            if self.elapsed >= SPRING_MAX_DURATION {
                self.snap_to_rest();
            }
        }

        AnimationStep {
            offset: self.position,
            progress: self.progress(),
            finished: self.settled,
        }
    }

    // Semi-implicit Euler
    fn step(&mut self, h: f64) {
        let k = self.config.stiffness();
        let c = self.config.damping();

        let ax = -k * self.position.dx - c * self.velocity.dx;
        let ay = -k * self.position.dy - c * self.velocity.dy;

        self.velocity.dx += ax * h;
        self.velocity.dy += ay * h;
        self.position.dx += self.velocity.dx * h;
        self.position.dy += self.velocity.dy * h;
    }

    fn check_rest(&mut self) {
        let displacement = self.position.dx.hypot(self.position.dy);
        let speed = self.velocity.dx.hypot(self.velocity.dy);
        if displacement <= self.config.rest_displacement && speed <= self.config.rest_speed {
            self.snap_to_rest();
        }
    }

    fn snap_to_rest(&mut self) {
        self.position = Offset::ZERO;
        self.velocity = Offset::ZERO;
        self.settled = true;
    }
}

/// An in-flight animation of the front card
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    FlyOff(Timing),
    SpringBack(Spring),
}

impl Animation {
    pub fn advance(&mut self, dt: Duration) -> AnimationStep {
        match self {
            Animation::FlyOff(timing) => timing.advance(dt),
            Animation::SpringBack(spring) => spring.advance(dt),
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            Animation::FlyOff(timing) => timing.progress(),
            Animation::SpringBack(spring) => spring.progress(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Animation::FlyOff(timing) => timing.is_finished(),
            Animation::SpringBack(spring) => spring.is_settled(),
        }
    }
}
