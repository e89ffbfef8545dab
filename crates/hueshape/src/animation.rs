//! Explicit interpolation state for animatable shape properties.
//!
//! An [`Animated`] value holds the committed target plus an optional span
//! describing the transition that is still playing. The renderer samples
//! [`Animated::presented`] with the current clock; layout and hit testing
//! read the committed [`Animated::value`].

use crate::geometry::Point;
use crate::source::Color;
use std::time::Duration;

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

impl Lerp for Color {
    fn lerp(self, to: Self, t: f64) -> Self {
        Color::new(
            self.red.lerp(to.red, t),
            self.green.lerp(to.green, t),
            self.blue.lerp(to.blue, t),
            self.alpha.lerp(to.alpha, t),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseInOut,
    Spring {
        mass: f64,
        stiffness: f64,
        damping: f64,
    },
}

impl Curve {
    pub const EASE_IN_OUT_POINTS: (f64, f64, f64, f64) = (0.42, 0.0, 0.58, 1.0);

    pub const fn spring() -> Self {
        Self::Spring {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
        }
    }

    /// Progress in `[0, 1]` for linear and ease curves. Springs may
    /// overshoot past 1 before settling.
    pub fn progress(&self, elapsed: Duration, duration: Duration) -> f64 {
        if duration.is_zero() || elapsed >= duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / duration.as_secs_f64();

        match *self {
            Self::Linear => t,
            Self::EaseInOut => {
                let (x1, y1, x2, y2) = Self::EASE_IN_OUT_POINTS;
                cubic_bezier(x1, y1, x2, y2, t)
            }
            Self::Spring {
                mass,
                stiffness,
                damping,
            } => spring(mass, stiffness, damping, elapsed.as_secs_f64()),
        }
    }
}

fn bezier_component(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Timing function through (0,0), (x1,y1), (x2,y2), (1,1) evaluated at
/// horizontal position `x`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    const EPS: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < EPS {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // newton stalled, fall back to bisection
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > EPS {
        if bezier_component(x1, x2, s) < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_component(y1, y2, s)
}

/// Displacement of a damped oscillator released at 0 towards 1 with no
/// initial velocity.
fn spring(mass: f64, stiffness: f64, damping: f64, t: f64) -> f64 {
    let omega = (stiffness / mass).sqrt();
    let zeta = damping / (2.0 * (stiffness * mass).sqrt());

    if zeta < 1.0 - 1e-9 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
    } else if zeta <= 1.0 + 1e-9 {
        1.0 - (-omega * t).exp() * (1.0 + omega * t)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Span<T> {
    from: T,
    begin: Duration,
    duration: Duration,
    curve: Curve,
}

#[derive(Debug, Clone, Copy)]
pub struct Animated<T> {
    value: T,
    span: Option<Span<T>>,
}

impl<T: Lerp> Animated<T> {
    pub fn new(value: T) -> Self {
        Self { value, span: None }
    }

    /// The committed value, i.e. where any running transition ends.
    pub fn value(&self) -> T {
        self.value
    }

    /// Commits `value` immediately, dropping any transition in flight.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.span = None;
    }

    /// Starts a transition from whatever is on screen at `now`.
    pub fn animate_to(&mut self, to: T, now: Duration, duration: Duration, curve: Curve) {
        let from = self.presented(now);
        self.animate_from_to(from, to, now, duration, curve);
    }

    pub fn animate_from_to(
        &mut self,
        from: T,
        to: T,
        now: Duration,
        duration: Duration,
        curve: Curve,
    ) {
        self.value = to;
        self.span = (!duration.is_zero()).then_some(Span {
            from,
            begin: now,
            duration,
            curve,
        });
    }

    pub fn presented(&self, now: Duration) -> T {
        match &self.span {
            Some(span) => {
                let elapsed = now.saturating_sub(span.begin);
                if elapsed >= span.duration {
                    self.value
                } else {
                    let t = span.curve.progress(elapsed, span.duration);
                    span.from.lerp(self.value, t)
                }
            }
            None => self.value,
        }
    }

    pub fn settles_at(&self) -> Option<Duration> {
        self.span.as_ref().map(|s| s.begin + s.duration)
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.settles_at().is_some_and(|end| now < end)
    }

    /// Forgets a finished span.
    pub fn settle(&mut self, now: Duration) {
        if !self.is_animating(now) {
            self.span = None;
        }
    }
}
