use crate::animation::{Animated, Curve};
use crate::geometry::{Point, bearing, normalize_angle};
use crate::source::Color;
use derive_more::{Display, From, Into};
use std::f64::consts::TAU;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ShapeId(u64);

/// Duration and timing curve of one property transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub duration: Duration,
    pub curve: Curve,
}

impl Motion {
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self { duration, curve }
    }

    pub fn secs(secs: f64, curve: Curve) -> Self {
        Self::new(Duration::from_secs_f64(secs), curve)
    }

    /// Applies the change without any visible transition.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Curve::Linear)
    }

    pub fn or_instant(self, animated: bool) -> Self {
        if animated { self } else { Self::instant() }
    }
}

/// Snapshot of a wedge as it should appear on screen at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeFrame {
    pub id: ShapeId,
    pub center: Point,
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius: f64,
    pub scale: f64,
    pub color: Color,
    pub z_position: i32,
}

/// A pie slice centered on `position`. A full sweep makes it a circle.
#[derive(Debug, Clone)]
pub struct Wedge {
    id: ShapeId,
    start_angle: Animated<f64>,
    end_angle: Animated<f64>,
    radius: Animated<f64>,
    color: Animated<Color>,
    position: Animated<Point>,
    scale: Animated<f64>,
    rest_radius: f64,
    z_position: i32,
    children: Vec<Wedge>,
    needs_display: bool,
}

macro_rules! animatable {
    ($field:ident, $set:ident, $animate:ident, $animate_from:ident, $ty:ty) => {
        pub fn $field(&self) -> $ty {
            self.$field.value()
        }

        pub fn $set(&mut self, value: $ty) {
            self.$field.set(value);
            self.needs_display = true;
        }

        /// Transitions from the presented value. Returns when it settles.
        pub fn $animate(&mut self, to: $ty, now: Duration, motion: Motion) -> Option<Duration> {
            self.$field
                .animate_to(to, now, motion.duration, motion.curve);
            self.needs_display = true;
            self.$field.settles_at()
        }

        pub fn $animate_from(
            &mut self,
            from: $ty,
            to: $ty,
            now: Duration,
            motion: Motion,
        ) -> Option<Duration> {
            self.$field
                .animate_from_to(from, to, now, motion.duration, motion.curve);
            self.needs_display = true;
            self.$field.settles_at()
        }
    };
}

impl Wedge {
    pub fn new(id: ShapeId, color: Color, radius: f64) -> Self {
        Self::with_angles(id, color, radius, 0.0, TAU)
    }

    pub fn with_angles(
        id: ShapeId,
        color: Color,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            id,
            start_angle: Animated::new(start_angle),
            end_angle: Animated::new(end_angle),
            radius: Animated::new(radius),
            color: Animated::new(color),
            position: Animated::new(Point::default()),
            scale: Animated::new(1.0),
            rest_radius: radius,
            z_position: 0,
            children: Vec::new(),
            needs_display: true,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    animatable!(
        start_angle,
        set_start_angle,
        animate_start_angle,
        animate_start_angle_from,
        f64
    );
    animatable!(
        end_angle,
        set_end_angle,
        animate_end_angle,
        animate_end_angle_from,
        f64
    );
    animatable!(radius, set_radius, animate_radius, animate_radius_from, f64);
    animatable!(color, set_color, animate_color, animate_color_from, Color);
    animatable!(
        position,
        set_position,
        animate_position,
        animate_position_from,
        Point
    );
    animatable!(scale, set_scale, animate_scale, animate_scale_from, f64);

    /// Radius the shape returns to when it is not highlighted.
    pub fn rest_radius(&self) -> f64 {
        self.rest_radius
    }

    pub fn set_rest_radius(&mut self, radius: f64) {
        self.rest_radius = radius;
    }

    pub fn z_position(&self) -> i32 {
        self.z_position
    }

    pub fn set_z_position(&mut self, z: i32) {
        self.z_position = z;
        self.needs_display = true;
    }

    pub fn children(&self) -> &[Wedge] {
        &self.children
    }

    /// Overlays `child`, positioned relative to this wedge's center.
    pub fn add_child(&mut self, child: Wedge) {
        self.children.push(child);
        self.needs_display = true;
    }

    pub fn take_needs_display(&mut self) -> bool {
        let child_dirty = self
            .children
            .iter_mut()
            .fold(false, |acc, c| c.take_needs_display() || acc);
        std::mem::take(&mut self.needs_display) || child_dirty
    }

    /// Whether a point relative to the wedge center falls inside the drawn
    /// sector. Uses committed values, not the ones mid-transition.
    pub fn contains(&self, local: Point) -> bool {
        let radius = self.radius.value() * self.scale.value();
        if radius <= 0.0 || local.x * local.x + local.y * local.y > radius * radius {
            return false;
        }

        let theta = bearing(Point::default(), local);
        let start = normalize_angle(self.start_angle.value());
        let mut end = normalize_angle(self.end_angle.value());

        // sector wraps through zero
        if end < start {
            end += TAU;
        }
        // zero sweep is a full circle
        if end == start {
            end = start + TAU;
        }

        (start <= theta && theta <= end) || (start <= theta + TAU && theta + TAU <= end)
    }

    /// Returns the topmost shape under `point`, given in the parent's space.
    /// Children are tested before the wedge itself.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        let local = point - self.position.value();
        self.children
            .iter()
            .rev()
            .find_map(|c| c.hit_test(local))
            .or_else(|| self.contains(local).then_some(self.id))
    }

    pub fn frame(&self, now: Duration) -> WedgeFrame {
        WedgeFrame {
            id: self.id,
            center: self.position.presented(now),
            start_angle: self.start_angle.presented(now),
            end_angle: self.end_angle.presented(now),
            radius: self.radius.presented(now),
            scale: self.scale.presented(now),
            color: self.color.presented(now),
            z_position: self.z_position,
        }
    }

    /// Frames of the overlaid children, centers in the parent's space.
    pub fn child_frames(&self, now: Duration) -> Vec<WedgeFrame> {
        let origin = self.position.presented(now);
        self.children
            .iter()
            .flat_map(|c| {
                std::iter::once(c.frame(now)).chain(c.child_frames(now).into_iter())
            })
            .map(|mut f| {
                f.center = f.center + origin;
                f
            })
            .collect()
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.start_angle.is_animating(now)
            || self.end_angle.is_animating(now)
            || self.radius.is_animating(now)
            || self.color.is_animating(now)
            || self.position.is_animating(now)
            || self.scale.is_animating(now)
            || self.children.iter().any(|c| c.is_animating(now))
    }

    pub fn settle(&mut self, now: Duration) {
        self.start_angle.settle(now);
        self.end_angle.settle(now);
        self.radius.settle(now);
        self.color.settle(now);
        self.position.settle(now);
        self.scale.settle(now);
        self.children.iter_mut().for_each(|c| c.settle(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DEFAULT_COLOR;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn wedge(start: f64, end: f64) -> Wedge {
        Wedge::with_angles(ShapeId::from(1), DEFAULT_COLOR, 100.0, start, end)
    }

    fn polar(angle: f64, r: f64) -> Point {
        Point::new(r * angle.cos(), r * angle.sin())
    }

    #[test]
    fn test_bisector_is_inside() {
        let sectors = [
            (0.0, FRAC_PI_2),
            (0.0, PI),
            (FRAC_PI_2, PI),
            (PI, 1.5 * PI),
            (1.5 * PI, TAU),
            (1.5 * PI, 2.5 * PI),
            (-FRAC_PI_2, FRAC_PI_2),
            (0.3, 0.4),
            (TAU - 0.1, TAU + 0.1),
        ];

        for (start, end) in sectors {
            let w = wedge(start, end);
            let mid = (start + end) / 2.0;
            for r in [0.5, 10.0, 50.0, 99.9, 99.999] {
                assert!(
                    w.contains(polar(mid, r)),
                    "bisector {mid} at r={r} rejected by [{start}, {end}]"
                );
            }
        }
    }

    #[test]
    fn test_vertical_center_line() {
        let lower = wedge(0.0, PI);
        assert!(lower.contains(Point::new(0.0, 50.0)));
        assert!(!lower.contains(Point::new(0.0, -50.0)));
    }

    #[test]
    fn test_outside_sector_rejected() {
        let w = wedge(0.0, FRAC_PI_2);
        assert!(!w.contains(polar(PI, 50.0)));
        assert!(!w.contains(polar(-0.1, 50.0)));
        assert!(!w.contains(polar(FRAC_PI_2 + 0.1, 50.0)));
        assert!(!w.contains(polar(0.5, 100.5)));

        let wrapping = wedge(1.5 * PI, 2.5 * PI);
        assert!(wrapping.contains(polar(0.1, 50.0)));
        assert!(!wrapping.contains(polar(PI, 50.0)));
    }

    #[test]
    fn test_zero_sweep_is_full_circle() {
        for angle in [0.0, 1.0, PI, TAU] {
            let w = wedge(angle, angle);
            for probe in [0.0, FRAC_PI_2, PI, 4.0, 6.0] {
                assert!(w.contains(polar(probe, 40.0)));
            }
        }
    }

    #[test]
    fn test_zero_scale_contains_nothing() {
        let mut w = wedge(0.0, TAU);
        w.set_scale(0.0);
        assert!(!w.contains(Point::default()));
        w.set_scale(0.5);
        assert!(w.contains(Point::new(40.0, 0.0)));
        assert!(!w.contains(Point::new(60.0, 0.0)));
    }

    #[test]
    fn test_hit_test_uses_position() {
        let mut w = Wedge::new(ShapeId::from(4), DEFAULT_COLOR, 10.0);
        w.set_position(Point::new(100.0, 100.0));
        assert_eq!(w.hit_test(Point::new(105.0, 100.0)), Some(ShapeId::from(4)));
        assert_eq!(w.hit_test(Point::new(5.0, 0.0)), None);
    }

    #[test]
    fn test_children_take_priority() {
        let mut parent = wedge(0.0, TAU);
        let mut child = Wedge::new(ShapeId::from(2), DEFAULT_COLOR, 10.0);
        child.set_position(Point::new(50.0, 0.0));
        parent.add_child(child);

        assert_eq!(parent.hit_test(Point::new(52.0, 0.0)), Some(ShapeId::from(2)));
        assert_eq!(parent.hit_test(Point::new(-52.0, 0.0)), Some(ShapeId::from(1)));
        // children may extend past the parent's sector
        let mut narrow = wedge(0.0, 0.1);
        let mut child = Wedge::new(ShapeId::from(3), DEFAULT_COLOR, 5.0);
        child.set_position(Point::new(0.0, 50.0));
        narrow.add_child(child);
        assert_eq!(narrow.hit_test(Point::new(0.0, 50.0)), Some(ShapeId::from(3)));
    }

    #[test]
    fn test_mutation_requests_redraw() {
        let mut w = wedge(0.0, 1.0);
        assert!(w.take_needs_display());
        assert!(!w.take_needs_display());

        w.set_end_angle(2.0);
        assert!(w.take_needs_display());
        w.set_color(Color::new(1.0, 0.0, 0.0, 1.0));
        assert!(w.take_needs_display());
        w.animate_radius(50.0, Duration::ZERO, Motion::secs(0.1, Curve::Linear));
        assert!(w.take_needs_display());
    }

    #[test]
    fn test_frame_reads_presented_values() {
        let mut w = wedge(0.0, 1.0);
        let motion = Motion::new(Duration::from_millis(100), Curve::Linear);
        let settles = w.animate_end_angle(2.0, Duration::ZERO, motion);

        assert_eq!(settles, Some(Duration::from_millis(100)));
        assert_eq!(w.end_angle(), 2.0);
        let frame = w.frame(Duration::from_millis(50));
        assert!((frame.end_angle - 1.5).abs() < 1e-9);
        assert!(w.is_animating(Duration::from_millis(50)));
        assert!(!w.is_animating(Duration::from_millis(100)));
    }
}
