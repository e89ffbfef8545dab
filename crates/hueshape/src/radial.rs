use crate::animation::Curve;
use crate::geometry::{Point, Rect};
use crate::picker::{ColorPicker, PickerKind, forward_to_stage};
use crate::source::{Color, ColorSource, PickerDelegate, color_at, color_count};
use crate::stage::Stage;
use crate::transaction::Completion;
use crate::wedge::{Motion, Wedge};
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_COLOR_COUNT: usize = 15;
pub const CIRCLE_PADDING: f64 = 10.0;

const SHOW_SCALE: Motion = Motion::new(Duration::from_millis(950), Curve::spring());
const SHOW_ROTATE: Motion = Motion::new(Duration::from_millis(600), Curve::Linear);
const HOVER: Motion = Motion::new(Duration::from_millis(100), Curve::Linear);
const RELOAD: Motion = Motion::new(Duration::from_millis(500), Curve::EaseInOut);

/// Angular slot `[start, end]` of wedge `index` out of `count`, clockwise
/// from the positive x axis.
pub fn slot(index: usize, count: usize) -> (f64, f64) {
    let increment = TAU / count as f64;
    (index as f64 * increment, (index + 1) as f64 * increment)
}

/// A disc split into one equal wedge per color.
pub struct RadialPicker {
    stage: Stage,
    bounds: Rect,
    source: Option<Rc<dyn ColorSource>>,
    delegate: Option<Rc<dyn PickerDelegate>>,
}

impl RadialPicker {
    /// Wedges start collapsed; call [`ColorPicker::show`] to fan them out.
    pub fn new(
        bounds: Rect,
        source: Option<Rc<dyn ColorSource>>,
        delegate: Option<Rc<dyn PickerDelegate>>,
    ) -> Self {
        let mut stage = Stage::new(HOVER);
        let count = color_count(source.as_deref(), DEFAULT_COLOR_COUNT);
        let radius = Self::radius_in(bounds);

        for i in 0..count {
            let id = stage.allocate_id();
            let mut wedge = Wedge::with_angles(id, color_at(source.as_deref(), i), radius, 0.0, 0.0);
            wedge.set_position(bounds.center());
            wedge.set_scale(0.0);
            stage.shapes.push(wedge);
        }

        Self {
            stage,
            bounds,
            source,
            delegate,
        }
    }

    pub fn set_data_source(&mut self, source: Option<Rc<dyn ColorSource>>) {
        self.source = source;
    }

    fn radius_in(bounds: Rect) -> f64 {
        (bounds.width().min(bounds.height()) / 2.0 - CIRCLE_PADDING).max(0.0)
    }

    pub fn circle_center(&self) -> Point {
        self.bounds.center()
    }

    pub fn circle_radius(&self) -> f64 {
        Self::radius_in(self.bounds)
    }

    pub fn wedges(&self) -> &[Wedge] {
        self.stage.shapes()
    }

    fn colors(&self, count: usize) -> Vec<Color> {
        (0..count)
            .map(|i| color_at(self.source.as_deref(), i))
            .collect()
    }
}

impl ColorPicker for RadialPicker {
    fn kind(&self) -> PickerKind {
        PickerKind::Radial
    }

    fn show(&mut self, animated: bool, on_complete: Completion) {
        let mut scene = self.stage.transition(on_complete);
        let now = scene.now();
        let count = scene.shapes.len();
        log::debug!("Showing radial picker with {} wedges", count);

        for (i, wedge) in scene.shapes.iter_mut().enumerate() {
            let (start, end) = slot(i, count);
            if animated {
                let ends = [
                    wedge.animate_scale_from(0.0, 1.0, now, SHOW_SCALE),
                    wedge.animate_start_angle_from(0.0, start, now, SHOW_ROTATE),
                    wedge.animate_end_angle_from(0.0, end, now, SHOW_ROTATE),
                ];
                ends.into_iter().for_each(|e| scene.tx.track(e));
            } else {
                wedge.set_scale(1.0);
                wedge.set_start_angle(start);
                wedge.set_end_angle(end);
            }
        }
    }

    fn reload_picker(&mut self, animated: bool, on_complete: Completion) {
        let old_count = self.stage.shapes().len();
        let new_count = color_count(self.source.as_deref(), DEFAULT_COLOR_COUNT);
        if old_count == new_count {
            on_complete();
            return;
        }
        log::debug!("Reloading radial picker: {} -> {} wedges", old_count, new_count);

        let colors = self.colors(new_count);
        let (center, radius) = (self.circle_center(), self.circle_radius());
        let motion = RELOAD.or_instant(animated);

        let mut scene = self.stage.transition(on_complete);
        let now = scene.now();

        if new_count > old_count {
            let scale = scene.shapes.first().map_or(1.0, |w| w.scale());
            // new wedges enter with no sweep at angle zero
            for (i, &color) in colors.iter().enumerate().take(new_count - old_count) {
                let id = scene.ids.allocate();
                let mut wedge = Wedge::with_angles(id, color, radius, 0.0, 0.0);
                wedge.set_position(center);
                wedge.set_scale(scale);
                scene.shapes.insert(i, wedge);
            }
        } else {
            for i in (new_count..old_count).rev() {
                let wedge = scene.detach(i);
                wedge.set_z_position(-1);
                let ends = [
                    wedge.animate_start_angle(TAU, now, motion),
                    wedge.animate_end_angle(TAU, now, motion),
                ];
                ends.into_iter().for_each(|e| scene.tx.track(e));
            }
        }

        for (i, wedge) in scene.shapes.iter_mut().enumerate() {
            let (start, end) = slot(i, new_count);
            let ends = [
                wedge.animate_color(colors[i], now, motion),
                wedge.animate_start_angle(start, now, motion),
                wedge.animate_end_angle(end, now, motion),
            ];
            ends.into_iter().for_each(|e| scene.tx.track(e));
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let (center, radius) = (self.circle_center(), self.circle_radius());
        for wedge in self.stage.shapes.iter_mut() {
            wedge.set_position(center);
            wedge.set_radius(radius);
            wedge.set_rest_radius(radius);
        }
        // wedges still sweeping out follow the disc
        for wedge in self.stage.detaching_mut() {
            wedge.set_position(center);
            wedge.set_radius(radius);
        }
    }

    forward_to_stage!();
}
