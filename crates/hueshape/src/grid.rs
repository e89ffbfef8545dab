use crate::animation::Curve;
use crate::geometry::{Point, Rect};
use crate::picker::{ColorPicker, PickerKind, forward_to_stage};
use crate::source::{
    Color, DEFAULT_COLOR, DEFAULT_MAX_COLUMNS, GridColorSource, PickerDelegate, color_at,
    color_count,
};
use crate::stage::Stage;
use crate::transaction::Completion;
use crate::wedge::{Motion, Wedge};
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_COLOR_COUNT: usize = 16;
pub const PADDING_LEFT: f64 = 10.0;
pub const PADDING_RIGHT: f64 = 10.0;
pub const PADDING_TOP: f64 = 10.0;
pub const PADDING_BOTTOM: f64 = 10.0;
pub const PADDING_BETWEEN_ROWS: f64 = 15.0;
pub const PADDING_BETWEEN_COLUMNS: f64 = 15.0;
/// Drawn circles are this much smaller than their slot.
pub const CIRCLE_INSET: f64 = 1.0;

const SHOW: Motion = Motion::new(Duration::from_millis(1000), Curve::spring());
const HOVER: Motion = Motion::new(Duration::from_millis(100), Curve::Linear);
const RELOAD: Motion = Motion::new(Duration::from_millis(500), Curve::EaseInOut);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSlot {
    pub center: Point,
    pub radius: f64,
}

/// Rows and columns of equally sized circles inside a padded rectangle.
/// The grid is centered vertically and a partial last row is centered on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    bounds: Rect,
    count: usize,
    max_columns: usize,
    columns: usize,
    rows: usize,
    radius: f64,
}

impl GridLayout {
    pub fn new(bounds: Rect, count: usize, max_columns: usize) -> Self {
        let max_columns = max_columns.max(1);
        let columns = count.min(max_columns);
        let rows = count.div_ceil(max_columns);

        let radius = if count == 0 {
            0.0
        } else {
            let row_space = bounds.width()
                - PADDING_LEFT
                - PADDING_RIGHT
                - (columns - 1) as f64 * PADDING_BETWEEN_COLUMNS;
            let column_space = bounds.height()
                - PADDING_TOP
                - PADDING_BOTTOM
                - (rows - 1) as f64 * PADDING_BETWEEN_ROWS;
            ((column_space / rows as f64).min(row_space / columns as f64) / 2.0).max(0.0)
        };

        Self {
            bounds,
            count,
            max_columns,
            columns,
            rows,
            radius,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn row_left(&self, circles_in_row: usize) -> f64 {
        let n = circles_in_row as f64;
        (self.bounds.width()
            - PADDING_LEFT
            - PADDING_RIGHT
            - n * self.radius * 2.0
            - (n - 1.0) * PADDING_BETWEEN_COLUMNS)
            / 2.0
            + PADDING_LEFT
    }

    pub fn slot(&self, index: usize) -> Option<CircleSlot> {
        if index >= self.count {
            return None;
        }
        let (row, col) = (index / self.columns, index % self.columns);
        let r = self.radius;

        let top = (self.bounds.height()
            - PADDING_TOP
            - PADDING_BOTTOM
            - self.rows as f64 * r * 2.0
            - (self.rows - 1) as f64 * PADDING_BETWEEN_ROWS)
            / 2.0
            + PADDING_TOP;

        let remainder = self.count % self.max_columns;
        let left = if row == self.rows - 1 && remainder != 0 {
            self.row_left(remainder)
        } else {
            self.row_left(self.columns)
        };

        Some(CircleSlot {
            center: Point::new(
                self.bounds.origin.x + left + col as f64 * (r * 2.0 + PADDING_BETWEEN_COLUMNS) + r,
                self.bounds.origin.y + top + row as f64 * (r * 2.0 + PADDING_BETWEEN_ROWS) + r,
            ),
            radius: r,
        })
    }
}

/// Colors laid out as a grid of circles.
pub struct GridPicker {
    stage: Stage,
    bounds: Rect,
    source: Option<Rc<dyn GridColorSource>>,
    delegate: Option<Rc<dyn PickerDelegate>>,
}

impl GridPicker {
    /// Circles start at zero scale; call [`ColorPicker::show`] to pop them in.
    pub fn new(
        bounds: Rect,
        source: Option<Rc<dyn GridColorSource>>,
        delegate: Option<Rc<dyn PickerDelegate>>,
    ) -> Self {
        let mut stage = Stage::new(HOVER);
        for _ in 0..color_count(source.as_deref(), DEFAULT_COLOR_COUNT) {
            let id = stage.allocate_id();
            let mut circle = Wedge::new(id, DEFAULT_COLOR, 0.0);
            circle.set_scale(0.0);
            stage.shapes.push(circle);
        }

        let mut picker = Self {
            stage,
            bounds,
            source,
            delegate,
        };
        picker.layout();
        picker
    }

    pub fn set_data_source(&mut self, source: Option<Rc<dyn GridColorSource>>) {
        self.source = source;
    }

    pub fn circles(&self) -> &[Wedge] {
        self.stage.shapes()
    }

    fn max_columns(&self) -> usize {
        self.source
            .as_ref()
            .map_or(DEFAULT_MAX_COLUMNS, |s| s.max_columns())
    }

    pub fn grid_layout(&self, count: usize) -> GridLayout {
        GridLayout::new(self.bounds, count, self.max_columns())
    }

    fn targets(&self, count: usize) -> Vec<(CircleSlot, Color)> {
        let layout = self.grid_layout(count);
        (0..count)
            .filter_map(|i| {
                layout
                    .slot(i)
                    .map(|s| (s, color_at(self.source.as_deref(), i)))
            })
            .collect()
    }

    /// Snaps every circle onto its slot for the current shape count.
    /// Circles on their way out have no slot left, so they vanish at once.
    fn layout(&mut self) {
        for circle in self.stage.detaching_mut() {
            circle.set_scale(0.0);
        }

        let targets = self.targets(self.stage.shapes().len());
        for (circle, (slot, color)) in self.stage.shapes.iter_mut().zip(targets) {
            let radius = (slot.radius - CIRCLE_INSET).max(0.0);
            circle.set_color(color);
            circle.set_position(slot.center);
            circle.set_radius(radius);
            circle.set_rest_radius(radius);
        }
    }
}

impl ColorPicker for GridPicker {
    fn kind(&self) -> PickerKind {
        PickerKind::Grid
    }

    fn show(&mut self, animated: bool, on_complete: Completion) {
        let mut scene = self.stage.transition(on_complete);
        let now = scene.now();
        log::debug!("Showing grid picker with {} circles", scene.shapes.len());

        for circle in scene.shapes.iter_mut() {
            if animated {
                let end = circle.animate_scale_from(0.0, 1.0, now, SHOW);
                scene.tx.track(end);
            } else {
                circle.set_scale(1.0);
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
        log::debug!("Reloading grid picker: {} -> {} circles", old_count, new_count);

        let targets = self.targets(new_count);
        let motion = RELOAD.or_instant(animated);

        let mut scene = self.stage.transition(on_complete);
        let now = scene.now();

        for &(slot, color) in targets.iter().skip(old_count) {
            let id = scene.ids.allocate();
            let mut circle = Wedge::new(id, color, (slot.radius - CIRCLE_INSET).max(0.0));
            circle.set_position(slot.center);
            let end = circle.animate_scale_from(0.0, 1.0, now, motion);
            scene.tx.track(end);
            scene.shapes.push(circle);
        }

        for i in (new_count..old_count).rev() {
            let circle = scene.detach(i);
            let end = circle.animate_scale(0.0, now, motion);
            scene.tx.track(end);
        }

        for (circle, &(slot, color)) in scene.shapes.iter_mut().zip(&targets) {
            let radius = (slot.radius - CIRCLE_INSET).max(0.0);
            circle.set_rest_radius(radius);
            let ends = [
                circle.animate_color(color, now, motion),
                circle.animate_position(slot.center, now, motion),
                circle.animate_radius(radius, now, motion),
            ];
            ends.into_iter().for_each(|e| scene.tx.track(e));
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout();
    }

    forward_to_stage!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ColorSource;
    use crate::testing::{ListSource, Recorder, counter, ms};
    use crate::tracking::TouchState;

    const EPS: f64 = 1e-9;

    fn bounds() -> Rect {
        Rect::from_size(400.0, 400.0)
    }

    fn shown(count: usize, max_columns: usize) -> (GridPicker, Rc<ListSource>) {
        let source = ListSource::graded(count);
        source.max_columns.set(max_columns);
        let mut picker = GridPicker::new(bounds(), Some(source.clone()), None);
        picker.show(false, Box::new(|| {}));
        picker.tick(ms(0));
        (picker, source)
    }

    fn row_centers(layout: &GridLayout, count: usize, row: usize) -> Vec<Point> {
        (0..count)
            .filter(|i| i / layout.columns() == row)
            .filter_map(|i| layout.slot(i))
            .map(|s| s.center)
            .collect()
    }

    fn mean_x(points: &[Point]) -> f64 {
        points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64
    }

    #[test]
    fn test_full_grid() {
        let layout = GridLayout::new(bounds(), 16, 4);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.rows(), 4);
        // (400 - 20 - 45) / 4 / 2
        assert!((layout.radius() - 41.875).abs() < EPS);

        let first = row_centers(&layout, 16, 0);
        let last = row_centers(&layout, 16, 3);
        assert_eq!(last.len(), 4);
        for (a, b) in first.iter().zip(&last) {
            assert!((a.x - b.x).abs() < EPS);
        }
        assert!((mean_x(&last) - 200.0).abs() < EPS);
    }

    #[test]
    fn test_partial_last_row_centered() {
        let layout = GridLayout::new(bounds(), 15, 4);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.rows(), 4);

        let first = row_centers(&layout, 15, 0);
        let last = row_centers(&layout, 15, 3);
        assert_eq!(last.len(), 3);
        assert!((mean_x(&first) - 200.0).abs() < EPS);
        assert!((mean_x(&last) - 200.0).abs() < EPS);
        // shifted right by half a column
        let shift = layout.radius() + PADDING_BETWEEN_COLUMNS / 2.0;
        assert!((last[0].x - first[0].x - shift).abs() < EPS);
    }

    #[test]
    fn test_vertical_centering() {
        let layout = GridLayout::new(Rect::from_size(400.0, 800.0), 8, 4);
        let top = layout.slot(0).unwrap().center.y;
        let bottom = layout.slot(7).unwrap().center.y;
        assert!(((top + bottom) / 2.0 - 400.0).abs() < EPS);
    }

    #[test]
    fn test_fewer_colors_than_columns() {
        let layout = GridLayout::new(bounds(), 2, 4);
        assert_eq!(layout.columns(), 2);
        assert_eq!(layout.rows(), 1);
        let row = row_centers(&layout, 2, 0);
        assert!((mean_x(&row) - 200.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_layouts() {
        let empty = GridLayout::new(bounds(), 0, 4);
        assert_eq!(empty.slot(0), None);
        assert_eq!(empty.radius(), 0.0);

        let tiny = GridLayout::new(Rect::from_size(5.0, 5.0), 9, 3);
        assert_eq!(tiny.radius(), 0.0);

        let clamped = GridLayout::new(bounds(), 3, 0);
        assert_eq!(clamped.columns(), 1);
        assert_eq!(clamped.rows(), 3);
    }

    #[test]
    fn test_new_picker_lays_out_circles() {
        let source = ListSource::graded(16);
        let picker = GridPicker::new(bounds(), Some(source.clone()), None);
        let layout = picker.grid_layout(16);

        for (i, circle) in picker.circles().iter().enumerate() {
            let slot = layout.slot(i).unwrap();
            assert_eq!(circle.position(), slot.center);
            assert!((circle.radius() - (slot.radius - CIRCLE_INSET)).abs() < EPS);
            assert_eq!(circle.color(), source.color(i));
            assert_eq!(circle.scale(), 0.0);
        }
    }

    #[test]
    fn test_show_springs_scale() {
        let source = ListSource::graded(4);
        let mut picker = GridPicker::new(bounds(), Some(source), None);
        let (done, on_complete) = counter();
        picker.show(true, on_complete);

        picker.tick(ms(500));
        assert_eq!(done.get(), 0);
        assert!(picker.frames().iter().all(|f| f.scale > 0.5));
        picker.tick(ms(1000));
        assert_eq!(done.get(), 1);
        assert!(picker.circles().iter().all(|c| c.scale() == 1.0));
    }

    #[test]
    fn test_reload_appends_to_grid() {
        let (mut picker, source) = shown(13, 4);
        let original: Vec<_> = picker.circles().iter().map(|c| c.id()).collect();
        source.set_count(16);
        let (done, on_complete) = counter();
        picker.reload_picker(true, on_complete);

        assert_eq!(picker.shape_count(), 16);
        let ids: Vec<_> = picker.circles().iter().map(|c| c.id()).collect();
        assert_eq!(ids[..13], original[..]);

        picker.tick(ms(500));
        assert_eq!(done.get(), 1);
        let layout = picker.grid_layout(16);
        for (i, circle) in picker.circles().iter().enumerate() {
            let slot = layout.slot(i).unwrap();
            assert_eq!(circle.position(), slot.center);
            assert_eq!(circle.scale(), 1.0);
        }
    }

    #[test]
    fn test_resize_during_removal_relayouts_and_hides_leaving_circles() {
        let (mut picker, source) = shown(16, 4);
        let kept: Vec<_> = picker.circles()[..10].iter().map(|c| c.id()).collect();
        source.set_count(10);
        picker.reload_picker(true, Box::new(|| {}));
        picker.tick(ms(100));

        picker.set_bounds(Rect::from_size(600.0, 500.0));

        let frames = picker.frames();
        assert_eq!(frames.len(), 16);
        let layout = picker.grid_layout(10);
        for frame in &frames {
            match kept.iter().position(|id| *id == frame.id) {
                Some(i) => assert_eq!(frame.center, layout.slot(i).unwrap().center),
                None => assert_eq!(frame.scale, 0.0),
            }
        }

        picker.tick(ms(600));
        assert_eq!(picker.frames().len(), 10);
    }

    #[test]
    fn test_reload_removes_from_end() {
        let (mut picker, source) = shown(16, 4);
        let kept: Vec<_> = picker.circles()[..10].iter().map(|c| c.id()).collect();
        source.set_count(10);
        picker.reload_picker(true, Box::new(|| {}));

        let ids: Vec<_> = picker.circles().iter().map(|c| c.id()).collect();
        assert_eq!(ids, kept);
        assert_eq!(picker.frames().len(), 16);

        picker.tick(ms(250));
        assert_eq!(picker.frames().len(), 16);
        picker.tick(ms(500));
        assert_eq!(picker.frames().len(), 10);
    }

    #[test]
    fn test_reload_unchanged_is_noop() {
        let (mut picker, _) = shown(6, 3);
        let (done, on_complete) = counter();
        picker.reload_picker(true, on_complete);
        assert_eq!(done.get(), 1);
        assert!(picker.is_interaction_enabled());
    }

    #[test]
    fn test_hover_grows_and_restores_circle() {
        let (mut picker, _) = shown(6, 3);
        let recorder = Rc::new(Recorder::default());
        picker.set_delegate(Some(recorder.clone()));
        let rest = picker.circles()[4].rest_radius();

        picker.pointer_down(picker.circles()[4].position());
        assert!((picker.circles()[4].radius() - rest * 1.1).abs() < EPS);

        // move within the same circle
        let p = picker.circles()[4].position();
        picker.pointer_moved(Point::new(p.x + 1.0, p.y));
        assert_eq!(recorder.selections.borrow().len(), 1);

        // into the gap between circles
        let gap = Point::new(p.x, p.y - rest - PADDING_BETWEEN_ROWS / 2.0);
        picker.pointer_moved(gap);
        assert_eq!(picker.touch_state(), TouchState::Idle);
        assert_eq!(picker.circles()[4].radius(), rest);

        picker.pointer_moved(picker.circles()[0].position());
        picker.pointer_up();
        assert_eq!(picker.touch_state(), TouchState::Idle);
        assert_eq!(picker.circles()[0].radius(), rest);

        let kinds: Vec<_> = recorder.selections.borrow().iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![PickerKind::Grid, PickerKind::Grid]);
    }
}
