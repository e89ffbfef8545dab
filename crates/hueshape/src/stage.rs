//! Shape collection and pointer bookkeeping shared by both pickers.

use crate::geometry::Point;
use crate::source::Color;
use crate::tracking::{TouchState, TouchTransition, Tracker};
use crate::transaction::{Completion, SettleAction, Timeline, Transaction};
use crate::wedge::{Motion, ShapeId, Wedge, WedgeFrame};
use std::time::Duration;

/// Radius multiplier of the shape under the pointer.
pub const HIGHLIGHT_FACTOR: f64 = 1.1;

#[derive(Debug, Default)]
pub struct ShapeIds {
    next: u64,
}

impl ShapeIds {
    pub fn allocate(&mut self) -> ShapeId {
        let id = ShapeId::from(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug)]
pub struct Stage {
    pub(crate) shapes: Vec<Wedge>,
    detaching: Vec<Wedge>,
    timeline: Timeline,
    tracker: Tracker,
    ids: ShapeIds,
    in_flight: usize,
    last_reported: Option<Color>,
    hover: Motion,
}

/// Mutable view of a stage inside one structural transition.
pub struct Scene<'a> {
    pub tx: Transaction<'a>,
    pub shapes: &'a mut Vec<Wedge>,
    pub ids: &'a mut ShapeIds,
    detaching: &'a mut Vec<Wedge>,
    tracker: &'a mut Tracker,
}

impl Scene<'_> {
    pub fn now(&self) -> Duration {
        self.tx.now()
    }

    /// Moves the shape at `index` out of the collection. It keeps being
    /// drawn until this transition settles.
    pub fn detach(&mut self, index: usize) -> &mut Wedge {
        let wedge = self.shapes.remove(index);
        let id = wedge.id();
        self.tracker.forget(id);
        self.tx.on_settle(SettleAction::Detach(id));
        self.detaching.push(wedge);
        let last = self.detaching.len() - 1;
        &mut self.detaching[last]
    }
}

impl Stage {
    pub fn new(hover: Motion) -> Self {
        Self {
            shapes: Vec::new(),
            detaching: Vec::new(),
            timeline: Timeline::default(),
            tracker: Tracker::default(),
            ids: ShapeIds::default(),
            in_flight: 0,
            last_reported: None,
            hover,
        }
    }

    pub fn shapes(&self) -> &[Wedge] {
        &self.shapes
    }

    /// Shapes still playing their exit, removed once their transition
    /// settles.
    pub(crate) fn detaching_mut(&mut self) -> &mut [Wedge] {
        &mut self.detaching
    }

    pub fn allocate_id(&mut self) -> ShapeId {
        self.ids.allocate()
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn is_interaction_enabled(&self) -> bool {
        self.in_flight == 0
    }

    pub fn touch_state(&self) -> TouchState {
        self.tracker.state()
    }

    /// Opens a structural transition. Pointer input is ignored until it
    /// settles, then `on_complete` runs.
    pub fn transition(&mut self, on_complete: Completion) -> Scene<'_> {
        self.in_flight += 1;
        let mut tx = Transaction::begin(&mut self.timeline);
        tx.on_settle(SettleAction::EnableInteraction);
        tx.on_complete(on_complete);
        Scene {
            tx,
            shapes: &mut self.shapes,
            ids: &mut self.ids,
            detaching: &mut self.detaching,
            tracker: &mut self.tracker,
        }
    }

    /// Advances the clock, applies settled batches and returns their
    /// completions along with whether anything is still moving.
    pub fn tick(&mut self, now: Duration) -> (bool, Vec<Completion>) {
        let mut completions = Vec::new();
        for batch in self.timeline.advance(now) {
            for action in batch.actions {
                match action {
                    SettleAction::EnableInteraction => {
                        self.in_flight = self.in_flight.saturating_sub(1);
                    }
                    SettleAction::Detach(id) => {
                        log::trace!("Detaching shape {}", id);
                        self.detaching.retain(|w| w.id() != id);
                    }
                }
            }
            completions.extend(batch.on_complete);
        }

        let now = self.timeline.now();
        self.shapes.iter_mut().for_each(|w| w.settle(now));
        let animating = self.timeline.has_pending()
            || self
                .shapes
                .iter()
                .chain(&self.detaching)
                .any(|w| w.is_animating(now));
        (animating, completions)
    }

    fn draw_order(&self) -> Vec<&Wedge> {
        let mut order: Vec<&Wedge> = self.shapes.iter().chain(&self.detaching).collect();
        order.sort_by_key(|w| w.z_position());
        order
    }

    /// Presented shapes at the current clock, back to front.
    pub fn frames(&self) -> Vec<WedgeFrame> {
        let now = self.timeline.now();
        self.draw_order()
            .into_iter()
            .flat_map(|w| std::iter::once(w.frame(now)).chain(w.child_frames(now)))
            .collect()
    }

    pub fn take_needs_display(&mut self) -> bool {
        self.shapes
            .iter_mut()
            .chain(self.detaching.iter_mut())
            .fold(false, |acc, w| w.take_needs_display() || acc)
    }

    /// Topmost attached shape under `point`.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        let mut order: Vec<&Wedge> = self.shapes.iter().collect();
        order.sort_by_key(|w| w.z_position());
        order.into_iter().rev().find_map(|w| w.hit_test(point))
    }

    pub fn pointer_down(&mut self, point: Point) -> Option<Color> {
        if !self.is_interaction_enabled() {
            return None;
        }
        let hit = self.hit_test(point);
        let transition = self.tracker.pressed(hit);
        self.apply(transition)
    }

    pub fn pointer_moved(&mut self, point: Point) -> Option<Color> {
        if !self.is_interaction_enabled() {
            return None;
        }
        let hit = self.hit_test(point);
        let transition = self.tracker.moved(hit);
        self.apply(transition)
    }

    /// Release always ends tracking, even mid-transition, so a pressed shape
    /// never stays enlarged.
    pub fn pointer_up(&mut self) {
        if let Some(id) = self.tracker.released() {
            self.restore(id);
        }
    }

    fn apply(&mut self, transition: TouchTransition) -> Option<Color> {
        log::trace!("Touch transition {:?}", transition);
        match transition {
            TouchTransition::Entered(id) => {
                self.highlight(id);
                self.select(id)
            }
            TouchTransition::Between { from, to } => {
                self.restore(from);
                self.highlight(to);
                self.select(to)
            }
            TouchTransition::Exited(id) => {
                self.restore(id);
                None
            }
            TouchTransition::Within(_) | TouchTransition::Outside => None,
        }
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Wedge> {
        self.shapes.iter_mut().find(|w| w.id() == id)
    }

    fn highlight(&mut self, id: ShapeId) {
        let (now, hover) = (self.now(), self.hover);
        if let Some(w) = self.shape_mut(id) {
            let target = w.rest_radius() * HIGHLIGHT_FACTOR;
            w.animate_radius(target, now, hover);
        }
    }

    fn restore(&mut self, id: ShapeId) {
        let (now, hover) = (self.now(), self.hover);
        if let Some(w) = self.shape_mut(id) {
            let target = w.rest_radius();
            w.animate_radius(target, now, hover);
        }
    }

    /// Returns the color to report, if it differs from the last one reported.
    fn select(&mut self, id: ShapeId) -> Option<Color> {
        let color = self.shapes.iter().find(|w| w.id() == id)?.color();
        if self.last_reported == Some(color) {
            return None;
        }
        log::debug!("Selected shape {}", id);
        self.last_reported = Some(color);
        Some(color)
    }
}
