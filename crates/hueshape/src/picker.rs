use crate::geometry::{Point, Rect};
use crate::source::{Color, PickerDelegate};
use crate::tracking::TouchState;
use crate::transaction::Completion;
use crate::wedge::WedgeFrame;
use std::rc::Rc;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum PickerKind {
    #[strum(to_string = "radial", serialize = "circle", serialize = "r")]
    Radial,
    #[strum(to_string = "grid", serialize = "g")]
    Grid,
}

/// Common surface of the radial and grid pickers.
///
/// All methods run on the UI thread. The host feeds its frame clock through
/// [`ColorPicker::tick`]; transitions started by `show` and `reload_picker`
/// are timed against the last clock value delivered that way.
pub trait ColorPicker {
    fn kind(&self) -> PickerKind;

    /// Plays the entrance transition. Pointer input is ignored until it
    /// settles, then `on_complete` runs.
    fn show(&mut self, animated: bool, on_complete: Completion);

    /// Re-reads the data source and transitions to the new color count and
    /// colors. Completes immediately when the count is unchanged.
    fn reload_picker(&mut self, animated: bool, on_complete: Completion);

    fn set_delegate(&mut self, delegate: Option<Rc<dyn PickerDelegate>>);

    fn bounds(&self) -> Rect;

    /// Lays the shapes out inside `bounds` without animating.
    fn set_bounds(&mut self, bounds: Rect);

    /// Advances the clock. Returns true while anything is still moving.
    fn tick(&mut self, now: Duration) -> bool;

    fn pointer_down(&mut self, point: Point);
    fn pointer_moved(&mut self, point: Point);
    fn pointer_up(&mut self);

    fn is_interaction_enabled(&self) -> bool;
    fn touch_state(&self) -> TouchState;
    fn shape_count(&self) -> usize;

    /// Shapes as they should be drawn right now, back to front.
    fn frames(&self) -> Vec<WedgeFrame>;

    /// True if anything changed since the last call.
    fn take_needs_display(&mut self) -> bool;
}

pub(crate) fn notify(
    delegate: Option<&Rc<dyn PickerDelegate>>,
    color: Option<Color>,
    picker: &dyn ColorPicker,
) {
    if let (Some(delegate), Some(color)) = (delegate, color) {
        delegate.did_select(color, picker);
    }
}

/// Implements the [`ColorPicker`] methods that only forward to a `stage`
/// field, for types that also carry a `delegate` field.
macro_rules! forward_to_stage {
    () => {
        fn set_delegate(
            &mut self,
            delegate: Option<std::rc::Rc<dyn $crate::source::PickerDelegate>>,
        ) {
            self.delegate = delegate;
        }

        fn tick(&mut self, now: std::time::Duration) -> bool {
            let (animating, completions) = self.stage.tick(now);
            completions.into_iter().for_each(|done| done());
            animating
        }

        fn pointer_down(&mut self, point: $crate::geometry::Point) {
            let color = self.stage.pointer_down(point);
            $crate::picker::notify(self.delegate.as_ref(), color, &*self);
        }

        fn pointer_moved(&mut self, point: $crate::geometry::Point) {
            let color = self.stage.pointer_moved(point);
            $crate::picker::notify(self.delegate.as_ref(), color, &*self);
        }

        fn pointer_up(&mut self) {
            self.stage.pointer_up();
        }

        fn is_interaction_enabled(&self) -> bool {
            self.stage.is_interaction_enabled()
        }

        fn touch_state(&self) -> $crate::tracking::TouchState {
            self.stage.touch_state()
        }

        fn shape_count(&self) -> usize {
            self.stage.shapes().len()
        }

        fn frames(&self) -> Vec<$crate::wedge::WedgeFrame> {
            self.stage.frames()
        }

        fn take_needs_display(&mut self) -> bool {
            self.stage.take_needs_display()
        }
    };
}

pub(crate) use forward_to_stage;
