pub mod view;

pub use view::draw;

use derive_more::Display;
use hueshape::source::Color;
use hueshape::{
    ColorPicker, ColorSource, Completion, GridColorSource, GridPicker, HuePalette, PickerDelegate,
    PickerKind, RadialPicker, Rect,
};
use std::rc::Rc;
use std::time::Duration;

/// Both picker variants over one shared palette. Only the active one takes
/// input and gets drawn, but both follow bounds and palette changes so a
/// switch never shows stale colors.
pub struct Pickers {
    radial: RadialPicker,
    grid: GridPicker,
    active: PickerKind,
}

impl Pickers {
    pub fn new(
        palette: &Rc<HuePalette>,
        delegate: Rc<dyn PickerDelegate>,
        active: PickerKind,
    ) -> Self {
        let radial_source: Rc<dyn ColorSource> = palette.clone();
        let grid_source: Rc<dyn GridColorSource> = palette.clone();
        Self {
            radial: RadialPicker::new(Rect::default(), Some(radial_source), Some(delegate.clone())),
            grid: GridPicker::new(Rect::default(), Some(grid_source), Some(delegate)),
            active,
        }
    }

    pub fn active_kind(&self) -> PickerKind {
        self.active
    }

    pub fn get(&self, kind: PickerKind) -> &dyn ColorPicker {
        match kind {
            PickerKind::Radial => &self.radial,
            PickerKind::Grid => &self.grid,
        }
    }

    pub fn get_mut(&mut self, kind: PickerKind) -> &mut dyn ColorPicker {
        match kind {
            PickerKind::Radial => &mut self.radial,
            PickerKind::Grid => &mut self.grid,
        }
    }

    pub fn active(&self) -> &dyn ColorPicker {
        self.get(self.active)
    }

    pub fn active_mut(&mut self) -> &mut dyn ColorPicker {
        self.get_mut(self.active)
    }

    /// Makes `kind` the visible picker and plays its entrance.
    pub fn switch_to(&mut self, kind: PickerKind, animated: bool, on_complete: Completion) {
        self.active_mut().pointer_up();
        self.active = kind;
        self.active_mut().show(animated, on_complete);
    }

    /// Picks up palette changes. The hidden picker is updated without
    /// animation.
    pub fn reload(&mut self, animated: bool, on_complete: Completion) {
        let hidden = match self.active {
            PickerKind::Radial => PickerKind::Grid,
            PickerKind::Grid => PickerKind::Radial,
        };
        self.get_mut(hidden).reload_picker(false, Box::new(|| {}));
        self.active_mut().reload_picker(animated, on_complete);
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.radial.set_bounds(bounds);
        self.grid.set_bounds(bounds);
    }

    /// Lays both pickers out again in their current bounds, e.g. after the
    /// palette's column limit changed.
    pub fn refresh_layout(&mut self) {
        let bounds = self.active().bounds();
        self.set_bounds(bounds);
    }

    pub fn tick(&mut self, now: Duration) -> bool {
        let radial = self.radial.tick(now);
        let grid = self.grid.tick(now);
        radial || grid
    }

    /// Only the active picker is on screen.
    pub fn take_needs_display(&mut self) -> bool {
        let radial = self.radial.take_needs_display();
        let grid = self.grid.take_needs_display();
        match self.active {
            PickerKind::Radial => radial,
            PickerKind::Grid => grid,
        }
    }
}

/// Converts GDK frame times into a clock that starts at the first frame.
#[derive(Debug, Default)]
pub struct FrameClock {
    origin: Option<i64>,
}

impl FrameClock {
    /// `frame_time` is in microseconds, as reported by `gdk::FrameClock`.
    pub fn elapsed(&mut self, frame_time: i64) -> Duration {
        let origin = *self.origin.get_or_insert(frame_time);
        Duration::from_micros(u64::try_from(frame_time - origin).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("#{red:02x}{green:02x}{blue:02x}")]
pub struct HexColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        let rgb = color.color.into_format::<u8>();
        Self {
            red: rgb.red,
            green: rgb.green,
            blue: rgb.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hueshape::Point;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Selections(RefCell<Vec<PickerKind>>);

    impl PickerDelegate for Selections {
        fn did_select(&self, _color: Color, picker: &dyn ColorPicker) {
            self.0.borrow_mut().push(picker.kind());
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup(count: usize) -> (Rc<HuePalette>, Rc<Selections>, Pickers) {
        let palette = Rc::new(HuePalette::new(count, 4));
        let selections = Rc::new(Selections::default());
        let mut pickers = Pickers::new(&palette, selections.clone(), PickerKind::Radial);
        pickers.set_bounds(Rect::from_size(400.0, 400.0));
        (palette, selections, pickers)
    }

    #[test]
    fn test_switch_shows_new_picker() {
        let (_palette, _selections, mut pickers) = setup(16);
        pickers.switch_to(PickerKind::Grid, true, Box::new(|| {}));

        assert_eq!(pickers.active_kind(), PickerKind::Grid);
        assert_eq!(pickers.active().kind(), PickerKind::Grid);
        assert!(!pickers.active().is_interaction_enabled());

        assert!(!pickers.tick(ms(2000)));
        assert!(pickers.active().is_interaction_enabled());
    }

    #[test]
    fn test_reload_updates_both_pickers() {
        let (palette, _selections, mut pickers) = setup(16);
        palette.set_count(6);
        pickers.reload(true, Box::new(|| {}));
        pickers.tick(ms(2000));

        assert_eq!(pickers.get(PickerKind::Radial).shape_count(), 6);
        assert_eq!(pickers.get(PickerKind::Grid).shape_count(), 6);
    }

    #[test]
    fn test_refresh_layout_follows_column_limit() {
        let (palette, _selections, mut pickers) = setup(8);
        let grid = pickers.get(PickerKind::Grid).frames();
        assert_eq!(grid[0].center.y, grid[3].center.y);

        palette.set_max_columns(2);
        pickers.refresh_layout();

        let grid = pickers.get(PickerKind::Grid).frames();
        assert_eq!(grid[0].center.y, grid[1].center.y);
        assert!(grid[2].center.y > grid[1].center.y);
    }

    #[test]
    fn test_selection_reaches_delegate_from_active_picker() {
        let (_palette, selections, mut pickers) = setup(4);
        pickers.switch_to(PickerKind::Radial, false, Box::new(|| {}));
        pickers.tick(ms(10));

        // inside the first wedge, just below the center line
        pickers.active_mut().pointer_down(Point::new(250.0, 210.0));
        pickers.active_mut().pointer_up();

        assert_eq!(*selections.0.borrow(), vec![PickerKind::Radial]);
    }

    #[test]
    fn test_frame_clock_starts_at_first_frame() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.elapsed(5_000_000), Duration::ZERO);
        assert_eq!(clock.elapsed(5_250_000), ms(250));
        // frame times never run backwards, but don't underflow if they do
        assert_eq!(clock.elapsed(4_000_000), Duration::ZERO);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(HexColor::from(HuePalette::hue_color(0, 3)).to_string(), "#ff0000");
        assert_eq!(HexColor::from(HuePalette::hue_color(1, 3)).to_string(), "#00ff00");
        assert_eq!(
            HexColor::from(Color::new(0.5, 0.25, 1.0, 0.3)).to_string(),
            "#8040ff"
        );
    }
}
