use crate::picker::ColorPicker;
use palette::{FromColor, Hsv, Srgb, Srgba, WithAlpha};
use std::cell::Cell;

pub type Color = Srgba<f64>;

pub const DEFAULT_COLOR: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const DEFAULT_MAX_COLUMNS: usize = 4;

/// Supplies the colors shown by a picker.
///
/// Queried live on every layout and reload, never cached, so answers must be
/// consistent for the duration of one pass.
pub trait ColorSource {
    fn number_of_colors(&self) -> usize;

    /// Only called with `index < number_of_colors()`.
    fn color(&self, index: usize) -> Color;
}

pub trait GridColorSource: ColorSource {
    /// Maximum number of circles in one grid row.
    fn max_columns(&self) -> usize;
}

pub trait PickerDelegate {
    fn did_select(&self, color: Color, picker: &dyn ColorPicker);
}

pub(crate) fn color_count<S: ColorSource + ?Sized>(source: Option<&S>, fallback: usize) -> usize {
    source.map_or(fallback, |s| s.number_of_colors())
}

pub(crate) fn color_at<S: ColorSource + ?Sized>(source: Option<&S>, index: usize) -> Color {
    match source {
        Some(s) if index < s.number_of_colors() => s.color(index),
        Some(_) => {
            log::warn!("Color index {} out of range, using default", index);
            DEFAULT_COLOR
        }
        None => DEFAULT_COLOR,
    }
}

/// Evenly spaced hues at full saturation and brightness.
#[derive(Debug)]
pub struct HuePalette {
    count: Cell<usize>,
    max_columns: Cell<usize>,
}

impl HuePalette {
    pub fn new(count: usize, max_columns: usize) -> Self {
        Self {
            count: Cell::new(count),
            max_columns: Cell::new(max_columns.max(1)),
        }
    }

    pub fn set_count(&self, count: usize) {
        self.count.set(count);
    }

    pub fn set_max_columns(&self, max_columns: usize) {
        self.max_columns.set(max_columns.max(1));
    }

    pub fn hue_color(index: usize, count: usize) -> Color {
        let hue = 360.0 * index as f64 / count.max(1) as f64;
        let hsv = Hsv::<palette::encoding::Srgb, f64>::new(hue, 1.0, 1.0);
        Srgb::<f64>::from_color(hsv).with_alpha(1.0)
    }
}

impl Default for HuePalette {
    fn default() -> Self {
        Self::new(16, DEFAULT_MAX_COLUMNS)
    }
}

impl ColorSource for HuePalette {
    fn number_of_colors(&self) -> usize {
        self.count.get()
    }

    fn color(&self, index: usize) -> Color {
        Self::hue_color(index, self.count.get())
    }
}

impl GridColorSource for HuePalette {
    fn max_columns(&self) -> usize {
        self.max_columns.get()
    }
}
