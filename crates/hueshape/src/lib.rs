//! Toolkit independent color picker controls.
//!
//! Two variants share one [`ColorPicker`] surface: [`RadialPicker`] splits a
//! disc into one wedge per color, [`GridPicker`] lays colors out as circles
//! in rows. Both are plain state machines driven by the host: pointer
//! events in, a frame clock through [`ColorPicker::tick`], and
//! [`WedgeFrame`]s out for whatever renderer the host uses.

pub mod animation;
pub mod geometry;
pub mod grid;
pub mod picker;
pub mod radial;
pub mod source;
pub mod stage;
pub mod tracking;
pub mod transaction;
pub mod wedge;

#[cfg(test)]
mod testing;

pub use geometry::{Point, Rect, Size};
pub use grid::{GridLayout, GridPicker};
pub use picker::{ColorPicker, PickerKind};
pub use radial::RadialPicker;
pub use source::{Color, ColorSource, GridColorSource, HuePalette, PickerDelegate};
pub use tracking::TouchState;
pub use transaction::Completion;
pub use wedge::{ShapeId, Wedge, WedgeFrame};
