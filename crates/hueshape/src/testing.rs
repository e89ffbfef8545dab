use crate::picker::{ColorPicker, PickerKind};
use crate::source::{Color, ColorSource, GridColorSource, PickerDelegate};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn gray(level: f64) -> Color {
    Color::new(level, level, level, 1.0)
}

/// Source backed by an explicit color list.
#[derive(Debug)]
pub struct ListSource {
    pub colors: RefCell<Vec<Color>>,
    pub max_columns: Cell<usize>,
}

impl ListSource {
    pub fn graded(count: usize) -> Rc<Self> {
        Rc::new(Self {
            colors: RefCell::new(Self::grades(count)),
            max_columns: Cell::new(4),
        })
    }

    pub fn grades(count: usize) -> Vec<Color> {
        (0..count).map(|i| gray(i as f64 / count as f64)).collect()
    }

    pub fn set_count(&self, count: usize) {
        *self.colors.borrow_mut() = Self::grades(count);
    }
}

impl ColorSource for ListSource {
    fn number_of_colors(&self) -> usize {
        self.colors.borrow().len()
    }

    fn color(&self, index: usize) -> Color {
        self.colors.borrow()[index]
    }
}

impl GridColorSource for ListSource {
    fn max_columns(&self) -> usize {
        self.max_columns.get()
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub selections: RefCell<Vec<(Color, PickerKind)>>,
}

impl PickerDelegate for Recorder {
    fn did_select(&self, color: Color, picker: &dyn ColorPicker) {
        self.selections.borrow_mut().push((color, picker.kind()));
    }
}

/// Completion that counts how often it ran.
pub fn counter() -> (Rc<Cell<usize>>, Box<dyn FnOnce()>) {
    let count = Rc::new(Cell::new(0));
    let inner = count.clone();
    (count, Box::new(move || inner.set(inner.get() + 1)))
}
