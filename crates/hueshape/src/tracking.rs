use crate::wedge::ShapeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    #[default]
    Idle,
    Tracking(ShapeId),
}

/// What a pointer sample means relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTransition {
    /// shape -> different shape
    Between { from: ShapeId, to: ShapeId },
    /// shape -> same shape
    Within(ShapeId),
    /// shape -> empty space
    Exited(ShapeId),
    /// empty space -> shape
    Entered(ShapeId),
    /// empty space -> empty space
    Outside,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    state: TouchState,
    pressed: bool,
    restored_last_touched: bool,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            state: TouchState::Idle,
            pressed: false,
            restored_last_touched: true,
        }
    }
}

impl Tracker {
    pub fn state(&self) -> TouchState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Starts a gesture. Moves only count between a press and its release.
    pub fn pressed(&mut self, hit: Option<ShapeId>) -> TouchTransition {
        self.pressed = true;
        self.moved(hit)
    }

    pub fn moved(&mut self, hit: Option<ShapeId>) -> TouchTransition {
        if !self.pressed {
            return TouchTransition::Outside;
        }
        match (self.state, hit) {
            (TouchState::Tracking(from), Some(to)) if from != to => {
                self.state = TouchState::Tracking(to);
                TouchTransition::Between { from, to }
            }
            (TouchState::Tracking(id), Some(_)) => TouchTransition::Within(id),
            (TouchState::Idle, Some(id)) => {
                self.state = TouchState::Tracking(id);
                self.restored_last_touched = false;
                TouchTransition::Entered(id)
            }
            (TouchState::Tracking(id), None) => {
                self.state = TouchState::Idle;
                if self.restored_last_touched {
                    TouchTransition::Outside
                } else {
                    self.restored_last_touched = true;
                    TouchTransition::Exited(id)
                }
            }
            (TouchState::Idle, None) => TouchTransition::Outside,
        }
    }

    /// Ends the gesture, returning the shape that must be restored.
    pub fn released(&mut self) -> Option<ShapeId> {
        self.pressed = false;
        let TouchState::Tracking(id) = std::mem::take(&mut self.state) else {
            return None;
        };
        self.restored_last_touched = true;
        Some(id)
    }

    /// Drops tracking of a shape that left the collection.
    pub fn forget(&mut self, id: ShapeId) {
        if self.state == TouchState::Tracking(id) {
            self.state = TouchState::Idle;
            self.pressed = false;
            self.restored_last_touched = true;
        }
    }
}
