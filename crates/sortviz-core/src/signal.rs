/// Notifications emitted while the sort advances.
///
/// Indices are positions in the element array. A renderer translates these
/// into transient visual state (highlights, the pointer marker, bar heights).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepSignal {
    /// Elements `left` and `right` are now under comparison.
    CompareStart { left: usize, right: usize },
    /// The pointer marker moved to `index`.
    PointerMove { index: usize },
    /// `left` and `right` were exchanged; `values` holds their new contents.
    Swap {
        left: usize,
        right: usize,
        values: [u32; 2],
    },
    /// The comparison of `left` and `right` finished.
    CompareEnd { left: usize, right: usize },
    /// Every pair has been compared; the array is sorted.
    Complete,
    /// Drop any pointer or highlight state (cancellation, reset).
    Cleared,
}

impl StepSignal {
    /// Numeric tag used by flat record encodings.
    pub fn code(&self) -> i32 {
        match self {
            StepSignal::CompareStart { .. } => 0,
            StepSignal::PointerMove { .. } => 1,
            StepSignal::Swap { .. } => 2,
            StepSignal::CompareEnd { .. } => 3,
            StepSignal::Complete => 4,
            StepSignal::Cleared => 5,
        }
    }
}

/// Transient presentation state folded from the signal stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisualState {
    pub highlighted: Option<(usize, usize)>,
    pub pointer: Option<usize>,
    pub completed: bool,
}

impl VisualState {
    pub fn apply(&mut self, signal: &StepSignal) {
        match *signal {
            StepSignal::CompareStart { left, right } => self.highlighted = Some((left, right)),
            StepSignal::PointerMove { index } => self.pointer = Some(index),
            StepSignal::Swap { .. } => {}
            StepSignal::CompareEnd { .. } => {
                self.highlighted = None;
                self.pointer = None;
            }
            StepSignal::Complete => {
                self.highlighted = None;
                self.pointer = None;
                self.completed = true;
            }
            StepSignal::Cleared => *self = Self::default(),
        }
    }
}
