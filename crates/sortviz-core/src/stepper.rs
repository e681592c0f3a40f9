use crate::clock::Clock;
use crate::delay::Speed;
use crate::signal::StepSignal;
use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag, checked by the stepper at every suspension point.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Position of the next pair the stepper will compare: outer pass `pass`,
/// comparing elements `index` and `index + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub pass: usize,
    pub index: usize,
}

/// Result of one [`SortStepper::resume`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Suspended at a step boundary; call `resume` again.
    Yielded,
    /// The sort finished. Returned on every call after completion.
    Complete,
    /// Cancellation was observed. Returned on every call after cancellation.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Begin,
    /// Both elements highlighted; waiting out the compare delay.
    Compare { started: f64, wait: f64 },
    /// Pointer on the second element; waiting out the half delay.
    Pointer { started: f64, wait: f64 },
    Done(Resume),
}

/// Bubble sort as an explicit, resumable state machine.
///
/// Each call to [`resume`](Self::resume) runs until the next suspension
/// point. The stepper does not own the element array; the caller lends it on
/// every call, and it is the only writer while the stepper is live. A stepper
/// is one-shot: once it reports `Complete` or `Cancelled` it stays that way.
pub struct SortStepper {
    len: usize,
    cursor: Cursor,
    phase: Phase,
    cancel: CancelFlag,
    comparisons: u64,
    swaps: u64,
}

impl SortStepper {
    pub fn new(len: usize, cancel: CancelFlag) -> Self {
        Self::starting_at(len, Cursor::default(), cancel)
    }

    /// Start at `cursor` instead of the first pair.
    ///
    /// Valid only when every pair before `cursor` has been processed on the
    /// same array, e.g. the cursor of a cancelled stepper.
    pub fn starting_at(len: usize, cursor: Cursor, cancel: CancelFlag) -> Self {
        Self {
            len,
            cursor,
            phase: Phase::Begin,
            cancel,
            comparisons: 0,
            swaps: 0,
        }
    }

    /// The first pair not yet fully processed.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Advance to the next suspension point.
    ///
    /// `speed` is read only when a wait begins, so a change lands on the next
    /// wait rather than the current one.
    pub fn resume<C, F>(
        &mut self,
        values: &mut [u32],
        clock: &C,
        speed: Speed,
        mut emit: F,
    ) -> Resume
    where
        C: Clock + ?Sized,
        F: FnMut(StepSignal),
    {
        if let Phase::Done(outcome) = self.phase {
            return outcome;
        }
        if self.cancel.is_cancelled() {
            emit(StepSignal::Cleared);
            self.phase = Phase::Done(Resume::Cancelled);
            return Resume::Cancelled;
        }
        debug_assert_eq!(values.len(), self.len, "element array resized under a live stepper");

        loop {
            match self.phase {
                Phase::Begin => {
                    self.normalize_cursor();
                    if self.cursor.pass >= self.len {
                        emit(StepSignal::Complete);
                        self.phase = Phase::Done(Resume::Complete);
                        return Resume::Complete;
                    }
                    let j = self.cursor.index;
                    emit(StepSignal::CompareStart { left: j, right: j + 1 });
                    emit(StepSignal::PointerMove { index: j });
                    self.comparisons += 1;
                    self.phase = Phase::Compare {
                        started: clock.now_ms(),
                        wait: speed.delay_ms(),
                    };
                }
                Phase::Compare { started, wait } => {
                    if clock.now_ms() - started < wait {
                        return Resume::Yielded;
                    }
                    emit(StepSignal::PointerMove {
                        index: self.cursor.index + 1,
                    });
                    self.phase = Phase::Pointer {
                        started: clock.now_ms(),
                        wait: speed.delay_ms() / 2.0,
                    };
                }
                Phase::Pointer { started, wait } => {
                    if clock.now_ms() - started < wait {
                        return Resume::Yielded;
                    }
                    let j = self.cursor.index;
                    if values[j] > values[j + 1] {
                        values.swap(j, j + 1);
                        self.swaps += 1;
                        emit(StepSignal::Swap {
                            left: j,
                            right: j + 1,
                            values: [values[j], values[j + 1]],
                        });
                    }
                    emit(StepSignal::CompareEnd { left: j, right: j + 1 });
                    self.cursor.index += 1;
                    self.phase = Phase::Begin;
                    return Resume::Yielded;
                }
                Phase::Done(outcome) => return outcome,
            }
        }
    }

    /// Roll the cursor forward past exhausted passes.
    fn normalize_cursor(&mut self) {
        while self.cursor.pass < self.len && self.cursor.index + self.cursor.pass + 1 >= self.len {
            self.cursor.pass += 1;
            self.cursor.index = 0;
        }
    }
}
