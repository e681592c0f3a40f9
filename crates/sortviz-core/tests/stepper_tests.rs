use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sortviz_core::clock::SimulatedClock;
use sortviz_core::delay::Speed;
use sortviz_core::signal::StepSignal;
use sortviz_core::stepper::{CancelFlag, Cursor, Resume, SortStepper};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fast() -> Speed {
    Speed::clamped(200, &(1..=200))
}

/// Resume until the stepper stops yielding, collecting every signal.
fn drive(
    stepper: &mut SortStepper,
    values: &mut [u32],
    clock: &SimulatedClock,
) -> (Resume, Vec<StepSignal>) {
    let mut signals = Vec::new();
    for _ in 0..1_000_000 {
        let r = stepper.resume(values, clock, fast(), |s| signals.push(s));
        if r != Resume::Yielded {
            return (r, signals);
        }
    }
    panic!("stepper never finished");
}

fn sorted(values: &[u32]) -> Vec<u32> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v
}

fn compare_starts(signals: &[StepSignal]) -> Vec<usize> {
    signals
        .iter()
        .filter_map(|s| match s {
            StepSignal::CompareStart { left, .. } => Some(*left),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correctness
// ---------------------------------------------------------------------------

#[test]
fn test_random_arrays_end_sorted_and_permuted() {
    let mut rng = StdRng::seed_from_u64(42);
    let clock = SimulatedClock::new(1.0);
    for len in [2usize, 3, 7, 16, 33] {
        let original: Vec<u32> = (0..len).map(|_| rng.gen_range(100..=1000)).collect();
        let mut values = original.clone();
        let mut stepper = SortStepper::new(len, CancelFlag::new());

        let (r, signals) = drive(&mut stepper, &mut values, &clock);

        assert_eq!(r, Resume::Complete);
        assert_eq!(values, sorted(&original), "len {len}");
        assert_eq!(signals.last(), Some(&StepSignal::Complete));
        assert_eq!(stepper.comparisons() as usize, len * (len - 1) / 2);
    }
}

#[test]
fn test_suffix_is_final_after_each_pass() {
    let mut rng = StdRng::seed_from_u64(9);
    let clock = SimulatedClock::new(1.0);
    let len = 12;
    let mut values: Vec<u32> = (0..len).map(|_| rng.gen_range(100..=1000)).collect();
    let expected = sorted(&values);
    let mut stepper = SortStepper::new(len, CancelFlag::new());
    let mut checked = vec![false; len];

    loop {
        let r = stepper.resume(&mut values, &clock, fast(), |_| {});
        let Cursor { pass, index } = stepper.cursor();
        if r == Resume::Yielded && index + pass + 1 >= len && !checked[pass] {
            checked[pass] = true;
            let tail = len - pass - 1;
            assert_eq!(&values[tail..], &expected[tail..], "after pass {pass}");
        }
        if r != Resume::Yielded {
            break;
        }
    }
    assert!(checked[..len - 1].iter().all(|&c| c), "every comparing pass checked");
}

#[test]
fn test_textbook_scenario() {
    let clock = SimulatedClock::new(1.0);
    let mut values = vec![500, 300, 400, 100, 200];
    let mut stepper = SortStepper::new(5, CancelFlag::new());

    let (r, signals) = drive(&mut stepper, &mut values, &clock);

    assert_eq!(r, Resume::Complete);
    assert_eq!(values, vec![100, 200, 300, 400, 500]);
    // four passes with 4, 3, 2, 1 comparisons
    assert_eq!(compare_starts(&signals), vec![0, 1, 2, 3, 0, 1, 2, 0, 1, 0]);
    // one swap per inversion
    assert_eq!(stepper.swaps(), 8);
    let swaps = signals.iter().filter(|s| matches!(s, StepSignal::Swap { .. })).count();
    assert_eq!(swaps, 8);
}

#[test]
fn test_pair_signal_order() {
    let clock = SimulatedClock::new(1.0);
    let mut values = vec![2, 1];
    let mut stepper = SortStepper::new(2, CancelFlag::new());

    let (_, signals) = drive(&mut stepper, &mut values, &clock);

    assert_eq!(
        signals,
        vec![
            StepSignal::CompareStart { left: 0, right: 1 },
            StepSignal::PointerMove { index: 0 },
            StepSignal::PointerMove { index: 1 },
            StepSignal::Swap { left: 0, right: 1, values: [1, 2] },
            StepSignal::CompareEnd { left: 0, right: 1 },
            StepSignal::Complete,
        ]
    );
}

#[test]
fn test_sorted_input_never_swaps() {
    let clock = SimulatedClock::new(1.0);
    let mut values = vec![100, 200, 300, 400];
    let mut stepper = SortStepper::new(4, CancelFlag::new());
    let (_, signals) = drive(&mut stepper, &mut values, &clock);
    assert!(!signals.iter().any(|s| matches!(s, StepSignal::Swap { .. })));
    assert_eq!(stepper.swaps(), 0);
}

#[test]
fn test_equal_values_are_stable() {
    let clock = SimulatedClock::new(1.0);
    let mut values = vec![300, 300, 300];
    let mut stepper = SortStepper::new(3, CancelFlag::new());
    drive(&mut stepper, &mut values, &clock);
    assert_eq!(stepper.swaps(), 0);
}

// ---------------------------------------------------------------------------
// Speed changes
// ---------------------------------------------------------------------------

#[test]
fn test_speed_change_applies_from_next_wait() {
    let clock = SimulatedClock::new(0.0);
    let slow = Speed::clamped(1, &(1..=200));
    let mut values = vec![3, 1, 2];
    let mut stepper = SortStepper::new(3, CancelFlag::new());
    let mut signals = Vec::new();

    // Compare wait starts at the slow speed.
    stepper.resume(&mut values, &clock, slow, |s| signals.push(s));
    assert_eq!(signals.len(), 2);

    // Past the fast delay but well inside the slow one: still waiting.
    clock.advance(fast().delay_ms() + 0.01);
    assert_eq!(stepper.resume(&mut values, &clock, fast(), |s| signals.push(s)), Resume::Yielded);
    assert_eq!(signals.len(), 2);
    assert_eq!(values, vec![3, 1, 2]);

    // Once the slow delay has passed, the pointer wait uses the new speed.
    clock.advance(slow.delay_ms());
    stepper.resume(&mut values, &clock, fast(), |s| signals.push(s));
    assert_eq!(signals[2], StepSignal::PointerMove { index: 1 });
    assert_eq!(signals.len(), 3);

    clock.advance(fast().delay_ms() / 2.0 + 0.01);
    stepper.resume(&mut values, &clock, fast(), |s| signals.push(s));
    assert_eq!(values, vec![1, 3, 2]);
    assert_eq!(signals.last(), Some(&StepSignal::CompareEnd { left: 0, right: 1 }));

    // The next compare wait is fast from the start.
    stepper.resume(&mut values, &clock, fast(), |s| signals.push(s));
    assert_eq!(signals.last(), Some(&StepSignal::PointerMove { index: 1 }));
    clock.advance(fast().delay_ms() + 0.01);
    stepper.resume(&mut values, &clock, fast(), |s| signals.push(s));
    assert_eq!(signals.last(), Some(&StepSignal::PointerMove { index: 2 }));
}

// ---------------------------------------------------------------------------
// Cancellation and continuation
// ---------------------------------------------------------------------------

#[test]
fn test_cancel_mid_run_preserves_multiset() {
    let mut rng = StdRng::seed_from_u64(3);
    let clock = SimulatedClock::new(1.0);
    for cut in [1usize, 5, 17, 42, 77] {
        let original: Vec<u32> = (0..10).map(|_| rng.gen_range(100..=1000)).collect();
        let mut values = original.clone();
        let cancel = CancelFlag::new();
        let mut stepper = SortStepper::new(10, cancel.clone());

        for _ in 0..cut {
            stepper.resume(&mut values, &clock, fast(), |_| {});
        }
        cancel.cancel();
        let mut signals = Vec::new();
        let r = stepper.resume(&mut values, &clock, fast(), |s| signals.push(s));

        assert_eq!(r, Resume::Cancelled);
        assert_eq!(signals, vec![StepSignal::Cleared]);
        assert_eq!(sorted(&values), sorted(&original), "cut at {cut}");
    }
}

#[test]
fn test_continuing_from_cursor_matches_uninterrupted_run() {
    let mut rng = StdRng::seed_from_u64(11);
    let clock = SimulatedClock::new(1.0);
    let original: Vec<u32> = (0..9).map(|_| rng.gen_range(100..=1000)).collect();

    let mut reference = original.clone();
    let mut whole = SortStepper::new(9, CancelFlag::new());
    let (_, whole_signals) = drive(&mut whole, &mut reference, &clock);

    for cut in [3usize, 20, 41, 77] {
        let mut values = original.clone();
        let cancel = CancelFlag::new();
        let mut first = SortStepper::new(9, cancel.clone());
        let mut signals = Vec::new();
        for _ in 0..cut {
            first.resume(&mut values, &clock, fast(), |s| signals.push(s));
        }
        cancel.cancel();
        first.resume(&mut values, &clock, fast(), |_| {});

        let mut second = SortStepper::starting_at(9, first.cursor(), CancelFlag::new());
        let (r, rest) = drive(&mut second, &mut values, &clock);

        assert_eq!(r, Resume::Complete);
        assert_eq!(values, reference, "cut at {cut}");
        assert_eq!(first.swaps() + second.swaps(), whole.swaps(), "cut at {cut}");

        // a pair interrupted mid-wait is compared again from its start
        let mut starts = compare_starts(&signals);
        let resumed = compare_starts(&rest);
        if let (Some(&last), Some(&next)) = (starts.last(), resumed.first()) {
            if last == next && first.cursor().index == last {
                starts.pop();
            }
        }
        starts.extend(resumed);
        assert_eq!(starts, compare_starts(&whole_signals), "cut at {cut}");
    }
}
