use sortviz_core::clock::SimulatedClock;
use sortviz_core::delay::Speed;
use sortviz_core::pump::FramePump;
use sortviz_core::signal::StepSignal;
use sortviz_core::stepper::{CancelFlag, Resume, SortStepper};

const INPUT: [u32; 8] = [810, 120, 560, 430, 990, 270, 640, 150];

/// Sort `INPUT` with the given per-frame budgets (cycled), returning the
/// signal stream and the number of frames used.
fn run_with_budgets(budgets: &[f64]) -> (Vec<StepSignal>, usize) {
    let clock = SimulatedClock::new(0.5);
    let speed = Speed::clamped(150, &(1..=200));
    let mut values = INPUT.to_vec();
    let mut stepper = SortStepper::new(values.len(), CancelFlag::new());
    let mut pump = FramePump::new(budgets[0]);
    let mut signals = Vec::new();

    for frame in 0..100_000 {
        pump.budget_ms = budgets[frame % budgets.len()];
        let stats = pump.pump(&clock, || {
            stepper.resume(&mut values, &clock, speed, |s| signals.push(s))
        });
        if stats.exhausted {
            assert_eq!(stats.outcome, Some(Resume::Complete));
            return (signals, frame + 1);
        }
    }
    panic!("sort never completed");
}

#[test]
fn test_frame_jitter_neither_skips_nor_repeats_steps() {
    let (steady, steady_frames) = run_with_budgets(&[16.7]);
    let (jittery, jittery_frames) = run_with_budgets(&[2.0, 30.0, 0.5, 16.7, 9.0]);
    let (huge, huge_frames) = run_with_budgets(&[1.0e9]);

    assert_eq!(steady, jittery);
    assert_eq!(steady, huge);
    assert_eq!(huge_frames, 1);
    assert!(steady_frames > 1 && jittery_frames > 1);
}

#[test]
fn test_elapsed_is_bounded_by_budget_plus_one_step() {
    let clock = SimulatedClock::new(0.25);
    let speed = Speed::clamped(1, &(1..=200));
    let mut values = INPUT.to_vec();
    let mut stepper = SortStepper::new(values.len(), CancelFlag::new());
    let mut pump = FramePump::new(16.7);

    for _ in 0..200 {
        let stats = pump.pump(&clock, || stepper.resume(&mut values, &clock, speed, |_| {}));
        // past the budget: at most three reads in the last resume, the
        // budget check and the final elapsed read
        assert!(stats.elapsed_ms <= 16.7 + 5.0 * 0.25, "{}", stats.elapsed_ms);
    }
}

#[test]
fn test_cancellation_exhausts_the_pump() {
    let clock = SimulatedClock::new(1.0);
    let speed = Speed::clamped(100, &(1..=200));
    let cancel = CancelFlag::new();
    let mut values = INPUT.to_vec();
    let mut stepper = SortStepper::new(values.len(), cancel.clone());
    let mut pump = FramePump::new(16.7);

    let stats = pump.pump(&clock, || stepper.resume(&mut values, &clock, speed, |_| {}));
    assert!(!stats.exhausted);

    cancel.cancel();
    let stats = pump.pump(&clock, || stepper.resume(&mut values, &clock, speed, |_| {}));
    assert!(stats.exhausted);
    assert_eq!(stats.outcome, Some(Resume::Cancelled));
    assert_eq!(stats.steps, 1);
}
