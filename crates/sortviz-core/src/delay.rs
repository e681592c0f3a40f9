use crate::error::SpeedError;
use std::ops::RangeInclusive;

/// Wait in milliseconds for a given speed setting.
///
/// Up to 100 the delay falls linearly from 266.7 ms to 3.33 ms. Above 100 it
/// runs from a 2.5 ms baseline down to 1.25 ms at 200. Callers clamp the
/// input; this function does not.
pub fn delay_ms(speed: f64) -> f64 {
    if speed <= 100.0 {
        (5.0 + (100.0 - speed) * 4.0) / 1.5
    } else {
        let baseline = 2.5;
        let floor = baseline / 2.0;
        baseline - ((speed - 100.0) / 100.0) * (baseline - floor)
    }
}

/// A validated speed setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u32);

impl Speed {
    /// Strict constructor: rejects values outside `range`.
    pub fn new(value: i64, range: &RangeInclusive<u32>) -> Result<Self, SpeedError> {
        let (min, max) = (*range.start(), *range.end());
        if value < min as i64 || value > max as i64 {
            return Err(SpeedError { value, min, max });
        }
        Ok(Self(value as u32))
    }

    /// Boundary helper for UI input: clamps into `range`.
    pub fn clamped(value: i64, range: &RangeInclusive<u32>) -> Self {
        let (min, max) = (*range.start() as i64, *range.end() as i64);
        Self(value.clamp(min, max) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn delay_ms(self) -> f64 {
        delay_ms(self.0 as f64)
    }
}
