//! Slope direction from the accelerometer.
//!
//! The vertical axis gates the estimate: on a flat surface the horizontal
//! components carry only noise, so the angle is pinned to 0. Otherwise the
//! horizontal components give the direction of steepest descent, rotated
//! into the robot's heading convention (accelerometer axes are mounted
//! rotated relative to the body).

#[cfg(not(test))]
use micromath::F32Ext;

use crate::config::{ANGLE_WINDOW, INCLINATION_WINDOW};
use crate::control::filter::MovingAverage;
use crate::state::{AccelerationSample, SlopeReading};

pub struct AngleEstimator {
    incl_limit: i16,
    inclination: MovingAverage<INCLINATION_WINDOW>,
    angle: MovingAverage<ANGLE_WINDOW>,
    flat: bool,
}

impl AngleEstimator {
    pub fn new(incl_limit: i16) -> Self {
        Self {
            incl_limit: incl_limit.saturating_abs(),
            inclination: MovingAverage::new(),
            angle: MovingAverage::new(),
            flat: true,
        }
    }

    /// Fold one sample into the estimate.
    pub fn estimate(&mut self, sample: AccelerationSample) -> SlopeReading {
        let inclination = self.inclination.update(sample.z).saturating_abs();
        let flat = inclination <= self.incl_limit;

        if flat != self.flat {
            debug!("slope gate: flat={} inclination={}", flat, inclination);
            self.flat = flat;
        }

        if flat {
            return SlopeReading::LEVEL;
        }

        let corrected = slope_angle(sample.x, sample.y);
        SlopeReading {
            angle: self.angle.update(corrected),
            flat: false,
        }
    }
}

/// Heading of the down-slope direction for horizontal components `x`, `y`.
///
/// Result lies in (−180, 180]. `x == 0` has no arctangent; it resolves to the
/// limit of the dial formulas: 180 when `y > 0`, otherwise 0. `y == 0` takes
/// the same formulas as its neighbours (−90 for `x > 0`, +90 for `x < 0`).
///
/// Both axis cases are chosen for continuity and are intended. Reading
/// `atan(±inf)` literally would give ±90 on the `y` axis, and a strict
/// four-dial split would give 0 on the `x` axis. Either one jumps when the
/// slope direction crosses that axis.
pub fn slope_angle(x: i16, y: i16) -> i16 {
    if x == 0 {
        return if y > 0 { 180 } else { 0 };
    }

    let raw = (y as f32 / x as f32).atan().to_degrees() as i16;

    // Dials 1 and 4 (x > 0) and dials 2 and 3 (x < 0) share a formula.
    let angle = if x > 0 { -raw - 90 } else { -raw + 90 };

    if angle <= -180 {
        angle + 360
    } else {
        angle
    }
}
