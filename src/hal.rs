//! Seams between the control core and the board.
//!
//! The firmware implements these for the e-puck2 drivers; tests implement
//! them with plain structs.

use crate::control::proximity::SENSOR_COUNT;
use crate::state::{AccelerationSample, Side};

/// Offset-corrected accelerometer.
pub trait Accelerometer {
    type Error;

    fn read_acceleration(&mut self) -> Result<AccelerationSample, Self::Error>;
}

/// Calibrated IR proximity frame, ordered RightSide .. LeftSide.
pub trait ProximitySensors {
    type Error;

    fn read_proximity(&mut self) -> Result<[u16; SENSOR_COUNT], Self::Error>;
}

/// Differential stepper drive.
pub trait Drivetrain {
    /// Signed step rate (steps/s); positive drives forward.
    fn set_speed(&mut self, side: Side, steps_per_s: i16);
    fn set_position(&mut self, side: Side, steps: i32);
    /// Steps counted since the last `set_position`.
    fn position(&self, side: Side) -> i32;
}

/// On/off status light.
pub trait Indicator {
    fn set(&mut self, on: bool);
}
