use embassy_stm32::gpio::{AnyPin, Level, Output, Speed};

use slope_follower::hal::Indicator;

/// Green body LED, lit while an escape maneuver runs.
pub struct BodyLed {
    pin: Output<'static, AnyPin>,
}

impl BodyLed {
    pub fn new(pin: AnyPin) -> Self {
        Self {
            pin: Output::new(pin, Level::Low, Speed::Low),
        }
    }
}

impl Indicator for BodyLed {
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
