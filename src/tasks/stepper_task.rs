use embassy_executor::task;
use embassy_time::{Duration, Ticker};

use crate::drivers::stepper::{StepperMotor, STEP_TICK_HZ};

/// Step pulse generation for both wheels.
#[task]
pub async fn stepper_task(mut left: StepperMotor, mut right: StepperMotor) {
    let mut ticker = Ticker::every(Duration::from_hz(STEP_TICK_HZ));
    loop {
        ticker.next().await;
        left.tick();
        right.tick();
    }
}
