use embassy_executor::task;

use slope_follower::config::{ControlConfig, CONTROL_PERIOD};
use slope_follower::control::motion::MotionController;
use slope_follower::jobs::MotionJob;
use slope_follower::scheduler::run_periodic;

use crate::drivers::led::BodyLed;
use crate::drivers::stepper::SharedDrivetrain;
use crate::{ALERT, MODE, SLOPE};

/// Motion control task, 100 Hz. The regulator gains assume this period.
#[task]
pub async fn motion_task(led: BodyLed) {
    defmt::info!("motion task started");
    let job = MotionJob::new(
        MotionController::new(ControlConfig::default()),
        SharedDrivetrain,
        led,
        &SLOPE,
        &ALERT,
        &MODE,
    );
    run_periodic(CONTROL_PERIOD, job).await
}
