use embassy_executor::task;

use slope_follower::config::{ANGLE_PERIOD, INCL_LIMIT};
use slope_follower::control::angle::AngleEstimator;
use slope_follower::jobs::AngleJob;
use slope_follower::scheduler::run_periodic;

use crate::drivers::mpu9250::Mpu9250;
use crate::SLOPE;

/// Slope estimation task, 100 Hz, sole writer of SLOPE.
#[task]
pub async fn angle_task(imu: Mpu9250) {
    defmt::info!("angle task started");
    let job = AngleJob::new(imu, AngleEstimator::new(INCL_LIMIT), &SLOPE);
    run_periodic(ANGLE_PERIOD, job).await
}
