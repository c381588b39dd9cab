use embassy_executor::task;
use embassy_time::Ticker;

use slope_follower::config::{PROXIMITY_PERIOD, PROX_THRESHOLD};
use slope_follower::control::proximity::ProximityMonitor;
use slope_follower::jobs::ProximityJob;
use slope_follower::scheduler::PeriodicJob;

use crate::drivers::ir_proximity::IrProximity;
use crate::ALERT;

/// Obstacle detection task, 10 Hz, sole writer of ALERT.
///
/// The IR frame is acquired with async settle waits before each run, so the
/// motion and stepper tasks keep running while the emitters pulse.
#[task]
pub async fn proximity_task(ir: IrProximity) {
    defmt::info!("proximity task started");
    let mut job = ProximityJob::new(ir, ProximityMonitor::new(PROX_THRESHOLD), &ALERT);
    let mut ticker = Ticker::every(PROXIMITY_PERIOD);
    loop {
        job.sensors_mut().acquire().await;
        job.run();
        ticker.next().await;
    }
}
