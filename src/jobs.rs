//! Periodic jobs wiring sensors, estimators and published snapshots.
//!
//! Each job is the body of one task. Jobs only touch the published values
//! they own (one writer each) and read the others as last-value snapshots,
//! which may be up to one producer period old.

use crate::control::angle::AngleEstimator;
use crate::control::motion::MotionController;
use crate::control::proximity::ProximityMonitor;
use crate::hal::{Accelerometer, Drivetrain, Indicator, ProximitySensors};
use crate::scheduler::PeriodicJob;
use crate::state::{MotionMode, ProximityAlertZone, Published, SlopeReading};

/// Accelerometer → slope estimate → `slope`.
pub struct AngleJob<'a, A: Accelerometer> {
    sensor: A,
    estimator: AngleEstimator,
    slope: &'a Published<SlopeReading>,
}

impl<'a, A: Accelerometer> AngleJob<'a, A> {
    pub fn new(sensor: A, estimator: AngleEstimator, slope: &'a Published<SlopeReading>) -> Self {
        Self {
            sensor,
            estimator,
            slope,
        }
    }
}

impl<A: Accelerometer> PeriodicJob for AngleJob<'_, A> {
    fn run(&mut self) {
        match self.sensor.read_acceleration() {
            Ok(sample) => self.slope.publish(self.estimator.estimate(sample)),
            Err(_) => warn!("accelerometer read failed, keeping last slope"),
        }
    }
}

/// IR frame → alert zone → `alert`.
pub struct ProximityJob<'a, P: ProximitySensors> {
    sensors: P,
    monitor: ProximityMonitor,
    alert: &'a Published<ProximityAlertZone>,
    last: ProximityAlertZone,
}

impl<'a, P: ProximitySensors> ProximityJob<'a, P> {
    pub fn new(
        sensors: P,
        monitor: ProximityMonitor,
        alert: &'a Published<ProximityAlertZone>,
    ) -> Self {
        Self {
            sensors,
            monitor,
            alert,
            last: ProximityAlertZone::None,
        }
    }

    /// Sensors that need an acquisition step before each run.
    pub fn sensors_mut(&mut self) -> &mut P {
        &mut self.sensors
    }
}

impl<P: ProximitySensors> PeriodicJob for ProximityJob<'_, P> {
    fn run(&mut self) {
        let readings = match self.sensors.read_proximity() {
            Ok(r) => r,
            Err(_) => {
                warn!("proximity read failed, keeping last alert");
                return;
            }
        };

        let zone = self.monitor.evaluate(&readings);
        if zone != self.last {
            if zone.is_alert() {
                debug!("obstacle in zone {} (readings {})", zone, readings);
            } else {
                debug!("obstacles cleared");
            }
            self.last = zone;
        }
        self.alert.publish(zone);
    }
}

/// Snapshots → motion controller → wheels; publishes the resulting mode.
pub struct MotionJob<'a, D: Drivetrain, I: Indicator> {
    controller: MotionController,
    drive: D,
    indicator: I,
    slope: &'a Published<SlopeReading>,
    alert: &'a Published<ProximityAlertZone>,
    mode: &'a Published<MotionMode>,
}

impl<'a, D: Drivetrain, I: Indicator> MotionJob<'a, D, I> {
    pub fn new(
        controller: MotionController,
        drive: D,
        indicator: I,
        slope: &'a Published<SlopeReading>,
        alert: &'a Published<ProximityAlertZone>,
        mode: &'a Published<MotionMode>,
    ) -> Self {
        Self {
            controller,
            drive,
            indicator,
            slope,
            alert,
            mode,
        }
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

}

impl<D: Drivetrain, I: Indicator> PeriodicJob for MotionJob<'_, D, I> {
    fn run(&mut self) {
        let mode = self.controller.tick(
            self.slope.latest(),
            self.alert.latest(),
            &mut self.drive,
            &mut self.indicator,
        );
        self.mode.publish(mode);
    }
}
