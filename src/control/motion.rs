//! Arbitration between slope tracking and obstacle escape.
//!
//! In `Normal` the regulator steers toward the down-slope heading. An alert
//! from the proximity monitor starts an in-place rotation away from the
//! obstacle; regulation resumes, with a cleared integral, once the wheels
//! have covered the step count of that rotation.

use crate::config::{ControlConfig, SPEED_WINDOW};
use crate::control::filter::MovingAverage;
use crate::control::regulator::Regulator;
use crate::hal::{Drivetrain, Indicator};
use crate::state::{MotionMode, ProximityAlertZone, Side, SlopeReading};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Counter-clockwise seen from above: left wheel back, right wheel forward.
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EscapeManeuver {
    pub target_steps: i32,
    pub rotation: Rotation,
}

impl EscapeManeuver {
    /// Rotation away from `zone`, `None` when there is nothing to escape.
    pub fn for_zone(
        zone: ProximityAlertZone,
        steps_per_turn: i32,
        turn_percent: &[u8; 6],
    ) -> Option<Self> {
        let (slot, rotation) = match zone {
            ProximityAlertZone::None => return None,
            ProximityAlertZone::RightSide => (0, Rotation::Left),
            ProximityAlertZone::RightCenter => (1, Rotation::Left),
            ProximityAlertZone::RightFront => (2, Rotation::Left),
            ProximityAlertZone::LeftFront => (3, Rotation::Right),
            ProximityAlertZone::LeftCenter => (4, Rotation::Right),
            ProximityAlertZone::LeftSide => (5, Rotation::Right),
        };

        Some(Self {
            target_steps: steps_per_turn * turn_percent[slot] as i32 / 100,
            rotation,
        })
    }

    /// (left, right) wheel speeds for this rotation.
    fn wheel_speeds(&self, speed: i16) -> (i16, i16) {
        match self.rotation {
            Rotation::Left => (-speed, speed),
            Rotation::Right => (speed, -speed),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Normal,
    Escaping(EscapeManeuver),
}

pub struct MotionController {
    config: ControlConfig,
    regulator: Regulator,
    speed: MovingAverage<SPEED_WINDOW>,
    state: State,
}

impl MotionController {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            regulator: Regulator::new(config.kp, config.ki, config.kd, config.speed_max),
            speed: MovingAverage::new(),
            state: State::Normal,
            config,
        }
    }

    pub fn mode(&self) -> MotionMode {
        match self.state {
            State::Normal => MotionMode::Normal,
            State::Escaping(_) => MotionMode::Escaping,
        }
    }

    /// Maneuver in progress, if any.
    pub fn maneuver(&self) -> Option<EscapeManeuver> {
        match self.state {
            State::Normal => None,
            State::Escaping(m) => Some(m),
        }
    }

    pub fn regulator(&self) -> &Regulator {
        &self.regulator
    }

    /// One control period: read the latest snapshots, command the wheels.
    pub fn tick<D, I>(
        &mut self,
        slope: SlopeReading,
        alert: ProximityAlertZone,
        drive: &mut D,
        indicator: &mut I,
    ) -> MotionMode
    where
        D: Drivetrain,
        I: Indicator,
    {
        match self.state {
            State::Normal => {
                let escape = EscapeManeuver::for_zone(
                    alert,
                    self.config.steps_per_turn,
                    &self.config.escape_turn_percent,
                );
                match escape {
                    Some(maneuver) => self.start_escape(alert, maneuver, drive, indicator),
                    None => self.track(slope.angle, false, drive),
                }
            }
            State::Escaping(maneuver) => {
                let traveled = drive.position(Side::Left).saturating_abs();
                if traveled >= maneuver.target_steps {
                    info!("escape done after {} steps", traveled);
                    self.state = State::Normal;
                    self.track(slope.angle, true, drive);
                    indicator.set(false);
                }
            }
        }

        self.mode()
    }

    fn start_escape<D, I>(
        &mut self,
        zone: ProximityAlertZone,
        maneuver: EscapeManeuver,
        drive: &mut D,
        indicator: &mut I,
    ) where
        D: Drivetrain,
        I: Indicator,
    {
        info!(
            "obstacle {}: rotating {} for {} steps",
            zone,
            maneuver.rotation,
            maneuver.target_steps
        );

        drive.set_position(Side::Left, 0);
        drive.set_position(Side::Right, 0);
        // Steering history from before the rotation no longer applies.
        self.speed.reset();

        let (left, right) = maneuver.wheel_speeds(self.config.escape_speed);
        drive.set_speed(Side::Left, left);
        drive.set_speed(Side::Right, right);

        indicator.set(true);
        self.state = State::Escaping(maneuver);
    }

    fn track<D: Drivetrain>(&mut self, angle: i16, reset: bool, drive: &mut D) {
        let delta = self.regulator.step(angle, self.config.target_angle, reset);
        let delta = self.speed.update(delta);

        let base = self.config.base_speed;
        drive.set_speed(Side::Left, base.saturating_add(delta));
        drive.set_speed(Side::Right, base.saturating_sub(delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeDrive {
        speed: [i16; 2],
        position: [i32; 2],
    }

    fn slot(side: Side) -> usize {
        match side {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    impl Drivetrain for FakeDrive {
        fn set_speed(&mut self, side: Side, steps_per_s: i16) {
            self.speed[slot(side)] = steps_per_s;
        }

        fn set_position(&mut self, side: Side, steps: i32) {
            self.position[slot(side)] = steps;
        }

        fn position(&self, side: Side) -> i32 {
            self.position[slot(side)]
        }
    }

    #[derive(Default)]
    struct Led(bool);

    impl Indicator for Led {
        fn set(&mut self, on: bool) {
            self.0 = on;
        }
    }

    fn tilted(angle: i16) -> SlopeReading {
        SlopeReading { angle, flat: false }
    }

    #[test]
    fn escape_table_matches_zone_side_and_share() {
        let table = crate::config::ESCAPE_TURN_PERCENT;
        let cases = [
            (ProximityAlertZone::RightSide, 330, Rotation::Left),
            (ProximityAlertZone::RightCenter, 501, Rotation::Left),
            (ProximityAlertZone::RightFront, 660, Rotation::Left),
            (ProximityAlertZone::LeftFront, 660, Rotation::Right),
            (ProximityAlertZone::LeftCenter, 501, Rotation::Right),
            (ProximityAlertZone::LeftSide, 330, Rotation::Right),
        ];
        for (zone, steps, rotation) in cases {
            assert_eq!(
                EscapeManeuver::for_zone(zone, 1320, &table),
                Some(EscapeManeuver { target_steps: steps, rotation })
            );
        }
        assert_eq!(EscapeManeuver::for_zone(ProximityAlertZone::None, 1320, &table), None);
    }

    #[test]
    fn normal_tracking_splits_smoothed_delta_across_wheels() {
        let mut ctrl = MotionController::new(ControlConfig::default());
        let mut drive = FakeDrive::default();
        let mut led = Led::default();

        // 5 × 20 + 0.1 × 20 = 102, averaged over an empty window of 10.
        let mode = ctrl.tick(tilted(20), ProximityAlertZone::None, &mut drive, &mut led);
        assert_eq!(mode, MotionMode::Normal);
        assert_eq!(drive.speed, [510, 490]);
        assert!(!led.0);
    }

    #[test]
    fn level_ground_drives_straight() {
        let mut ctrl = MotionController::new(ControlConfig::default());
        let mut drive = FakeDrive::default();
        let mut led = Led::default();

        for _ in 0..5 {
            ctrl.tick(SlopeReading::LEVEL, ProximityAlertZone::None, &mut drive, &mut led);
        }
        assert_eq!(drive.speed, [500, 500]);
        assert_eq!(ctrl.regulator().integral(), 0.0);
    }

    #[test]
    fn right_front_obstacle_runs_a_half_turn_left() {
        let mut ctrl = MotionController::new(ControlConfig::default());
        let mut drive = FakeDrive::default();
        let mut led = Led::default();

        for _ in 0..30 {
            ctrl.tick(tilted(45), ProximityAlertZone::None, &mut drive, &mut led);
        }
        assert!(ctrl.regulator().integral() > 0.0);

        drive.position = [-4000, 4000];
        let mode = ctrl.tick(tilted(45), ProximityAlertZone::RightFront, &mut drive, &mut led);
        assert_eq!(mode, MotionMode::Escaping);
        assert_eq!(
            ctrl.maneuver(),
            Some(EscapeManeuver { target_steps: 660, rotation: Rotation::Left })
        );
        assert_eq!(drive.position, [0, 0]);
        assert_eq!(drive.speed, [-1100, 1100]);
        assert!(led.0);

        // Rotation continues untouched, whatever the inputs say.
        let integral = ctrl.regulator().integral();
        drive.position = [-659, 659];
        let mode = ctrl.tick(tilted(-90), ProximityAlertZone::LeftSide, &mut drive, &mut led);
        assert_eq!(mode, MotionMode::Escaping);
        assert_eq!(drive.speed, [-1100, 1100]);
        assert_eq!(ctrl.regulator().integral(), integral);

        drive.position = [-660, 660];
        let mode = ctrl.tick(tilted(45), ProximityAlertZone::None, &mut drive, &mut led);
        assert_eq!(mode, MotionMode::Normal);
        assert_eq!(ctrl.maneuver(), None);
        assert_eq!(ctrl.regulator().integral(), 0.0);
        assert!(!led.0);
        assert!(drive.speed[0] > 0 && drive.speed[1] > 0);
    }

    #[test]
    fn tracking_after_escape_starts_from_a_clean_speed_history() {
        let mut ctrl = MotionController::new(ControlConfig::default());
        let mut drive = FakeDrive::default();
        let mut led = Led::default();

        for _ in 0..30 {
            ctrl.tick(tilted(180), ProximityAlertZone::None, &mut drive, &mut led);
        }
        assert_eq!(drive.speed, [1500, -500]);

        ctrl.tick(tilted(180), ProximityAlertZone::RightFront, &mut drive, &mut led);
        drive.position = [-660, 660];

        // Heading now on target: no residual turn back toward the obstacle.
        for _ in 0..3 {
            ctrl.tick(tilted(0), ProximityAlertZone::None, &mut drive, &mut led);
            assert_eq!(drive.speed, [500, 500]);
        }
    }

    #[test]
    fn left_obstacle_rotates_right() {
        let mut ctrl = MotionController::new(ControlConfig::default());
        let mut drive = FakeDrive::default();
        let mut led = Led::default();

        ctrl.tick(tilted(0), ProximityAlertZone::LeftSide, &mut drive, &mut led);
        assert_eq!(drive.speed, [1100, -1100]);
        assert_eq!(
            ctrl.maneuver(),
            Some(EscapeManeuver { target_steps: 330, rotation: Rotation::Right })
        );

        drive.position = [331, -331];
        assert_eq!(
            ctrl.tick(tilted(0), ProximityAlertZone::LeftSide, &mut drive, &mut led),
            MotionMode::Normal
        );
        // A persisting alert restarts the maneuver on the next tick.
        assert_eq!(
            ctrl.tick(tilted(0), ProximityAlertZone::LeftSide, &mut drive, &mut led),
            MotionMode::Escaping
        );
        assert_eq!(drive.position, [0, 0]);
    }
}
