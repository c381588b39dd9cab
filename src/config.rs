//! Tuning constants for the slope follower.
//!
//! Every magic number of the control loop lives here. `ControlConfig`
//! bundles the runtime-tunable ones so tests can run the controller with
//! other gains; window sizes are const generics and stay compile-time.

use embassy_time::Duration;

// ── Task periods ─────────────────────────────────────────────────────────────

/// Angle estimation period.
pub const ANGLE_PERIOD: Duration = Duration::from_millis(10);
/// Proximity evaluation period.
pub const PROXIMITY_PERIOD: Duration = Duration::from_millis(100);
/// Motion control period. The regulator gains are tuned for this rate.
pub const CONTROL_PERIOD: Duration = Duration::from_millis(10);
/// Serial status line period.
pub const TELEMETRY_PERIOD: Duration = Duration::from_millis(500);

// ── Moving average windows ───────────────────────────────────────────────────

pub const INCLINATION_WINDOW: usize = 10;
pub const ANGLE_WINDOW: usize = 10;
pub const SPEED_WINDOW: usize = 10;

// ── Slope detection ──────────────────────────────────────────────────────────

/// Smoothed |z| (LSB, offset-corrected) at or below which the surface is flat.
pub const INCL_LIMIT: i16 = 60;

// ── Regulator ────────────────────────────────────────────────────────────────

pub const KP: f32 = 5.0;
pub const KI: f32 = 0.1;
pub const KD: f32 = 0.0;

/// Forward speed while tracking the slope (steps/s).
pub const BASE_SPEED: i16 = 500;
/// Regulator output saturation (steps/s).
pub const SPEED_MAX: i16 = 2 * BASE_SPEED;
/// Heading the regulator tracks: straight down-slope.
pub const TARGET_ANGLE: i16 = 0;

// ── Drivetrain ───────────────────────────────────────────────────────────────

/// Hard limit of the stepper drivers (steps/s). Also the escape rotation speed.
pub const MOTOR_SPEED_LIMIT: i16 = 1100;
/// Motor steps for one full in-place turn of the robot.
pub const STEPS_PER_TURN: i32 = 1320;

// ── Proximity ────────────────────────────────────────────────────────────────

/// Calibrated reading above which a sensor may raise an alert.
pub const PROX_THRESHOLD: u16 = 800;

/// Share of a full turn (percent) for the escape from each zone, indexed
/// RightSide, RightCenter, RightFront, LeftFront, LeftCenter, LeftSide.
pub const ESCAPE_TURN_PERCENT: [u8; 6] = [25, 38, 50, 50, 38, 25];

// ── Runtime bundle ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlConfig {
    pub incl_limit: i16,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub base_speed: i16,
    pub speed_max: i16,
    pub target_angle: i16,
    pub escape_speed: i16,
    pub steps_per_turn: i32,
    pub prox_threshold: u16,
    pub escape_turn_percent: [u8; 6],
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            incl_limit: INCL_LIMIT,
            kp: KP,
            ki: KI,
            kd: KD,
            base_speed: BASE_SPEED,
            speed_max: SPEED_MAX,
            target_angle: TARGET_ANGLE,
            escape_speed: MOTOR_SPEED_LIMIT,
            steps_per_turn: STEPS_PER_TURN,
            prox_threshold: PROX_THRESHOLD,
            escape_turn_percent: ESCAPE_TURN_PERCENT,
        }
    }
}
