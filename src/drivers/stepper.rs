use core::sync::atomic::{AtomicI16, AtomicI32, Ordering};

use embassy_stm32::gpio::{AnyPin, Level, Output, Speed};

use slope_follower::config::MOTOR_SPEED_LIMIT;
use slope_follower::hal::Drivetrain;
use slope_follower::state::Side;

/// Step pulse generator rate. Must stay well above MOTOR_SPEED_LIMIT.
pub const STEP_TICK_HZ: u64 = 10_000;

/// Coil pattern of one full-step cycle (A, B, C, D).
const PHASES: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Command and feedback of one motor, shared between the control loop and
/// the stepping task.
pub struct MotorShared {
    speed: AtomicI16,
    position: AtomicI32,
}

impl MotorShared {
    pub const fn new() -> Self {
        Self {
            speed: AtomicI16::new(0),
            position: AtomicI32::new(0),
        }
    }
}

pub static LEFT_MOTOR: MotorShared = MotorShared::new();
pub static RIGHT_MOTOR: MotorShared = MotorShared::new();

fn shared(side: Side) -> &'static MotorShared {
    match side {
        Side::Left => &LEFT_MOTOR,
        Side::Right => &RIGHT_MOTOR,
    }
}

/// Drivetrain handle for the control loop: writes commands, reads counters.
pub struct SharedDrivetrain;

impl Drivetrain for SharedDrivetrain {
    fn set_speed(&mut self, side: Side, steps_per_s: i16) {
        let speed = steps_per_s.clamp(-MOTOR_SPEED_LIMIT, MOTOR_SPEED_LIMIT);
        shared(side).speed.store(speed, Ordering::Relaxed);
    }

    fn set_position(&mut self, side: Side, steps: i32) {
        shared(side).position.store(steps, Ordering::Relaxed);
    }

    fn position(&self, side: Side) -> i32 {
        shared(side).position.load(Ordering::Relaxed)
    }
}

/// Four-coil stepper driven directly from GPIO.
pub struct StepperMotor {
    coils: [Output<'static, AnyPin>; 4],
    shared: &'static MotorShared,
    /// `forward` direction of the wheel maps to increasing phase index.
    mirrored: bool,
    phase: usize,
    accumulator: u32,
}

impl StepperMotor {
    pub fn new(coils: [AnyPin; 4], side: Side) -> Self {
        Self {
            coils: coils.map(|pin| Output::new(pin, Level::Low, Speed::Low)),
            shared: shared(side),
            // Motors face each other on the chassis.
            mirrored: side == Side::Left,
            phase: 0,
            accumulator: 0,
        }
    }

    /// Called at STEP_TICK_HZ. Emits at most one step.
    pub fn tick(&mut self) {
        let speed = self.shared.speed.load(Ordering::Relaxed);
        if speed == 0 {
            self.release();
            return;
        }

        self.accumulator += speed.unsigned_abs() as u32;
        if self.accumulator < STEP_TICK_HZ as u32 {
            return;
        }
        self.accumulator -= STEP_TICK_HZ as u32;

        let forward = speed > 0;
        let increment = forward != self.mirrored;
        self.phase = if increment {
            (self.phase + 1) % PHASES.len()
        } else {
            (self.phase + PHASES.len() - 1) % PHASES.len()
        };
        self.energize();

        let delta = if forward { 1 } else { -1 };
        self.shared.position.fetch_add(delta, Ordering::Relaxed);
    }

    fn energize(&mut self) {
        for (coil, &on) in self.coils.iter_mut().zip(PHASES[self.phase].iter()) {
            coil.set_level(if on { Level::High } else { Level::Low });
        }
    }

    /// De-energize all coils while stopped.
    fn release(&mut self) {
        for coil in self.coils.iter_mut() {
            coil.set_low();
        }
        self.accumulator = 0;
    }
}
