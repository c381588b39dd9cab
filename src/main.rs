#![no_std]
#![no_main]

mod board;
mod drivers;
mod tasks;

use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::Pin;
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz as TimeHertz;
use embassy_stm32::usart::{Config as UsartConfig, UartTx};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use slope_follower::hal::Indicator;
use slope_follower::state::{MotionMode, ProximityAlertZone, Published, Side, SlopeReading};

use crate::board::Board;
use crate::drivers::ir_proximity::{IrProximity, IrReceivers};
use crate::drivers::led::BodyLed;
use crate::drivers::mpu9250::Mpu9250;
use crate::drivers::stepper::StepperMotor;

// ── Published snapshots (one writer task each) ────────────────────────────────
pub static SLOPE: Published<SlopeReading> = Published::new(SlopeReading::LEVEL);
pub static ALERT: Published<ProximityAlertZone> = Published::new(ProximityAlertZone::None);
pub static MODE: Published<MotionMode> = Published::new(MotionMode::Normal);

// ── Interrupt bindings ────────────────────────────────────────────────────────
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Samples averaged for the accelerometer and IR zero levels.
const CALIB_N: usize = 100;

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL)
    let board = Board::init();
    let p = board.p;
    defmt::info!("slope follower booting");

    // 2. Steppers (right PE13/12/14/15, left PE9/8/11/10), released until commanded
    let left_motor = StepperMotor::new(
        [p.PE9.degrade(), p.PE8.degrade(), p.PE11.degrade(), p.PE10.degrade()],
        Side::Left,
    );
    let right_motor = StepperMotor::new(
        [p.PE13.degrade(), p.PE12.degrade(), p.PE14.degrade(), p.PE15.degrade()],
        Side::Right,
    );
    spawner.spawn(tasks::stepper_task::stepper_task(left_motor, right_motor)).unwrap();

    // 3. Body LED (PB2): escape indicator, blinks during calibration
    let mut led = BodyLed::new(p.PB2.degrade());

    // 4. I2C1 @ 400 kHz: MPU-9250 (SCL=PB8, SDA=PB9)
    let i2c = I2c::new(
        p.I2C1,
        p.PB8, p.PB9,
        Irqs,
        NoDma,
        NoDma,
        TimeHertz(400_000),
        Default::default(),
    );
    let mut imu = Mpu9250::new(i2c);

    // 5. IR proximity: receivers on ADC1, emitters on PD0..PD5
    let adc = Adc::new(p.ADC1, &mut Delay);
    let mut ir = IrProximity::new(
        adc,
        IrReceivers {
            right_side: p.PA2,
            right_center: p.PA1,
            right_front: p.PA0,
            left_front: p.PC5,
            left_center: p.PC4,
            left_side: p.PA3,
        },
        [
            p.PD0.degrade(), p.PD1.degrade(), p.PD2.degrade(),
            p.PD3.degrade(), p.PD4.degrade(), p.PD5.degrade(),
        ],
    );

    // 6. Debug serial USART3 @ 115200 (TX=PD8)
    let mut uart_config = UsartConfig::default();
    uart_config.baudrate = 115_200;
    let uart_tx = UartTx::new(p.USART3, p.PD8, p.DMA1_CH3, uart_config).unwrap();

    // 7. IMU hardware init
    Timer::after(Duration::from_millis(100)).await;
    if let Err(e) = imu.init().await {
        // Keep going: the angle task logs every failed read
        defmt::error!("IMU init failed: {}", e);
    }

    // 8. Static calibration, robot level and clear of obstacles: 100 × 10 ms
    let mut accel_sum = [0i32; 3];
    let mut accel_n = 0i32;
    for i in 0..CALIB_N {
        if let Ok(raw) = imu.read_raw() {
            for j in 0..3 {
                accel_sum[j] += raw[j] as i32;
            }
            accel_n += 1;
        }
        led.set(i % 20 < 10);
        Timer::after(Duration::from_millis(10)).await;
    }
    let accel_offset = accel_sum.map(|s| (s / accel_n.max(1)) as i16);
    imu.set_offset(accel_offset);
    defmt::info!("accel offset {} ({} samples)", accel_offset, accel_n);

    ir.calibrate(CALIB_N as u16).await;
    led.set(false);

    // 9. Spawn the control pipeline
    spawner.spawn(tasks::angle_task::angle_task(imu)).unwrap();
    spawner.spawn(tasks::proximity_task::proximity_task(ir)).unwrap();
    spawner.spawn(tasks::motion_task::motion_task(led)).unwrap();
    spawner.spawn(tasks::telemetry_task::telemetry_task(uart_tx)).unwrap();
}
