use embassy_stm32::i2c::{Error, I2c};
use embassy_stm32::peripherals::I2C1;
use embassy_time::{Duration, Timer};

use slope_follower::hal::Accelerometer;
use slope_follower::state::AccelerationSample;

const ADDR: u8 = 0x68;

const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

const WHO_AM_I_MPU9250: u8 = 0x71;

#[derive(Debug, defmt::Format)]
pub enum ImuError {
    Bus(Error),
    WrongId(u8),
}

impl From<Error> for ImuError {
    fn from(e: Error) -> Self {
        Self::Bus(e)
    }
}

/// MPU-9250 accelerometer on I2C1, ±2 g range.
///
/// Readings are returned with the static offset removed, so a level robot
/// at rest reads close to zero on all three axes.
pub struct Mpu9250 {
    i2c: I2c<'static, I2C1>,
    offset: [i16; 3],
}

impl Mpu9250 {
    pub fn new(i2c: I2c<'static, I2C1>) -> Self {
        Self { i2c, offset: [0; 3] }
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.i2c.blocking_write(ADDR, &[reg, value])
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error> {
        let mut rx = [0u8; 1];
        self.i2c.blocking_write_read(ADDR, &[reg], &mut rx)?;
        Ok(rx[0])
    }

    pub async fn init(&mut self) -> Result<(), ImuError> {
        // Soft reset
        self.write_reg(REG_PWR_MGMT_1, 0x80)?;
        Timer::after(Duration::from_millis(100)).await;

        let id = self.read_reg(REG_WHO_AM_I)?;
        if id != WHO_AM_I_MPU9250 {
            return Err(ImuError::WrongId(id));
        }

        // Wake up on the gyro PLL clock, ±2 g full scale
        self.write_reg(REG_PWR_MGMT_1, 0x01)?;
        self.write_reg(REG_ACCEL_CONFIG, 0x00)?;
        Timer::after(Duration::from_millis(50)).await;

        Ok(())
    }

    /// Raw accelerometer counts, offset not applied.
    pub fn read_raw(&mut self) -> Result<[i16; 3], Error> {
        let mut rx = [0u8; 6];
        self.i2c.blocking_write_read(ADDR, &[REG_ACCEL_XOUT_H], &mut rx)?;

        let a_x = (rx[0] as i16) << 8 | (rx[1] as i16);
        let a_y = (rx[2] as i16) << 8 | (rx[3] as i16);
        let a_z = (rx[4] as i16) << 8 | (rx[5] as i16);

        Ok([a_x, a_y, a_z])
    }

    pub fn set_offset(&mut self, offset: [i16; 3]) {
        self.offset = offset;
    }
}

impl Accelerometer for Mpu9250 {
    type Error = Error;

    fn read_acceleration(&mut self) -> Result<AccelerationSample, Error> {
        let raw = self.read_raw()?;
        Ok(AccelerationSample {
            x: raw[0].saturating_sub(self.offset[0]),
            y: raw[1].saturating_sub(self.offset[1]),
            z: raw[2].saturating_sub(self.offset[2]),
        })
    }
}
