pub mod ir_proximity;
pub mod led;
pub mod mpu9250;
pub mod stepper;
