pub mod angle_task;
pub mod motion_task;
pub mod proximity_task;
pub mod stepper_task;
pub mod telemetry_task;
