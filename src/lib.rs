#![cfg_attr(not(test), no_std)]

//! Slope follower control core.
//!
//! A two-wheeled robot turns to face down the steepest slope of the surface
//! it stands on and swerves around obstacles seen by its IR sensors. This
//! crate holds the hardware-independent part: slope estimation, the
//! proximity cascade, the heading regulator, the escape state machine and
//! the periodic jobs tying them together. The e-puck2 firmware binary
//! (feature `firmware`) provides the drivers behind the `hal` traits.

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod hal;
pub mod jobs;
pub mod scheduler;
pub mod state;
pub mod telemetry;
