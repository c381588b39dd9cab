/// Shared state types for inter-task communication.
///
/// All types are `Copy`; published values are replaced whole, never patched.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

// ── Data types ────────────────────────────────────────────────────────────────

/// Offset-corrected accelerometer sample (raw LSB).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerationSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Slope direction relative to the robot's front, in degrees (−180, 180].
///
/// 0° faces down-slope, +90° means the slope descends to the left,
/// −90° to the right. `flat` is set when the surface is below the
/// inclination threshold, in which case `angle` is exactly 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlopeReading {
    pub angle: i16,
    pub flat: bool,
}

impl SlopeReading {
    pub const LEVEL: Self = Self { angle: 0, flat: true };
}

/// Obstacle direction reported by the proximity cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProximityAlertZone {
    #[default]
    None,
    RightSide,
    RightCenter,
    RightFront,
    LeftFront,
    LeftCenter,
    LeftSide,
}

impl ProximityAlertZone {
    pub fn is_alert(self) -> bool {
        self != Self::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RightSide => "right-side",
            Self::RightCenter => "right-center",
            Self::RightFront => "right-front",
            Self::LeftFront => "left-front",
            Self::LeftCenter => "left-center",
            Self::LeftSide => "left-side",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    #[default]
    Normal,
    Escaping,
}

impl MotionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Escaping => "escaping",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

// ── Published values ─────────────────────────────────────────────────────────

/// Last-value snapshot with one writer task and any number of readers.
///
/// The lock is held only for the copy in or out, never across an await.
pub struct Published<T: Copy> {
    inner: Mutex<CriticalSectionRawMutex, Cell<T>>,
}

impl<T: Copy> Published<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    /// Overwrite the published value.
    pub fn publish(&self, value: T) {
        self.inner.lock(|cell| cell.set(value));
    }

    /// Copy of the most recently published value.
    pub fn latest(&self) -> T {
        self.inner.lock(|cell| cell.get())
    }
}
