use crate::state::ProximityAlertZone;

/// Sensor order of a proximity frame, physical right to left.
pub const RIGHT_SIDE: usize = 0;
pub const RIGHT_CENTER: usize = 1;
pub const RIGHT_FRONT: usize = 2;
pub const LEFT_FRONT: usize = 3;
pub const LEFT_CENTER: usize = 4;
pub const LEFT_SIDE: usize = 5;

pub const SENSOR_COUNT: usize = 6;

/// Reduces six IR readings to the single obstacle zone to escape from.
///
/// A sensor raises its zone only when it is above the threshold and strictly
/// closer than its immediate neighbours. Candidates are tried right side
/// first; the first match wins.
pub struct ProximityMonitor {
    threshold: u16,
}

impl ProximityMonitor {
    pub fn new(threshold: u16) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, readings: &[u16; SENSOR_COUNT]) -> ProximityAlertZone {
        let r = readings;
        let hot = |i: usize| r[i] > self.threshold;

        if hot(RIGHT_SIDE) && r[RIGHT_SIDE] > r[RIGHT_CENTER] {
            ProximityAlertZone::RightSide
        } else if hot(RIGHT_CENTER)
            && r[RIGHT_CENTER] > r[RIGHT_SIDE]
            && r[RIGHT_CENTER] > r[RIGHT_FRONT]
        {
            ProximityAlertZone::RightCenter
        } else if hot(RIGHT_FRONT)
            && r[RIGHT_FRONT] > r[RIGHT_CENTER]
            && r[RIGHT_FRONT] > r[LEFT_FRONT]
        {
            ProximityAlertZone::RightFront
        } else if hot(LEFT_FRONT)
            && r[LEFT_FRONT] > r[LEFT_CENTER]
            && r[LEFT_FRONT] > r[RIGHT_FRONT]
        {
            ProximityAlertZone::LeftFront
        } else if hot(LEFT_CENTER)
            && r[LEFT_CENTER] > r[LEFT_FRONT]
            && r[LEFT_CENTER] > r[LEFT_SIDE]
        {
            ProximityAlertZone::LeftCenter
        } else if hot(LEFT_SIDE) && r[LEFT_SIDE] > r[LEFT_CENTER] {
            ProximityAlertZone::LeftSide
        } else {
            ProximityAlertZone::None
        }
    }
}
