use core::fmt::Write;

use crate::state::{MotionMode, ProximityAlertZone, SlopeReading};

pub type StatusLine = heapless::String<96>;

/// One human-readable status line for the serial debug port.
pub fn status_line(slope: SlopeReading, alert: ProximityAlertZone, mode: MotionMode) -> StatusLine {
    let mut line = StatusLine::new();
    // 96 bytes covers the longest zone and mode names.
    let _ = write!(
        line,
        "[SLOPE] angle={:4} flat={} [PROX] {} [MODE] {}\r\n",
        slope.angle,
        slope.flat as u8,
        alert.as_str(),
        mode.as_str(),
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_every_snapshot() {
        let line = status_line(
            SlopeReading { angle: -135, flat: false },
            ProximityAlertZone::RightCenter,
            MotionMode::Escaping,
        );
        assert_eq!(
            line.as_str(),
            "[SLOPE] angle=-135 flat=0 [PROX] right-center [MODE] escaping\r\n"
        );
    }

    #[test]
    fn level_line_is_padded() {
        let line = status_line(SlopeReading::LEVEL, ProximityAlertZone::None, MotionMode::Normal);
        assert_eq!(line.as_str(), "[SLOPE] angle=   0 flat=1 [PROX] none [MODE] normal\r\n");
    }
}
