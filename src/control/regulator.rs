#[cfg(not(test))]
use micromath::F32Ext;

/// PI(D) heading regulator producing the wheel speed differential.
///
/// The integral term is frozen while the output is saturated and the new
/// integral would grow in magnitude (anti-reset-windup). A zero error or an
/// explicit reset clears it completely. Only an explicit reset also forgets
/// the previous error seen by the derivative term.
pub struct Regulator {
    kp: f32,
    ki: f32,
    kd: f32,
    output_limit: f32,
    integral: f32,
    prev_error: i16,
}

impl Regulator {
    pub fn new(kp: f32, ki: f32, kd: f32, output_limit: i16) -> Self {
        Self {
            kp,
            ki,
            kd,
            output_limit: output_limit.saturating_abs() as f32,
            integral: 0.0,
            prev_error: 0,
        }
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0;
    }

    /// Last committed integral term.
    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn step(&mut self, measured: i16, target: i16, reset: bool) -> i16 {
        let error = measured.saturating_sub(target);

        let mut candidate = self.integral;
        if self.ki != 0.0 {
            candidate += self.ki * error as f32;
        }

        if reset {
            self.reset();
        }
        if reset || error == 0 {
            self.integral = 0.0;
            candidate = 0.0;
        }

        let proportional = self.kp * error as f32;
        let derivative = self.kd * (error as i32 - self.prev_error as i32) as f32;
        self.prev_error = error;

        let raw = proportional + candidate + derivative;
        let output = raw.clamp(-self.output_limit, self.output_limit);

        let saturated = output != raw;
        if !(saturated && candidate.abs() > self.integral.abs()) {
            self.integral = candidate;
        }

        output as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regulator() -> Regulator {
        Regulator::new(5.0, 0.1, 0.0, 1000)
    }

    #[test]
    fn small_error_is_proportional_plus_integral() {
        let mut reg = regulator();
        // 5 × 10 + 0.1 × 10
        assert_eq!(reg.step(10, 0, false), 51);
        assert!((reg.integral() - 1.0).abs() < 1e-6);
        // 5 × 10 + 2.0
        assert_eq!(reg.step(10, 0, false), 52);
        assert!((reg.integral() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn error_is_measured_minus_target() {
        let mut reg = Regulator::new(1.0, 0.0, 0.0, 1000);
        assert_eq!(reg.step(30, 50, false), -20);
        assert_eq!(reg.step(-30, -50, false), 20);
    }

    #[test]
    fn output_never_leaves_the_saturation_band() {
        let mut reg = regulator();
        for measured in [-180i16, 180, 179, -179, 150, -150, 0, 90, -90] {
            for _ in 0..50 {
                let out = reg.step(measured, 0, false);
                assert!((-1000..=1000).contains(&out), "{} -> {}", measured, out);
            }
        }
        let mut reg = Regulator::new(100.0, 50.0, 0.0, 1000);
        assert_eq!(reg.step(i16::MAX, i16::MIN, false), 1000);
        assert_eq!(reg.step(i16::MIN, i16::MAX, false), -1000);
    }

    #[test]
    fn saturated_integral_stops_growing() {
        let mut reg = regulator();
        // 5 × 180 = 900; the integral pushes the output into saturation.
        let mut last = 0.0;
        for _ in 0..300 {
            reg.step(180, 0, false);
            last = reg.integral();
        }
        assert!(last > 0.0);
        assert!(5.0 * 180.0 + last <= 1000.0 + 18.0);

        for _ in 0..100 {
            assert_eq!(reg.step(180, 0, false), 1000);
            assert!(reg.integral().abs() <= last.abs());
        }
    }

    #[test]
    fn reversed_error_unwinds_saturated_integral() {
        let mut reg = regulator();
        for _ in 0..300 {
            reg.step(180, 0, false);
        }
        let frozen = reg.integral();
        reg.step(-10, 0, false);
        assert!(reg.integral() < frozen);
    }

    #[test]
    fn zero_error_clears_the_integral() {
        let mut reg = regulator();
        for _ in 0..20 {
            reg.step(40, 0, false);
        }
        assert!(reg.integral() > 0.0);

        assert_eq!(reg.step(0, 0, false), 0);
        assert_eq!(reg.integral(), 0.0);
        assert_eq!(reg.step(0, 0, false), 0);
        assert_eq!(reg.integral(), 0.0);
    }

    #[test]
    fn reset_request_clears_the_integral_and_keeps_p() {
        let mut reg = regulator();
        for _ in 0..20 {
            reg.step(-40, 0, false);
        }
        assert!(reg.integral() < 0.0);

        assert_eq!(reg.step(-40, 0, true), -200);
        assert_eq!(reg.integral(), 0.0);
        // Accumulation restarts from zero.
        assert_eq!(reg.step(-40, 0, false), -204);
    }

    #[test]
    fn derivative_acts_on_error_change() {
        let mut reg = Regulator::new(0.0, 0.0, 2.0, 1000);
        assert_eq!(reg.step(10, 0, false), 20);
        assert_eq!(reg.step(10, 0, false), 0);
        assert_eq!(reg.step(4, 0, false), -12);
    }

    #[test]
    fn derivative_still_acts_on_a_zero_error_tick() {
        let mut reg = Regulator::new(0.0, 0.1, 2.0, 1000);
        assert_eq!(reg.step(10, 0, false), 21);
        // Integral cleared, 2 × (0 − 10) kept.
        assert_eq!(reg.step(0, 0, false), -20);
        assert_eq!(reg.integral(), 0.0);
        assert_eq!(reg.step(0, 0, false), 0);
    }

    #[test]
    fn explicit_reset_forgets_the_previous_error() {
        let mut reg = Regulator::new(0.0, 0.0, 2.0, 1000);
        reg.step(10, 0, false);
        assert_eq!(reg.step(10, 0, true), 20);
    }
}
