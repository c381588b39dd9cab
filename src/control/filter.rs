/// Simple moving average over the last `N` samples.
///
/// The running sum is kept in 32 bits so a full window of `i16` samples
/// cannot overflow. The average truncates toward zero. Averaging a wrapping
/// quantity (an angle near ±180°) gives the arithmetic mean, not the
/// circular one.
pub struct MovingAverage<const N: usize> {
    values: [i16; N],
    sum: i32,
    cursor: usize,
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "moving average window must not be empty");
        Self {
            values: [0; N],
            sum: 0,
            cursor: 0,
        }
    }

    /// Push `new_value` over the oldest sample and return the new average.
    pub fn update(&mut self, new_value: i16) -> i16 {
        self.sum -= self.values[self.cursor] as i32;
        self.sum += new_value as i32;
        self.values[self.cursor] = new_value;
        self.cursor = (self.cursor + 1) % N;

        self.average()
    }

    pub fn average(&self) -> i16 {
        (self.sum / N as i32) as i16
    }

    pub fn reset(&mut self) {
        self.values = [0; N];
        self.sum = 0;
        self.cursor = 0;
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_settles_on_that_value() {
        let mut avg = MovingAverage::<10>::new();
        let mut out = 0;
        for _ in 0..10 {
            out = avg.update(-37);
        }
        assert_eq!(out, -37);

        let mut avg = MovingAverage::<3>::new();
        for _ in 0..3 {
            out = avg.update(i16::MAX);
        }
        assert_eq!(out, i16::MAX);
    }

    #[test]
    fn warm_up_counts_the_zero_filled_slots() {
        let mut avg = MovingAverage::<4>::new();
        assert_eq!(avg.update(40), 10);
        assert_eq!(avg.update(40), 20);
        assert_eq!(avg.update(40), 30);
        assert_eq!(avg.update(40), 40);
    }

    #[test]
    fn oldest_sample_leaves_the_window() {
        let mut avg = MovingAverage::<3>::new();
        avg.update(3);
        avg.update(6);
        assert_eq!(avg.update(9), 6);
        // 3 drops out: (6 + 9 + 12) / 3
        assert_eq!(avg.update(12), 9);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let mut avg = MovingAverage::<2>::new();
        avg.update(0);
        assert_eq!(avg.update(3), 1);

        let mut avg = MovingAverage::<2>::new();
        avg.update(0);
        assert_eq!(avg.update(-3), -1);
    }

    #[test]
    fn angles_across_the_wrap_average_arithmetically() {
        let mut avg = MovingAverage::<2>::new();
        avg.update(179);
        assert_eq!(avg.update(-179), 0);
    }

    #[test]
    fn reset_clears_history() {
        let mut avg = MovingAverage::<3>::new();
        avg.update(300);
        avg.update(300);
        avg.reset();
        assert_eq!(avg.average(), 0);
        assert_eq!(avg.update(3), 1);
    }
}
