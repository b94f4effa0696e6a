use super::AngleFilter;
use crate::geometry::smooth;

/// Exponential smoothing filter
///
/// The first sample after construction or reset passes through unchanged.
/// A NaN sample poisons the running value: every later output is NaN until
/// [`AngleFilter::reset`] is called.
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl AngleFilter for ExponentialFilter {
    fn apply(&mut self, angle: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => smooth(last, angle, self.alpha),
            None => angle,
        };
        self.last = Some(filtered);
        filtered
    }

    fn value(&self) -> Option<f64> {
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value passes through
        assert_eq!(filter.apply(100.0), 100.0);

        // Second value is smoothed
        assert_eq!(filter.apply(120.0), 110.0);
        assert_eq!(filter.value(), Some(110.0));
    }

    #[test]
    fn test_alpha_bounds() {
        // High alpha = less smoothing
        let mut filter1 = ExponentialFilter::new(0.9);
        filter1.apply(10.0);
        assert!((filter1.apply(20.0) - 19.0).abs() < 0.001);

        // Low alpha = more smoothing
        let mut filter2 = ExponentialFilter::new(0.1);
        filter2.apply(10.0);
        assert!((filter2.apply(20.0) - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut filter = ExponentialFilter::new(0.3);
        filter.apply(170.0);

        let mut previous_gap = f64::INFINITY;
        for _ in 0..60 {
            let gap = (filter.apply(80.0) - 80.0).abs();
            assert!(gap < previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-6);
    }

    #[test]
    fn test_nan_sample_persists_until_reset() {
        let mut filter = ExponentialFilter::new(0.3);
        filter.apply(170.0);
        assert!(filter.apply(f64::NAN).is_nan());
        assert!(filter.apply(120.0).is_nan());

        filter.reset();
        assert_eq!(filter.apply(120.0), 120.0);
    }

    #[test]
    fn test_reset_snaps_next_sample() {
        let mut filter = ExponentialFilter::new(0.3);
        filter.apply(170.0);
        filter.apply(80.0);
        filter.reset();
        assert_eq!(filter.value(), None);
        assert_eq!(filter.apply(42.0), 42.0);
    }
}
