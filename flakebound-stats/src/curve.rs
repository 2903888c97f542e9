//! Confidence Curve
//!
//! `confidence(t) = 1 - (1 - pmin)^t` is the probability that a bug still
//! present at rate `pmin` would have failed at least once in `t` runs. The
//! planner and the displayed curve share [`confidence`], so the headline retest
//! count always sits where the curve crosses `1 - alpha`.

use crate::error::StatsError;
use crate::planner::{PlannerConfig, plan_retests};
use crate::{DEFAULT_CURVE_SPAN, REFERENCE_CONFIDENCE_LEVELS};

/// Probability of at least one failure in `tests` independent runs at rate `pmin`.
pub fn confidence(pmin: f64, tests: u64) -> f64 {
    -(tests as f64 * (-pmin).ln_1p()).exp_m1()
}

pub(crate) fn validate_pmin(pmin: f64) -> Result<(), StatsError> {
    if pmin.is_finite() && pmin > 0.0 && pmin < 1.0 {
        Ok(())
    } else {
        Err(StatsError::invalid(
            "pmin",
            format!("{pmin} is outside the open interval (0, 1)"),
        ))
    }
}

/// Single point on the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Number of additional passing runs
    pub tests: u64,
    /// Confidence reached after `tests` runs
    pub confidence: f64,
}

/// Confidence as a function of additional runs, for `tests = 1..=bound`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCurve {
    pmin: f64,
    bound: u64,
}

impl ConfidenceCurve {
    /// Curve for failure probability `pmin` up to `bound` runs.
    ///
    /// `bound` is capped at `usize::MAX` so the point count always fits the
    /// iterator's exact length.
    pub fn new(pmin: f64, bound: u64) -> Result<Self, StatsError> {
        validate_pmin(pmin)?;
        let bound = bound.min(usize::MAX as u64);
        Ok(Self { pmin, bound })
    }

    /// Curve spanning `required_tests * span` runs (`span` of 0 means the default).
    pub fn for_plan(pmin: f64, required_tests: u64, span: u64) -> Result<Self, StatsError> {
        let span = if span == 0 { DEFAULT_CURVE_SPAN } else { span };
        Self::new(pmin, required_tests.saturating_mul(span))
    }

    /// Failure probability the curve is drawn for
    pub fn pmin(&self) -> f64 {
        self.pmin
    }

    /// Last run count on the curve
    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Fresh iterator over the points; can be called any number of times.
    pub fn iter(&self) -> CurvePoints {
        CurvePoints {
            pmin: self.pmin,
            next: 1,
            end: self.bound,
        }
    }
}

impl IntoIterator for &ConfidenceCurve {
    type Item = CurvePoint;
    type IntoIter = CurvePoints;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`ConfidenceCurve`]
#[derive(Debug, Clone)]
pub struct CurvePoints {
    pmin: f64,
    /// Next run count from the front
    next: u64,
    /// Last run count still to yield from the back (inclusive)
    end: u64,
}

impl CurvePoints {
    fn point(&self, tests: u64) -> CurvePoint {
        CurvePoint {
            tests,
            confidence: confidence(self.pmin, tests),
        }
    }

    fn exhaust(&mut self) {
        self.next = 1;
        self.end = 0;
    }

    fn remaining(&self) -> u64 {
        if self.next > self.end {
            0
        } else {
            self.end - self.next + 1
        }
    }
}

impl Iterator for CurvePoints {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let point = self.point(self.next);
        if self.next == self.end {
            self.exhaust();
        } else {
            self.next += 1;
        }
        Some(point)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n as u64 >= self.remaining() {
            self.exhaust();
            return None;
        }
        self.next += n as u64;
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // remaining <= bound <= usize::MAX
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for CurvePoints {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let point = self.point(self.end);
        if self.next == self.end {
            self.exhaust();
        } else {
            self.end -= 1;
        }
        Some(point)
    }
}

impl ExactSizeIterator for CurvePoints {}

impl std::iter::FusedIterator for CurvePoints {}

/// Runs needed to reach one of the reference confidence lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceCrossing {
    /// Reference confidence level (e.g., 0.95)
    pub confidence: f64,
    /// Runs needed, or `None` when beyond the planner ceiling
    pub required_tests: Option<u64>,
}

/// Where the curve for `pmin` crosses each of [`REFERENCE_CONFIDENCE_LEVELS`].
pub fn reference_crossings(
    pmin: f64,
    config: &PlannerConfig,
) -> Result<Vec<ReferenceCrossing>, StatsError> {
    validate_pmin(pmin)?;
    REFERENCE_CONFIDENCE_LEVELS
        .iter()
        .map(|&level| {
            let required_tests = match plan_retests(pmin, 1.0 - level, config) {
                Ok(t) => Some(t),
                Err(StatsError::ResultTooLarge { .. }) => None,
                Err(e) => return Err(e),
            };
            Ok(ReferenceCrossing {
                confidence: level,
                required_tests,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_formula() {
        assert!((confidence(0.5, 1) - 0.5).abs() < 1e-15);
        assert!((confidence(0.5, 2) - 0.75).abs() < 1e-15);
        assert!((confidence(0.1, 10) - (1.0 - 0.9f64.powi(10))).abs() < 1e-12);
        assert_eq!(confidence(0.3, 0), 0.0);
    }

    #[test]
    fn test_curve_points() {
        let curve = ConfidenceCurve::new(0.2, 5).unwrap();
        let points: Vec<_> = curve.iter().collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].tests, 1);
        assert_eq!(points[4].tests, 5);
        assert!((points[0].confidence - 0.2).abs() < 1e-12);
        for pair in points.windows(2) {
            assert!(pair[1].confidence > pair[0].confidence);
        }
    }

    #[test]
    fn test_curve_is_restartable() {
        let curve = ConfidenceCurve::new(0.05, 40).unwrap();
        let first: Vec<_> = curve.iter().collect();
        let second: Vec<_> = (&curve).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_curve_iterator_ends() {
        let curve = ConfidenceCurve::new(0.05, 3).unwrap();
        let mut iter = curve.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back().map(|p| p.tests), Some(3));
        assert_eq!(iter.next().map(|p| p.tests), Some(1));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|p| p.tests), Some(2));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_step_by_skips_without_walking() {
        let curve = ConfidenceCurve::new(1e-9, 4_000_000_000).unwrap();
        let tests: Vec<_> = curve
            .iter()
            .step_by(1_000_000_000)
            .map(|p| p.tests)
            .collect();
        assert_eq!(tests, vec![1, 1_000_000_001, 2_000_000_001, 3_000_000_001]);

        let mut iter = curve.iter();
        assert_eq!(iter.nth(3_999_999_999).map(|p| p.tests), Some(4_000_000_000));
        assert!(iter.nth(0).is_none());
    }

    #[test]
    fn test_empty_curve() {
        let curve = ConfidenceCurve::new(0.05, 0).unwrap();
        assert_eq!(curve.iter().count(), 0);
    }

    #[test]
    fn test_curve_rejects_bad_pmin() {
        for pmin in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(
                ConfidenceCurve::new(pmin, 10),
                Err(StatsError::InvalidArgument { name: "pmin", .. })
            ));
        }
    }

    #[test]
    fn test_for_plan_span() {
        let curve = ConfidenceCurve::for_plan(0.1, 29, 2).unwrap();
        assert_eq!(curve.bound(), 58);
        let curve = ConfidenceCurve::for_plan(0.1, 29, 0).unwrap();
        assert_eq!(curve.bound(), 58);
        let curve = ConfidenceCurve::for_plan(0.1, u64::MAX, 3).unwrap();
        assert_eq!(curve.bound(), usize::MAX as u64);
    }

    #[test]
    fn test_length_is_exact_at_capacity() {
        let curve = ConfidenceCurve::new(0.1, u64::MAX).unwrap();
        assert!(curve.bound() <= usize::MAX as u64);

        let mut iter = curve.iter();
        assert_eq!(iter.size_hint(), (usize::MAX, Some(usize::MAX)));
        assert_eq!(iter.len(), usize::MAX);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), usize::MAX - 2);
    }

    #[test]
    fn test_reference_crossings() {
        let crossings = reference_crossings(0.1, &PlannerConfig::default()).unwrap();
        let levels: Vec<_> = crossings.iter().map(|c| c.confidence).collect();
        assert_eq!(levels, REFERENCE_CONFIDENCE_LEVELS.to_vec());
        // ceil(ln(0.1)/ln(0.9)) = 22, ceil(ln(0.05)/ln(0.9)) = 29, ceil(ln(0.01)/ln(0.9)) = 44
        let tests: Vec<_> = crossings.iter().map(|c| c.required_tests).collect();
        assert_eq!(tests, vec![Some(22), Some(29), Some(44)]);
    }

    #[test]
    fn test_reference_crossings_beyond_ceiling() {
        let config = PlannerConfig { max_tests: 25 };
        let crossings = reference_crossings(0.1, &config).unwrap();
        assert_eq!(crossings[0].required_tests, Some(22));
        assert_eq!(crossings[1].required_tests, None);
        assert_eq!(crossings[2].required_tests, None);
    }
}
