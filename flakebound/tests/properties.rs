//! Property-based invariant tests for the estimator and the planner.
//!
//! 1. pmin lies in [0, 1).
//! 2. pmin is non-decreasing in failures for fixed trials.
//! 3. pmin is non-increasing in trials for fixed failures.
//! 4. The retest count is at least 1.
//! 5. The retest count is non-increasing in pmin.
//! 6. A stricter alpha never needs fewer retests.
//! 7. The retest count is exactly where the curve first reaches 1 - alpha.
//! 8. The posterior CDF at pmin is alpha, out to a million trials.

use flakebound::{Posterior, confidence, estimate_min_probability, required_tests};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn observation_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..=2_000).prop_flat_map(|trials| (Just(trials), 0..=trials))
}

/// Interior observations within the resolvable shapes (at most 9000 failures)
fn large_observation_strategy() -> impl Strategy<Value = (u64, u64)> {
    (2u64..=1_000_000).prop_flat_map(|trials| (Just(trials), 1..trials.min(9_001)))
}

fn alpha_strategy() -> impl Strategy<Value = f64> {
    0.001f64..0.5
}

fn pmin_strategy() -> impl Strategy<Value = f64> {
    1e-5f64..0.999
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn pmin_in_unit_interval((trials, failures) in observation_strategy(), alpha in alpha_strategy()) {
        let pmin = estimate_min_probability(trials, failures, alpha).unwrap();
        prop_assert!((0.0..1.0).contains(&pmin));
    }

    #[test]
    fn pmin_monotone_in_failures((trials, failures) in observation_strategy(), alpha in alpha_strategy()) {
        prop_assume!(failures < trials);
        let lower = estimate_min_probability(trials, failures, alpha).unwrap();
        let higher = estimate_min_probability(trials, failures + 1, alpha).unwrap();
        prop_assert!(higher >= lower, "k={} -> {}, k+1 -> {}", failures, lower, higher);
    }

    #[test]
    fn pmin_monotone_in_trials((trials, failures) in observation_strategy(), alpha in alpha_strategy()) {
        let fewer = estimate_min_probability(trials, failures, alpha).unwrap();
        let more = estimate_min_probability(trials + 1, failures, alpha).unwrap();
        prop_assert!(more <= fewer, "n={} -> {}, n+1 -> {}", trials, fewer, more);
    }

    #[test]
    fn pmin_is_the_alpha_quantile((trials, failures) in large_observation_strategy(), alpha in alpha_strategy()) {
        let pmin = estimate_min_probability(trials, failures, alpha).unwrap();
        let posterior = Posterior::from_observations(trials, failures).unwrap();
        let cdf = posterior.cdf(pmin).unwrap();
        prop_assert!((cdf - alpha).abs() < 1e-9, "n={} k={}: I_x = {} at x = {}", trials, failures, cdf, pmin);
    }

    #[test]
    fn retests_at_least_one(pmin in pmin_strategy(), alpha in alpha_strategy()) {
        prop_assert!(required_tests(pmin, alpha).unwrap() >= 1);
    }

    #[test]
    fn retests_monotone_in_pmin(pmin in pmin_strategy(), factor in 1.0f64..2.0, alpha in alpha_strategy()) {
        let larger = (pmin * factor).min(0.999);
        let base = required_tests(pmin, alpha).unwrap();
        let fewer = required_tests(larger, alpha).unwrap();
        prop_assert!(fewer <= base);
    }

    #[test]
    fn stricter_alpha_needs_more(pmin in pmin_strategy(), alpha in alpha_strategy(), factor in 0.1f64..1.0) {
        let strict = alpha * factor;
        prop_assert!(required_tests(pmin, strict).unwrap() >= required_tests(pmin, alpha).unwrap());
    }

    #[test]
    fn retests_are_minimal(pmin in pmin_strategy(), alpha in alpha_strategy()) {
        let runs = required_tests(pmin, alpha).unwrap();
        prop_assert!(confidence(pmin, runs) >= 1.0 - alpha);
        if runs > 1 {
            prop_assert!(confidence(pmin, runs - 1) < 1.0 - alpha);
        }
    }
}
