//! Brute-force search for the cheapest secure round configuration.
//!
//! The search scans every partial-round count (outer loop) against every even
//! full-round count (inner loop). Each secure candidate is optionally inflated by
//! the security margin before its cost is compared, and ties are broken on the
//! inflated full-round count. The comparison is order-dependent, so the scan
//! order is part of the result.

use std::fmt;

use tracing::{debug, info};

use crate::bounds::BoundEvaluator;
use crate::cost::{size_cost, CostFunction};
use crate::error::{Result, RoundsError};
use crate::params::{Parameters, SearchBounds};

/// Full rounds added by the security margin.
pub const MARGIN_FULL_ROUNDS: u32 = 2;

/// Partial rounds are scaled by `43 / 40 = 1.075` (rounded up) under the security margin.
const MARGIN_PARTIAL_NUMERATOR: u64 = 43;
const MARGIN_PARTIAL_DENOMINATOR: u64 = 40;

/// Final round numbers of a search together with their costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundNumbers {
    /// Total number of full rounds `R_F`, split evenly before and after the partial rounds.
    pub full_rounds: u32,
    /// Number of partial rounds `R_P`.
    pub partial_rounds: u32,
    /// Value of the search objective at `(R_F, R_P)`; the S-box count by default.
    pub min_cost: u64,
    /// [`size_cost`] at `(R_F, R_P)`.
    pub size_cost: u64,
}

impl RoundNumbers {
    /// Full rounds applied on each side of the partial rounds.
    pub fn half_full_rounds(&self) -> u32 {
        self.full_rounds / 2
    }
}

impl fmt::Display for RoundNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R_F = {}, R_P = {}, cost = {}, size = {}",
            self.full_rounds, self.partial_rounds, self.min_cost, self.size_cost
        )
    }
}

/// Inflates a minimal secure configuration: `R_F + 2`, `ceil(1.075 * R_P)`.
///
/// Returns `None` if either inflated count does not fit in a `u32`.
pub fn apply_security_margin(full_rounds: u32, partial_rounds: u32) -> Option<(u32, u32)> {
    let full_rounds = full_rounds.checked_add(MARGIN_FULL_ROUNDS)?;
    let partial_rounds = (u64::from(partial_rounds) * MARGIN_PARTIAL_NUMERATOR)
        .div_ceil(MARGIN_PARTIAL_DENOMINATOR);
    Some((full_rounds, u32::try_from(partial_rounds).ok()?))
}

/// Finds the `(R_F, R_P)` pair of minimal cost that satisfies every security bound.
///
/// # Arguments
///
/// * `params` - Instance parameters
/// * `cost_function` - Objective to minimize
/// * `security_margin` - Whether to inflate each secure candidate before costing it
/// * `bounds` - Ranges to scan
///
/// # Errors
///
/// [`RoundsError::SearchExhausted`] if no candidate in `bounds` is secure, and
/// [`RoundsError::InvalidParameter`] if the security margin overflows a secure candidate.
pub fn find_round_numbers(
    params: &Parameters,
    cost_function: CostFunction,
    security_margin: bool,
    bounds: &SearchBounds,
) -> Result<(u32, u32)> {
    let evaluator = BoundEvaluator::new(params);
    let state_bits = params.state_bits();
    let width = params.width();

    // (cost, R_F, R_P) of the best candidate so far
    let mut best: Option<(u64, u32, u32)> = None;

    for partial_candidate in bounds.partial_rounds.clone() {
        for full_candidate in bounds.full_round_candidates() {
            if !evaluator.satisfies(full_candidate, partial_candidate) {
                continue;
            }

            let (full_rounds, partial_rounds) = if security_margin {
                apply_security_margin(full_candidate, partial_candidate).ok_or_else(|| {
                    RoundsError::InvalidParameter(format!(
                        "security margin overflows R_F = {}, R_P = {}",
                        full_candidate, partial_candidate
                    ))
                })?
            } else {
                (full_candidate, partial_candidate)
            };
            let cost = cost_function.evaluate(full_rounds, partial_rounds, state_bits, width);

            let improves = match best {
                None => true,
                Some((min_cost, best_full_rounds, _)) => {
                    cost < min_cost || (cost == min_cost && full_rounds < best_full_rounds)
                }
            };
            if improves {
                debug!(full_rounds, partial_rounds, cost, "new cheapest configuration");
                best = Some((cost, full_rounds, partial_rounds));
            }
        }
    }

    best.map(|(_, full_rounds, partial_rounds)| (full_rounds, partial_rounds))
        .ok_or_else(|| RoundsError::SearchExhausted {
            full_rounds: bounds.full_rounds.clone(),
            partial_rounds: bounds.partial_rounds.clone(),
        })
}

/// Runs [`find_round_numbers`] and reports the objective and size cost of the result.
pub fn calc_final_numbers(
    params: &Parameters,
    cost_function: CostFunction,
    security_margin: bool,
    bounds: &SearchBounds,
) -> Result<RoundNumbers> {
    let (full_rounds, partial_rounds) =
        find_round_numbers(params, cost_function, security_margin, bounds)?;
    let state_bits = params.state_bits();
    let width = params.width();

    let rounds = RoundNumbers {
        full_rounds,
        partial_rounds,
        min_cost: cost_function.evaluate(full_rounds, partial_rounds, state_bits, width),
        size_cost: size_cost(full_rounds, partial_rounds, state_bits, width),
    };
    info!(
        field_bits = params.field_bits(),
        width,
        sbox = %params.sbox(),
        security_bits = params.security_bits(),
        objective = %cost_function,
        "{}",
        rounds
    );
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{lower_bounds, satisfies, Layer};
    use crate::prime::{PrimeSource, RandomPrimes};
    use num_bigint::BigUint;

    fn goldilocks() -> BigUint {
        BigUint::from(0xFFFF_FFFF_0000_0001u64)
    }

    fn babybear() -> BigUint {
        BigUint::from(0x7800_0001u32)
    }

    fn bn254() -> BigUint {
        BigUint::parse_bytes(
            b"30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
            16,
        )
        .unwrap()
    }

    fn search(prime: BigUint, width: u32, alpha: i64, margin: bool) -> (u32, u32) {
        let params = Parameters::new(prime, width, alpha, 128).unwrap();
        find_round_numbers(&params, CostFunction::SBox, margin, &SearchBounds::default()).unwrap()
    }

    #[test]
    fn test_security_margin() {
        assert_eq!(apply_security_margin(6, 38), Some((8, 41)));
        assert_eq!(apply_security_margin(6, 40), Some((8, 43)));
        assert_eq!(apply_security_margin(6, 1), Some((8, 2)));
        assert_eq!(apply_security_margin(4, 0), Some((6, 0)));
    }

    #[test]
    fn test_security_margin_large_counts() {
        // 100_000_000 * 43 does not fit in a u32 but the inflated count does
        assert_eq!(
            apply_security_margin(6, 100_000_000),
            Some((8, 107_500_000))
        );
        assert_eq!(apply_security_margin(u32::MAX - 1, 1), None);
        assert_eq!(apply_security_margin(6, u32::MAX), None);
    }

    #[test]
    fn test_margin_overflow_is_an_error() {
        let params = Parameters::new(goldilocks(), 3, 5, 128).unwrap();
        let huge = SearchBounds::new(u32::MAX - 1..u32::MAX, 1..2);
        assert!(matches!(
            find_round_numbers(&params, CostFunction::SBox, true, &huge),
            Err(RoundsError::InvalidParameter(_))
        ));
        assert_eq!(
            find_round_numbers(&params, CostFunction::SBox, false, &huge).unwrap(),
            (u32::MAX - 1, 1)
        );
    }

    #[test]
    fn test_known_round_numbers_64_bit() {
        let cases = [
            (8, 3, (8, 41)),
            (12, 3, (8, 42)),
            (16, 3, (8, 42)),
            (16, 5, (8, 27)),
            (8, 7, (8, 22)),
            (16, 7, (8, 22)),
        ];
        for (width, alpha, expected) in cases {
            assert_eq!(
                search(goldilocks(), width, alpha, true),
                expected,
                "t = {}, alpha = {}",
                width,
                alpha
            );
        }
    }

    #[test]
    fn test_known_round_numbers_31_bit() {
        assert_eq!(search(babybear(), 16, 7, true), (8, 13));
        assert_eq!(search(babybear(), 24, 7, true), (8, 21));
    }

    #[test]
    fn test_without_margin_returns_minimal_pair() {
        assert_eq!(search(goldilocks(), 8, 3, false), (6, 38));
        assert_eq!(search(bn254(), 6, -1, false), (6, 53));
        assert_eq!(search(bn254(), 6, -1, true), (8, 57));
    }

    #[test]
    fn test_known_round_numbers_large_fields() {
        use crate::fields::{BN382, BN382_DUAL, MNT4_753, MNT6_753, TWEEDLE_DEE, TWEEDLE_DUM};

        // (t, alpha, with margin, without margin)
        let cases = [
            (3, -1, (8, 63), (6, 58)),
            (6, -1, (8, 57), (6, 53)),
            (3, 5, (8, 56), (6, 52)),
            (6, 5, (8, 57), (6, 53)),
        ];
        for field in [MNT4_753, MNT6_753, BN382, BN382_DUAL, TWEEDLE_DEE, TWEEDLE_DUM] {
            for (width, alpha, with_margin, without_margin) in cases {
                assert_eq!(
                    search(field.modulus(), width, alpha, true),
                    with_margin,
                    "{} t = {}, alpha = {}",
                    field.name,
                    width,
                    alpha
                );
                assert_eq!(
                    search(field.modulus(), width, alpha, false),
                    without_margin,
                    "{} t = {}, alpha = {}",
                    field.name,
                    width,
                    alpha
                );
            }
        }
    }

    #[test]
    fn test_margin_inflation_invariant() {
        for (prime, width, alpha) in [
            (goldilocks(), 12, 7),
            (babybear(), 24, 5),
            (bn254(), 3, 5),
            (bn254(), 6, -1),
        ] {
            let (full, partial) = search(prime.clone(), width, alpha, false);
            let (full_margin, partial_margin) = search(prime, width, alpha, true);
            assert!(full_margin > full);
            assert!(partial_margin >= (partial * 43).div_ceil(40));
        }
    }

    #[test]
    fn test_size_objective() {
        let params = Parameters::new(bn254(), 3, 5, 128).unwrap();
        let bounds = SearchBounds::default();
        let rounds = calc_final_numbers(&params, CostFunction::Size, true, &bounds).unwrap();
        assert!(satisfies(&params, rounds.full_rounds, rounds.partial_rounds));
        assert_eq!(rounds.min_cost, rounds.size_cost);
        assert_eq!(
            rounds.size_cost,
            size_cost(rounds.full_rounds, rounds.partial_rounds, 762, 3)
        );
    }

    #[test]
    fn test_tie_break_prefers_smaller_full_rounds() {
        // Secure pairs here are exactly R_F >= 6 with R_F + R_P >= 58, so every
        // pair on that line has the same depth and the smallest R_F must win.
        let params = Parameters::new(bn254(), 3, 5, 128).unwrap();
        assert!(satisfies(&params, 56, 2));
        assert!(satisfies(&params, 6, 52));
        assert!(!satisfies(&params, 6, 51));
        assert!(!satisfies(&params, 4, 54));

        let (full, partial) =
            find_round_numbers(&params, CostFunction::Depth, false, &SearchBounds::default())
                .unwrap();
        assert_eq!((full, partial), (6, 52));
    }

    #[test]
    fn test_calc_final_numbers_reports_costs() {
        let params = Parameters::new(goldilocks(), 12, 7, 128).unwrap();
        let rounds =
            calc_final_numbers(&params, CostFunction::SBox, true, &SearchBounds::default()).unwrap();
        assert_eq!((rounds.full_rounds, rounds.partial_rounds), (8, 22));
        assert_eq!(rounds.min_cost, 12 * 8 + 22);
        assert_eq!(rounds.size_cost, 768 * 8 + 64 * 22);
        assert_eq!(rounds.half_full_rounds(), 4);
    }

    #[test]
    fn test_scenario_64_bit_prime_width_24() {
        let prime = RandomPrimes::seeded(64).generate_prime(64).unwrap();
        let params = Parameters::new(prime, 24, 3, 128).unwrap();
        let (full, partial) =
            find_round_numbers(&params, CostFunction::SBox, true, &SearchBounds::default())
                .unwrap();
        assert!(satisfies(&params, full, partial));
    }

    #[test]
    fn test_scenario_inverse_sbox_253_bit_prime() {
        let prime = RandomPrimes::seeded(253).generate_prime(253).unwrap();
        let params = Parameters::new(prime, 6, -1, 128).unwrap();
        let (full, partial) =
            find_round_numbers(&params, CostFunction::SBox, true, &SearchBounds::default())
                .unwrap();

        let bounds = lower_bounds(&params, full, partial);
        for bound in bounds.iter() {
            let rounds = match bound.layer {
                Layer::Full => full,
                Layer::Partial => partial,
            };
            assert!(
                i64::from(rounds) >= bound.rounds,
                "{} bound {} not met by {}",
                bound.attack,
                bound.rounds,
                rounds
            );
        }
        assert_eq!(bounds.iter().filter(|b| b.layer == Layer::Partial).count(), 3);
        // M < n, so the field size drops out of every bound
        assert_eq!((full, partial), (8, 57));
    }

    #[test]
    fn test_invalid_alpha_fails_before_search() {
        assert!(matches!(
            Parameters::new(goldilocks(), 3, 0, 128),
            Err(RoundsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_search_exhausted() {
        let params = Parameters::new(goldilocks(), 3, 5, 256).unwrap();
        let narrow = SearchBounds::new(4..5, 1..2);
        let err = find_round_numbers(&params, CostFunction::SBox, true, &narrow).unwrap_err();
        match err {
            RoundsError::SearchExhausted {
                full_rounds,
                partial_rounds,
            } => {
                assert_eq!(full_rounds, 4..5);
                assert_eq!(partial_rounds, 1..2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(calc_final_numbers(&params, CostFunction::SBox, true, &narrow).is_err());
    }

    #[test]
    fn test_search_is_deterministic() {
        let params = Parameters::new(bn254(), 5, 5, 128).unwrap();
        let bounds = SearchBounds::default();
        let first = calc_final_numbers(&params, CostFunction::SBox, true, &bounds).unwrap();
        let second = calc_final_numbers(&params, CostFunction::SBox, true, &bounds).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}
