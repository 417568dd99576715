//! Security bounds on the round numbers.
//!
//! Each known attack yields a lower bound on either the number of full rounds `R_F`
//! or the number of partial rounds `R_P`, expressed in terms of the other round count.
//! A configuration is secure when it meets every bound simultaneously.
//!
//! ## Attacks
//!
//! 1. **Statistical**: differential and linear cryptanalysis, mitigated by full rounds only
//! 2. **Interpolation**: reconstructing the permutation as a low-degree polynomial
//! 3. **Groebner 1 / Groebner 2**: solving the round equations with Gröbner bases
//!
//! For power S-boxes every bound constrains `R_F`. For the inversion S-box the
//! statistical bound constrains `R_F` and the algebraic ones constrain `R_P`.

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;

use crate::params::{ceil_log, ceil_log2, floor_log2_pow, Parameters, SBox};

/// Full rounds required against statistical attacks when the field is large enough.
pub const STATISTICAL_FULL_ROUNDS: i64 = 6;

/// Full rounds required against statistical attacks otherwise.
pub const STATISTICAL_FULL_ROUNDS_SMALL_FIELD: i64 = 10;

/// `(alpha - 1) / 2` of the statistical threshold for the inversion S-box, in halves.
const INVERSE_STATISTICAL_HALVES: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attack {
    Statistical,
    Interpolation,
    Groebner1,
    Groebner2,
}

impl Attack {
    pub fn name(&self) -> &'static str {
        match self {
            Attack::Statistical => "Statistical",
            Attack::Interpolation => "Interpolation",
            Attack::Groebner1 => "Groebner 1",
            Attack::Groebner2 => "Groebner 2",
        }
    }
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of round a bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Full,
    Partial,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Full => f.write_str("R_F"),
            Layer::Partial => f.write_str("R_P"),
        }
    }
}

/// Minimum number of `layer` rounds needed against `attack`.
///
/// The value can be zero or negative when the other round count already
/// defeats the attack on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub attack: Attack,
    pub layer: Layer,
    pub rounds: i64,
}

/// The bounds of every attack for one candidate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSet {
    bounds: [Bound; 4],
}

impl BoundSet {
    pub fn iter(&self) -> impl Iterator<Item = &Bound> {
        self.bounds.iter()
    }

    /// The largest bound on `layer`, or 0 if no attack constrains it.
    pub fn required(&self, layer: Layer) -> i64 {
        self.bounds
            .iter()
            .filter(|bound| bound.layer == layer)
            .map(|bound| bound.rounds)
            .max()
            .unwrap_or(0)
    }

    pub fn is_satisfied_by(&self, full_rounds: u32, partial_rounds: u32) -> bool {
        i64::from(full_rounds) >= self.required(Layer::Full)
            && i64::from(partial_rounds) >= self.required(Layer::Partial)
    }
}

/// Round-independent terms of the bounds, computed once per parameter set.
#[derive(Debug, Clone)]
enum Terms {
    Power {
        /// `log(2, alpha) = 1 / log2(alpha)`
        log_alpha_2: f64,
        /// `1 + ceil(log_alpha(2) * min(M, n)) + ceil(log_alpha(t))`
        interpolation: i64,
    },
    Inverse {
        /// `1 + ceil(min(M, n) / 2) + ceil(log2(t))`, shared by interpolation and Groebner 1
        interpolation: i64,
        /// `t - 1 + ceil(log2(t)) + min(ceil(M / (t + 1)), ceil(log2(p) / 2))`
        groebner_2: i64,
    },
}

/// Evaluates the security bounds for a fixed parameter set.
///
/// Construction precomputes everything that does not depend on the round
/// numbers, so repeated evaluation during a search stays cheap.
#[derive(Debug, Clone)]
pub struct BoundEvaluator<'a> {
    params: &'a Parameters,
    statistical: i64,
    terms: Terms,
}

impl<'a> BoundEvaluator<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        let width = params.width();
        let security_bits = u64::from(params.security_bits());
        let security_or_field = security_bits.min(params.field_bits());

        let (halves, terms) = match params.sbox() {
            SBox::Power(alpha) => {
                let interpolation = 1
                    + ceil_log(alpha, &(BigUint::one() << security_or_field)) as i64
                    + ceil_log(alpha, &BigUint::from(width)) as i64;
                let terms = Terms::Power {
                    log_alpha_2: 2f64.ln() / f64::from(alpha).ln(),
                    interpolation,
                };
                (u64::from(alpha) - 1, terms)
            }
            SBox::Inverse => {
                let ceil_log2_width = ceil_log2(width) as i64;
                let security_per_element = security_bits.div_ceil(u64::from(width) + 1);
                // p is odd, so log2(p) is never an integer and its half rounds up to ceil(n / 2)
                let half_field = params.field_bits().div_ceil(2);
                let terms = Terms::Inverse {
                    interpolation: 1 + security_or_field.div_ceil(2) as i64 + ceil_log2_width,
                    groebner_2: i64::from(width) - 1
                        + ceil_log2_width
                        + security_per_element.min(half_field) as i64,
                };
                (INVERSE_STATISTICAL_HALVES, terms)
            }
        };

        let threshold = params.floor_log2_prime_minus_halves(halves) * (i64::from(width) + 1);
        let statistical = if i64::from(params.security_bits()) <= threshold {
            STATISTICAL_FULL_ROUNDS
        } else {
            STATISTICAL_FULL_ROUNDS_SMALL_FIELD
        };

        BoundEvaluator {
            params,
            statistical,
            terms,
        }
    }

    pub fn params(&self) -> &Parameters {
        self.params
    }

    /// Computes the bound of every attack for the candidate `(R_F, R_P)`.
    pub fn lower_bounds(&self, full_rounds: u32, partial_rounds: u32) -> BoundSet {
        let statistical = Bound {
            attack: Attack::Statistical,
            layer: Layer::Full,
            rounds: self.statistical,
        };

        match self.terms {
            Terms::Power {
                log_alpha_2,
                interpolation,
            } => {
                let partial = f64::from(partial_rounds);
                let width = f64::from(self.params.width());
                let security_bits = f64::from(self.params.security_bits());
                let log2_prime = self.params.log2_prime();

                let groebner_1 = 1.0
                    + log_alpha_2 * (security_bits / 3.0).min(log2_prime / 2.0)
                    - partial;
                let groebner_2 = width - 1.0
                    + (log_alpha_2 * security_bits / (width + 1.0))
                        .min(log_alpha_2 * log2_prime / 2.0)
                    - partial;

                BoundSet {
                    bounds: [
                        statistical,
                        Bound {
                            attack: Attack::Interpolation,
                            layer: Layer::Full,
                            rounds: interpolation - i64::from(partial_rounds),
                        },
                        Bound {
                            attack: Attack::Groebner1,
                            layer: Layer::Full,
                            rounds: groebner_1.ceil() as i64,
                        },
                        Bound {
                            attack: Attack::Groebner2,
                            layer: Layer::Full,
                            rounds: groebner_2.ceil() as i64,
                        },
                    ],
                }
            }
            Terms::Inverse {
                interpolation,
                groebner_2,
            } => {
                // Degree growth the attacker gets for free from the full rounds
                let full_round_gain = floor_log2_pow(self.params.width(), full_rounds) as i64;

                BoundSet {
                    bounds: [
                        statistical,
                        Bound {
                            attack: Attack::Interpolation,
                            layer: Layer::Partial,
                            rounds: interpolation - full_round_gain,
                        },
                        Bound {
                            attack: Attack::Groebner1,
                            layer: Layer::Partial,
                            rounds: interpolation - full_round_gain,
                        },
                        Bound {
                            attack: Attack::Groebner2,
                            layer: Layer::Partial,
                            rounds: groebner_2 - full_round_gain,
                        },
                    ],
                }
            }
        }
    }

    pub fn satisfies(&self, full_rounds: u32, partial_rounds: u32) -> bool {
        self.lower_bounds(full_rounds, partial_rounds)
            .is_satisfied_by(full_rounds, partial_rounds)
    }
}

/// Computes the bound of every attack for `(R_F, R_P)` under `params`.
pub fn lower_bounds(params: &Parameters, full_rounds: u32, partial_rounds: u32) -> BoundSet {
    BoundEvaluator::new(params).lower_bounds(full_rounds, partial_rounds)
}

/// Returns `true` if `(R_F, R_P)` resists every modeled attack under `params`.
pub fn satisfies(params: &Parameters, full_rounds: u32, partial_rounds: u32) -> bool {
    BoundEvaluator::new(params).satisfies(full_rounds, partial_rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn goldilocks() -> BigUint {
        BigUint::from(0xFFFF_FFFF_0000_0001u64)
    }

    fn bn254() -> BigUint {
        BigUint::parse_bytes(
            b"30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
            16,
        )
        .unwrap()
    }

    fn mnt4_753() -> BigUint {
        crate::fields::MNT4_753.modulus()
    }

    fn rounds_of(set: &BoundSet) -> Vec<(Attack, Layer, i64)> {
        set.iter()
            .map(|bound| (bound.attack, bound.layer, bound.rounds))
            .collect()
    }

    #[test]
    fn test_power_sbox_bounds() {
        let params = Parameters::new(goldilocks(), 16, 7, 128).unwrap();
        let bounds = lower_bounds(&params, 6, 20);

        assert_eq!(
            rounds_of(&bounds),
            vec![
                (Attack::Statistical, Layer::Full, 6),
                (Attack::Interpolation, Layer::Full, 6),
                (Attack::Groebner1, Layer::Full, -7),
                (Attack::Groebner2, Layer::Full, -2),
            ]
        );
        assert_eq!(bounds.required(Layer::Full), 6);
        assert_eq!(bounds.required(Layer::Partial), 0);

        assert!(satisfies(&params, 6, 20));
        assert!(!satisfies(&params, 6, 19), "interpolation needs R_P >= 20");
        assert!(!satisfies(&params, 4, 40), "statistical needs R_F >= 6");
    }

    #[test]
    fn test_inverse_sbox_bounds() {
        let params = Parameters::new(bn254(), 6, -1, 128).unwrap();
        assert_eq!(params.field_bits(), 254);
        let bounds = lower_bounds(&params, 8, 50);

        assert_eq!(
            rounds_of(&bounds),
            vec![
                (Attack::Statistical, Layer::Full, 6),
                (Attack::Interpolation, Layer::Partial, 48),
                (Attack::Groebner1, Layer::Partial, 48),
                (Attack::Groebner2, Layer::Partial, 7),
            ]
        );
        assert_eq!(bounds.required(Layer::Partial), 48);
        assert!(satisfies(&params, 8, 48));
        assert!(!satisfies(&params, 8, 47));
        assert!(satisfies(&params, 6, 53));
        assert!(!satisfies(&params, 6, 52));
        assert!(!satisfies(&params, 4, 100));
    }

    #[test]
    fn test_inverse_sbox_bounds_small_width() {
        // t = 3 over a 753-bit field: log2(3^6) = 9.51, so 6 full rounds leave 67 - 9
        let params = Parameters::new(mnt4_753(), 3, -1, 128).unwrap();
        assert_eq!(params.field_bits(), 753);
        let bounds = lower_bounds(&params, 6, 58);

        assert_eq!(
            rounds_of(&bounds),
            vec![
                (Attack::Statistical, Layer::Full, 6),
                (Attack::Interpolation, Layer::Partial, 58),
                (Attack::Groebner1, Layer::Partial, 58),
                (Attack::Groebner2, Layer::Partial, 27),
            ]
        );
    }

    #[test]
    fn test_statistical_bound_small_field() {
        // log2(p) - 1 = 3.95 for p = 31, so M <= 3 * (t + 1) = 9 is required for 6 rounds
        let secure = Parameters::new(BigUint::from(31u32), 2, 3, 9).unwrap();
        let insecure = Parameters::new(BigUint::from(31u32), 2, 3, 10).unwrap();
        let statistical = |params: &Parameters| {
            lower_bounds(params, 0, 1000)
                .iter()
                .find(|bound| bound.attack == Attack::Statistical)
                .map(|bound| bound.rounds)
        };
        assert_eq!(statistical(&secure), Some(STATISTICAL_FULL_ROUNDS));
        assert_eq!(
            statistical(&insecure),
            Some(STATISTICAL_FULL_ROUNDS_SMALL_FIELD)
        );
    }

    #[test]
    fn test_statistical_bound_large_exponent() {
        // floor(log2(p) - (alpha - 1) / 2) goes negative for a tiny field and a huge exponent
        let params = Parameters::new(BigUint::from(7u32), 3, 101, 1).unwrap();
        let bound = lower_bounds(&params, 0, 1000).iter().next().copied().unwrap();
        assert_eq!(bound.attack, Attack::Statistical);
        assert_eq!(bound.rounds, STATISTICAL_FULL_ROUNDS_SMALL_FIELD);
    }

    #[test]
    fn test_evaluator_matches_free_functions() {
        let params = Parameters::new(bn254(), 3, 5, 128).unwrap();
        let evaluator = BoundEvaluator::new(&params);
        for (full, partial) in [(4, 10), (8, 56), (8, 57), (6, 52), (10, 1)] {
            assert_eq!(
                evaluator.satisfies(full, partial),
                satisfies(&params, full, partial)
            );
            assert_eq!(
                evaluator.lower_bounds(full, partial),
                lower_bounds(&params, full, partial)
            );
        }
    }

    proptest! {
        #[test]
        fn property_power_bounds_are_monotone(
            width in 1u32..30,
            alpha in prop::sample::select(vec![3i64, 5, 7, 11, 17]),
            security_bits in prop::sample::select(vec![80u32, 128, 256]),
            full in 0u32..40,
            partial in 0u32..120,
            extra_full in 0u32..10,
            extra_partial in 0u32..10,
        ) {
            let params = Parameters::new(bn254(), width, alpha, security_bits).unwrap();
            let evaluator = BoundEvaluator::new(&params);
            if evaluator.satisfies(full, partial) {
                prop_assert!(evaluator.satisfies(full + extra_full, partial + extra_partial));
            }
        }

        #[test]
        fn property_inverse_bounds_are_monotone(
            width in 1u32..30,
            security_bits in prop::sample::select(vec![80u32, 128, 256]),
            full in 0u32..40,
            partial in 0u32..200,
            extra_full in 0u32..10,
            extra_partial in 0u32..10,
        ) {
            let params = Parameters::new(goldilocks(), width, -1, security_bits).unwrap();
            let evaluator = BoundEvaluator::new(&params);
            if evaluator.satisfies(full, partial) {
                prop_assert!(evaluator.satisfies(full + extra_full, partial + extra_partial));
            }
        }
    }
}
