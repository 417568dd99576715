//! Instance parameters and search configuration.
//!
//! A [`Parameters`] value bundles the field characteristic `p`, the state width `t`,
//! the S-box and the target security level `M`. It is validated once on construction,
//! so the bound evaluator and the search never see an out-of-domain input.

use std::fmt;
use std::ops::Range;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Result, RoundsError};

/// Full-round counts scanned by default. Full rounds are split evenly around the
/// partial rounds, so only even values in this range are considered.
///
/// Every round count published for the usual target curves lies well inside this
/// range; the bounds are not derived from the attack formulas.
pub const DEFAULT_FULL_ROUNDS: Range<u32> = 4..100;

/// Partial-round counts scanned by default.
pub const DEFAULT_PARTIAL_ROUNDS: Range<u32> = 1..500;

/// The nonlinear layer of the permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SBox {
    /// `x -> x^alpha` with `alpha >= 2`.
    Power(u32),
    /// `x -> x^-1`, written as `alpha = -1`.
    Inverse,
}

impl SBox {
    /// Parses the conventional integer encoding of the S-box exponent.
    ///
    /// `-1` selects the inversion S-box. Exponents below 2 (other than `-1`) are
    /// rejected: `0` is not a permutation and `1` is linear, which makes every
    /// `log(2, alpha)` term in the bounds undefined.
    pub fn from_exponent(alpha: i64) -> Result<Self> {
        match alpha {
            -1 => Ok(SBox::Inverse),
            1 => Err(RoundsError::InvalidParameter(
                "S-box exponent 1 is linear; expected alpha >= 2 or -1".to_string(),
            )),
            a if a >= 2 => u32::try_from(a).map(SBox::Power).map_err(|_| {
                RoundsError::InvalidParameter(format!("S-box exponent {a} does not fit in 32 bits"))
            }),
            a => Err(RoundsError::InvalidParameter(format!(
                "invalid S-box exponent {a}: expected alpha >= 2, or -1 for inversion"
            ))),
        }
    }

    /// The integer encoding accepted by [`SBox::from_exponent`].
    pub fn exponent(&self) -> i64 {
        match self {
            SBox::Power(alpha) => i64::from(*alpha),
            SBox::Inverse => -1,
        }
    }
}

impl fmt::Display for SBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SBox::Power(alpha) => write!(f, "x^{alpha}"),
            SBox::Inverse => write!(f, "x^-1"),
        }
    }
}

/// Ranges scanned by the round-number search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBounds {
    /// Full-round counts; odd values are skipped.
    pub full_rounds: Range<u32>,
    /// Partial-round counts.
    pub partial_rounds: Range<u32>,
}

impl SearchBounds {
    pub fn new(full_rounds: Range<u32>, partial_rounds: Range<u32>) -> Self {
        SearchBounds {
            full_rounds,
            partial_rounds,
        }
    }

    /// Even full-round counts in scan order.
    pub fn full_round_candidates(&self) -> impl Iterator<Item = u32> {
        self.full_rounds.clone().filter(|rounds| rounds % 2 == 0)
    }
}

impl Default for SearchBounds {
    fn default() -> Self {
        SearchBounds::new(DEFAULT_FULL_ROUNDS, DEFAULT_PARTIAL_ROUNDS)
    }
}

/// Validated parameters of one permutation instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    prime: BigUint,
    width: u32,
    sbox: SBox,
    security_bits: u32,
    /// `n = ceil(log2(p))`
    field_bits: u64,
    /// `floor(2 * log2(p))`, exact.
    twice_log2_floor: u64,
    log2_prime: f64,
}

impl Parameters {
    /// Validates and bundles the parameters of one instance.
    ///
    /// # Arguments
    ///
    /// * `prime` - Field characteristic `p`; must be odd and greater than 2
    /// * `width` - State width `t` in field elements
    /// * `alpha` - S-box exponent, or `-1` for the inversion S-box
    /// * `security_bits` - Target security level `M`
    ///
    /// # Errors
    ///
    /// [`RoundsError::InvalidParameter`] if any argument is out of domain.
    pub fn new(prime: BigUint, width: u32, alpha: i64, security_bits: u32) -> Result<Self> {
        let sbox = SBox::from_exponent(alpha)?;
        Self::with_sbox(prime, width, sbox, security_bits)
    }

    pub fn with_sbox(prime: BigUint, width: u32, sbox: SBox, security_bits: u32) -> Result<Self> {
        if let SBox::Power(alpha) = sbox {
            if alpha < 2 {
                return Err(RoundsError::InvalidParameter(format!(
                    "invalid S-box exponent {alpha}: expected alpha >= 2"
                )));
            }
        }
        if width == 0 {
            return Err(RoundsError::InvalidParameter(
                "state width must be at least 1".to_string(),
            ));
        }
        if security_bits == 0 {
            return Err(RoundsError::InvalidParameter(
                "security level must be at least 1 bit".to_string(),
            ));
        }
        if prime <= BigUint::from(2u32) || (&prime % 2u32).is_zero() {
            return Err(RoundsError::InvalidParameter(format!(
                "field characteristic {prime} is not an odd prime"
            )));
        }

        let field_bits = prime.bits();
        let twice_log2_floor = (&prime * &prime).bits() - 1;
        let log2_prime = log2(&prime);

        Ok(Parameters {
            prime,
            width,
            sbox,
            security_bits,
            field_bits,
            twice_log2_floor,
            log2_prime,
        })
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn sbox(&self) -> SBox {
        self.sbox
    }

    pub fn security_bits(&self) -> u32 {
        self.security_bits
    }

    /// `n = ceil(log2(p))`, taken from the bit length of `p`.
    pub fn field_bits(&self) -> u64 {
        self.field_bits
    }

    /// `N = n * t`
    pub fn state_bits(&self) -> u64 {
        self.field_bits * u64::from(self.width)
    }

    /// `log2(p)` as a float, accurate to the precision of an `f64` regardless of the size of `p`.
    pub fn log2_prime(&self) -> f64 {
        self.log2_prime
    }

    /// Computes `floor(log2(p) - halves / 2)` exactly.
    pub fn floor_log2_prime_minus_halves(&self, halves: u64) -> i64 {
        // floor((x - h) / 2) == floor((floor(x) - h) / 2) for integral h
        (self.twice_log2_floor as i64 - halves as i64).div_euclid(2)
    }
}

/// `log2(x)` from the top 64 bits of `x` and its bit length.
pub(crate) fn log2(x: &BigUint) -> f64 {
    let bits = x.bits();
    if bits <= 64 {
        return x.to_u64().map_or(f64::NEG_INFINITY, |v| (v as f64).log2());
    }
    let shift = bits - 64;
    let top = (x >> shift).to_u64().unwrap_or(u64::MAX);
    (top as f64).log2() + shift as f64
}

/// Least `e` such that `base^e >= value`, i.e. `ceil(log_base(value))` for `value >= 1`.
pub(crate) fn ceil_log(base: u32, value: &BigUint) -> u64 {
    debug_assert!(base >= 2);
    let base = BigUint::from(base);
    let mut power = BigUint::one();
    let mut exponent = 0;
    while &power < value {
        power *= &base;
        exponent += 1;
    }
    exponent
}

/// `floor(log2(base^exponent))`, exact.
pub(crate) fn floor_log2_pow(base: u32, exponent: u32) -> u64 {
    BigUint::from(base).pow(exponent).bits().saturating_sub(1)
}

/// `ceil(log2(x))` for `x >= 1`.
pub(crate) fn ceil_log2(x: u32) -> u64 {
    u64::from(u32::BITS - x.saturating_sub(1).leading_zeros())
}
