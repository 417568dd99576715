//! Prime generation for batch reports.
//!
//! Round numbers depend on the field only through `log2(p)`, so batch reports
//! draw an arbitrary prime of the requested bit length. The source is a trait so
//! callers can supply fixed moduli instead.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Result, RoundsError};

/// Miller-Rabin rounds used by [`RandomPrimes`]; the error probability is at most `4^-40`.
pub const DEFAULT_MILLER_RABIN_ROUNDS: usize = 40;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Supplies primes of a given bit length.
pub trait PrimeSource {
    /// Returns a (probable) prime `p` with `p.bits() == bits`.
    fn generate_prime(&mut self, bits: u64) -> Result<BigUint>;
}

/// Draws uniformly random odd candidates with the top bit set until one passes
/// [`is_probable_prime`].
pub struct RandomPrimes<R> {
    rng: R,
    rounds: usize,
}

impl<R: Rng> RandomPrimes<R> {
    pub fn new(rng: R) -> Self {
        RandomPrimes {
            rng,
            rounds: DEFAULT_MILLER_RABIN_ROUNDS,
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }
}

impl RandomPrimes<StdRng> {
    /// A reproducible source: the same seed always yields the same primes.
    pub fn seeded(seed: u64) -> Self {
        RandomPrimes::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomPrimes::new(StdRng::from_entropy())
    }
}

impl<R: Rng> PrimeSource for RandomPrimes<R> {
    fn generate_prime(&mut self, bits: u64) -> Result<BigUint> {
        if bits < 2 {
            return Err(RoundsError::InvalidParameter(format!(
                "no prime has a bit length of {bits}"
            )));
        }

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let mut candidate = self.rng.gen_biguint(bits);
            candidate |= BigUint::one() << (bits - 1);
            candidate |= BigUint::one();

            if is_probable_prime(&candidate, self.rounds, &mut self.rng) {
                debug!(bits, attempts, "generated prime {:#x}", candidate);
                return Ok(candidate);
            }
        }
    }
}

/// Trial division by the primes below 100 followed by `rounds` Miller-Rabin rounds
/// with random witnesses.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for small in SMALL_PRIMES {
        let small = BigUint::from(small);
        if *n == small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
