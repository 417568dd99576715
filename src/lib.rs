//! Round-Number Selection for Poseidon-Style Permutations
//!
//! This crate determines how many full and partial rounds a substitution-permutation
//! network over a prime field needs to resist the known algebraic attacks, and picks
//! the cheapest configuration that does.
//!
//! # Parameters
//! - Field characteristic `p` (arbitrary size, e.g. 753-bit pairing-curve fields)
//! - State width `t` in field elements
//! - S-box exponent `alpha`, or `-1` for the inversion S-box
//! - Security level `M` in bits
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use poseidon_rounds::{calc_final_numbers, CostFunction, Parameters, SearchBounds};
//!
//! let goldilocks = BigUint::from(0xFFFF_FFFF_0000_0001u64);
//! let params = Parameters::new(goldilocks, 12, 7, 128).unwrap();
//! let rounds = calc_final_numbers(&params, CostFunction::SBox, true, &SearchBounds::default()).unwrap();
//! assert_eq!((rounds.full_rounds, rounds.partial_rounds), (8, 22));
//! ```

pub mod bounds;
pub mod cost;
pub mod error;
pub mod fields;
pub mod params;
pub mod prime;
pub mod report;
pub mod search;

pub use bounds::{lower_bounds, satisfies, Attack, Bound, BoundEvaluator, BoundSet, Layer};
pub use cost::{depth_cost, sbox_cost, size_cost, CostFunction};
pub use error::{Result, RoundsError};
pub use fields::{KnownField, KNOWN_FIELDS};
pub use params::{Parameters, SBox, SearchBounds, DEFAULT_FULL_ROUNDS, DEFAULT_PARTIAL_ROUNDS};
pub use prime::{is_probable_prime, PrimeSource, RandomPrimes};
pub use report::{
    batch_round_numbers, write_bounds, write_table, Combination, ReportRow, TableFormat,
    DEFAULT_COMBINATIONS,
};
pub use search::{apply_security_margin, calc_final_numbers, find_round_numbers, RoundNumbers};
