//! Implementation cost of a round configuration.
//!
//! All functions take `(R_F, R_P, N, t)` where `N = n * t` is the state size in bits.

use std::fmt;

/// Total number of S-box evaluations: `t * R_F + R_P`.
pub fn sbox_cost(full_rounds: u32, partial_rounds: u32, _state_bits: u64, width: u32) -> u64 {
    u64::from(width) * u64::from(full_rounds) + u64::from(partial_rounds)
}

/// Proxy for the total number of field multiplications (circuit size):
/// `N * R_F + ceil(N / t) * R_P`.
///
/// A partial round applies the S-box to a single element, so it costs `ceil(N / t)`
/// instead of `N`.
pub fn size_cost(full_rounds: u32, partial_rounds: u32, state_bits: u64, width: u32) -> u64 {
    state_bits * u64::from(full_rounds)
        + state_bits.div_ceil(u64::from(width)) * u64::from(partial_rounds)
}

/// Proxy for circuit depth: `R_F + R_P`.
pub fn depth_cost(full_rounds: u32, partial_rounds: u32, _state_bits: u64, _width: u32) -> u64 {
    u64::from(full_rounds) + u64::from(partial_rounds)
}

/// Objective minimized by the round-number search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CostFunction {
    /// See [`sbox_cost`].
    #[default]
    SBox,
    /// See [`size_cost`].
    Size,
    /// See [`depth_cost`].
    Depth,
}

impl CostFunction {
    pub fn evaluate(&self, full_rounds: u32, partial_rounds: u32, state_bits: u64, width: u32) -> u64 {
        match self {
            CostFunction::SBox => sbox_cost(full_rounds, partial_rounds, state_bits, width),
            CostFunction::Size => size_cost(full_rounds, partial_rounds, state_bits, width),
            CostFunction::Depth => depth_cost(full_rounds, partial_rounds, state_bits, width),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CostFunction::SBox => "sbox",
            CostFunction::Size => "size",
            CostFunction::Depth => "depth",
        }
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
