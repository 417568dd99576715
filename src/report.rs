//! Batch computation and formatting of round-number tables.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use num_bigint::BigUint;
use tracing::info;

use crate::bounds::{BoundSet, Layer};
use crate::cost::CostFunction;
use crate::error::{Result, RoundsError};
use crate::params::{Parameters, SearchBounds};
use crate::prime::PrimeSource;
use crate::search::{calc_final_numbers, RoundNumbers};

const RULE_WIDTH: usize = 70;

/// One `(N, t, M)` entry of a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combination {
    /// State size `N` in bits.
    pub state_bits: u32,
    /// State width `t` in field elements.
    pub width: u32,
    /// Security level `M` in bits.
    pub security_bits: u32,
}

impl Combination {
    pub const fn new(state_bits: u32, width: u32, security_bits: u32) -> Self {
        Combination {
            state_bits,
            width,
            security_bits,
        }
    }

    /// `n = N / t`, rounded down.
    pub fn field_bits(&self) -> u64 {
        u64::from(self.state_bits / self.width.max(1))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.state_bits, self.width, self.security_bits)
    }
}

impl FromStr for Combination {
    type Err = RoundsError;

    /// Parses `N,t,M`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RoundsError::InvalidParameter(format!("combination '{s}': {e}")))?;

        match values[..] {
            [state_bits, width, security_bits] => {
                Ok(Combination::new(state_bits, width, security_bits))
            }
            _ => Err(RoundsError::InvalidParameter(format!(
                "combination '{s}' must have the form N,t,M"
            ))),
        }
    }
}

/// State sizes, widths and security levels tabulated by default.
pub const DEFAULT_COMBINATIONS: [Combination; 12] = [
    Combination::new(1536, 2, 128),
    Combination::new(1536, 4, 128),
    Combination::new(1536, 6, 128),
    Combination::new(1536, 8, 128),
    Combination::new(1536, 16, 128),
    Combination::new(1512, 24, 128),
    Combination::new(1536, 2, 256),
    Combination::new(1536, 4, 256),
    Combination::new(1536, 6, 256),
    Combination::new(1536, 8, 256),
    Combination::new(1536, 16, 256),
    Combination::new(1512, 24, 256),
];

/// One computed line of a batch report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub combination: Combination,
    /// `n`, the bit length of `prime`.
    pub field_bits: u64,
    pub prime: BigUint,
    pub rounds: RoundNumbers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Aligned columns under a header.
    #[default]
    Text,
    /// LaTeX table body rows, one per combination.
    Latex,
}

/// Computes the round numbers of every combination, minimizing the S-box count.
///
/// For each combination a prime of bit length `n = N / t` is drawn from `primes`.
/// The first failing combination aborts the batch.
pub fn batch_round_numbers<S: PrimeSource + ?Sized>(
    combinations: &[Combination],
    alpha: i64,
    security_margin: bool,
    bounds: &SearchBounds,
    primes: &mut S,
) -> Result<Vec<ReportRow>> {
    combinations
        .iter()
        .map(|&combination| {
            if combination.width == 0 {
                return Err(RoundsError::InvalidParameter(format!(
                    "combination {combination} has a state width of zero"
                )));
            }
            let field_bits = combination.field_bits();
            let prime = primes.generate_prime(field_bits)?;
            let params = Parameters::new(
                prime.clone(),
                combination.width,
                alpha,
                combination.security_bits,
            )?;
            let rounds = calc_final_numbers(&params, CostFunction::SBox, security_margin, bounds)?;
            info!(%combination, field_bits, "{}", rounds);

            Ok(ReportRow {
                combination,
                field_bits,
                prime,
                rounds,
            })
        })
        .collect()
}

/// Writes `rows` in the column order `M, N, n, t, R_F, R_P, S-box cost, size cost`.
pub fn write_table<W: Write>(writer: &mut W, rows: &[ReportRow], format: TableFormat) -> Result<()> {
    match format {
        TableFormat::Text => {
            writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
            writeln!(
                writer,
                "{:>6}{:>7}{:>7}{:>5}{:>6}{:>6}{:>14}{:>19}",
                "M", "N", "n", "t", "R_F", "R_P", "S-boxes", "Size"
            )?;
            writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
            for row in rows {
                writeln!(
                    writer,
                    "{:>6}{:>7}{:>7}{:>5}{:>6}{:>6}{:>14}{:>19}",
                    row.combination.security_bits,
                    row.combination.state_bits,
                    row.field_bits,
                    row.combination.width,
                    row.rounds.full_rounds,
                    row.rounds.partial_rounds,
                    row.rounds.min_cost,
                    row.rounds.size_cost
                )?;
            }
            writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        }
        TableFormat::Latex => {
            for row in rows {
                writeln!(
                    writer,
                    "${}$ & ${}$ & ${}$ & ${}$ & ${}$ & ${}$ & ${}$ & ${}$\\\\",
                    row.combination.security_bits,
                    row.combination.state_bits,
                    row.field_bits,
                    row.combination.width,
                    row.rounds.full_rounds,
                    row.rounds.partial_rounds,
                    row.rounds.min_cost,
                    row.rounds.size_cost
                )?;
            }
        }
    }
    Ok(())
}

/// Writes the per-attack bounds of a candidate and whether it is secure.
pub fn write_bounds<W: Write>(
    writer: &mut W,
    bounds: &BoundSet,
    full_rounds: u32,
    partial_rounds: u32,
) -> Result<()> {
    writeln!(writer, "{}", "-".repeat(46))?;
    writeln!(writer, "{:<30}{:>6}{:>10}", "Attack", "Layer", "Rounds")?;
    writeln!(writer, "{}", "-".repeat(46))?;
    for bound in bounds.iter() {
        writeln!(
            writer,
            "{:<30}{:>6}{:>10}",
            bound.attack.name(),
            bound.layer.to_string(),
            bound.rounds
        )?;
    }
    writeln!(writer, "{}", "-".repeat(46))?;
    writeln!(
        writer,
        "{:<36}{:>10}",
        "Required R_F:",
        bounds.required(Layer::Full)
    )?;
    writeln!(
        writer,
        "{:<36}{:>10}",
        "Required R_P:",
        bounds.required(Layer::Partial)
    )?;
    let verdict = if bounds.is_satisfied_by(full_rounds, partial_rounds) {
        "secure"
    } else {
        "INSECURE"
    };
    writeln!(
        writer,
        "{:<36}{:>10}",
        format!("R_F = {full_rounds}, R_P = {partial_rounds}:"),
        verdict
    )?;
    Ok(())
}
