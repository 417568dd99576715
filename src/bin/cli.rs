use clap::{Args, Parser, Subcommand, ValueEnum};
use num_bigint::BigUint;
use poseidon_rounds::fields::find_field;
use poseidon_rounds::{
    batch_round_numbers, calc_final_numbers, lower_bounds, write_bounds, write_table,
    Combination, CostFunction, Parameters, RandomPrimes, SearchBounds, TableFormat,
    DEFAULT_COMBINATIONS, DEFAULT_FULL_ROUNDS, DEFAULT_PARTIAL_ROUNDS, KNOWN_FIELDS,
};
use std::fmt::Display;
use std::io::{self, Write};
use std::ops::Range;
use tracing::Level;

#[derive(Parser)]
#[command(name = "rounds")]
#[command(about = "Round-number calculator for Poseidon-style permutations")]
#[command(version)]
struct Cli {
    /// Log search results (-v) or every improvement found during a search (-vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest secure round numbers for one instance
    Find {
        #[command(flatten)]
        instance: Instance,

        /// Skip the security margin (+2 full rounds, +7.5% partial rounds)
        #[arg(long)]
        no_margin: bool,

        /// Cost to minimize
        #[arg(short, long, value_enum, default_value_t = Objective::Sbox)]
        cost: Objective,

        /// Full-round counts to scan, as start..end
        #[arg(long = "full-rounds", value_parser = parse_range, default_value = "4..100")]
        full_range: Range<u32>,

        /// Partial-round counts to scan, as start..end
        #[arg(long = "partial-rounds", value_parser = parse_range, default_value = "1..500")]
        partial_range: Range<u32>,

        /// Only print R_F and R_P
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the per-attack bounds for a given round configuration
    Check {
        #[command(flatten)]
        instance: Instance,

        /// Number of full rounds
        #[arg(long)]
        full_rounds: u32,

        /// Number of partial rounds
        #[arg(long)]
        partial_rounds: u32,
    },

    /// Tabulate round numbers for (N, t, M) combinations using random primes
    Table {
        /// S-box exponent, or -1 for inversion
        #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
        alpha: i64,

        /// Skip the security margin
        #[arg(long)]
        no_margin: bool,

        /// Print LaTeX table rows instead of a text table
        #[arg(long)]
        latex: bool,

        /// Seed for prime generation (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Combination N,t,M (repeatable; defaults to the built-in table)
        #[arg(short, long = "combination", value_parser = parse_combination)]
        combinations: Vec<Combination>,
    },

    /// Round numbers for the built-in fields
    Fields {
        /// S-box exponent to use for every field instead of its own
        #[arg(short, long, allow_negative_numbers = true)]
        alpha: Option<i64>,

        /// State widths to evaluate
        #[arg(short = 't', long = "width", default_values_t = vec![3u32, 12])]
        widths: Vec<u32>,

        /// Security level in bits
        #[arg(short = 'm', long, default_value_t = 128)]
        security: u32,

        /// Skip the security margin
        #[arg(long)]
        no_margin: bool,
    },
}

#[derive(Args)]
struct Instance {
    /// Field characteristic, decimal or 0x-prefixed hexadecimal
    #[arg(short, long, value_parser = parse_prime, required_unless_present = "field")]
    prime: Option<BigUint>,

    /// Name of a built-in field instead of --prime (e.g. bn254, goldilocks)
    #[arg(short, long, conflicts_with = "prime")]
    field: Option<String>,

    /// State width in field elements
    #[arg(short = 't', long)]
    width: u32,

    /// S-box exponent, or -1 for inversion (defaults to the exponent of --field)
    #[arg(short, long, allow_negative_numbers = true)]
    alpha: Option<i64>,

    /// Security level in bits
    #[arg(short = 'm', long, default_value_t = 128)]
    security: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Objective {
    Sbox,
    Size,
    Depth,
}

impl From<Objective> for CostFunction {
    fn from(objective: Objective) -> Self {
        match objective {
            Objective::Sbox => CostFunction::SBox,
            Objective::Size => CostFunction::Size,
            Objective::Depth => CostFunction::Depth,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let level = if cli.verbose > 1 {
            Level::DEBUG
        } else {
            Level::INFO
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }

    match cli.command {
        Commands::Find {
            instance,
            no_margin,
            cost,
            full_range,
            partial_range,
            quiet,
        } => {
            let bounds = SearchBounds::new(full_range, partial_range);
            find(&instance, !no_margin, cost.into(), &bounds, quiet);
        }
        Commands::Check {
            instance,
            full_rounds,
            partial_rounds,
        } => {
            check(&instance, full_rounds, partial_rounds);
        }
        Commands::Table {
            alpha,
            no_margin,
            latex,
            seed,
            combinations,
        } => {
            table(alpha, !no_margin, latex, seed, combinations);
        }
        Commands::Fields {
            alpha,
            widths,
            security,
            no_margin,
        } => {
            fields(alpha, &widths, security, !no_margin);
        }
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn parse_prime(s: &str) -> Result<BigUint, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => s.parse().ok(),
    };
    parsed.ok_or_else(|| format!("'{}' is not a decimal or 0x-prefixed hexadecimal integer", s))
}

fn parse_range(s: &str) -> Result<Range<u32>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("'{}' is not a range of the form start..end", s))?;
    let start: u32 = start.trim().parse().map_err(|e| format!("{}: {}", s, e))?;
    let end: u32 = end.trim().parse().map_err(|e| format!("{}: {}", s, e))?;
    Ok(start..end)
}

fn parse_combination(s: &str) -> Result<Combination, String> {
    s.parse().map_err(|e: poseidon_rounds::RoundsError| e.to_string())
}

fn load_parameters(instance: &Instance) -> Parameters {
    let (prime, field_alpha) = match (&instance.prime, &instance.field) {
        (Some(prime), _) => (prime.clone(), None),
        (None, Some(name)) => match find_field(name) {
            Some(field) => (field.modulus(), Some(field.sbox_exponent)),
            None => {
                let names: Vec<&str> = KNOWN_FIELDS.iter().map(|f| f.name).collect();
                fail(format!(
                    "unknown field '{}'; known fields: {}",
                    name,
                    names.join(", ")
                ))
            }
        },
        (None, None) => fail("either --prime or --field is required"),
    };

    let alpha = match instance.alpha.or(field_alpha) {
        Some(alpha) => alpha,
        None => fail("--alpha is required with --prime"),
    };

    Parameters::new(prime, instance.width, alpha, instance.security).unwrap_or_else(|e| fail(e))
}

fn find(
    instance: &Instance,
    security_margin: bool,
    cost_function: CostFunction,
    bounds: &SearchBounds,
    quiet: bool,
) {
    let params = load_parameters(instance);
    let rounds = calc_final_numbers(&params, cost_function, security_margin, bounds)
        .unwrap_or_else(|e| fail(e));

    if quiet {
        println!("{} {}", rounds.full_rounds, rounds.partial_rounds);
        return;
    }

    println!("{}", "-".repeat(46));
    println!("{:<34}{:>12}", "Field bits (n):", params.field_bits());
    println!("{:<34}{:>12}", "State width (t):", params.width());
    println!("{:<34}{:>12}", "S-box:", params.sbox().to_string());
    println!("{:<34}{:>12}", "Security level (M):", params.security_bits());
    println!("{:<34}{:>12}", "Security margin:", security_margin);
    println!("{}", "-".repeat(46));
    println!("{:<34}{:>12}", "Full rounds (R_F):", rounds.full_rounds);
    println!("{:<34}{:>12}", "Partial rounds (R_P):", rounds.partial_rounds);
    println!(
        "{:<34}{:>12}",
        format!("Cost ({}):", cost_function),
        rounds.min_cost
    );
    println!("{:<34}{:>12}", "Size cost:", rounds.size_cost);
    if bounds.full_rounds != DEFAULT_FULL_ROUNDS || bounds.partial_rounds != DEFAULT_PARTIAL_ROUNDS {
        println!(
            "{:<34}{:>12}",
            "Scanned R_F / R_P:",
            format!("{:?} / {:?}", bounds.full_rounds, bounds.partial_rounds)
        );
    }
}

fn check(instance: &Instance, full_rounds: u32, partial_rounds: u32) {
    let params = load_parameters(instance);
    let bounds = lower_bounds(&params, full_rounds, partial_rounds);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_bounds(&mut out, &bounds, full_rounds, partial_rounds).unwrap_or_else(|e| fail(e));
    out.flush().unwrap_or_else(|e| fail(e));

    if !bounds.is_satisfied_by(full_rounds, partial_rounds) {
        std::process::exit(1);
    }
}

fn table(
    alpha: i64,
    security_margin: bool,
    latex: bool,
    seed: Option<u64>,
    combinations: Vec<Combination>,
) {
    let combinations = if combinations.is_empty() {
        DEFAULT_COMBINATIONS.to_vec()
    } else {
        combinations
    };
    let mut primes = match seed {
        Some(seed) => RandomPrimes::seeded(seed),
        None => RandomPrimes::from_entropy(),
    };

    let rows = batch_round_numbers(
        &combinations,
        alpha,
        security_margin,
        &SearchBounds::default(),
        &mut primes,
    )
    .unwrap_or_else(|e| fail(e));

    let format = if latex {
        TableFormat::Latex
    } else {
        TableFormat::Text
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_table(&mut out, &rows, format).unwrap_or_else(|e| fail(e));
}

fn fields(alpha: Option<i64>, widths: &[u32], security: u32, security_margin: bool) {
    let bounds = SearchBounds::default();

    println!("{}", "-".repeat(64));
    println!(
        "{:<14}{:>6}{:>5}{:>7}{:>6}{:>6}{:>20}",
        "Field", "n", "t", "alpha", "R_F", "R_P", "S-boxes / Size"
    );
    println!("{}", "-".repeat(64));
    for field in KNOWN_FIELDS {
        let alpha = alpha.unwrap_or(field.sbox_exponent);
        for &width in widths {
            let params = Parameters::new(field.modulus(), width, alpha, security)
                .unwrap_or_else(|e| fail(e));
            let rounds = calc_final_numbers(&params, CostFunction::SBox, security_margin, &bounds)
                .unwrap_or_else(|e| fail(e));
            println!(
                "{:<14}{:>6}{:>5}{:>7}{:>6}{:>6}{:>20}",
                field.name,
                params.field_bits(),
                width,
                alpha,
                rounds.full_rounds,
                rounds.partial_rounds,
                format!("{} / {}", rounds.min_cost, rounds.size_cost)
            );
        }
    }
    println!("{}", "-".repeat(64));
}
