use poseidon_rounds::fields::MNT4_753;
use poseidon_rounds::{
    calc_final_numbers, lower_bounds, satisfies, write_bounds, CostFunction, Parameters,
    SearchBounds,
};

fn main() -> poseidon_rounds::Result<()> {
    println!("🔢 Poseidon Round Numbers Example");
    println!("=================================");

    // Example 1: inversion S-box over a 753-bit field
    let params = Parameters::new(MNT4_753.modulus(), 3, MNT4_753.sbox_exponent, 128)?;
    println!("🧮 Field: {} ({} bits)", MNT4_753.name, params.field_bits());
    println!("📐 Width: {}", params.width());
    println!("🔧 S-box: {}", params.sbox());
    println!("🛡️  Security: {} bits", params.security_bits());
    println!();

    println!("📝 Example 1: Cheapest configuration with the security margin");
    println!("-------------------------------------------------------------");
    let bounds = SearchBounds::default();
    let rounds = calc_final_numbers(&params, CostFunction::SBox, true, &bounds)?;
    println!("🔄 {}", rounds);
    println!(
        "✅ Secure: {}",
        satisfies(&params, rounds.full_rounds, rounds.partial_rounds)
    );
    println!();

    // Example 2: what each attack asks for at the margin-free minimum
    println!("📝 Example 2: Per-attack breakdown without the margin");
    println!("-----------------------------------------------------");
    let minimal = calc_final_numbers(&params, CostFunction::SBox, false, &bounds)?;
    let breakdown = lower_bounds(&params, minimal.full_rounds, minimal.partial_rounds);
    write_bounds(
        &mut std::io::stdout(),
        &breakdown,
        minimal.full_rounds,
        minimal.partial_rounds,
    )?;
    println!();

    // Example 3: one partial round fewer is no longer enough
    println!("📝 Example 3: Dropping a partial round");
    println!("--------------------------------------");
    let fewer = minimal.partial_rounds - 1;
    println!(
        "❌ R_F = {}, R_P = {} secure: {}",
        minimal.full_rounds,
        fewer,
        satisfies(&params, minimal.full_rounds, fewer)
    );

    Ok(())
}
