//! Compare taxability, loan accrual and leverage variants side by side
//!
//! Usage: cargo run --bin compare_variants -- [config.json] [output.csv]

use anyhow::Context;
use bond_reinvestment::{
    report::{format_currency, write_comparison_csv},
    ScenarioRunner, SimulationConfig,
};
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Taxable share used for the partially taxed variant
const PARTIAL_TAXABLE_FRACTION: f64 = 0.5;

const LEVERAGE_RATIOS: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 3.0];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let runner = match args.first() {
        Some(path) => ScenarioRunner::from_json_path(Path::new(path))
            .with_context(|| format!("loading base configuration from {}", path))?,
        None => ScenarioRunner::new(SimulationConfig::default()),
    };
    let output_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("variant_comparison.csv");

    let mut scenarios = runner.taxability_variants(PARTIAL_TAXABLE_FRACTION);
    scenarios.extend(runner.loan_accrual_variants());
    scenarios.extend(runner.leverage_sweep(&LEVERAGE_RATIOS));

    let start = Instant::now();
    let outcomes = runner.run_scenarios(&scenarios);
    println!("Ran {} scenarios in {:?}\n", outcomes.len(), start.elapsed());

    println!(
        "{:<32} {:>14} {:>14} {:>14} {:>14} {:>10}",
        "Scenario", "Interest", "Loan Int", "Tax", "Net Profit", "Ann. %"
    );
    println!("{}", "-".repeat(102));

    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => println!(
                "{:<32} {:>14} {:>14} {:>14} {:>14} {:>10.2}",
                outcome.name,
                format_currency(result.aggregates.total_interest),
                format_currency(result.aggregates.loan_interest),
                format_currency(result.tax.net_tax_payable),
                format_currency(result.summary.net_profit),
                result.summary.annualized_return_pct,
            ),
            Err(err) => println!("{:<32} error: {}", outcome.name, err),
        }
    }

    let file = File::create(output_path).with_context(|| format!("creating {}", output_path))?;
    write_comparison_csv(&outcomes, file).with_context(|| format!("writing {}", output_path))?;
    println!("\nComparison written to {}", output_path);

    Ok(())
}
