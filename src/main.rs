//! Bond Reinvestment CLI
//!
//! Runs one simulation from flags and/or a JSON configuration file

use anyhow::{bail, Context};
use bond_reinvestment::{
    config::load_config,
    report::{format_currency, tax_breakdown, write_monthly_csv_file},
    InstrumentConfig, LoanAccrual, SimulationConfig, SimulationEngine, TaxRegime,
};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Leveraged bond reinvestment simulator with post-tax returns
#[derive(Parser, Debug)]
#[command(name = "bond_reinvestment", version, about)]
struct Cli {
    /// JSON configuration file. Flags override values from the file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Investor's own capital
    #[arg(long)]
    capital: Option<f64>,

    /// Borrowed amount as a multiple of capital
    #[arg(long)]
    leverage: Option<f64>,

    /// Primary (high-yield) bond rate, % p.a.
    #[arg(long)]
    high_yield_rate: Option<f64>,

    /// Reinvestment (treasury) bond rate, % p.a.
    #[arg(long)]
    treasury_rate: Option<f64>,

    /// Borrowing rate, % p.a.
    #[arg(long)]
    borrowing_rate: Option<f64>,

    /// Investment period in months (1 to 60)
    #[arg(long)]
    months: Option<u32>,

    /// Entity type, selects the default tax rate
    #[arg(long, value_enum)]
    entity: Option<Entity>,

    /// Tax rate in percent, overrides the entity default
    #[arg(long)]
    tax_rate: Option<f64>,

    /// Taxable share of high-yield interest (0-1)
    #[arg(long)]
    high_yield_taxable: Option<f64>,

    /// Taxable share of treasury interest (0-1)
    #[arg(long)]
    treasury_taxable: Option<f64>,

    /// Share of high-yield interest withheld at source (0-1)
    #[arg(long)]
    high_yield_withholding: Option<f64>,

    /// Share of treasury interest withheld at source (0-1)
    #[arg(long)]
    treasury_withholding: Option<f64>,

    /// Put all capital into the treasury bond instead of a separate high-yield bond
    #[arg(long)]
    single_bond: bool,

    /// Add loan interest to the loan balance each month
    #[arg(long)]
    compound_loan: bool,

    /// Start date (YYYY-MM-DD) used to date the monthly rows
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Write the monthly breakdown to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full result to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Number of months to print
    #[arg(long, default_value_t = 24)]
    show_months: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Entity {
    /// Private limited company (default 25%)
    PrivateLimited,
    /// Limited liability partnership (default 31.2%)
    Llp,
    /// Any other entity, requires --tax-rate
    Custom,
}

fn build_config(cli: &Cli) -> anyhow::Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(capital) = cli.capital {
        config.initial_capital = capital;
    }
    if let Some(leverage) = cli.leverage {
        config.leverage_ratio = leverage;
    }
    if let Some(rate) = cli.borrowing_rate {
        config.borrowing_rate_pct = rate;
    }
    if let Some(months) = cli.months {
        config.tenure_months = months;
    }
    if cli.compound_loan {
        config.loan_accrual = LoanAccrual::Compounding;
    }
    if cli.start_date.is_some() {
        config.start_date = cli.start_date;
    }

    if cli.single_bond {
        config.primary = None;
    } else if config.primary.is_none() && cli.high_yield_rate.is_some() {
        config.primary = Some(InstrumentConfig::new("High-Yield Bond", 0.0));
    }
    if let Some(primary) = config.primary.as_mut() {
        if let Some(rate) = cli.high_yield_rate {
            primary.annual_rate_pct = rate;
        }
        if let Some(fraction) = cli.high_yield_taxable {
            primary.taxable_fraction = fraction;
        }
        if let Some(fraction) = cli.high_yield_withholding {
            primary.withholding_fraction = fraction;
        }
    }

    let target = &mut config.reinvestment_target;
    if let Some(rate) = cli.treasury_rate {
        target.annual_rate_pct = rate;
    }
    if let Some(fraction) = cli.treasury_taxable {
        target.taxable_fraction = fraction;
    }
    if let Some(fraction) = cli.treasury_withholding {
        target.withholding_fraction = fraction;
    }

    config.tax_regime = match (cli.entity, cli.tax_rate) {
        (Some(Entity::PrivateLimited), rate) => TaxRegime::CorporateFlat {
            rate_pct: rate.unwrap_or(TaxRegime::corporate().rate_pct()),
        },
        (Some(Entity::Llp), rate) => TaxRegime::LlpFlat {
            rate_pct: rate.unwrap_or(TaxRegime::llp().rate_pct()),
        },
        (Some(Entity::Custom), Some(rate_pct)) => TaxRegime::Custom { rate_pct },
        (Some(Entity::Custom), None) => bail!("--entity custom requires --tax-rate"),
        (None, Some(rate_pct)) => match config.tax_regime {
            TaxRegime::CorporateFlat { .. } => TaxRegime::CorporateFlat { rate_pct },
            TaxRegime::LlpFlat { .. } => TaxRegime::LlpFlat { rate_pct },
            TaxRegime::Custom { .. } => TaxRegime::Custom { rate_pct },
        },
        (None, None) => config.tax_regime,
    };

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let result = SimulationEngine::new(config)
        .run()
        .context("simulation failed")?;
    let config = &result.config;
    let summary = &result.summary;

    println!("Tax-Aware Bond Reinvestment Simulator");
    println!("=====================================\n");

    println!("Investment Summary:");
    println!("  Your Investment: {}", format_currency(summary.initial_capital));
    println!(
        "  Borrowed Amount: {} ({:.1}X)",
        format_currency(summary.borrowed_amount),
        config.leverage_ratio
    );
    println!("  Total Invested:  {}", format_currency(summary.total_invested));
    match &config.primary {
        Some(primary) => println!("  {}: {:.2}% p.a.", primary.name, primary.annual_rate_pct),
        None => println!("  (no separate primary bond)"),
    }
    println!(
        "  {}: {:.2}% p.a. (reinvestment)",
        config.reinvestment_target.name, config.reinvestment_target.annual_rate_pct
    );
    println!(
        "  Borrowing: {:.2}% p.a. ({:?})",
        config.borrowing_rate_pct, config.loan_accrual
    );
    println!("  Entity: {} @ {}%", config.tax_regime.entity_label(), config.tax_regime.rate_pct());
    println!();

    println!("Final Results (After Tax):");
    println!("  Total Interest Income: {}", format_currency(result.aggregates.total_interest));
    println!(
        "  Tax Liability (@{}%):  {}",
        result.tax.tax_rate_pct,
        format_currency(result.tax.net_tax_payable)
    );
    println!(
        "  Your Net Profit:       {} ({:.1}% annualized)",
        format_currency(summary.net_profit),
        summary.annualized_return_pct
    );
    println!();

    println!("Tax Calculation:");
    for line in tax_breakdown(&result) {
        println!("  {:<26} {:>16}", line.component, format_currency(line.amount));
    }
    println!();

    println!("Monthly Breakdown ({} months):", result.records.len());
    println!(
        "{:>5} {:>12} {:>14} {:>14} {:>14} {:>14} {:>16} {:>16} {:>16}",
        "Month", "Period End", "Primary Int", "Reinv Int", "Total Int", "Loan Int",
        "Reinv Balance", "Loan Balance", "Net Value"
    );
    println!("{}", "-".repeat(134));

    for (row, point) in result
        .records
        .iter()
        .zip(&summary.net_value_series)
        .take(cli.show_months)
    {
        let period_end = row
            .period_end
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "{:>5} {:>12} {:>14} {:>14} {:>14} {:>14} {:>16} {:>16} {:>16}",
            row.month,
            period_end,
            format_currency(row.primary_interest),
            format_currency(row.target_interest),
            format_currency(row.total_interest),
            format_currency(row.loan_interest),
            format_currency(row.target_balance),
            format_currency(row.loan_balance),
            format_currency(point.net_value_after_tax),
        );
    }
    if result.records.len() > cli.show_months {
        println!("... ({} more months)", result.records.len() - cli.show_months);
    }

    if let Some(path) = &cli.csv {
        write_monthly_csv_file(&result, path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nMonthly breakdown written to: {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Full result written to: {}", path.display());
    }

    Ok(())
}
