//! Report output: currency formatting, tax breakdown and CSV writers

use crate::error::{Result, SimulationError};
use crate::scenario::ScenarioOutcome;
use crate::simulation::SimulationResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount as whole currency units with thousands separators, e.g. `₹1,234,568`
pub fn format_currency(amount: f64) -> String {
    format_currency_with(amount, 0)
}

/// Format an amount with a fixed number of decimals, e.g. `₹1,234.57`
pub fn format_currency_with(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Avoid "-₹0" for amounts that round to zero
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

    match fraction {
        Some(fraction) => format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, fraction),
        None => format!("{}{}{}", sign, CURRENCY_SYMBOL, grouped),
    }
}

/// One line of the tax computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownLine {
    pub component: &'static str,
    pub amount: f64,
}

/// Tax computation from gross interest down to tax payable
pub fn tax_breakdown(result: &SimulationResult) -> Vec<BreakdownLine> {
    let tax = &result.tax;
    let exempt_interest = result.aggregates.total_interest - tax.taxable_interest;

    let mut lines = vec![BreakdownLine {
        component: "Total Interest Income",
        amount: result.aggregates.total_interest,
    }];
    if exempt_interest > 1e-6 {
        lines.push(BreakdownLine {
            component: "Tax-Exempt Interest",
            amount: -exempt_interest,
        });
    }
    lines.push(BreakdownLine {
        component: "Loan Interest Deduction",
        amount: -tax.loan_interest_deduction,
    });
    lines.push(BreakdownLine {
        component: "Taxable Income",
        amount: tax.taxable_income,
    });
    lines.push(BreakdownLine {
        component: "Tax Due",
        amount: -tax.tax_due,
    });
    if tax.withholding_credit > 0.0 {
        lines.push(BreakdownLine {
            component: "Tax Withheld at Source",
            amount: tax.withholding_credit,
        });
        lines.push(BreakdownLine {
            component: "Tax Payable",
            amount: -tax.net_tax_payable,
        });
    }
    lines
}

/// CSV layout of the monthly breakdown
#[derive(Debug, Serialize)]
struct MonthlyCsvRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Period End")]
    period_end: Option<NaiveDate>,
    #[serde(rename = "Primary Interest")]
    primary_interest: f64,
    #[serde(rename = "Reinvestment Interest")]
    target_interest: f64,
    #[serde(rename = "Total Interest Income")]
    total_interest: f64,
    #[serde(rename = "Withheld")]
    withheld: f64,
    #[serde(rename = "Reinvested")]
    reinvested: f64,
    #[serde(rename = "Reinvestment Balance")]
    target_balance: f64,
    #[serde(rename = "Loan Interest")]
    loan_interest: f64,
    #[serde(rename = "Loan Balance")]
    loan_balance: f64,
    #[serde(rename = "Cumulative Loan Interest")]
    cumulative_loan_interest: f64,
    #[serde(rename = "Taxable Income")]
    taxable_income: f64,
    #[serde(rename = "Net Value After Tax")]
    net_value_after_tax: f64,
}

/// Write the monthly breakdown as CSV
pub fn write_monthly_csv<W: Write>(result: &SimulationResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (record, point) in result.records.iter().zip(&result.summary.net_value_series) {
        csv_writer.serialize(MonthlyCsvRow {
            month: record.month,
            period_end: record.period_end,
            primary_interest: record.primary_interest,
            target_interest: record.target_interest,
            total_interest: record.total_interest,
            withheld: record.withheld,
            reinvested: record.reinvested,
            target_balance: record.target_balance,
            loan_interest: record.loan_interest,
            loan_balance: record.loan_balance,
            cumulative_loan_interest: record.cumulative_loan_interest,
            taxable_income: record.taxable_income,
            net_value_after_tax: point.net_value_after_tax,
        })?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_monthly_csv_file<P: AsRef<Path>>(result: &SimulationResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| SimulationError::ReportIo {
        path: path.to_path_buf(),
        source,
    })?;
    write_monthly_csv(result, file)?;
    log::info!("Monthly breakdown written to {}", path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct ComparisonCsvRow<'a> {
    #[serde(rename = "Scenario")]
    scenario: &'a str,
    #[serde(rename = "Total Interest")]
    total_interest: Option<f64>,
    #[serde(rename = "Loan Interest")]
    loan_interest: Option<f64>,
    #[serde(rename = "Taxable Income")]
    taxable_income: Option<f64>,
    #[serde(rename = "Tax Payable")]
    tax_payable: Option<f64>,
    #[serde(rename = "Final Value")]
    final_value: Option<f64>,
    #[serde(rename = "Net Profit")]
    net_profit: Option<f64>,
    #[serde(rename = "Annualized Return %")]
    annualized_return_pct: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Write one row per scenario; failed scenarios carry only the error message
pub fn write_comparison_csv<W: Write>(outcomes: &[ScenarioOutcome], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(result) => ComparisonCsvRow {
                scenario: &outcome.name,
                total_interest: Some(result.aggregates.total_interest),
                loan_interest: Some(result.aggregates.loan_interest),
                taxable_income: Some(result.tax.taxable_income),
                tax_payable: Some(result.tax.net_tax_payable),
                final_value: Some(result.summary.final_value),
                net_profit: Some(result.summary.net_profit),
                annualized_return_pct: Some(result.summary.annualized_return_pct),
                error: None,
            },
            Err(err) => ComparisonCsvRow {
                scenario: &outcome.name,
                total_interest: None,
                loan_interest: None,
                taxable_income: None,
                tax_payable: None,
                final_value: None,
                net_profit: None,
                annualized_return_pct: None,
                error: Some(err.to_string()),
            },
        };
        csv_writer.serialize(row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
