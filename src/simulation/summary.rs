//! Investor's final position and the monthly net-value series

use super::ledger::{Aggregates, MonthlyRecord};
use super::tax::TaxAssessment;
use crate::config::SimulationConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Investor's net value at the end of a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetValuePoint {
    pub month: u32,
    pub period_end: Option<NaiveDate>,

    /// Reinvestment target balance
    pub reinvested_balance: f64,

    pub loan_balance: f64,

    /// Holdings less loan less a linear share of the final tax bill.
    /// The tax share is for charting only; tax is actually settled once at the end.
    pub net_value_after_tax: f64,
}

/// Final position of the investor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub initial_capital: f64,
    pub borrowed_amount: f64,
    pub total_invested: f64,

    /// Bond holdings less loan less tax payable
    pub final_value: f64,

    /// Final value less initial capital
    pub net_profit: f64,

    /// Linear annualisation: profit / capital x (12 / months) x 100
    pub annualized_return_pct: f64,

    pub net_value_series: Vec<NetValuePoint>,
}

impl Summary {
    pub fn project(
        config: &SimulationConfig,
        records: &[MonthlyRecord],
        totals: &Aggregates,
        tax: &TaxAssessment,
    ) -> Self {
        let final_value = totals.final_primary_balance + totals.final_target_balance
            - totals.final_loan_balance
            - tax.net_tax_payable;
        let net_profit = final_value - config.initial_capital;
        let annualized_return_pct = net_profit / config.initial_capital
            * (12.0 / config.tenure_months as f64)
            * 100.0;

        let months = config.tenure_months as f64;
        let net_value_series = records
            .iter()
            .map(|record| NetValuePoint {
                month: record.month,
                period_end: record.period_end,
                reinvested_balance: record.target_balance,
                loan_balance: record.loan_balance,
                net_value_after_tax: record.primary_balance + record.target_balance
                    - record.loan_balance
                    - tax.net_tax_payable * (record.month as f64 / months),
            })
            .collect();

        Self {
            initial_capital: config.initial_capital,
            borrowed_amount: config.borrowed_amount(),
            total_invested: config.total_invested(),
            final_value,
            net_profit,
            annualized_return_pct,
            net_value_series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(month: u32, target_balance: f64) -> MonthlyRecord {
        MonthlyRecord {
            month,
            period_end: None,
            primary_interest: 0.0,
            target_interest: 0.0,
            total_interest: 0.0,
            withheld: 0.0,
            reinvested: 0.0,
            primary_balance: 100_000.0,
            target_balance,
            loan_interest: 0.0,
            loan_balance: 100_000.0,
            cumulative_loan_interest: 0.0,
            taxable_income: 0.0,
        }
    }

    fn tax(net_tax_payable: f64) -> TaxAssessment {
        TaxAssessment {
            taxable_interest: 0.0,
            loan_interest_deduction: 0.0,
            taxable_income: 0.0,
            tax_rate_pct: 25.0,
            tax_due: net_tax_payable,
            withholding_credit: 0.0,
            net_tax_payable,
        }
    }

    #[test]
    fn test_linear_annualized_return() {
        let config = SimulationConfig {
            tenure_months: 6,
            ..Default::default()
        };
        let records: Vec<_> = (1..=6).map(|m| record(m, 100_000.0 + 1_000.0 * m as f64)).collect();
        let totals = Aggregates {
            months: 6,
            primary_interest: 0.0,
            target_interest: 6_000.0,
            total_interest: 6_000.0,
            loan_interest: 0.0,
            withheld: 0.0,
            reinvested: 6_000.0,
            final_primary_balance: 100_000.0,
            final_target_balance: 106_000.0,
            final_loan_balance: 100_000.0,
        };
        let summary = Summary::project(&config, &records, &totals, &tax(1_000.0));

        assert_abs_diff_eq!(summary.final_value, 105_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.net_profit, 5_000.0, epsilon = 1e-9);
        // 5% over six months is 10% linear, not 10.25% compounded
        assert_abs_diff_eq!(summary.annualized_return_pct, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_net_value_series_prorates_tax() {
        let config = SimulationConfig {
            tenure_months: 4,
            ..Default::default()
        };
        let records: Vec<_> = (1..=4).map(|m| record(m, 100_000.0)).collect();
        let totals = Aggregates {
            months: 4,
            primary_interest: 0.0,
            target_interest: 0.0,
            total_interest: 0.0,
            loan_interest: 0.0,
            withheld: 0.0,
            reinvested: 0.0,
            final_primary_balance: 100_000.0,
            final_target_balance: 100_000.0,
            final_loan_balance: 100_000.0,
        };
        let summary = Summary::project(&config, &records, &totals, &tax(400.0));

        let values: Vec<f64> = summary.net_value_series.iter().map(|p| p.net_value_after_tax).collect();
        assert_abs_diff_eq!(values[0], 99_900.0, epsilon = 1e-9);
        assert_abs_diff_eq!(values[1], 99_800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(values[3], summary.final_value, epsilon = 1e-9);
    }
}
