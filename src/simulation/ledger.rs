//! Monthly ledger rows, their cumulative totals, and the complete run result

use super::state::AccrualState;
use super::summary::Summary;
use super::tax::TaxAssessment;
use crate::config::SimulationConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of accrual and reinvestment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month index (1-indexed)
    pub month: u32,

    /// Calendar end of the month, when the configuration has a start date
    pub period_end: Option<NaiveDate>,

    // Interest earned this month
    pub primary_interest: f64,
    pub target_interest: f64,
    pub total_interest: f64,

    /// Interest deducted at source instead of being reinvested
    pub withheld: f64,

    /// Interest added to the reinvestment target this month
    pub reinvested: f64,

    // Balances after reinvestment
    pub primary_balance: f64,
    pub target_balance: f64,

    // Borrowing
    pub loan_interest: f64,
    pub loan_balance: f64,
    pub cumulative_loan_interest: f64,

    /// Taxable share of this month's interest less this month's loan interest (may be negative)
    pub taxable_income: f64,
}

/// Cumulative totals over the ledger, built by folding records in month order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub months: u32,
    pub primary_interest: f64,
    pub target_interest: f64,
    pub total_interest: f64,
    pub loan_interest: f64,
    pub withheld: f64,
    pub reinvested: f64,
    pub final_primary_balance: f64,
    pub final_target_balance: f64,
    pub final_loan_balance: f64,
}

impl Aggregates {
    /// Totals before any month has been simulated
    pub fn opening(state: &AccrualState) -> Self {
        Self {
            months: state.month,
            primary_interest: 0.0,
            target_interest: 0.0,
            total_interest: 0.0,
            loan_interest: state.cumulative_loan_interest,
            withheld: 0.0,
            reinvested: 0.0,
            final_primary_balance: state.primary_balance,
            final_target_balance: state.target_balance,
            final_loan_balance: state.loan_balance,
        }
    }

    /// Fold the ledger in month order
    pub fn from_records(opening: &AccrualState, records: &[MonthlyRecord]) -> Self {
        records
            .iter()
            .fold(Self::opening(opening), |totals, record| totals.accumulate(record))
    }

    /// Add one month to the totals. Months must arrive in order.
    pub fn accumulate(mut self, record: &MonthlyRecord) -> Self {
        debug_assert_eq!(record.month, self.months + 1, "ledger months out of order");

        self.months = record.month;
        self.primary_interest += record.primary_interest;
        self.target_interest += record.target_interest;
        self.total_interest += record.total_interest;
        self.loan_interest += record.loan_interest;
        self.withheld += record.withheld;
        self.reinvested += record.reinvested;
        self.final_primary_balance = record.primary_balance;
        self.final_target_balance = record.target_balance;
        self.final_loan_balance = record.loan_balance;
        self
    }
}

/// Complete output of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Configuration the run was produced from
    pub config: SimulationConfig,

    /// Monthly ledger, ordered by month
    pub records: Vec<MonthlyRecord>,

    pub aggregates: Aggregates,

    pub tax: TaxAssessment,

    pub summary: Summary,
}

impl SimulationResult {
    pub fn final_record(&self) -> Option<&MonthlyRecord> {
        self.records.last()
    }

    /// Record for a 1-indexed month
    pub fn month(&self, month: u32) -> Option<&MonthlyRecord> {
        let idx = (month as usize).checked_sub(1)?;
        self.records.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(month: u32, primary: f64, target: f64, loan: f64, target_balance: f64) -> MonthlyRecord {
        MonthlyRecord {
            month,
            period_end: None,
            primary_interest: primary,
            target_interest: target,
            total_interest: primary + target,
            withheld: 0.0,
            reinvested: primary + target,
            primary_balance: 1_000.0,
            target_balance,
            loan_interest: loan,
            loan_balance: 1_000.0,
            cumulative_loan_interest: loan * month as f64,
            taxable_income: primary + target - loan,
        }
    }

    fn opening() -> AccrualState {
        AccrualState {
            month: 0,
            primary_balance: 1_000.0,
            target_balance: 1_000.0,
            loan_balance: 1_000.0,
            cumulative_loan_interest: 0.0,
        }
    }

    #[test]
    fn test_fold_accumulates_in_order() {
        let records = vec![
            record(1, 10.0, 5.0, 4.0, 1_015.0),
            record(2, 10.0, 5.5, 4.0, 1_030.5),
            record(3, 10.0, 6.0, 4.0, 1_046.5),
        ];
        let totals = Aggregates::from_records(&opening(), &records);

        assert_eq!(totals.months, 3);
        assert_abs_diff_eq!(totals.primary_interest, 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.target_interest, 16.5, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.total_interest, 46.5, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.loan_interest, 12.0, epsilon = 1e-12);
        assert_eq!(totals.final_target_balance, 1_046.5);
    }

    #[test]
    fn test_empty_ledger_keeps_opening_balances() {
        let totals = Aggregates::from_records(&opening(), &[]);
        assert_eq!(totals.months, 0);
        assert_eq!(totals.total_interest, 0.0);
        assert_eq!(totals.final_loan_balance, 1_000.0);
    }
}
