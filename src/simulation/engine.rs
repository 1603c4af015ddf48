//! Monthly accrual and reinvestment engine
//!
//! Each month is a pure step from the prior month's ending balances to the next
//! balances plus a ledger row. Months are strictly sequential because every
//! month's principal includes all earlier reinvestments.

use super::ledger::{Aggregates, MonthlyRecord, SimulationResult};
use super::state::AccrualState;
use super::summary::Summary;
use super::tax::TaxAssessment;
use crate::config::{LoanAccrual, SimulationConfig};
use crate::error::Result;
use chrono::Months;

/// Monthly rates as fractions, fixed for the whole tenure
#[derive(Debug, Clone, Copy)]
struct MonthlyRates {
    primary: f64,
    target: f64,
    loan: f64,
}

/// Simulation engine for a single configuration
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    rates: MonthlyRates,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        let rates = MonthlyRates {
            primary: config.primary.as_ref().map_or(0.0, |p| p.monthly_rate()),
            target: config.reinvestment_target.monthly_rate(),
            loan: config.monthly_borrowing_rate(),
        };
        Self { config, rates }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the full tenure. Fails before producing any month if the configuration is invalid.
    pub fn run(&self) -> Result<SimulationResult> {
        if let Err(err) = self.config.validate() {
            log::warn!("Rejected configuration: {}", err);
            return Err(err);
        }

        let opening = AccrualState::opening(&self.config);
        let mut records = Vec::with_capacity(self.config.tenure_months as usize);
        let mut state = opening;

        for _month in 1..=self.config.tenure_months {
            let (next, record) = self.step(&state);
            records.push(record);
            state = next;
        }

        let aggregates = Aggregates::from_records(&opening, &records);
        let tax = TaxAssessment::resolve(&self.config, &aggregates);
        let summary = Summary::project(&self.config, &records, &aggregates, &tax);

        log::info!(
            "Simulated {} months: interest {:.2}, loan interest {:.2}, tax {:.2}, net profit {:.2}",
            records.len(),
            aggregates.total_interest,
            aggregates.loan_interest,
            tax.net_tax_payable,
            summary.net_profit,
        );

        Ok(SimulationResult {
            config: self.config.clone(),
            records,
            aggregates,
            tax,
            summary,
        })
    }

    /// Advance one month from `state`, returning the new balances and the month's ledger row
    pub fn step(&self, state: &AccrualState) -> (AccrualState, MonthlyRecord) {
        let month = state.month + 1;
        let target = &self.config.reinvestment_target;

        // Interest on opening balances
        let primary_interest = state.primary_balance * self.rates.primary;
        let target_interest = state.target_balance * self.rates.target;
        let total_interest = primary_interest + target_interest;

        let (primary_withholding, primary_taxable) = self
            .config
            .primary
            .as_ref()
            .map_or((0.0, 0.0), |p| (p.withholding_fraction, p.taxable_fraction));

        // Everything not withheld at source is folded into the target bond
        let withheld = primary_interest * primary_withholding
            + target_interest * target.withholding_fraction;
        let reinvested = total_interest - withheld;
        let target_balance = state.target_balance + reinvested;

        let loan_interest = state.loan_balance * self.rates.loan;
        let loan_balance = match self.config.loan_accrual {
            LoanAccrual::Simple => state.loan_balance,
            LoanAccrual::Compounding => state.loan_balance + loan_interest,
        };
        let cumulative_loan_interest = state.cumulative_loan_interest + loan_interest;

        let taxable_income = primary_interest * primary_taxable
            + target_interest * target.taxable_fraction
            - loan_interest;

        let period_end = self
            .config
            .start_date
            .and_then(|start| start.checked_add_months(Months::new(month)));

        log::debug!(
            "Month {}: interest {:.2}, reinvested {:.2}, target {:.2}, loan {:.2}",
            month,
            total_interest,
            reinvested,
            target_balance,
            loan_balance,
        );

        let next = AccrualState {
            month,
            primary_balance: state.primary_balance,
            target_balance,
            loan_balance,
            cumulative_loan_interest,
        };

        let record = MonthlyRecord {
            month,
            period_end,
            primary_interest,
            target_interest,
            total_interest,
            withheld,
            reinvested,
            primary_balance: next.primary_balance,
            target_balance,
            loan_interest,
            loan_balance,
            cumulative_loan_interest,
            taxable_income,
        };

        (next, record)
    }
}
