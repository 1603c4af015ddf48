//! Tax liability on the net interest earned over the whole tenure
//!
//! Taxable income is the taxable share of each bond's cumulative interest less
//! the cumulative loan interest, which is fully deductible. A net loss produces
//! zero tax; it is neither refunded nor carried forward.

use super::ledger::Aggregates;
use crate::config::SimulationConfig;
use serde::{Deserialize, Serialize};

/// Resolved tax position for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Taxable share of all bond interest
    pub taxable_interest: f64,

    /// Loan interest deducted from taxable interest
    pub loan_interest_deduction: f64,

    /// Taxable interest less the deduction, before flooring (may be negative)
    pub taxable_income: f64,

    pub tax_rate_pct: f64,

    /// max(0, taxable income) x rate
    pub tax_due: f64,

    /// Interest withheld at source during the tenure, credited against tax due
    pub withholding_credit: f64,

    /// Tax still to be paid after the withholding credit
    pub net_tax_payable: f64,
}

impl TaxAssessment {
    pub fn resolve(config: &SimulationConfig, totals: &Aggregates) -> Self {
        let primary_fraction = config
            .primary
            .as_ref()
            .map_or(0.0, |primary| primary.taxable_fraction);
        let target_fraction = config.reinvestment_target.taxable_fraction;

        let taxable_interest =
            totals.primary_interest * primary_fraction + totals.target_interest * target_fraction;
        let taxable_income = taxable_interest - totals.loan_interest;

        let tax_rate_pct = config.tax_regime.rate_pct();
        let tax_due = taxable_income.max(0.0) * config.tax_regime.rate();
        let net_tax_payable = (tax_due - totals.withheld).max(0.0);

        Self {
            taxable_interest,
            loan_interest_deduction: totals.loan_interest,
            taxable_income,
            tax_rate_pct,
            tax_due,
            withholding_credit: totals.withheld,
            net_tax_payable,
        }
    }

    /// True when deductible loan interest exceeded the taxable interest
    pub fn is_loss(&self) -> bool {
        self.taxable_income < 0.0
    }
}
