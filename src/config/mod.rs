//! Simulation configuration: investor capital, bonds, loan terms and tax regime

pub mod loader;

pub use loader::{load_config, load_config_from_reader};

use crate::error::{Result, SimulationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Corporate tax rate for a private limited company (% p.a.)
pub const DEFAULT_CORPORATE_TAX_RATE: f64 = 25.0;

/// Effective LLP tax rate including surcharge (% p.a.)
pub const DEFAULT_LLP_TAX_RATE: f64 = 31.2;

/// Longest investment period accepted, in months
pub const MAX_TENURE_MONTHS: u32 = 60;

fn default_one() -> f64 {
    1.0
}

/// A yield-bearing bond position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Display name used in reports
    pub name: String,

    /// Annual coupon rate in percent (14.0 = 14% p.a.)
    pub annual_rate_pct: f64,

    /// Share of this bond's interest that enters taxable income (0-1)
    #[serde(default = "default_one")]
    pub taxable_fraction: f64,

    /// Share of each month's interest deducted at source instead of reinvested (0-1)
    #[serde(default)]
    pub withholding_fraction: f64,
}

impl InstrumentConfig {
    /// Fully taxable bond with no withholding
    pub fn new(name: impl Into<String>, annual_rate_pct: f64) -> Self {
        Self {
            name: name.into(),
            annual_rate_pct,
            taxable_fraction: 1.0,
            withholding_fraction: 0.0,
        }
    }

    pub fn with_taxable_fraction(mut self, fraction: f64) -> Self {
        self.taxable_fraction = fraction;
        self
    }

    /// Interest from this bond never enters taxable income
    pub fn tax_exempt(self) -> Self {
        self.with_taxable_fraction(0.0)
    }

    pub fn with_withholding(mut self, fraction: f64) -> Self {
        self.withholding_fraction = fraction;
        self
    }

    /// Monthly rate as a fraction: annual % / 12 / 100
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_pct / 12.0 / 100.0
    }

    fn validate(
        &self,
        rate_field: &'static str,
        taxable_field: &'static str,
        withholding_field: &'static str,
    ) -> Result<()> {
        check_rate(rate_field, self.annual_rate_pct)?;
        check_fraction(taxable_field, self.taxable_fraction)?;
        check_fraction(withholding_field, self.withholding_fraction)
    }
}

/// Entity tax treatment, resolved once when the configuration is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum TaxRegime {
    /// Private limited company taxed at a flat corporate rate
    CorporateFlat { rate_pct: f64 },
    /// Limited liability partnership taxed at a flat rate
    LlpFlat { rate_pct: f64 },
    /// Any other entity with a user-supplied rate
    Custom { rate_pct: f64 },
}

impl TaxRegime {
    pub fn corporate() -> Self {
        TaxRegime::CorporateFlat {
            rate_pct: DEFAULT_CORPORATE_TAX_RATE,
        }
    }

    pub fn llp() -> Self {
        TaxRegime::LlpFlat {
            rate_pct: DEFAULT_LLP_TAX_RATE,
        }
    }

    /// Tax rate in percent
    pub fn rate_pct(&self) -> f64 {
        match *self {
            TaxRegime::CorporateFlat { rate_pct }
            | TaxRegime::LlpFlat { rate_pct }
            | TaxRegime::Custom { rate_pct } => rate_pct,
        }
    }

    /// Tax rate as a fraction
    pub fn rate(&self) -> f64 {
        self.rate_pct() / 100.0
    }

    pub fn entity_label(&self) -> &'static str {
        match self {
            TaxRegime::CorporateFlat { .. } => "Private Limited Company",
            TaxRegime::LlpFlat { .. } => "LLP",
            TaxRegime::Custom { .. } => "Custom",
        }
    }
}

impl Default for TaxRegime {
    fn default() -> Self {
        TaxRegime::corporate()
    }
}

/// How interest on the borrowed amount accrues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanAccrual {
    /// Interest is charged on the original borrowed amount every month
    #[default]
    Simple,
    /// Interest is added to the loan balance and charged on in later months
    Compounding,
}

/// Complete input for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Investor's own capital
    pub initial_capital: f64,

    /// Borrowed amount as a multiple of capital
    pub leverage_ratio: f64,

    /// Bond bought with the investor's capital. Its interest is swept into the
    /// reinvestment target, so its balance stays at the capital amount.
    /// When absent, the capital goes into the reinvestment target.
    pub primary: Option<InstrumentConfig>,

    /// Bond bought with the borrowed amount that receives all reinvested interest
    pub reinvestment_target: InstrumentConfig,

    /// Annual borrowing rate in percent
    pub borrowing_rate_pct: f64,

    /// Number of months to simulate
    pub tenure_months: u32,

    pub tax_regime: TaxRegime,

    pub loan_accrual: LoanAccrual,

    /// Calendar start of the position, used only to date monthly records
    pub start_date: Option<NaiveDate>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            leverage_ratio: 1.0,
            primary: Some(InstrumentConfig::new("High-Yield Bond", 14.0)),
            reinvestment_target: InstrumentConfig::new("Treasury Bond", 12.0),
            borrowing_rate_pct: 10.0,
            tenure_months: 12,
            tax_regime: TaxRegime::default(),
            loan_accrual: LoanAccrual::Simple,
            start_date: None,
        }
    }
}

impl SimulationConfig {
    /// Amount borrowed against the investor's capital
    pub fn borrowed_amount(&self) -> f64 {
        self.initial_capital * self.leverage_ratio
    }

    /// Capital plus borrowings
    pub fn total_invested(&self) -> f64 {
        self.initial_capital + self.borrowed_amount()
    }

    pub fn monthly_borrowing_rate(&self) -> f64 {
        self.borrowing_rate_pct / 12.0 / 100.0
    }

    /// Opening balance of the primary bond (zero when there is none)
    pub fn primary_opening_balance(&self) -> f64 {
        if self.primary.is_some() {
            self.initial_capital
        } else {
            0.0
        }
    }

    /// Opening balance of the reinvestment target
    pub fn target_opening_balance(&self) -> f64 {
        if self.primary.is_some() {
            self.borrowed_amount()
        } else {
            self.total_invested()
        }
    }

    /// Reject configurations that would produce meaningless output
    pub fn validate(&self) -> Result<()> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(SimulationError::invalid(
                "initial_capital",
                format!("must be positive, got {}", self.initial_capital),
            ));
        }
        if self.tenure_months == 0 {
            return Err(SimulationError::invalid("tenure_months", "must be at least 1"));
        }
        if self.tenure_months > MAX_TENURE_MONTHS {
            return Err(SimulationError::invalid(
                "tenure_months",
                format!("must not exceed {}, got {}", MAX_TENURE_MONTHS, self.tenure_months),
            ));
        }
        if !self.leverage_ratio.is_finite() || self.leverage_ratio < 1.0 {
            return Err(SimulationError::invalid(
                "leverage_ratio",
                format!("must be at least 1, got {}", self.leverage_ratio),
            ));
        }
        if !self.total_invested().is_finite() {
            return Err(SimulationError::invalid(
                "leverage_ratio",
                format!(
                    "capital {} at leverage {} overflows the invested amount",
                    self.initial_capital, self.leverage_ratio
                ),
            ));
        }
        if let Some(primary) = &self.primary {
            primary.validate(
                "primary.annual_rate_pct",
                "primary.taxable_fraction",
                "primary.withholding_fraction",
            )?;
        }
        self.reinvestment_target.validate(
            "reinvestment_target.annual_rate_pct",
            "reinvestment_target.taxable_fraction",
            "reinvestment_target.withholding_fraction",
        )?;
        check_rate("borrowing_rate_pct", self.borrowing_rate_pct)?;

        let tax_rate = self.tax_regime.rate_pct();
        check_rate("tax_regime.rate_pct", tax_rate)?;
        if tax_rate > 100.0 {
            return Err(SimulationError::invalid(
                "tax_regime.rate_pct",
                format!("must not exceed 100, got {}", tax_rate),
            ));
        }
        Ok(())
    }
}

fn check_rate(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be a non-negative rate, got {}", value),
        ));
    }
    Ok(())
}

fn check_fraction(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::invalid(
            field,
            format!("must be between 0 and 1, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.borrowed_amount(), 100_000.0);
        assert_eq!(config.total_invested(), 200_000.0);
    }

    #[test]
    fn test_monthly_rates() {
        let bond = InstrumentConfig::new("HY", 14.0);
        assert_abs_diff_eq!(bond.monthly_rate(), 0.14 / 12.0, epsilon = 1e-15);

        let config = SimulationConfig::default();
        assert_abs_diff_eq!(config.monthly_borrowing_rate(), 0.10 / 12.0, epsilon = 1e-15);
    }

    #[test]
    fn test_opening_balances_without_primary() {
        let config = SimulationConfig {
            primary: None,
            leverage_ratio: 2.0,
            ..Default::default()
        };
        assert_eq!(config.primary_opening_balance(), 0.0);
        assert_eq!(config.target_opening_balance(), 300_000.0);
    }

    #[test]
    fn test_tax_regime_rates() {
        assert_eq!(TaxRegime::corporate().rate_pct(), 25.0);
        assert_eq!(TaxRegime::llp().rate_pct(), 31.2);
        assert_abs_diff_eq!(TaxRegime::Custom { rate_pct: 30.0 }.rate(), 0.30, epsilon = 1e-15);
        assert_eq!(TaxRegime::llp().entity_label(), "LLP");
    }

    #[test]
    fn test_rejects_non_positive_capital() {
        for capital in [0.0, -1.0, f64::NAN] {
            let config = SimulationConfig {
                initial_capital: capital,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.is_invalid_configuration());
        }
    }

    #[test]
    fn test_rejects_zero_tenure() {
        let config = SimulationConfig {
            tenure_months: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfiguration { field: "tenure_months", .. })
        ));
    }

    #[test]
    fn test_rejects_tenure_above_maximum() {
        let config = SimulationConfig {
            tenure_months: MAX_TENURE_MONTHS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        for tenure_months in [MAX_TENURE_MONTHS + 1, u32::MAX] {
            let config = SimulationConfig {
                tenure_months,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(SimulationError::InvalidConfiguration { field: "tenure_months", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_overflowing_invested_amount() {
        let config = SimulationConfig {
            initial_capital: 1e308,
            leverage_ratio: 3.0,
            ..Default::default()
        };
        assert!(config.initial_capital.is_finite());
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfiguration { field: "leverage_ratio", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_rates() {
        let config = SimulationConfig {
            borrowing_rate_pct: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            reinvestment_target: InstrumentConfig::new("T", -1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            tax_regime: TaxRegime::Custom { rate_pct: -5.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_fractions_and_leverage() {
        let config = SimulationConfig {
            primary: Some(InstrumentConfig::new("HY", 14.0).with_taxable_fraction(1.5)),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            reinvestment_target: InstrumentConfig::new("T", 12.0).with_withholding(-0.1),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            leverage_ratio: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            tax_regime: TaxRegime::Custom { rate_pct: 120.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
