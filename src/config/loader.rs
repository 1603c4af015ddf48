//! JSON configuration loader
//!
//! Any field left out of the file falls back to `SimulationConfig::default()`.

use super::SimulationConfig;
use crate::error::{Result, SimulationError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load and validate a configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SimulationError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_config_from_reader(BufReader::new(file))?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load and validate a configuration from any JSON reader
pub fn load_config_from_reader<R: Read>(reader: R) -> Result<SimulationConfig> {
    let config: SimulationConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

impl SimulationConfig {
    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        load_config_from_reader(json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoanAccrual, TaxRegime};
    use chrono::NaiveDate;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "tenure_months": 24 }"#).unwrap();
        assert_eq!(config.tenure_months, 24);
        assert_eq!(config.initial_capital, 100_000.0);
        assert_eq!(config.loan_accrual, LoanAccrual::Simple);
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "initial_capital": 500000,
            "leverage_ratio": 2.0,
            "primary": { "name": "Tax-Free Bond", "annual_rate_pct": 8.0, "taxable_fraction": 0.0 },
            "reinvestment_target": { "name": "Treasury", "annual_rate_pct": 12.0, "withholding_fraction": 0.1 },
            "borrowing_rate_pct": 9.5,
            "tenure_months": 36,
            "tax_regime": { "entity": "llp_flat", "rate_pct": 31.2 },
            "loan_accrual": "compounding",
            "start_date": "2025-04-01"
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();

        assert_eq!(config.borrowed_amount(), 1_000_000.0);
        let primary = config.primary.as_ref().unwrap();
        assert_eq!(primary.taxable_fraction, 0.0);
        assert_eq!(primary.withholding_fraction, 0.0);
        assert_eq!(config.reinvestment_target.taxable_fraction, 1.0);
        assert_eq!(config.reinvestment_target.withholding_fraction, 0.1);
        assert_eq!(config.tax_regime, TaxRegime::LlpFlat { rate_pct: 31.2 });
        assert_eq!(config.loan_accrual, LoanAccrual::Compounding);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 4, 1));
    }

    #[test]
    fn test_null_primary() {
        let config = SimulationConfig::from_json_str(r#"{ "primary": null }"#).unwrap();
        assert!(config.primary.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "tenure_months": 0 }"#).unwrap_err();
        assert!(err.is_invalid_configuration());

        let err = SimulationConfig::from_json_str(r#"{ "tenure_months": -3 }"#).unwrap_err();
        assert!(matches!(err, SimulationError::ConfigParse(_)));
    }

    #[test]
    fn test_bundled_scenario_file() {
        let config = load_config("data/scenarios/llp_tax_free_treasury.json").unwrap();
        assert_eq!(config.tenure_months, 36);
        assert_eq!(config.reinvestment_target.taxable_fraction, 0.0);
        assert_eq!(config.tax_regime.entity_label(), "LLP");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("does/not/exist.json").unwrap_err();
        assert!(matches!(err, SimulationError::ConfigIo { .. }));
    }
}
