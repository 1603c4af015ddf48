//! Scenario runner for side-by-side comparisons
//!
//! Holds a base configuration and derives named variants from it (taxability
//! rules, loan accrual, leverage). Each variant is an independent simulation,
//! so batches are run in parallel.

use crate::config::{load_config, InstrumentConfig, LoanAccrual, SimulationConfig};
use crate::error::Result;
use crate::simulation::{SimulationEngine, SimulationResult};
use rayon::prelude::*;
use std::path::Path;

/// A named configuration
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub config: SimulationConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: SimulationConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Result of one scenario in a batch
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<SimulationResult>,
}

/// Runs many variants of a base configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationConfig::default());
/// for outcome in runner.run_scenarios(&runner.taxability_variants(0.5)) {
///     println!("{}: {:?}", outcome.name, outcome.result.map(|r| r.summary.net_profit));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_config: SimulationConfig,
}

impl ScenarioRunner {
    pub fn new(base_config: SimulationConfig) -> Self {
        Self { base_config }
    }

    /// Create runner with the base configuration read from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    /// Run a single configuration
    pub fn run(&self, config: SimulationConfig) -> Result<SimulationResult> {
        SimulationEngine::new(config).run()
    }

    pub fn run_base(&self) -> Result<SimulationResult> {
        self.run(self.base_config.clone())
    }

    /// Run scenarios in parallel, returning outcomes in input order
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: scenario.name.clone(),
                result: self.run(scenario.config.clone()),
            })
            .collect()
    }

    /// The four taxability rules applied to the base bonds.
    /// `partial_fraction` is the taxable share used for the partially taxed primary bond.
    pub fn taxability_variants(&self, partial_fraction: f64) -> Vec<Scenario> {
        let base = &self.base_config;
        let target = base.reinvestment_target.clone();
        let primary = base.primary.clone();

        let with_bonds = |primary: Option<InstrumentConfig>, target: InstrumentConfig| SimulationConfig {
            primary,
            reinvestment_target: target,
            ..base.clone()
        };

        vec![
            Scenario::new(
                "Single taxable bond",
                with_bonds(None, target.clone().with_taxable_fraction(1.0)),
            ),
            Scenario::new(
                "Both bonds taxable",
                with_bonds(
                    primary.clone().map(|p| p.with_taxable_fraction(1.0)),
                    target.clone().with_taxable_fraction(1.0),
                ),
            ),
            Scenario::new(
                format!("Primary {:.0}% taxable", partial_fraction * 100.0),
                with_bonds(
                    primary.clone().map(|p| p.with_taxable_fraction(partial_fraction)),
                    target.clone().with_taxable_fraction(1.0),
                ),
            ),
            Scenario::new(
                "Reinvestment bond tax-free",
                with_bonds(
                    primary.map(|p| p.with_taxable_fraction(1.0)),
                    target.tax_exempt(),
                ),
            ),
        ]
    }

    /// Base configuration with simple and with compounding loan interest
    pub fn loan_accrual_variants(&self) -> Vec<Scenario> {
        [
            ("Simple loan interest", LoanAccrual::Simple),
            ("Compounding loan interest", LoanAccrual::Compounding),
        ]
        .into_iter()
        .map(|(name, loan_accrual)| {
            Scenario::new(
                name,
                SimulationConfig {
                    loan_accrual,
                    ..self.base_config.clone()
                },
            )
        })
        .collect()
    }

    pub fn leverage_sweep(&self, ratios: &[f64]) -> Vec<Scenario> {
        ratios
            .iter()
            .map(|&leverage_ratio| {
                Scenario::new(
                    format!("Leverage {:.1}x", leverage_ratio),
                    SimulationConfig {
                        leverage_ratio,
                        ..self.base_config.clone()
                    },
                )
            })
            .collect()
    }

    pub fn base_config(&self) -> &SimulationConfig {
        &self.base_config
    }
}
