//! Bond Reinvestment - leveraged bond simulator with post-tax returns
//!
//! This library provides:
//! - Month-by-month accrual of two bonds with all interest reinvested into one
//! - Simple or compounding interest on the borrowed amount
//! - Tax on net interest for private limited companies and LLPs, with per-bond
//!   taxability and withholding at source
//! - Final investor position and linear annualised return
//! - Scenario comparisons and CSV reports

pub mod error;
pub mod config;
pub mod simulation;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{Result, SimulationError};
pub use config::{InstrumentConfig, LoanAccrual, SimulationConfig, TaxRegime};
pub use simulation::{MonthlyRecord, SimulationEngine, SimulationResult, Summary, TaxAssessment};
pub use scenario::{Scenario, ScenarioRunner};
