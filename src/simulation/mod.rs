//! Month-by-month reinvestment simulation, tax resolution and summary

mod state;
mod engine;
mod ledger;
mod tax;
mod summary;

pub use state::AccrualState;
pub use engine::SimulationEngine;
pub use ledger::{Aggregates, MonthlyRecord, SimulationResult};
pub use tax::TaxAssessment;
pub use summary::{NetValuePoint, Summary};
