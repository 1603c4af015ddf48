//! Balances carried from one month to the next

use crate::config::SimulationConfig;

/// Ending balances of a month, which are the opening balances of the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualState {
    /// Last completed month (0 before the first month)
    pub month: u32,

    /// Primary bond principal (never grows, its interest is swept out)
    pub primary_balance: f64,

    /// Reinvestment target principal including all reinvested interest
    pub target_balance: f64,

    /// Outstanding loan, including capitalised interest when compounding
    pub loan_balance: f64,

    /// Loan interest accrued to date
    pub cumulative_loan_interest: f64,
}

impl AccrualState {
    /// Opening position before month 1
    pub fn opening(config: &SimulationConfig) -> Self {
        Self {
            month: 0,
            primary_balance: config.primary_opening_balance(),
            target_balance: config.target_opening_balance(),
            loan_balance: config.borrowed_amount(),
            cumulative_loan_interest: 0.0,
        }
    }

    /// Bond holdings less the loan, before tax
    pub fn net_position(&self) -> f64 {
        self.primary_balance + self.target_balance - self.loan_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_state() {
        let config = SimulationConfig {
            leverage_ratio: 1.5,
            ..Default::default()
        };
        let state = AccrualState::opening(&config);

        assert_eq!(state.month, 0);
        assert_eq!(state.primary_balance, 100_000.0);
        assert_eq!(state.target_balance, 150_000.0);
        assert_eq!(state.loan_balance, 150_000.0);
        assert_eq!(state.cumulative_loan_interest, 0.0);
        assert_eq!(state.net_position(), 100_000.0);
    }
}
