//! Fixed-rate loan amortization.
//!
//! Standard annuity formula: with monthly rate r = annual rate / 12 and
//! n = term in months, the equal monthly payment on principal P is
//!
//!   payment = P * r * (1 + r)^n / ((1 + r)^n - 1)
//!
//! degrading to P / n when r is exactly zero.

use crate::error::{Result, RoiError};
use serde::{Deserialize, Serialize};

/// Loan terms for education financing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Fixed annual interest rate in decimal form (default: 6.68%).
    pub annual_rate: f64,

    /// Repayment term in years (default: 10).
    pub term_years: u32,

    /// Share of the education cost that is financed (default: 70%).
    pub coverage: f64,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            annual_rate: 0.0668,
            term_years: 10,
            coverage: 0.70,
        }
    }
}

impl LoanTerms {
    /// Create loan terms, validating their domain.
    pub fn new(annual_rate: f64, term_years: u32, coverage: f64) -> Result<Self> {
        if annual_rate < 0.0 || !annual_rate.is_finite() {
            return Err(RoiError::InvalidTerms(format!(
                "annual rate must be non-negative, got {annual_rate}"
            )));
        }
        if term_years == 0 {
            return Err(RoiError::InvalidTerms("term must be at least 1 year".into()));
        }
        if !(0.0..=1.0).contains(&coverage) {
            return Err(RoiError::InvalidTerms(format!(
                "coverage must be in [0, 1], got {coverage}"
            )));
        }
        Ok(Self {
            annual_rate,
            term_years,
            coverage,
        })
    }

    /// Total number of monthly payments.
    pub const fn payment_count(&self) -> u32 {
        self.term_years * 12
    }

    /// Equal monthly payment on `principal`.
    ///
    /// The zero-rate branch is not reachable with the default rate but
    /// is a defined degenerate case (straight division by the number of
    /// payments) so the formula never divides by zero.
    pub fn monthly_payment(&self, principal: f64) -> Result<f64> {
        if principal < 0.0 {
            return Err(RoiError::NegativePrincipal(principal));
        }

        let r = self.annual_rate / 12.0;
        let n = f64::from(self.payment_count());
        if r == 0.0 {
            return Ok(principal / n);
        }

        let growth = (1.0 + r).powf(n);
        Ok(principal * (r * growth) / (growth - 1.0))
    }

    /// Total amount repaid over the life of the loan, rounded to
    /// 2 decimal places.
    pub fn total_cost(&self, principal: f64) -> Result<f64> {
        let monthly = self.monthly_payment(principal)?;
        let total = monthly * f64::from(self.payment_count());
        Ok(round2(total))
    }
}

/// Round to 2 decimal places (cents).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
