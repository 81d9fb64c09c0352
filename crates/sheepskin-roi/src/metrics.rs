//! Derived ROI metrics for one cohort cell.
//!
//! A cohort is one (education level, year, demographic) triple. The
//! inputs are the cohort's median annual earnings, the baseline
//! earnings of the "High school completion" level for the same year
//! and demographic, and the pre-scaled total education cost for the
//! level and year (costs carry no demographic dimension and are
//! broadcast across cohorts).

use crate::amortize::{LoanTerms, round2};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One joined input row for ROI computation.
///
/// Absent values degrade to zero here rather than skipping the row;
/// the only exclusion is the zero-cost prune applied after persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortInput {
    /// Education level surrogate ID.
    pub level_id: i64,

    /// Year surrogate ID.
    pub year_id: i64,

    /// Demographic surrogate ID.
    pub demographic_id: i64,

    /// Median annual earnings for the cohort.
    pub annual_earnings: f64,

    /// High-school-completion earnings for the same year/demographic.
    pub baseline_earnings: f64,

    /// Total education cost, already scaled by program length.
    pub total_education_cost: f64,
}

/// Computed ROI metrics for one cohort, keyed by the same triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    /// Education level surrogate ID.
    pub level_id: i64,

    /// Year surrogate ID.
    pub year_id: i64,

    /// Demographic surrogate ID.
    pub demographic_id: i64,

    /// Total education cost, already scaled by program length.
    pub total_education_cost: f64,

    /// Principal borrowed (cost × coverage).
    pub loan_amount: f64,

    /// Total repaid over the loan term, including interest.
    pub total_loan_cost: f64,

    /// Equal monthly loan payment.
    pub monthly_loan_payment: f64,

    /// Median annual earnings for the cohort.
    pub annual_earnings: f64,

    /// High-school baseline earnings.
    pub baseline_earnings: f64,

    /// Monthly earnings net of the loan payment.
    pub net_monthly_earnings: f64,

    /// Education cost plus loan interest paid.
    pub total_investment: f64,

    /// Monthly earnings premium over the baseline.
    pub earnings_premium_monthly: f64,

    /// Ten-year earnings minus total investment.
    pub net_roi_10yr: f64,

    /// Net ROI as a percentage of total investment (0 when the
    /// investment is not positive).
    pub roi_percentage: f64,

    /// Annual loan payments over annual earnings (0 when earnings are
    /// not positive).
    pub debt_to_income_ratio: f64,

    /// Investment divided by the annual earnings premium (0 unless the
    /// baseline is positive and the premium is positive).
    pub years_to_break_even: f64,
}

impl RoiMetrics {
    /// Compute all derived metrics for one cohort.
    pub fn compute(input: &CohortInput, terms: &LoanTerms) -> Result<Self> {
        let cost = input.total_education_cost;
        let earnings = input.annual_earnings;
        let baseline = input.baseline_earnings;

        let loan_amount = cost * terms.coverage;
        let monthly_loan_payment = terms.monthly_payment(loan_amount)?;
        let total_loan_cost = terms.total_cost(loan_amount)?;

        let net_monthly_earnings = earnings / 12.0 - monthly_loan_payment;
        let earnings_premium_monthly = (earnings - baseline) / 12.0;

        let total_investment = cost + (total_loan_cost - loan_amount);
        let net_roi_10yr = earnings * 10.0 - total_investment;

        let roi_percentage = if total_investment > 0.0 {
            net_roi_10yr / total_investment * 100.0
        } else {
            0.0
        };
        let debt_to_income_ratio = if earnings > 0.0 {
            monthly_loan_payment * 12.0 / earnings
        } else {
            0.0
        };
        let years_to_break_even = if baseline > 0.0 && earnings > baseline {
            total_investment / (earnings - baseline)
        } else {
            0.0
        };

        Ok(Self {
            level_id: input.level_id,
            year_id: input.year_id,
            demographic_id: input.demographic_id,
            total_education_cost: round2(cost),
            loan_amount: round2(loan_amount),
            total_loan_cost,
            monthly_loan_payment: round2(monthly_loan_payment),
            annual_earnings: round2(earnings),
            baseline_earnings: round2(baseline),
            net_monthly_earnings: round2(net_monthly_earnings),
            total_investment: round2(total_investment),
            earnings_premium_monthly: round2(earnings_premium_monthly),
            net_roi_10yr: round2(net_roi_10yr),
            roi_percentage: round2(roi_percentage),
            debt_to_income_ratio: round2(debt_to_income_ratio),
            years_to_break_even: round2(years_to_break_even),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_input() -> CohortInput {
        CohortInput {
            level_id: 6,
            year_id: 1,
            demographic_id: 1,
            annual_earnings: 60_000.0,
            baseline_earnings: 35_000.0,
            total_education_cost: 40_000.0,
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let terms = LoanTerms::default();
        let m = RoiMetrics::compute(&reference_input(), &terms).unwrap();

        assert_relative_eq!(m.loan_amount, 28_000.0);
        assert_relative_eq!(m.monthly_loan_payment, 320.51, epsilon = 0.05);
        assert_relative_eq!(m.total_loan_cost, 38_460.64, epsilon = 5.0);
        assert_relative_eq!(m.total_investment, 50_460.64, epsilon = 5.0);
        assert_relative_eq!(m.net_roi_10yr, 549_539.36, epsilon = 5.0);
        assert_relative_eq!(m.roi_percentage, 1_089.0, epsilon = 1.0);
        assert_relative_eq!(m.debt_to_income_ratio, 0.0641, epsilon = 0.001);
        assert_relative_eq!(m.years_to_break_even, 2.018, epsilon = 0.01);
        assert_relative_eq!(m.earnings_premium_monthly, 2_083.33, epsilon = 0.01);
        assert_relative_eq!(m.net_monthly_earnings, 5_000.0 - m.monthly_loan_payment);
    }

    #[test]
    fn test_investment_identity() {
        let terms = LoanTerms::default();
        let m = RoiMetrics::compute(&reference_input(), &terms).unwrap();
        // total investment = cost + interest paid on the loan
        assert_relative_eq!(
            m.total_investment,
            m.total_education_cost + (m.total_loan_cost - m.loan_amount),
            epsilon = 0.01
        );
    }

    #[test]
    fn test_zero_cost_computes_without_error() {
        // Zero-cost rows are computed and filtered later, not skipped.
        let terms = LoanTerms::default();
        let input = CohortInput {
            total_education_cost: 0.0,
            ..reference_input()
        };
        let m = RoiMetrics::compute(&input, &terms).unwrap();
        assert_eq!(m.loan_amount, 0.0);
        assert_eq!(m.monthly_loan_payment, 0.0);
        assert_eq!(m.total_investment, 0.0);
        // Investment is not positive, so the percentage guard fires.
        assert_eq!(m.roi_percentage, 0.0);
    }

    #[test]
    fn test_zero_earnings_guards() {
        let terms = LoanTerms::default();
        let input = CohortInput {
            annual_earnings: 0.0,
            baseline_earnings: 0.0,
            ..reference_input()
        };
        let m = RoiMetrics::compute(&input, &terms).unwrap();
        assert_eq!(m.debt_to_income_ratio, 0.0);
        assert_eq!(m.years_to_break_even, 0.0);
        assert!(m.net_monthly_earnings < 0.0);
    }

    #[test]
    fn test_break_even_requires_positive_premium() {
        let terms = LoanTerms::default();
        let input = CohortInput {
            annual_earnings: 30_000.0,
            baseline_earnings: 35_000.0,
            ..reference_input()
        };
        let m = RoiMetrics::compute(&input, &terms).unwrap();
        assert_eq!(m.years_to_break_even, 0.0);
    }

    #[test]
    fn test_idempotent_recomputation() {
        let terms = LoanTerms::default();
        let a = RoiMetrics::compute(&reference_input(), &terms).unwrap();
        let b = RoiMetrics::compute(&reference_input(), &terms).unwrap();
        assert_eq!(a, b);
    }
}
