//! Annual discounting for NPV

use serde::{Deserialize, Serialize};

/// Flat annual discount rate; year 1 is the valuation point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurve {
    pub annual_rate: f64,
}

impl DiscountCurve {
    pub fn single_rate(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// Factor applied to a cash flow in `year` (1-indexed): (1+r)^-(year-1)
    pub fn factor(&self, year: u32) -> f64 {
        let periods = year.saturating_sub(1) as i32;
        1.0 / (1.0 + self.annual_rate).powi(periods)
    }

    pub fn discount(&self, amount: f64, year: u32) -> f64 {
        amount * self.factor(year)
    }

    /// Present value of a stream whose first entry falls in year 1
    pub fn present_value(&self, amounts: &[f64]) -> f64 {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| self.discount(*amount, i as u32 + 1))
            .sum()
    }
}

impl Default for DiscountCurve {
    fn default() -> Self {
        Self::single_rate(0.06)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_year_one_undiscounted() {
        let curve = DiscountCurve::single_rate(0.08);
        assert_eq!(curve.factor(1), 1.0);
        assert_relative_eq!(curve.factor(3), 1.0 / (1.08 * 1.08));
    }

    #[test]
    fn test_present_value() {
        let curve = DiscountCurve::single_rate(0.10);
        let pv = curve.present_value(&[-1000.0, 110.0, 121.0]);
        assert_relative_eq!(pv, -800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rate() {
        let curve = DiscountCurve::single_rate(0.0);
        assert_relative_eq!(curve.present_value(&[1.0, 2.0, 3.0]), 6.0);
    }
}
