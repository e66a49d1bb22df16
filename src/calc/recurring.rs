use super::{
    annual_rate, finite_result, growth_minus_one, monthly_rate, months, positive_amount,
    term_years, InvalidInput,
};
use serde::{Deserialize, Serialize};

/// The outcome of investing a fixed amount every month (a SIP).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringInvestment {
    contribution: f64,
    annual_rate_percent: f64,
    years: f64,
    maturity_value: f64,
    total_contributed: f64,
    total_gained: f64,
}

impl RecurringInvestment {
    /// The amount invested at the start of every month.
    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    pub fn maturity_value(&self) -> f64 {
        self.maturity_value
    }

    pub fn total_contributed(&self) -> f64 {
        self.total_contributed
    }

    pub fn total_gained(&self) -> f64 {
        self.total_gained
    }
}

/// Computes the maturity value of a monthly contribution compounding monthly, with each
/// contribution made at the start of its month:
///
/// `M = P * (((1 + r)^n - 1) / r) * (1 + r)`
///
/// where `r` is the monthly rate and `n` the number of months. When `r` is zero, or too small to
/// change `(1 + r)^n`, the result is the plain sum of contributions and the amount contributed is
/// rounded with it, so nothing is gained.
///
/// # Errors
/// - `contribution` is not greater than zero.
/// - `annual_rate_percent` is negative.
/// - `years` is not greater than zero.
/// - Any input is `NaN` or infinite.
/// - The maturity value overflows.
pub fn recurring_investment(
    contribution: f64,
    annual_rate_percent: f64,
    years: f64,
) -> Result<RecurringInvestment, InvalidInput> {
    let contribution = positive_amount("contribution", contribution)?;
    let annual_rate_percent = annual_rate(annual_rate_percent)?;
    let years = term_years(years)?;

    let r = monthly_rate(annual_rate_percent);
    let n = months(years);
    let total_contributed = finite_result("amount contributed", contribution * n)?;
    let growth = growth_minus_one(r, n);
    let (maturity_value, total_contributed) = if growth == 0.0 {
        let rounded = total_contributed.round();
        (rounded, rounded)
    } else {
        let maturity = (contribution * (growth / r) * (1.0 + r)).round();
        (finite_result("maturity value", maturity)?, total_contributed)
    };

    Ok(RecurringInvestment {
        contribution,
        annual_rate_percent,
        years,
        maturity_value,
        total_contributed,
        total_gained: maturity_value - total_contributed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_gains_nothing() {
        let sip = recurring_investment(5000.0, 0.0, 10.0).unwrap();
        assert_eq!(sip.maturity_value(), 5000.0 * 10.0 * 12.0);
        assert_eq!(sip.total_gained(), 0.0);
        assert!(sip.maturity_value().is_finite());
    }

    #[test]
    fn test_zero_rate_with_fractional_contribution() {
        let sip = recurring_investment(100.3, 0.0, 1.0).unwrap();
        assert_eq!(sip.maturity_value(), 1204.0);
        assert_eq!(sip.total_contributed(), 1204.0);
        assert_eq!(sip.total_gained(), 0.0);
    }

    #[test]
    fn test_tiny_rate_behaves_like_zero_rate() {
        let sip = recurring_investment(1000.0, 1e-15, 10.0).unwrap();
        assert_eq!(sip.maturity_value(), 120_000.0);
        assert_eq!(sip.total_gained(), 0.0);
    }

    #[test]
    fn test_overflowing_term_is_rejected() {
        assert_eq!(
            recurring_investment(1000.0, 12.0, 1e6),
            Err(InvalidInput::ResultNotFinite("maturity value"))
        );
        assert_eq!(
            recurring_investment(1000.0, 0.0, f64::MAX),
            Err(InvalidInput::ResultNotFinite("amount contributed"))
        );
    }

    #[test]
    fn test_one_year_at_twelve_percent() {
        // r = 0.01, n = 12: 1000 * ((1.01^12 - 1) / 0.01) * 1.01 = 12809.33
        let sip = recurring_investment(1000.0, 12.0, 1.0).unwrap();
        assert_eq!(sip.maturity_value(), 12809.0);
        assert_eq!(sip.total_contributed(), 12000.0);
        assert_eq!(sip.total_gained(), 809.0);
    }

    #[test]
    fn test_matches_closed_form() {
        let sip = recurring_investment(5000.0, 12.0, 10.0).unwrap();
        let r: f64 = 0.01;
        let expected = (5000.0 * (((1.0 + r).powf(120.0) - 1.0) / r) * (1.0 + r)).round();
        assert_eq!(sip.maturity_value(), expected);
        assert_eq!(sip.total_contributed(), 600_000.0);
        assert_eq!(sip.total_gained(), expected - 600_000.0);
    }

    #[test]
    fn test_higher_rate_grows_faster() {
        let mut previous = recurring_investment(2500.0, 0.0, 15.0)
            .unwrap()
            .maturity_value();
        for rate in [1.0, 4.5, 8.0, 12.0, 18.0, 30.0] {
            let next = recurring_investment(2500.0, rate, 15.0)
                .unwrap()
                .maturity_value();
            assert!(next > previous, "{next} should exceed {previous} at {rate}%");
            previous = next;
        }
    }

    #[test]
    fn test_fractional_years() {
        let sip = recurring_investment(1000.0, 12.0, 0.5).unwrap();
        assert_eq!(sip.total_contributed(), 6000.0);
        assert!(sip.maturity_value() > 6000.0);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            recurring_investment(0.0, 12.0, 10.0),
            Err(InvalidInput::NonPositiveAmount {
                field: "contribution",
                value: 0.0
            })
        );
        assert_eq!(
            recurring_investment(100.0, -1.0, 10.0),
            Err(InvalidInput::NegativeRate(-1.0))
        );
        assert_eq!(
            recurring_investment(100.0, 12.0, 0.0),
            Err(InvalidInput::NonPositiveTerm(0.0))
        );
        assert!(matches!(
            recurring_investment(100.0, f64::INFINITY, 1.0),
            Err(InvalidInput::NotFinite { .. })
        ));
    }
}
