use super::{
    annual_rate, finite_result, growth_minus_one, monthly_rate, months, positive_amount,
    term_years, InvalidInput,
};
use serde::{Deserialize, Serialize};

/// The fixed monthly payment that fully repays a loan over its term, with totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanAmortization {
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    monthly_payment: f64,
    total_interest: f64,
    total_payable: f64,
}

impl LoanAmortization {
    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    /// The EMI, rounded to a whole unit.
    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    pub fn total_interest(&self) -> f64 {
        self.total_interest
    }

    pub fn total_payable(&self) -> f64 {
        self.total_payable
    }

    pub fn months(&self) -> f64 {
        months(self.years)
    }
}

/// Computes the equated monthly installment of a loan:
///
/// `EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)`
///
/// where `r` is the monthly rate and `n` the number of months. It is evaluated as
/// `P * r / (1 - (1 + r)^-n)`, which stays finite for very long terms and falls back to `P / n`
/// when the rate is too small to matter. The totals are derived from the rounded payment, so
/// `total_payable == monthly_payment * n` holds exactly.
///
/// # Errors
/// - `principal` is not greater than zero.
/// - `annual_rate_percent` is negative.
/// - `years` is not greater than zero.
/// - Any input is `NaN` or infinite.
/// - A payment or total overflows.
pub fn loan_amortization(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
) -> Result<LoanAmortization, InvalidInput> {
    let principal = positive_amount("principal", principal)?;
    let annual_rate_percent = annual_rate(annual_rate_percent)?;
    let years = term_years(years)?;

    let r = monthly_rate(annual_rate_percent);
    let n = months(years);
    let discount = -growth_minus_one(r, -n);
    let monthly_payment = if discount == 0.0 {
        (principal / n).round()
    } else {
        (principal * r / discount).round()
    };
    let monthly_payment = finite_result("monthly payment", monthly_payment)?;
    let total_payable = finite_result("total payable", monthly_payment * n)?;

    Ok(LoanAmortization {
        principal,
        annual_rate_percent,
        years,
        monthly_payment,
        total_interest: total_payable - principal,
        total_payable,
    })
}
