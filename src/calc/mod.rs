//! Financial calculators: recurring investments (SIP), fixed deposits (FD) and amortizing loans
//! (EMI).
//!
//! Every calculator is a pure function of its numeric inputs. Inputs are validated at the
//! function boundary and rejected with `InvalidInput` instead of producing `NaN` or infinity, and
//! a derived value that overflows is rejected with `ResultNotFinite`. A rate of exactly zero is not
//! an error: the closed-form formulas divide by the rate, so the zero-rate case is computed
//! directly.
//!
//! All monetary results are rounded to the nearest whole unit.

mod fixed_deposit;
mod loan;
mod recurring;

pub use fixed_deposit::{fixed_deposit, Compounding, FixedDeposit};
pub use loan::{loan_amortization, LoanAmortization};
pub use recurring::{recurring_investment, RecurringInvestment};

use serde::{Deserialize, Serialize};

/// Reasons a calculator refuses its inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("the annual rate cannot be negative, got {0}%")]
    NegativeRate(f64),
    #[error("the term must be greater than zero years, got {0}")]
    NonPositiveTerm(f64),
    #[error("the annual rate must not exceed {max}%, got {value}%")]
    RateAboveLimit { value: f64, max: f64 },
    #[error("the term must not exceed {max} years, got {value}")]
    TermAboveLimit { value: f64, max: f64 },
    #[error("unsupported compounding frequency {0}, expected one of 1, 2, 4 or 12")]
    UnsupportedCompounding(u32),
    #[error("the {0} is too large to compute, try a shorter term or a lower rate")]
    ResultNotFinite(&'static str),
}

/// The three calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    /// Systematic investment plan: a fixed monthly contribution.
    Sip,
    /// Fixed deposit: a lump sum compounding at a fixed frequency.
    Fd,
    /// Equated monthly installment on a loan.
    Emi,
}

serde_plain::derive_display_from_serialize!(CalculatorKind);
serde_plain::derive_fromstr_from_deserialize!(CalculatorKind);

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 3] = [
        CalculatorKind::Sip,
        CalculatorKind::Fd,
        CalculatorKind::Emi,
    ];
}

/// The result of any calculator, tagged with its kind when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Calculation {
    Sip(RecurringInvestment),
    Fd(FixedDeposit),
    Emi(LoanAmortization),
}

impl Calculation {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            Calculation::Sip(_) => CalculatorKind::Sip,
            Calculation::Fd(_) => CalculatorKind::Fd,
            Calculation::Emi(_) => CalculatorKind::Emi,
        }
    }
}

impl From<RecurringInvestment> for Calculation {
    fn from(value: RecurringInvestment) -> Self {
        Calculation::Sip(value)
    }
}

impl From<FixedDeposit> for Calculation {
    fn from(value: FixedDeposit) -> Self {
        Calculation::Fd(value)
    }
}

impl From<LoanAmortization> for Calculation {
    fn from(value: LoanAmortization) -> Self {
        Calculation::Emi(value)
    }
}

/// Upper bounds on the rate and term a calculator will accept.
///
/// The calculators themselves only reject values that are meaningless (negative rates, zero
/// terms). These limits express what is sensible for a given instrument and are applied by the
/// caller before calling a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub max_rate_percent: f64,
    pub max_years: f64,
}

impl Limits {
    pub const fn new(max_rate_percent: f64, max_years: f64) -> Self {
        Self {
            max_rate_percent,
            max_years,
        }
    }

    pub fn check(&self, annual_rate_percent: f64, years: f64) -> Result<(), InvalidInput> {
        if annual_rate_percent > self.max_rate_percent {
            return Err(InvalidInput::RateAboveLimit {
                value: annual_rate_percent,
                max: self.max_rate_percent,
            });
        }
        if years > self.max_years {
            return Err(InvalidInput::TermAboveLimit {
                value: years,
                max: self.max_years,
            });
        }
        Ok(())
    }
}

/// Limits for each calculator. Missing entries in a config file fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorLimits {
    pub sip: Limits,
    pub fd: Limits,
    pub emi: Limits,
}

impl Default for CalculatorLimits {
    fn default() -> Self {
        Self {
            sip: Limits::new(50.0, 50.0),
            fd: Limits::new(20.0, 30.0),
            emi: Limits::new(30.0, 50.0),
        }
    }
}

impl CalculatorLimits {
    pub fn get(&self, kind: CalculatorKind) -> Limits {
        match kind {
            CalculatorKind::Sip => self.sip,
            CalculatorKind::Fd => self.fd,
            CalculatorKind::Emi => self.emi,
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::NotFinite { field, value })
    }
}

/// Guards a derived value, so a result that overflowed is reported rather than returned.
fn finite_result(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::ResultNotFinite(field))
    }
}

fn positive_amount(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    let value = finite(field, value)?;
    if value <= 0.0 {
        return Err(InvalidInput::NonPositiveAmount { field, value });
    }
    Ok(value)
}

fn annual_rate(value: f64) -> Result<f64, InvalidInput> {
    let value = finite("annual rate", value)?;
    if value < 0.0 {
        return Err(InvalidInput::NegativeRate(value));
    }
    Ok(value)
}

fn term_years(value: f64) -> Result<f64, InvalidInput> {
    let value = finite("term", value)?;
    if value <= 0.0 {
        return Err(InvalidInput::NonPositiveTerm(value));
    }
    Ok(value)
}

/// Converts an annual percentage into a monthly fraction, e.g. `12.0` -> `0.01`.
fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 1200.0
}

fn months(years: f64) -> f64 {
    years * 12.0
}

/// `(1 + r)^n - 1`, accurate for rates so small that `1 + r` rounds to `1`.
fn growth_minus_one(r: f64, n: f64) -> f64 {
    (n * r.ln_1p()).exp_m1()
}
