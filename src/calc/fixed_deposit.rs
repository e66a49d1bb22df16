use super::{annual_rate, finite_result, positive_amount, term_years, InvalidInput};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How many times per year interest is compounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    Annual,
    HalfYearly,
    #[default]
    Quarterly,
    Monthly,
}

impl Compounding {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Annual => 1,
            Compounding::HalfYearly => 2,
            Compounding::Quarterly => 4,
            Compounding::Monthly => 12,
        }
    }
}

impl TryFrom<u32> for Compounding {
    type Error = InvalidInput;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Compounding::Annual),
            2 => Ok(Compounding::HalfYearly),
            4 => Ok(Compounding::Quarterly),
            12 => Ok(Compounding::Monthly),
            other => Err(InvalidInput::UnsupportedCompounding(other)),
        }
    }
}

impl Display for Compounding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Compounding::Annual => "annual",
            Compounding::HalfYearly => "half_yearly",
            Compounding::Quarterly => "quarterly",
            Compounding::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

/// Accepts either a name (`quarterly`) or the number of periods per year (`4`).
impl FromStr for Compounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annual" | "yearly" => Ok(Compounding::Annual),
            "half_yearly" | "half-yearly" => Ok(Compounding::HalfYearly),
            "quarterly" => Ok(Compounding::Quarterly),
            "monthly" => Ok(Compounding::Monthly),
            other => {
                let n: u32 = other
                    .parse()
                    .map_err(|_| format!("'{s}' is not a compounding frequency"))?;
                Compounding::try_from(n).map_err(|e| e.to_string())
            }
        }
    }
}

/// The outcome of a lump-sum deposit compounding at a fixed frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedDeposit {
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    compounding: Compounding,
    maturity_value: f64,
    interest_earned: f64,
}

impl FixedDeposit {
    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    pub fn maturity_value(&self) -> f64 {
        self.maturity_value
    }

    pub fn interest_earned(&self) -> f64 {
        self.interest_earned
    }
}

/// Computes compound interest on a deposit: `A = P * (1 + r/n)^(n*t)`.
///
/// # Errors
/// - `principal` is not greater than zero.
/// - `annual_rate_percent` is negative.
/// - `years` is not greater than zero.
/// - Any input is `NaN` or infinite.
/// - The maturity value overflows.
pub fn fixed_deposit(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    compounding: Compounding,
) -> Result<FixedDeposit, InvalidInput> {
    let principal = positive_amount("principal", principal)?;
    let annual_rate_percent = annual_rate(annual_rate_percent)?;
    let years = term_years(years)?;

    let rate = annual_rate_percent / 100.0;
    let n = f64::from(compounding.periods_per_year());
    let maturity_value = finite_result(
        "maturity value",
        (principal * (1.0 + rate / n).powf(n * years)).round(),
    )?;

    Ok(FixedDeposit {
        principal,
        annual_rate_percent,
        years,
        compounding,
        maturity_value,
        interest_earned: maturity_value - principal,
    })
}
