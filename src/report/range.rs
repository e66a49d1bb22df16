use crate::error::Res;
use anyhow::{ensure, Context};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// - Returns an error if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Res<Self> {
        ensure!(
            start <= end,
            "The start date {start} is after the end date {end}"
        );
        Ok(Self { start, end })
    }

    /// January 1 through December 31 of `year`.
    pub fn year(year: i32) -> Res<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("The year {year} is out of range"))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .with_context(|| format!("The year {year} is out of range"))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A window of time ending today.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Today only.
    Day,
    /// The last seven days and today.
    Week,
    /// Since the same day last month.
    #[default]
    Month,
    /// Since the same day last year.
    Year,
}

serde_plain::derive_display_from_serialize!(Timeframe);
serde_plain::derive_fromstr_from_deserialize!(Timeframe);

impl Timeframe {
    /// The range covered by this timeframe when it ends on `today`.
    pub fn range(&self, today: NaiveDate) -> Res<DateRange> {
        let start = match self {
            Timeframe::Day => Some(today),
            Timeframe::Week => today.checked_sub_days(Days::new(7)),
            Timeframe::Month => today.checked_sub_months(Months::new(1)),
            Timeframe::Year => today.checked_sub_months(Months::new(12)),
        }
        .with_context(|| format!("Unable to compute a {self} timeframe ending {today}"))?;
        DateRange::new(start, today)
    }
}
