//! The report command handler.

use crate::args::ReportArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::report::{DateRange, Report};
use crate::{Config, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt::Write;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Builds a report of income, expense and spending per category over a date range, plus month by
/// month totals for a year.
///
/// The range is either `--from` and `--to`, or a `--timeframe` ending today (the last month when
/// neither is given). The year defaults to the year of the last day of the range.
///
/// # Errors
///
/// - Returns an `Input` error if `--from` is after `--to`, or if `--year` is not a representable
///   calendar year.
/// - Returns a `Database` error if the transactions cannot be read.
pub async fn report(config: Config, args: ReportArgs) -> Result<Out<Report>> {
    report_as_of(config, args, Local::now().date_naive()).await
}

async fn report_as_of(config: Config, args: ReportArgs, today: NaiveDate) -> Result<Out<Report>> {
    let range = match (args.from, args.to) {
        (Some(from), Some(to)) => DateRange::new(from, to),
        _ => args.timeframe.unwrap_or_default().range(today),
    }
    .pub_result(ErrorType::Input)?;
    let year = args.year.unwrap_or_else(|| range.end().year());
    let year = DateRange::year(year).pub_result(ErrorType::Input)?;

    let report = Report::build(config.db(), range, year)
        .await
        .pub_result(ErrorType::Database)?
        .with_format(config.amount_format());
    Ok(Out::new(render(&report), report))
}

/// Renders a report as plain text.
fn render(report: &Report) -> String {
    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(s, "Report for {}", report.range);
    let _ = writeln!(s, "  Income:  {}", report.summary.income);
    let _ = writeln!(s, "  Expense: {}", report.summary.expense);
    let _ = writeln!(s, "  Balance: {}", report.summary.balance);

    if report.categories.is_empty() {
        let _ = writeln!(s, "\nNo expenses in this period");
    } else {
        let _ = writeln!(s, "\nSpending by category");
        for line in &report.categories {
            let _ = writeln!(s, "  {:<24} {:>16}", line.name, line.total.to_string());
        }
    }

    if !report.daily.is_empty() {
        let _ = writeln!(s, "\nDaily");
        for day in &report.daily {
            let _ = writeln!(
                s,
                "  {}  income {:>14}  expense {:>14}",
                day.date,
                day.income.to_string(),
                day.expense.to_string()
            );
        }
    }

    let _ = writeln!(s, "\nMonthly totals for {}", report.year);
    for month in &report.monthly {
        let _ = writeln!(
            s,
            "  {}  income {:>14}  expense {:>14}  net {:>14}",
            MONTHS[month.month as usize % 12],
            month.income.to_string(),
            month.expense.to_string(),
            month.net().to_string()
        );
    }
    s.trim_end().to_string()
}
