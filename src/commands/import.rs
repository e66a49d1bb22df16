//! CSV import of transactions.

use crate::args::ImportArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, Recurrence, Transaction, TransactionType};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

/// One row of an import file. Columns are matched by their header names, so their order does not
/// matter and `category`, `notes` and `recurrence` may be left out entirely.
#[derive(Debug, Clone, Deserialize)]
struct CsvRecord {
    date: NaiveDate,
    r#type: TransactionType,
    amount: Amount,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    recurrence: Option<Recurrence>,
}

impl CsvRecord {
    fn into_transaction(self) -> Res<Transaction> {
        Ok(
            Transaction::new(self.amount, self.r#type, self.category, self.date)?
                .with_notes(self.notes)
                .with_recurrence(self.recurrence),
        )
    }
}

/// Imports every row of a CSV file as a new transaction.
///
/// The whole file is read and validated before anything is written, and the rows are inserted in
/// a single database transaction, so either every row is imported or none are.
///
/// # Errors
///
/// - Returns an `Io` error if the file cannot be read.
/// - Returns an `Input` error naming the first bad row if any row cannot be parsed or has an
///   amount that is not greater than zero.
/// - Returns a `Database` error if the rows cannot be inserted.
pub async fn import(config: Config, args: ImportArgs) -> Result<Out<Vec<String>>> {
    let content = utils::read(args.file()).await.pub_result(ErrorType::Io)?;
    let transactions = parse(&content)
        .with_context(|| format!("Unable to import {}", args.file().display()))
        .pub_result(ErrorType::Input)?;
    debug!("Parsed {} transactions", transactions.len());

    let count = config
        .db()
        .insert_transactions(&transactions)
        .await
        .pub_result(ErrorType::Database)?;
    info!("Imported {count} rows from {}", args.file().display());

    let ids = transactions.iter().map(|t| t.id().to_string()).collect();
    let message = format!(
        "Imported {} transaction{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, ids))
}

fn parse(content: &str) -> Res<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut transactions = Vec::new();
    for (ix, result) in reader.deserialize::<CsvRecord>().enumerate() {
        // Line 1 is the header.
        let line = ix + 2;
        let record = result.with_context(|| format!("Invalid row on line {line}"))?;
        let transaction = record
            .into_transaction()
            .with_context(|| format!("Invalid row on line {line}"))?;
        transactions.push(transaction);
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DateRange;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    const GOOD: &str = "\
date,type,amount,category,notes
2024-01-05,expense,50,food,lunch
2024-01-05,income,30,,
2024-01-07,expense,\"$1,250.00\",rent,
";

    #[test]
    fn test_parse_rows() {
        let transactions = parse(GOOD).unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].notes(), Some("lunch"));
        assert_eq!(transactions[1].category(), None);
        assert!(transactions[1].is_income());
        assert_eq!(transactions[2].amount().value(), Decimal::from(1250));
    }

    #[test]
    fn test_parse_names_the_bad_line() {
        let csv = "date,type,amount,category,notes\n\
            2024-01-05,expense,50,food,\n\
            2024-01-06,transfer,10,,\n";
        let err = parse(csv).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));

        let csv = "date,type,amount\n2024-01-05,expense,0\n";
        let err = parse(csv).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[tokio::test]
    async fn test_import_file() {
        let env = TestEnv::new().await;
        let path = env.scratch_path("import.csv");
        utils::write(&path, GOOD).await.unwrap();

        let out = import(env.config(), ImportArgs::new(&path)).await.unwrap();
        assert_eq!(out.message(), "Imported 3 transactions");
        assert_eq!(out.structure().unwrap().len(), 3);

        let range = DateRange::year(2024).unwrap();
        let stored = env.config().db().transactions_in_range(range).await.unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_import_bad_file_imports_nothing() {
        let env = TestEnv::new().await;
        let path = env.scratch_path("bad.csv");
        utils::write(&path, "date,type,amount\n2024-01-05,expense,5\nnot-a-date,income,1\n")
            .await
            .unwrap();

        let err = import(env.config(), ImportArgs::new(&path)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
        let range = DateRange::year(2024).unwrap();
        assert!(env
            .config()
            .db()
            .transactions_in_range(range)
            .await
            .unwrap()
            .is_empty());

        let missing = env.scratch_path("missing.csv");
        let err = import(env.config(), ImportArgs::new(&missing)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }
}
