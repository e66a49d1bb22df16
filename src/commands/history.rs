//! Calculator history command handlers.

use crate::calc::CalculatorKind;
use crate::commands::calc::describe;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::HistoryEntry;
use crate::{Config, Result};

/// Lists the saved results of one calculator, newest first.
pub async fn history_list(config: Config, kind: CalculatorKind) -> Result<Out<Vec<HistoryEntry>>> {
    let entries = config
        .db()
        .history(kind)
        .await
        .pub_result(ErrorType::Database)?;
    if entries.is_empty() {
        return Ok(Out::new(format!("No saved {kind} calculations"), entries));
    }

    let format = config.amount_format();
    let mut message = format!("{} saved {kind} calculation(s)", entries.len());
    for entry in &entries {
        message.push_str(&format!(
            "\n\n{} ({})\n{}",
            entry.calculated_at().format("%Y-%m-%d %H:%M UTC"),
            entry.id(),
            describe(entry.calculation(), format)
        ));
    }
    Ok(Out::new(message, entries))
}

/// Removes every saved result of one calculator and returns how many were removed.
pub async fn history_clear(config: Config, kind: CalculatorKind) -> Result<Out<u64>> {
    let removed = config
        .db()
        .clear_history(kind)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(
        format!("Cleared {removed} saved {kind} calculation(s)"),
        removed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::recurring_investment;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_then_clear() {
        let env = TestEnv::new().await;
        let out = history_list(env.config(), CalculatorKind::Sip).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(out.message(), "No saved sip calculations");

        let sip = recurring_investment(500.0, 10.0, 3.0).unwrap();
        env.config()
            .db()
            .save_calculation(&HistoryEntry::new(sip), 50)
            .await
            .unwrap();

        let out = history_list(env.config(), CalculatorKind::Sip).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 1);
        assert!(out.message().contains("Investing $500.00 a month"));

        let out = history_clear(env.config(), CalculatorKind::Sip).await.unwrap();
        assert_eq!(out.structure(), Some(&1));
        let out = history_list(env.config(), CalculatorKind::Sip).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
    }
}
