//! Calculator command handlers.

use crate::args::{CalcArgs, CalcSubcommand};
use crate::calc::{
    fixed_deposit, loan_amortization, recurring_investment, Calculation, InvalidInput,
};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, AmountFormat, HistoryEntry};
use crate::{Config, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// Runs a calculator after checking its inputs against the limits in `config.json`. With
/// `--save` the result is added to the history of that calculator, and the oldest saved result
/// is dropped when the history is full.
///
/// # Errors
///
/// - Returns an `Input` error if an input is invalid or above its configured limit.
/// - Returns a `Database` error if the result cannot be saved.
pub async fn calculate(config: Config, args: CalcArgs) -> Result<Out<Calculation>> {
    let kind = args.calculator().kind();
    let limits = config.limits().get(kind);
    let calculation = run(args.calculator(), |rate, years| limits.check(rate, years))
        .pub_result(ErrorType::Input)?;
    debug!("{kind} calculation: {calculation:?}");

    let mut message = describe(&calculation, config.amount_format());
    if args.save() {
        let entry = HistoryEntry::new(calculation);
        config
            .db()
            .save_calculation(&entry, config.history_limit())
            .await
            .pub_result(ErrorType::Database)?;
        message.push_str(&format!("\nSaved to {kind} history as {}", entry.id()));
    }
    Ok(Out::new(message, calculation))
}

fn run<F>(calculator: &CalcSubcommand, check: F) -> std::result::Result<Calculation, InvalidInput>
where
    F: Fn(f64, f64) -> std::result::Result<(), InvalidInput>,
{
    Ok(match calculator {
        CalcSubcommand::Sip(a) => {
            check(a.rate, a.years)?;
            recurring_investment(a.monthly, a.rate, a.years)?.into()
        }
        CalcSubcommand::Fd(a) => {
            check(a.rate, a.years)?;
            fixed_deposit(a.principal, a.rate, a.years, a.compounding)?.into()
        }
        CalcSubcommand::Emi(a) => {
            check(a.rate, a.years)?;
            loan_amortization(a.principal, a.rate, a.years)?.into()
        }
    })
}

/// Renders a calculation as a few human-readable lines.
pub(crate) fn describe(calculation: &Calculation, format: AmountFormat) -> String {
    let money = |v: f64| {
        Decimal::try_from(v)
            .map(|d| Amount::new_with_format(d, format).to_string())
            .unwrap_or_else(|_| v.to_string())
    };
    match calculation {
        Calculation::Sip(s) => format!(
            "Investing {} a month at {}% for {} years\n\
            Maturity value:  {}\n\
            Total invested:  {}\n\
            Total gained:    {}",
            money(s.contribution()),
            s.annual_rate_percent(),
            s.years(),
            money(s.maturity_value()),
            money(s.total_contributed()),
            money(s.total_gained()),
        ),
        Calculation::Fd(d) => format!(
            "Depositing {} at {}% for {} years, compounded {}\n\
            Maturity value:  {}\n\
            Interest earned: {}",
            money(d.principal()),
            d.annual_rate_percent(),
            d.years(),
            d.compounding(),
            money(d.maturity_value()),
            money(d.interest_earned()),
        ),
        Calculation::Emi(l) => format!(
            "Borrowing {} at {}% for {} years\n\
            Monthly payment: {}\n\
            Total interest:  {}\n\
            Total payable:   {}",
            money(l.principal()),
            l.annual_rate_percent(),
            l.years(),
            money(l.monthly_payment()),
            money(l.total_interest()),
            money(l.total_payable()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{EmiArgs, FdArgs, SipArgs};
    use crate::calc::{CalculatorKind, Compounding};
    use crate::test::TestEnv;

    fn sip(monthly: f64, rate: f64, years: f64) -> CalcSubcommand {
        CalcSubcommand::Sip(SipArgs {
            monthly,
            rate,
            years,
        })
    }

    #[tokio::test]
    async fn test_calculate_sip() {
        let env = TestEnv::new().await;
        let out = calculate(env.config(), CalcArgs::new(sip(1000.0, 12.0, 1.0), false))
            .await
            .unwrap();
        match out.structure().unwrap() {
            Calculation::Sip(s) => assert_eq!(s.maturity_value(), 12809.0),
            other => panic!("unexpected {other:?}"),
        }
        assert!(out.message().contains("$12,809.00"));
        let history = env.config().db().history(CalculatorKind::Sip).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_rejects_rate_above_limit() {
        let env = TestEnv::new().await;
        let fd = CalcSubcommand::Fd(FdArgs {
            principal: 10_000.0,
            rate: 25.0,
            years: 1.0,
            compounding: Compounding::Quarterly,
        });
        let err = calculate(env.config(), CalcArgs::new(fd, true))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Input);
        assert!(err.to_string().contains("must not exceed 20%"));
        let history = env.config().db().history(CalculatorKind::Fd).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_rejects_invalid_input() {
        let env = TestEnv::new().await;
        let emi = CalcSubcommand::Emi(EmiArgs {
            principal: -5.0,
            rate: 8.0,
            years: 10.0,
        });
        let err = calculate(env.config(), CalcArgs::new(emi, false))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_calculate_and_save() {
        let env = TestEnv::new().await;
        let emi = CalcSubcommand::Emi(EmiArgs {
            principal: 2_500_000.0,
            rate: 8.5,
            years: 20.0,
        });
        let out = calculate(env.config(), CalcArgs::new(emi, true))
            .await
            .unwrap();
        assert!(out.message().contains("Saved to emi history"));
        let history = env.config().db().history(CalculatorKind::Emi).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].calculation(), out.structure().unwrap());
    }

    #[tokio::test]
    async fn test_tiny_rate_keeps_history_readable() {
        let env = TestEnv::new().await;
        for rate in [8.5, 1e-15] {
            let emi = CalcSubcommand::Emi(EmiArgs {
                principal: 100_000.0,
                rate,
                years: 10.0,
            });
            calculate(env.config(), CalcArgs::new(emi, true))
                .await
                .unwrap();
        }
        let history = env.config().db().history(CalculatorKind::Emi).await.unwrap();
        assert_eq!(history.len(), 2);
        for entry in &history {
            let Calculation::Emi(l) = entry.calculation() else {
                panic!("expected emi");
            };
            assert!(l.monthly_payment().is_finite());
        }
    }

    #[test]
    fn test_describe_uses_format() {
        let calc: Calculation = fixed_deposit(100_000.0, 7.0, 1.0, Compounding::Annual)
            .unwrap()
            .into();
        let text = describe(&calc, AmountFormat::new(Some('₹'), true));
        assert!(text.contains("Maturity value:  ₹107,000.00"));
        assert!(text.contains("compounded annual"));
    }
}
