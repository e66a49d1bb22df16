//! These structs provide the CLI interface for the pilot CLI.

use crate::calc::{CalculatorKind, Compounding};
use crate::model::{Amount, Recurrence, TransactionType};
use crate::report::Timeframe;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// pilot: personal finance calculators and an income and expense ledger.
///
/// Use the `calc` subcommands to work out the maturity value of a monthly investment plan or a
/// fixed deposit, or the monthly installment on a loan. Record your income and expenses with
/// `insert`, or bring them in from a CSV file with `import`, and see where your money went with
/// `report`.
///
/// Everything is stored locally in a SQLite file inside the pilot home directory. Run `pilot init`
/// once before using the other commands.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the pilot home directory with a default config.json and an empty database.
    ///
    /// The home directory is $HOME/pilot unless --home or PILOT_HOME says otherwise. Edit
    /// config.json afterwards to change the currency symbol, the number of saved calculations or
    /// the calculator limits.
    Init,
    /// Run one of the financial calculators.
    Calc(CalcArgs),
    /// List or clear saved calculator results.
    History(HistoryArgs),
    /// Insert a transaction or category.
    Insert(InsertArgs),
    /// Update a transaction or category.
    Update(UpdateArgs),
    /// Delete transactions or categories.
    Delete(DeleteArgs),
    /// Import transactions from a CSV file.
    ///
    /// The file must have a header row with the columns date, type, amount, category and notes.
    /// Dates are YYYY-MM-DD and type is either "expense" or "income". The category and notes
    /// columns may be empty. Either every row is imported or none are.
    Import(ImportArgs),
    /// Show income, expense and category totals over a date range.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where pilot data and configuration is held. Defaults to ~/pilot
    #[arg(long, env = "PILOT_HOME", default_value_t = default_pilot_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

// -------------------------------------------------------------------------------------------------
// calc
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot calc` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct CalcArgs {
    #[command(subcommand)]
    calculator: CalcSubcommand,

    /// Save the result to the calculator history.
    #[arg(long, global = true)]
    save: bool,
}

impl CalcArgs {
    pub fn new(calculator: CalcSubcommand, save: bool) -> Self {
        Self { calculator, save }
    }

    pub fn calculator(&self) -> &CalcSubcommand {
        &self.calculator
    }

    pub fn save(&self) -> bool {
        self.save
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CalcSubcommand {
    /// A fixed amount invested every month (systematic investment plan).
    Sip(SipArgs),
    /// A lump sum deposited for a fixed term.
    Fd(FdArgs),
    /// The equated monthly installment on a loan.
    Emi(EmiArgs),
}

impl CalcSubcommand {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalcSubcommand::Sip(_) => CalculatorKind::Sip,
            CalcSubcommand::Fd(_) => CalculatorKind::Fd,
            CalcSubcommand::Emi(_) => CalculatorKind::Emi,
        }
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub struct SipArgs {
    /// The amount invested each month.
    #[arg(long, allow_hyphen_values = true)]
    pub monthly: f64,

    /// The expected annual return, in percent.
    #[arg(long, allow_hyphen_values = true)]
    pub rate: f64,

    /// How many years the plan runs for.
    #[arg(long, allow_hyphen_values = true)]
    pub years: f64,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct FdArgs {
    /// The amount deposited.
    #[arg(long, allow_hyphen_values = true)]
    pub principal: f64,

    /// The annual interest rate, in percent.
    #[arg(long, allow_hyphen_values = true)]
    pub rate: f64,

    /// The term of the deposit in years.
    #[arg(long, allow_hyphen_values = true)]
    pub years: f64,

    /// How often interest is compounded: annual, half_yearly, quarterly or monthly. The number of
    /// periods per year (1, 2, 4 or 12) is also accepted.
    #[arg(long, default_value_t = Compounding::Quarterly)]
    pub compounding: Compounding,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct EmiArgs {
    /// The amount borrowed.
    #[arg(long, allow_hyphen_values = true)]
    pub principal: f64,

    /// The annual interest rate, in percent.
    #[arg(long, allow_hyphen_values = true)]
    pub rate: f64,

    /// The term of the loan in years.
    #[arg(long, allow_hyphen_values = true)]
    pub years: f64,
}

// -------------------------------------------------------------------------------------------------
// history
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot history` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    action: HistorySubcommand,
}

impl HistoryArgs {
    pub fn new(action: HistorySubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &HistorySubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistorySubcommand {
    /// List the saved results of a calculator, newest first.
    List {
        #[arg(value_enum)]
        kind: CalculatorKind,
    },
    /// Remove every saved result of a calculator.
    Clear {
        #[arg(value_enum)]
        kind: CalculatorKind,
    },
}

// -------------------------------------------------------------------------------------------------
// insert
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot insert` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct InsertArgs {
    #[command(subcommand)]
    entity: InsertSubcommand,
}

impl InsertArgs {
    pub fn new(entity: InsertSubcommand) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &InsertSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum InsertSubcommand {
    /// Record an income or expense.
    Transaction(InsertTransactionArgs),
    /// Add a category.
    Category(InsertCategoryArgs),
}

#[derive(Debug, ClapArgs, Clone)]
pub struct InsertTransactionArgs {
    /// The amount of money, always positive. A currency symbol and commas are allowed.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Amount,

    /// Either "expense" or "income".
    #[arg(long = "type", default_value_t = TransactionType::Expense)]
    pub r#type: TransactionType,

    /// The id of the category.
    #[arg(long)]
    pub category: Option<String>,

    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,

    /// How often this transaction repeats: daily, weekly, monthly or yearly.
    #[arg(long)]
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct InsertCategoryArgs {
    /// The display name of the category.
    #[arg(long)]
    pub name: String,

    /// The id of the category. Derived from the name when omitted, e.g. "Food & Dining" becomes
    /// "food-dining".
    #[arg(long)]
    pub id: Option<String>,

    /// A display color.
    #[arg(long, default_value = "#808080")]
    pub color: String,

    /// The name of an icon.
    #[arg(long)]
    pub icon: Option<String>,
}

// -------------------------------------------------------------------------------------------------
// update
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot update` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct UpdateArgs {
    #[command(subcommand)]
    entity: UpdateSubcommand,
}

impl UpdateArgs {
    pub fn new(entity: UpdateSubcommand) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &UpdateSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateSubcommand {
    /// Change fields of an existing transaction. Fields that are not given keep their values.
    Transaction(UpdateTransactionArgs),
    /// Change fields of an existing category. Fields that are not given keep their values.
    Category(UpdateCategoryArgs),
}

#[derive(Debug, ClapArgs, Clone)]
pub struct UpdateTransactionArgs {
    /// The id of the transaction to update.
    pub id: String,

    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<Amount>,

    #[arg(long = "type")]
    pub r#type: Option<TransactionType>,

    /// The new category id. Pass an empty string to remove the category.
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// New notes. Pass an empty string to remove them.
    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub recurrence: Option<Recurrence>,

    /// Mark the transaction as not repeating.
    #[arg(long, conflicts_with = "recurrence")]
    pub no_recurrence: bool,
}

#[derive(Debug, ClapArgs, Clone)]
pub struct UpdateCategoryArgs {
    /// The id of the category to update.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    /// A new icon name. Pass an empty string to remove the icon.
    #[arg(long)]
    pub icon: Option<String>,
}

// -------------------------------------------------------------------------------------------------
// delete
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot delete` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct DeleteArgs {
    #[command(subcommand)]
    entity: DeleteSubcommand,
}

impl DeleteArgs {
    pub fn new(entity: DeleteSubcommand) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &DeleteSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeleteSubcommand {
    /// Delete transactions by id. Nothing is deleted if any id does not exist.
    Transaction(DeleteIdsArgs),
    /// Delete categories by id. Transactions in a deleted category become uncategorized.
    Category(DeleteIdsArgs),
}

#[derive(Debug, ClapArgs, Clone)]
pub struct DeleteIdsArgs {
    /// One or more ids.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

impl DeleteIdsArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// import
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot import` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct ImportArgs {
    /// The CSV file to import.
    #[arg(long)]
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

// -------------------------------------------------------------------------------------------------
// report
// -------------------------------------------------------------------------------------------------

/// Args for the `pilot report` command.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct ReportArgs {
    /// A window ending today. Defaults to month when no dates are given.
    #[arg(long, value_enum, conflicts_with_all = ["from", "to"])]
    pub timeframe: Option<Timeframe>,

    /// The first day of the report, YYYY-MM-DD.
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// The last day of the report, YYYY-MM-DD.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// The year for the month by month totals. Defaults to the year of the last day of the
    /// report.
    #[arg(long)]
    pub year: Option<i32>,
}

fn default_pilot_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("pilot"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or PILOT_HOME instead of relying on the default pilot \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("pilot")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
