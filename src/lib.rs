//! pilot-ledger: personal finance calculators and a local income and expense ledger.
//!
//! The [`calc`] module holds the pure financial calculators and [`report`] holds the pure ledger
//! aggregations together with the report that ties them to stored transactions. The
//! [`commands`] module exposes each CLI subcommand as an async function.

pub mod args;
pub mod calc;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
pub mod report;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
