use crate::calc::{Calculation, CalculatorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved calculator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: String,
    calculated_at: DateTime<Utc>,
    calculation: Calculation,
}

impl HistoryEntry {
    /// Wraps `calculation` with a new id and the current time.
    pub fn new(calculation: impl Into<Calculation>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            calculated_at: Utc::now(),
            calculation: calculation.into(),
        }
    }

    pub(crate) fn from_parts(
        id: String,
        calculated_at: DateTime<Utc>,
        calculation: Calculation,
    ) -> Self {
        Self {
            id,
            calculated_at,
            calculation,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn calculated_at(&self) -> DateTime<Utc> {
        self.calculated_at
    }

    pub fn calculation(&self) -> &Calculation {
        &self.calculation
    }

    pub fn kind(&self) -> CalculatorKind {
        self.calculation.kind()
    }
}
