use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, UserId};

pub type ExpenseId = i64;

/// A single recorded living expense. Expenses are immutable once recorded;
/// mistakes are corrected by deleting and re-adding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    /// What the money was spent on (e.g., "Food", "Transport")
    pub product_name: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// When the expense occurred
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl Expense {
    /// Create a new expense. The id is assigned by the repository.
    pub fn new(user_id: UserId, product_name: String, amount_cents: Cents, date: NaiveDate) -> Self {
        assert!(amount_cents > 0, "Expense amount must be positive");
        Self {
            id: 0,
            user_id,
            product_name,
            amount_cents,
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
