use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Fixed peer benchmark for monthly spending (2000.00 in stored currency
/// units). A static reference value, not derived from any data.
pub const PEER_BENCHMARK_CENTS: Cents = 200_000;

/// Total spend for one product, used to drive bar/pie style breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpend {
    pub product_name: String,
    pub total_cents: Cents,
    pub count: i64,
}

/// Read-side spending summary for one user against a supplied bank balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub bank_balance_cents: Cents,
    pub total_expenses_cents: Cents,
    /// Sum of monthly savings commitments across all goals
    pub total_savings_cents: Cents,
    /// Monthly emergency fund commitment, 0 when not set up
    pub total_emergency_cents: Cents,
    pub available_balance_cents: Cents,
    pub by_product: Vec<ProductSpend>,
}

/// Bank balance minus expenses, savings and emergency commitments.
/// A negative result signals overspending and is never clamped.
pub fn available_balance(
    bank_balance: Cents,
    total_expenses: Cents,
    total_savings: Cents,
    total_emergency: Cents,
) -> Cents {
    bank_balance - total_expenses - total_savings - total_emergency
}

/// How a user's total spending compares to the fixed peer benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkVerdict {
    Above,
    Below,
    /// Spending exactly matches the benchmark. Renders no message, matching
    /// the silent equal branch of the original comparison.
    AtBenchmark,
}

impl BenchmarkVerdict {
    pub fn classify(total_expenses: Cents) -> Self {
        if total_expenses > PEER_BENCHMARK_CENTS {
            BenchmarkVerdict::Above
        } else if total_expenses < PEER_BENCHMARK_CENTS {
            BenchmarkVerdict::Below
        } else {
            BenchmarkVerdict::AtBenchmark
        }
    }

    /// The advisory message shown to the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            BenchmarkVerdict::Above => {
                Some("Your expenses are higher than other students. Spend cautiously!")
            }
            BenchmarkVerdict::Below => {
                Some("Great job! Your expenses are lower than the other students. Keep it up!")
            }
            BenchmarkVerdict::AtBenchmark => None,
        }
    }
}
