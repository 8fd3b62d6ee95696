use serde::{Deserialize, Serialize};

use super::{Cents, UserId};

pub type SavingsGoalId = i64;

/// A savings plan towards an asset. `asset_name` is unique within a user's
/// goals. `monthly_savings_cents` is the committed contribution per month,
/// independent of the asset's total worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: SavingsGoalId,
    pub user_id: UserId,
    pub asset_name: String,
    pub total_worth_cents: Cents,
    pub monthly_savings_cents: Cents,
}

impl SavingsGoal {
    /// Create a new savings goal. The id is assigned by the repository.
    pub fn new(
        user_id: UserId,
        asset_name: String,
        total_worth_cents: Cents,
        monthly_savings_cents: Cents,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            asset_name,
            total_worth_cents,
            monthly_savings_cents,
        }
    }

    /// Whole months until the goal is reached at the committed monthly rate.
    pub fn months_to_goal(&self) -> Option<i64> {
        months_to_goal(self.total_worth_cents, self.monthly_savings_cents)
    }
}

/// Floor of `total_worth / monthly_savings`. Undefined (None) when the
/// monthly contribution is zero: no projection is possible with nothing
/// being saved. The undefined case is an absent value, not an error;
/// callers simply omit the projection when it is None.
pub fn months_to_goal(total_worth_cents: Cents, monthly_savings_cents: Cents) -> Option<i64> {
    if monthly_savings_cents > 0 {
        Some(total_worth_cents / monthly_savings_cents)
    } else {
        None
    }
}

/// The single per-user emergency fund commitment, maintained as an upsert:
/// at most one row per user exists at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub user_id: UserId,
    pub monthly_savings_cents: Cents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_to_goal() {
        // 1200.00 saved at 100.00/month -> 12 months
        assert_eq!(months_to_goal(120000, 10000), Some(12));
    }

    #[test]
    fn test_months_to_goal_floors() {
        assert_eq!(months_to_goal(125000, 20000), Some(6));
    }

    #[test]
    fn test_months_to_goal_undefined_for_zero_contribution() {
        assert_eq!(months_to_goal(10000, 0), None);
    }

    #[test]
    fn test_goal_projection() {
        let goal = SavingsGoal::new(1, "Laptop".into(), 120000, 10000);
        assert_eq!(goal.months_to_goal(), Some(12));

        let stalled = SavingsGoal::new(1, "Car".into(), 500000, 0);
        assert_eq!(stalled.months_to_goal(), None);
    }
}
