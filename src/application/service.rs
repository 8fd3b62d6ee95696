use chrono::NaiveDate;
use log::debug;

use crate::domain::{
    Cents, EmergencyFund, Expense, ExpenseId, Profile, SavingsGoal, User, UserId,
};
use crate::storage::Repository;

use super::reporting::{available_balance, ProductSpend, SpendingSummary};
use super::AppError;

/// Application service providing high-level operations over the ledger store.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
/// Every operation takes the acting user explicitly; there is no ambient
/// current-user state.
pub struct FinanceService {
    repo: Repository,
}

impl FinanceService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Account operations
    // ========================

    /// Register a new user. Fails if the username is already taken.
    pub async fn sign_up(&self, username: String, password: &str) -> Result<User, AppError> {
        if self.repo.get_user_by_username(&username).await?.is_some() {
            return Err(AppError::DuplicateUsername(username));
        }

        let mut user = User::new(username, password);
        self.repo.insert_user(&mut user).await?;
        debug!("registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Exact-match credential check. Returns the user id on success.
    /// A missing user and a wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserId, AppError> {
        let user = self
            .repo
            .get_user_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.verify_password(password) {
            Ok(user.id)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Resolve a username to its user id.
    pub async fn get_user(&self, username: &str) -> Result<User, AppError> {
        self.repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    // ========================
    // Profile operations
    // ========================

    /// Save (or replace) the user's profile.
    pub async fn save_profile(
        &self,
        user_id: UserId,
        age: i64,
        occupation: String,
        bank_balance_cents: Cents,
    ) -> Result<Profile, AppError> {
        if bank_balance_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Bank balance cannot be negative".to_string(),
            ));
        }

        let profile = Profile::new(user_id, age, occupation, bank_balance_cents);
        self.repo.save_profile(&profile).await?;
        Ok(profile)
    }

    /// Get the user's profile.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Profile, AppError> {
        self.repo
            .get_profile(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense.
    pub async fn add_expense(
        &self,
        user_id: UserId,
        product_name: String,
        amount_cents: Cents,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Expense, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Expense amount must be positive".to_string(),
            ));
        }

        let mut expense = Expense::new(user_id, product_name, amount_cents, date);
        if let Some(notes) = notes {
            expense = expense.with_notes(notes);
        }

        self.repo.insert_expense(&mut expense).await?;
        debug!("expense {} recorded for user {user_id}", expense.id);
        Ok(expense)
    }

    /// List all expenses for a user, oldest first.
    pub async fn list_expenses(&self, user_id: UserId) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses(user_id).await?)
    }

    /// Remove an expense by id. Returns the removed expense.
    pub async fn remove_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<Expense, AppError> {
        let expense = self
            .repo
            .get_expense(user_id, id)
            .await?
            .ok_or(AppError::ExpenseNotFound(id))?;

        self.repo.delete_expense(user_id, id).await?;
        Ok(expense)
    }

    // ========================
    // Savings goal operations
    // ========================

    /// Create a new savings goal. Fails if the user already has a goal for
    /// this asset name.
    pub async fn add_savings_goal(
        &self,
        user_id: UserId,
        asset_name: String,
        total_worth_cents: Cents,
        monthly_savings_cents: Cents,
    ) -> Result<SavingsGoal, AppError> {
        if total_worth_cents < 0 || monthly_savings_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Savings amounts cannot be negative".to_string(),
            ));
        }

        if self
            .repo
            .get_savings_goal(user_id, &asset_name)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateAsset(asset_name));
        }

        let mut goal = SavingsGoal::new(
            user_id,
            asset_name,
            total_worth_cents,
            monthly_savings_cents,
        );
        self.repo.insert_savings_goal(&mut goal).await?;
        Ok(goal)
    }

    /// List all savings goals for a user.
    pub async fn list_savings_goals(&self, user_id: UserId) -> Result<Vec<SavingsGoal>, AppError> {
        Ok(self.repo.list_savings_goals(user_id).await?)
    }

    /// Remove a savings goal by asset name. Returns the removed goal.
    pub async fn remove_savings_goal(
        &self,
        user_id: UserId,
        asset_name: &str,
    ) -> Result<SavingsGoal, AppError> {
        let goal = self
            .repo
            .get_savings_goal(user_id, asset_name)
            .await?
            .ok_or_else(|| AppError::AssetNotFound(asset_name.to_string()))?;

        self.repo.delete_savings_goal(user_id, asset_name).await?;
        Ok(goal)
    }

    // ========================
    // Emergency fund operations
    // ========================

    /// Set up or update the user's emergency fund. Upsert: after any sequence
    /// of calls exactly one row exists, holding the latest value.
    pub async fn set_emergency_fund(
        &self,
        user_id: UserId,
        monthly_savings_cents: Cents,
    ) -> Result<EmergencyFund, AppError> {
        if monthly_savings_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Emergency fund contribution cannot be negative".to_string(),
            ));
        }

        self.repo
            .upsert_emergency_fund(user_id, monthly_savings_cents)
            .await?;

        Ok(EmergencyFund {
            user_id,
            monthly_savings_cents,
        })
    }

    /// Get the user's emergency fund, if set up.
    pub async fn get_emergency_fund(
        &self,
        user_id: UserId,
    ) -> Result<Option<EmergencyFund>, AppError> {
        Ok(self.repo.get_emergency_fund(user_id).await?)
    }

    /// Remove the user's emergency fund. Returns the removed row.
    pub async fn remove_emergency_fund(&self, user_id: UserId) -> Result<EmergencyFund, AppError> {
        let fund = self
            .repo
            .get_emergency_fund(user_id)
            .await?
            .ok_or(AppError::EmergencyFundNotFound)?;

        self.repo.delete_emergency_fund(user_id).await?;
        Ok(fund)
    }

    // ========================
    // Aggregation
    // ========================

    /// Sum of all expense amounts for a user. 0 when there are none.
    pub async fn total_expenses(&self, user_id: UserId) -> Result<Cents, AppError> {
        Ok(self.repo.total_expenses(user_id).await?)
    }

    /// Per-product expense totals, largest first.
    pub async fn expenses_by_product(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ProductSpend>, AppError> {
        let totals = self.repo.expenses_by_product(user_id).await?;
        Ok(totals
            .into_iter()
            .map(|t| ProductSpend {
                product_name: t.product_name,
                total_cents: t.total_cents,
                count: t.count,
            })
            .collect())
    }

    /// Sum of monthly savings commitments across the user's goals.
    pub async fn total_savings_commitment(&self, user_id: UserId) -> Result<Cents, AppError> {
        Ok(self.repo.total_savings_commitment(user_id).await?)
    }

    /// The user's emergency fund commitment, 0 when not set up.
    pub async fn total_emergency_commitment(&self, user_id: UserId) -> Result<Cents, AppError> {
        Ok(self.repo.total_emergency_commitment(user_id).await?)
    }

    /// Full spending summary for a user against a supplied bank balance.
    pub async fn spending_summary(
        &self,
        user_id: UserId,
        bank_balance_cents: Cents,
    ) -> Result<SpendingSummary, AppError> {
        let total_expenses = self.repo.total_expenses(user_id).await?;
        let total_savings = self.repo.total_savings_commitment(user_id).await?;
        let total_emergency = self.repo.total_emergency_commitment(user_id).await?;
        let by_product = self.expenses_by_product(user_id).await?;

        Ok(SpendingSummary {
            bank_balance_cents,
            total_expenses_cents: total_expenses,
            total_savings_cents: total_savings,
            total_emergency_cents: total_emergency,
            available_balance_cents: available_balance(
                bank_balance_cents,
                total_expenses,
                total_savings,
                total_emergency,
            ),
            by_product,
        })
    }
}
