use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sqlx::{Row, SqlitePool};

use crate::domain::{
    Cents, EmergencyFund, Expense, ExpenseId, Profile, SavingsGoal, User, UserId,
};

use super::MIGRATION_001_INITIAL;

/// Per-product expense total, as aggregated in SQL.
#[derive(Debug, Clone)]
pub struct ProductTotal {
    pub product_name: String,
    pub total_cents: Cents,
    pub count: i64,
}

/// Repository for persisting and querying users, expenses, savings goals and
/// the emergency fund.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        debug!("connected to {database_url}");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        debug!("schema migrated");
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user and return the assigned id.
    pub async fn insert_user(&self, user: &mut User) -> Result<UserId> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;

        user.id = result.last_insert_rowid();
        Ok(user.id)
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    // ========================
    // Profile operations
    // ========================

    /// Save a user's profile, replacing any existing row for that user.
    pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, age, occupation, bank_balance_cents)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                age = excluded.age,
                occupation = excluded.occupation,
                bank_balance_cents = excluded.bank_balance_cents
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.age)
        .bind(&profile.occupation)
        .bind(profile.bank_balance_cents)
        .execute(&self.pool)
        .await
        .context("Failed to save profile")?;
        Ok(())
    }

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, age, occupation, bank_balance_cents
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch profile")?;

        Ok(row.map(|row| Profile {
            user_id: row.get("user_id"),
            age: row.get("age"),
            occupation: row.get("occupation"),
            bank_balance_cents: row.get("bank_balance_cents"),
        }))
    }

    // ========================
    // Expense operations
    // ========================

    /// Save a new expense. Assigns the generated id.
    pub async fn insert_expense(&self, expense: &mut Expense) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (user_id, product_name, amount_cents, date, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.user_id)
        .bind(&expense.product_name)
        .bind(expense.amount_cents)
        .bind(expense.date.format("%Y-%m-%d").to_string())
        .bind(&expense.notes)
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;

        expense.id = result.last_insert_rowid();
        Ok(())
    }

    /// Get a single expense owned by the given user.
    pub async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, product_name, amount_cents, date, notes
            FROM expenses
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_expense(&row)?)),
            None => Ok(None),
        }
    }

    /// List all expenses for a user, oldest first.
    pub async fn list_expenses(&self, user_id: UserId) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, product_name, amount_cents, date, notes
            FROM expenses
            WHERE user_id = ?
            ORDER BY date, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Delete an expense owned by the given user. Returns the number of rows
    /// removed (0 when the id did not exist for that user).
    pub async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;
        Ok(result.rows_affected())
    }

    /// Sum of all expense amounts for a user. 0 when there are no rows.
    pub async fn total_expenses(&self, user_id: UserId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) as total
            FROM expenses
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute total expenses")?;

        Ok(row.get("total"))
    }

    /// Group expenses by product and sum amounts, largest total first.
    /// This drives the bar/pie spending breakdowns.
    pub async fn expenses_by_product(&self, user_id: UserId) -> Result<Vec<ProductTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT product_name, SUM(amount_cents) as total, COUNT(*) as count
            FROM expenses
            WHERE user_id = ?
            GROUP BY product_name
            ORDER BY total DESC, product_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to group expenses by product")?;

        Ok(rows
            .iter()
            .map(|row| ProductTotal {
                product_name: row.get("product_name"),
                total_cents: row.get("total"),
                count: row.get("count"),
            })
            .collect())
    }

    // ========================
    // Savings goal operations
    // ========================

    /// Save a new savings goal. Assigns the generated id.
    pub async fn insert_savings_goal(&self, goal: &mut SavingsGoal) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO savings_goals (user_id, asset_name, total_worth_cents, monthly_savings_cents)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(goal.user_id)
        .bind(&goal.asset_name)
        .bind(goal.total_worth_cents)
        .bind(goal.monthly_savings_cents)
        .execute(&self.pool)
        .await
        .context("Failed to save savings goal")?;

        goal.id = result.last_insert_rowid();
        Ok(())
    }

    /// Get a savings goal by its per-user asset name.
    pub async fn get_savings_goal(
        &self,
        user_id: UserId,
        asset_name: &str,
    ) -> Result<Option<SavingsGoal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, asset_name, total_worth_cents, monthly_savings_cents
            FROM savings_goals
            WHERE user_id = ? AND asset_name = ?
            "#,
        )
        .bind(user_id)
        .bind(asset_name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch savings goal")?;

        Ok(row.map(|row| Self::row_to_goal(&row)))
    }

    /// List all savings goals for a user, ordered by asset name.
    pub async fn list_savings_goals(&self, user_id: UserId) -> Result<Vec<SavingsGoal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, asset_name, total_worth_cents, monthly_savings_cents
            FROM savings_goals
            WHERE user_id = ?
            ORDER BY asset_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list savings goals")?;

        Ok(rows.iter().map(Self::row_to_goal).collect())
    }

    /// Delete a savings goal by `(user_id, asset_name)`. Returns the number of
    /// rows removed.
    pub async fn delete_savings_goal(&self, user_id: UserId, asset_name: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM savings_goals WHERE user_id = ? AND asset_name = ?")
            .bind(user_id)
            .bind(asset_name)
            .execute(&self.pool)
            .await
            .context("Failed to delete savings goal")?;
        Ok(result.rows_affected())
    }

    /// Sum of the *monthly* savings commitments across a user's goals.
    /// Intentionally sums `monthly_savings_cents`, not `total_worth_cents`.
    pub async fn total_savings_commitment(&self, user_id: UserId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(monthly_savings_cents), 0) as total
            FROM savings_goals
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute savings commitment")?;

        Ok(row.get("total"))
    }

    // ========================
    // Emergency fund operations
    // ========================

    /// Get a user's emergency fund row, if set up.
    pub async fn get_emergency_fund(&self, user_id: UserId) -> Result<Option<EmergencyFund>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, monthly_savings_cents
            FROM emergency_fund
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch emergency fund")?;

        Ok(row.map(|row| EmergencyFund {
            user_id: row.get("user_id"),
            monthly_savings_cents: row.get("monthly_savings_cents"),
        }))
    }

    /// Insert or update the single emergency fund row for a user. A single
    /// conditional write, so two concurrent set-ups cannot produce two rows.
    pub async fn upsert_emergency_fund(
        &self,
        user_id: UserId,
        monthly_savings_cents: Cents,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO emergency_fund (user_id, monthly_savings_cents)
            VALUES (?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                monthly_savings_cents = excluded.monthly_savings_cents
            "#,
        )
        .bind(user_id)
        .bind(monthly_savings_cents)
        .execute(&self.pool)
        .await
        .context("Failed to upsert emergency fund")?;
        Ok(())
    }

    /// Delete a user's emergency fund row. Returns the number of rows removed.
    pub async fn delete_emergency_fund(&self, user_id: UserId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM emergency_fund WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete emergency fund")?;
        Ok(result.rows_affected())
    }

    /// The user's emergency fund commitment, 0 when not set up.
    pub async fn total_emergency_commitment(&self, user_id: UserId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(monthly_savings_cents), 0) as total
            FROM emergency_fund
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute emergency commitment")?;

        Ok(row.get("total"))
    }

    // ========================
    // Row mapping
    // ========================

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let created_at_str: String = row.get("created_at");

        Ok(User {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let date_str: String = row.get("date");

        Ok(Expense {
            id: row.get("id"),
            user_id: row.get("user_id"),
            product_name: row.get("product_name"),
            amount_cents: row.get("amount_cents"),
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid expense date")?,
            notes: row.get("notes"),
        })
    }

    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> SavingsGoal {
        SavingsGoal {
            id: row.get("id"),
            user_id: row.get("user_id"),
            asset_name: row.get("asset_name"),
            total_worth_cents: row.get("total_worth_cents"),
            monthly_savings_cents: row.get("monthly_savings_cents"),
        }
    }
}
