use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No profile set up for this user")]
    ProfileNotFound,

    #[error("A savings goal for this asset already exists: {0}")]
    DuplicateAsset(String),

    #[error("No savings goal found for asset: {0}")]
    AssetNotFound(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("No emergency fund set up")]
    EmergencyFundNotFound,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
