use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Cents;

pub type UserId = i64;

/// A registered account. Credentials are stored as a SHA-256 hex digest,
/// never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account record. The id is assigned by the repository.
    pub fn new(username: String, password: &str) -> Self {
        Self {
            id: 0,
            username,
            password_hash: hash_password(password),
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }
}

/// Hash a password for storage or comparison.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Per-user profile: one row per user, keyed by user id. The bank balance is
/// a manually entered value, not derived from the expense ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub age: i64,
    pub occupation: String,
    pub bank_balance_cents: Cents,
}

impl Profile {
    pub fn new(user_id: UserId, age: i64, occupation: String, bank_balance_cents: Cents) -> Self {
        Self {
            user_id,
            age,
            occupation,
            bank_balance_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_hashed() {
        let user = User::new("alice".into(), "hunter2");
        assert_ne!(user.password_hash, "hunter2");
        assert_eq!(user.password_hash.len(), 64); // SHA-256 hex
    }

    #[test]
    fn test_verify_password() {
        let user = User::new("alice".into(), "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("Hunter2"));
        assert!(!user.verify_password(""));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_password("secret"), hash_password("secret"));
        assert_ne!(hash_password("secret"), hash_password("secrets"));
    }
}
