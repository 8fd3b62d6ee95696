mod common;

use anyhow::Result;
use common::test_service;
use finflow::application::AppError;

#[tokio::test]
async fn test_signup_and_login() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let user = service.sign_up("alice".into(), "hunter2").await?;
    assert_eq!(user.username, "alice");
    assert!(user.id > 0);

    let user_id = service.authenticate("alice", "hunter2").await?;
    assert_eq!(user_id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.sign_up("alice".into(), "hunter2").await?;
    let err = service.sign_up("alice".into(), "other").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername(_)));

    Ok(())
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.sign_up("alice".into(), "hunter2").await?;
    let err = service.authenticate("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    Ok(())
}

#[tokio::test]
async fn test_login_with_unknown_user_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.authenticate("nobody", "hunter2").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    Ok(())
}

#[tokio::test]
async fn test_passwords_are_not_stored_in_plaintext() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.sign_up("alice".into(), "hunter2").await?;
    let user = service.get_user("alice").await?;
    assert_ne!(user.password_hash, "hunter2");

    Ok(())
}

#[tokio::test]
async fn test_profile_save_and_get() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let user = service.sign_up("alice".into(), "hunter2").await?;
    service
        .save_profile(user.id, 22, "Student".into(), 1_500_000)
        .await?;

    let profile = service.get_profile(user.id).await?;
    assert_eq!(profile.age, 22);
    assert_eq!(profile.occupation, "Student");
    assert_eq!(profile.bank_balance_cents, 1_500_000);

    Ok(())
}

#[tokio::test]
async fn test_profile_is_one_row_per_user() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let user = service.sign_up("alice".into(), "hunter2").await?;
    service
        .save_profile(user.id, 22, "Student".into(), 1_500_000)
        .await?;
    // Saving again replaces the profile instead of adding a second row
    service
        .save_profile(user.id, 23, "Engineer".into(), 2_000_000)
        .await?;

    let profile = service.get_profile(user.id).await?;
    assert_eq!(profile.age, 23);
    assert_eq!(profile.occupation, "Engineer");
    assert_eq!(profile.bank_balance_cents, 2_000_000);

    Ok(())
}

#[tokio::test]
async fn test_profile_missing_is_reported() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let user = service.sign_up("alice".into(), "hunter2").await?;
    let err = service.get_profile(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::ProfileNotFound));

    Ok(())
}
