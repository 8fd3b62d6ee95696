mod common;

use anyhow::Result;
use common::{parse_date, signup, test_service};
use finflow::application::AppError;

#[tokio::test]
async fn test_total_equals_sum_of_amounts() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    service
        .add_expense(user, "Food".into(), 30000, parse_date("2024-03-01"), None)
        .await?;
    service
        .add_expense(
            user,
            "Transport".into(),
            15000,
            parse_date("2024-03-02"),
            None,
        )
        .await?;
    service
        .add_expense(user, "Food".into(), 20000, parse_date("2024-03-05"), None)
        .await?;

    assert_eq!(service.total_expenses(user).await?, 65000);

    Ok(())
}

#[tokio::test]
async fn test_total_is_zero_without_expenses() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    // Absence of rows is a defined zero case, not an error
    assert_eq!(service.total_expenses(user).await?, 0);
    assert!(service.expenses_by_product(user).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_removing_expense_removes_exactly_its_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    let food = service
        .add_expense(user, "Food".into(), 30000, parse_date("2024-03-01"), None)
        .await?;
    service
        .add_expense(
            user,
            "Transport".into(),
            15000,
            parse_date("2024-03-02"),
            None,
        )
        .await?;
    assert_eq!(service.total_expenses(user).await?, 45000);

    let removed = service.remove_expense(user, food.id).await?;
    assert_eq!(removed.amount_cents, 30000);
    assert_eq!(service.total_expenses(user).await?, 15000);
    assert_eq!(service.list_expenses(user).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_remove_unknown_expense_fails() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    let err = service.remove_expense(user, 999).await.unwrap_err();
    assert!(matches!(err, AppError::ExpenseNotFound(999)));

    Ok(())
}

#[tokio::test]
async fn test_cannot_remove_another_users_expense() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = signup(&service, "alice").await?;
    let bob = signup(&service, "bob").await?;

    let expense = service
        .add_expense(alice, "Food".into(), 30000, parse_date("2024-03-01"), None)
        .await?;

    let err = service.remove_expense(bob, expense.id).await.unwrap_err();
    assert!(matches!(err, AppError::ExpenseNotFound(_)));
    assert_eq!(service.total_expenses(alice).await?, 30000);

    Ok(())
}

#[tokio::test]
async fn test_expense_amount_must_be_positive() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    let err = service
        .add_expense(user, "Food".into(), 0, parse_date("2024-03-01"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    let err = service
        .add_expense(user, "Food".into(), -100, parse_date("2024-03-01"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));

    Ok(())
}

#[tokio::test]
async fn test_expenses_are_scoped_per_user() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = signup(&service, "alice").await?;
    let bob = signup(&service, "bob").await?;

    service
        .add_expense(alice, "Food".into(), 30000, parse_date("2024-03-01"), None)
        .await?;
    service
        .add_expense(bob, "Rent".into(), 80000, parse_date("2024-03-01"), None)
        .await?;

    assert_eq!(service.total_expenses(alice).await?, 30000);
    assert_eq!(service.total_expenses(bob).await?, 80000);

    Ok(())
}

#[tokio::test]
async fn test_expense_notes_round_trip() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = signup(&service, "alice").await?;

    service
        .add_expense(
            user,
            "Food".into(),
            30000,
            parse_date("2024-03-01"),
            Some("team lunch".into()),
        )
        .await?;

    let expenses = service.list_expenses(user).await?;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].notes.as_deref(), Some("team lunch"));

    Ok(())
}
