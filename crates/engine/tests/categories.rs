mod common;

use uuid::Uuid;

use common::{date, engine_with_db, expense, register_and_login};
use engine::{BudgetData, EngineError, TransactionFilter};

#[tokio::test]
async fn list_shows_own_and_global_only() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;

    engine.create_global_category("Salary").await.unwrap();
    engine.create_category(&alice, "Groceries").await.unwrap();
    engine.create_category(&bob, "Hobbies").await.unwrap();

    let names: Vec<String> = engine
        .list_categories(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Groceries".to_string(), "Salary".to_string()]);
}

#[tokio::test]
async fn duplicate_names_are_per_owner() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;

    let created = engine.create_category(&alice, "  Food ").await.unwrap();
    assert_eq!(created.name, "Food");
    assert_eq!(created.owner, Some(alice.user_id));

    let err = engine.create_category(&alice, "Food").await.unwrap_err();
    assert_eq!(err, EngineError::DuplicateName("Food".to_string()));

    engine.create_category(&bob, "Food").await.unwrap();

    let err = engine.create_category(&alice, "   ").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn global_names_are_unique_and_seeding_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let first = engine.ensure_global_category("Rent").await.unwrap();
    let again = engine.ensure_global_category("Rent").await.unwrap();
    assert_eq!(first, again);
    assert!(first.is_global());

    let err = engine.create_global_category("Rent").await.unwrap_err();
    assert!(matches!(err, EngineError::DuplicateName(_)));

    // a personal category may shadow a global name
    let alice = register_and_login(&engine, "alice").await;
    engine.create_category(&alice, "Rent").await.unwrap();
}

#[tokio::test]
async fn rename_rules() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;

    let food = engine.create_category(&alice, "Food").await.unwrap();
    engine.create_category(&alice, "Travel").await.unwrap();

    let renamed = engine
        .update_category(&alice, food.id, "Groceries")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Groceries");

    // renaming to its own name twice is fine
    engine
        .update_category(&alice, food.id, "Groceries")
        .await
        .unwrap();
    engine
        .update_category(&alice, food.id, "Groceries")
        .await
        .unwrap();

    let err = engine
        .update_category(&alice, food.id, "Travel")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateName(_)));

    let err = engine
        .update_category(&bob, food.id, "Mine now")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .update_category(&alice, Uuid::new_v4(), "Ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn global_categories_cannot_be_changed_by_users() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let salary = engine.create_global_category("Salary").await.unwrap();

    let err = engine
        .update_category(&alice, salary.id, "Mine")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_category(&alice, salary.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn delete_detaches_transactions_and_drops_budgets() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;

    let food = engine.create_category(&alice, "Food").await.unwrap();
    let tx = engine
        .create_transaction(&alice, expense("12.50", date(2024, 1, 5)), Some(food.id))
        .await
        .unwrap();
    engine
        .create_budget(
            &alice,
            BudgetData {
                amount: common::money("100"),
                month: 1,
                year: 2024,
            },
            food.id,
        )
        .await
        .unwrap();

    let err = engine.delete_category(&bob, food.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_category(&alice, food.id).await.unwrap();

    let kept = engine.get_transaction(&alice, tx.id).await.unwrap();
    assert_eq!(kept.category_id, None);
    assert_eq!(kept.category_name, None);
    assert!(
        engine
            .list_budgets(&alice, 1, 2024)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        engine
            .list_transactions(&alice, &TransactionFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );

    let err = engine.delete_category(&alice, food.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
