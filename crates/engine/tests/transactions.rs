mod common;

use uuid::Uuid;

use common::{date, engine_with_db, expense, income, money, register_and_login};
use engine::{EngineError, TransactionData, TransactionFilter, TransactionKind};

#[tokio::test]
async fn create_and_get_with_category() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let food = engine.create_category(&alice, "Food").await.unwrap();

    let created = engine
        .create_transaction(
            &alice,
            TransactionData {
                description: Some("  weekly shop  ".to_string()),
                ..expense("42.10", date(2024, 2, 3))
            },
            Some(food.id),
        )
        .await
        .unwrap();
    assert_eq!(created.owner, alice.user_id);
    assert_eq!(created.category_name.as_deref(), Some("Food"));
    assert_eq!(created.description.as_deref(), Some("weekly shop"));

    let fetched = engine.get_transaction(&alice, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn amount_must_be_positive() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;

    for amount in ["0", "-5.00"] {
        let err = engine
            .create_transaction(&alice, expense(amount, date(2024, 1, 1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn category_must_be_visible() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;
    let bobs = engine.create_category(&bob, "Secret").await.unwrap();
    let global = engine.create_global_category("Salary").await.unwrap();

    let err = engine
        .create_transaction(&alice, income("10", date(2024, 1, 1)), Some(bobs.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .create_transaction(&alice, income("10", date(2024, 1, 1)), Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CategoryNotFound(_)));

    let ok = engine
        .create_transaction(&alice, income("10", date(2024, 1, 1)), Some(global.id))
        .await
        .unwrap();
    assert_eq!(ok.category_name.as_deref(), Some("Salary"));
}

#[tokio::test]
async fn other_users_transactions_are_invisible() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let bob = register_and_login(&engine, "bob").await;

    let tx = engine
        .create_transaction(&alice, expense("5", date(2024, 1, 1)), None)
        .await
        .unwrap();

    assert!(matches!(
        engine.get_transaction(&bob, tx.id).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine
            .update_transaction(&bob, tx.id, expense("1", date(2024, 1, 1)), None)
            .await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction(&bob, tx.id).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(
        engine
            .list_transactions(&bob, &TransactionFilter::default())
            .await
            .unwrap()
            .is_empty()
    );

    // still there for alice
    engine.get_transaction(&alice, tx.id).await.unwrap();
}

#[tokio::test]
async fn filters_are_conjunctive_and_inclusive() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let food = engine.create_category(&alice, "Food").await.unwrap();

    engine
        .create_transaction(&alice, expense("1", date(2024, 1, 1)), Some(food.id))
        .await
        .unwrap();
    engine
        .create_transaction(&alice, expense("2", date(2024, 1, 31)), None)
        .await
        .unwrap();
    engine
        .create_transaction(&alice, income("3", date(2024, 1, 15)), Some(food.id))
        .await
        .unwrap();
    engine
        .create_transaction(&alice, expense("4", date(2024, 2, 1)), Some(food.id))
        .await
        .unwrap();

    let january = TransactionFilter {
        from: Some(date(2024, 1, 1)),
        to: Some(date(2024, 1, 31)),
        ..TransactionFilter::default()
    };
    let all_jan = engine.list_transactions(&alice, &january).await.unwrap();
    assert_eq!(all_jan.len(), 3);
    // newest first
    assert_eq!(all_jan[0].date, date(2024, 1, 31));

    let food_expenses = engine
        .list_transactions(
            &alice,
            &TransactionFilter {
                category_id: Some(food.id),
                kind: Some(TransactionKind::Expense),
                ..january.clone()
            },
        )
        .await
        .unwrap();
    assert_eq!(food_expenses.len(), 1);
    assert_eq!(food_expenses[0].amount, money("1"));

    let err = engine
        .list_transactions(
            &alice,
            &TransactionFilter {
                from: Some(date(2024, 2, 1)),
                to: Some(date(2024, 1, 1)),
                ..TransactionFilter::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn update_replaces_fields_and_can_clear_category() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;
    let food = engine.create_category(&alice, "Food").await.unwrap();
    let tx = engine
        .create_transaction(&alice, expense("9.99", date(2024, 3, 1)), Some(food.id))
        .await
        .unwrap();

    let data = TransactionData {
        description: Some("refund".to_string()),
        ..income("20", date(2024, 3, 2))
    };
    let first = engine
        .update_transaction(&alice, tx.id, data.clone(), None)
        .await
        .unwrap();
    let second = engine
        .update_transaction(&alice, tx.id, data, None)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(second.kind, TransactionKind::Income);
    assert_eq!(second.amount, money("20"));
    assert_eq!(second.category_id, None);

    let err = engine
        .update_transaction(&alice, tx.id, expense("0", date(2024, 3, 2)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn delete_and_recent() {
    let (engine, _db) = engine_with_db().await;
    let alice = register_and_login(&engine, "alice").await;

    let mut ids = Vec::new();
    for day in 1..=5 {
        let tx = engine
            .create_transaction(&alice, expense("1", date(2024, 4, day)), None)
            .await
            .unwrap();
        ids.push(tx.id);
    }

    let recent = engine.recent_transactions(&alice, 2).await.unwrap();
    assert_eq!(
        recent.iter().map(|t| t.date).collect::<Vec<_>>(),
        vec![date(2024, 4, 5), date(2024, 4, 4)]
    );
    assert!(engine.recent_transactions(&alice, 0).await.unwrap().is_empty());

    engine.delete_transaction(&alice, ids[4]).await.unwrap();
    assert!(matches!(
        engine.get_transaction(&alice, ids[4]).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction(&alice, ids[4]).await,
        Err(EngineError::NotFound(_))
    ));
    let recent = engine.recent_transactions(&alice, 10).await.unwrap();
    assert_eq!(recent.len(), 4);
}
