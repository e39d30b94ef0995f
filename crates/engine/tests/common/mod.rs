#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, Identity, Money, RegisterCmd, TransactionData, TransactionKind};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .bcrypt_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register_and_login(engine: &Engine, username: &str) -> Identity {
    engine
        .register(RegisterCmd {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct horse".to_string(),
            ..RegisterCmd::default()
        })
        .await
        .unwrap();
    let session = engine.login(username, "correct horse").await.unwrap();
    engine.resolve_identity(&session.token).await.unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

pub fn expense(amount: &str, on: NaiveDate) -> TransactionData {
    TransactionData {
        amount: money(amount),
        kind: TransactionKind::Expense,
        date: on,
        description: None,
    }
}

pub fn income(amount: &str, on: NaiveDate) -> TransactionData {
    TransactionData {
        amount: money(amount),
        kind: TransactionKind::Income,
        date: on,
        description: None,
    }
}
