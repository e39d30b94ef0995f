use chrono::TimeDelta;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{EngineError, ResultEngine, password};

mod access;
mod budgets;
mod categories;
mod reports;
mod sessions;
mod transactions;
mod users;

pub use access::{Access, can_access};
pub use transactions::TransactionFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

const DEFAULT_SESSION_HOURS: i64 = 24;
const MAX_SESSION_DAYS: i64 = 365;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    session_ttl: TimeDelta,
    bcrypt_cost: u32,
    /// Verified against when a login names an unknown user.
    dummy_hash: String,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Map a storage unique-index violation to the engine's duplicate kind.
///
/// The pre-checks run in the same transaction, so reaching this means a
/// concurrent writer won the race.
fn map_unique_violation(err: DbErr, conflict: impl FnOnce() -> EngineError) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(%detail, "unique index rejected write");
            conflict()
        }
        _ => EngineError::Database(err),
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    session_ttl: Option<TimeDelta>,
    bcrypt_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            session_ttl: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// How long a login session stays valid. Defaults to 24 hours, at most
    /// 365 days.
    pub fn session_ttl(mut self, ttl: TimeDelta) -> EngineBuilder {
        self.session_ttl = Some(ttl);
        self
    }

    /// bcrypt work factor for new password hashes.
    pub fn bcrypt_cost(mut self, cost: u32) -> EngineBuilder {
        self.bcrypt_cost = cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let session_ttl = match self.session_ttl {
            Some(ttl) => ttl,
            None => TimeDelta::try_hours(DEFAULT_SESSION_HOURS).ok_or_else(|| {
                EngineError::InvariantViolation("default session ttl out of range".to_string())
            })?,
        };
        if session_ttl <= TimeDelta::zero() {
            return Err(EngineError::Validation(
                "session ttl must be positive".to_string(),
            ));
        }
        let max_ttl = TimeDelta::try_days(MAX_SESSION_DAYS).ok_or_else(|| {
            EngineError::InvariantViolation("max session ttl out of range".to_string())
        })?;
        if session_ttl > max_ttl {
            return Err(EngineError::Validation(format!(
                "session ttl must be at most {MAX_SESSION_DAYS} days"
            )));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(EngineError::Validation(format!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            )));
        }
        let dummy_hash = password::dummy_hash(self.bcrypt_cost).await?;
        Ok(Engine {
            database: self.database,
            session_ttl,
            bcrypt_cost: self.bcrypt_cost,
            dummy_hash,
        })
    }
}
