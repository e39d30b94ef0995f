//! Ownership-scoped data access and aggregation for the Ledgerly finance
//! tracker.
//!
//! Every operation on [`Engine`] except registration, login and token
//! resolution takes the caller's [`Identity`] explicitly and only ever sees
//! or changes records that identity owns (plus global categories, read only).

pub use budgets::{Budget, BudgetData, BudgetStatus};
pub use categories::Category;
pub use error::EngineError;
pub use identity::Identity;
pub use money::Money;
pub use ops::{Access, Engine, EngineBuilder, TransactionFilter, can_access};
pub use reports::{PeriodType, Summary, TrendBucket, UNCATEGORIZED};
pub use sessions::Session;
pub use transactions::{Transaction, TransactionData, TransactionKind};
pub use users::{DEFAULT_ROLE, ProfileUpdate, RegisterCmd, User};

mod budgets;
mod categories;
mod error;
mod identity;
mod money;
mod ops;
mod password;
mod reports;
mod sessions;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
