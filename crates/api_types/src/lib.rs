//! JSON bodies of the Ledgerly HTTP API.
//!
//! Amounts travel as decimal strings with two fractional digits (`"50.00"`);
//! dates as `YYYY-MM-DD`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Stable machine-readable kind, e.g. `not_found`.
    pub code: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Send as `Authorization: Bearer <token>`.
        pub token: String,
        pub expires_at: DateTime<Utc>,
        pub user: super::user::UserView,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub email: String,
        pub roles: Vec<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub date_of_birth: Option<NaiveDate>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub profile_picture_url: Option<String>,
    }

    /// Only the fields present are changed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub date_of_birth: Option<NaiveDate>,
        pub phone_number: Option<String>,
        pub address: Option<String>,
        pub profile_picture_url: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpsert {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        /// `true` for categories shared by every user (read only).
        pub global: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Query string of `GET /api/transactions`. All filters are optional and
    /// combined with AND; dates are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecentQuery {
        pub limit: Option<u64>,
    }

    /// Body for create and update. Update replaces every field;
    /// a missing `category_id` clears the category.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpsert {
        /// Decimal string, must be > 0.
        pub amount: String,
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount: String,
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
        pub category_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodQuery {
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingQuery {
        pub category_id: Uuid,
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        pub category_id: Uuid,
        /// Decimal string, must be > 0.
        pub amount: String,
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub category_name: Option<String>,
        pub amount: String,
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub budget: BudgetView,
        pub spent: String,
        /// Negative when the budget is exceeded.
        pub remaining: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusResponse {
        pub budgets: Vec<BudgetStatusView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingResponse {
        pub category_id: Uuid,
        pub month: u32,
        pub year: i32,
        pub spent: String,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrendQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
        /// `daily`, `monthly` or `yearly` (case-insensitive). Anything else
        /// is treated as daily.
        pub period: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub total_income: String,
        pub total_expenses: String,
        pub net_balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingByCategoryResponse {
        pub categories: BTreeMap<String, String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TrendBucket {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub income: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub expense: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrendsResponse {
        pub periods: BTreeMap<String, TrendBucket>,
    }
}
