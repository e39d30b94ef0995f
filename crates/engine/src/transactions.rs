//! Income and expense records.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, categories};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// The writable fields of a transaction. The category travels separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionData {
    pub amount: Money,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub owner: Uuid,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Transaction {
    /// Builds the record from a row and its (left joined) category.
    ///
    /// A category id that no longer resolves is reported as no category.
    pub(crate) fn from_parts(
        model: Model,
        category: Option<categories::Model>,
    ) -> ResultEngine<Self> {
        let (category_id, category_name) = match category {
            Some(category) => (Some(category.id), Some(category.name)),
            None => (None, None),
        };
        Ok(Self {
            id: model.id,
            owner: model.user_id,
            category_id,
            category_name,
            amount: Money::new(model.amount_minor),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            date: model.date,
            description: model.description,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub kind: String,
    pub date: Date,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_data(
        id: Uuid,
        owner: Uuid,
        data: &TransactionData,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: ActiveValue::Set(id),
            user_id: ActiveValue::Set(owner),
            category_id: ActiveValue::Set(category_id),
            amount_minor: ActiveValue::Set(data.amount.minor()),
            kind: ActiveValue::Set(data.kind.as_str().to_string()),
            date: ActiveValue::Set(data.date),
            description: ActiveValue::Set(data.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            TransactionKind::try_from("INCOME").unwrap(),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::try_from("expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::try_from("transfer").is_err());
    }

    #[test]
    fn dangling_category_reads_as_none() {
        let model = Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Some(Uuid::new_v4()),
            amount_minor: 1250,
            kind: "expense".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            description: None,
        };
        let tx = Transaction::from_parts(model, None).unwrap();
        assert_eq!(tx.category_id, None);
        assert_eq!(tx.category_name, None);
        assert_eq!(tx.amount, Money::new(1250));
    }
}
