//! Monthly spending limits, one per (user, category, month, year).

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Money, categories};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetData {
    pub amount: Money,
    pub month: u32,
    pub year: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub owner: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub amount: Money,
    pub month: u32,
    pub year: i32,
}

impl Budget {
    pub(crate) fn from_parts(model: Model, category: Option<categories::Model>) -> Self {
        Self {
            id: model.id,
            owner: model.user_id,
            category_id: model.category_id,
            category_name: category.map(|c| c.name),
            amount: Money::new(model.amount_minor),
            month: model.month.unsigned_abs(),
            year: model.year,
        }
    }
}

/// A budget together with what has been spent against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Money,
    pub remaining: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub month: i32,
    pub year: i32,
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
        on_delete = "Cascade"
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
    pub(crate) fn from_data(id: Uuid, owner: Uuid, data: &BudgetData, category_id: Uuid) -> Self {
        Self {
            id: ActiveValue::Set(id),
            user_id: ActiveValue::Set(owner),
            category_id: ActiveValue::Set(category_id),
            amount_minor: ActiveValue::Set(data.amount.minor()),
            // month is validated to 1..=12 before reaching storage
            month: ActiveValue::Set(data.month as i32),
            year: ActiveValue::Set(data.year),
        }
    }
}
