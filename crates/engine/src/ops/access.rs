use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Identity, ResultEngine, budgets, categories, transactions};

use super::Engine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// The ownership rule every scoped operation applies.
///
/// A record with an owner is accessible only to that owner. A record with no
/// owner (a global category) can be read by anyone and written by no one.
pub fn can_access(owner: Option<Uuid>, identity: &Identity, access: Access) -> bool {
    match owner {
        Some(owner) => owner == identity.user_id,
        None => access == Access::Read,
    }
}

impl Engine {
    /// Category referenced by a transaction or budget: it must exist and be
    /// either global or the caller's own.
    pub(super) async fn require_visible_category(
        &self,
        db: &DatabaseTransaction,
        identity: &Identity,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        let model = categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::CategoryNotFound(category_id.to_string()))?;
        if !can_access(model.user_id, identity, Access::Read) {
            return Err(EngineError::Forbidden(
                "category belongs to another user".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn require_owned_category(
        &self,
        db: &DatabaseTransaction,
        identity: &Identity,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        let model = categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("category not exists".to_string()))?;
        if !can_access(model.user_id, identity, Access::Write) {
            return Err(EngineError::Forbidden(
                "category is not owned by the caller".to_string(),
            ));
        }
        Ok(model)
    }

    /// Someone else's transaction is reported exactly like a missing one.
    pub(super) async fn require_owned_transaction(
        &self,
        db: &DatabaseTransaction,
        identity: &Identity,
        transaction_id: Uuid,
    ) -> ResultEngine<(transactions::Model, Option<categories::Model>)> {
        let not_found = || EngineError::NotFound("transaction not exists".to_string());
        let (model, category) = transactions::Entity::find_by_id(transaction_id)
            .find_also_related(categories::Entity)
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        if !can_access(Some(model.user_id), identity, Access::Write) {
            return Err(not_found());
        }
        Ok((model, category))
    }

    pub(super) async fn require_owned_budget(
        &self,
        db: &DatabaseTransaction,
        identity: &Identity,
        budget_id: Uuid,
    ) -> ResultEngine<budgets::Model> {
        let model = budgets::Entity::find_by_id(budget_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("budget not exists".to_string()))?;
        if !can_access(Some(model.user_id), identity, Access::Write) {
            return Err(EngineError::Forbidden(
                "budget is not owned by the caller".to_string(),
            ));
        }
        Ok(model)
    }
}
