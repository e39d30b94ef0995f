use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Category, EngineError, Identity, ResultEngine, budgets, categories, transactions};

use super::{Engine, map_unique_violation, normalize_required_name, with_tx};

/// Whether `owner` already has a category called `name`, ignoring `exclude`.
///
/// `owner = None` checks the global namespace.
async fn name_taken(
    db: &DatabaseTransaction,
    owner: Option<Uuid>,
    name: &str,
    exclude: Option<Uuid>,
) -> ResultEngine<bool> {
    let mut query = categories::Entity::find().filter(categories::Column::Name.eq(name));
    query = match owner {
        Some(owner) => query.filter(categories::Column::UserId.eq(owner)),
        None => query.filter(categories::Column::UserId.is_null()),
    };
    if let Some(id) = exclude {
        query = query.filter(categories::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

impl Engine {
    /// Categories the caller can see: their own plus the global ones.
    pub async fn list_categories(&self, identity: &Identity) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::UserId.eq(identity.user_id))
                    .add(categories::Column::UserId.is_null()),
            )
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Create a personal category owned by the caller.
    pub async fn create_category(&self, identity: &Identity, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        self.insert_category(Some(identity.user_id), name).await
    }

    /// Create a category visible to every user.
    ///
    /// Administrative: not reachable through any identity-scoped path.
    pub async fn create_global_category(&self, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        self.insert_category(None, name).await
    }

    /// Like [`Engine::create_global_category`] but returns the existing
    /// category when the name is already taken.
    pub async fn ensure_global_category(&self, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        if let Some(model) = categories::Entity::find()
            .filter(categories::Column::UserId.is_null())
            .filter(categories::Column::Name.eq(name.as_str()))
            .one(&self.database)
            .await?
        {
            return Ok(model.into());
        }
        match self.insert_category(None, name.clone()).await {
            Err(EngineError::DuplicateName(_)) => categories::Entity::find()
                .filter(categories::Column::UserId.is_null())
                .filter(categories::Column::Name.eq(name.as_str()))
                .one(&self.database)
                .await?
                .map(Category::from)
                .ok_or_else(|| EngineError::InvariantViolation(format!("category {name} vanished"))),
            other => other,
        }
    }

    async fn insert_category(&self, owner: Option<Uuid>, name: String) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            if name_taken(&db_tx, owner, &name, None).await? {
                return Err(EngineError::DuplicateName(name));
            }
            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(owner),
                name: ActiveValue::Set(name.clone()),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| map_unique_violation(err, || EngineError::DuplicateName(name.clone())))?;
            tracing::debug!(category_id = %model.id, global = owner.is_none(), "category created");
            Ok(Category::from(model))
        })
    }

    /// Rename one of the caller's categories.
    pub async fn update_category(
        &self,
        identity: &Identity,
        category_id: Uuid,
        new_name: &str,
    ) -> ResultEngine<Category> {
        let new_name = normalize_required_name(new_name, "category")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_category(&db_tx, identity, category_id)
                .await?;
            if model.name == new_name {
                return Ok(Category::from(model));
            }
            if name_taken(&db_tx, model.user_id, &new_name, Some(model.id)).await? {
                return Err(EngineError::DuplicateName(new_name));
            }
            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(new_name.clone());
            let updated = active.update(&db_tx).await.map_err(|err| {
                map_unique_violation(err, || EngineError::DuplicateName(new_name.clone()))
            })?;
            tracing::debug!(%category_id, "category renamed");
            Ok(Category::from(updated))
        })
    }

    /// Delete one of the caller's categories.
    ///
    /// Transactions pointing at it lose their category; budgets for it are
    /// removed.
    pub async fn delete_category(&self, identity: &Identity, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_category(&db_tx, identity, category_id)
                .await?;

            let detached = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::CategoryId.eq(model.id))
                .exec(&db_tx)
                .await?;
            let dropped = budgets::Entity::delete_many()
                .filter(budgets::Column::CategoryId.eq(model.id))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(
                %category_id,
                detached = detached.rows_affected,
                budgets_removed = dropped.rows_affected,
                "category deleted"
            );
            Ok(())
        })
    }
}
