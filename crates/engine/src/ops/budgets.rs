use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetData, BudgetStatus, EngineError, Identity, Money, ResultEngine, TransactionKind,
    budgets, categories, transactions, util,
};

use super::{Engine, map_unique_violation, with_tx};

fn validate_data(data: &BudgetData) -> ResultEngine<()> {
    util::ensure_positive_amount(data.amount, "budget amount")?;
    util::validate_period(data.month, data.year)
}

fn duplicate(category_id: Uuid, data: &BudgetData) -> EngineError {
    EngineError::DuplicateBudget(format!(
        "category {category_id} already has a budget for {}-{:02}",
        data.year, data.month
    ))
}

/// Whether the caller already has a budget for this tuple, ignoring `exclude`.
async fn budget_exists(
    db: &DatabaseTransaction,
    identity: &Identity,
    category_id: Uuid,
    data: &BudgetData,
    exclude: Option<Uuid>,
) -> ResultEngine<bool> {
    let mut query = budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(identity.user_id))
        .filter(budgets::Column::CategoryId.eq(category_id))
        .filter(budgets::Column::Month.eq(data.month as i32))
        .filter(budgets::Column::Year.eq(data.year));
    if let Some(id) = exclude {
        query = query.filter(budgets::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Sum of the caller's expenses in `category_id` dated within the month.
async fn spending_in_month<C: ConnectionTrait>(
    db: &C,
    identity: &Identity,
    category_id: Uuid,
    month: u32,
    year: i32,
) -> ResultEngine<Money> {
    let (first, last) = util::month_bounds(month, year)?;
    let rows = transactions::Entity::find()
        .filter(transactions::Column::UserId.eq(identity.user_id))
        .filter(transactions::Column::CategoryId.eq(category_id))
        .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
        .filter(transactions::Column::Date.between(first, last))
        .all(db)
        .await?;
    Money::try_sum(rows.into_iter().map(|row| Money::new(row.amount_minor)))
}

impl Engine {
    /// The caller's budgets for one month.
    pub async fn list_budgets(
        &self,
        identity: &Identity,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<Budget>> {
        util::validate_period(month, year)?;
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(identity.user_id))
            .filter(budgets::Column::Month.eq(month as i32))
            .filter(budgets::Column::Year.eq(year))
            .find_also_related(categories::Entity)
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(model, category)| Budget::from_parts(model, category))
            .collect())
    }

    pub async fn create_budget(
        &self,
        identity: &Identity,
        data: BudgetData,
        category_id: Uuid,
    ) -> ResultEngine<Budget> {
        validate_data(&data)?;
        with_tx!(self, |db_tx| {
            let category = self
                .require_visible_category(&db_tx, identity, category_id)
                .await?;
            if budget_exists(&db_tx, identity, category.id, &data, None).await? {
                return Err(duplicate(category.id, &data));
            }
            let model =
                budgets::ActiveModel::from_data(Uuid::new_v4(), identity.user_id, &data, category.id)
                    .insert(&db_tx)
                    .await
                    .map_err(|err| map_unique_violation(err, || duplicate(category_id, &data)))?;
            tracing::debug!(budget_id = %model.id, "budget created");
            Ok(Budget::from_parts(model, Some(category)))
        })
    }

    pub async fn update_budget(
        &self,
        identity: &Identity,
        budget_id: Uuid,
        data: BudgetData,
        category_id: Uuid,
    ) -> ResultEngine<Budget> {
        validate_data(&data)?;
        with_tx!(self, |db_tx| {
            let model = self.require_owned_budget(&db_tx, identity, budget_id).await?;
            let category = self
                .require_visible_category(&db_tx, identity, category_id)
                .await?;
            if budget_exists(&db_tx, identity, category.id, &data, Some(model.id)).await? {
                return Err(duplicate(category.id, &data));
            }

            let mut active: budgets::ActiveModel = model.into();
            active.category_id = ActiveValue::Set(category.id);
            active.amount_minor = ActiveValue::Set(data.amount.minor());
            active.month = ActiveValue::Set(data.month as i32);
            active.year = ActiveValue::Set(data.year);
            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| map_unique_violation(err, || duplicate(category_id, &data)))?;
            tracing::debug!(%budget_id, "budget updated");
            Ok(Budget::from_parts(updated, Some(category)))
        })
    }

    pub async fn delete_budget(&self, identity: &Identity, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned_budget(&db_tx, identity, budget_id).await?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            tracing::debug!(%budget_id, "budget deleted");
            Ok(())
        })
    }

    /// What the caller spent in a category during one month.
    ///
    /// Zero when there is nothing, including for categories the caller
    /// cannot see.
    pub async fn current_spending(
        &self,
        identity: &Identity,
        category_id: Uuid,
        month: u32,
        year: i32,
    ) -> ResultEngine<Money> {
        spending_in_month(&self.database, identity, category_id, month, year).await
    }

    /// Every budget of the month with its spending and what is left.
    pub async fn budget_status(
        &self,
        identity: &Identity,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<BudgetStatus>> {
        with_tx!(self, |db_tx| {
            util::validate_period(month, year)?;
            let rows = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(identity.user_id))
                .filter(budgets::Column::Month.eq(month as i32))
                .filter(budgets::Column::Year.eq(year))
                .find_also_related(categories::Entity)
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (model, category) in rows {
                let budget = Budget::from_parts(model, category);
                let spent =
                    spending_in_month(&db_tx, identity, budget.category_id, month, year).await?;
                let remaining = budget.amount.checked_sub(spent).ok_or_else(|| {
                    EngineError::Validation("amount total too large".to_string())
                })?;
                out.push(BudgetStatus {
                    budget,
                    spent,
                    remaining,
                });
            }
            Ok(out)
        })
    }
}
