use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Identity, ResultEngine, Transaction, TransactionData, TransactionKind,
    categories, transactions, util,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Conjunctive filter for [`Engine::list_transactions`]. Dates are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
}

fn normalize_data(data: &TransactionData) -> ResultEngine<TransactionData> {
    util::ensure_positive_amount(data.amount, "amount")?;
    Ok(TransactionData {
        description: normalize_optional_text(data.description.as_deref()),
        ..data.clone()
    })
}

impl Engine {
    /// Load the caller's transactions matching `filter`, newest first.
    pub(super) async fn query_transactions<C: ConnectionTrait>(
        db: &C,
        identity: &Identity,
        filter: &TransactionFilter,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        util::validate_window(filter.from, filter.to)?;

        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(identity.user_id));
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        let mut query = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .find_also_related(categories::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|(model, category)| Transaction::from_parts(model, category))
            .collect()
    }

    pub async fn list_transactions(
        &self,
        identity: &Identity,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        Self::query_transactions(&self.database, identity, filter, None).await
    }

    /// The caller's `limit` most recent transactions by date.
    pub async fn recent_transactions(
        &self,
        identity: &Identity,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Self::query_transactions(
            &self.database,
            identity,
            &TransactionFilter::default(),
            Some(limit),
        )
        .await
    }

    pub async fn get_transaction(
        &self,
        identity: &Identity,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let (model, category) = self
                .require_owned_transaction(&db_tx, identity, transaction_id)
                .await?;
            Transaction::from_parts(model, category)
        })
    }

    async fn resolve_transaction_category(
        &self,
        db: &DatabaseTransaction,
        identity: &Identity,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Option<categories::Model>> {
        match category_id {
            Some(id) => Ok(Some(
                self.require_visible_category(db, identity, id).await?,
            )),
            None => Ok(None),
        }
    }

    pub async fn create_transaction(
        &self,
        identity: &Identity,
        data: TransactionData,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Transaction> {
        let data = normalize_data(&data)?;
        with_tx!(self, |db_tx| {
            let category = self
                .resolve_transaction_category(&db_tx, identity, category_id)
                .await?;
            let model = transactions::ActiveModel::from_data(
                Uuid::new_v4(),
                identity.user_id,
                &data,
                category.as_ref().map(|c| c.id),
            )
            .insert(&db_tx)
            .await?;
            tracing::debug!(transaction_id = %model.id, kind = data.kind.as_str(), "transaction created");
            Transaction::from_parts(model, category)
        })
    }

    /// Replace amount, kind, date and description; `None` clears the category.
    pub async fn update_transaction(
        &self,
        identity: &Identity,
        transaction_id: Uuid,
        data: TransactionData,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Transaction> {
        let data = normalize_data(&data)?;
        with_tx!(self, |db_tx| {
            let (model, _) = self
                .require_owned_transaction(&db_tx, identity, transaction_id)
                .await?;
            let category = self
                .resolve_transaction_category(&db_tx, identity, category_id)
                .await?;

            let mut active: transactions::ActiveModel = model.into();
            active.category_id = ActiveValue::Set(category.as_ref().map(|c| c.id));
            active.amount_minor = ActiveValue::Set(data.amount.minor());
            active.kind = ActiveValue::Set(data.kind.as_str().to_string());
            active.date = ActiveValue::Set(data.date);
            active.description = ActiveValue::Set(data.description.clone());
            let updated = active.update(&db_tx).await?;

            tracing::debug!(%transaction_id, "transaction updated");
            Transaction::from_parts(updated, category)
        })
    }

    pub async fn delete_transaction(
        &self,
        identity: &Identity,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, _) = self
                .require_owned_transaction(&db_tx, identity, transaction_id)
                .await?;
            let result = transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected != 1 {
                return Err(EngineError::InvariantViolation(format!(
                    "expected to delete one transaction, deleted {}",
                    result.rows_affected
                )));
            }
            tracing::debug!(%transaction_id, "transaction deleted");
            Ok(())
        })
    }
}
