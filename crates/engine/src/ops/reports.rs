use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    Identity, Money, PeriodType, ResultEngine, Summary, Transaction, TrendBucket, reports, util,
};

use super::{Engine, TransactionFilter};

impl Engine {
    async fn transactions_in_window(
        &self,
        identity: &Identity,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<Transaction>> {
        util::validate_window(Some(start), Some(end))?;
        let filter = TransactionFilter {
            from: Some(start),
            to: Some(end),
            ..TransactionFilter::default()
        };
        Self::query_transactions(&self.database, identity, &filter, None).await
    }

    /// Income, expenses and their difference over `[start, end]`.
    pub async fn summary(
        &self,
        identity: &Identity,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Summary> {
        let rows = self.transactions_in_window(identity, start, end).await?;
        reports::summarize(&rows)
    }

    /// Expenses over `[start, end]` grouped by category name.
    pub async fn spending_by_category(
        &self,
        identity: &Identity,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<BTreeMap<String, Money>> {
        let rows = self.transactions_in_window(identity, start, end).await?;
        reports::spending_by_category(&rows)
    }

    pub async fn income_vs_expense_trends(
        &self,
        identity: &Identity,
        start: NaiveDate,
        end: NaiveDate,
        period: PeriodType,
    ) -> ResultEngine<BTreeMap<String, TrendBucket>> {
        let rows = self.transactions_in_window(identity, start, end).await?;
        reports::trends(&rows, period)
    }
}
