//! Aggregations over a user's transactions.
//!
//! The functions here are pure: the engine loads the rows for the requested
//! window and folds them. All sums are exact integer minor units and fail on
//! overflow instead of wrapping.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind};

/// Bucket name for expenses with no (or no longer existing) category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Granularity of the trend buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeriodType {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl PeriodType {
    /// Label of the bucket `date` falls into.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use engine::PeriodType;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// assert_eq!(PeriodType::Monthly.key(date), "2024-03");
    /// assert_eq!(PeriodType::Yearly.key(date), "2024");
    /// assert_eq!(PeriodType::Daily.key(date), "2024-03-15");
    /// ```
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y-%m-%d").to_string(),
            Self::Monthly => date.format("%Y-%m").to_string(),
            Self::Yearly => date.year().to_string(),
        }
    }
}

/// Case-insensitive; anything that is not `monthly` or `yearly` is daily.
impl From<&str> for PeriodType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Daily,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_balance: Money,
}

/// Income and expense of one period; a side is `None` when nothing of that
/// kind fell into the period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrendBucket {
    pub income: Option<Money>,
    pub expense: Option<Money>,
}

fn overflow() -> EngineError {
    EngineError::Validation("amount total too large".to_string())
}

fn accumulate(slot: &mut Option<Money>, amount: Money) -> ResultEngine<()> {
    let current = slot.unwrap_or(Money::ZERO);
    *slot = Some(current.checked_add(amount).ok_or_else(overflow)?);
    Ok(())
}

pub(crate) fn summarize(transactions: &[Transaction]) -> ResultEngine<Summary> {
    let total_income = Money::try_sum(
        transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Income)
            .map(|tx| tx.amount),
    )?;
    let total_expenses = Money::try_sum(
        transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .map(|tx| tx.amount),
    )?;
    let net_balance = total_income
        .checked_sub(total_expenses)
        .ok_or_else(overflow)?;
    Ok(Summary {
        total_income,
        total_expenses,
        net_balance,
    })
}

pub(crate) fn spending_by_category(
    transactions: &[Transaction],
) -> ResultEngine<BTreeMap<String, Money>> {
    let mut out: BTreeMap<String, Money> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        let name = tx
            .category_name
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = out.entry(name).or_insert(Money::ZERO);
        *entry = entry.checked_add(tx.amount).ok_or_else(overflow)?;
    }
    Ok(out)
}

pub(crate) fn trends(
    transactions: &[Transaction],
    period: PeriodType,
) -> ResultEngine<BTreeMap<String, TrendBucket>> {
    let mut out: BTreeMap<String, TrendBucket> = BTreeMap::new();
    for tx in transactions {
        let bucket = out.entry(period.key(tx.date)).or_default();
        match tx.kind {
            TransactionKind::Income => accumulate(&mut bucket.income, tx.amount)?,
            TransactionKind::Expense => accumulate(&mut bucket.expense, tx.amount)?,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn tx(kind: TransactionKind, minor: i64, date: (i32, u32, u32), cat: Option<&str>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            owner: Uuid::nil(),
            category_id: cat.map(|_| Uuid::new_v4()),
            category_name: cat.map(ToString::to_string),
            amount: Money::new(minor),
            kind,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: None,
        }
    }

    #[test]
    fn period_parsing_is_case_insensitive_and_defaults_to_daily() {
        assert_eq!(PeriodType::from("MONTHLY"), PeriodType::Monthly);
        assert_eq!(PeriodType::from("Yearly"), PeriodType::Yearly);
        assert_eq!(PeriodType::from("daily"), PeriodType::Daily);
        assert_eq!(PeriodType::from("weekly"), PeriodType::Daily);
        assert_eq!(PeriodType::from(""), PeriodType::Daily);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn summary_net_is_income_minus_expenses() {
        let rows = vec![
            tx(TransactionKind::Income, 100_000, (2024, 1, 1), None),
            tx(TransactionKind::Expense, 2_550, (2024, 1, 2), Some("Food")),
            tx(TransactionKind::Expense, 450, (2024, 1, 3), None),
        ];
        let summary = summarize(&rows).unwrap();
        assert_eq!(summary.total_income, Money::new(100_000));
        assert_eq!(summary.total_expenses, Money::new(3_000));
        assert_eq!(summary.net_balance, Money::new(97_000));
    }

    #[test]
    fn spending_groups_by_name_and_sums_to_total() {
        let rows = vec![
            tx(TransactionKind::Expense, 1_000, (2024, 1, 1), Some("Food")),
            tx(TransactionKind::Expense, 500, (2024, 1, 2), Some("Food")),
            tx(TransactionKind::Expense, 300, (2024, 1, 3), None),
            tx(TransactionKind::Income, 9_999, (2024, 1, 3), Some("Food")),
        ];
        let by_category = spending_by_category(&rows).unwrap();
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Food"], Money::new(1_500));
        assert_eq!(by_category[UNCATEGORIZED], Money::new(300));

        let total = Money::try_sum(by_category.values().copied()).unwrap();
        assert_eq!(total, summarize(&rows).unwrap().total_expenses);
    }

    #[test]
    fn monthly_trend_only_sets_contributed_sides() {
        let rows = vec![tx(TransactionKind::Income, 10_000, (2024, 3, 15), None)];
        let trends = trends(&rows, PeriodType::Monthly).unwrap();
        assert_eq!(
            trends["2024-03"],
            TrendBucket {
                income: Some(Money::new(10_000)),
                expense: None,
            }
        );
    }

    #[test]
    fn daily_and_yearly_keys() {
        let rows = vec![
            tx(TransactionKind::Expense, 100, (2023, 12, 31), None),
            tx(TransactionKind::Expense, 200, (2024, 1, 1), None),
            tx(TransactionKind::Income, 300, (2024, 6, 1), None),
        ];
        let daily = trends(&rows, PeriodType::Daily).unwrap();
        assert_eq!(
            daily.keys().collect::<Vec<_>>(),
            vec!["2023-12-31", "2024-01-01", "2024-06-01"]
        );

        let yearly = trends(&rows, PeriodType::Yearly).unwrap();
        assert_eq!(yearly["2023"].expense, Some(Money::new(100)));
        assert_eq!(
            yearly["2024"],
            TrendBucket {
                income: Some(Money::new(300)),
                expense: Some(Money::new(200)),
            }
        );
    }

    #[test]
    fn overflow_is_a_validation_error() {
        let rows = vec![
            tx(TransactionKind::Expense, i64::MAX, (2024, 1, 1), None),
            tx(TransactionKind::Expense, 1, (2024, 1, 1), None),
        ];
        assert!(matches!(
            spending_by_category(&rows),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            trends(&rows, PeriodType::Daily),
            Err(EngineError::Validation(_))
        ));
    }
}
