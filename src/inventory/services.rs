use super::models::{InventoryQuery, InventoryRow};
use crate::common::errors::ApiResult;
use crate::dashboard::services::{end_of_day, parse_date, start_of_day};
use crate::production::models::{Column, Entity};
use crate::production::services::assemble;
use crate::validation_error;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};

const ALL_STATUSES: &str = "todos";

fn parse_status(value: Option<&str>) -> ApiResult<Option<i32>> {
    match value.map(str::trim) {
        None | Some("" | ALL_STATUSES) => Ok(None),
        Some(code) => code
            .parse()
            .map(Some)
            .map_err(|_| validation_error!("status", format!("'{code}' is not a status code"))),
    }
}

/// Orders in the requested day range, newest first
pub async fn inventory(
    db: &DatabaseConnection,
    query: &InventoryQuery,
    now: DateTime<Utc>,
) -> ApiResult<Vec<InventoryRow>> {
    let from = match query.from.as_deref() {
        Some(value) => parse_date("from", value)?,
        None => (now - Duration::days(7)).date_naive(),
    };
    let to = match query.to.as_deref() {
        Some(value) => parse_date("to", value)?,
        None => now.date_naive(),
    };
    if from > to {
        return Err(validation_error!("from", "must not be after to"));
    }
    let status = parse_status(query.status.as_deref())?;

    let mut select = Entity::find().filter(Column::Timestamp.between(start_of_day(from), end_of_day(to)));
    if let Some(status) = status {
        select = select.filter(Column::Status.eq(status));
    }

    let txn = db.begin().await?;
    let orders = select
        .order_by_desc(Column::Timestamp)
        .order_by_desc(Column::Folio)
        .all(&txn)
        .await?;
    let assembled = assemble(&txn, orders).await?;
    txn.commit().await?;

    Ok(assembled.into_iter().map(InventoryRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::parse_status;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some(None))]
    #[case(Some("todos"), Some(None))]
    #[case(Some(""), Some(None))]
    #[case(Some("1"), Some(Some(1)))]
    #[case(Some(" 0 "), Some(Some(0)))]
    #[case(Some("done"), None)]
    fn test_parse_status(#[case] raw: Option<&str>, #[case] expected: Option<Option<i32>>) {
        assert_eq!(parse_status(raw).ok(), expected);
    }
}
