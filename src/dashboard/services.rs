//! Read-only aggregates over production orders.
//!
//! Every figure of one response is read from the same transaction so that
//! the KPIs, the series and the rankings describe the same state.

use super::models::{DailyWeight, DashboardData, DashboardMeta, DashboardQuery, FormulaRank, Kpi, UserRank};
use crate::common::errors::ApiResult;
use crate::production::models::{Column, Entity, STATUS_COMPLETED, STATUS_PENDING};
use crate::production::services::{formula_names, user_names};
use crate::validation_error;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::BTreeMap;

pub const TOP_N: u64 = 5;
pub const UNKNOWN_USER: &str = "unknown";

/// Inclusive time range the series and rankings are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whether the caller asked for it explicitly
    pub requested: bool,
}

pub(crate) fn parse_date(field: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| validation_error!(field, format!("'{value}' is not a YYYY-MM-DD date")))
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn resolve_window(query: &DashboardQuery, now: DateTime<Utc>) -> ApiResult<Window> {
    let start_date = query
        .start_date
        .as_deref()
        .map(|value| parse_date("start_date", value))
        .transpose()?;
    let end_date = query
        .end_date
        .as_deref()
        .map(|value| parse_date("end_date", value))
        .transpose()?;

    let start = start_date.map_or(now - Duration::days(7), start_of_day);
    let end = end_of_day(end_date.unwrap_or_else(|| now.date_naive()));
    if start > end {
        return Err(validation_error!("start_date", "must not be after end_date"));
    }

    Ok(Window {
        start,
        end,
        requested: start_date.is_some() || end_date.is_some(),
    })
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    start_of_day(first)
}

/// Percentage rounded to one decimal, 0 when there is nothing to divide by
pub fn efficiency(completed: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(completed) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

async fn kpi<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> ApiResult<Kpi> {
    let pendientes = Entity::find()
        .filter(Column::Status.eq(STATUS_PENDING))
        .count(db)
        .await?;
    let completados = Entity::find()
        .filter(Column::Status.eq(STATUS_COMPLETED))
        .filter(Column::Timestamp.gte(start_of_month(now)))
        .count(db)
        .await?;
    let completed_total = Entity::find()
        .filter(Column::Status.eq(STATUS_COMPLETED))
        .count(db)
        .await?;
    let total = Entity::find().count(db).await?;

    Ok(Kpi {
        pendientes,
        completados,
        precision: efficiency(completed_total, total),
    })
}

/// One point per calendar day that has completed orders, oldest first
async fn weekly_series<C: ConnectionTrait>(db: &C, window: Window) -> ApiResult<Vec<DailyWeight>> {
    let rows: Vec<(DateTime<Utc>, Option<Decimal>)> = Entity::find()
        .select_only()
        .column(Column::Timestamp)
        .column(Column::TargetWeight)
        .filter(Column::Status.eq(STATUS_COMPLETED))
        .filter(Column::Timestamp.between(window.start, window.end))
        .into_tuple()
        .all(db)
        .await?;

    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for (timestamp, weight) in rows {
        *by_day.entry(timestamp.date_naive()).or_default() += weight.unwrap_or_default();
    }

    Ok(by_day
        .into_iter()
        .map(|(day, kgs)| DailyWeight {
            dia: day.format("%d/%m").to_string(),
            kgs: kgs.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect())
}

async fn top_formulas<C: ConnectionTrait>(db: &C, window: Option<Window>) -> ApiResult<Vec<FormulaRank>> {
    let mut query = Entity::find()
        .select_only()
        .column(Column::FormulaId)
        .column_as(Column::Folio.count(), "lotes")
        .filter(Column::Status.eq(STATUS_COMPLETED))
        .filter(Column::FormulaId.is_not_null());
    if let Some(window) = window {
        query = query.filter(Column::Timestamp.between(window.start, window.end));
    }
    let rows: Vec<(String, i64)> = query
        .group_by(Column::FormulaId)
        .order_by_desc(Column::Folio.count())
        .order_by_asc(Column::FormulaId)
        .limit(TOP_N)
        .into_tuple()
        .all(db)
        .await?;

    let names = formula_names(db, rows.iter().map(|(id, _)| id.clone()).collect()).await?;
    Ok(rows
        .into_iter()
        .map(|(formula_id, lotes)| FormulaRank {
            nombre: names.get(&formula_id).cloned().unwrap_or(formula_id),
            lotes,
        })
        .collect())
}

async fn top_users<C: ConnectionTrait>(db: &C, window: Option<Window>) -> ApiResult<Vec<UserRank>> {
    let mut query = Entity::find()
        .select_only()
        .column(Column::UserId)
        .column_as(Column::Folio.count(), "value")
        .filter(Column::Status.eq(STATUS_COMPLETED));
    if let Some(window) = window {
        query = query.filter(Column::Timestamp.between(window.start, window.end));
    }
    let rows: Vec<(Option<String>, i64)> = query
        .group_by(Column::UserId)
        .order_by_desc(Column::Folio.count())
        .order_by_asc(Column::UserId)
        .limit(TOP_N)
        .into_tuple()
        .all(db)
        .await?;

    let names = user_names(db, rows.iter().filter_map(|(id, _)| id.clone()).collect()).await?;
    Ok(rows
        .into_iter()
        .map(|(user_id, value)| UserRank {
            name: match user_id {
                Some(id) => names.get(&id).cloned().unwrap_or(id),
                None => UNKNOWN_USER.to_string(),
            },
            value,
        })
        .collect())
}

/// Compute the dashboard as of `now`
pub async fn dashboard_data(
    db: &DatabaseConnection,
    query: &DashboardQuery,
    now: DateTime<Utc>,
) -> ApiResult<DashboardData> {
    let window = resolve_window(query, now)?;
    let ranking_window = window.requested.then_some(window);

    let txn = db.begin().await?;
    let kpi = kpi(&txn, now).await?;
    let line_chart = weekly_series(&txn, window).await?;
    let bar_chart = top_formulas(&txn, ranking_window).await?;
    let pie_chart = top_users(&txn, ranking_window).await?;
    txn.commit().await?;

    tracing::debug!(
        pendientes = kpi.pendientes,
        completados = kpi.completados,
        days = line_chart.len(),
        "dashboard computed"
    );

    Ok(DashboardData {
        kpi,
        line_chart,
        bar_chart,
        pie_chart,
        meta: window.requested.then(|| DashboardMeta {
            start_date: window.start.date_naive().to_string(),
            end_date: window.end.date_naive().to_string(),
        }),
    })
}
