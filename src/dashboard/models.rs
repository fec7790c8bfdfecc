use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// First day of the window, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Last day of the window (inclusive), `YYYY-MM-DD`
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Kpi {
    pub pendientes: u64,
    /// Completed since the start of the current month
    pub completados: u64,
    /// Completed orders over all orders, as a percentage
    #[schema(value_type = f64)]
    pub precision: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyWeight {
    /// `dd/mm`
    pub dia: String,
    #[schema(value_type = f64)]
    pub kgs: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormulaRank {
    pub nombre: String,
    pub lotes: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRank {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardMeta {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub kpi: Kpi,
    #[serde(rename = "lineChart")]
    pub line_chart: Vec<DailyWeight>,
    #[serde(rename = "barChart")]
    pub bar_chart: Vec<FormulaRank>,
    #[serde(rename = "pieChart")]
    pub pie_chart: Vec<UserRank>,
    /// Present only when a date window was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DashboardMeta>,
}
