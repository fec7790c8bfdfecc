use crate::production::models::ProductionOrder;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InventoryQuery {
    /// First day, `YYYY-MM-DD` (default: seven days ago)
    pub from: Option<String>,
    /// Last day, inclusive (default: today)
    pub to: Option<String>,
    /// Status code, or `todos` for every status
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryIngredient {
    pub ingredient_id: String,
    pub ingredient_name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub weighed_amount: Option<Decimal>,
    pub weighed: bool,
}

/// One production order with its weighed total compared to its target
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryRow {
    pub folio: i32,
    pub order_tag: String,
    pub lot: Option<String>,
    pub status: i32,
    pub timestamp: DateTime<Utc>,
    pub formula_id: Option<String>,
    pub formula_name: Option<String>,
    pub user_name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub target_weight: Option<Decimal>,
    #[schema(value_type = f64)]
    pub actual_weight: Decimal,
    /// Actual minus target
    #[schema(value_type = f64)]
    pub difference: Decimal,
    pub ingredients: Vec<InventoryIngredient>,
}

impl From<ProductionOrder> for InventoryRow {
    fn from(order: ProductionOrder) -> Self {
        let actual_weight: Decimal = order
            .details
            .iter()
            .filter_map(|detail| detail.weighed_amount)
            .sum();
        let difference = actual_weight - order.target_weight.unwrap_or_default();

        Self {
            folio: order.folio,
            order_tag: order.order_tag,
            lot: order.lot,
            status: order.status,
            timestamp: order.timestamp,
            formula_id: order.formula_id,
            formula_name: order.formula_name,
            user_name: order.user_name,
            target_weight: order.target_weight,
            actual_weight,
            difference,
            ingredients: order
                .details
                .into_iter()
                .map(|detail| InventoryIngredient {
                    ingredient_id: detail.ingredient_id,
                    ingredient_name: detail.ingredient_name,
                    weighed_amount: detail.weighed_amount,
                    weighed: detail.weighed,
                })
                .collect(),
        }
    }
}
