use crate::enums::{DataIssue, GroupField, GroupValue, LateDelivery};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the cleaned sales export.
///
/// Dates are optional because an empty or malformed cell is treated as missing
/// rather than failing the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: Option<NaiveDateTime>,
    pub ship_date: Option<NaiveDateTime>,
    pub ship_mode: String,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub sub_category: String,
    pub region: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub sales: Decimal,
    pub profit: Decimal,
    pub discount: Decimal,
    pub shipping_cost: Decimal,
}

/// An `OrderRecord` together with the fields derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub order_year: Option<i32>,
    pub order_month: Option<u32>,
    /// `year * 100 + month`, e.g. `201403` for March 2014.
    pub year_month: Option<u32>,
    /// `profit / sales`, absent when sales is zero.
    pub profit_margin: Option<Decimal>,
    /// Signed whole days from order to ship. Negative values are kept as-is.
    pub shipping_days: Option<i64>,
    pub late_delivery: LateDelivery,
    pub issues: Vec<DataIssue>,
}

impl EnrichedRecord {
    /// The value of `field` for this record, or `None` when the field is derived
    /// from a missing date.
    pub fn group_value(&self, field: GroupField) -> Option<GroupValue> {
        let o = &self.order;
        let text = |s: &str| Some(GroupValue::Text(s.to_string()));
        match field {
            GroupField::OrderYear => self
                .order_year
                .and_then(|y| u32::try_from(y).ok())
                .map(GroupValue::Number),
            GroupField::YearMonth => self.year_month.map(GroupValue::Number),
            GroupField::Region => text(o.region.as_str()),
            GroupField::Country => text(o.country.as_str()),
            GroupField::State => text(o.state.as_str()),
            GroupField::City => text(o.city.as_str()),
            GroupField::Category => text(o.category.as_str()),
            GroupField::SubCategory => text(o.sub_category.as_str()),
            GroupField::Segment => text(o.segment.as_str()),
            GroupField::ShipMode => text(o.ship_mode.as_str()),
            GroupField::ProductId => text(o.product_id.as_str()),
            GroupField::ProductName => text(o.product_name.as_str()),
            GroupField::CustomerId => text(o.customer_id.as_str()),
            GroupField::CustomerName => text(o.customer_name.as_str()),
        }
    }

    /// Shipping days usable in averages: present and not negative.
    pub fn valid_shipping_days(&self) -> Option<i64> {
        self.shipping_days.filter(|d| *d >= 0)
    }

    pub fn order_day(&self) -> Option<NaiveDate> {
        self.order.order_date.map(|d| d.date())
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Formats a `year * 100 + month` key as `YYYY-MM`.
pub fn year_month_label(key: u32) -> String {
    format!("{:04}-{:02}", key / 100, key % 100)
}
