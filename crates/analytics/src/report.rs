use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{GroupField, GroupValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The key tuple that identifies a `SummaryRow`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<GroupValue>);

impl GroupKey {
    pub fn values(&self) -> &[GroupValue] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&GroupValue> {
        self.0.get(index)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Aggregated metrics for one group of records.
///
/// Ratios are always derived from the group's own sums and counts, never by
/// averaging per-row ratios. Each ratio is `None` when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub key: GroupKey,

    // I. Additive measures
    pub sales: Decimal,
    pub profit: Decimal,
    pub discount: Decimal,
    pub shipping_cost: Decimal,

    // II. Counts
    pub line_count: usize,
    pub order_count: usize,
    pub customer_count: usize,

    // III. Shipping
    pub shipping_days_total: i64,
    /// Records with a present, non-negative shipping time.
    pub shipping_days_count: usize,
    pub late_count: usize,
    /// Records whose late-delivery outcome is known (late or on time).
    pub late_known_count: usize,

    // IV. Derived
    pub margin: Option<Decimal>,
    pub avg_shipping_days: Option<Decimal>,
    pub late_rate: Option<Decimal>,
    pub last_order_date: Option<NaiveDate>,
}

impl SummaryRow {
    /// The value of `metric` for this row, `None` when the metric is undefined.
    pub fn metric(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::Sales => Some(self.sales),
            Metric::Profit => Some(self.profit),
            Metric::Discount => Some(self.discount),
            Metric::ShippingCost => Some(self.shipping_cost),
            Metric::Lines => Some(Decimal::from(self.line_count)),
            Metric::Orders => Some(Decimal::from(self.order_count)),
            Metric::Customers => Some(Decimal::from(self.customer_count)),
            Metric::Margin => self.margin,
            Metric::AvgShippingDays => self.avg_shipping_days,
            Metric::LateRate => self.late_rate,
        }
    }
}

/// A metric that rows can be ranked or pivoted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Sales,
    Profit,
    Discount,
    ShippingCost,
    Lines,
    Orders,
    Customers,
    Margin,
    AvgShippingDays,
    LateRate,
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sales" => Ok(Metric::Sales),
            "profit" => Ok(Metric::Profit),
            "discount" => Ok(Metric::Discount),
            "shippingcost" => Ok(Metric::ShippingCost),
            "lines" => Ok(Metric::Lines),
            "orders" => Ok(Metric::Orders),
            "customers" => Ok(Metric::Customers),
            "margin" | "profitmargin" => Ok(Metric::Margin),
            "avgshippingdays" | "shippingdays" => Ok(Metric::AvgShippingDays),
            "laterate" => Ok(Metric::LateRate),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Headline numbers for the whole (filtered) dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverviewKpis {
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    pub margin: Option<Decimal>,
    pub order_count: usize,
    pub customer_count: usize,
    pub line_count: usize,
    pub avg_shipping_days: Option<Decimal>,
    pub late_rate: Option<Decimal>,
}

impl From<&SummaryRow> for OverviewKpis {
    fn from(row: &SummaryRow) -> Self {
        Self {
            total_sales: row.sales,
            total_profit: row.profit,
            margin: row.margin,
            order_count: row.order_count,
            customer_count: row.customer_count,
            line_count: row.line_count,
            avg_shipping_days: row.avg_shipping_days,
            late_rate: row.late_rate,
        }
    }
}

/// A dense two-way table of one metric, e.g. profit by category and region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub row_field: GroupField,
    pub column_field: GroupField,
    pub metric: Metric,
    pub row_labels: Vec<GroupValue>,
    pub column_labels: Vec<GroupValue>,
    /// `cells[row][column]`; `None` where no record has that combination.
    pub cells: Vec<Vec<Option<Decimal>>>,
}

impl PivotTable {
    pub fn cell(&self, row: &GroupValue, column: &GroupValue) -> Option<Decimal> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        self.cells[r][c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_parse() {
        assert_eq!("Sales".parse::<Metric>().unwrap(), Metric::Sales);
        assert_eq!("late_rate".parse::<Metric>().unwrap(), Metric::LateRate);
        assert_eq!("ProfitMargin".parse::<Metric>().unwrap(), Metric::Margin);
        assert!(matches!(
            "volume".parse::<Metric>(),
            Err(AnalyticsError::UnknownMetric(_))
        ));
    }

    #[test]
    fn key_display_joins_parts() {
        let key = GroupKey(vec![GroupValue::from("Furniture"), GroupValue::from("Tables")]);
        assert_eq!(key.to_string(), "Furniture / Tables");
    }
}
