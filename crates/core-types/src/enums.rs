use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The outcome of checking an order's shipping time against its ship-mode threshold.
///
/// Only `Late` and `OnTime` are known outcomes. The other variants are kept apart so
/// that they can never be counted as on-time by an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LateDelivery {
    Late,
    OnTime,
    /// The ship mode has no threshold in the rule table.
    UnknownMode,
    /// The order date or the ship date is missing.
    MissingDates,
    /// The order shipped before it was placed.
    InvalidDates,
}

impl LateDelivery {
    /// `Some(true)` for late, `Some(false)` for on-time, `None` for every other outcome.
    pub fn as_known(&self) -> Option<bool> {
        match self {
            LateDelivery::Late => Some(true),
            LateDelivery::OnTime => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for LateDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LateDelivery::Late => "late",
            LateDelivery::OnTime => "on time",
            LateDelivery::UnknownMode => "unknown mode",
            LateDelivery::MissingDates => "missing dates",
            LateDelivery::InvalidDates => "invalid dates",
        };
        f.write_str(label)
    }
}

/// A data-quality problem detected while enriching a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataIssue {
    MissingOrderDate,
    MissingShipDate,
    /// Ship date precedes order date by `days` (always negative).
    ShipBeforeOrder { days: i64 },
    UnknownShipMode(String),
}

/// A categorical field that records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    OrderYear,
    YearMonth,
    Region,
    Country,
    State,
    City,
    Category,
    SubCategory,
    Segment,
    ShipMode,
    ProductId,
    ProductName,
    CustomerId,
    CustomerName,
}

impl GroupField {
    /// The column header used for this field in tables and CSV exports.
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupField::OrderYear => "OrderYear",
            GroupField::YearMonth => "OrderYearMonth",
            GroupField::Region => "Region",
            GroupField::Country => "Country",
            GroupField::State => "State",
            GroupField::City => "City",
            GroupField::Category => "Category",
            GroupField::SubCategory => "SubCategory",
            GroupField::Segment => "Segment",
            GroupField::ShipMode => "ShipMode",
            GroupField::ProductId => "ProductID",
            GroupField::ProductName => "ProductName",
            GroupField::CustomerId => "CustomerID",
            GroupField::CustomerName => "CustomerName",
        }
    }
}

impl FromStr for GroupField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "orderyear" | "year" => Ok(GroupField::OrderYear),
            "orderyearmonth" | "yearmonth" | "month" => Ok(GroupField::YearMonth),
            "region" => Ok(GroupField::Region),
            "country" => Ok(GroupField::Country),
            "state" => Ok(GroupField::State),
            "city" => Ok(GroupField::City),
            "category" => Ok(GroupField::Category),
            "subcategory" => Ok(GroupField::SubCategory),
            "segment" => Ok(GroupField::Segment),
            "shipmode" => Ok(GroupField::ShipMode),
            "productid" | "product" => Ok(GroupField::ProductId),
            "productname" => Ok(GroupField::ProductName),
            "customerid" | "customer" => Ok(GroupField::CustomerId),
            "customername" => Ok(GroupField::CustomerName),
            _ => Err(CoreError::InvalidInput(
                "group field".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// One component of a grouping key.
///
/// Calendar keys stay numeric so that they sort chronologically; everything else
/// is text. The derived ordering puts numbers before text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    Number(u32),
    Text(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Number(n) => write!(f, "{n}"),
            GroupValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        GroupValue::Text(value.to_string())
    }
}

impl From<u32> for GroupValue {
    fn from(value: u32) -> Self {
        GroupValue::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_field_parses_loose_spellings() {
        assert_eq!("Sub-Category".parse::<GroupField>().unwrap(), GroupField::SubCategory);
        assert_eq!("ship_mode".parse::<GroupField>().unwrap(), GroupField::ShipMode);
        assert_eq!("YEAR".parse::<GroupField>().unwrap(), GroupField::OrderYear);
        assert!("warehouse".parse::<GroupField>().is_err());
    }

    #[test]
    fn only_late_and_on_time_are_known() {
        assert_eq!(LateDelivery::Late.as_known(), Some(true));
        assert_eq!(LateDelivery::OnTime.as_known(), Some(false));
        assert_eq!(LateDelivery::UnknownMode.as_known(), None);
        assert_eq!(LateDelivery::MissingDates.as_known(), None);
        assert_eq!(LateDelivery::InvalidDates.as_known(), None);
    }

    #[test]
    fn numeric_group_values_sort_numerically() {
        let mut values = vec![GroupValue::from(201_410u32), GroupValue::from(20_149u32)];
        values.sort();
        assert_eq!(values, vec![GroupValue::Number(20_149), GroupValue::Number(201_410)]);
    }
}
