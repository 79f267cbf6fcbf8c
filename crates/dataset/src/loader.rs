use crate::error::DatasetError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Columns every input file must carry. Matching is by name; order and extra
/// columns do not matter.
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "OrderID",
    "OrderDate",
    "ShipDate",
    "ShipMode",
    "CustomerID",
    "CustomerName",
    "Segment",
    "ProductID",
    "ProductName",
    "Category",
    "SubCategory",
    "Region",
    "Country",
    "State",
    "City",
    "Sales",
    "Profit",
    "Discount",
    "ShippingCost",
];

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// A row exactly as it appears in the file.
#[derive(Debug, Deserialize)]
struct RawOrderRow {
    #[serde(rename = "OrderID")]
    order_id: String,
    #[serde(rename = "OrderDate")]
    order_date: String,
    #[serde(rename = "ShipDate")]
    ship_date: String,
    #[serde(rename = "ShipMode")]
    ship_mode: String,
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "CustomerName")]
    customer_name: String,
    #[serde(rename = "Segment")]
    segment: String,
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "ProductName")]
    product_name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "SubCategory")]
    sub_category: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Sales")]
    sales: String,
    #[serde(rename = "Profit")]
    profit: String,
    #[serde(rename = "Discount")]
    discount: String,
    #[serde(rename = "ShippingCost")]
    shipping_cost: String,
}

/// Loads every order from a CSV file.
///
/// Any failure here is fatal for the caller: there is no partial dataset.
pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_orders_from_reader(file, &path.display().to_string())?;
    info!(path = %path.display(), rows = records.len(), "Loaded sales dataset");
    Ok(records)
}

/// Loads orders from any reader. `source_name` only appears in error messages.
pub fn load_orders_from_reader<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<OrderRecord>, DatasetError> {
    let csv_error = |source| DatasetError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        });
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(csv_error)?;
        // The line the record starts on; quoted cells may span several lines.
        let line = row.position().map_or(0, |p| p.line());
        let raw: RawOrderRow = row.deserialize(Some(&headers)).map_err(csv_error)?;
        records.push(convert_row(raw, source_name, line)?);
    }

    debug!(source = source_name, rows = records.len(), "Parsed CSV rows");
    Ok(records)
}

fn convert_row(raw: RawOrderRow, source_name: &str, line: u64) -> Result<OrderRecord, DatasetError> {
    let money = |column: &'static str, value: &str| {
        parse_decimal(value).ok_or_else(|| DatasetError::MalformedValue {
            source_name: source_name.to_string(),
            line,
            column,
            value: value.to_string(),
        })
    };

    Ok(OrderRecord {
        sales: money("Sales", &raw.sales)?,
        profit: money("Profit", &raw.profit)?,
        discount: money("Discount", &raw.discount)?,
        shipping_cost: money("ShippingCost", &raw.shipping_cost)?,
        order_date: date_cell(&raw.order_date, "OrderDate", line),
        ship_date: date_cell(&raw.ship_date, "ShipDate", line),
        order_id: raw.order_id,
        ship_mode: raw.ship_mode,
        customer_id: raw.customer_id,
        customer_name: raw.customer_name,
        segment: raw.segment,
        product_id: raw.product_id,
        product_name: raw.product_name,
        category: raw.category,
        sub_category: raw.sub_category,
        region: raw.region,
        country: raw.country,
        state: raw.state,
        city: raw.city,
    })
}

/// A date cell that cannot be read becomes a missing date, not a load failure.
fn date_cell(value: &str, column: &str, line: u64) -> Option<NaiveDateTime> {
    if value.is_empty() {
        debug!(line, column, "Empty date cell");
        return None;
    }
    let parsed = parse_date(value);
    if parsed.is_none() {
        warn!(line, column, value, "Unreadable date, treating it as missing");
    }
    parsed
}

/// Parses the date and date-time layouts seen in sales exports.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parses plain or scientific decimal notation.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "OrderID,OrderDate,ShipDate,ShipMode,CustomerID,CustomerName,Segment,\
ProductID,ProductName,Category,SubCategory,Region,Country,State,City,Sales,Profit,Discount,ShippingCost";

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2014, 7, 31).and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(parse_date("2014-07-31"), expected);
        assert_eq!(parse_date("2014-07-31 00:00:00"), expected);
        assert_eq!(parse_date("07/31/2014"), expected);
        assert_eq!(parse_date("31-07-2014"), expected);
        assert_eq!(parse_date("2014-02-30"), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn parses_plain_and_scientific_decimals() {
        assert_eq!(parse_decimal("221.98"), Some(dec!(221.98)));
        assert_eq!(parse_decimal(" -3.5 "), Some(dec!(-3.5)));
        assert_eq!(parse_decimal("1.5e-3"), Some(dec!(0.0015)));
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn columns_are_matched_by_name() {
        // Same columns in a different order, plus an extra derived column.
        let csv = "Sales,Profit,Discount,ShippingCost,OrderYear,OrderID,OrderDate,ShipDate,ShipMode,\
CustomerID,CustomerName,Segment,ProductID,ProductName,Category,SubCategory,Region,Country,State,City\n\
261.96,41.91,0,35.46,2014,CA-2014-1,2014-11-08,2014-11-11,Second Class,CG-12520,Claire Gute,Consumer,\
FUR-BO-1,Bookcase,Furniture,Bookcases,South,United States,Kentucky,Henderson\n";

        let records = load_orders_from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.order_id, "CA-2014-1");
        assert_eq!(r.sales, dec!(261.96));
        assert_eq!(r.shipping_cost, dec!(35.46));
        assert_eq!(r.region, "South");
        assert!(r.order_date.is_some());
    }

    #[test]
    fn bad_dates_become_missing() {
        let csv = format!(
            "{HEADER}\nO1,not-a-date,,First Class,C1,Ann,Consumer,P1,Pen,Office Supplies,Art,West,US,CA,LA,10,2,0,1\n"
        );
        let records = load_orders_from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(records[0].order_date, None);
        assert_eq!(records[0].ship_date, None);
        assert_eq!(records[0].sales, dec!(10));
    }

    #[test]
    fn missing_columns_are_fatal() {
        let csv = "OrderID,OrderDate,Sales\nO1,2014-01-01,10\n";
        let err = load_orders_from_reader(csv.as_bytes(), "inline").unwrap_err();
        match err {
            DatasetError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"ShipDate".to_string()));
                assert!(columns.contains(&"Profit".to_string()));
                assert!(!columns.contains(&"Sales".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_money_is_fatal_with_line_number() {
        let csv = format!(
            "{HEADER}\nO1,2014-01-01,2014-01-02,First Class,C1,Ann,Consumer,P1,Pen,Office Supplies,Art,West,US,CA,LA,10,2,0,1\n\
O2,2014-01-01,2014-01-02,First Class,C1,Ann,Consumer,P1,Pen,Office Supplies,Art,West,US,CA,LA,ten,2,0,1\n"
        );
        let err = load_orders_from_reader(csv.as_bytes(), "inline").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedValue { line: 3, column: "Sales", .. }
        ));
    }

    #[test]
    fn line_numbers_count_multi_line_cells() {
        let csv = format!(
            "{HEADER}\nO1,2014-01-01,2014-01-02,First Class,C1,Ann,Consumer,P1,\"Pen,\nblue\",Office Supplies,Art,West,US,CA,LA,10,2,0,1\n\
O2,2014-01-01,2014-01-02,First Class,C1,Ann,Consumer,P1,Pen,Office Supplies,Art,West,US,CA,LA,10,2,x,1\n"
        );
        let err = load_orders_from_reader(csv.as_bytes(), "inline").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MalformedValue { line: 4, column: "Discount", .. }
        ));
    }

    #[test]
    fn absent_file_is_reported_with_path() {
        let err = load_orders(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
