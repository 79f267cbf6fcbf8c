use crate::error::DatasetError;
use crate::loader::parse_decimal;
use analytics::{PRODUCT_KEY, SummaryRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// One line of the unprofitable-products export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "SubCategory")]
    pub sub_category: String,
    #[serde(rename = "Sales")]
    pub sales: Decimal,
    #[serde(rename = "Profit")]
    pub profit: Decimal,
    /// Empty in the file when undefined.
    #[serde(rename = "ProfitMargin")]
    pub profit_margin: Option<Decimal>,
}

impl TryFrom<&SummaryRow> for ProductPerformance {
    type Error = DatasetError;

    /// Expects a row keyed by `analytics::PRODUCT_KEY`.
    fn try_from(row: &SummaryRow) -> Result<Self, Self::Error> {
        let [product_id, product_name, category, sub_category] = row.key.values() else {
            return Err(DatasetError::UnexpectedKey {
                expected: PRODUCT_KEY.len(),
                found: row.key.values().len(),
            });
        };
        Ok(Self {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sales: row.sales,
            profit: row.profit,
            profit_margin: row.margin,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawProductRow {
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "ProductName")]
    product_name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "SubCategory")]
    sub_category: String,
    #[serde(rename = "Sales")]
    sales: String,
    #[serde(rename = "Profit")]
    profit: String,
    #[serde(rename = "ProfitMargin")]
    profit_margin: String,
}

/// Writes product rows to `path`, returning how many were written.
pub fn write_product_rows(path: &Path, rows: &[SummaryRow]) -> Result<usize, DatasetError> {
    let file = File::create(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_product_rows_to(file, rows, &path.display().to_string())?;
    info!(path = %path.display(), rows = written, "Exported product table");
    Ok(written)
}

pub fn write_product_rows_to<W: Write>(
    writer: W,
    rows: &[SummaryRow],
    target_name: &str,
) -> Result<usize, DatasetError> {
    let csv_error = |source| DatasetError::Csv {
        source_name: target_name.to_string(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(ProductPerformance::try_from(row)?)
            .map_err(csv_error)?;
    }
    csv_writer
        .flush()
        .map_err(|e| csv_error(csv::Error::from(e)))?;
    Ok(rows.len())
}

/// Reads back a file written by `write_product_rows`.
pub fn read_product_rows(path: &Path) -> Result<Vec<ProductPerformance>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_product_rows_from(file, &path.display().to_string())
}

pub fn read_product_rows_from<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<ProductPerformance>, DatasetError> {
    let csv_error = |source| DatasetError::Csv {
        source_name: source_name.to_string(),
        source,
    };
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let mut rows = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let raw: RawProductRow = record.deserialize(Some(&headers)).map_err(csv_error)?;
        let number = |column: &'static str, value: &str| {
            parse_decimal(value).ok_or_else(|| DatasetError::MalformedValue {
                source_name: source_name.to_string(),
                line,
                column,
                value: value.to_string(),
            })
        };

        let profit_margin = if raw.profit_margin.trim().is_empty() {
            None
        } else {
            Some(number("ProfitMargin", &raw.profit_margin)?)
        };
        rows.push(ProductPerformance {
            sales: number("Sales", &raw.sales)?,
            profit: number("Profit", &raw.profit)?,
            profit_margin,
            product_id: raw.product_id,
            product_name: raw.product_name,
            category: raw.category,
            sub_category: raw.sub_category,
        });
    }

    Ok(rows)
}
