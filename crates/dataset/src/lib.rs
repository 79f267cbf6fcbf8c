//! # Sales Dataset Crate
//!
//! The flat-file adapter. It reads the cleaned sales CSV into `OrderRecord`s and
//! writes (and reads back) the unprofitable-products export.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All CSV specifics live here. The logic crates only see typed records.
//! - **Fail loudly:** An absent file, a missing column or an unreadable number stops the
//!   load with a `DatasetError`. Unreadable dates are the exception: they become
//!   missing values so the rest of the row is still usable.
//!
//! ## Public API
//!
//! - `load_orders` / `load_orders_from_reader`: read the input file.
//! - `write_product_rows` / `read_product_rows`: the product-table export.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod export;
pub mod loader;

pub use error::DatasetError;
pub use export::{
    ProductPerformance, read_product_rows, read_product_rows_from, write_product_rows,
    write_product_rows_to,
};
pub use loader::{REQUIRED_COLUMNS, load_orders, load_orders_from_reader, parse_date, parse_decimal};
