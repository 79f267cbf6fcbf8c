//! # Sales Analytics Engine
//!
//! Groups enriched order records and computes business metrics: totals, margins,
//! shipping-time statistics, rankings, pivots and loss-making product lists.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files or
//!   terminals. It depends only on `core-types` (Layer 0).
//! - **Ratios from sums:** Every ratio in a `SummaryRow` is computed from the group's
//!   sums and counts. Undefined ratios are `None`, never zero.
//!
//! ## Public API
//!
//! - `Aggregator`: groups records by one or more `GroupField`s and builds the views.
//! - `SummaryRow`, `OverviewKpis`, `PivotTable`: plain result tables.
//! - `RecordFilter`: year / region / segment allow-lists.
//! - `top_n`, `unprofitable`: selections over summary rows.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod filter;
pub mod report;
pub mod views;

#[cfg(test)]
mod testing;

pub use engine::{Aggregator, top_n, unprofitable};
pub use error::AnalyticsError;
pub use filter::RecordFilter;
pub use report::{GroupKey, Metric, OverviewKpis, PivotTable, SummaryRow};
pub use views::{CATEGORY_KEY, CUSTOMER_KEY, PRODUCT_KEY};
