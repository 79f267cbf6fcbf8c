//! # Feature Engineering
//!
//! Turns raw `OrderRecord`s into `EnrichedRecord`s: calendar fields, profit margin,
//! shipping days and a late-delivery outcome.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate that depends only on `core-types`.
//! - **Stateless Calculation:** `FeatureEngineer` never mutates its input and gives
//!   the same output for the same input. Problems in the data become `DataIssue`s on
//!   the enriched record; nothing here returns an error for bad rows.
//!
//! ## Public API
//!
//! - `FeatureEngineer`: the enrichment pass.
//! - `LateDeliveryRules`: the ship-mode threshold table.
//! - `FeatureError`: errors raised when building a rule table.

pub mod calendar;
pub mod engineer;
pub mod error;
pub mod rules;

pub use engineer::{FeatureEngineer, IssueCounts, profit_margin};
pub use error::FeatureError;
pub use rules::LateDeliveryRules;
