pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{DataIssue, GroupField, GroupValue, LateDelivery};
pub use error::CoreError;
pub use structs::{EnrichedRecord, OrderRecord, year_month_label};
