use core_types::GroupField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Unknown metric: '{0}'")]
    UnknownMetric(String),

    #[error("A pivot needs two different fields, got {0:?} twice")]
    InvalidPivot(GroupField),

    #[error("{column} total overflowed while adding order '{order_id}'")]
    Overflow { column: &'static str, order_id: String },
}
