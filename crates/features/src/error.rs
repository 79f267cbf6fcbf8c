use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Invalid late-delivery threshold for ship mode '{mode}': {days} days")]
    InvalidThreshold { mode: String, days: i64 },

    #[error("The late-delivery rule table is empty")]
    EmptyRuleTable,
}
