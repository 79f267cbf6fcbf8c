use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{source_name}' is missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("'{source_name}' line {line}: column {column} has malformed value '{value}'")]
    MalformedValue {
        source_name: String,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("CSV error in '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Expected a summary key of {expected} values, found {found}")]
    UnexpectedKey { expected: usize, found: usize },
}
