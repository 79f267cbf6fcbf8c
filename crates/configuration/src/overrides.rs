use crate::settings::Config;
use std::path::PathBuf;

/// Values given on the command line that take precedence over `config.toml`.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Path to the cleaned sales CSV.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub data: Option<PathBuf>,

    /// Keep only these order years (repeatable).
    #[cfg_attr(feature = "clap", arg(long = "year", global = true))]
    pub years: Vec<i32>,

    /// Keep only these regions (repeatable).
    #[cfg_attr(feature = "clap", arg(long = "region", global = true))]
    pub regions: Vec<String>,

    /// Keep only these customer segments (repeatable).
    #[cfg_attr(feature = "clap", arg(long = "segment", global = true))]
    pub segments: Vec<String>,

    /// Rows in the ranked tables.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub top_n: Option<usize>,

    /// Log filter directive, e.g. "debug".
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub log_level: Option<String>,
}

impl Overrides {
    /// Applies every value that was given; an empty list leaves the configured filter alone.
    pub fn apply(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.dataset.path = data.clone();
        }
        if !self.years.is_empty() {
            config.filters.years = Some(self.years.iter().copied().collect());
        }
        if !self.regions.is_empty() {
            config.filters.regions = Some(self.regions.iter().cloned().collect());
        }
        if !self.segments.is_empty() {
            config.filters.segments = Some(self.segments.iter().cloned().collect());
        }
        if let Some(top_n) = self.top_n {
            config.report.top_n = top_n;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
