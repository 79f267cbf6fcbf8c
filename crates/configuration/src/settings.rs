use crate::error::ConfigError;
use features::LateDeliveryRules;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub export: ExportSettings,
    pub report: ReportSettings,
    pub filters: FilterSettings,
    pub late_delivery: LateDeliverySettings,
    pub logging: LoggingSettings,
}

/// Where the cleaned sales file lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub path: PathBuf,
}

/// Where the unprofitable-products export is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub path: PathBuf,
}

/// Sizes of the ranked tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows in the "top customers" and "top sub-categories" tables.
    pub top_n: usize,
    /// Rows of the unprofitable-products table shown on screen. The export is always complete.
    pub unprofitable_preview: usize,
}

/// Default allow-lists. Absent means "everything".
///
/// Each list may also be written as a comma-separated string, which is how
/// `SUPERSTORE__FILTERS__*` environment variables supply them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    #[serde(deserialize_with = "allow_list")]
    pub years: Option<BTreeSet<i32>>,
    #[serde(deserialize_with = "allow_list")]
    pub regions: Option<BTreeSet<String>>,
    #[serde(deserialize_with = "allow_list")]
    pub segments: Option<BTreeSet<String>>,
}

/// The ship-mode threshold table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LateDeliverySettings {
    pub rules: Vec<ShipModeRule>,
}

/// An order shipped with `ship_mode` is late once it takes more than `max_days`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShipModeRule {
    pub ship_mode: String,
    pub max_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `"info"` or `"superstore=debug"`. `RUST_LOG` wins.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

/// Accepts a list, a single value or a comma-separated string.
fn allow_list<'de, D, T>(deserializer: D) -> Result<Option<BTreeSet<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr + Ord,
    T::Err: fmt::Display,
{
    struct AllowList<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for AllowList<T>
    where
        T: Deserialize<'de> + FromStr + Ord,
        T::Err: fmt::Display,
    {
        type Value = BTreeSet<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list or a comma-separated string")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut values = BTreeSet::new();
            while let Some(value) = seq.next_element::<T>()? {
                values.insert(value);
            }
            Ok(values)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<T>().map_err(E::custom))
                .collect()
        }

        // A lone number in an environment variable is parsed before it reaches us.
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            self.visit_str(&v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            self.visit_str(&v.to_string())
        }
    }

    deserializer.deserialize_any(AllowList(PhantomData)).map(Some)
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output/superstore_clean.csv"),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("unprofitable_products_full.csv"),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            unprofitable_preview: 20,
        }
    }
}

impl Default for LateDeliverySettings {
    fn default() -> Self {
        let rules = LateDeliveryRules::default()
            .thresholds()
            .iter()
            .map(|(mode, days)| ShipModeRule {
                ship_mode: mode.clone(),
                max_days: *days,
            })
            .collect();
        Self { rules }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n must be at least 1".to_string(),
            ));
        }
        self.late_delivery.to_rules()?;
        Ok(())
    }
}

impl LateDeliverySettings {
    /// Builds the rule table, rejecting duplicate ship modes.
    pub fn to_rules(&self) -> Result<LateDeliveryRules, ConfigError> {
        let mut table = BTreeMap::new();
        for rule in &self.rules {
            let mode = rule.ship_mode.trim().to_string();
            if table.insert(mode.clone(), rule.max_days).is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "ship mode '{mode}' appears more than once in late_delivery.rules"
                )));
            }
        }
        Ok(LateDeliveryRules::new(table)?)
    }
}
