use crate::error::FeatureError;
use core_types::LateDelivery;
use std::collections::BTreeMap;

/// Maps a ship mode to the maximum number of shipping days before an order counts as late.
///
/// The thresholds are business rules, so they live in a table rather than in code.
/// A mode with no entry is reported as `LateDelivery::UnknownMode`.
/// Only `new` and `Default` construct one: every table is non-empty with no
/// negative threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateDeliveryRules {
    thresholds: BTreeMap<String, i64>,
}

impl LateDeliveryRules {
    /// Builds a rule table, rejecting negative thresholds and empty tables.
    pub fn new(thresholds: BTreeMap<String, i64>) -> Result<Self, FeatureError> {
        if thresholds.is_empty() {
            return Err(FeatureError::EmptyRuleTable);
        }
        if let Some((mode, days)) = thresholds.iter().find(|(_, days)| **days < 0) {
            return Err(FeatureError::InvalidThreshold {
                mode: mode.clone(),
                days: *days,
            });
        }
        Ok(Self { thresholds })
    }

    pub fn threshold(&self, ship_mode: &str) -> Option<i64> {
        self.thresholds.get(ship_mode.trim()).copied()
    }

    pub fn thresholds(&self) -> &BTreeMap<String, i64> {
        &self.thresholds
    }

    /// Classifies one order. Missing or negative shipping days take precedence over
    /// the ship-mode lookup; a threshold is inclusive on the on-time side.
    pub fn classify(&self, ship_mode: &str, shipping_days: Option<i64>) -> LateDelivery {
        let Some(days) = shipping_days else {
            return LateDelivery::MissingDates;
        };
        if days < 0 {
            return LateDelivery::InvalidDates;
        }
        match self.threshold(ship_mode) {
            Some(max_days) if days > max_days => LateDelivery::Late,
            Some(_) => LateDelivery::OnTime,
            None => LateDelivery::UnknownMode,
        }
    }
}

impl Default for LateDeliveryRules {
    fn default() -> Self {
        let thresholds = [
            ("First Class", 2),
            ("Second Class", 4),
            ("Standard Class", 7),
        ]
        .into_iter()
        .map(|(mode, days)| (mode.to_string(), days))
        .collect();
        Self { thresholds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_class_boundary_is_inclusive_on_time() {
        let rules = LateDeliveryRules::default();
        assert_eq!(rules.classify("First Class", Some(2)), LateDelivery::OnTime);
        assert_eq!(rules.classify("First Class", Some(3)), LateDelivery::Late);
    }

    #[test]
    fn default_table_matches_standard_thresholds() {
        let rules = LateDeliveryRules::default();
        assert_eq!(rules.threshold("First Class"), Some(2));
        assert_eq!(rules.threshold("Second Class"), Some(4));
        assert_eq!(rules.threshold("Standard Class"), Some(7));
        assert_eq!(rules.threshold("Same Day"), None);
    }

    #[test]
    fn unknown_mode_is_never_on_time_or_late() {
        let rules = LateDeliveryRules::default();
        assert_eq!(rules.classify("Same Day", Some(0)), LateDelivery::UnknownMode);
        assert_eq!(rules.classify("Same Day", Some(30)), LateDelivery::UnknownMode);
    }

    #[test]
    fn date_problems_win_over_mode_lookup() {
        let rules = LateDeliveryRules::default();
        assert_eq!(rules.classify("Standard Class", None), LateDelivery::MissingDates);
        assert_eq!(rules.classify("Standard Class", Some(-3)), LateDelivery::InvalidDates);
        assert_eq!(rules.classify("Same Day", None), LateDelivery::MissingDates);
    }

    #[test]
    fn new_modes_are_data() {
        let mut table = LateDeliveryRules::default().thresholds().clone();
        table.insert("Same Day".to_string(), 0);
        let rules = LateDeliveryRules::new(table).unwrap();
        assert_eq!(rules.classify("Same Day", Some(1)), LateDelivery::Late);
        assert_eq!(rules.classify("Same Day", Some(0)), LateDelivery::OnTime);
    }

    #[test]
    fn default_table_passes_the_same_checks_as_new() {
        let default = LateDeliveryRules::default();
        let rebuilt = LateDeliveryRules::new(default.thresholds().clone()).unwrap();
        assert_eq!(rebuilt, default);
    }

    #[test]
    fn rejects_negative_and_empty_tables() {
        let mut table = BTreeMap::new();
        assert!(matches!(
            LateDeliveryRules::new(table.clone()),
            Err(FeatureError::EmptyRuleTable)
        ));
        table.insert("Drone".to_string(), -1);
        assert!(matches!(
            LateDeliveryRules::new(table),
            Err(FeatureError::InvalidThreshold { days: -1, .. })
        ));
    }
}
