use core_types::EnrichedRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Allow-lists on order year, region and segment.
///
/// `None` means "no restriction". An empty set lets nothing through. A record with
/// no order year never passes an active year filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub years: Option<BTreeSet<i32>>,
    pub regions: Option<BTreeSet<String>>,
    pub segments: Option<BTreeSet<String>>,
}

impl RecordFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.years.is_none() && self.regions.is_none() && self.segments.is_none()
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        let year_ok = match &self.years {
            Some(years) => record.order_year.is_some_and(|y| years.contains(&y)),
            None => true,
        };
        let region_ok = self
            .regions
            .as_ref()
            .is_none_or(|r| r.contains(&record.order.region));
        let segment_ok = self
            .segments
            .as_ref()
            .is_none_or(|s| s.contains(&record.order.segment));

        year_ok && region_ok && segment_ok
    }

    pub fn apply(&self, records: &[EnrichedRecord]) -> Vec<EnrichedRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
