use crate::calendar::{shipping_days, year_month_key};
use crate::rules::LateDeliveryRules;
use chrono::Datelike;
use core_types::{DataIssue, EnrichedRecord, LateDelivery, OrderRecord};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// A stateless transform from raw order rows to enriched rows.
///
/// The only state is the late-delivery rule table, which is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngineer {
    rules: LateDeliveryRules,
}

/// Counts of data-quality issues seen during one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub missing_order_date: usize,
    pub missing_ship_date: usize,
    pub ship_before_order: usize,
    pub unknown_ship_mode: usize,
}

impl IssueCounts {
    pub fn total(&self) -> usize {
        self.missing_order_date + self.missing_ship_date + self.ship_before_order + self.unknown_ship_mode
    }

    fn record(&mut self, issue: &DataIssue) {
        match issue {
            DataIssue::MissingOrderDate => self.missing_order_date += 1,
            DataIssue::MissingShipDate => self.missing_ship_date += 1,
            DataIssue::ShipBeforeOrder { .. } => self.ship_before_order += 1,
            DataIssue::UnknownShipMode(_) => self.unknown_ship_mode += 1,
        }
    }
}

impl FeatureEngineer {
    pub fn new(rules: LateDeliveryRules) -> Self {
        Self { rules }
    }

    /// Enriches every record, preserving order and length.
    pub fn enrich(&self, records: &[OrderRecord]) -> Vec<EnrichedRecord> {
        let enriched: Vec<EnrichedRecord> = records.iter().map(|r| self.enrich_one(r)).collect();

        let counts = Self::count_issues(&enriched);
        if counts.total() > 0 {
            warn!(
                records = enriched.len(),
                missing_order_date = counts.missing_order_date,
                missing_ship_date = counts.missing_ship_date,
                ship_before_order = counts.ship_before_order,
                unknown_ship_mode = counts.unknown_ship_mode,
                "Data-quality issues found while enriching records"
            );
        } else {
            debug!(records = enriched.len(), "Enriched records without data-quality issues");
        }

        enriched
    }

    pub fn enrich_one(&self, record: &OrderRecord) -> EnrichedRecord {
        let mut issues = Vec::new();

        if record.order_date.is_none() {
            issues.push(DataIssue::MissingOrderDate);
        }
        if record.ship_date.is_none() {
            issues.push(DataIssue::MissingShipDate);
        }

        let days = match (record.order_date, record.ship_date) {
            (Some(order), Some(ship)) => Some(shipping_days(order, ship)),
            _ => None,
        };
        if let Some(d) = days.filter(|d| *d < 0) {
            issues.push(DataIssue::ShipBeforeOrder { days: d });
        }

        if self.rules.threshold(&record.ship_mode).is_none() {
            issues.push(DataIssue::UnknownShipMode(record.ship_mode.clone()));
        }

        let late_delivery: LateDelivery = self.rules.classify(&record.ship_mode, days);

        EnrichedRecord {
            order_year: record.order_date.map(|d| d.year()),
            order_month: record.order_date.map(|d| d.month()),
            year_month: record.order_date.and_then(year_month_key),
            profit_margin: profit_margin(record.profit, record.sales),
            shipping_days: days,
            late_delivery,
            issues,
            order: record.clone(),
        }
    }

    pub fn count_issues(records: &[EnrichedRecord]) -> IssueCounts {
        let mut counts = IssueCounts::default();
        for issue in records.iter().flat_map(|r| r.issues.iter()) {
            counts.record(issue);
        }
        counts
    }
}

/// `profit / sales`, or `None` when sales is zero.
pub fn profit_margin(profit: Decimal, sales: Decimal) -> Option<Decimal> {
    profit.checked_div(sales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    fn order(mode: &str, ordered: Option<NaiveDateTime>, shipped: Option<NaiveDateTime>) -> OrderRecord {
        OrderRecord {
            order_id: "US-2014-100".to_string(),
            order_date: ordered,
            ship_date: shipped,
            ship_mode: mode.to_string(),
            customer_id: "AA-10315".to_string(),
            customer_name: "Alex Avila".to_string(),
            segment: "Consumer".to_string(),
            product_id: "OFF-PA-1".to_string(),
            product_name: "Xerox 1967".to_string(),
            category: "Office Supplies".to_string(),
            sub_category: "Paper".to_string(),
            region: "Central".to_string(),
            country: "United States".to_string(),
            state: "Texas".to_string(),
            city: "Houston".to_string(),
            sales: dec!(100),
            profit: dec!(25),
            discount: dec!(0.2),
            shipping_cost: dec!(4.5),
        }
    }

    #[test]
    fn derives_calendar_and_margin_fields() {
        let engineer = FeatureEngineer::default();
        let r = engineer.enrich_one(&order("Second Class", date(2014, 3, 1), date(2014, 3, 4)));

        assert_eq!(r.order_year, Some(2014));
        assert_eq!(r.order_month, Some(3));
        assert_eq!(r.year_month, Some(201_403));
        assert_eq!(r.profit_margin, Some(dec!(0.25)));
        assert_eq!(r.shipping_days, Some(3));
        assert_eq!(r.late_delivery, LateDelivery::OnTime);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn zero_sales_margin_is_missing() {
        let mut raw = order("First Class", date(2014, 3, 1), date(2014, 3, 2));
        raw.sales = Decimal::ZERO;
        raw.profit = dec!(-3);
        let r = FeatureEngineer::default().enrich_one(&raw);
        assert_eq!(r.profit_margin, None);
    }

    #[test]
    fn ship_before_order_is_flagged_not_clamped() {
        let r = FeatureEngineer::default()
            .enrich_one(&order("Standard Class", date(2014, 3, 5), date(2014, 3, 1)));
        assert_eq!(r.shipping_days, Some(-4));
        assert_eq!(r.late_delivery, LateDelivery::InvalidDates);
        assert_eq!(r.issues, vec![DataIssue::ShipBeforeOrder { days: -4 }]);
    }

    #[test]
    fn missing_dates_keep_record_but_clear_derived_fields() {
        let r = FeatureEngineer::default().enrich_one(&order("First Class", None, date(2014, 3, 1)));
        assert_eq!(r.order_year, None);
        assert_eq!(r.year_month, None);
        assert_eq!(r.shipping_days, None);
        assert_eq!(r.late_delivery, LateDelivery::MissingDates);
        assert_eq!(r.profit_margin, Some(dec!(0.25)));
        assert_eq!(r.issues, vec![DataIssue::MissingOrderDate]);
    }

    #[test]
    fn unknown_mode_is_reported() {
        let r = FeatureEngineer::default()
            .enrich_one(&order("Same Day", date(2014, 3, 1), date(2014, 3, 1)));
        assert_eq!(r.late_delivery, LateDelivery::UnknownMode);
        assert_eq!(r.issues, vec![DataIssue::UnknownShipMode("Same Day".to_string())]);
    }

    #[test]
    fn enrich_preserves_length_order_and_input() {
        let input = vec![
            order("First Class", date(2014, 1, 1), date(2014, 1, 4)),
            order("Same Day", None, None),
            order("Second Class", date(2015, 6, 1), date(2015, 6, 2)),
        ];
        let snapshot = input.clone();
        let engineer = FeatureEngineer::default();

        let first = engineer.enrich(&input);
        let second = engineer.enrich(&input);

        assert_eq!(input, snapshot);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].late_delivery, LateDelivery::Late);
        assert_eq!(first[2].year_month, Some(201_506));

        let counts = FeatureEngineer::count_issues(&first);
        assert_eq!(counts.missing_order_date, 1);
        assert_eq!(counts.missing_ship_date, 1);
        assert_eq!(counts.unknown_ship_mode, 1);
        assert_eq!(counts.total(), 3);
    }
}
