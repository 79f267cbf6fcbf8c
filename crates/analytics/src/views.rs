use crate::engine::{Aggregator, top_n, unprofitable};
use crate::error::AnalyticsError;
use crate::report::{Metric, OverviewKpis, PivotTable, SummaryRow};
use core_types::GroupField;

/// Key of the product performance table.
pub const PRODUCT_KEY: [GroupField; 4] = [
    GroupField::ProductId,
    GroupField::ProductName,
    GroupField::Category,
    GroupField::SubCategory,
];

/// Key of the customer performance table.
pub const CUSTOMER_KEY: [GroupField; 3] = [
    GroupField::CustomerId,
    GroupField::CustomerName,
    GroupField::Segment,
];

/// Key of the category / sub-category table.
pub const CATEGORY_KEY: [GroupField; 2] = [GroupField::Category, GroupField::SubCategory];

/// The standard dashboard views, built on `Aggregator::summarise`.
impl Aggregator<'_> {
    pub fn overview(&self) -> Result<OverviewKpis, AnalyticsError> {
        Ok(self
            .summarise(&[])?
            .first()
            .map(OverviewKpis::from)
            .unwrap_or_default())
    }

    /// Monthly totals in chronological order. Orders without a date are left out.
    pub fn monthly_trend(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&[GroupField::YearMonth])
    }

    pub fn region_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&[GroupField::Region])
    }

    pub fn segment_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&[GroupField::Segment])
    }

    pub fn ship_mode_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&[GroupField::ShipMode])
    }

    pub fn category_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&CATEGORY_KEY)
    }

    pub fn customer_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&CUSTOMER_KEY)
    }

    pub fn product_summary(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        self.summarise(&PRODUCT_KEY)
    }

    /// Categories ranked by total profit, highest first.
    pub fn category_profit_ranking(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        let rows = self.summarise(&[GroupField::Category])?;
        Ok(top_n(&rows, Metric::Profit, rows.len()))
    }

    pub fn top_sub_categories_by_profit(&self, n: usize) -> Result<Vec<SummaryRow>, AnalyticsError> {
        Ok(top_n(&self.summarise(&[GroupField::SubCategory])?, Metric::Profit, n))
    }

    pub fn top_customers_by_sales(&self, n: usize) -> Result<Vec<SummaryRow>, AnalyticsError> {
        Ok(top_n(&self.customer_summary()?, Metric::Sales, n))
    }

    /// Every product whose lifetime profit is negative, most negative first.
    pub fn unprofitable_products(&self) -> Result<Vec<SummaryRow>, AnalyticsError> {
        Ok(unprofitable(&self.product_summary()?))
    }

    pub fn profit_by_category_and_region(&self) -> Result<PivotTable, AnalyticsError> {
        self.pivot(GroupField::Category, GroupField::Region, Metric::Profit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, record_with};
    use core_types::GroupValue;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn overview_totals_the_dataset() {
        let data = vec![
            record("O1", "West", dec!(100), dec!(20)),
            record("O1", "West", dec!(50), dec!(-5)),
            record("O2", "East", dec!(50), dec!(5)),
        ];
        let kpis = Aggregator::new(&data).overview().unwrap();

        assert_eq!(kpis.total_sales, dec!(200));
        assert_eq!(kpis.total_profit, dec!(20));
        assert_eq!(kpis.margin, Some(dec!(0.1)));
        assert_eq!(kpis.order_count, 2);
        assert_eq!(kpis.line_count, 3);
    }

    #[test]
    fn overview_of_nothing_is_empty() {
        let kpis = Aggregator::new(&[]).overview().unwrap();
        assert_eq!(kpis, OverviewKpis::default());
        assert_eq!(kpis.margin, None);
        assert_eq!(kpis.late_rate, None);
    }

    #[test]
    fn monthly_trend_is_chronological() {
        let data = vec![
            record_with("O1", "West", |r| r.year_month = Some(201_501)),
            record_with("O2", "West", |r| r.year_month = Some(201_409)),
            record_with("O3", "West", |r| r.year_month = Some(201_410)),
        ];
        let months: Vec<GroupValue> = Aggregator::new(&data)
            .monthly_trend()
            .unwrap()
            .into_iter()
            .map(|r| r.key.0[0].clone())
            .collect();
        assert_eq!(
            months,
            vec![
                GroupValue::Number(201_409),
                GroupValue::Number(201_410),
                GroupValue::Number(201_501)
            ]
        );
    }

    #[test]
    fn category_ranking_is_by_profit() {
        let data = vec![
            record_with("O1", "West", |r| {
                r.order.category = "Furniture".to_string();
                r.order.profit = dec!(2);
            }),
            record_with("O2", "West", |r| {
                r.order.category = "Technology".to_string();
                r.order.profit = dec!(40);
            }),
            record_with("O3", "West", |r| {
                r.order.category = "Office Supplies".to_string();
                r.order.profit = dec!(12);
            }),
        ];
        let names: Vec<String> = Aggregator::new(&data)
            .category_profit_ranking()
            .unwrap()
            .iter()
            .map(|r| r.key.to_string())
            .collect();
        assert_eq!(names, vec!["Technology", "Office Supplies", "Furniture"]);
    }

    #[test]
    fn customer_summary_tracks_last_order_date() {
        let late_order = chrono::NaiveDate::from_ymd_opt(2015, 7, 9)
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        let data = vec![
            record("O1", "West", dec!(10), dec!(1)),
            record_with("O2", "West", |r| r.order.order_date = late_order),
        ];
        let rows = Aggregator::new(&data).customer_summary().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.0.len(), CUSTOMER_KEY.len());
        assert_eq!(rows[0].last_order_date, late_order.map(|d| d.date()));
    }

    #[test]
    fn unprofitable_products_keep_full_product_key() {
        let data = vec![
            record_with("O1", "West", |r| r.order.profit = dec!(-5)),
            record_with("O2", "West", |r| r.order.profit = dec!(10)),
            record_with("O3", "West", |r| {
                r.order.product_id = "TEC-PH-1".to_string();
                r.order.profit = dec!(-1);
            }),
        ];
        let losing = Aggregator::new(&data).unprofitable_products().unwrap();
        assert_eq!(losing.len(), 1);
        assert_eq!(losing[0].key.0[0], GroupValue::from("TEC-PH-1"));
        assert_eq!(losing[0].key.0.len(), PRODUCT_KEY.len());
        assert!(losing[0].profit < Decimal::ZERO);
    }
}
