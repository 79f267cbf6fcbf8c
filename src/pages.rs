//! The three dashboard pages, assembled from `Aggregator` views.
//!
//! Each page is a plain serializable struct so it can be printed as tables or JSON.

use crate::render::{Column, kpi_table, pivot_table, summary_table};
use analytics::{
    Aggregator, AnalyticsError, CATEGORY_KEY, CUSTOMER_KEY, OverviewKpis, PRODUCT_KEY, PivotTable,
    SummaryRow,
};
use core_types::GroupField;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OverviewPage {
    pub kpis: OverviewKpis,
    pub monthly_trend: Vec<SummaryRow>,
    pub regions: Vec<SummaryRow>,
}

impl OverviewPage {
    pub fn build(aggregator: &Aggregator<'_>) -> Result<Self, AnalyticsError> {
        Ok(Self {
            kpis: aggregator.overview()?,
            monthly_trend: aggregator.monthly_trend()?,
            regions: aggregator.region_summary()?,
        })
    }

    pub fn print(&self) {
        println!("Executive Overview");
        println!("{}", kpi_table(&self.kpis));
        println!("\nSales Over Time (Monthly)");
        println!(
            "{}",
            summary_table(&[GroupField::YearMonth], &[Column::Sales, Column::Profit], &self.monthly_trend)
        );
        println!("\nSales by Region");
        println!(
            "{}",
            summary_table(
                &[GroupField::Region],
                &[Column::Sales, Column::Profit, Column::Margin],
                &self.regions
            )
        );
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub categories_by_profit: Vec<SummaryRow>,
    pub top_sub_categories: Vec<SummaryRow>,
    pub category_sub_category: Vec<SummaryRow>,
    pub profit_by_category_and_region: PivotTable,
    /// The first rows of the unprofitable list; `unprofitable_total` counts all of them.
    pub unprofitable_preview: Vec<SummaryRow>,
    pub unprofitable_total: usize,
}

impl ProductsPage {
    pub fn build(
        aggregator: &Aggregator<'_>,
        top_n: usize,
        preview: usize,
    ) -> Result<Self, AnalyticsError> {
        let unprofitable = aggregator.unprofitable_products()?;
        Ok(Self {
            categories_by_profit: aggregator.category_profit_ranking()?,
            top_sub_categories: aggregator.top_sub_categories_by_profit(top_n)?,
            category_sub_category: aggregator.category_summary()?,
            profit_by_category_and_region: aggregator.profit_by_category_and_region()?,
            unprofitable_total: unprofitable.len(),
            unprofitable_preview: unprofitable.into_iter().take(preview).collect(),
        })
    }

    pub fn print(&self) {
        println!("Total Profit by Category");
        println!(
            "{}",
            summary_table(&[GroupField::Category], &[Column::Profit], &self.categories_by_profit)
        );
        println!("\nTop {} SubCategories by Profit", self.top_sub_categories.len());
        println!(
            "{}",
            summary_table(&[GroupField::SubCategory], &[Column::Profit], &self.top_sub_categories)
        );
        println!("\nCategory and SubCategory Performance");
        println!(
            "{}",
            summary_table(
                &CATEGORY_KEY,
                &[Column::Sales, Column::Profit, Column::Margin],
                &self.category_sub_category
            )
        );
        println!("\nProfit by Category and Region");
        println!("{}", pivot_table(&self.profit_by_category_and_region));
        println!(
            "\nUnprofitable Products (Total Profit < 0): showing {} of {}",
            self.unprofitable_preview.len(),
            self.unprofitable_total
        );
        println!(
            "{}",
            summary_table(
                &PRODUCT_KEY,
                &[Column::Sales, Column::Profit, Column::Margin],
                &self.unprofitable_preview
            )
        );
    }
}

#[derive(Debug, Serialize)]
pub struct CustomersPage {
    pub top_customers: Vec<SummaryRow>,
    pub segments: Vec<SummaryRow>,
    pub shipping: OverviewKpis,
    pub ship_modes: Vec<SummaryRow>,
}

impl CustomersPage {
    pub fn build(aggregator: &Aggregator<'_>, top_n: usize) -> Result<Self, AnalyticsError> {
        Ok(Self {
            top_customers: aggregator.top_customers_by_sales(top_n)?,
            segments: aggregator.segment_summary()?,
            shipping: aggregator.overview()?,
            ship_modes: aggregator.ship_mode_summary()?,
        })
    }

    pub fn print(&self) {
        println!("Top {} Customers by Sales", self.top_customers.len());
        println!(
            "{}",
            summary_table(
                &CUSTOMER_KEY,
                &[Column::Sales, Column::Profit, Column::Margin, Column::Orders, Column::LastOrder],
                &self.top_customers
            )
        );
        println!("\nPerformance by Customer Segment");
        println!(
            "{}",
            summary_table(
                &[GroupField::Segment],
                &[Column::Sales, Column::Profit, Column::Margin, Column::Orders, Column::Customers],
                &self.segments
            )
        );
        println!(
            "\nAverage Shipping Time (days): {}    Late Delivery Rate: {}",
            crate::render::days(self.shipping.avg_shipping_days),
            crate::render::percent(self.shipping.late_rate)
        );
        println!("\nShipping by Ship Mode");
        println!(
            "{}",
            summary_table(
                &[GroupField::ShipMode],
                &[Column::AvgShippingDays, Column::Orders, Column::LateRate],
                &self.ship_modes
            )
        );
    }
}
