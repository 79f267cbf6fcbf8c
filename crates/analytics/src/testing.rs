//! Record builders shared by this crate's unit tests.

use chrono::NaiveDate;
use core_types::{EnrichedRecord, LateDelivery, OrderRecord};
use rust_decimal::Decimal;

pub(crate) fn record(order_id: &str, region: &str, sales: Decimal, profit: Decimal) -> EnrichedRecord {
    record_with(order_id, region, |r| {
        r.order.sales = sales;
        r.order.profit = profit;
        r.profit_margin = profit.checked_div(sales);
    })
}

pub(crate) fn record_with(
    order_id: &str,
    region: &str,
    edit: impl FnOnce(&mut EnrichedRecord),
) -> EnrichedRecord {
    let order_date = NaiveDate::from_ymd_opt(2014, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    let ship_date = NaiveDate::from_ymd_opt(2014, 3, 3).and_then(|d| d.and_hms_opt(0, 0, 0));
    let mut record = EnrichedRecord {
        order: OrderRecord {
            order_id: order_id.to_string(),
            order_date,
            ship_date,
            ship_mode: "Second Class".to_string(),
            customer_id: "CG-12520".to_string(),
            customer_name: "Claire Gute".to_string(),
            segment: "Consumer".to_string(),
            product_id: "FUR-BO-10001798".to_string(),
            product_name: "Bush Somerset Collection Bookcase".to_string(),
            category: "Furniture".to_string(),
            sub_category: "Bookcases".to_string(),
            region: region.to_string(),
            country: "United States".to_string(),
            state: "Kentucky".to_string(),
            city: "Henderson".to_string(),
            sales: Decimal::ONE_HUNDRED,
            profit: Decimal::TEN,
            discount: Decimal::ZERO,
            shipping_cost: Decimal::ONE,
        },
        order_year: Some(2014),
        order_month: Some(3),
        year_month: Some(201_403),
        profit_margin: Some(Decimal::new(1, 1)),
        shipping_days: Some(2),
        late_delivery: LateDelivery::OnTime,
        issues: Vec::new(),
    };
    edit(&mut record);
    record
}
