use crate::error::AnalyticsError;
use crate::report::{GroupKey, Metric, PivotTable, SummaryRow};
use chrono::NaiveDate;
use core_types::{EnrichedRecord, GroupField, GroupValue};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Groups enriched records and computes per-group metrics.
///
/// The aggregator borrows the dataset and never modifies it. Summaries are cached
/// per key selector for the lifetime of the aggregator; build a new one after
/// reloading or re-filtering the data.
#[derive(Debug)]
pub struct Aggregator<'a> {
    records: &'a [EnrichedRecord],
    cache: RefCell<HashMap<Vec<GroupField>, Vec<SummaryRow>>>,
}

impl<'a> Aggregator<'a> {
    pub fn new(records: &'a [EnrichedRecord]) -> Self {
        Self {
            records,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// One `SummaryRow` per distinct key combination present in the data, in key order.
    ///
    /// A record whose value for any of `fields` is missing (e.g. the year-month of an
    /// order without an order date) is left out of every group. An empty selector
    /// yields a single row covering all records, or nothing for an empty dataset.
    ///
    /// Fails with `AnalyticsError::Overflow` when a running total leaves the range of
    /// its type.
    pub fn summarise(&self, fields: &[GroupField]) -> Result<Vec<SummaryRow>, AnalyticsError> {
        if let Some(rows) = self.cache.borrow().get(fields) {
            return Ok(rows.clone());
        }

        let rows = summarise_records(self.records, fields)?;
        self.cache.borrow_mut().insert(fields.to_vec(), rows.clone());
        Ok(rows)
    }

    /// Builds a dense `row_field` × `column_field` matrix of `metric`.
    pub fn pivot(
        &self,
        row_field: GroupField,
        column_field: GroupField,
        metric: Metric,
    ) -> Result<PivotTable, AnalyticsError> {
        if row_field == column_field {
            return Err(AnalyticsError::InvalidPivot(row_field));
        }

        let rows = self.summarise(&[row_field, column_field])?;

        let row_labels: Vec<GroupValue> = rows
            .iter()
            .filter_map(|r| r.key.get(0).cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column_labels: Vec<GroupValue> = rows
            .iter()
            .filter_map(|r| r.key.get(1).cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![None; column_labels.len()]; row_labels.len()];
        for row in &rows {
            let (Some(r), Some(c)) = (row.key.get(0), row.key.get(1)) else {
                continue;
            };
            // Labels come from these same rows, so both lookups succeed.
            if let (Ok(ri), Ok(ci)) = (row_labels.binary_search(r), column_labels.binary_search(c)) {
                cells[ri][ci] = row.metric(metric);
            }
        }

        Ok(PivotTable {
            row_field,
            column_field,
            metric,
            row_labels,
            column_labels,
            cells,
        })
    }
}

/// The `n` highest rows by `metric`.
///
/// The sort is stable, so ties keep their incoming (key) order. Rows where the
/// metric is undefined rank below every defined value.
pub fn top_n(rows: &[SummaryRow], metric: Metric, n: usize) -> Vec<SummaryRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| compare_desc(a.metric(metric), b.metric(metric)));
    ranked.truncate(n);
    ranked
}

/// Groups whose aggregated profit is negative, most negative first.
///
/// The test is on the group total: a single loss-making order does not make a
/// product unprofitable if its lifetime profit is positive.
pub fn unprofitable(rows: &[SummaryRow]) -> Vec<SummaryRow> {
    let mut losing: Vec<SummaryRow> = rows
        .iter()
        .filter(|r| r.profit < Decimal::ZERO)
        .cloned()
        .collect();
    losing.sort_by(|a, b| a.profit.cmp(&b.profit));
    losing
}

fn compare_desc(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn summarise_records(
    records: &[EnrichedRecord],
    fields: &[GroupField],
) -> Result<Vec<SummaryRow>, AnalyticsError> {
    let mut groups: BTreeMap<GroupKey, GroupAccumulator<'_>> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let key: Option<Vec<GroupValue>> = fields.iter().map(|f| record.group_value(*f)).collect();
        match key {
            Some(key) => groups.entry(GroupKey(key)).or_default().add(record)?,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(?fields, skipped, "Records without a value for the grouping key were left out");
    }

    Ok(groups
        .into_iter()
        .map(|(key, acc)| acc.finish(key))
        .collect())
}

/// Running totals for one group.
#[derive(Default)]
struct GroupAccumulator<'r> {
    sales: Decimal,
    profit: Decimal,
    discount: Decimal,
    shipping_cost: Decimal,
    line_count: usize,
    orders: BTreeSet<&'r str>,
    customers: BTreeSet<&'r str>,
    shipping_days_total: i64,
    shipping_days_count: usize,
    late_count: usize,
    late_known_count: usize,
    last_order_date: Option<NaiveDate>,
}

impl<'r> GroupAccumulator<'r> {
    fn add(&mut self, record: &'r EnrichedRecord) -> Result<(), AnalyticsError> {
        let order = &record.order;
        let overflow = |column: &'static str| AnalyticsError::Overflow {
            column,
            order_id: order.order_id.clone(),
        };

        self.sales = self.sales.checked_add(order.sales).ok_or_else(|| overflow("Sales"))?;
        self.profit = self.profit.checked_add(order.profit).ok_or_else(|| overflow("Profit"))?;
        self.discount = self
            .discount
            .checked_add(order.discount)
            .ok_or_else(|| overflow("Discount"))?;
        self.shipping_cost = self
            .shipping_cost
            .checked_add(order.shipping_cost)
            .ok_or_else(|| overflow("ShippingCost"))?;
        self.line_count += 1;
        self.orders.insert(order.order_id.as_str());
        self.customers.insert(order.customer_id.as_str());

        if let Some(days) = record.valid_shipping_days() {
            self.shipping_days_total = self
                .shipping_days_total
                .checked_add(days)
                .ok_or_else(|| overflow("ShippingDays"))?;
            self.shipping_days_count += 1;
        }

        if let Some(late) = record.late_delivery.as_known() {
            self.late_known_count += 1;
            if late {
                self.late_count += 1;
            }
        }

        if let Some(day) = record.order_day() {
            self.last_order_date = Some(self.last_order_date.map_or(day, |d| d.max(day)));
        }
        Ok(())
    }

    fn finish(self, key: GroupKey) -> SummaryRow {
        SummaryRow {
            key,
            margin: self.profit.checked_div(self.sales),
            avg_shipping_days: ratio(Decimal::from(self.shipping_days_total), self.shipping_days_count),
            late_rate: ratio(Decimal::from(self.late_count), self.late_known_count),
            sales: self.sales,
            profit: self.profit,
            discount: self.discount,
            shipping_cost: self.shipping_cost,
            line_count: self.line_count,
            order_count: self.orders.len(),
            customer_count: self.customers.len(),
            shipping_days_total: self.shipping_days_total,
            shipping_days_count: self.shipping_days_count,
            late_count: self.late_count,
            late_known_count: self.late_known_count,
            last_order_date: self.last_order_date,
        }
    }
}

fn ratio(numerator: Decimal, denominator: usize) -> Option<Decimal> {
    if denominator == 0 {
        return None;
    }
    numerator.checked_div(Decimal::from(denominator))
}
