use analytics::{OverviewKpis, PivotTable, SummaryRow};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{GroupField, GroupValue, year_month_label};
use rust_decimal::{Decimal, RoundingStrategy};

const MISSING: &str = "n/a";

/// A column of a summary table.
#[derive(Debug, Clone, Copy)]
pub enum Column {
    Sales,
    Profit,
    Margin,
    Orders,
    Customers,
    AvgShippingDays,
    LateRate,
    LastOrder,
}

impl Column {
    fn header(&self) -> &'static str {
        match self {
            Column::Sales => "Sales",
            Column::Profit => "Profit",
            Column::Margin => "Profit Margin",
            Column::Orders => "Orders",
            Column::Customers => "Customers",
            Column::AvgShippingDays => "Avg Shipping Days",
            Column::LateRate => "Late Rate",
            Column::LastOrder => "Last Order",
        }
    }

    fn cell(&self, row: &SummaryRow) -> String {
        match self {
            Column::Sales => money(row.sales),
            Column::Profit => money(row.profit),
            Column::Margin => percent(row.margin),
            Column::Orders => row.order_count.to_string(),
            Column::Customers => row.customer_count.to_string(),
            Column::AvgShippingDays => days(row.avg_shipping_days),
            Column::LateRate => percent(row.late_rate),
            Column::LastOrder => row
                .last_order_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Money is shown to the cent.
pub fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Ratios are shown as percentages with one decimal place. A ratio too large to
/// scale to a percentage is shown as a plain multiple.
pub fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => match v.checked_mul(Decimal::ONE_HUNDRED) {
            Some(pct) => {
                let pct = pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
                format!("{pct:.1}%")
            }
            None => format!("{v:.1}x"),
        },
        None => MISSING.to_string(),
    }
}

pub fn days(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{:.2}", v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)))
        .unwrap_or_else(|| MISSING.to_string())
}

fn key_cell(field: GroupField, value: &GroupValue) -> String {
    match (field, value) {
        (GroupField::YearMonth, GroupValue::Number(key)) => year_month_label(*key),
        _ => value.to_string(),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn numeric(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn summary_table(fields: &[GroupField], columns: &[Column], rows: &[SummaryRow]) -> Table {
    let mut table = new_table();
    let header: Vec<&str> = fields
        .iter()
        .map(|f| f.column_name())
        .chain(columns.iter().map(|c| c.header()))
        .collect();
    table.set_header(header);

    for row in rows {
        let mut cells: Vec<Cell> = fields
            .iter()
            .zip(row.key.values())
            .map(|(field, value)| Cell::new(key_cell(*field, value)))
            .collect();
        cells.extend(columns.iter().map(|c| numeric(c.cell(row))));
        table.add_row(cells);
    }
    table
}

pub fn kpi_table(kpis: &OverviewKpis) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Total Sales", money(kpis.total_sales)),
        ("Total Profit", money(kpis.total_profit)),
        ("Profit Margin", percent(kpis.margin)),
        ("Number of Orders", kpis.order_count.to_string()),
        ("Customers", kpis.customer_count.to_string()),
        ("Average Shipping Time (days)", days(kpis.avg_shipping_days)),
        ("Late Delivery Rate", percent(kpis.late_rate)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), numeric(value)]);
    }
    table
}

pub fn pivot_table(pivot: &PivotTable) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new(format!(
        "{} \\ {}",
        pivot.row_field.column_name(),
        pivot.column_field.column_name()
    ))];
    header.extend(pivot.column_labels.iter().map(|l| Cell::new(l.to_string())));
    table.set_header(header);

    for (label, cells) in pivot.row_labels.iter().zip(&pivot.cells) {
        let mut row = vec![Cell::new(label.to_string())];
        row.extend(
            cells
                .iter()
                .map(|c| numeric(c.map(money).unwrap_or_else(|| MISSING.to_string()))),
        );
        table.add_row(row);
    }
    table
}
