use chrono::{Datelike, NaiveDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

/// `year * 100 + month`, sortable without parsing a label.
pub fn year_month_key(date: NaiveDateTime) -> Option<u32> {
    let year = u32::try_from(date.year()).ok()?;
    Some(year * 100 + date.month())
}

/// Whole days from `order` to `ship`, rounded toward negative infinity.
///
/// A ship time twelve hours before the order time is `-1`, not `0`.
pub fn shipping_days(order: NaiveDateTime, ship: NaiveDateTime) -> i64 {
    (ship - order).num_seconds().div_euclid(SECONDS_PER_DAY)
}
