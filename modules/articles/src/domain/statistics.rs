//! Turns sparse per-day counts into a dense series over a date window.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::contract::DailyCount;

/// One entry per day in `[start, end]`, ascending; days absent from `counts`
/// get zero. Entries outside the window are ignored. For a repeated date the
/// first occurrence wins. `start > end` yields an empty series.
pub fn fill_missing_dates(counts: &[DailyCount], start: NaiveDate, end: NaiveDate) -> Vec<DailyCount> {
    let mut by_date: HashMap<NaiveDate, u64> = HashMap::with_capacity(counts.len());
    for c in counts {
        if by_date.contains_key(&c.date) {
            warn!(date = %c.date, "Duplicate daily count ignored");
            continue;
        }
        by_date.insert(c.date, c.count);
    }

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| DailyCount::new(date, by_date.get(&date).copied().unwrap_or(0)))
        .collect()
}
