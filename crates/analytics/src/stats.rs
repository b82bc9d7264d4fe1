//! Pure transforms over per-key statistic maps.

use std::collections::HashMap;

/// Entries sorted descending by value; ties break ascending by key so the
/// order is stable across runs.
pub fn sorted_by_count<V: Copy + Ord>(map: &HashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Entries sorted ascending by key. Keys are ISO `YYYY-MM-DD` strings, so
/// lexicographic order is chronological order.
pub fn sorted_by_date<V: Copy>(map: &HashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// The entry with the maximum value, or `None` for an empty map (rendered
/// as "N/A"). The earliest key wins a tie.
pub fn peak<V: Copy + Ord>(map: &HashMap<String, V>) -> Option<(String, V)> {
    sorted_by_date(map)
        .into_iter()
        .reduce(|max, current| if current.1 > max.1 { current } else { max })
}

/// The maximum value alone, for chart scaling. `None` for an empty map.
pub fn max_value<V: Copy + Ord>(map: &HashMap<String, V>) -> Option<V> {
    map.values().copied().max()
}

/// Arithmetic mean of the values; `0` for an empty map.
pub fn average(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut count: u32 = 0;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 { 0.0 } else { total / f64::from(count) }
}

/// `part` as a percentage of `total`; `0` when `total` is zero — an empty
/// dashboard shows zeros, not errors.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Growth of `current` over `previous` as a percentage; `0` when there is
/// no previous period to compare against.
pub fn growth_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}
