use chrono::NaiveDate;

/// Arithmetic mean, or `None` for empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total / count as f64)
}

/// Sum of the values; 0.0 for empty input.
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().sum()
}

pub fn min<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(f64::min)
}

pub fn max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(f64::max)
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_yo_opt(year, 366).is_some()
}

pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}
