//! In-memory sub-daily met table, indexed by (year, day of year).

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::aggregation::error::AggregateError;
use crate::aggregation::types::{SLOTS_PER_DAY, SubDailyRecord};
use crate::aggregation::utility::days_in_year;

/// Validated sub-daily rows sorted by (year, day of year).
///
/// Rows within a day keep their input order.
#[derive(Debug, Clone)]
pub struct MetTable {
    records: Vec<SubDailyRecord>,
}

impl MetTable {
    pub fn from_records(mut records: Vec<SubDailyRecord>) -> Result<Self, AggregateError> {
        if records.is_empty() {
            return Err(AggregateError::EmptyTable);
        }

        for r in &records {
            if r.half_hour_index >= SLOTS_PER_DAY {
                return Err(AggregateError::InvalidSlot {
                    year: r.year,
                    doy: r.day_of_year,
                    hod: r.half_hour_index,
                });
            }
            if NaiveDate::from_yo_opt(r.year, u32::from(r.day_of_year)).is_none() {
                return Err(AggregateError::InvalidDay {
                    year: r.year,
                    doy: r.day_of_year,
                });
            }
        }

        records.sort_by_key(|r| (r.year, r.day_of_year));

        Ok(Self { records })
    }

    pub fn records(&self) -> &[SubDailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.dedup();
        years
    }

    /// First through last year present in the input.
    pub fn year_range(&self) -> RangeInclusive<i32> {
        let first = self.records.first().map_or(0, |r| r.year);
        let last = self.records.last().map_or(0, |r| r.year);
        first..=last
    }

    /// Rows for one calendar day; empty if the day has no data.
    pub fn day(&self, year: i32, day_of_year: u16) -> &[SubDailyRecord] {
        let key = (year, day_of_year);
        let start = self
            .records
            .partition_point(|r| (r.year, r.day_of_year) < key);
        let end = self
            .records
            .partition_point(|r| (r.year, r.day_of_year) <= key);
        &self.records[start..end]
    }

    /// Every (year, day of year) in the year range, ascending, whether or not
    /// the table has rows for it.
    pub fn calendar_days(&self) -> impl Iterator<Item = (i32, u16)> + '_ {
        self.year_range()
            .flat_map(|year| (1..=days_in_year(year)).map(move |doy| (year, doy)))
    }
}
