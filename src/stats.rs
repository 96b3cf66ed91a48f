use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregation::Scheme;
use crate::aggregation::types::{DailyRecord, FieldValue, SLOTS_PER_DAY};
use crate::table::MetTable;

/// How often a daily field was not a plain computed value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTally {
    pub floored: usize,
    pub substituted: usize,
    pub undefined: usize,
}

/// Summary of one forcing file generation.
#[derive(Debug, Serialize)]
pub struct ForcingReport {
    pub generated_at: DateTime<Utc>,
    pub site: String,
    pub scheme: Scheme,
    pub first_year: i32,
    pub last_year: i32,
    pub fixed_co2: Option<f64>,
    pub rows_written: usize,

    // only fields with at least one non-computed value
    pub fields: BTreeMap<&'static str, FieldTally>,
}

impl ForcingReport {
    pub fn new(
        site: &str,
        scheme: Scheme,
        years: RangeInclusive<i32>,
        fixed_co2: Option<f64>,
    ) -> Self {
        ForcingReport {
            generated_at: Utc::now(),
            site: site.to_string(),
            scheme,
            first_year: *years.start(),
            last_year: *years.end(),
            fixed_co2,
            rows_written: 0,
            fields: BTreeMap::new(),
        }
    }

    /// Tallies the floored, substituted and undefined fields of one day.
    pub fn record_day(&mut self, day: &DailyRecord) {
        for (name, value) in day.fields() {
            match value {
                FieldValue::Floored(_) => self.fields.entry(name).or_default().floored += 1,
                FieldValue::Substituted(_) => {
                    self.fields.entry(name).or_default().substituted += 1
                }
                FieldValue::Undefined => self.fields.entry(name).or_default().undefined += 1,
                FieldValue::Computed(_) | FieldValue::Fixed(_) => {}
            }
        }
    }

    /// Total placeholder values (substituted or undefined) across all fields.
    pub fn placeholder_count(&self) -> usize {
        self.fields
            .values()
            .map(|t| t.substituted + t.undefined)
            .sum()
    }
}

/// A (year, day of year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayKey {
    pub year: i32,
    pub doy: u16,
}

/// Which days of the year range a table covers, and how completely.
#[derive(Debug, Serialize)]
pub struct Coverage {
    pub first_year: i32,
    pub last_year: i32,
    pub rows: usize,
    pub days_present: usize,
    pub complete_days: usize,
    pub incomplete_days: usize,
    pub missing_days: Vec<DayKey>,
}

impl Coverage {
    pub fn from_table(table: &MetTable) -> Self {
        let years = table.year_range();
        let mut s = Coverage {
            first_year: *years.start(),
            last_year: *years.end(),
            rows: table.len(),
            days_present: 0,
            complete_days: 0,
            incomplete_days: 0,
            missing_days: Vec::new(),
        };

        for (year, doy) in table.calendar_days() {
            let slots = table.day(year, doy).len();
            if slots == 0 {
                s.missing_days.push(DayKey { year, doy });
                continue;
            }

            s.days_present += 1;
            if slots == usize::from(SLOTS_PER_DAY) {
                s.complete_days += 1;
            } else {
                s.incomplete_days += 1;
            }
        }

        s
    }

    pub fn pct_complete(&self) -> f64 {
        let total = self.days_present + self.missing_days.len();
        if total == 0 {
            0.0
        } else {
            (self.complete_days as f64 / total as f64) * 100.0
        }
    }
}
