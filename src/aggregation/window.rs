//! Morning and afternoon windows over a day's half-hour slots.

use std::ops::Range;

use crate::aggregation::types::SubDailyRecord;

/// A named, contiguous range of half-hour indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfHourWindow {
    name: &'static str,
    slots: Range<u8>,
}

/// Midnight up to noon (slots 0-23).
pub const MORNING: HalfHourWindow = HalfHourWindow::new("morning", 0..24);

/// Noon up to 18:30 (slots 24-36). Later slots only count toward whole-day values.
pub const AFTERNOON: HalfHourWindow = HalfHourWindow::new("afternoon", 24..37);

impl HalfHourWindow {
    pub const fn new(name: &'static str, slots: Range<u8>) -> Self {
        Self { name, slots }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contains(&self, half_hour_index: u8) -> bool {
        self.slots.contains(&half_hour_index)
    }
}

/// One day's rows, with the morning and afternoon subsets picked out.
#[derive(Debug)]
pub struct DayWindows<'a> {
    pub morning: Vec<&'a SubDailyRecord>,
    pub afternoon: Vec<&'a SubDailyRecord>,
}

impl<'a> DayWindows<'a> {
    pub fn split(
        day: &'a [SubDailyRecord],
        morning: &HalfHourWindow,
        afternoon: &HalfHourWindow,
    ) -> Self {
        let pick = |window: &HalfHourWindow| {
            day.iter()
                .filter(|r| window.contains(r.half_hour_index))
                .collect::<Vec<_>>()
        };
        Self {
            morning: pick(morning),
            afternoon: pick(afternoon),
        }
    }

    /// Morning rows followed by afternoon rows.
    pub fn daytime(&self) -> impl Iterator<Item = &'a SubDailyRecord> + '_ {
        self.morning.iter().chain(&self.afternoon).copied()
    }
}
