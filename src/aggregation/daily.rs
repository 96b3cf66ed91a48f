//! Half-hourly to daily reduction.

use tracing::{debug, error, trace};

use crate::aggregation::error::AggregateError;
use crate::aggregation::settings::AggregationSettings;
use crate::aggregation::types::{DailyRecord, FieldValue, SubDailyRecord};
use crate::aggregation::units::UnitConversions;
use crate::aggregation::utility::{max, mean, min, sum};
use crate::aggregation::window::DayWindows;
use crate::table::MetTable;

/// Produces one [`DailyRecord`] per calendar day of a table's year range.
pub struct DailyAggregator<'a> {
    table: &'a MetTable,
    settings: &'a AggregationSettings,
    fixed_co2: Option<f64>,
}

impl<'a> DailyAggregator<'a> {
    pub fn new(table: &'a MetTable, settings: &'a AggregationSettings) -> Self {
        Self {
            table,
            settings,
            fixed_co2: None,
        }
    }

    /// Writes `co2` on every day instead of the scaled reference value.
    pub fn with_fixed_co2(mut self, co2: Option<f64>) -> Self {
        self.fixed_co2 = co2;
        self
    }

    /// Lazily reduces each day in ascending order.
    ///
    /// A day with no rows at all yields [`AggregateError::MissingDay`].
    pub fn days(&self) -> impl Iterator<Item = Result<DailyRecord, AggregateError>> + 'a {
        let table = self.table;
        let settings = self.settings;
        let fixed_co2 = self.fixed_co2;

        table.calendar_days().map(move |(year, doy)| {
            let rows = table.day(year, doy);
            if rows.is_empty() {
                error!(year, doy, "No met records for day");
                return Err(AggregateError::MissingDay { year, doy });
            }
            trace!(year, doy, slots = rows.len(), "Reducing day");
            Ok(reduce_day(year, doy, rows, settings, fixed_co2))
        })
    }

    /// Reduces the whole range, stopping at the first missing day.
    pub fn collect(&self) -> Result<Vec<DailyRecord>, AggregateError> {
        self.days().collect()
    }
}

/// Reduces one day's rows to a daily record.
///
/// Whole-day values (`rain`, `tsoil`, `tday`, `tmin`, `tmax`) use every row;
/// the rest use the morning and afternoon windows only.
pub fn reduce_day(
    year: i32,
    day_of_year: u16,
    rows: &[SubDailyRecord],
    settings: &AggregationSettings,
    fixed_co2: Option<f64>,
) -> DailyRecord {
    let windows = DayWindows::split(rows, &settings.morning, &settings.afternoon);
    let sentinel = FieldValue::Fixed(settings.unmodeled_sentinel);
    let day_mean_tair = FieldValue::from_reduction(mean(rows.iter().map(|r| r.tair)));

    let record = DailyRecord {
        year,
        day_of_year,
        tair: FieldValue::from_reduction(mean(windows.daytime().map(|r| r.tair))),
        rain: FieldValue::Computed(sum(rows.iter().map(|r| r.rain))),
        tsoil: day_mean_tair,
        tam: FieldValue::from_reduction(mean(windows.morning.iter().map(|r| r.tair))),
        tpm: FieldValue::from_reduction(mean(windows.afternoon.iter().map(|r| r.tair))),
        tmin: FieldValue::from_reduction(min(rows.iter().map(|r| r.tair))),
        tmax: FieldValue::from_reduction(max(rows.iter().map(|r| r.tair))),
        tday: day_mean_tair,
        vpd_am: floored_mean(&windows.morning, |r| r.vpd, settings.vpd_floor),
        vpd_pm: floored_mean(&windows.afternoon, |r| r.vpd, settings.vpd_floor),
        co2: FieldValue::Fixed(settings.co2(fixed_co2)),
        ndep: sentinel,
        nfix: sentinel,
        wind: FieldValue::from_reduction(mean(windows.daytime().map(|r| r.wind))),
        press: FieldValue::Fixed(settings.pressure_kpa),
        wind_am: substituted_mean(&windows.morning, |r| r.wind, settings.wind_floor),
        wind_pm: substituted_mean(&windows.afternoon, |r| r.wind, settings.wind_floor),
        par_am: window_par(&windows.morning, &settings.units),
        par_pm: window_par(&windows.afternoon, &settings.units),
    };

    if record.fields().iter().any(|(_, v)| v.is_placeholder()) {
        let empty: Vec<&str> = [
            (&settings.morning, &windows.morning),
            (&settings.afternoon, &windows.afternoon),
        ]
        .into_iter()
        .filter(|(_, rows)| rows.is_empty())
        .map(|(window, _)| window.name())
        .collect();
        debug!(
            year,
            doy = day_of_year,
            empty_windows = ?empty,
            "Day has empty windows, placeholders written"
        );
    }

    record
}

/// Window mean raised to `floor`; `floor` itself when the window is empty.
fn floored_mean(
    window: &[&SubDailyRecord],
    field: impl Fn(&SubDailyRecord) -> f64,
    floor: f64,
) -> FieldValue {
    match mean(window.iter().map(|&r| field(r))) {
        None => FieldValue::Substituted(floor),
        Some(v) if v < floor => FieldValue::Floored(floor),
        Some(v) => FieldValue::Computed(v),
    }
}

/// Window mean, or `fallback` when the window is empty.
fn substituted_mean(
    window: &[&SubDailyRecord],
    field: impl Fn(&SubDailyRecord) -> f64,
    fallback: f64,
) -> FieldValue {
    mean(window.iter().map(|&r| field(r)))
        .map_or(FieldValue::Substituted(fallback), FieldValue::Computed)
}

/// MJ m-2 received over the window.
fn window_par(window: &[&SubDailyRecord], units: &UnitConversions) -> FieldValue {
    if window.is_empty() {
        return FieldValue::Substituted(0.0);
    }
    FieldValue::Computed(sum(window.iter().map(|r| units.par_to_mj(r.par))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(hod: u8) -> SubDailyRecord {
        SubDailyRecord {
            year: 2014,
            day_of_year: 1,
            half_hour_index: hod,
            tair: 20.0,
            vpd: 1.0,
            par: 0.0,
            rain: 0.0,
            wind: 2.0,
            co2: Some(400.0),
        }
    }

    fn full_day() -> Vec<SubDailyRecord> {
        (0..48).map(slot).collect()
    }

    fn reduce(rows: &[SubDailyRecord]) -> DailyRecord {
        reduce_day(2014, 1, rows, &AggregationSettings::default(), None)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_morning_and_afternoon_temperatures() {
        let rows: Vec<_> = full_day()
            .into_iter()
            .map(|mut r| {
                r.tair = if r.half_hour_index < 24 { 15.0 } else { 25.0 };
                r
            })
            .collect();
        let day = reduce(&rows);

        assert_eq!(day.tam, FieldValue::Computed(15.0));
        assert_eq!(day.tpm, FieldValue::Computed(25.0));
        assert_eq!(day.tmin, FieldValue::Computed(15.0));
        assert_eq!(day.tmax, FieldValue::Computed(25.0));
        // whole day: 24 slots at 15, 24 slots at 25
        assert_eq!(day.tday, FieldValue::Computed(20.0));
        assert_eq!(day.tsoil, FieldValue::Computed(20.0));
        // daytime: 24 morning slots at 15, 13 afternoon slots at 25
        let expected = (24.0 * 15.0 + 13.0 * 25.0) / 37.0;
        assert!(approx_eq(day.tair.value(), expected));
    }

    #[test]
    fn test_evening_slots_excluded_from_windows() {
        let rows: Vec<_> = full_day()
            .into_iter()
            .map(|mut r| {
                if r.half_hour_index >= 37 {
                    r.tair = 100.0;
                    r.wind = 50.0;
                    r.vpd = 9.0;
                }
                r
            })
            .collect();
        let day = reduce(&rows);

        assert_eq!(day.tpm, FieldValue::Computed(20.0));
        assert_eq!(day.tair, FieldValue::Computed(20.0));
        assert_eq!(day.wind, FieldValue::Computed(2.0));
        assert_eq!(day.vpd_pm, FieldValue::Computed(1.0));
        assert_eq!(day.tmax, FieldValue::Computed(100.0));
    }

    #[test]
    fn test_rain_sums_whole_day() {
        let rows: Vec<_> = full_day()
            .into_iter()
            .map(|mut r| {
                r.rain = 0.5;
                r
            })
            .collect();
        assert_eq!(reduce(&rows).rain, FieldValue::Computed(24.0));
    }

    #[test]
    fn test_vpd_floor_applied_to_low_mean() {
        let rows: Vec<_> = full_day()
            .into_iter()
            .map(|mut r| {
                r.vpd = 0.01;
                r
            })
            .collect();
        let day = reduce(&rows);

        assert_eq!(day.vpd_am, FieldValue::Floored(0.05));
        assert_eq!(day.vpd_pm, FieldValue::Floored(0.05));
        assert_eq!(day.vpd_am.value(), 0.05);
    }

    #[test]
    fn test_empty_morning_uses_placeholders() {
        let rows: Vec<_> = (24..48).map(slot).collect();
        let day = reduce(&rows);

        assert_eq!(day.wind_am, FieldValue::Substituted(0.1));
        assert_eq!(day.wind_am.value(), 0.1);
        assert_eq!(day.vpd_am, FieldValue::Substituted(0.05));
        assert_eq!(day.par_am, FieldValue::Substituted(0.0));
        assert_eq!(day.tam, FieldValue::Undefined);
        assert!(day.tam.value().is_nan());
        assert_eq!(day.wind_pm, FieldValue::Computed(2.0));
    }

    #[test]
    fn test_empty_afternoon_uses_placeholders() {
        let rows: Vec<_> = (0..24).map(slot).collect();
        let day = reduce(&rows);

        assert_eq!(day.wind_pm, FieldValue::Substituted(0.1));
        assert_eq!(day.vpd_pm, FieldValue::Substituted(0.05));
        assert_eq!(day.tpm, FieldValue::Undefined);
    }

    #[test]
    fn test_single_morning_par_slot() {
        let mut row = slot(10);
        row.par = 1000.0;
        let day = reduce(&[row]);

        let expected = 1000.0 * (1.0 / 4.57) * 1.0e-6 * 1800.0;
        assert!(approx_eq(day.par_am.value(), expected));
        assert_eq!(day.par_pm, FieldValue::Substituted(0.0));
    }

    #[test]
    fn test_constants_and_co2() {
        let rows = full_day();
        let settings = AggregationSettings::default();

        let scaled = reduce_day(2014, 1, &rows, &settings, None);
        assert!(approx_eq(scaled.co2.value(), 390.0 * 1.3));
        assert_eq!(scaled.press, FieldValue::Fixed(101.32));
        assert_eq!(scaled.ndep, FieldValue::Fixed(-999.9));
        assert_eq!(scaled.nfix, FieldValue::Fixed(-999.9));

        let fixed = reduce_day(2014, 1, &rows, &settings, Some(390.0));
        assert_eq!(fixed.co2, FieldValue::Fixed(390.0));
    }

    #[test]
    fn test_aggregator_leap_year_row_count() {
        let rows: Vec<_> = (1..=366)
            .map(|doy| SubDailyRecord {
                year: 2016,
                day_of_year: doy,
                ..slot(12)
            })
            .collect();
        let table = MetTable::from_records(rows).unwrap();
        let settings = AggregationSettings::default();

        let days = DailyAggregator::new(&table, &settings).collect().unwrap();
        assert_eq!(days.len(), 366);
        assert_eq!(days.last().map(|d| d.day_of_year), Some(366));
    }

    #[test]
    fn test_aggregator_rejects_missing_day() {
        let rows: Vec<_> = (1..=365)
            .filter(|doy| *doy != 100)
            .map(|doy| SubDailyRecord {
                day_of_year: doy,
                ..slot(12)
            })
            .collect();
        let table = MetTable::from_records(rows).unwrap();
        let settings = AggregationSettings::default();

        let err = DailyAggregator::new(&table, &settings).collect().unwrap_err();
        assert_eq!(err, AggregateError::MissingDay { year: 2014, doy: 100 });
    }

    #[test]
    fn test_aggregator_fixed_co2_every_day() {
        let rows: Vec<_> = (1..=365)
            .map(|doy| SubDailyRecord {
                day_of_year: doy,
                ..slot(12)
            })
            .collect();
        let table = MetTable::from_records(rows).unwrap();
        let settings = AggregationSettings::default();

        let days = DailyAggregator::new(&table, &settings)
            .with_fixed_co2(Some(390.0))
            .collect()
            .unwrap();
        assert!(days.iter().all(|d| d.co2.value() == 390.0));
    }
}
