//! Half-hourly passthrough: rows keep their resolution and are reshaped into
//! the model's sub-daily column layout.

use crate::aggregation::settings::AggregationSettings;
use crate::aggregation::types::{SubDailyOutputRecord, SubDailyRecord};
use crate::table::MetTable;

/// Every row of the table, in (year, day) order.
pub fn passthrough_rows<'a>(
    table: &'a MetTable,
    settings: &'a AggregationSettings,
    fixed_co2: Option<f64>,
) -> impl Iterator<Item = SubDailyOutputRecord> + 'a {
    table
        .records()
        .iter()
        .map(move |r| to_sub_daily_output(r, settings, fixed_co2))
}

/// A fixed CO2 wins over the row's own value; rows without one get the
/// scaled reference.
pub fn to_sub_daily_output(
    record: &SubDailyRecord,
    settings: &AggregationSettings,
    fixed_co2: Option<f64>,
) -> SubDailyOutputRecord {
    let co2 = fixed_co2
        .or(record.co2)
        .unwrap_or_else(|| settings.default_co2());

    SubDailyOutputRecord {
        year: record.year,
        doy: record.day_of_year,
        hod: record.half_hour_index,
        rain: record.rain,
        par: record.par,
        tair: record.tair,
        tsoil: record.tair,
        vpd: record.vpd,
        co2,
        ndep: settings.unmodeled_sentinel,
        nfix: settings.unmodeled_sentinel,
        wind: record.wind,
        press: settings.pressure_kpa,
    }
}
