use std::path::Path;

use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::aggregation::Scheme;
use crate::aggregation::daily::DailyAggregator;
use crate::aggregation::error::AggregateError;
use crate::aggregation::passthrough::passthrough_rows;
use crate::aggregation::settings::AggregationSettings;
use crate::output::{ForcingHeader, write_forcing_file};
use crate::stats::ForcingReport;
use crate::table::MetTable;

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct ForcingRequest<'a> {
    pub output: &'a Path,
    pub scheme: Scheme,
    /// ppm; `None` falls back to the scaled reference (daily) or the row's
    /// own value (half-hourly).
    pub fixed_co2: Option<f64>,
    pub site: &'a str,
    pub created_by: &'a str,
}

/// Converts `table` with the requested scheme and writes the forcing file.
///
/// Nothing is left at `request.output` unless every row was produced.
#[tracing::instrument(
    skip(table, settings, request),
    fields(output = %request.output.display(), scheme = %request.scheme, site = request.site)
)]
pub fn generate_forcing(
    table: &MetTable,
    settings: &AggregationSettings,
    request: &ForcingRequest<'_>,
) -> Result<ForcingReport> {
    if let Some(co2) = request.fixed_co2 {
        if !co2.is_finite() || co2 <= 0.0 {
            return Err(AggregateError::InvalidCo2(co2).into());
        }
    }

    let years = table.year_range();
    info!(
        first_year = years.start(),
        last_year = years.end(),
        rows = table.len(),
        "Generating forcing"
    );

    let mut report = ForcingReport::new(
        request.site,
        request.scheme,
        years.clone(),
        request.fixed_co2,
    );
    let header = ForcingHeader {
        site: request.site,
        resolution: request.scheme.resolution_label(),
        years,
        created_by: request.created_by,
        created_on: Local::now().date_naive(),
    };
    let layout = request.scheme.layout();

    let rows_written = match request.scheme {
        Scheme::Mate => {
            let aggregator =
                DailyAggregator::new(table, settings).with_fixed_co2(request.fixed_co2);
            let days = aggregator.days().inspect(|day| {
                if let Ok(day) = day {
                    report.record_day(day);
                }
            });
            write_forcing_file(request.output, &header, layout, days)?
        }
        Scheme::TwoLeaf => {
            let rows = passthrough_rows(table, settings, request.fixed_co2)
                .map(Ok::<_, AggregateError>);
            write_forcing_file(request.output, &header, layout, rows)?
        }
    };
    report.rows_written = rows_written;

    let placeholders = report.placeholder_count();
    if placeholders > 0 {
        warn!(placeholders, "Forcing contains placeholder values for empty windows");
    }

    Ok(report)
}
