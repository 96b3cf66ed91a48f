//! Reader for whitespace- or comma-delimited half-hourly met files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::aggregation::types::SubDailyRecord;
use crate::table::MetTable;

/// Columns every input file must name.
pub const REQUIRED_COLUMNS: &[&str] = &["year", "doy", "hod", "tair", "vpd", "par", "rain", "wind"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Comma,
    Whitespace,
}

impl Delimiter {
    fn detect(header: &str) -> Self {
        if header.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// Reads and validates a met file.
///
/// # Errors
///
/// Fails if the file cannot be read, lacks a required column, has a
/// malformed row, or holds rows that are not valid (year, day, slot)
/// positions.
pub fn read_met_table(path: &Path) -> Result<MetTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read met file: \"{}\"", path.display()))?;
    let table = parse_met_table(&text)
        .with_context(|| format!("Invalid met file: \"{}\"", path.display()))?;

    info!(
        path = %path.display(),
        rows = table.len(),
        years = ?table.years(),
        "Met table loaded"
    );
    Ok(table)
}

/// Parses met file contents.
///
/// Lines before the header row (comments, a units row) are skipped. The
/// header is the first line whose first token is `year`, optionally with a
/// leading `#`. Extra columns are ignored.
pub fn parse_met_table(text: &str) -> Result<MetTable> {
    let mut lines = text.lines().enumerate();
    let (header_idx, header_line) = lines
        .by_ref()
        .find(|(_, line)| is_header(line))
        .ok_or_else(|| anyhow!("No header row with a 'year' column"))?;
    if header_idx > 0 {
        debug!(skipped = header_idx, "Skipped lines before header");
    }

    let delimiter = Delimiter::detect(header_line);
    let columns: Vec<String> = delimiter
        .split(header_line)
        .into_iter()
        .map(|c| c.trim_start_matches('#').to_ascii_lowercase())
        .collect();
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            bail!("Missing required column '{required}'");
        }
    }

    let mut normalised = columns.join(",");
    normalised.push('\n');
    let mut line_numbers = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        normalised.push_str(&delimiter.split(line).join(","));
        normalised.push('\n');
        line_numbers.push(idx + 1);
    }

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(normalised.as_bytes());

    let mut records = Vec::with_capacity(line_numbers.len());
    for (result, line_no) in rdr.deserialize().zip(&line_numbers) {
        let record: SubDailyRecord =
            result.with_context(|| format!("Malformed row at line {line_no}"))?;
        records.push(record);
    }

    Ok(MetTable::from_records(records)?)
}

fn is_header(line: &str) -> bool {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .find(|token| !token.is_empty())
        .is_some_and(|token| token.trim_start_matches('#').eq_ignore_ascii_case("year"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::error::AggregateError;

    #[test]
    fn test_parse_whitespace_delimited() {
        let text = "year doy hod tair vpd par rain wind co2\n\
                    2014 1 0 12.5 0.8 0.0 0.0 1.2 395.1\n\
                    2014   1   1  12.0  0.7  0.0  0.2  1.1  395.4\n";
        let table = parse_met_table(text).unwrap();

        assert_eq!(table.len(), 2);
        let second = table.records()[1];
        assert_eq!(second.half_hour_index, 1);
        assert_eq!(second.rain, 0.2);
        assert_eq!(second.co2, Some(395.4));
    }

    #[test]
    fn test_parse_comma_delimited_without_co2() {
        let text = "year,doy,hod,tair,vpd,par,rain,wind\n2014,2,10,20.0,1.5,900.0,0.0,2.5\n";
        let table = parse_met_table(text).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].day_of_year, 2);
        assert_eq!(table.records()[0].co2, None);
    }

    #[test]
    fn test_parse_skips_preamble_and_extra_columns() {
        let text = "# Site 30 min met forcing\n\
                    # Data from 2014-2014\n\
                    #--,--,--,mm/30min,umol/m2/s,degC,degC,kPa,ppm,t/ha/30min,t/ha/30min,m/s,kPa\n\
                    #year,doy,hod,rain,par,tair,tsoil,vpd,co2,ndep,nfix,wind,press\n\
                    2014.0,1.0,0.0,1.0,1800.0,20.0,10.0,2.0,390.0,-999.9,-999.9,1.5,101.32\n";
        let table = parse_met_table(text).unwrap();

        let r = table.records()[0];
        assert_eq!(r.year, 2014);
        assert_eq!(r.par, 1800.0);
        assert_eq!(r.tair, 20.0);
        assert_eq!(r.vpd, 2.0);
        assert_eq!(r.co2, Some(390.0));
    }

    #[test]
    fn test_parse_missing_column() {
        let text = "year doy hod tair vpd par rain\n2014 1 0 12.5 0.8 0.0 0.0\n";
        let err = parse_met_table(text).unwrap_err();
        assert!(err.to_string().contains("'wind'"));
    }

    #[test]
    fn test_parse_no_header() {
        assert!(parse_met_table("1 2 3\n4 5 6\n").is_err());
    }

    #[test]
    fn test_parse_malformed_row_reports_line() {
        let text = "year doy hod tair vpd par rain wind\n\
                    2014 1 0 12.5 0.8 0.0 0.0 1.2\n\
                    2014 1 1 warm 0.8 0.0 0.0 1.2\n";
        let err = parse_met_table(text).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_short_row_rejected() {
        let text = "year doy hod tair vpd par rain wind\n2014 1 0 12.5 0.8\n";
        assert!(parse_met_table(text).is_err());
    }

    #[test]
    fn test_parse_header_only_is_empty_table() {
        let err = parse_met_table("year doy hod tair vpd par rain wind\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<AggregateError>(),
            Some(&AggregateError::EmptyTable)
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_met_table(Path::new("/definitely/not/here.dat")).unwrap_err();
        assert!(err.to_string().contains("Could not read met file"));
    }
}
