//! Output formatting and persistence for forcing files and run reports.
//!
//! Forcing files are written to a temporary file next to the target and
//! renamed into place once every row has been written.

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::aggregation::types::ColumnLayout;

/// Provenance written as comment lines at the top of a forcing file.
#[derive(Debug, Clone)]
pub struct ForcingHeader<'a> {
    pub site: &'a str,
    pub resolution: &'a str,
    pub years: RangeInclusive<i32>,
    pub created_by: &'a str,
    pub created_on: NaiveDate,
}

impl ForcingHeader<'_> {
    pub fn comment_lines(&self) -> [String; 3] {
        [
            format!("# {} {} met forcing", self.site, self.resolution),
            format!("# Data from {}-{}", self.years.start(), self.years.end()),
            format!("# Created by {}: {}", self.created_by, self.created_on),
        ]
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a forcing file: three comment lines, a units row, a column-name
/// row, then one row per record. Returns the number of data rows.
///
/// The first error from `rows` aborts the write, is returned as is, and
/// leaves any existing file at `path` untouched. A replaced file keeps its
/// permissions; a new one gets the usual umask-derived mode.
pub fn write_forcing_file<T, E, I>(
    path: &Path,
    header: &ForcingHeader<'_>,
    layout: &ColumnLayout,
    rows: I,
) -> Result<usize>
where
    T: Serialize,
    E: std::error::Error + Send + Sync + 'static,
    I: IntoIterator<Item = Result<T, E>>,
{
    let write_error = || format!("Could not write met file: \"{}\"", path.display());

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = temp_file_beside(path, dir).with_context(write_error)?;
    debug!(path = %path.display(), tmp = %tmp.path().display(), "Writing forcing file");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(tmp);

    for line in header.comment_lines() {
        writer.write_record([line]).with_context(write_error)?;
    }
    writer
        .write_record(hash_prefixed(layout.units))
        .with_context(write_error)?;
    writer
        .write_record(hash_prefixed(layout.names))
        .with_context(write_error)?;

    let mut count = 0;
    for row in rows {
        let row = row?;
        writer.serialize(&row).with_context(write_error)?;
        count += 1;
    }

    writer.flush().with_context(write_error)?;
    let tmp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(write_error)?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(write_error)?;

    info!(path = %path.display(), rows = count, "Forcing file written");
    Ok(count)
}

/// Temp file in `dir` carrying the permissions `path` will end up with.
fn temp_file_beside(path: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // open(2) masks this with the umask, as File::create does
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}

/// Column row with `#` on the first token, as the model's reader expects.
fn hash_prefixed(columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 0 { format!("#{c}") } else { c.to_string() })
        .collect()
}
