//! Conversion of half-hourly met tables into model forcing.
//!
//! Two schemes are supported: `mate` reduces each calendar day to one row
//! (morning/afternoon windows, floors for empty windows, PAR integrated to
//! MJ m-2), `twoleaf` keeps the half-hourly rows.

pub mod daily;
pub mod error;
pub mod forcing;
pub mod passthrough;
pub mod settings;
pub mod types;
pub mod units;
pub mod utility;
pub mod window;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregation::error::AggregateError;
use crate::aggregation::types::{ColumnLayout, DAILY_LAYOUT, SUB_DAILY_LAYOUT};

/// Forcing resolution requested by the downstream model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// One row per day.
    Mate,
    /// One row per half hour.
    TwoLeaf,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Mate => "mate",
            Scheme::TwoLeaf => "twoleaf",
        }
    }

    /// Resolution named in the output file's first comment line.
    pub fn resolution_label(self) -> &'static str {
        match self {
            Scheme::Mate => "daily",
            Scheme::TwoLeaf => "30 min",
        }
    }

    pub fn layout(self) -> &'static ColumnLayout {
        match self {
            Scheme::Mate => &DAILY_LAYOUT,
            Scheme::TwoLeaf => &SUB_DAILY_LAYOUT,
        }
    }
}

impl FromStr for Scheme {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mate" => Ok(Scheme::Mate),
            "twoleaf" | "subdaily" | "sub-daily" => Ok(Scheme::TwoLeaf),
            _ => Err(AggregateError::UnknownScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
