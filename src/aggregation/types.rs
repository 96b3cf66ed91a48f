//! Record types flowing through the forcing pipeline.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of half-hour slots in a complete day.
pub const SLOTS_PER_DAY: u8 = 48;

/// One half-hourly row of the input met table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SubDailyRecord {
    #[serde(deserialize_with = "whole_number")]
    pub year: i32,
    #[serde(rename = "doy", deserialize_with = "whole_number")]
    pub day_of_year: u16,
    #[serde(rename = "hod", deserialize_with = "whole_number")]
    pub half_hour_index: u8,
    /// degC
    pub tair: f64,
    /// kPa
    pub vpd: f64,
    /// umol m-2 s-1
    pub par: f64,
    /// mm per half hour
    pub rain: f64,
    /// m s-1
    pub wind: f64,
    /// ppm
    #[serde(default)]
    pub co2: Option<f64>,
}

/// Accepts `2014` as well as `2014.0`, which the model's own writers emit.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(D::Error::custom(format!("expected a whole number, got {value}")));
    }
    T::try_from(value as i64).map_err(|_| D::Error::custom(format!("{value} is out of range")))
}

/// A derived value together with how it was obtained.
///
/// Only the number reaches the forcing file; the tag feeds the run report so
/// placeholders can be told apart from real data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Reduced from input rows.
    Computed(f64),
    /// Reduced from input rows, then raised to a floor.
    Floored(f64),
    /// Placeholder for an empty window.
    Substituted(f64),
    /// Constant that does not depend on the input.
    Fixed(f64),
    /// Empty window with no placeholder; written as NaN.
    Undefined,
}

impl FieldValue {
    /// Wraps the result of a reduction that yields `None` on empty input.
    pub fn from_reduction(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Undefined, FieldValue::Computed)
    }

    pub fn value(self) -> f64 {
        match self {
            FieldValue::Computed(v)
            | FieldValue::Floored(v)
            | FieldValue::Substituted(v)
            | FieldValue::Fixed(v) => v,
            FieldValue::Undefined => f64::NAN,
        }
    }

    /// `true` for values that stand in for missing data.
    pub fn is_placeholder(self) -> bool {
        matches!(self, FieldValue::Substituted(_) | FieldValue::Undefined)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// One row of the daily forcing file. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub year: i32,
    #[serde(rename = "doy")]
    pub day_of_year: u16,
    pub tair: FieldValue,
    pub rain: FieldValue,
    pub tsoil: FieldValue,
    pub tam: FieldValue,
    pub tpm: FieldValue,
    pub tmin: FieldValue,
    pub tmax: FieldValue,
    pub tday: FieldValue,
    pub vpd_am: FieldValue,
    pub vpd_pm: FieldValue,
    pub co2: FieldValue,
    pub ndep: FieldValue,
    pub nfix: FieldValue,
    pub wind: FieldValue,
    pub press: FieldValue,
    pub wind_am: FieldValue,
    pub wind_pm: FieldValue,
    pub par_am: FieldValue,
    pub par_pm: FieldValue,
}

impl DailyRecord {
    /// Derived fields with their column names, in column order.
    pub fn fields(&self) -> [(&'static str, FieldValue); 19] {
        [
            ("tair", self.tair),
            ("rain", self.rain),
            ("tsoil", self.tsoil),
            ("tam", self.tam),
            ("tpm", self.tpm),
            ("tmin", self.tmin),
            ("tmax", self.tmax),
            ("tday", self.tday),
            ("vpd_am", self.vpd_am),
            ("vpd_pm", self.vpd_pm),
            ("co2", self.co2),
            ("ndep", self.ndep),
            ("nfix", self.nfix),
            ("wind", self.wind),
            ("press", self.press),
            ("wind_am", self.wind_am),
            ("wind_pm", self.wind_pm),
            ("par_am", self.par_am),
            ("par_pm", self.par_pm),
        ]
    }
}

/// One row of the half-hourly forcing file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubDailyOutputRecord {
    pub year: i32,
    pub doy: u16,
    pub hod: u8,
    pub rain: f64,
    pub par: f64,
    pub tair: f64,
    pub tsoil: f64,
    pub vpd: f64,
    pub co2: f64,
    pub ndep: f64,
    pub nfix: f64,
    pub wind: f64,
    pub press: f64,
}

/// Column names and units written above the data rows.
#[derive(Debug)]
pub struct ColumnLayout {
    pub names: &'static [&'static str],
    pub units: &'static [&'static str],
}

pub static DAILY_LAYOUT: ColumnLayout = ColumnLayout {
    names: &[
        "year", "doy", "tair", "rain", "tsoil", "tam", "tpm", "tmin", "tmax", "tday", "vpd_am",
        "vpd_pm", "co2", "ndep", "nfix", "wind", "press", "wind_am", "wind_pm", "par_am",
        "par_pm",
    ],
    units: &[
        "--", "--", "degC", "mm/d", "degC", "degC", "degC", "degC", "degC", "degC", "kPa", "kPa",
        "ppm", "t/ha/d", "t/ha/d", "m/s", "kPa", "m/s", "m/s", "mj/m2/d", "mj/m2/d",
    ],
};

pub static SUB_DAILY_LAYOUT: ColumnLayout = ColumnLayout {
    names: &[
        "year", "doy", "hod", "rain", "par", "tair", "tsoil", "vpd", "co2", "ndep", "nfix", "wind",
        "press",
    ],
    units: &[
        "--", "--", "--", "mm/30min", "umol/m2/s", "degC", "degC", "kPa", "ppm", "t/ha/30min",
        "t/ha/30min", "m/s", "kPa",
    ],
};
