use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Input table has no data rows")]
    EmptyTable,

    #[error("No records for year {year}, day {doy}")]
    MissingDay { year: i32, doy: u16 },

    #[error("Half-hour index {hod} out of range 0-47 (year {year}, day {doy})")]
    InvalidSlot { year: i32, doy: u16, hod: u8 },

    #[error("Day {doy} does not exist in year {year}")]
    InvalidDay { year: i32, doy: u16 },

    #[error("Invalid CO2 concentration: {0} ppm")]
    InvalidCo2(f64),

    #[error("Unknown scheme '{0}' (expected 'mate' or 'twoleaf')")]
    UnknownScheme(String),
}
