use crate::aggregation::units::UnitConversions;
use crate::aggregation::window::{AFTERNOON, HalfHourWindow, MORNING};

/// Constants of the sub-daily to daily reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationSettings {
    pub morning: HalfHourWindow,
    pub afternoon: HalfHourWindow,
    /// kPa. Lower bound for window-mean VPD, also used for empty windows.
    pub vpd_floor: f64,
    /// m s-1. Used when a window has no rows.
    pub wind_floor: f64,
    /// kPa
    pub pressure_kpa: f64,
    /// ppm
    pub co2_reference: f64,
    pub co2_scale: f64,
    /// Written for fluxes the forcing does not model (ndep, nfix).
    pub unmodeled_sentinel: f64,
    pub units: UnitConversions,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            morning: MORNING,
            afternoon: AFTERNOON,
            vpd_floor: 0.05,
            wind_floor: 0.1,
            pressure_kpa: 101.32,
            co2_reference: 390.0,
            co2_scale: 1.3,
            unmodeled_sentinel: -999.9,
            units: UnitConversions::default(),
        }
    }
}

impl AggregationSettings {
    /// CO2 used when the caller does not fix one.
    pub fn default_co2(&self) -> f64 {
        self.co2_reference * self.co2_scale
    }

    pub fn co2(&self, fixed_co2: Option<f64>) -> f64 {
        fixed_co2.unwrap_or_else(|| self.default_co2())
    }
}
