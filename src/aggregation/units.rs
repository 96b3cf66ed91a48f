//! Unit conversion factors used by the reductions.

/// Factors for turning instantaneous PAR flux into energy per half-hour slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversions {
    /// umol of PAR photons per joule.
    pub umol_per_joule: f64,
    pub joules_to_mj: f64,
    /// Length of one input slot.
    pub seconds_per_slot: f64,
}

impl Default for UnitConversions {
    fn default() -> Self {
        Self {
            umol_per_joule: 4.57,
            joules_to_mj: 1.0e-6,
            seconds_per_slot: 60.0 * 30.0,
        }
    }
}

impl UnitConversions {
    /// umol m-2 s-1 -> MJ m-2 per slot.
    pub fn par_slot_factor(&self) -> f64 {
        (1.0 / self.umol_per_joule) * self.joules_to_mj * self.seconds_per_slot
    }

    pub fn par_to_mj(&self, par: f64) -> f64 {
        par * self.par_slot_factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        let units = UnitConversions::default();
        assert_eq!(units.seconds_per_slot, 1800.0);
        assert_eq!(units.joules_to_mj, 1.0e-6);
        assert_eq!(units.umol_per_joule, 4.57);
    }

    #[test]
    fn test_par_to_mj() {
        let units = UnitConversions::default();
        let expected = 1000.0 * (1.0 / 4.57) * 1.0e-6 * 1800.0;
        assert!((units.par_to_mj(1000.0) - expected).abs() < 1e-12);
        assert!((units.par_to_mj(1000.0) - 0.3938).abs() < 1e-4);
        assert_eq!(units.par_to_mj(0.0), 0.0);
    }

    #[test]
    fn test_custom_slot_length_scales_linearly() {
        let hourly = UnitConversions {
            seconds_per_slot: 3600.0,
            ..Default::default()
        };
        let half_hourly = UnitConversions::default();
        let ratio = hourly.par_slot_factor() / half_hourly.par_slot_factor();
        assert!((ratio - 2.0).abs() < 1e-12);
    }
}
