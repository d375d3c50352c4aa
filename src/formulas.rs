//! Calorimetry formulas
//!
//! Pure functions turning instantaneous instrument readings into derived
//! physical quantities. None of them panic: a quantity that cannot be
//! computed (unset constant, zero intensity, non-finite intermediate) is
//! reported as `None` so that batch application over a whole test never
//! aborts on a single bad sample.
//!
//! ## Heat release rate
//!
//! Oxygen consumption calorimetry following ASTM E1354 / ISO 5660-1, on a dry
//! basis without the ambient water vapour correction:
//!
//! ```text
//! phi = (X_O2_0 (1 - X_CO2 - X_CO) - X_O2 (1 - X_CO2_0)) / (X_O2_0 (1 - X_CO2 - X_CO - X_O2))
//! q   = 1.10 E X_O2_0 m_e (phi - 0.172 (1 - phi) X_CO / X_O2) / ((1 - phi) + 1.105 phi)
//! ```

/// Ratio of the molecular weights of oxygen and air
pub const O2_TO_AIR_MOLAR_MASS_RATIO: f64 = 1.10;

/// Expansion factor for the depleted fraction of incoming air
pub const EXPANSION_FACTOR: f64 = 1.105;

/// Correction for incomplete combustion of carbon to CO
pub const CO_CORRECTION: f64 = 0.172;

/// Optical path length used when a test does not record one (m)
pub const DEFAULT_PATH_LENGTH_M: f64 = 1.0;

const KJ_PER_MJ: f64 = 1000.0;

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Exhaust duct mass flow rate (kg/s) from the orifice plate relation
/// `C * sqrt(delta_P / T_e)`.
///
/// `delta_p` is in Pa and `t_e` in Kelvin. Negative pressures are rejected by
/// the synchronizer before this is called.
pub fn calculate_mfr(c_factor: Option<f64>, delta_p: f64, t_e: f64) -> Option<f64> {
    let c = c_factor?;
    finite(c * (delta_p / t_e).sqrt())
}

/// Heat release rate per unit specimen area (kW/m²).
///
/// Concentrations are volume fractions, `e_mj_per_kg` is the heat released per
/// kilogram of oxygen consumed and `area_m2` the exposed specimen area.
#[allow(clippy::too_many_arguments)]
pub fn calculate_hrr(
    x_o2: f64,
    x_co2: f64,
    x_co: f64,
    x_o2_initial: f64,
    x_co2_initial: f64,
    delta_p: f64,
    t_e: f64,
    c_factor: Option<f64>,
    e_mj_per_kg: Option<f64>,
    area_m2: f64,
) -> Option<f64> {
    let e = e_mj_per_kg?;
    let m_e = calculate_mfr(c_factor, delta_p, t_e)?;

    let phi = (x_o2_initial * (1.0 - x_co2 - x_co) - x_o2 * (1.0 - x_co2_initial))
        / (x_o2_initial * (1.0 - x_co2 - x_co - x_o2));

    let combustion = (phi - CO_CORRECTION * (1.0 - phi) * x_co / x_o2)
        / ((1.0 - phi) + EXPANSION_FACTOR * phi);

    let q_kw = O2_TO_AIR_MOLAR_MASS_RATIO * (e * KJ_PER_MJ) * x_o2_initial * combustion * m_e;

    finite(q_kw / area_m2)
}

/// Smoke extinction coefficient (1/m) from the Bouguer-Lambert law,
/// `k = -ln(I / I_o) / L`.
///
/// Intensities are transmission percentages. Returns `None` when either
/// intensity is zero or the path length is not positive.
pub fn calculate_k(i_o: f64, i: f64, path_length_m: f64) -> Option<f64> {
    if i_o == 0.0 || i == 0.0 || path_length_m <= 0.0 {
        return None;
    }
    finite(-(i / i_o).ln() / path_length_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_relative_eq(actual: f64, expected: f64) {
        let err = ((actual - expected) / expected).abs();
        assert!(err < 1e-6, "expected {expected}, got {actual} (rel err {err})");
    }

    #[test]
    fn test_mfr_reference_value() {
        // 0.04 * sqrt(100 / 400)
        let mfr = calculate_mfr(Some(0.04), 100.0, 400.0).unwrap();
        assert_relative_eq(mfr, 0.02);
    }

    #[test]
    fn test_mfr_without_c_factor() {
        assert_eq!(calculate_mfr(None, 100.0, 400.0), None);
    }

    #[test]
    fn test_mfr_zero_pressure() {
        assert_eq!(calculate_mfr(Some(0.04), 0.0, 400.0), Some(0.0));
    }

    #[test]
    fn test_hrr_reference_value() {
        let hrr = calculate_hrr(
            0.19,
            0.015,
            0.0002,
            0.2095,
            0.0005,
            100.0,
            400.0,
            Some(0.04),
            Some(13.1),
            0.01,
        )
        .unwrap();
        assert_relative_eq(hrr, 587.989_599_878_591_8);
    }

    #[test]
    fn test_hrr_at_baseline_is_zero() {
        let hrr = calculate_hrr(
            0.2095,
            0.0005,
            0.0,
            0.2095,
            0.0005,
            100.0,
            400.0,
            Some(0.04),
            Some(13.1),
            0.01,
        )
        .unwrap();
        assert!(hrr.abs() < 1e-9);
    }

    #[test]
    fn test_hrr_unset_constants() {
        let args = (0.19, 0.015, 0.0002, 0.2095, 0.0005, 100.0, 400.0);
        let without_c = calculate_hrr(
            args.0, args.1, args.2, args.3, args.4, args.5, args.6, None, Some(13.1), 0.01,
        );
        let without_e = calculate_hrr(
            args.0, args.1, args.2, args.3, args.4, args.5, args.6, Some(0.04), None, 0.01,
        );
        assert_eq!(without_c, None);
        assert_eq!(without_e, None);
    }

    #[test]
    fn test_hrr_missing_sample_is_null() {
        let hrr = calculate_hrr(
            f64::NAN,
            0.015,
            0.0002,
            0.2095,
            0.0005,
            100.0,
            400.0,
            Some(0.04),
            Some(13.1),
            0.01,
        );
        assert_eq!(hrr, None);
    }

    #[test]
    fn test_k_no_attenuation() {
        assert_eq!(calculate_k(87.5, 87.5, DEFAULT_PATH_LENGTH_M), Some(0.0));
    }

    #[test]
    fn test_k_reference_values() {
        assert_relative_eq(calculate_k(80.0, 40.0, 1.0).unwrap(), std::f64::consts::LN_2);
        assert_relative_eq(calculate_k(100.0, 50.0, 0.11).unwrap(), 6.301_338_005_090_412);
    }

    #[test]
    fn test_k_zero_intensity() {
        assert_eq!(calculate_k(0.0, 50.0, 1.0), None);
        assert_eq!(calculate_k(100.0, 0.0, 1.0), None);
        assert_eq!(calculate_k(100.0, 50.0, 0.0), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_mfr_non_negative(
                c in 0.0f64..1.0,
                delta_p in 0.0f64..10_000.0,
                t_e in 1.0f64..2_000.0,
            ) {
                let mfr = calculate_mfr(Some(c), delta_p, t_e).unwrap();
                prop_assert!(mfr >= 0.0);
            }

            #[test]
            fn test_k_zero_when_unattenuated(
                intensity in 0.001f64..100.0,
                path_length in 0.01f64..10.0,
            ) {
                prop_assert_eq!(calculate_k(intensity, intensity, path_length), Some(0.0));
            }
        }
    }
}
