//! # Orbit geometry
//!
//! Conversion of [`ClassicalElements`] into the geometric description of the
//! orbital ellipse: semi-major/semi-minor axes, periapsis and apoapsis radii,
//! the algebraic equation strings of the ellipse, and systematically perturbed
//! variations of a base orbit.
//!
//! The semi-major axis comes from Kepler's third law applied to the mean
//! motion: `a = (μ / n²)^(1/3)` with `n` in rad/s. Any orbit whose periapsis
//! falls at or below the configured safety floor (equatorial radius plus
//! minimum survivable altitude) is rejected as physically invalid, as are
//! open trajectories (`e ≥ 1`) for which the ellipse formulas are undefined.

use nalgebra::Vector3;
use serde::Serialize;

use crate::classical_element::ClassicalElements;
use crate::config::OrbitrackConfig;
use crate::constants::{Kilometer, DPI, MAX_VARIATION_ECCENTRICITY};
use crate::orbitrack_errors::OrbitrackError;

/// Geometric description of a closed orbit.
///
/// Invariants (enforced at construction through [`derive_geometry`]):
/// * `periapsis_km = a(1-e)`, `apoapsis_km = a(1+e)`
/// * `semi_minor_axis_km = a·sqrt(1-e²)`
/// * `periapsis_km` above the configured safety floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitGeometry {
    pub semi_major_axis_km: Kilometer,
    pub semi_minor_axis_km: Kilometer,
    pub periapsis_km: Kilometer,
    pub apoapsis_km: Kilometer,
    pub eccentricity: f64,
}

impl OrbitGeometry {
    /// Cartesian equation of the ellipse in the orbital plane,
    /// `(x / a)^2 + (y / b)^2 = 1`.
    pub fn cartesian_equation(&self) -> String {
        format!(
            "(x / {:.2})^2 + (y / {:.2})^2 = 1",
            self.semi_major_axis_km, self.semi_minor_axis_km
        )
    }

    /// Polar equation of the ellipse, `r = a(1 - e²)/(1 + e·cos(θ))`,
    /// degenerating to `r = a` for a circular orbit.
    pub fn polar_equation(&self) -> String {
        if self.eccentricity == 0.0 {
            format!("r = {}", self.semi_major_axis_km)
        } else {
            format!(
                "r = {}(1 - {}²)/(1 + {}cos(θ))",
                self.semi_major_axis_km, self.eccentricity, self.eccentricity
            )
        }
    }

    /// Sample `count` evenly spaced points along the ellipse in the orbital
    /// plane, `(a·cos θ, b·sin θ, 0)` for θ over one full revolution.
    pub fn orbital_plane_points(&self, count: usize) -> Vec<Vector3<f64>> {
        (0..count)
            .map(|i| {
                let theta = DPI * i as f64 / count as f64;
                Vector3::new(
                    self.semi_major_axis_km * theta.cos(),
                    self.semi_minor_axis_km * theta.sin(),
                    0.0,
                )
            })
            .collect()
    }
}

/// Derive the orbital ellipse from classical elements.
///
/// Arguments
/// -----------------
/// * `elements`: the parsed element set (mean motion in rev/day).
/// * `config`: gravitational parameter and safety floor.
///
/// Return
/// ----------
/// * The derived [`OrbitGeometry`], or [`OrbitrackError::InvalidOrbit`]
///   carrying the offending values when the elements describe an open
///   trajectory, a non-positive mean motion, or an orbit intersecting the
///   safety floor.
pub fn derive_geometry(
    elements: &ClassicalElements,
    config: &OrbitrackConfig,
) -> Result<OrbitGeometry, OrbitrackError> {
    let n_rad_s = elements.mean_motion_rad_s();
    if n_rad_s <= 0.0 {
        return Err(OrbitrackError::InvalidOrbit {
            semi_major_axis_km: f64::NAN,
            eccentricity: elements.eccentricity,
            periapsis_km: f64::NAN,
            floor_km: config.periapsis_floor_km(),
        });
    }

    let semi_major_axis_km = (config.mu_km3_s2 / (n_rad_s * n_rad_s)).powf(1.0 / 3.0);
    geometry_from_shape(semi_major_axis_km, elements.eccentricity, config)
}

/// Build an [`OrbitGeometry`] directly from a semi-major axis and
/// eccentricity, enforcing the periapsis safety invariant.
pub fn geometry_from_shape(
    semi_major_axis_km: Kilometer,
    eccentricity: f64,
    config: &OrbitrackConfig,
) -> Result<OrbitGeometry, OrbitrackError> {
    let periapsis_km = semi_major_axis_km * (1.0 - eccentricity);
    if !(0.0..1.0).contains(&eccentricity) || periapsis_km <= config.periapsis_floor_km() {
        return Err(OrbitrackError::InvalidOrbit {
            semi_major_axis_km,
            eccentricity,
            periapsis_km,
            floor_km: config.periapsis_floor_km(),
        });
    }

    Ok(OrbitGeometry {
        semi_major_axis_km,
        semi_minor_axis_km: semi_major_axis_km * (1.0 - eccentricity * eccentricity).sqrt(),
        periapsis_km,
        apoapsis_km: semi_major_axis_km * (1.0 + eccentricity),
        eccentricity,
    })
}

/// A named, systematically perturbed alternative to a base orbit.
#[derive(Debug, Clone, Serialize)]
pub struct OrbitVariation {
    pub name: String,
    pub geometry: OrbitGeometry,
    /// Polar-form ellipse equation of this variation.
    pub equation: String,
}

impl OrbitVariation {
    fn new(name: &str, geometry: OrbitGeometry) -> Self {
        OrbitVariation {
            name: name.to_string(),
            equation: geometry.polar_equation(),
            geometry,
        }
    }
}

/// Generate labeled variations of a base orbit by perturbing its shape.
///
/// Produces, in order: the base orbit itself, a higher circular orbit
/// (`a × 1.5`, `e = 0`), a more eccentric orbit (`e + 0.2`, capped), and a
/// lower orbit (`a × 0.7`, floored at the safety radius, `e − 0.1`, floored
/// at 0). Variations whose periapsis would violate the safety invariant are
/// filtered out, and the surviving list is truncated to `count` entries.
pub fn generate_variations(
    base_semi_major_axis_km: Kilometer,
    base_eccentricity: f64,
    count: usize,
    config: &OrbitrackConfig,
) -> Vec<OrbitVariation> {
    let min_axis = config.periapsis_floor_km();

    let candidates = [
        ("Base Orbit", base_semi_major_axis_km, base_eccentricity),
        ("Higher Circular Orbit", base_semi_major_axis_km * 1.5, 0.0),
        (
            "More Eccentric Orbit",
            base_semi_major_axis_km,
            (base_eccentricity + 0.2).min(MAX_VARIATION_ECCENTRICITY),
        ),
        (
            "Lower Orbit",
            (base_semi_major_axis_km * 0.7).max(min_axis),
            (base_eccentricity - 0.1).max(0.0),
        ),
    ];

    candidates
        .iter()
        .filter_map(|(name, a, e)| {
            geometry_from_shape(*a, *e, config)
                .ok()
                .map(|geometry| OrbitVariation::new(name, geometry))
        })
        .take(count)
        .collect()
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use crate::time::tle_epoch_to_utc;
    use approx::assert_relative_eq;

    fn geo_elements(mean_motion: f64, eccentricity: f64) -> ClassicalElements {
        ClassicalElements::new(
            tle_epoch_to_utc(2024, 1.5),
            mean_motion,
            eccentricity,
            0.0135,
            206.8784,
            5.6523,
            96.6140,
        )
    }

    #[test]
    fn test_geostationary_axis_from_mean_motion() {
        let config = OrbitrackConfig::default();
        let geometry = derive_geometry(&geo_elements(1.00270383, 0.0002945), &config).unwrap();

        assert_relative_eq!(geometry.semi_major_axis_km, 42165.0, max_relative = 1e-4);
        assert_relative_eq!(geometry.periapsis_km, 42152.0, max_relative = 1e-4);
        assert_relative_eq!(geometry.apoapsis_km, 42178.0, max_relative = 1e-4);
    }

    #[test]
    fn test_axis_ordering_invariants() {
        let config = OrbitrackConfig::default();
        for (n, e) in [(1.00270383, 0.0002945), (15.49396855, 0.0002570), (2.0, 0.4)] {
            let geometry = derive_geometry(&geo_elements(n, e), &config).unwrap();
            assert!(geometry.periapsis_km <= geometry.semi_major_axis_km);
            assert!(geometry.semi_major_axis_km <= geometry.apoapsis_km);
            assert!(geometry.semi_minor_axis_km <= geometry.semi_major_axis_km);
        }
    }

    #[test]
    fn test_open_trajectories_are_rejected() {
        let config = OrbitrackConfig::default();
        for e in [1.0, 1.3] {
            let err = derive_geometry(&geo_elements(1.00270383, e), &config).unwrap_err();
            assert!(matches!(err, OrbitrackError::InvalidOrbit { eccentricity, .. } if eccentricity == e));
        }
        assert!(derive_geometry(&geo_elements(0.0, 0.1), &config).is_err());
        assert!(derive_geometry(&geo_elements(-1.0, 0.1), &config).is_err());
    }

    #[test]
    fn test_suborbital_periapsis_is_rejected() {
        let config = OrbitrackConfig::default();
        // 16.5 rev/day puts the semi-major axis near 6550 km, under the floor
        let err = derive_geometry(&geo_elements(16.5, 0.0), &config).unwrap_err();
        match err {
            OrbitrackError::InvalidOrbit {
                periapsis_km,
                floor_km,
                ..
            } => {
                assert!(periapsis_km <= floor_km);
                assert_eq!(floor_km, 6578.0);
            }
            other => panic!("expected InvalidOrbit, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_axis_recovery() {
        // parsing a generated record and re-deriving reproduces the axis
        let config = OrbitrackConfig::default();
        let direct = derive_geometry(&geo_elements(1.00270383, 0.0002945), &config).unwrap();

        let line1 = "1 43039U 17073A   24001.50000000  .00000100  00000-0  00000-0 0  9990";
        let line2 = "2 43039   0.0135 206.8784 0002945   5.6523  96.6140  1.00270383 1234";
        let parsed = crate::tle::parse_elements(line1, line2).unwrap();
        let from_record = derive_geometry(&parsed, &config).unwrap();

        assert_relative_eq!(
            from_record.semi_major_axis_km,
            direct.semi_major_axis_km,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_equations() {
        let config = OrbitrackConfig::default();
        let geometry = geometry_from_shape(42165.0, 0.0002945, &config).unwrap();
        let equation = geometry.cartesian_equation();
        assert!(equation.starts_with("(x / 42165.00)^2"));
        assert!(equation.ends_with(" = 1"));
        assert_eq!(
            geometry.polar_equation(),
            "r = 42165(1 - 0.0002945²)/(1 + 0.0002945cos(θ))"
        );

        let circular = geometry_from_shape(63247.5, 0.0, &config).unwrap();
        assert_eq!(circular.polar_equation(), "r = 63247.5");
    }

    #[test]
    fn test_orbital_plane_ring() {
        let config = OrbitrackConfig::default();
        let geometry = geometry_from_shape(42165.0, 0.0002945, &config).unwrap();
        let points = geometry.orbital_plane_points(100);
        assert_eq!(points.len(), 100);
        assert_relative_eq!(points[0].x, geometry.semi_major_axis_km);
        for p in &points {
            assert_eq!(p.z, 0.0);
            let on_ellipse = (p.x / geometry.semi_major_axis_km).powi(2)
                + (p.y / geometry.semi_minor_axis_km).powi(2);
            assert_relative_eq!(on_ellipse, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_variations_for_high_orbit() {
        let config = OrbitrackConfig::default();
        let variations = generate_variations(42165.0, 0.0002945, 4, &config);

        let names: Vec<&str> = variations.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Base Orbit",
                "Higher Circular Orbit",
                "More Eccentric Orbit",
                "Lower Orbit"
            ]
        );
        for variation in &variations {
            assert!(variation.geometry.periapsis_km > config.periapsis_floor_km());
            assert!(variation.equation.starts_with("r = "));
        }
    }

    #[test]
    fn test_variations_filter_unsafe_orbits() {
        let config = OrbitrackConfig::default();
        // low orbit: shrinking it further drops the periapsis under the floor
        let variations = generate_variations(6800.0, 0.0, 4, &config);
        let names: Vec<&str> = variations.iter().map(|v| v.name.as_str()).collect();
        assert!(!names.contains(&"Lower Orbit"));
        assert!(names.contains(&"Base Orbit"));
    }

    #[test]
    fn test_variations_truncate_to_count() {
        let config = OrbitrackConfig::default();
        let variations = generate_variations(42165.0, 0.0002945, 2, &config);
        assert_eq!(variations.len(), 2);
    }
}
