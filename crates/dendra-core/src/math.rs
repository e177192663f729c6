//! Closed-form integrators over the canonical cell shapes.
//!
//! Cables are chains of truncated cones (frusta); somata are spheres.
//! Lengths are in µm, areas in µm², volumes in µm³ throughout the
//! workspace.
//!
//! The piecewise integrators in `dendra-fvm` rely on the fact that
//! splitting a frustum at any interior cross-section and summing the two
//! parts reproduces the closed-form area and volume exactly (up to
//! rounding); this is verified by the property tests below.

use crate::Value;
use std::f64::consts::PI;

/// Surface area of a sphere with radius `r`.
///
/// # Examples
///
/// ```
/// let a = dendra_core::math::area_sphere(6.30785);
/// assert!((a - 500.0).abs() < 0.1); // the classic 500 µm² soma
/// ```
pub fn area_sphere(r: Value) -> Value {
    4.0 * PI * r * r
}

/// Volume of a sphere with radius `r`.
pub fn volume_sphere(r: Value) -> Value {
    4.0 / 3.0 * PI * r * r * r
}

/// Lateral surface area of a truncated cone of length `l` with end radii
/// `r1` and `r2`.
///
/// Reduces to the cylinder area `2πrl` when `r1 == r2`.
pub fn area_frustum(l: Value, r1: Value, r2: Value) -> Value {
    let dr = r2 - r1;
    PI * (r1 + r2) * (l * l + dr * dr).sqrt()
}

/// Volume of a truncated cone of length `l` with end radii `r1` and `r2`.
pub fn volume_frustum(l: Value, r1: Value, r2: Value) -> Value {
    PI * l / 3.0 * (r1 * r1 + r1 * r2 + r2 * r2)
}

/// Cross-sectional area of a cable at radius `r`.
pub fn area_circle(r: Value) -> Value {
    PI * r * r
}

/// Radius at fraction `t ∈ [0, 1]` along a frustum tapering from `r1`
/// to `r2`.
pub fn lerp_radius(r1: Value, r2: Value, t: Value) -> Value {
    r1 + t * (r2 - r1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn sphere_area_and_volume() {
        assert_relative_eq!(area_sphere(1.0), 4.0 * PI);
        assert_relative_eq!(volume_sphere(1.0), 4.0 / 3.0 * PI);
        assert_relative_eq!(volume_sphere(2.0), 8.0 * volume_sphere(1.0));
    }

    #[test]
    fn cylinder_special_case() {
        // r1 == r2 degenerates to a cylinder.
        assert_relative_eq!(area_frustum(100.0, 0.5, 0.5), 2.0 * PI * 0.5 * 100.0);
        assert_relative_eq!(volume_frustum(100.0, 0.5, 0.5), PI * 0.25 * 100.0);
    }

    #[test]
    fn tapered_frustum() {
        // Truncated cone, length 10, radii 10 -> 5: area = 2πLr√(1 + m²)
        // with r the mean radius and m the taper slope.
        let a = area_frustum(10.0, 10.0, 5.0);
        assert_relative_eq!(a, 2.0 * PI * 10.0 * 7.5 * 1.25f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn half_split_is_exact() {
        let (l, r1, r2) = (17.0, 20.0, 11.5);
        let rc = lerp_radius(r1, r2, 0.5);
        let whole = area_frustum(l, r1, r2);
        let halves = area_frustum(l / 2.0, r1, rc) + area_frustum(l / 2.0, rc, r2);
        assert_relative_eq!(whole, halves, max_relative = 10.0 * f64::EPSILON);

        let vol = volume_frustum(l, r1, r2);
        let vol_halves = volume_frustum(l / 2.0, r1, rc) + volume_frustum(l / 2.0, rc, r2);
        assert_relative_eq!(vol, vol_halves, max_relative = 10.0 * f64::EPSILON);
    }

    proptest! {
        #[test]
        fn frustum_split_additive(
            l in 0.1f64..1000.0,
            r1 in 0.05f64..50.0,
            r2 in 0.05f64..50.0,
            t in 0.01f64..0.99,
        ) {
            let rc = lerp_radius(r1, r2, t);
            let area = area_frustum(l, r1, r2);
            let parts = area_frustum(t * l, r1, rc) + area_frustum((1.0 - t) * l, rc, r2);
            prop_assert!((area - parts).abs() <= 1e-12 * area);

            let vol = volume_frustum(l, r1, r2);
            let vparts = volume_frustum(t * l, r1, rc) + volume_frustum((1.0 - t) * l, rc, r2);
            prop_assert!((vol - vparts).abs() <= 1e-12 * vol);
        }

        #[test]
        fn frustum_monotone_in_length(
            l in 0.1f64..1000.0,
            r1 in 0.05f64..50.0,
            r2 in 0.05f64..50.0,
        ) {
            prop_assert!(area_frustum(l * 2.0, r1, r2) > area_frustum(l, r1, r2));
            prop_assert!(volume_frustum(l * 2.0, r1, r2) > volume_frustum(l, r1, r2));
        }
    }
}
