//! Division of a cable into per-compartment half-volume integrals.

use dendra_core::{math, Value};

/// Integrated geometry of one half-compartment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Semicompartment {
    /// Arc length [µm].
    pub length: Value,
    /// Lateral membrane area [µm²].
    pub area: Value,
    /// Volume [µm³].
    pub volume: Value,
    /// Radius at the proximal cut [µm].
    pub rad_prox: Value,
    /// Radius at the distal cut [µm].
    pub rad_dist: Value,
}

/// One compartment, split at its midpoint into proximal and distal
/// halves.
///
/// Adjacent compartments share a dividing plane, so summing all halves
/// of a cable reproduces its total area and volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DivCompartment {
    /// Proximal half.
    pub left: Semicompartment,
    /// Distal half.
    pub right: Semicompartment,
}

/// A cable divided into `N` equal-length compartments, each integrated
/// over the piecewise-conical radius profile.
///
/// # Examples
///
/// ```
/// use dendra_fvm::DividedCable;
///
/// // A uniform cylinder splits into equal halves.
/// let div = DividedCable::by_ends(4, &[0.5, 0.5], &[200.0]);
/// let total: f64 = (0..4).map(|i| {
///     let c = div.compartment(i);
///     c.left.area + c.right.area
/// }).sum();
/// assert!((total - 2.0 * std::f64::consts::PI * 0.5 * 200.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DividedCable {
    compartments: Vec<DivCompartment>,
    total_length: Value,
}

impl DividedCable {
    /// Divide a frustum chain into `ncomp` compartments with cuts at the
    /// compartment ends and midpoints.
    ///
    /// `radii` holds `k + 1` joint radii, `lengths` the `k` frustum
    /// lengths, as in
    /// [`CableSegment`](dendra_cell::CableSegment).
    pub fn by_ends(ncomp: u32, radii: &[Value], lengths: &[Value]) -> Self {
        assert!(ncomp > 0, "cable must have at least one compartment");
        assert_eq!(
            lengths.len() + 1,
            radii.len(),
            "frustum chain needs one more radius than lengths"
        );
        let total: Value = lengths.iter().sum();
        let n = ncomp as usize;
        let mut compartments = Vec::with_capacity(n);
        for i in 0..n {
            let x0 = total * (i as Value / n as Value);
            let xc = total * ((i as Value + 0.5) / n as Value);
            let x1 = total * ((i + 1) as Value / n as Value);
            compartments.push(DivCompartment {
                left: integrate(radii, lengths, x0, xc),
                right: integrate(radii, lengths, xc, x1),
            });
        }
        Self {
            compartments,
            total_length: total,
        }
    }

    /// Number of compartments.
    pub fn num_compartments(&self) -> usize {
        self.compartments.len()
    }

    /// Compartment `i`.
    pub fn compartment(&self, i: usize) -> &DivCompartment {
        &self.compartments[i]
    }

    /// All compartments, proximal to distal.
    pub fn compartments(&self) -> &[DivCompartment] {
        &self.compartments
    }

    /// Total cable length [µm].
    pub fn total_length(&self) -> Value {
        self.total_length
    }

    /// Uniform compartment length [µm].
    pub fn compartment_length(&self) -> Value {
        self.total_length / self.compartments.len() as Value
    }
}

/// Radius at absolute arc position `x` along the frustum chain.
fn radius_at(radii: &[Value], lengths: &[Value], x: Value) -> Value {
    let mut offset = 0.0;
    for (i, &l) in lengths.iter().enumerate() {
        if x <= offset + l || i == lengths.len() - 1 {
            let t = ((x - offset) / l).clamp(0.0, 1.0);
            return math::lerp_radius(radii[i], radii[i + 1], t);
        }
        offset += l;
    }
    radii[0]
}

/// Integrate area and volume over `[x0, x1]` of the frustum chain.
fn integrate(radii: &[Value], lengths: &[Value], x0: Value, x1: Value) -> Semicompartment {
    let mut area = 0.0;
    let mut volume = 0.0;
    let mut offset = 0.0;
    for (i, &l) in lengths.iter().enumerate() {
        let (seg_lo, seg_hi) = (offset, offset + l);
        let lo = x0.max(seg_lo);
        let hi = x1.min(seg_hi);
        if hi > lo {
            let r_lo = math::lerp_radius(radii[i], radii[i + 1], (lo - seg_lo) / l);
            let r_hi = math::lerp_radius(radii[i], radii[i + 1], (hi - seg_lo) / l);
            area += math::area_frustum(hi - lo, r_lo, r_hi);
            volume += math::volume_frustum(hi - lo, r_lo, r_hi);
        }
        offset = seg_hi;
    }
    Semicompartment {
        length: x1 - x0,
        area,
        volume,
        rad_prox: radius_at(radii, lengths, x0),
        rad_dist: radius_at(radii, lengths, x1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn total_area(div: &DividedCable) -> Value {
        div.compartments()
            .iter()
            .map(|c| c.left.area + c.right.area)
            .sum()
    }

    fn total_volume(div: &DividedCable) -> Value {
        div.compartments()
            .iter()
            .map(|c| c.left.volume + c.right.volume)
            .sum()
    }

    #[test]
    fn uniform_cylinder_halves() {
        let div = DividedCable::by_ends(4, &[0.5, 0.5], &[200.0]);
        let half = 2.0 * PI * 0.5 * 25.0;
        for c in div.compartments() {
            assert_relative_eq!(c.left.area, half, max_relative = 10.0 * f64::EPSILON);
            assert_relative_eq!(c.right.area, half, max_relative = 10.0 * f64::EPSILON);
            assert_relative_eq!(c.left.length, 25.0);
            assert_eq!(c.left.rad_prox, 0.5);
            assert_eq!(c.right.rad_dist, 0.5);
        }
        assert_relative_eq!(div.compartment_length(), 50.0);
    }

    #[test]
    fn tapered_cable_conserves_area_and_volume() {
        // Single frustum, 200 µm, radius 0.5 -> 0.1.
        let div = DividedCable::by_ends(3, &[0.5, 0.1], &[200.0]);
        let closed_area = dendra_core::math::area_frustum(200.0, 0.5, 0.1);
        let closed_volume = dendra_core::math::volume_frustum(200.0, 0.5, 0.1);
        assert_relative_eq!(total_area(&div), closed_area, max_relative = 10.0 * f64::EPSILON);
        assert_relative_eq!(
            total_volume(&div),
            closed_volume,
            max_relative = 10.0 * f64::EPSILON
        );
    }

    #[test]
    fn cut_radii_interpolate() {
        let div = DividedCable::by_ends(2, &[1.0, 0.2], &[100.0]);
        let c0 = div.compartment(0);
        assert_relative_eq!(c0.left.rad_prox, 1.0);
        assert_relative_eq!(c0.left.rad_dist, 0.8); // radius at 25 µm
        assert_relative_eq!(c0.right.rad_dist, 0.6); // radius at 50 µm
        let c1 = div.compartment(1);
        assert_relative_eq!(c1.right.rad_dist, 0.2);
    }

    #[test]
    fn multi_frustum_chain() {
        // Two frusta with a joint at 10 µm; one compartment spans both.
        let radii = [1.0, 2.0, 0.5];
        let lengths = [10.0, 30.0];
        let div = DividedCable::by_ends(1, &radii, &lengths);
        let closed = dendra_core::math::area_frustum(10.0, 1.0, 2.0)
            + dendra_core::math::area_frustum(30.0, 2.0, 0.5);
        assert_relative_eq!(total_area(&div), closed, max_relative = 10.0 * f64::EPSILON);
    }

    proptest! {
        #[test]
        fn halves_conserve_cable_totals(
            ncomp in 1u32..12,
            geometry in prop::collection::vec((0.05f64..5.0, 1.0f64..300.0), 1..6),
        ) {
            let mut radii: Vec<Value> = geometry.iter().map(|&(r, _)| r).collect();
            radii.push(geometry[0].0);
            let lengths: Vec<Value> = geometry.iter().map(|&(_, l)| l).collect();

            let closed_area: Value = (0..lengths.len())
                .map(|i| dendra_core::math::area_frustum(lengths[i], radii[i], radii[i + 1]))
                .sum();
            let closed_volume: Value = (0..lengths.len())
                .map(|i| dendra_core::math::volume_frustum(lengths[i], radii[i], radii[i + 1]))
                .sum();

            let div = DividedCable::by_ends(ncomp, &radii, &lengths);
            prop_assert!((total_area(&div) - closed_area).abs() <= 1e-12 * closed_area);
            prop_assert!((total_volume(&div) - closed_volume).abs() <= 1e-12 * closed_volume);
        }
    }
}
