//! Morphological segments: spherical somata and tapered cables.

use crate::error::CellError;
use dendra_core::{math, Value};

/// A spherical soma.
#[derive(Clone, Debug, PartialEq)]
pub struct SomaSegment {
    /// Radius [µm].
    pub radius: Value,
}

impl SomaSegment {
    /// Membrane surface area [µm²].
    pub fn area(&self) -> Value {
        math::area_sphere(self.radius)
    }

    /// Volume [µm³].
    pub fn volume(&self) -> Value {
        math::volume_sphere(self.radius)
    }
}

/// A tapered cable: a chain of conical frusta.
///
/// `radii` holds `k + 1` radii and `lengths` the `k` frustum lengths
/// between them. The cable is discretized into `num_compartments`
/// equal-length sub-volumes.
#[derive(Clone, Debug, PartialEq)]
pub struct CableSegment {
    radii: Vec<Value>,
    lengths: Vec<Value>,
    num_compartments: u32,
    tag: Option<String>,
}

impl CableSegment {
    /// Build a cable from explicit frustum chains.
    pub fn new(
        radii: Vec<Value>,
        lengths: Vec<Value>,
        num_compartments: u32,
        tag: Option<String>,
    ) -> Result<Self, CellError> {
        if radii.len() < 2 {
            return Err(CellError::InvalidGeometry {
                reason: format!("need at least two radii, got {}", radii.len()),
            });
        }
        if lengths.len() != radii.len() - 1 {
            return Err(CellError::InvalidGeometry {
                reason: format!(
                    "{} radii require {} lengths, got {}",
                    radii.len(),
                    radii.len() - 1,
                    lengths.len()
                ),
            });
        }
        if radii.iter().any(|&r| r <= 0.0) || lengths.iter().any(|&l| l <= 0.0) {
            return Err(CellError::InvalidGeometry {
                reason: "radii and lengths must be positive".into(),
            });
        }
        if num_compartments == 0 {
            return Err(CellError::InvalidGeometry {
                reason: "compartment count must be at least one".into(),
            });
        }
        Ok(Self {
            radii,
            lengths,
            num_compartments,
            tag,
        })
    }

    /// Build a single two-point frustum of `length` from `r_prox` to
    /// `r_dist`.
    pub fn frustum(
        length: Value,
        r_prox: Value,
        r_dist: Value,
        num_compartments: u32,
        tag: Option<String>,
    ) -> Result<Self, CellError> {
        Self::new(vec![r_prox, r_dist], vec![length], num_compartments, tag)
    }

    /// Radii at the frustum joints, proximal to distal.
    pub fn radii(&self) -> &[Value] {
        &self.radii
    }

    /// Frustum lengths.
    pub fn lengths(&self) -> &[Value] {
        &self.lengths
    }

    /// Number of frusta in the chain.
    pub fn num_sub_segments(&self) -> usize {
        self.lengths.len()
    }

    /// Number of compartments.
    pub fn num_compartments(&self) -> u32 {
        self.num_compartments
    }

    /// Change the compartment count.
    pub fn set_compartments(&mut self, n: u32) -> Result<(), CellError> {
        if n == 0 {
            return Err(CellError::InvalidGeometry {
                reason: "compartment count must be at least one".into(),
            });
        }
        self.num_compartments = n;
        Ok(())
    }

    /// Region tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Total arc length [µm].
    pub fn length(&self) -> Value {
        self.lengths.iter().sum()
    }

    /// Total lateral membrane area [µm²].
    pub fn area(&self) -> Value {
        (0..self.num_sub_segments())
            .map(|i| math::area_frustum(self.lengths[i], self.radii[i], self.radii[i + 1]))
            .sum()
    }

    /// Total volume [µm³].
    pub fn volume(&self) -> Value {
        (0..self.num_sub_segments())
            .map(|i| math::volume_frustum(self.lengths[i], self.radii[i], self.radii[i + 1]))
            .sum()
    }

    /// Radius at fraction `pos ∈ [0, 1]` along the cable by arc length.
    pub fn radius_at(&self, pos: Value) -> Value {
        let target = pos.clamp(0.0, 1.0) * self.length();
        let mut offset = 0.0;
        for i in 0..self.num_sub_segments() {
            let l = self.lengths[i];
            if target <= offset + l || i == self.num_sub_segments() - 1 {
                let t = ((target - offset) / l).clamp(0.0, 1.0);
                return math::lerp_radius(self.radii[i], self.radii[i + 1], t);
            }
            offset += l;
        }
        *self.radii.last().expect("cable has at least two radii")
    }
}

/// A morphological segment: the tagged sum over the two cell shapes.
///
/// Discretization code branches on the variant explicitly; there is no
/// dynamic dispatch over segment kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    /// A spherical soma.
    Soma(SomaSegment),
    /// A tapered cable.
    Cable(CableSegment),
}

impl Segment {
    /// The soma variant, if this is a soma.
    pub fn as_soma(&self) -> Option<&SomaSegment> {
        match self {
            Self::Soma(s) => Some(s),
            Self::Cable(_) => None,
        }
    }

    /// The cable variant, if this is a cable.
    pub fn as_cable(&self) -> Option<&CableSegment> {
        match self {
            Self::Soma(_) => None,
            Self::Cable(c) => Some(c),
        }
    }

    /// Mutable cable variant, if this is a cable.
    pub fn as_cable_mut(&mut self) -> Option<&mut CableSegment> {
        match self {
            Self::Soma(_) => None,
            Self::Cable(c) => Some(c),
        }
    }

    /// Membrane surface area [µm²].
    pub fn area(&self) -> Value {
        match self {
            Self::Soma(s) => s.area(),
            Self::Cable(c) => c.area(),
        }
    }

    /// Volume [µm³].
    pub fn volume(&self) -> Value {
        match self {
            Self::Soma(s) => s.volume(),
            Self::Cable(c) => c.volume(),
        }
    }

    /// Number of compartments: one for a soma.
    pub fn num_compartments(&self) -> u32 {
        match self {
            Self::Soma(_) => 1,
            Self::Cable(c) => c.num_compartments(),
        }
    }

    /// The region tag: cables carry an explicit tag, somata are
    /// implicitly tagged `"soma"`.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Soma(_) => Some("soma"),
            Self::Cable(c) => c.tag(),
        }
    }
}
