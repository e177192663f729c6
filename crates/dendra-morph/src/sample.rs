//! Morphology samples and the append-only sample tree.

use crate::error::TreeError;
use dendra_core::Value;

/// Sentinel parent index for the root sample.
pub const NPOS: usize = usize::MAX;

/// A single morphology sample: a 3-D point with a radius and an integer
/// tag (e.g. the structure identifier of a reconstruction format).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// x coordinate [µm].
    pub x: Value,
    /// y coordinate [µm].
    pub y: Value,
    /// z coordinate [µm].
    pub z: Value,
    /// Radius at the sample point [µm].
    pub radius: Value,
    /// Structure tag.
    pub tag: i32,
}

impl Sample {
    /// Construct a sample.
    pub fn new(x: Value, y: Value, z: Value, radius: Value, tag: i32) -> Self {
        Self { x, y, z, radius, tag }
    }

    /// Euclidean distance to another sample point.
    pub fn distance(&self, other: &Sample) -> Value {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// An append-only tree of morphology samples.
///
/// The first sample is appended with [`NPOS`] as parent and becomes the
/// root; every later sample must reference an existing sample.
///
/// # Examples
///
/// ```
/// use dendra_morph::{Sample, SampleTree, NPOS};
///
/// let mut st = SampleTree::new();
/// let root = st.append(NPOS, Sample::new(0.0, 0.0, 0.0, 5.0, 1)).unwrap();
/// let tip = st.append(root, Sample::new(100.0, 0.0, 0.0, 0.5, 3)).unwrap();
/// assert_eq!(st.num_samples(), 2);
/// assert_eq!(st.parent(tip), root);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTree {
    samples: Vec<Sample>,
    parents: Vec<usize>,
}

impl SampleTree {
    /// An empty sample tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parallel sample and parent arrays.
    pub fn from_arrays(samples: Vec<Sample>, parents: Vec<usize>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for (sample, &parent) in samples.iter().zip(parents.iter()) {
            tree.append(parent, *sample)?;
        }
        Ok(tree)
    }

    /// Append a sample under `parent`, returning its index.
    ///
    /// The first sample must use [`NPOS`] as parent; subsequent samples
    /// must reference a sample already in the tree.
    pub fn append(&mut self, parent: usize, sample: Sample) -> Result<usize, TreeError> {
        let index = self.samples.len();
        let valid = if index == 0 {
            parent == NPOS
        } else {
            parent < index
        };
        if !valid {
            return Err(TreeError::InvalidSampleParent { index, parent });
        }
        self.samples.push(sample);
        self.parents.push(parent);
        Ok(index)
    }

    /// Number of samples.
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Whether the tree has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `i`.
    pub fn sample(&self, i: usize) -> &Sample {
        &self.samples[i]
    }

    /// All samples in append order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Parent of sample `i` ([`NPOS`] for the root).
    pub fn parent(&self, i: usize) -> usize {
        self.parents[i]
    }

    /// Parent array in append order.
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Children of sample `i` in append order.
    pub fn children(&self, i: usize) -> Vec<usize> {
        (0..self.num_samples())
            .filter(|&j| self.parents[j] == i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn append_and_query() {
        let mut st = SampleTree::new();
        let a = st.append(NPOS, Sample::new(0.0, 0.0, 0.0, 2.0, 1)).unwrap();
        let b = st.append(a, Sample::new(3.0, 4.0, 0.0, 1.0, 3)).unwrap();
        let c = st.append(a, Sample::new(0.0, 0.0, 5.0, 1.0, 3)).unwrap();
        assert_eq!(st.num_samples(), 3);
        assert_eq!(st.children(a), vec![b, c]);
        assert_relative_eq!(st.sample(a).distance(st.sample(b)), 5.0);
    }

    #[test]
    fn rejects_npos_on_nonempty() {
        let mut st = SampleTree::new();
        st.append(NPOS, Sample::new(0.0, 0.0, 0.0, 2.0, 1)).unwrap();
        let err = st.append(NPOS, Sample::new(1.0, 0.0, 0.0, 2.0, 1));
        assert_eq!(
            err,
            Err(TreeError::InvalidSampleParent { index: 1, parent: NPOS })
        );
    }

    #[test]
    fn rejects_forward_parent() {
        let mut st = SampleTree::new();
        st.append(NPOS, Sample::new(0.0, 0.0, 0.0, 2.0, 1)).unwrap();
        let err = st.append(5, Sample::new(1.0, 0.0, 0.0, 2.0, 1));
        assert_eq!(err, Err(TreeError::InvalidSampleParent { index: 1, parent: 5 }));
    }

    #[test]
    fn first_sample_must_be_root() {
        let mut st = SampleTree::new();
        let err = st.append(0, Sample::new(0.0, 0.0, 0.0, 2.0, 1));
        assert_eq!(err, Err(TreeError::InvalidSampleParent { index: 0, parent: 0 }));
    }
}
