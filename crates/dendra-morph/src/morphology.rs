//! Branch decomposition of a sample tree.

use crate::sample::{SampleTree, NPOS};
use crate::tree::Tree;
use dendra_core::Value;

/// The branch structure of a morphology: maximal unbranched sample runs.
///
/// Branches are numbered in preorder over the sample tree. With a
/// *spherical root* the root sample forms its own spherical branch 0 and
/// is not shared as the proximal sample of its child branches; without
/// it, the root sample heads the first branch and fork samples are
/// shared as the proximal point of their child branches. A single-sample
/// tree is always treated as spherical.
///
/// # Examples
///
/// ```
/// use dendra_morph::{Morphology, Sample, SampleTree, NPOS};
///
/// let mut st = SampleTree::new();
/// let soma = st.append(NPOS, Sample::new(0.0, 0.0, 0.0, 10.0, 1)).unwrap();
/// let a = st.append(soma, Sample::new(10.0, 0.0, 0.0, 2.0, 3)).unwrap();
/// st.append(a, Sample::new(100.0, 0.0, 0.0, 2.0, 3)).unwrap();
///
/// let m = Morphology::new(st, true);
/// assert_eq!(m.num_branches(), 2);
/// assert_eq!(m.branch_length(0), 20.0); // sphere: diameter
/// assert_eq!(m.branch_length(1), 90.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Morphology {
    samples: SampleTree,
    spherical_root: bool,
    branches: Vec<Vec<usize>>,
    branch_parents: Vec<usize>,
}

impl Morphology {
    /// Decompose `samples` into branches.
    ///
    /// `spherical_root` controls whether the root sample is interpreted
    /// as a sphere (a soma) rather than the proximal point of a cable.
    pub fn new(samples: SampleTree, spherical_root: bool) -> Self {
        let n = samples.num_samples();
        let spherical = spherical_root || n == 1;

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 1..n {
            children[samples.parent(i)].push(i);
        }

        let mut branches: Vec<Vec<usize>> = Vec::new();
        let mut branch_parents: Vec<usize> = Vec::new();

        if n > 0 {
            // Work items: (shared proximal sample, chain start, parent branch).
            let mut stack: Vec<(Option<usize>, usize, usize)> = Vec::new();
            if spherical {
                branches.push(vec![0]);
                branch_parents.push(NPOS);
                for &c in children[0].iter().rev() {
                    stack.push((None, c, 0));
                }
            } else {
                for &c in children[0].iter().rev() {
                    stack.push((Some(0), c, NPOS));
                }
            }

            while let Some((head, start, parent)) = stack.pop() {
                let mut chain: Vec<usize> = head.into_iter().collect();
                chain.push(start);
                let mut cur = start;
                while children[cur].len() == 1 {
                    cur = children[cur][0];
                    chain.push(cur);
                }
                let b = branches.len();
                branches.push(chain);
                branch_parents.push(parent);
                for &c in children[cur].iter().rev() {
                    stack.push((Some(cur), c, b));
                }
            }
        }

        Self {
            samples,
            spherical_root: spherical,
            branches,
            branch_parents,
        }
    }

    /// Number of branches.
    pub fn num_branches(&self) -> usize {
        self.branches.len()
    }

    /// Whether branch 0 is a sphere.
    pub fn spherical_root(&self) -> bool {
        self.spherical_root
    }

    /// The underlying sample tree.
    pub fn samples(&self) -> &SampleTree {
        &self.samples
    }

    /// Sample indices of branch `b`, proximal to distal.
    pub fn branch_samples(&self, b: usize) -> &[usize] {
        &self.branches[b]
    }

    /// Parent branch of `b`, or [`NPOS`] for a root branch.
    pub fn branch_parent(&self, b: usize) -> usize {
        self.branch_parents[b]
    }

    /// Arc length of branch `b`: the sum of inter-sample distances, or
    /// the diameter for a spherical branch.
    pub fn branch_length(&self, b: usize) -> Value {
        let chain = &self.branches[b];
        if self.is_sphere(b) {
            return 2.0 * self.samples.sample(chain[0]).radius;
        }
        chain
            .windows(2)
            .map(|w| self.samples.sample(w[0]).distance(self.samples.sample(w[1])))
            .sum()
    }

    /// Whether branch `b` is the spherical root branch.
    pub fn is_sphere(&self, b: usize) -> bool {
        b == 0 && self.spherical_root
    }

    /// Canonical location of sample `i` as `(branch, pos)` with
    /// `pos ∈ [0, 1]` by arc length.
    ///
    /// A sample shared between a branch end and its child branches is
    /// reported on the branch where it is distal; the spherical root is
    /// reported at the centre of branch 0.
    pub fn sample_location(&self, i: usize) -> (usize, Value) {
        if self.spherical_root && i == 0 {
            return (0, 0.5);
        }
        let mut location: Option<(usize, Value)> = None;
        for (b, chain) in self.branches.iter().enumerate() {
            if self.is_sphere(b) {
                continue;
            }
            let len = self.branch_length(b);
            let mut cum = 0.0;
            for (j, &s) in chain.iter().enumerate() {
                if j > 0 {
                    cum += self
                        .samples
                        .sample(chain[j - 1])
                        .distance(self.samples.sample(s));
                }
                if s == i {
                    let pos = if len > 0.0 { cum / len } else { 0.0 };
                    // Prefer the branch where the sample is interior or
                    // distal over one where it is the shared proximal
                    // point.
                    if j > 0 || location.is_none() {
                        location = Some((b, pos));
                    }
                }
            }
        }
        location.unwrap_or((0, 0.0))
    }

    /// The branch-level parent tree.
    ///
    /// Root branches (parent [`NPOS`]) are attached under branch 0, so
    /// the result always has a single root.
    pub fn tree(&self) -> Tree {
        let parents: Vec<usize> = self
            .branch_parents
            .iter()
            .map(|&p| if p == NPOS { 0 } else { p })
            .collect();
        Tree::from_parent_index(&parents).expect("branch parents are preorder-numbered")
    }
}
