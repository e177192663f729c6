//! Parent-index-array tree with rerooting.

use crate::error::TreeError;
use smallvec::SmallVec;

/// Per-node child list, stored inline for typical branching factors.
pub type ChildList = SmallVec<[usize; 4]>;

/// A rooted tree in parent-index-array form.
///
/// Nodes are numbered `0..n`; node 0 is the root and is its own parent.
/// Every other node references a strict predecessor, which makes the
/// representation acyclic and connected by construction. Child lists are
/// kept in insertion order, so traversals are deterministic.
///
/// # Examples
///
/// ```
/// use dendra_morph::Tree;
///
/// //        0
/// //       / \
/// //      1   2
/// //     / \
/// //    3   4
/// let t = Tree::from_parent_index(&[0, 0, 0, 1, 1]).unwrap();
/// assert_eq!(t.num_nodes(), 5);
/// assert_eq!(t.num_children(0), 2);
/// assert_eq!(t.num_children(1), 2);
/// assert_eq!(t.depth(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    parents: Vec<usize>,
    children: Vec<ChildList>,
}

impl Tree {
    /// Build a tree from a parent-index array.
    ///
    /// An empty input is normalized to a single-node tree. Entry 0 is the
    /// root regardless of its stored value; every later entry must
    /// reference a strict predecessor, otherwise
    /// [`TreeError::InvalidParent`] is returned.
    pub fn from_parent_index(parents: &[usize]) -> Result<Self, TreeError> {
        if parents.is_empty() {
            return Ok(Self {
                parents: vec![0],
                children: vec![ChildList::new()],
            });
        }
        let n = parents.len();
        let mut norm = Vec::with_capacity(n);
        norm.push(0);
        for (i, &p) in parents.iter().enumerate().skip(1) {
            if p >= i {
                return Err(TreeError::InvalidParent { index: i, parent: p });
            }
            norm.push(p);
        }
        let mut children = vec![ChildList::new(); n];
        for (i, &p) in norm.iter().enumerate().skip(1) {
            children[p].push(i);
        }
        Ok(Self {
            parents: norm,
            children,
        })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.parents.len()
    }

    /// Parent of node `i`; the root is its own parent.
    pub fn parent(&self, i: usize) -> usize {
        self.parents[i]
    }

    /// The full parent array.
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Number of children of node `i`.
    pub fn num_children(&self, i: usize) -> usize {
        self.children[i].len()
    }

    /// Children of node `i` in insertion order.
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// Maximum node depth, counting edges from the root.
    pub fn depth(&self) -> usize {
        // parents[i] < i, so depths can be filled in one forward sweep.
        let mut depth = vec![0usize; self.num_nodes()];
        let mut max = 0;
        for i in 1..self.num_nodes() {
            depth[i] = depth[self.parents[i]] + 1;
            max = max.max(depth[i]);
        }
        max
    }

    /// Rebuild the tree with `new_root` as node 0.
    ///
    /// The unique path from the old root to `new_root` is reversed: each
    /// ex-parent along it becomes the last child of its ex-child. Nodes
    /// are then renumbered by a preorder DFS from `new_root` that emits
    /// children in stable order. The node count is invariant.
    pub fn change_root(&self, new_root: usize) -> Tree {
        let n = self.num_nodes();
        assert!(new_root < n, "new root {new_root} out of range for {n} nodes");
        if new_root == 0 {
            return self.clone();
        }

        // Reorient the root -> new_root path in a scratch adjacency copy.
        let mut adj = self.children.clone();
        let mut path = vec![new_root];
        let mut cur = new_root;
        while cur != 0 {
            cur = self.parents[cur];
            path.push(cur);
        }
        for w in path.windows(2) {
            let (child, parent) = (w[0], w[1]);
            adj[parent].retain(|c| *c != child);
            adj[child].push(parent);
        }

        // Preorder DFS from the new root; push children reversed so they
        // pop in stable order.
        let mut new_index = vec![usize::MAX; n];
        let mut new_parents = vec![0usize; n];
        let mut children = vec![ChildList::new(); n];
        let mut next = 0usize;
        let mut stack: Vec<(usize, usize)> = vec![(new_root, 0)];
        while let Some((node, parent_new)) = stack.pop() {
            let idx = next;
            next += 1;
            new_index[node] = idx;
            new_parents[idx] = parent_new;
            if idx != 0 {
                children[parent_new].push(idx);
            }
            for &c in adj[node].iter().rev() {
                stack.push((c, idx));
            }
        }
        debug_assert_eq!(next, n);

        Tree {
            parents: new_parents,
            children,
        }
    }

    /// Reroot at a node that minimizes the maximum depth.
    ///
    /// The chosen node is a center of the tree's diameter path, found by
    /// two breadth-first sweeps. Used before discretization so that the
    /// node numbering produced by [`change_root`](Self::change_root)
    /// yields shallow elimination trees.
    pub fn balance(&self) -> Tree {
        self.change_root(self.balance_root())
    }

    /// The root [`balance`](Self::balance) would pick, without rerooting.
    pub fn balance_root(&self) -> usize {
        let u = self.farthest_from(0);
        let v = self.farthest_from(u);
        // Walk the u -> v path and take its middle node.
        let path = self.path_between(u, v);
        path[path.len() / 2]
    }

    fn farthest_from(&self, start: usize) -> usize {
        let dist = self.distances_from(start);
        let mut best = start;
        for (i, &d) in dist.iter().enumerate() {
            if d > dist[best] {
                best = i;
            }
        }
        best
    }

    fn distances_from(&self, start: usize) -> Vec<usize> {
        let n = self.num_nodes();
        let mut dist = vec![usize::MAX; n];
        dist[start] = 0;
        let mut queue = std::collections::VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            let mut visit = |w: usize| {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
            };
            if v != 0 {
                visit(self.parents[v]);
            }
            for &c in self.children[v].iter() {
                visit(c);
            }
        }
        dist
    }

    fn path_between(&self, u: usize, v: usize) -> Vec<usize> {
        // Both endpoints climb to the root; splice at the meeting point.
        let ancestors = |mut x: usize| {
            let mut up = vec![x];
            while x != 0 {
                x = self.parents[x];
                up.push(x);
            }
            up
        };
        let au = ancestors(u);
        let av = ancestors(v);
        let on_u: std::collections::HashSet<usize> = au.iter().copied().collect();
        let mut meet = 0;
        for &x in &av {
            if on_u.contains(&x) {
                meet = x;
                break;
            }
        }
        let mut path: Vec<usize> = au.iter().take_while(|&&x| x != meet).copied().collect();
        path.push(meet);
        let tail: Vec<usize> = av.iter().take_while(|&&x| x != meet).copied().collect();
        path.extend(tail.iter().rev());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_normalizes_to_single_node() {
        let t = Tree::from_parent_index(&[]).unwrap();
        assert_eq!(t.num_nodes(), 1);
        assert_eq!(t.num_children(0), 0);
    }

    #[test]
    fn single_node() {
        let t = Tree::from_parent_index(&[0]).unwrap();
        assert_eq!(t.num_nodes(), 1);
        assert_eq!(t.num_children(0), 0);
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn rejects_forward_parent() {
        assert_eq!(
            Tree::from_parent_index(&[0, 2, 1]),
            Err(TreeError::InvalidParent { index: 1, parent: 2 })
        );
        assert_eq!(
            Tree::from_parent_index(&[0, 0, 2]),
            Err(TreeError::InvalidParent { index: 2, parent: 2 })
        );
    }

    #[test]
    fn child_counts() {
        //        0
        //       / \
        //      1   2
        //     / \
        //    3   4
        //       / \
        //      5   6
        let t = Tree::from_parent_index(&[0, 0, 0, 1, 1, 4, 4]).unwrap();
        assert_eq!(t.num_nodes(), 7);
        assert_eq!(t.num_children(0), 2);
        assert_eq!(t.num_children(1), 2);
        assert_eq!(t.num_children(2), 0);
        assert_eq!(t.num_children(4), 2);
        assert_eq!(t.children(1), &[3, 4]);
        assert_eq!(t.depth(), 3);
    }

    #[test]
    fn change_root_three_nodes() {
        //      0       0
        //     / \      |
        //    1   2 ->  1
        //              |
        //              2
        let t = Tree::from_parent_index(&[0, 0, 0]).unwrap();
        let r = t.change_root(1);
        assert_eq!(r.num_nodes(), 3);
        assert_eq!(r.num_children(0), 1);
        assert_eq!(r.num_children(1), 1);
        assert_eq!(r.num_children(2), 0);
    }

    #[test]
    fn change_root_five_nodes() {
        //      0          0
        //     / \        /|\
        //    1   2  ->  1 2 3
        //   / \             |
        //  3   4            4
        let t = Tree::from_parent_index(&[0, 0, 0, 1, 1]).unwrap();
        let r = t.change_root(1);
        assert_eq!(r.num_nodes(), 5);
        assert_eq!(r.num_children(0), 3);
        assert_eq!(r.num_children(1), 0);
        assert_eq!(r.num_children(2), 0);
        assert_eq!(r.num_children(3), 1);
        assert_eq!(r.num_children(4), 0);
    }

    #[test]
    fn change_root_decreases_depth() {
        //      0         0
        //     / \       /|\
        //    1   2 ->  1 2 5
        //   / \         / \ \
        //  3   4       3   4 6
        //     / \
        //    5   6
        let t = Tree::from_parent_index(&[0, 0, 0, 1, 1, 4, 4]).unwrap();
        let r = t.change_root(1);
        assert_eq!(r.num_nodes(), 7);
        assert_eq!(r.num_children(0), 3);
        assert_eq!(r.num_children(1), 0);
        assert_eq!(r.num_children(2), 2);
        assert_eq!(r.num_children(3), 0);
        assert_eq!(r.num_children(4), 0);
        assert_eq!(r.num_children(5), 1);
        assert_eq!(r.num_children(6), 0);
        assert_eq!(t.depth(), 3);
        assert_eq!(r.depth(), 2);
    }

    #[test]
    fn change_root_at_root_is_identity() {
        let t = Tree::from_parent_index(&[0, 0, 1, 1]).unwrap();
        assert_eq!(t.change_root(0), t);
    }

    #[test]
    fn balance_picks_depth_minimizing_root() {
        let t = Tree::from_parent_index(&[0, 0, 0, 1, 1, 4, 4]).unwrap();
        let b = t.balance();
        assert_eq!(b.num_nodes(), 7);
        assert!(b.depth() <= t.depth());
        // No other root does better.
        let best = (0..t.num_nodes())
            .map(|r| t.change_root(r).depth())
            .min()
            .unwrap();
        assert_eq!(b.depth(), best);
    }

    /// Undirected node degrees, sorted. Invariant under rerooting.
    fn degree_multiset(t: &Tree) -> Vec<usize> {
        let mut degrees: Vec<usize> = (0..t.num_nodes())
            .map(|i| t.num_children(i) + usize::from(i != 0))
            .collect();
        degrees.sort_unstable();
        degrees
    }

    fn arb_parents(max: usize) -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0usize..max, 1..max).prop_map(|raw| {
            let mut parents = vec![0usize];
            for (i, r) in raw.iter().enumerate() {
                parents.push(r % (i + 1));
            }
            parents
        })
    }

    proptest! {
        #[test]
        fn change_root_preserves_structure(
            parents in arb_parents(24),
            root_pick in 0usize..24,
        ) {
            let t = Tree::from_parent_index(&parents).unwrap();
            let root = root_pick % t.num_nodes();
            let r = t.change_root(root);
            prop_assert_eq!(r.num_nodes(), t.num_nodes());
            prop_assert_eq!(degree_multiset(&r), degree_multiset(&t));
            // Parent array remains strictly predecessor-referring.
            for i in 1..r.num_nodes() {
                prop_assert!(r.parent(i) < i);
            }
            // Total edge count is conserved.
            let edges: usize = (0..r.num_nodes()).map(|i| r.num_children(i)).sum();
            prop_assert_eq!(edges, t.num_nodes() - 1);
        }

        #[test]
        fn balance_never_increases_depth(parents in arb_parents(24)) {
            let t = Tree::from_parent_index(&parents).unwrap();
            prop_assert!(t.balance().depth() <= t.depth());
        }
    }
}
