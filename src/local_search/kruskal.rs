//! MST-based path reconstruction.
//!
//! # Algorithm
//!
//! 1. Build a minimum spanning tree over the depot and the path's nodes
//!    with Kruskal's algorithm (edges sorted by squared distance, which
//!    orders them exactly as Euclidean distance does; components tracked
//!    by union-find).
//! 2. Double every tree edge, making every degree even.
//! 3. Walk the doubled tree from the depot, always leaving the current node
//!    through an unused edge (nearest first) and skipping nodes already
//!    visited. The first-visit order is the candidate path.
//! 4. Keep the candidate only if its real cost beats the current path.
//!
//! The walk costs at most twice the MST weight, so this mostly repairs
//! badly tangled paths; 2-opt does the fine tuning afterwards.
//!
//! # Complexity
//!
//! O(n² log n) for a path of n nodes (all pairs are sorted).
//!
//! # Reference
//!
//! Kruskal, J.B. (1956). "On the shortest spanning subtree of a graph and the
//! traveling salesman problem", *Proc. AMS* 7(1), 48-50.

use crate::distance::DistanceMatrix;
use crate::models::{Path, DEPOT};

use super::improves;

/// Rebuilds `path` from a doubled minimum spanning tree if that is cheaper.
///
/// Returns `true` if the path was replaced.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Spec};
/// use u_colony::distance::DistanceCache;
/// use u_colony::local_search::kruskal_rebuild;
///
/// let nodes = (0..5)
///     .map(|i| if i == 0 { Node::depot(0.0, 0.0) } else { Node::new(i as f64, 0.0, 1) })
///     .collect();
/// let spec = Spec::new(nodes, 10).unwrap();
/// let cache = DistanceCache::new(&spec);
///
/// let mut path = Path::new(vec![3, 1, 4, 2], &spec, cache.real());
/// assert!(kruskal_rebuild(&mut path, cache.real(), cache.fast()));
/// assert_eq!(path.nodes(), &[1, 2, 3, 4]);
/// ```
pub fn kruskal_rebuild(
    path: &mut Path,
    real: &DistanceMatrix<f32>,
    fast: &DistanceMatrix<f32>,
) -> bool {
    if path.len() < 3 {
        return false;
    }

    // Local index 0 is the depot; 1..=len are the path's nodes.
    let verts: Vec<usize> = std::iter::once(DEPOT)
        .chain(path.nodes().iter().copied())
        .collect();
    let tree = spanning_tree(&verts, fast);
    let order = doubled_tree_walk(&verts, &tree, fast);

    let candidate: Vec<usize> = order.into_iter().skip(1).map(|v| verts[v]).collect();
    let cost = real.closed_path_cost(DEPOT, &candidate);
    if improves(cost - path.cost(), path.cost()) {
        *path.nodes_mut() = candidate;
        path.set_cost(cost);
        true
    } else {
        false
    }
}

/// Adjacency lists of the MST over `verts` (local indices).
fn spanning_tree(verts: &[usize], fast: &DistanceMatrix<f32>) -> Vec<Vec<usize>> {
    let n = verts.len();
    let mut edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .collect();
    edges.sort_by(|&(a, b), &(c, d)| {
        fast.get(verts[a], verts[b])
            .total_cmp(&fast.get(verts[c], verts[d]))
    });

    let mut sets = DisjointSet::new(n);
    let mut adjacency = vec![Vec::new(); n];
    let mut joined = 0;
    for (a, b) in edges {
        if joined == n - 1 {
            break;
        }
        if sets.union(a, b) {
            adjacency[a].push(b);
            adjacency[b].push(a);
            joined += 1;
        }
    }
    adjacency
}

/// First-visit order of an Euler walk over the doubled tree, from local 0.
///
/// Each tree edge `{a, b}` is doubled as the arcs `a→b` and `b→a`. The walk
/// leaves every vertex towards its nearest unvisited tree neighbour and
/// takes the return arc once none is left.
fn doubled_tree_walk(
    verts: &[usize],
    tree: &[Vec<usize>],
    fast: &DistanceMatrix<f32>,
) -> Vec<usize> {
    let n = verts.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![0usize];
    visited[0] = true;
    order.push(0);

    while let Some(&v) = stack.last() {
        let open: Vec<usize> = tree[v].iter().copied().filter(|&w| !visited[w]).collect();
        let ids: Vec<usize> = open.iter().map(|&w| verts[w]).collect();
        // Path nodes are distinct, so the id maps back to one local index.
        let next = fast
            .nearest_neighbor(verts[v], &ids)
            .and_then(|id| open.iter().copied().find(|&w| verts[w] == id));
        match next {
            Some(w) => {
                visited[w] = true;
                order.push(w);
                stack.push(w);
            }
            None => {
                stack.pop();
            }
        }
    }
    order
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Joins the sets of `a` and `b`; `false` if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceCache;
    use crate::models::{Node, Spec};

    fn line(n: usize) -> (Spec, DistanceCache) {
        let nodes = (0..=n)
            .map(|i| {
                if i == 0 {
                    Node::depot(0.0, 0.0)
                } else {
                    Node::new(i as f64, 0.0, 1)
                }
            })
            .collect();
        let spec = Spec::new(nodes, 100).expect("valid");
        let cache = DistanceCache::new(&spec);
        (spec, cache)
    }

    #[test]
    fn test_disjoint_set() {
        let mut ds = DisjointSet::new(4);
        assert!(ds.union(0, 1));
        assert!(ds.union(2, 3));
        assert!(!ds.union(1, 0));
        assert!(ds.union(1, 3));
        assert_eq!(ds.find(0), ds.find(2));
    }

    #[test]
    fn test_spanning_tree_on_line() {
        let (_, cache) = line(4);
        let verts = vec![0, 3, 1, 4, 2];
        let tree = spanning_tree(&verts, cache.fast());
        let degree_sum: usize = tree.iter().map(Vec::len).sum();
        assert_eq!(degree_sum, 2 * (verts.len() - 1));
        // depot (local 0) connects only to node 1 (local 2)
        assert_eq!(tree[0], vec![2]);
    }

    #[test]
    fn test_rebuild_untangles() {
        let (spec, cache) = line(4);
        let mut path = Path::new(vec![3, 1, 4, 2], &spec, cache.real());
        assert!((path.cost() - 12.0).abs() < 1e-5);
        assert!(kruskal_rebuild(&mut path, cache.real(), cache.fast()));
        assert_eq!(path.nodes(), &[1, 2, 3, 4]);
        assert!((path.cost() - 8.0).abs() < 1e-5);
        assert_eq!(path.load(), 4);
    }

    #[test]
    fn test_rebuild_keeps_better_path() {
        let (spec, cache) = line(4);
        let mut path = Path::new(vec![1, 2, 3, 4], &spec, cache.real());
        assert!(!kruskal_rebuild(&mut path, cache.real(), cache.fast()));
        assert_eq!(path.nodes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_rebuild_short_path_noop() {
        let (spec, cache) = line(2);
        let mut path = Path::new(vec![2, 1], &spec, cache.real());
        assert!(!kruskal_rebuild(&mut path, cache.real(), cache.fast()));
    }

    #[test]
    fn test_rebuild_preserves_node_set() {
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(5.0, 5.0, 1),
                Node::new(-5.0, 5.0, 1),
                Node::new(5.0, -5.0, 1),
                Node::new(-5.0, -5.0, 1),
                Node::new(0.0, 9.0, 1),
            ],
            10,
        )
        .expect("valid");
        let cache = DistanceCache::new(&spec);
        let mut path = Path::new(vec![1, 4, 5, 3, 2], &spec, cache.real());
        let before = path.cost();
        kruskal_rebuild(&mut path, cache.real(), cache.fast());
        assert!(path.cost() <= before);
        let mut nodes = path.nodes().to_vec();
        nodes.sort();
        assert_eq!(nodes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_walk_takes_nearest_branch_first() {
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(-2.0, 0.0, 1),
                Node::new(1.0, 0.0, 1),
                Node::new(3.0, 0.0, 1),
            ],
            10,
        )
        .expect("valid");
        let cache = DistanceCache::new(&spec);
        let verts = vec![0, 1, 2, 3];
        let tree = spanning_tree(&verts, cache.fast());
        assert_eq!(doubled_tree_walk(&verts, &tree, cache.fast()), vec![0, 2, 3, 1]);
    }
}
