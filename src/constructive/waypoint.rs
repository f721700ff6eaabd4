//! Chain-merge arena used during one construction pass.
//!
//! Every demand point owns a [`WayPoint`] slot indexed by its node id. A slot
//! stores up to two neighbour links, the load of its chain (valid on the two
//! chain terminals only), and the index of the chain's opposite terminal.
//! Merging two chains at their terminals is O(1): the new load is written to
//! the four terminals involved and the two outer terminals are re-pointed at
//! each other.

use crate::error::{Error, Result};
use crate::models::Spec;

/// Per-node record of the chain structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WayPoint {
    links: [Option<usize>; 2],
    load: i32,
    other_end: usize,
}

impl WayPoint {
    fn isolated(node: usize, demand: i32) -> Self {
        Self {
            links: [None, None],
            load: demand,
            other_end: node,
        }
    }

    /// Number of filled links (0, 1 or 2).
    pub fn degree(&self) -> usize {
        self.links.iter().filter(|l| l.is_some()).count()
    }

    fn link(&mut self, to: usize) -> bool {
        match self.links.iter_mut().find(|l| l.is_none()) {
            Some(slot) => {
                *slot = Some(to);
                true
            }
            None => false,
        }
    }

    fn next_from(&self, prev: Option<usize>) -> Option<usize> {
        self.links.iter().flatten().copied().find(|&n| Some(n) != prev)
    }
}

/// Why a candidate merge was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRejection {
    /// The node already has two links.
    Interior(usize),
    /// Both nodes are the two ends of one chain; linking them closes a loop.
    SameChain,
    /// The merged chain would exceed vehicle capacity.
    Overload(i64),
}

/// Arena of way points for one construction pass. Slot 0 (the depot) is
/// never linked.
#[derive(Debug, Clone)]
pub struct WayPoints {
    points: Vec<WayPoint>,
    capacity: i32,
}

impl WayPoints {
    /// One isolated chain per demand point.
    pub fn new(spec: &Spec) -> Self {
        let points = (0..spec.dimension())
            .map(|n| WayPoint::isolated(n, spec.demand(n)))
            .collect();
        Self {
            points,
            capacity: spec.capacity(),
        }
    }

    #[inline]
    pub fn get(&self, node: usize) -> &WayPoint {
        &self.points[node]
    }

    /// `true` if `node` has fewer than two links.
    #[inline]
    pub fn is_terminal(&self, node: usize) -> bool {
        self.points[node].links[1].is_none()
    }

    /// Chain load as seen from `node` (exact on terminals).
    #[inline]
    pub fn load(&self, node: usize) -> i32 {
        self.points[node].load
    }

    /// Opposite terminal of the chain ending at `node`.
    #[inline]
    pub fn other_end(&self, node: usize) -> usize {
        self.points[node].other_end
    }

    /// `true` if `a` and `b` could be linked right now.
    #[inline]
    pub fn is_feasible(&self, a: usize, b: usize) -> bool {
        self.check_merge(a, b).is_ok()
    }

    /// Validates a merge of the chains ending at `a` and `b`.
    pub fn check_merge(&self, a: usize, b: usize) -> std::result::Result<(), MergeRejection> {
        if !self.is_terminal(a) {
            return Err(MergeRejection::Interior(a));
        }
        if !self.is_terminal(b) {
            return Err(MergeRejection::Interior(b));
        }
        if a == b || self.other_end(a) == b {
            return Err(MergeRejection::SameChain);
        }
        let load = self.merged_load(a, b);
        if load > i64::from(self.capacity) {
            return Err(MergeRejection::Overload(load));
        }
        Ok(())
    }

    /// Load of the chain that linking `a` and `b` would produce.
    #[inline]
    fn merged_load(&self, a: usize, b: usize) -> i64 {
        i64::from(self.load(a)) + i64::from(self.load(b))
    }

    /// Links `a` and `b`, joining their chains. Returns the merged load.
    ///
    /// Fails if the merge breaks a chain invariant; callers are expected to
    /// have passed [`WayPoints::check_merge`] first.
    pub fn merge(&mut self, a: usize, b: usize) -> Result<i32> {
        if let Err(rejection) = self.check_merge(a, b) {
            return Err(Error::construction(format!(
                "illegal merge {a}~{b}: {rejection:?}"
            )));
        }

        let end_a = self.other_end(a);
        let end_b = self.other_end(b);
        let merged = self.merged_load(a, b);
        let load = match i32::try_from(merged) {
            Ok(load) if load <= self.capacity => load,
            _ => {
                return Err(Error::construction(format!(
                    "cluster overload: {merged} > {}",
                    self.capacity
                )))
            }
        };

        if !(self.points[a].link(b) && self.points[b].link(a)) {
            return Err(Error::construction(format!("no free link on {a}~{b}")));
        }

        for n in [a, b, end_a, end_b] {
            self.points[n].load = load;
        }
        self.points[end_a].other_end = end_b;
        self.points[end_b].other_end = end_a;
        Ok(load)
    }

    /// Walks every chain from one terminal to the other.
    ///
    /// Each demand point appears in exactly one chain; isolated points
    /// become singleton chains. Fails if a chain has no terminal (a cycle).
    pub fn into_chains(self) -> Result<Vec<Vec<usize>>> {
        let n = self.points.len();
        let mut visited = vec![false; n];
        let mut chains = Vec::new();

        for start in 1..n {
            if visited[start] || !self.is_terminal(start) {
                continue;
            }
            let mut chain = Vec::new();
            let mut prev = None;
            let mut current = start;
            loop {
                if visited[current] {
                    return Err(Error::construction(format!(
                        "node {current} reached twice while draining chains"
                    )));
                }
                visited[current] = true;
                chain.push(current);
                match self.points[current].next_from(prev) {
                    Some(next) => {
                        prev = Some(current);
                        current = next;
                    }
                    None => break,
                }
            }
            chains.push(chain);
        }

        if let Some(stray) = (1..n).find(|&i| !visited[i]) {
            return Err(Error::construction(format!(
                "node {stray} is on a closed loop without the depot"
            )));
        }
        Ok(chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn spec(demands: &[i32], capacity: i32) -> Spec {
        let mut nodes = vec![Node::depot(0.0, 0.0)];
        nodes.extend(
            demands
                .iter()
                .enumerate()
                .map(|(i, &d)| Node::new(i as f64 + 1.0, 0.0, d)),
        );
        Spec::new(nodes, capacity).expect("valid")
    }

    #[test]
    fn test_initial_state() {
        let wp = WayPoints::new(&spec(&[2, 3], 10));
        assert!(wp.is_terminal(1));
        assert_eq!(wp.other_end(1), 1);
        assert_eq!(wp.load(2), 3);
        assert_eq!(wp.get(1).degree(), 0);
    }

    #[test]
    fn test_merge_propagates_load_and_ends() {
        let mut wp = WayPoints::new(&spec(&[1, 2, 3, 4], 100));
        assert_eq!(wp.merge(1, 2).expect("ok"), 3);
        assert_eq!(wp.other_end(1), 2);
        assert_eq!(wp.other_end(2), 1);

        assert_eq!(wp.merge(3, 4).expect("ok"), 7);
        // Join the two chains 1-2 and 3-4 at 2~3 → 1-2-3-4.
        assert_eq!(wp.merge(2, 3).expect("ok"), 10);
        assert!(!wp.is_terminal(2));
        assert!(!wp.is_terminal(3));
        assert_eq!(wp.other_end(1), 4);
        assert_eq!(wp.other_end(4), 1);
        assert_eq!(wp.load(1), 10);
        assert_eq!(wp.load(4), 10);
    }

    #[test]
    fn test_check_merge_rejections() {
        let mut wp = WayPoints::new(&spec(&[4, 4, 4, 4], 8));
        wp.merge(1, 2).expect("ok");
        assert_eq!(wp.check_merge(1, 2), Err(MergeRejection::SameChain));
        assert_eq!(wp.check_merge(2, 3), Err(MergeRejection::Overload(12)));
        assert_eq!(wp.check_merge(3, 3), Err(MergeRejection::SameChain));
        assert!(wp.is_feasible(3, 4));

        let mut wp = WayPoints::new(&spec(&[1, 1, 1, 1], 8));
        wp.merge(1, 2).expect("ok");
        wp.merge(2, 3).expect("ok");
        assert_eq!(wp.check_merge(2, 4), Err(MergeRejection::Interior(2)));
    }

    #[test]
    fn test_merge_rejects_illegal() {
        let mut wp = WayPoints::new(&spec(&[1, 1], 8));
        wp.merge(1, 2).expect("ok");
        let err = wp.merge(2, 1).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_into_chains() {
        let mut wp = WayPoints::new(&spec(&[1, 1, 1, 1, 1], 100));
        wp.merge(3, 1).expect("ok");
        wp.merge(1, 4).expect("ok");
        let mut chains = wp.into_chains().expect("acyclic");
        chains.sort();
        assert_eq!(chains, vec![vec![2], vec![3, 1, 4], vec![5]]);
    }

    #[test]
    fn test_into_chains_singletons() {
        let wp = WayPoints::new(&spec(&[3, 3, 3], 3));
        let chains = wp.into_chains().expect("acyclic");
        assert_eq!(chains, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_overload_near_i32_max() {
        let big = i32::MAX / 2;
        let mut wp = WayPoints::new(&spec(&[big, big, 1], big + 1));
        assert_eq!(
            wp.check_merge(1, 2),
            Err(MergeRejection::Overload(2 * i64::from(big)))
        );
        assert_eq!(wp.merge(1, 3).expect("fits"), big + 1);
        assert!(wp.merge(1, 2).is_err());
        assert_eq!(wp.load(2), big);
    }
}
