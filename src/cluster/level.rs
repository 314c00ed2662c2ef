//! Per-level weighted graphs used by multi-level modularity optimisation

use crate::graph::CollabGraph;
use std::collections::HashMap;

/// Weighted undirected graph over dense indices `0..n`
///
/// `edges` holds each pair once with `i < j`; intra-community weight from
/// coarser levels lives in `self_loops` and counts twice toward a degree.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGraph {
    pub n: usize,
    pub edges: Vec<(usize, usize, f64)>,
    pub self_loops: Vec<f64>,
}

impl LevelGraph {
    /// Dense view of a collaboration graph, indexed by node position
    pub fn from_collab(graph: &CollabGraph) -> Self {
        let edges = graph
            .edges()
            .map(|(a, b, collab)| (a.index(), b.index(), collab.weight as f64))
            .collect();

        Self {
            n: graph.node_count(),
            edges,
            self_loops: vec![0.0; graph.node_count()],
        }
    }

    /// Total edge weight `m`, self-loops included once
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|&(_, _, w)| w).sum::<f64>() + self.self_loops.iter().sum::<f64>()
    }

    /// Weighted degree of every node
    pub fn degrees(&self) -> Vec<f64> {
        let mut degrees: Vec<f64> = self.self_loops.iter().map(|&sl| 2.0 * sl).collect();
        for &(i, j, w) in &self.edges {
            degrees[i] += w;
            degrees[j] += w;
        }
        degrees
    }

    /// Neighbour lists sorted by neighbour index, self-loops excluded
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.n];
        for &(i, j, w) in &self.edges {
            adjacency[i].push((j, w));
            adjacency[j].push((i, w));
        }
        for neighbors in &mut adjacency {
            neighbors.sort_by_key(|&(j, _)| j);
        }
        adjacency
    }

    /// Collapse each community into one node
    ///
    /// `membership` must be contiguous in `0..community_count`.
    pub fn aggregate(&self, membership: &[usize], community_count: usize) -> Self {
        let mut self_loops = vec![0.0; community_count];
        for (i, &sl) in self.self_loops.iter().enumerate() {
            self_loops[membership[i]] += sl;
        }

        let mut between: HashMap<(usize, usize), f64> = HashMap::new();
        for &(i, j, w) in &self.edges {
            let (ci, cj) = (membership[i], membership[j]);
            if ci == cj {
                self_loops[ci] += w;
            } else {
                let key = if ci < cj { (ci, cj) } else { (cj, ci) };
                *between.entry(key).or_insert(0.0) += w;
            }
        }

        let mut edges: Vec<(usize, usize, f64)> =
            between.into_iter().map(|((i, j), w)| (i, j, w)).collect();
        edges.sort_by_key(|&(i, j, _)| (i, j));

        Self {
            n: community_count,
            edges,
            self_loops,
        }
    }

    /// Weighted modularity of a partition of this graph
    ///
    /// Returns 0.0 when the graph has no weight.
    pub fn modularity(&self, membership: &[usize], resolution: f64) -> f64 {
        let m = self.total_weight();
        if m == 0.0 {
            return 0.0;
        }

        let communities = membership.iter().copied().max().map_or(0, |c| c + 1);
        let mut internal = vec![0.0; communities];
        let mut totals = vec![0.0; communities];

        for (i, degree) in self.degrees().into_iter().enumerate() {
            totals[membership[i]] += degree;
            internal[membership[i]] += self.self_loops[i];
        }
        for &(i, j, w) in &self.edges {
            if membership[i] == membership[j] {
                internal[membership[i]] += w;
            }
        }

        internal
            .iter()
            .zip(&totals)
            .map(|(&inside, &total)| inside / m - resolution * (total / (2.0 * m)).powi(2))
            .sum()
    }
}
