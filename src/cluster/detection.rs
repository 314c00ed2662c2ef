//! Community detection by multi-level modularity optimisation (Louvain)

use crate::cluster::level::LevelGraph;
use crate::cluster::Partition;
use crate::config::Config;
use crate::graph::CollabGraph;
use std::collections::BTreeMap;

/// Gains closer than this are treated as equal so ties resolve by community id
const TIE_EPSILON: f64 = 1e-12;

/// Louvain community detector
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma)
    resolution: f64,

    /// Maximum local-moving passes per level
    max_passes: usize,

    /// Maximum levels of aggregation
    max_levels: usize,

    /// Minimum modularity improvement for another pass
    min_gain: f64,
}

/// Result of one local-moving phase
#[derive(Debug, Clone)]
struct LocalMoves {
    /// Contiguous community per node of the level
    membership: Vec<usize>,
    community_count: usize,
    moved: bool,
    converged: bool,
}

impl Louvain {
    /// Create a new detector with default settings
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            max_levels: 10,
            min_gain: 1e-7,
        }
    }

    /// Detector configured from the pipeline configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_resolution(config.resolution)
            .with_max_passes(config.max_passes)
            .with_max_levels(config.max_levels)
            .with_min_gain(config.min_gain)
    }

    /// Set resolution parameter; higher values produce smaller communities
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set maximum local-moving passes per level
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set maximum aggregation levels
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    /// Set the smallest modularity improvement that justifies another pass
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    /// Partition the graph's nodes (indexed by node position) into communities
    pub fn detect(&self, graph: &CollabGraph) -> Partition {
        let n = graph.node_count();
        if n == 0 {
            return Partition {
                membership: Vec::new(),
                community_count: 0,
                modularity: None,
                levels: 0,
                converged: true,
            };
        }

        let original = LevelGraph::from_collab(graph);
        if original.edges.is_empty() {
            return Partition {
                membership: (0..n as u32).collect(),
                community_count: n,
                modularity: Some(0.0),
                levels: 0,
                converged: true,
            };
        }

        // membership[original node] = super-node at the current level
        let mut membership: Vec<usize> = (0..n).collect();
        let mut level = original.clone();
        let mut levels = 0;
        let mut converged = true;
        let mut settled = false;

        for depth in 0..self.max_levels {
            let moves = self.local_moving(&level);
            if !moves.converged {
                log::warn!(
                    "Level {} stopped after {} passes without stabilising",
                    depth,
                    self.max_passes
                );
                converged = false;
            }
            if !moves.moved {
                settled = true;
                break;
            }

            for community in membership.iter_mut() {
                *community = moves.membership[*community];
            }
            levels += 1;

            log::debug!(
                "Level {}: {} nodes collapsed into {} communities",
                depth,
                level.n,
                moves.community_count
            );

            if moves.community_count == level.n {
                settled = true;
                break;
            }
            level = level.aggregate(&moves.membership, moves.community_count);
        }

        // The level cap only cuts detection short if the last aggregate could still move
        if !settled && self.local_moving(&level).moved {
            log::warn!("Reached the limit of {} aggregation levels", self.max_levels);
            converged = false;
        }

        let (membership, _) = renumber(&membership);
        let membership = self.guard_baselines(&original, membership);
        let community_count = membership.iter().copied().max().map_or(0, |c| c + 1);
        let modularity = original.modularity(&membership, self.resolution);

        Partition {
            membership: membership.into_iter().map(|c| c as u32).collect(),
            community_count,
            modularity: Some(modularity),
            levels,
            converged,
        }
    }

    /// Never return a partition worse than all-singletons or all-in-one
    fn guard_baselines(&self, graph: &LevelGraph, membership: Vec<usize>) -> Vec<usize> {
        let found = graph.modularity(&membership, self.resolution);

        let whole = vec![0; graph.n];
        if graph.modularity(&whole, self.resolution) > found + TIE_EPSILON {
            log::info!("Single community beats the detected partition, using it instead");
            return whole;
        }

        let singletons: Vec<usize> = (0..graph.n).collect();
        if graph.modularity(&singletons, self.resolution) > found + TIE_EPSILON {
            log::info!("Singleton partition beats the detected partition, using it instead");
            return singletons;
        }

        membership
    }

    /// Phase 1: move nodes between neighbouring communities while modularity improves
    fn local_moving(&self, graph: &LevelGraph) -> LocalMoves {
        let n = graph.n;
        let m = graph.total_weight();
        if m == 0.0 {
            return LocalMoves {
                membership: (0..n).collect(),
                community_count: n,
                moved: false,
                converged: true,
            };
        }

        let adjacency = graph.adjacency();
        let degrees = graph.degrees();
        let mut communities: Vec<usize> = (0..n).collect();
        let mut totals = degrees.clone();
        let mut moved = false;
        let mut converged = false;
        let mut current = graph.modularity(&communities, self.resolution);

        for _pass in 0..self.max_passes {
            let mut moves = 0;

            for node in 0..n {
                let home = communities[node];
                let ki = degrees[node];

                // Weight from this node into each neighbouring community, by id
                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                for &(neighbor, w) in &adjacency[node] {
                    *links.entry(communities[neighbor]).or_insert(0.0) += w;
                }

                totals[home] -= ki;
                let gain = |community: usize, k_in: f64| {
                    k_in / m - self.resolution * totals[community] * ki / (2.0 * m * m)
                };

                let stay = gain(home, links.get(&home).copied().unwrap_or(0.0));
                let mut best = home;
                let mut best_gain = stay.max(0.0);
                for (&community, &k_in) in &links {
                    if community == home {
                        continue;
                    }
                    let candidate = gain(community, k_in);
                    if candidate > best_gain + TIE_EPSILON {
                        best = community;
                        best_gain = candidate;
                    }
                }

                totals[best] += ki;
                if best != home {
                    communities[node] = best;
                    moves += 1;
                }
            }

            if moves == 0 {
                converged = true;
                break;
            }
            moved = true;

            let next = graph.modularity(&communities, self.resolution);
            let improvement = next - current;
            current = next;
            if improvement < self.min_gain {
                converged = true;
                break;
            }
        }

        let (membership, community_count) = renumber(&communities);
        LocalMoves {
            membership,
            community_count,
            moved: moved && community_count < n,
            converged,
        }
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Relabel communities contiguously in order of first appearance
fn renumber(communities: &[usize]) -> (Vec<usize>, usize) {
    let mut labels: BTreeMap<usize, usize> = BTreeMap::new();
    let mut next = 0;
    let membership = communities
        .iter()
        .map(|&community| {
            *labels.entry(community).or_insert_with(|| {
                next += 1;
                next - 1
            })
        })
        .collect();
    (membership, next)
}

/// Detect communities and write them onto the graph's nodes
pub fn detect_communities(graph: &mut CollabGraph, config: &Config) -> Partition {
    log::info!(
        "Detecting communities (resolution={}) on {} nodes and {} edges",
        config.resolution,
        graph.node_count(),
        graph.edge_count()
    );

    let partition = Louvain::from_config(config).detect(graph);
    partition.apply(graph);

    match (partition.modularity, partition.quality()) {
        (Some(q), Some(quality)) => log::info!(
            "Found {} communities over {} levels, modularity {:.4} ({})",
            partition.community_count,
            partition.levels,
            q,
            quality
        ),
        _ => log::info!("Empty graph, modularity not applicable"),
    }
    if !partition.converged {
        log::warn!("Community detection terminated early; returning best partition found");
    }

    partition
}
