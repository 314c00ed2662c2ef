//! Aggregate network statistics for human-facing summaries

use crate::cluster::StructureQuality;
use crate::data::ParticipationIndex;
use crate::graph::CollabGraph;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::collections::BTreeMap;

/// Degree buckets 0..=99 plus a final "100 or more" bucket
const DEGREE_BUCKETS: usize = 101;

/// Movies shown per duo in summaries
const DUO_SAMPLE_MOVIES: usize = 3;

/// Movie counts taken from the participation index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCoverage {
    pub total_movies: usize,

    /// Movies with at least two credited participants
    pub collaborative_movies: usize,
}

impl MovieCoverage {
    pub fn from_index(index: &ParticipationIndex) -> Self {
        Self {
            total_movies: index.movie_count(),
            collaborative_movies: index.collaborative_movie_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorStat {
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub degree: u32,
    pub movies_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuoStat {
    pub source: String,
    pub target: String,
    pub source_name: String,
    pub target_name: String,
    pub weight: u32,
    pub sample_movies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySize {
    pub id: u32,
    pub size: usize,
    /// Percentage of all nodes
    pub share: f64,
}

/// Read-only summary of an annotated collaboration graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_collaborations: u64,
    pub avg_weight: f64,
    pub avg_degree: f64,
    pub degree_std_dev: f64,
    pub median_degree: f64,
    pub degree_distribution: Vec<usize>,
    pub top_collaborators: Vec<CollaboratorStat>,
    pub top_duos: Vec<DuoStat>,
    /// Largest first
    pub community_sizes: Vec<CommunitySize>,
    /// Community size -> number of communities of that size
    pub community_size_histogram: BTreeMap<usize, usize>,
    /// Role -> distinct people
    pub role_distribution: BTreeMap<String, usize>,
    pub modularity: Option<f64>,
    pub coverage: MovieCoverage,
}

impl NetworkStats {
    /// Compute statistics without touching the graph
    pub fn compute(graph: &CollabGraph, coverage: MovieCoverage, top_k: usize) -> Self {
        let total_nodes = graph.node_count();
        let total_edges = graph.edge_count();
        let total_collaborations = graph.total_weight();

        let avg_weight = if total_edges > 0 {
            total_collaborations as f64 / total_edges as f64
        } else {
            0.0
        };

        let degrees: Vec<f64> = graph.nodes().map(|node| node.degree as f64).collect();
        let (avg_degree, degree_std_dev, median_degree) = if degrees.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                degrees.iter().mean(),
                degrees.iter().population_std_dev(),
                Data::new(degrees.clone()).median(),
            )
        };

        let mut degree_distribution = vec![0; DEGREE_BUCKETS];
        for node in graph.nodes() {
            degree_distribution[(node.degree as usize).min(DEGREE_BUCKETS - 1)] += 1;
        }

        let mut role_distribution = BTreeMap::new();
        for node in graph.nodes() {
            *role_distribution.entry(node.role.clone()).or_insert(0) += 1;
        }

        let (community_sizes, community_size_histogram) = community_breakdown(graph);

        Self {
            total_nodes,
            total_edges,
            total_collaborations,
            avg_weight,
            avg_degree,
            degree_std_dev,
            median_degree,
            degree_distribution,
            top_collaborators: top_collaborators(graph, top_k),
            top_duos: top_duos(graph, top_k),
            community_sizes,
            community_size_histogram,
            role_distribution,
            modularity: graph.modularity(),
            coverage,
        }
    }

    /// Write a readable summary through the logger
    pub fn log_summary(&self) {
        log::info!("Network statistics:");
        log::info!("  People: {}", self.total_nodes);
        log::info!("  Collaborations: {}", self.total_edges);
        log::info!("  Average collaboration weight: {:.2}", self.avg_weight);
        log::info!(
            "  Average degree: {:.2} (median {:.1}, std dev {:.2})",
            self.avg_degree,
            self.median_degree,
            self.degree_std_dev
        );
        log::info!(
            "  Collaborative movies: {} of {}",
            self.coverage.collaborative_movies,
            self.coverage.total_movies
        );

        for (rank, person) in self.top_collaborators.iter().enumerate() {
            log::info!(
                "  #{} {} ({}): {} collaborators, {} movies",
                rank + 1,
                person.name,
                person.role,
                person.degree,
                person.movies_count
            );
        }

        for (rank, duo) in self.top_duos.iter().enumerate() {
            log::info!(
                "  #{} {} <-> {}: {} movies ({})",
                rank + 1,
                duo.source_name,
                duo.target_name,
                duo.weight,
                duo.sample_movies.join(", ")
            );
        }

        log::info!("  Communities: {}", self.community_sizes.len());
        for community in &self.community_sizes {
            log::debug!(
                "    community {:3}: {:5} people ({:5.1}%)",
                community.id,
                community.size,
                community.share
            );
        }

        if let Some(q) = self.modularity {
            log::info!("  Modularity: {:.4} ({})", q, StructureQuality::from_modularity(q));
        }
    }
}

/// People with the most distinct collaborators, ties in node order
fn top_collaborators(graph: &CollabGraph, top_k: usize) -> Vec<CollaboratorStat> {
    let mut people: Vec<_> = graph.nodes().enumerate().collect();
    people.sort_by(|a, b| b.1.degree.cmp(&a.1.degree).then(a.0.cmp(&b.0)));

    people
        .into_iter()
        .take(top_k)
        .map(|(_, node)| CollaboratorStat {
            person_id: node.person_id.clone(),
            name: node.name.clone(),
            role: node.role.clone(),
            degree: node.degree,
            movies_count: node.movies_count,
        })
        .collect()
}

/// Heaviest collaborations, ties by endpoint ids
fn top_duos(graph: &CollabGraph, top_k: usize) -> Vec<DuoStat> {
    let mut duos: Vec<DuoStat> = graph
        .edges()
        .map(|(a, b, collab)| {
            let (a, b) = (graph.node(a), graph.node(b));
            let (a, b) = if a.person_id <= b.person_id { (a, b) } else { (b, a) };
            DuoStat {
                source: a.person_id.clone(),
                target: b.person_id.clone(),
                source_name: a.name.clone(),
                target_name: b.name.clone(),
                weight: collab.weight,
                sample_movies: collab.movies.iter().take(DUO_SAMPLE_MOVIES).cloned().collect(),
            }
        })
        .collect();

    duos.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
    duos.truncate(top_k);
    duos
}

fn community_breakdown(graph: &CollabGraph) -> (Vec<CommunitySize>, BTreeMap<usize, usize>) {
    let mut sizes: BTreeMap<u32, usize> = BTreeMap::new();
    for community in graph.nodes().filter_map(|node| node.community) {
        *sizes.entry(community).or_insert(0) += 1;
    }

    let total = graph.node_count().max(1) as f64;
    let mut community_sizes: Vec<CommunitySize> = sizes
        .iter()
        .map(|(&id, &size)| CommunitySize {
            id,
            size,
            share: size as f64 * 100.0 / total,
        })
        .collect();
    community_sizes.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));

    let mut histogram = BTreeMap::new();
    for &size in sizes.values() {
        *histogram.entry(size).or_insert(0) += 1;
    }

    (community_sizes, histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detect_communities;
    use crate::config::Config;
    use crate::data::ParticipationRecord;
    use crate::graph::GraphBuilder;

    fn sample() -> (ParticipationIndex, CollabGraph) {
        let records = vec![
            ParticipationRecord::new("A", "M1").with_role("감독"),
            ParticipationRecord::new("B", "M1").with_role("배우"),
            ParticipationRecord::new("C", "M1").with_role("배우"),
            ParticipationRecord::new("A", "M2"),
            ParticipationRecord::new("B", "M2"),
            ParticipationRecord::new("D", "M3").with_role("배우"),
        ];
        let index = ParticipationIndex::build(&records, "기타");
        let graph = GraphBuilder::with_capacity(4).build(&index);
        (index, graph)
    }

    #[test]
    fn test_basic_counts() {
        let (index, graph) = sample();
        let stats = NetworkStats::compute(&graph, MovieCoverage::from_index(&index), 2);

        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.total_collaborations, 4);
        assert!((stats.avg_weight - 4.0 / 3.0).abs() < 1e-12);
        assert!((stats.avg_degree - 1.5).abs() < 1e-12);
        assert_eq!(stats.median_degree, 2.0);
        assert_eq!(stats.degree_distribution[0], 1);
        assert_eq!(stats.degree_distribution[2], 3);
        assert_eq!(
            stats.coverage,
            MovieCoverage { total_movies: 3, collaborative_movies: 2 }
        );
        assert_eq!(stats.role_distribution["배우"], 3);
        assert_eq!(stats.role_distribution["감독"], 1);
    }

    #[test]
    fn test_top_lists() {
        let (index, graph) = sample();
        let stats = NetworkStats::compute(&graph, MovieCoverage::from_index(&index), 2);

        let top: Vec<&str> = stats.top_collaborators.iter().map(|p| p.person_id.as_str()).collect();
        assert_eq!(top, vec!["A", "B"]);

        assert_eq!(stats.top_duos.len(), 2);
        assert_eq!(stats.top_duos[0].source, "A");
        assert_eq!(stats.top_duos[0].target, "B");
        assert_eq!(stats.top_duos[0].weight, 2);
        assert_eq!(stats.top_duos[0].sample_movies, vec!["M1", "M2"]);
    }

    #[test]
    fn test_community_breakdown() {
        let (index, mut graph) = sample();
        detect_communities(&mut graph, &Config::default());
        let stats = NetworkStats::compute(&graph, MovieCoverage::from_index(&index), 5);

        let covered: usize = stats.community_sizes.iter().map(|c| c.size).sum();
        assert_eq!(covered, 4);
        let histogram_total: usize = stats
            .community_size_histogram
            .iter()
            .map(|(size, count)| size * count)
            .sum();
        assert_eq!(histogram_total, 4);
        assert!(stats.modularity.is_some());
    }

    #[test]
    fn test_empty_graph() {
        let stats = NetworkStats::compute(&CollabGraph::default(), MovieCoverage::default(), 5);

        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.avg_weight, 0.0);
        assert_eq!(stats.avg_degree, 0.0);
        assert!(stats.top_duos.is_empty());
        assert!(stats.community_sizes.is_empty());
        assert_eq!(stats.modularity, None);
    }
}
