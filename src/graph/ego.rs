//! Radius-1 neighbourhood extraction

use crate::error::NetworkError;
use crate::graph::CollabGraph;
use petgraph::graph::{EdgeIndex, NodeIndex};
use rayon::prelude::*;
use std::collections::HashSet;

/// Induced subgraph on a centre node and its direct collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgoNetwork {
    /// Centre node
    pub center: NodeIndex,

    /// Centre first, then neighbours in node order
    pub nodes: Vec<NodeIndex>,

    /// Every edge with both endpoints in `nodes`, in edge order
    pub edges: Vec<EdgeIndex>,
}

impl EgoNetwork {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Extract the ego network of the person with the given external id
pub fn extract_ego(graph: &CollabGraph, person_id: &str) -> Result<EgoNetwork, NetworkError> {
    let center = graph
        .node_index(person_id)
        .ok_or_else(|| NetworkError::NotFound(person_id.to_string()))?;
    Ok(extract_ego_at(graph, center))
}

/// Extract the ego network around a node index known to be in the graph
pub fn extract_ego_at(graph: &CollabGraph, center: NodeIndex) -> EgoNetwork {
    let mut neighbors: Vec<NodeIndex> = graph.neighbors(center).collect();
    neighbors.sort_unstable();
    neighbors.dedup();

    let mut nodes = Vec::with_capacity(neighbors.len() + 1);
    nodes.push(center);
    nodes.extend(neighbors);

    let members: HashSet<NodeIndex> = nodes.iter().copied().collect();

    // Walking each member's incident edges finds neighbour-to-neighbour links too
    let mut edges: Vec<EdgeIndex> = nodes
        .iter()
        .flat_map(|&node| graph.incident_edges(node))
        .filter(|(_, other)| members.contains(other))
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges.dedup();

    EgoNetwork {
        center,
        nodes,
        edges,
    }
}

/// Extract ego networks for many centres in parallel
///
/// Each centre succeeds or fails on its own; an unknown id never aborts the batch.
pub fn extract_many(
    graph: &CollabGraph,
    person_ids: &[String],
) -> Vec<(String, Result<EgoNetwork, NetworkError>)> {
    person_ids
        .par_iter()
        .map(|id| (id.clone(), extract_ego(graph, id)))
        .collect()
}

/// Hand the ego network of every node to `visit` in parallel
///
/// Each ego is dropped once `visit` returns, so only in-flight egos are held in memory.
/// Stops at the first error.
pub fn try_for_each_ego<F, E>(graph: &CollabGraph, visit: F) -> Result<(), E>
where
    F: Fn(EgoNetwork) -> Result<(), E> + Sync + Send,
    E: Send,
{
    let centers: Vec<NodeIndex> = graph.node_indices().collect();
    centers
        .par_iter()
        .try_for_each(|&center| visit(extract_ego_at(graph, center)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ParticipationIndex, ParticipationRecord};
    use crate::graph::GraphBuilder;

    fn sample_graph() -> CollabGraph {
        // A-B-C share M1, C-D share M2, E works alone
        let records = vec![
            ParticipationRecord::new("A", "M1"),
            ParticipationRecord::new("B", "M1"),
            ParticipationRecord::new("C", "M1"),
            ParticipationRecord::new("C", "M2"),
            ParticipationRecord::new("D", "M2"),
            ParticipationRecord::new("E", "M3"),
        ];
        let index = ParticipationIndex::build(&records, "기타");
        GraphBuilder::with_capacity(5).build(&index)
    }

    #[test]
    fn test_includes_edges_between_neighbors() {
        let graph = sample_graph();
        let ego = extract_ego(&graph, "A").unwrap();

        // A, B, C with the B-C edge included
        assert_eq!(ego.node_count(), 3);
        assert_eq!(ego.edge_count(), 3);
        assert_eq!(graph.node(ego.center).person_id, "A");
        assert_eq!(ego.nodes[0], ego.center);
    }

    #[test]
    fn test_excludes_second_hop() {
        let graph = sample_graph();
        let ego = extract_ego(&graph, "D").unwrap();

        let ids: Vec<&str> = ego.nodes.iter().map(|&n| graph.node(n).person_id.as_str()).collect();
        assert_eq!(ids, vec!["D", "C"]);
        assert_eq!(ego.edge_count(), 1);
    }

    #[test]
    fn test_node_count_is_degree_plus_one() {
        let graph = sample_graph();
        for center in graph.node_indices() {
            let ego = extract_ego_at(&graph, center);
            assert_eq!(ego.node_count(), graph.node(center).degree as usize + 1);
        }
    }

    #[test]
    fn test_isolated_node() {
        let graph = sample_graph();
        let ego = extract_ego(&graph, "E").unwrap();

        assert_eq!(ego.node_count(), 1);
        assert_eq!(ego.edge_count(), 0);
    }

    #[test]
    fn test_unknown_center() {
        let graph = sample_graph();
        let before = graph.edge_count();

        assert_eq!(
            extract_ego(&graph, "Nobody"),
            Err(NetworkError::NotFound("Nobody".to_string()))
        );
        assert_eq!(graph.edge_count(), before);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let graph = sample_graph();
        let ids = vec!["A".to_string(), "Nobody".to_string(), "C".to_string()];
        let results = extract_many(&graph, &ids);

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().node_count(), 4);
    }

    #[test]
    fn test_visits_every_node_once() {
        let graph = sample_graph();
        let visited = std::sync::Mutex::new(Vec::new());

        try_for_each_ego(&graph, |ego| -> Result<(), NetworkError> {
            visited.lock().unwrap().push(ego.center);
            Ok(())
        })
        .unwrap();

        let mut visited = visited.into_inner().unwrap();
        visited.sort_unstable();
        assert_eq!(visited, graph.node_indices().collect::<Vec<_>>());
    }

    #[test]
    fn test_visit_error_stops_the_walk() {
        let graph = sample_graph();
        let result = try_for_each_ego(&graph, |ego| {
            if graph.node(ego.center).person_id == "C" {
                Err(NetworkError::NotFound("C".to_string()))
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err(NetworkError::NotFound("C".to_string())));
    }
}
