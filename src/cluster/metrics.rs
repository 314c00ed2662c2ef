//! Community statistics and metrics

use crate::cluster::Community;
use crate::graph::CollabGraph;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashSet};

/// Calculate density (actual edges / potential undirected edges)
pub fn calculate_density(graph: &CollabGraph, members: &[usize]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let member_set: HashSet<usize> = members.iter().copied().collect();

    // Only the members' own edges are walked; each internal edge is seen from both ends
    let endpoints = members
        .iter()
        .flat_map(|&position| graph.incident_edges(NodeIndex::new(position)))
        .filter(|(_, other)| member_set.contains(&other.index()))
        .count();
    let actual_edges = endpoints / 2;

    actual_edges as f32 / potential_edges as f32
}

/// Members with the highest degree, ties broken by node order
pub fn central_members(graph: &CollabGraph, members: &[usize], top_n: usize) -> Vec<String> {
    let mut by_degree: Vec<(usize, u32)> = members
        .iter()
        .map(|&position| (position, graph.node(NodeIndex::new(position)).degree))
        .collect();
    by_degree.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    by_degree
        .iter()
        .take(top_n)
        .map(|&(position, _)| graph.node(NodeIndex::new(position)).person_id.clone())
        .collect()
}

/// Summarise every community written on the graph, largest first
pub fn summarize_communities(graph: &CollabGraph, top_n: usize) -> Vec<Community> {
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (position, node) in graph.nodes().enumerate() {
        if let Some(community) = node.community {
            groups.entry(community).or_default().push(position);
        }
    }

    let ids: Vec<&str> = graph.nodes().map(|node| node.person_id.as_str()).collect();
    let mut communities: Vec<Community> = groups
        .into_iter()
        .map(|(id, members)| Community {
            id,
            size: members.len(),
            density: calculate_density(graph, &members),
            central_members: central_members(graph, &members, top_n),
            members: members.iter().map(|&position| ids[position].to_string()).collect(),
        })
        .collect();

    communities.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    communities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ParticipationIndex, ParticipationRecord};
    use crate::graph::GraphBuilder;

    fn sample_graph() -> CollabGraph {
        // Triangle a-b-c, pair d-e, isolated f
        let records: Vec<ParticipationRecord> = [
            ("a", "M1"),
            ("b", "M1"),
            ("c", "M1"),
            ("d", "M2"),
            ("e", "M2"),
            ("f", "M3"),
        ]
        .iter()
        .map(|(person, movie)| ParticipationRecord::new(person, movie))
        .collect();
        let index = ParticipationIndex::build(&records, "기타");
        let mut graph = GraphBuilder::with_capacity(6).build(&index);
        graph.assign_communities(&[0, 0, 0, 1, 1, 2], Some(0.5));
        graph
    }

    #[test]
    fn test_density() {
        let graph = sample_graph();
        assert_eq!(calculate_density(&graph, &[0, 1, 2]), 1.0);
        assert_eq!(calculate_density(&graph, &[0, 1, 3]), 1.0 / 3.0);
        assert_eq!(calculate_density(&graph, &[5]), 1.0);
    }

    #[test]
    fn test_summaries_sorted_by_size() {
        let graph = sample_graph();
        let communities = summarize_communities(&graph, 2);

        let sizes: Vec<usize> = communities.iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        assert_eq!(communities[0].members, vec!["a", "b", "c"]);
        assert_eq!(communities[0].central_members, vec!["a", "b"]);
        assert_eq!(communities[2].id, 2);
    }

    #[test]
    fn test_many_small_communities() {
        // 500 duos, each its own community
        let mut records = Vec::new();
        for i in 0..500 {
            let movie = format!("M{}", i);
            records.push(ParticipationRecord::new(&format!("a{}", i), &movie));
            records.push(ParticipationRecord::new(&format!("b{}", i), &movie));
        }
        let index = ParticipationIndex::build(&records, "기타");
        let mut graph = GraphBuilder::with_capacity(1000).build(&index);
        let membership: Vec<u32> = (0..1000).map(|position| position / 2).collect();
        graph.assign_communities(&membership, None);

        let communities = summarize_communities(&graph, 1);

        assert_eq!(communities.len(), 500);
        assert!(communities.iter().all(|c| c.size == 2 && c.density == 1.0));
        assert_eq!(communities[0].members, vec!["a0", "b0"]);
    }
}
