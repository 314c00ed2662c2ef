//! Weighted undirected collaboration graph

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A person in the collaboration network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonNode {
    /// Stable external id (name when the source had none)
    pub person_id: String,

    /// Display name
    pub name: String,

    /// Representative role label
    pub role: String,

    /// Distinct movies this person is credited on
    pub movies_count: u32,

    /// Distinct collaborators
    pub degree: u32,

    /// Community assigned by detection, absent until it runs
    pub community: Option<u32>,
}

/// Co-appearance record between two people
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    /// Number of distinct shared movies
    pub weight: u32,

    /// Shared movie titles in processing order
    pub movies: Vec<String>,
}

/// Simple undirected graph of people joined by shared movies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollabGraph {
    graph: UnGraph<PersonNode, Collaboration>,

    /// Mapping from external person ids to node indices
    index: HashMap<String, NodeIndex>,

    /// Modularity of the partition written by community detection
    modularity: Option<f64>,
}

impl CollabGraph {
    /// Assemble a graph from nodes and canonical (low, high) edges
    pub(crate) fn from_parts(
        nodes: Vec<PersonNode>,
        edges: Vec<((u32, u32), Collaboration)>,
    ) -> Self {
        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let id = node.person_id.clone();
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        for ((a, b), collaboration) in edges {
            if a == b {
                continue;
            }
            graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), collaboration);
        }

        let mut collab = Self {
            graph,
            index,
            modularity: None,
        };
        collab.refresh_degrees();
        collab
    }

    fn refresh_degrees(&mut self) {
        let degrees: Vec<u32> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges(idx).count() as u32)
            .collect();

        for (idx, degree) in self.graph.node_indices().zip(degrees) {
            self.graph[idx].degree = degree;
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the node index of an external person id
    pub fn node_index(&self, person_id: &str) -> Option<NodeIndex> {
        self.index.get(person_id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &PersonNode {
        &self.graph[idx]
    }

    /// Look up a person by external id
    pub fn person(&self, person_id: &str) -> Option<&PersonNode> {
        self.node_index(person_id).map(|idx| &self.graph[idx])
    }

    /// Node indices in insertion order
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All people in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &PersonNode> + '_ {
        self.graph.node_weights()
    }

    /// Direct collaborators of a node
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Edges incident to a node as (edge, other endpoint)
    pub fn incident_edges(&self, idx: NodeIndex) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph.edges(idx).map(move |edge| {
            let other = if edge.source() == idx { edge.target() } else { edge.source() };
            (edge.id(), other)
        })
    }

    /// Every edge as (low endpoint, high endpoint, record), in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Collaboration)> + '_ {
        self.graph.edge_references().map(|edge| {
            let (a, b) = (edge.source(), edge.target());
            if a <= b {
                (a, b, edge.weight())
            } else {
                (b, a, edge.weight())
            }
        })
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Collaboration {
        &self.graph[idx]
    }

    /// Endpoints of an edge ordered by external id
    pub fn canonical_endpoints(&self, idx: EdgeIndex) -> Option<(&PersonNode, &PersonNode)> {
        let (a, b) = self.graph.edge_endpoints(idx)?;
        let (a, b) = (&self.graph[a], &self.graph[b]);
        if a.person_id <= b.person_id {
            Some((a, b))
        } else {
            Some((b, a))
        }
    }

    /// Collaboration between two people, independent of argument order
    pub fn collaboration(&self, a: &str, b: &str) -> Option<&Collaboration> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        self.graph.find_edge(a, b).map(|edge| &self.graph[edge])
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> u64 {
        self.graph
            .edge_weights()
            .map(|collab| collab.weight as u64)
            .sum()
    }

    /// Community ids by node position (absent before detection)
    pub fn communities(&self) -> Vec<Option<u32>> {
        self.graph.node_weights().map(|node| node.community).collect()
    }

    pub fn community_count(&self) -> usize {
        let mut ids: Vec<u32> = self.graph.node_weights().filter_map(|node| node.community).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    pub fn modularity(&self) -> Option<f64> {
        self.modularity
    }

    /// Write community ids (indexed by node position) and modularity onto the graph
    pub fn assign_communities(&mut self, membership: &[u32], modularity: Option<f64>) {
        for (idx, &community) in self.graph.node_indices().zip(membership) {
            self.graph[idx].community = Some(community);
        }
        self.modularity = modularity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> PersonNode {
        PersonNode {
            person_id: id.to_string(),
            name: id.to_string(),
            role: "배우".to_string(),
            movies_count: 1,
            degree: 0,
            community: None,
        }
    }

    fn collab(weight: u32) -> Collaboration {
        Collaboration {
            weight,
            movies: (0..weight).map(|i| format!("M{}", i)).collect(),
        }
    }

    fn triangle() -> CollabGraph {
        CollabGraph::from_parts(
            vec![person("A"), person("B"), person("C"), person("D")],
            vec![((0, 1), collab(2)), ((0, 2), collab(1)), ((1, 2), collab(1))],
        )
    }

    #[test]
    fn test_degrees_and_lookup() {
        let graph = triangle();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.person("A").unwrap().degree, 2);
        assert_eq!(graph.person("D").unwrap().degree, 0);
        assert!(graph.person("Z").is_none());
    }

    #[test]
    fn test_collaboration_is_order_independent() {
        let graph = triangle();

        assert_eq!(graph.collaboration("A", "B"), graph.collaboration("B", "A"));
        assert_eq!(graph.collaboration("A", "B").unwrap().weight, 2);
        assert!(graph.collaboration("A", "D").is_none());
    }

    #[test]
    fn test_self_loops_are_skipped() {
        let graph = CollabGraph::from_parts(vec![person("A")], vec![((0, 0), collab(1))]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_weights() {
        let graph = triangle();
        assert_eq!(graph.total_weight(), 4);
    }

    #[test]
    fn test_assign_communities() {
        let mut graph = triangle();
        assert_eq!(graph.community_count(), 0);

        graph.assign_communities(&[0, 0, 0, 1], Some(0.1));

        assert_eq!(graph.person("D").unwrap().community, Some(1));
        assert_eq!(graph.community_count(), 2);
        assert_eq!(graph.modularity(), Some(0.1));
    }
}
