//! Serialized shapes consumed by visualisation and upload collaborators

use crate::graph::{CollabGraph, EgoNetwork, PersonNode};
use serde::{Deserialize, Serialize};

/// Format version written into network metadata
pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// External person id
    pub id: String,
    pub label: String,
    pub community: Option<u32>,
    /// Degree in the full graph
    pub degree: u32,
    pub movies_count: u32,
    pub role: String,
}

impl From<&PersonNode> for NodeRecord {
    fn from(node: &PersonNode) -> Self {
        Self {
            id: node.person_id.clone(),
            label: node.name.clone(),
            community: node.community,
            degree: node.degree,
            movies_count: node.movies_count,
            role: node.role.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Lower external id of the pair
    pub source: String,
    /// Higher external id of the pair
    pub target: String,
    pub weight: u32,
    pub movies: Vec<String>,
    /// Full movie count when `movies` may be a sample
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_movies: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    pub total_nodes: usize,
    pub total_links: usize,
    pub communities: usize,
    pub total_collaborations: u64,
    pub avg_collaboration_per_link: f64,
    pub generated_at: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub modularity: Option<f64>,
}

/// The whole annotated network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub metadata: NetworkMetadata,
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

impl NetworkDocument {
    /// Export the graph with each link's movie list capped to `movie_sample`
    pub fn from_graph(graph: &CollabGraph, movie_sample: usize, generated_at: &str) -> Self {
        let nodes: Vec<NodeRecord> = graph.nodes().map(NodeRecord::from).collect();

        let links: Vec<LinkRecord> = graph
            .edges()
            .map(|(a, b, collab)| {
                let (source, target) = ordered_ids(graph.node(a), graph.node(b));
                LinkRecord {
                    source,
                    target,
                    weight: collab.weight,
                    movies: collab.movies.iter().take(movie_sample).cloned().collect(),
                    total_movies: Some(collab.movies.len()),
                }
            })
            .collect();

        let total_collaborations = graph.total_weight();
        let avg = if links.is_empty() {
            0.0
        } else {
            total_collaborations as f64 / links.len() as f64
        };

        Self {
            metadata: NetworkMetadata {
                total_nodes: nodes.len(),
                total_links: links.len(),
                communities: graph.community_count(),
                total_collaborations,
                avg_collaboration_per_link: (avg * 100.0).round() / 100.0,
                generated_at: generated_at.to_string(),
                version: DOCUMENT_VERSION.to_string(),
                modularity: graph.modularity(),
            },
            nodes,
            links,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EgoMeta {
    pub node_count: usize,
    pub link_count: usize,
    pub generated_at: String,
}

/// One person's neighbourhood, keyed by `ego` for storage and lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgoDocument {
    /// External id of the centre
    pub ego: String,
    pub label: String,
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
    pub meta: EgoMeta,
}

impl EgoDocument {
    /// Export an ego network; `movie_cap` of None embeds full movie lists
    pub fn from_ego(
        graph: &CollabGraph,
        ego: &EgoNetwork,
        movie_cap: Option<usize>,
        generated_at: &str,
    ) -> Self {
        let center = graph.node(ego.center);
        let nodes: Vec<NodeRecord> = ego
            .nodes
            .iter()
            .map(|&idx| NodeRecord::from(graph.node(idx)))
            .collect();

        let links: Vec<LinkRecord> = ego
            .edges
            .iter()
            .filter_map(|&edge| {
                let (a, b) = graph.canonical_endpoints(edge)?;
                let collab = graph.edge(edge);
                let movies = match movie_cap {
                    Some(cap) => collab.movies.iter().take(cap).cloned().collect(),
                    None => collab.movies.clone(),
                };
                Some(LinkRecord {
                    source: a.person_id.clone(),
                    target: b.person_id.clone(),
                    weight: collab.weight,
                    movies,
                    total_movies: movie_cap.map(|_| collab.movies.len()),
                })
            })
            .collect();

        Self {
            ego: center.person_id.clone(),
            label: center.name.clone(),
            meta: EgoMeta {
                node_count: nodes.len(),
                link_count: links.len(),
                generated_at: generated_at.to_string(),
            },
            nodes,
            links,
        }
    }
}

fn ordered_ids(a: &PersonNode, b: &PersonNode) -> (String, String) {
    if a.person_id <= b.person_id {
        (a.person_id.clone(), b.person_id.clone())
    } else {
        (b.person_id.clone(), a.person_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ParticipationIndex, ParticipationRecord};
    use crate::graph::{ego, GraphBuilder};

    fn sample_graph() -> CollabGraph {
        let mut records = Vec::new();
        for movie in ["M1", "M2", "M3", "M4", "M5", "M6", "M7"] {
            records.push(ParticipationRecord::new("Kim", movie).with_person_id("p2"));
            records.push(ParticipationRecord::new("Lee", movie).with_person_id("p1"));
        }
        records.push(ParticipationRecord::new("Park", "M1").with_person_id("p3"));
        let index = ParticipationIndex::build(&records, "기타");
        let mut graph = GraphBuilder::with_capacity(3).build(&index);
        graph.assign_communities(&[0, 0, 0], Some(0.0));
        graph
    }

    #[test]
    fn test_network_document_caps_movies() {
        let graph = sample_graph();
        let doc = NetworkDocument::from_graph(&graph, 5, "2026-01-01 00:00:00");

        assert_eq!(doc.metadata.total_nodes, 3);
        assert_eq!(doc.metadata.total_links, 3);
        assert_eq!(doc.metadata.communities, 1);
        assert_eq!(doc.metadata.total_collaborations, 9);
        assert_eq!(doc.metadata.avg_collaboration_per_link, 3.0);
        assert_eq!(doc.metadata.version, "1.0");

        let heavy = doc.links.iter().find(|link| link.weight == 7).unwrap();
        assert_eq!(heavy.source, "p1");
        assert_eq!(heavy.target, "p2");
        assert_eq!(heavy.movies.len(), 5);
        assert_eq!(heavy.total_movies, Some(7));

        assert_eq!(doc.nodes[0].id, "p2");
        assert_eq!(doc.nodes[0].label, "Kim");
    }

    #[test]
    fn test_ego_document_keeps_full_movies() {
        let graph = sample_graph();
        let ego = ego::extract_ego(&graph, "p3").unwrap();
        let doc = EgoDocument::from_ego(&graph, &ego, None, "2026-01-01T00:00:00+09:00");

        assert_eq!(doc.ego, "p3");
        assert_eq!(doc.label, "Park");
        assert_eq!(doc.meta.node_count, 3);
        assert_eq!(doc.meta.link_count, 3);

        let heavy = doc.links.iter().find(|link| link.weight == 7).unwrap();
        assert_eq!(heavy.movies.len(), 7);
        assert_eq!(heavy.total_movies, None);

        // Degree is taken from the full graph
        let center = doc.nodes.iter().find(|node| node.id == "p3").unwrap();
        assert_eq!(center.degree, 2);
    }

    #[test]
    fn test_ego_meta_field_names() {
        let graph = sample_graph();
        let ego = ego::extract_ego(&graph, "p1").unwrap();
        let doc = EgoDocument::from_ego(&graph, &ego, Some(2), "now");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["meta"]["nodeCount"], 3);
        assert_eq!(json["meta"]["linkCount"], 3);
        assert_eq!(json["meta"]["generatedAt"], "now");

        let heavy = doc.links.iter().find(|link| link.weight == 7).unwrap();
        assert_eq!(heavy.movies, vec!["M1", "M2"]);
        assert_eq!(heavy.total_movies, Some(7));
    }
}
