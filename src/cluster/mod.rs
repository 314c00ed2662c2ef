//! Community analysis module

pub mod detection;
pub mod level;
pub mod metrics;

pub use detection::{detect_communities, Louvain};

use crate::graph::CollabGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assignment of every node to a community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Community id per node, indexed by node position
    pub membership: Vec<u32>,

    /// Number of distinct communities
    pub community_count: usize,

    /// Weighted modularity of `membership`, None for an empty graph
    pub modularity: Option<f64>,

    /// Aggregation levels that changed the partition
    pub levels: usize,

    /// False when an iteration cap stopped detection early
    pub converged: bool,
}

impl Partition {
    pub fn quality(&self) -> Option<StructureQuality> {
        self.modularity.map(StructureQuality::from_modularity)
    }

    /// Write community ids and modularity onto the graph
    pub fn apply(&self, graph: &mut CollabGraph) {
        graph.assign_communities(&self.membership, self.modularity);
    }
}

/// Informational band for a modularity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureQuality {
    /// Q < 0.3
    Weak,
    /// 0.3 <= Q < 0.7
    Good,
    /// Q >= 0.7
    VeryStrong,
}

impl StructureQuality {
    pub fn from_modularity(q: f64) -> Self {
        if q < 0.3 {
            StructureQuality::Weak
        } else if q < 0.7 {
            StructureQuality::Good
        } else {
            StructureQuality::VeryStrong
        }
    }
}

impl fmt::Display for StructureQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureQuality::Weak => write!(f, "weak community structure"),
            StructureQuality::Good => write!(f, "good community structure"),
            StructureQuality::VeryStrong => write!(f, "very strong community structure"),
        }
    }
}

/// Represents a detected community in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    /// Community id as written on the nodes
    pub id: u32,

    /// External ids of the members, in node order
    pub members: Vec<String>,

    /// Size of the community
    pub size: usize,

    /// Density: actual edges / potential edges
    pub density: f32,

    /// Members with the highest degree, highest first
    pub central_members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bands() {
        assert_eq!(StructureQuality::from_modularity(-0.1), StructureQuality::Weak);
        assert_eq!(StructureQuality::from_modularity(0.29), StructureQuality::Weak);
        assert_eq!(StructureQuality::from_modularity(0.3), StructureQuality::Good);
        assert_eq!(StructureQuality::from_modularity(0.69), StructureQuality::Good);
        assert_eq!(StructureQuality::from_modularity(0.7), StructureQuality::VeryStrong);
    }

    #[test]
    fn test_partition_quality() {
        let partition = Partition {
            membership: vec![0, 0, 1],
            community_count: 2,
            modularity: Some(0.45),
            levels: 1,
            converged: true,
        };

        assert_eq!(partition.quality(), Some(StructureQuality::Good));
    }
}
