//! End-to-end network analysis: index, build, detect, report

use anyhow::Result;
use crate::cluster::{detect_communities, metrics, Community, Partition};
use crate::config::Config;
use crate::data::{IndexReport, ParticipationIndex, ParticipationRecord};
use crate::graph::{CollabGraph, GraphBuilder};
use crate::stats::{MovieCoverage, NetworkStats};

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    pub index_report: IndexReport,
    /// Graph annotated with community ids and modularity
    pub graph: CollabGraph,
    pub partition: Partition,
    /// Largest first
    pub communities: Vec<Community>,
    pub stats: NetworkStats,
}

/// Run the whole analysis over raw participation records
///
/// Zero usable records yield an empty graph rather than an error.
pub fn run(records: &[ParticipationRecord], config: &Config) -> Result<NetworkAnalysis> {
    config.validate()?;

    log::info!("Analysing {} participation records", records.len());

    let index = ParticipationIndex::build(records, &config.default_role);
    let index_report = index.report();
    if index.is_empty() {
        log::warn!("No usable participation records; the network will be empty");
    }

    let mut graph = GraphBuilder::with_capacity(index.person_count())
        .with_max_cast_size(config.max_cast_size)
        .build(&index);

    let partition = detect_communities(&mut graph, config);

    let communities = metrics::summarize_communities(&graph, config.top_k);
    for community in communities.iter().take(config.top_k) {
        log::debug!(
            "Community {}: {} members, density {:.3}, central {:?}",
            community.id,
            community.size,
            community.density,
            community.central_members
        );
    }

    let stats = NetworkStats::compute(&graph, MovieCoverage::from_index(&index), config.top_k);

    Ok(NetworkAnalysis {
        index_report,
        graph,
        partition,
        communities,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;

    #[test]
    fn test_run_annotates_graph() {
        let records = vec![
            ParticipationRecord::new("A", "M1"),
            ParticipationRecord::new("B", "M1"),
            ParticipationRecord::new("C", "M1"),
            ParticipationRecord::new("C", "M2"),
            ParticipationRecord::new("D", "M2"),
            ParticipationRecord::new("", "M3"),
            ParticipationRecord::new("A", "M1"),
        ];

        let analysis = run(&records, &Config::default()).unwrap();

        assert_eq!(analysis.index_report.accepted, 5);
        assert_eq!(analysis.index_report.rejected, 1);
        assert_eq!(analysis.index_report.duplicates, 1);
        assert_eq!(analysis.graph.node_count(), 4);
        assert_eq!(analysis.graph.edge_count(), 4);
        assert!(analysis.graph.nodes().all(|node| node.community.is_some()));
        assert_eq!(analysis.graph.modularity(), analysis.partition.modularity);
        assert_eq!(analysis.stats.total_nodes, 4);

        let covered: usize = analysis.communities.iter().map(|c| c.size).sum();
        assert_eq!(covered, 4);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let analysis = run(&[], &Config::default()).unwrap();

        assert!(analysis.graph.is_empty());
        assert_eq!(analysis.partition.modularity, None);
        assert!(analysis.communities.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            resolution: 0.0,
            ..Config::default()
        };

        let err = run(&[], &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NetworkError>(),
            Some(NetworkError::InvalidParameter { name: "resolution", .. })
        ));
    }
}
