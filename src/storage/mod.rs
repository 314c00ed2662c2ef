//! Results persistence module

pub mod documents;
pub mod graphml;

pub use documents::{EgoDocument, LinkRecord, NetworkDocument, NodeRecord};

use anyhow::Result;
use crate::config::Config;
use crate::graph::{ego, CollabGraph, EgoNetwork};
use crate::stats::NetworkStats;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const NETWORK_FILE: &str = "network_data.json";
pub const STATS_FILE: &str = "network_stats.json";
pub const SNAPSHOT_FILE: &str = "network.bin";
pub const GRAPHML_FILE: &str = "network.graphml";
pub const EGO_DIR: &str = "ego_networks";

/// Which ego documents to write
#[derive(Debug, Clone, PartialEq)]
pub enum EgoSelection {
    Skip,
    All,
    Centers(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub link_movie_sample: usize,
    pub ego_movie_cap: Option<usize>,
    pub graphml: bool,
    pub ego: EgoSelection,
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            link_movie_sample: config.link_movie_sample,
            ego_movie_cap: config.ego_movie_cap,
            graphml: true,
            ego: EgoSelection::All,
        }
    }
}

/// Save analysis results to the specified directory
pub fn save_results(
    graph: &CollabGraph,
    stats: &NetworkStats,
    options: &ExportOptions,
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Saving network with {} people and {} collaborations to {}",
        graph.node_count(),
        graph.edge_count(),
        output_dir
    );

    let dir = Path::new(output_dir);
    fs::create_dir_all(dir)?;

    save_network(graph, options.link_movie_sample, dir)?;
    write_json(&dir.join(STATS_FILE), stats)?;
    save_snapshot(graph, &dir.join(SNAPSHOT_FILE))?;

    if options.graphml {
        graphml::save_graphml(graph, &dir.join(GRAPHML_FILE))?;
    }

    let written = save_ego_networks(graph, &options.ego, options.ego_movie_cap, dir)?;
    if written > 0 {
        log::info!("Wrote {} ego networks", written);
    }

    log::info!("Results saved successfully");

    Ok(())
}

/// Save the bulk network document
fn save_network(graph: &CollabGraph, movie_sample: usize, dir: &Path) -> Result<()> {
    log::info!("Saving network document");

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let document = NetworkDocument::from_graph(graph, movie_sample, &generated_at);

    write_json(&dir.join(NETWORK_FILE), &document)
}

/// Write ego documents under `<dir>/ego_networks`, returning how many were written
///
/// Documents are written as they are extracted. Unknown centres are logged and skipped.
pub fn save_ego_networks(
    graph: &CollabGraph,
    selection: &EgoSelection,
    movie_cap: Option<usize>,
    dir: &Path,
) -> Result<usize> {
    if *selection == EgoSelection::Skip {
        return Ok(0);
    }

    let ego_dir = dir.join(EGO_DIR);
    fs::create_dir_all(&ego_dir)?;

    let generated_at = chrono::Local::now().to_rfc3339();
    let written = AtomicUsize::new(0);
    let write_ego = |ego: &EgoNetwork| -> Result<()> {
        let document = EgoDocument::from_ego(graph, ego, movie_cap, &generated_at);
        let path = ego_dir.join(format!("{}.json", file_stem(&document.ego)));
        write_json(&path, &document)?;
        written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    };

    match selection {
        EgoSelection::Skip => {}
        EgoSelection::All => ego::try_for_each_ego(graph, |ego| write_ego(&ego))?,
        EgoSelection::Centers(ids) => {
            for (id, result) in ego::extract_many(graph, ids) {
                match result {
                    Ok(ego) => write_ego(&ego)?,
                    Err(e) => log::warn!("Skipping ego network for {}: {}", id, e),
                }
            }
        }
    }

    Ok(written.into_inner())
}

/// Persist the annotated graph as a bincode snapshot
pub fn save_snapshot(graph: &CollabGraph, path: &Path) -> Result<()> {
    log::info!("Saving graph snapshot to {}", path.display());

    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, graph)?;
    writer.flush()?;

    Ok(())
}

/// Restore a graph written by [`save_snapshot`]
pub fn load_snapshot(path: &Path) -> Result<CollabGraph> {
    log::info!("Loading graph snapshot from {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let graph: CollabGraph = bincode::deserialize_from(reader)?;

    log::info!(
        "Loaded snapshot with {} people and {} collaborations",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;

    Ok(())
}

/// File name for an external id
///
/// Path separators, control characters and `%` itself are percent-encoded, so
/// distinct ids never share a file.
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for ch in id.chars() {
        if matches!(ch, '%' | '/' | '\\' | ':') || ch.is_control() {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                stem.push_str(&format!("%{:02X}", byte));
            }
        } else {
            stem.push(ch);
        }
    }
    stem
}
