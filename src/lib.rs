//! Film collaboration network analysis: graph construction, community detection and ego extraction

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod stats;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use config::Config;
pub use error::NetworkError;
