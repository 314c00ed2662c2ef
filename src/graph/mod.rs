//! Collaboration graph representation, construction and neighbourhood queries

pub mod builder;
pub mod collab;
pub mod ego;

pub use builder::GraphBuilder;
pub use collab::{CollabGraph, Collaboration, PersonNode};
pub use ego::EgoNetwork;
