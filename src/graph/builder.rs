//! Graph construction module

use crate::data::ParticipationIndex;
use crate::graph::collab::{Collaboration, PersonNode};
use crate::graph::CollabGraph;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashMap;

/// Canonical node pair mapped to the positions of the movies it shares
type PairMovies = HashMap<(u32, u32), Vec<u32>>;

/// Builder turning per-movie participant groups into a collaboration graph
pub struct GraphBuilder {
    /// Only the first N credited participants of a movie generate pairs
    max_cast_size: Option<usize>,

    /// Mapping from person ids to node indices
    id_to_index: HashMap<String, u32>,

    /// Node records in creation order
    nodes: Vec<PersonNode>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_cast_size: None,
            id_to_index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Truncate pair generation to the first `cap` participants of each movie
    pub fn with_max_cast_size(mut self, cap: Option<usize>) -> Self {
        self.max_cast_size = cap;
        self
    }

    /// Get or create a node for the given person id
    fn get_or_create_node(&mut self, index: &ParticipationIndex, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let (name, role, movies_count) = match index.person(id) {
            Some(entry) => (entry.name.clone(), entry.role.clone(), entry.movies.len() as u32),
            None => (id.to_string(), String::new(), 0),
        };

        let idx = self.nodes.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.nodes.push(PersonNode {
            person_id: id.to_string(),
            name,
            role,
            movies_count,
            degree: 0,
            community: None,
        });

        idx
    }

    /// Build the collaboration graph from a participation index
    pub fn build(mut self, index: &ParticipationIndex) -> CollabGraph {
        log::info!("Building collaboration graph from {} movies", index.movie_count());

        // Nodes are created sequentially in credit order so indices are stable
        let mut casts: Vec<Vec<u32>> = Vec::with_capacity(index.movie_count());
        for (movie_key, movie) in index.movies() {
            let mut cast: Vec<u32> = movie
                .participants
                .iter()
                .map(|person| self.get_or_create_node(index, person))
                .collect();

            if let Some(cap) = self.max_cast_size {
                if cast.len() > cap {
                    log::warn!(
                        "Movie '{}' has {} participants, generating pairs for the first {} only",
                        movie_key,
                        cast.len(),
                        cap
                    );
                    cast.truncate(cap);
                }
            }
            casts.push(cast);
        }

        let pair_movies = collect_pairs(&casts);
        let pair_count: usize = pair_movies.values().map(Vec::len).sum();
        log::info!(
            "Generated {} co-credit pairs across {} collaborations",
            pair_count,
            pair_movies.len()
        );

        // Sorted keys and positions keep the result independent of worker scheduling
        let titles: Vec<&str> = index.movies().values().map(|movie| movie.title.as_str()).collect();
        let edges: Vec<((u32, u32), Collaboration)> = pair_movies
            .into_iter()
            .sorted_unstable_by_key(|(pair, _)| *pair)
            .map(|(pair, mut positions)| {
                positions.sort_unstable();
                let collaboration = Collaboration {
                    weight: positions.len() as u32,
                    movies: positions
                        .iter()
                        .map(|&pos| titles[pos as usize].to_string())
                        .collect(),
                };
                (pair, collaboration)
            })
            .collect();

        let graph = CollabGraph::from_parts(self.nodes, edges);
        log::info!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }
}

/// Generate every unordered pair per movie, merging per-worker maps by concatenation
fn collect_pairs(casts: &[Vec<u32>]) -> PairMovies {
    casts
        .par_iter()
        .enumerate()
        .filter(|(_, cast)| cast.len() >= 2)
        .fold(PairMovies::new, |mut local, (pos, cast)| {
            for (a, b) in cast.iter().copied().tuple_combinations() {
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                local.entry(key).or_default().push(pos as u32);
            }
            local
        })
        .reduce(PairMovies::new, |mut merged, local| {
            for (key, mut positions) in local {
                merged.entry(key).or_default().append(&mut positions);
            }
            merged
        })
}
