//! Grouping of participation rows by movie

use crate::data::preprocessing::{clean_records, CleanRecord};
use crate::data::ParticipationRecord;
use indexmap::{IndexMap, IndexSet};

/// Distinct participants credited on one movie, in credit order
#[derive(Debug, Clone)]
pub struct MovieGroup {
    pub title: String,
    pub participants: IndexSet<String>,
}

/// Per-person attributes gathered while indexing
#[derive(Debug, Clone)]
pub struct PersonEntry {
    /// First name seen for this identity
    pub name: String,

    /// First role seen for this identity
    pub role: String,

    /// Movie identities this person is credited on
    pub movies: IndexSet<String>,
}

/// Row accounting for one indexing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Movie to participants mapping plus person attributes
#[derive(Debug, Clone, Default)]
pub struct ParticipationIndex {
    movies: IndexMap<String, MovieGroup>,
    people: IndexMap<String, PersonEntry>,
    report: IndexReport,
}

impl ParticipationIndex {
    /// Clean raw records and group them by movie
    pub fn build(records: &[ParticipationRecord], default_role: &str) -> Self {
        let cleaned = clean_records(records, default_role);
        let mut index = Self::from_clean(cleaned.rows);
        index.report.rejected = cleaned.rejected;
        index.report.duplicates = cleaned.duplicates;

        log::info!(
            "Indexed {} movies and {} people ({} collaborative movies)",
            index.movie_count(),
            index.person_count(),
            index.collaborative_movie_count()
        );

        index
    }

    /// Group already-normalised rows by movie
    pub fn from_clean(rows: Vec<CleanRecord>) -> Self {
        let mut index = Self::default();

        for row in rows {
            let movie = index
                .movies
                .entry(row.movie_key.clone())
                .or_insert_with(|| MovieGroup {
                    title: row.movie_title.clone(),
                    participants: IndexSet::new(),
                });
            let added = movie.participants.insert(row.person_key.clone());

            let person = index
                .people
                .entry(row.person_key)
                .or_insert_with(|| PersonEntry {
                    name: row.person_name,
                    role: row.role,
                    movies: IndexSet::new(),
                });
            person.movies.insert(row.movie_key);

            if added {
                index.report.accepted += 1;
            } else {
                index.report.duplicates += 1;
            }
        }

        index
    }

    /// Movies keyed by identity, in first-seen order
    pub fn movies(&self) -> &IndexMap<String, MovieGroup> {
        &self.movies
    }

    pub fn person(&self, key: &str) -> Option<&PersonEntry> {
        self.people.get(key)
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Movies with at least two credited participants
    pub fn collaborative_movie_count(&self) -> usize {
        self.movies
            .values()
            .filter(|movie| movie.participants.len() >= 2)
            .count()
    }

    pub fn report(&self) -> IndexReport {
        self.report
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
