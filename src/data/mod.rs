//! Participation records and their grouping by movie

pub mod index;
pub mod loader;
pub mod preprocessing;

pub use index::{IndexReport, ParticipationIndex};

/// One raw person-to-movie credit as delivered by the ingestion source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipationRecord {
    /// Stable external person id
    pub person_id: Option<String>,

    /// Display name; identity fallback when `person_id` is absent
    pub person_name: Option<String>,

    /// Role label (director, actor, ...)
    pub role: Option<String>,

    /// Stable external movie id
    pub movie_id: Option<String>,

    /// Movie title; identity fallback when `movie_id` is absent
    pub movie_title: Option<String>,
}

impl ParticipationRecord {
    /// Credit keyed by name and title only
    pub fn new(person_name: &str, movie_title: &str) -> Self {
        Self {
            person_name: Some(person_name.to_string()),
            movie_title: Some(movie_title.to_string()),
            ..Self::default()
        }
    }

    /// Attach an external person id
    pub fn with_person_id(mut self, person_id: &str) -> Self {
        self.person_id = Some(person_id.to_string());
        self
    }

    /// Attach a role label
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Attach an external movie id
    pub fn with_movie_id(mut self, movie_id: &str) -> Self {
        self.movie_id = Some(movie_id.to_string());
        self
    }
}
