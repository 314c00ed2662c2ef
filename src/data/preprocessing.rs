//! Record normalisation ahead of indexing

use crate::data::ParticipationRecord;
use crate::error::NetworkError;
use std::collections::HashSet;

/// Placeholder title emitted by the source for credits without a movie
pub const UNKNOWN_TITLE: &str = "Unknown";

/// A participation row with trimmed fields and resolved identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRecord {
    /// Person identity: external id, or name when the id is absent
    pub person_key: String,
    pub person_name: String,
    pub role: String,
    /// Movie identity: external id, or title when the id is absent
    pub movie_key: String,
    pub movie_title: String,
}

/// Output of [`clean_records`]
#[derive(Debug, Clone, Default)]
pub struct CleanedRecords {
    /// Accepted rows in input order
    pub rows: Vec<CleanRecord>,

    /// Rows dropped as malformed
    pub rejected: usize,

    /// Rows dropped as repeated (person, movie) credits
    pub duplicates: usize,
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Normalise a single record, failing when an identity field is unusable
pub fn normalize_record(
    row: usize,
    record: &ParticipationRecord,
    default_role: &str,
) -> Result<CleanRecord, NetworkError> {
    let person_name = trimmed(&record.person_name).ok_or(NetworkError::MalformedRecord {
        row,
        reason: "missing person name",
    })?;

    let movie_title = trimmed(&record.movie_title).ok_or(NetworkError::MalformedRecord {
        row,
        reason: "missing movie title",
    })?;

    if movie_title == UNKNOWN_TITLE {
        return Err(NetworkError::MalformedRecord {
            row,
            reason: "placeholder movie title",
        });
    }

    let person_key = trimmed(&record.person_id).unwrap_or(person_name);
    let movie_key = trimmed(&record.movie_id).unwrap_or(movie_title);
    let role = trimmed(&record.role).unwrap_or(default_role);

    Ok(CleanRecord {
        person_key: person_key.to_string(),
        person_name: person_name.to_string(),
        role: role.to_string(),
        movie_key: movie_key.to_string(),
        movie_title: movie_title.to_string(),
    })
}

/// Drop malformed rows and repeated (person, movie) credits
pub fn clean_records(records: &[ParticipationRecord], default_role: &str) -> CleanedRecords {
    let mut cleaned = CleanedRecords {
        rows: Vec::with_capacity(records.len()),
        ..CleanedRecords::default()
    };
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        let clean = match normalize_record(row, record, default_role) {
            Ok(clean) => clean,
            Err(e) => {
                log::debug!("Dropping record: {}", e);
                cleaned.rejected += 1;
                continue;
            }
        };

        if !seen.insert((clean.person_key.clone(), clean.movie_key.clone())) {
            cleaned.duplicates += 1;
            continue;
        }

        cleaned.rows.push(clean);
    }

    if cleaned.rejected > 0 {
        log::warn!("Dropped {} malformed records", cleaned.rejected);
    }
    log::info!(
        "Accepted {} records ({} duplicates removed)",
        cleaned.rows.len(),
        cleaned.duplicates
    );

    cleaned
}
