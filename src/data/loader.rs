//! Tabular file loading for participation records

use crate::data::ParticipationRecord;
use crate::error::NetworkError;
use anyhow::Result;
use polars::prelude::*;
use std::path::Path;

const PERSON_NAME: &str = "person_name";
const MOVIE_TITLE: &str = "movie_title";
const PERSON_ID: &str = "person_id";
const MOVIE_ID: &str = "movie_id";
const ROLE_COLUMNS: [&str; 2] = ["person_role", "role"];

/// Load person-to-movie credits from a CSV or Parquet file
pub fn load_participation_records(path: &str) -> Result<Vec<ParticipationRecord>> {
    log::info!("Reading participation file: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let is_parquet = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));

    let df = if is_parquet {
        LazyFrame::scan_parquet(path, Default::default())?.collect()?
    } else {
        // All columns as strings so numeric ids keep their exact text
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?
    };

    log::info!("File schema: {:?}", df.schema());

    let records = records_from_frame(&df)?;
    log::info!("Loaded {} participation rows", records.len());

    Ok(records)
}

/// Convert a data frame with the participation columns into records
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<ParticipationRecord>> {
    let names = string_column(df, PERSON_NAME)?
        .ok_or_else(|| NetworkError::MissingColumn(PERSON_NAME.to_string()))?;
    let titles = string_column(df, MOVIE_TITLE)?
        .ok_or_else(|| NetworkError::MissingColumn(MOVIE_TITLE.to_string()))?;
    let person_ids = string_column(df, PERSON_ID)?;
    let movie_ids = string_column(df, MOVIE_ID)?;

    let mut roles = None;
    for column in ROLE_COLUMNS {
        roles = string_column(df, column)?;
        if roles.is_some() {
            break;
        }
    }

    let cell = |column: &Option<StringChunked>, row: usize| -> Option<String> {
        column
            .as_ref()
            .and_then(|values| values.get(row))
            .map(str::to_string)
    };

    let records = (0..df.height())
        .map(|row| ParticipationRecord {
            person_id: cell(&person_ids, row),
            person_name: names.get(row).map(str::to_string),
            role: cell(&roles, row),
            movie_id: cell(&movie_ids, row),
            movie_title: titles.get(row).map(str::to_string),
        })
        .collect();

    Ok(records)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>> {
    if !df.schema().contains(name) {
        return Ok(None);
    }

    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(Some(column.str()?.clone()))
}
