//! Columnar snapshot files produced by the offline pipeline.
//!
//! Every snapshot is a JSON object with one array per column, all of the same
//! length:
//!
//! ```json
//! {"item_id_1": [100, 100], "item_id_2": [200, 201], "score": [0.9, 0.5]}
//! ```
//!
//! Any read or shape failure is a [`AppError::Configuration`]: the service must
//! not start serving with a partial snapshot.
use crate::error::{AppError, Result};
use crate::models::{ItemId, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// `(item_id_1, item_id_2, score)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilaritySnapshot {
    pub item_id_1: Vec<ItemId>,
    pub item_id_2: Vec<ItemId>,
    pub score: Vec<f64>,
}

/// `(user_id, item_id, rank)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalRecsSnapshot {
    pub user_id: Vec<UserId>,
    pub item_id: Vec<ItemId>,
    pub rank: Vec<i64>,
}

/// `(item_id, rank)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultRecsSnapshot {
    pub item_id: Vec<ItemId>,
    pub rank: Vec<i64>,
}

pub trait Snapshot: DeserializeOwned {
    const NAME: &'static str;

    /// Column names paired with their lengths.
    fn columns(&self) -> Vec<(&'static str, usize)>;

    fn rows(&self) -> usize {
        self.columns().first().map(|(_, len)| *len).unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        check_columns(self)
    }
}

fn check_columns<T: Snapshot + ?Sized>(snapshot: &T) -> Result<()> {
    let expected = snapshot.rows();

    if let Some((name, len)) = snapshot
        .columns()
        .into_iter()
        .find(|(_, len)| *len != expected)
    {
        return Err(AppError::Configuration(format!(
            "{} snapshot column '{}' has {} rows, expected {}",
            T::NAME,
            name,
            len,
            expected
        )));
    }

    Ok(())
}

impl Snapshot for SimilaritySnapshot {
    const NAME: &'static str = "similarity";

    fn columns(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("item_id_1", self.item_id_1.len()),
            ("item_id_2", self.item_id_2.len()),
            ("score", self.score.len()),
        ]
    }

    fn validate(&self) -> Result<()> {
        check_columns(self)?;

        if let Some(row) = self.score.iter().position(|s| !s.is_finite()) {
            return Err(AppError::Configuration(format!(
                "similarity snapshot has a non-finite score at row {}",
                row
            )));
        }

        Ok(())
    }
}

impl Snapshot for PersonalRecsSnapshot {
    const NAME: &'static str = "personal recommendations";

    fn columns(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("user_id", self.user_id.len()),
            ("item_id", self.item_id.len()),
            ("rank", self.rank.len()),
        ]
    }
}

impl Snapshot for DefaultRecsSnapshot {
    const NAME: &'static str = "default recommendations";

    fn columns(&self) -> Vec<(&'static str, usize)> {
        vec![("item_id", self.item_id.len()), ("rank", self.rank.len())]
    }
}

/// Read a snapshot file. Shape checks run where the snapshot is indexed
/// (`Snapshot::validate`).
pub fn read_snapshot<T: Snapshot>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AppError::Configuration(format!(
            "failed to open {} snapshot {}: {}",
            T::NAME,
            path.display(),
            e
        ))
    })?;

    let snapshot: T = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::Configuration(format!(
            "malformed {} snapshot {}: {}",
            T::NAME,
            path.display(),
            e
        ))
    })?;

    info!(
        snapshot = T::NAME,
        path = %path.display(),
        rows = snapshot.rows(),
        "Snapshot read"
    );

    Ok(snapshot)
}
