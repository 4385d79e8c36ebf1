// The loaded salary dataset. The service owns exactly one at a time; uploads
// replace it wholesale and every statistic is recomputed from it per request.

pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::dashboard::filters::{filter_options, FilterOptions};
use crate::ingest::{self, IngestError};
use crate::models::record::SalaryRecord;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub records: Vec<SalaryRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<String>, records: Vec<SalaryRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            source: source.into(),
            records,
        }
    }

    pub fn empty() -> Self {
        Self::new("empty", Vec::new())
    }

    pub fn from_csv_file(path: &Path) -> Result<Self, IngestError> {
        let records = ingest::load_csv_file(path)?;
        info!(
            "Loaded {} salary records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(path.display().to_string(), records))
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            dataset_id: self.id,
            loaded_at: self.loaded_at,
            source: self.source.clone(),
            total_records: self.records.len(),
            records_with_salary: self
                .records
                .iter()
                .filter(|r| r.annual_salary.is_some())
                .count(),
            filters: filter_options(&self.records),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub dataset_id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub total_records: usize,
    pub records_with_salary: usize,
    pub filters: FilterOptions,
}

/// Shared handle to the current dataset.
#[derive(Clone)]
pub struct DatasetStore {
    inner: Arc<RwLock<Dataset>>,
}

impl DatasetStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dataset)),
        }
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, Dataset> {
        self.inner.read().await
    }

    /// Swaps in a new dataset and returns its summary.
    pub async fn replace(&self, dataset: Dataset) -> DatasetInfo {
        let info = dataset.info();
        *self.inner.write().await = dataset;
        info!(
            "Dataset {} replaced: {} records from {}",
            info.dataset_id, info.total_records, info.source
        );
        info
    }
}
