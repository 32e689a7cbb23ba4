use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read disease data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse disease data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("disease data contains no records")]
    Empty,
    #[error("duplicate prediction label: {0}")]
    DuplicateLabel(String),
}

/// Static metadata for one predicted class, keyed by `prediction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseRecord {
    pub prediction: String,
    pub plant: String,
    pub disease: String,
    pub description: String,
    pub severity: String,
}

impl DiseaseRecord {
    /// Placeholder returned when a predicted label has no metadata entry.
    pub fn unknown(label: &str) -> Self {
        Self {
            prediction: label.to_string(),
            plant: "Desconhecido".to_string(),
            disease: "Desconhecido".to_string(),
            description: "Não disponível".to_string(),
            severity: "Não classificado".to_string(),
        }
    }
}

/// Disease records loaded once at startup and read-only thereafter.
///
/// The JSON array order doubles as the label list: position i holds the label
/// the model emits at output index i. That ordering is a contract with the
/// training artifact and cannot be checked here.
#[derive(Clone)]
pub struct DiseaseRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    labels: Vec<String>,
    by_label: HashMap<String, DiseaseRecord>,
}

impl DiseaseRegistry {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path)?;
        let records: Vec<DiseaseRecord> = serde_json::from_str(&raw)?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, RegistryError> {
        if records.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut labels = Vec::with_capacity(records.len());
        let mut by_label = HashMap::with_capacity(records.len());
        for record in records {
            if by_label.contains_key(&record.prediction) {
                return Err(RegistryError::DuplicateLabel(record.prediction));
            }
            labels.push(record.prediction.clone());
            by_label.insert(record.prediction.clone(), record);
        }

        Ok(Self {
            inner: Arc::new(RegistryInner { labels, by_label }),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.labels.len()
    }

    /// Label at a model output index, in training-time class order.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.inner.labels.get(index).map(String::as_str)
    }

    /// Full record for a label, or the "Desconhecido" placeholder.
    pub fn lookup(&self, label: &str) -> DiseaseRecord {
        self.inner
            .by_label
            .get(label)
            .cloned()
            .unwrap_or_else(|| DiseaseRecord::unknown(label))
    }
}
