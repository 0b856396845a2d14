use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::encoding::EncodedRecord;

/// The ordered feature names the model expects, fixed at training time. The
/// training export writes them as a JSON array next to the model file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open feature schema {}", path.display()))?;
        let schema = serde_json::from_reader(file)
            .with_context(|| format!("invalid feature schema {}", path.display()))?;
        Ok(schema)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Projects a record onto the schema: schema order, absent keys become
    /// 0.0, keys the schema does not know are dropped. Never fails; drift
    /// between encoder and schema shows up as zeros, not errors.
    pub fn reconcile(&self, record: &EncodedRecord) -> Vec<f32> {
        self.names
            .iter()
            .map(|name| record.get(name).unwrap_or(0.0))
            .collect()
    }
}
