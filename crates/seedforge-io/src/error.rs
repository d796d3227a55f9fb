//! Errors raised while reading or writing files.

use std::path::{Path, PathBuf};

use thiserror::Error;

use seedforge_core::SeedForgeError;

/// A file adapter failure, tagged with the file involved.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

impl AdapterError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        AdapterError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        AdapterError::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn missing_column(path: &Path, column: &str) -> Self {
        AdapterError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }
    }

    /// As an input error, for catalogs the run cannot proceed without.
    pub fn into_input(self) -> SeedForgeError {
        SeedForgeError::InvalidInput(self.to_string())
    }

    /// As a constraint-data error, for optional tables.
    pub fn into_constraint_data(self) -> SeedForgeError {
        SeedForgeError::ConstraintData(self.to_string())
    }

    pub fn into_export(self) -> SeedForgeError {
        SeedForgeError::Export(self.to_string())
    }

    pub fn into_storage(self) -> SeedForgeError {
        SeedForgeError::Storage(self.to_string())
    }
}
