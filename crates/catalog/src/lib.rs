//! Procedure catalog
//!
//! Static, validated, in-memory representation of the administrative
//! procedures the assistant can drive. Loaded once at startup from a
//! JSON file and read-only thereafter.

pub mod catalog;
pub mod matcher;
pub mod procedure;

pub use catalog::ProcedureCatalog;
pub use matcher::ProcedureMatcher;
pub use procedure::{AssistantSpec, DocumentsRequired, Procedure, NO_CONTEXT_SENTINEL};

use thiserror::Error;

/// Catalog loading/validation errors. All of them are fatal at
/// startup: there is no degraded mode without a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog is empty")]
    Empty,

    #[error("Duplicate procedure name: {0}")]
    DuplicateName(String),

    #[error("Invalid procedure {name}: {message}")]
    InvalidProcedure { name: String, message: String },
}

impl From<CatalogError> for telassist_core::Error {
    fn from(err: CatalogError) -> Self {
        telassist_core::Error::Catalog(err.to_string())
    }
}
