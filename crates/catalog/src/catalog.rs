//! Catalog loading and validation

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::procedure::Procedure;
use crate::CatalogError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    procedures: Vec<Procedure>,
}

/// All procedures, loaded once at process start and never mutated.
///
/// Entries are handed out as `Arc<Procedure>` so matcher results and
/// dialogue state can share them without copies.
#[derive(Debug)]
pub struct ProcedureCatalog {
    procedures: Vec<Arc<Procedure>>,
}

impl ProcedureCatalog {
    /// Load and validate the catalog from a JSON file.
    ///
    /// Any failure here is fatal: the service must refuse to serve
    /// without a valid catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw)?;

        let catalog = Self::from_procedures(file.procedures)?;
        tracing::info!(
            path = %path.display(),
            count = catalog.len(),
            "Loaded procedure catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from already-parsed procedures (used by tests).
    pub fn from_procedures(procedures: Vec<Procedure>) -> Result<Self, CatalogError> {
        if procedures.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for proc in &procedures {
            if proc.name.trim().is_empty() {
                return Err(CatalogError::InvalidProcedure {
                    name: proc.name.clone(),
                    message: "procedure name is empty".to_string(),
                });
            }
            if !seen.insert(proc.name.to_lowercase()) {
                return Err(CatalogError::DuplicateName(proc.name.clone()));
            }
        }

        Ok(Self {
            procedures: procedures.into_iter().map(Arc::new).collect(),
        })
    }

    /// Look up a procedure by exact name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<Procedure>> {
        self.procedures
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Procedure>> {
        self.procedures.iter()
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"{
            "procedures": [
                {
                    "procedure": "Nouvelle souscription Internet",
                    "documents_required": ["CIN", "Justificatif de domicile"],
                    "remarks": ["Frais d'installation: 50 DT"],
                    "ai_assistant_agent": {
                        "required_context": ["type d'offre souhaitée", "adresse du domicile"],
                        "instructions": "Collecter le type d'offre et l'adresse."
                    },
                    "source": "portail"
                },
                {
                    "procedure": "Consultation de solde",
                    "documents_required": [],
                    "remarks": [],
                    "ai_assistant_agent": {
                        "required_context": ["Aucun context requis"],
                        "instructions": ""
                    },
                    "source": "portail"
                }
            ]
        }"#
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let catalog = ProcedureCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("nouvelle souscription internet").is_some());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = ProcedureCatalog::load("/nonexistent/procedures.json").unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = ProcedureCatalog::from_procedures(vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let proc: Procedure = serde_json::from_value(serde_json::json!({
            "procedure": "Transfert de ligne",
            "documents_required": [],
            "remarks": [],
            "ai_assistant_agent": {"required_context": [], "instructions": ""},
            "source": ""
        }))
        .unwrap();
        let err = ProcedureCatalog::from_procedures(vec![proc.clone(), proc]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }
}
