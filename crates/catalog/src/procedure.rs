//! Procedure data model
//!
//! Mirrors the catalog JSON shape used by existing tooling:
//!
//! ```json
//! {
//!   "procedure": "Nouvelle souscription Internet",
//!   "documents_required": ["..."] | {"particulier": [...], "entreprise": [...]},
//!   "remarks": ["..."],
//!   "ai_assistant_agent": {"required_context": ["..."], "instructions": "..."},
//!   "source": "..."
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal placed in `required_context` when a procedure needs no
/// context at all.
pub const NO_CONTEXT_SENTINEL: &str = "Aucun context requis";

/// Required documents, either a flat list or keyed by client category
/// ("particulier" / "entreprise").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentsRequired {
    Flat(Vec<String>),
    ByCategory(BTreeMap<String, Vec<String>>),
}

impl DocumentsRequired {
    /// Resolve the document list for a collected client-type value.
    ///
    /// Category-keyed documents select the "entreprise" sub-list when
    /// the value contains a business token (any case, accent-tolerant
    /// via the plain "entreprise"/"business"/"societe" spellings), and
    /// default to "particulier" otherwise, including when the slot was
    /// never collected.
    pub fn resolve(&self, client_type: Option<&str>) -> Vec<String> {
        match self {
            DocumentsRequired::Flat(docs) => docs.clone(),
            DocumentsRequired::ByCategory(map) => {
                let wants_business = client_type
                    .map(|v| {
                        let v = v.to_lowercase();
                        v.contains("entreprise") || v.contains("business") || v.contains("société")
                    })
                    .unwrap_or(false);

                let pick = |key: &str| map.get(key).cloned();
                if wants_business {
                    pick("entreprise")
                        .or_else(|| pick("particulier"))
                        .unwrap_or_default()
                } else {
                    pick("particulier").unwrap_or_default()
                }
            }
        }
    }
}

/// Per-procedure guidance for the dialogue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSpec {
    pub required_context: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    /// Unique human-readable identifier; also the matching key and
    /// the conversation anchor.
    #[serde(rename = "procedure")]
    pub name: String,
    pub documents_required: DocumentsRequired,
    #[serde(default)]
    pub remarks: Vec<String>,
    pub ai_assistant_agent: AssistantSpec,
    #[serde(default)]
    pub source: String,
}

impl Procedure {
    /// Ordered required context slots, with the no-context sentinel
    /// filtered out. Empty means the procedure completes on the first
    /// matching turn.
    pub fn required_context(&self) -> Vec<&str> {
        self.ai_assistant_agent
            .required_context
            .iter()
            .map(String::as_str)
            .filter(|ctx| *ctx != NO_CONTEXT_SENTINEL)
            .collect()
    }

    /// Free-text guidance available to extraction/question prompts.
    pub fn instructions(&self) -> &str {
        &self.ai_assistant_agent.instructions
    }

    /// Text the lexical matcher indexes for this procedure.
    pub fn index_text(&self) -> String {
        let docs = match &self.documents_required {
            DocumentsRequired::Flat(docs) => docs.join(" "),
            DocumentsRequired::ByCategory(map) => map
                .values()
                .flat_map(|docs| docs.iter())
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
        };
        format!(
            "{} {} {} {}",
            self.name,
            self.remarks.join(" "),
            docs,
            self.ai_assistant_agent.instructions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorized() -> DocumentsRequired {
        let mut map = BTreeMap::new();
        map.insert("particulier".to_string(), vec!["CIN".to_string()]);
        map.insert(
            "entreprise".to_string(),
            vec!["Registre de commerce".to_string(), "Matricule fiscal".to_string()],
        );
        DocumentsRequired::ByCategory(map)
    }

    #[test]
    fn test_flat_documents_resolve_directly() {
        let docs = DocumentsRequired::Flat(vec!["CIN".into(), "Justificatif".into()]);
        assert_eq!(docs.resolve(Some("Entreprise")), vec!["CIN", "Justificatif"]);
    }

    #[test]
    fn test_business_category_any_case() {
        let docs = categorized();
        assert_eq!(docs.resolve(Some("ENTREPRISE")).len(), 2);
        assert_eq!(docs.resolve(Some("une petite entreprise")).len(), 2);
        assert_eq!(docs.resolve(Some("business")).len(), 2);
    }

    #[test]
    fn test_defaults_to_individual() {
        let docs = categorized();
        assert_eq!(docs.resolve(None), vec!["CIN"]);
        assert_eq!(docs.resolve(Some("particulier")), vec!["CIN"]);
        assert_eq!(docs.resolve(Some("autre chose")), vec!["CIN"]);
    }

    #[test]
    fn test_sentinel_filtered_from_required_context() {
        let proc: Procedure = serde_json::from_value(serde_json::json!({
            "procedure": "Consultation solde",
            "documents_required": [],
            "remarks": [],
            "ai_assistant_agent": {
                "required_context": [NO_CONTEXT_SENTINEL],
                "instructions": ""
            },
            "source": "test"
        }))
        .unwrap();
        assert!(proc.required_context().is_empty());
    }

    #[test]
    fn test_untagged_documents_parse_both_shapes() {
        let flat: DocumentsRequired = serde_json::from_str(r#"["CIN"]"#).unwrap();
        assert!(matches!(flat, DocumentsRequired::Flat(_)));
        let keyed: DocumentsRequired =
            serde_json::from_str(r#"{"particulier": ["CIN"]}"#).unwrap();
        assert!(matches!(keyed, DocumentsRequired::ByCategory(_)));
    }
}
