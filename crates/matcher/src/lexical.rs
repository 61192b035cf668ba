//! Token-overlap matcher implementation

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use telassist_catalog::{Procedure, ProcedureCatalog, ProcedureMatcher};

/// Weight of a query token that hits the procedure name rather than
/// its remarks/documents/instructions.
const NAME_HIT: f32 = 1.0;
const BODY_HIT: f32 = 0.6;

struct IndexedProcedure {
    procedure: Arc<Procedure>,
    name_tokens: HashSet<String>,
    body_tokens: HashSet<String>,
}

/// Ranks catalog entries by lexical overlap with the query.
///
/// Tokens are Unicode words, lowercased, with short function words
/// (<= 2 chars) dropped. Scores are in [0, 1]; candidates below
/// `min_score` are filtered out.
pub struct LexicalMatcher {
    index: Vec<IndexedProcedure>,
    min_score: f32,
}

fn tokenize(text: &str) -> HashSet<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() > 2)
        .collect()
}

impl LexicalMatcher {
    pub fn new(catalog: &ProcedureCatalog, min_score: f32) -> Self {
        let index = catalog
            .iter()
            .map(|proc| IndexedProcedure {
                name_tokens: tokenize(&proc.name),
                body_tokens: tokenize(&proc.index_text()),
                procedure: proc.clone(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(procedures = index.len(), min_score, "Built lexical index");
        Self { index, min_score }
    }

    fn score(&self, query_tokens: &HashSet<String>, entry: &IndexedProcedure) -> f32 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        for token in query_tokens {
            if entry.name_tokens.contains(token) {
                total += NAME_HIT;
            } else if entry.body_tokens.contains(token) {
                total += BODY_HIT;
            }
        }
        total / query_tokens.len() as f32
    }
}

#[async_trait]
impl ProcedureMatcher for LexicalMatcher {
    async fn search(&self, text: &str, top_k: usize) -> Vec<Arc<Procedure>> {
        let text_lower = text.to_lowercase();
        let query_tokens = tokenize(text);

        let mut scored: Vec<(f32, &IndexedProcedure)> = self
            .index
            .iter()
            .map(|entry| {
                // A query quoting the full procedure name is an exact hit.
                let score = if text_lower.contains(&entry.procedure.name.to_lowercase()) {
                    1.0
                } else {
                    self.score(&query_tokens, entry)
                };
                (score, entry)
            })
            .filter(|(score, _)| *score >= self.min_score)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<Arc<Procedure>> = scored
            .into_iter()
            .take(top_k)
            .map(|(_, entry)| entry.procedure.clone())
            .collect();

        tracing::debug!(query = text, hits = results.len(), "Lexical search");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProcedureCatalog {
        let procedures: Vec<Procedure> = serde_json::from_value(serde_json::json!([
            {
                "procedure": "Nouvelle souscription Internet",
                "documents_required": ["CIN"],
                "remarks": ["Offres fibre, ADSL et Box 5G disponibles"],
                "ai_assistant_agent": {
                    "required_context": ["type d'offre souhaitée", "adresse du domicile"],
                    "instructions": "souscription internet fibre adsl"
                },
                "source": ""
            },
            {
                "procedure": "Transfert de ligne téléphonique",
                "documents_required": ["CIN"],
                "remarks": ["Le titulaire doit valider le transfert"],
                "ai_assistant_agent": {
                    "required_context": ["numéro de la ligne"],
                    "instructions": "transfert ligne titulaire"
                },
                "source": ""
            }
        ]))
        .unwrap();
        ProcedureCatalog::from_procedures(procedures).unwrap()
    }

    #[tokio::test]
    async fn test_internet_query_ranks_subscription_first() {
        let matcher = LexicalMatcher::new(&catalog(), 0.3);
        let results = matcher.search("je veux souscrire à internet fibre", 3).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].name, "Nouvelle souscription Internet");
    }

    #[tokio::test]
    async fn test_exact_name_scores_one() {
        let matcher = LexicalMatcher::new(&catalog(), 0.3);
        let results = matcher
            .search("Transfert de ligne téléphonique s'il vous plaît", 3)
            .await;
        assert_eq!(results[0].name, "Transfert de ligne téléphonique");
    }

    #[tokio::test]
    async fn test_unrelated_query_below_threshold() {
        let matcher = LexicalMatcher::new(&catalog(), 0.3);
        let results = matcher.search("quel temps fait-il aujourd'hui", 3).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_respected() {
        let matcher = LexicalMatcher::new(&catalog(), 0.0);
        let results = matcher.search("ligne internet", 1).await;
        assert_eq!(results.len(), 1);
    }
}
