//! Procedure matcher contract

use std::sync::Arc;

use async_trait::async_trait;

use crate::procedure::Procedure;

/// Given free text, return a ranked list of plausibly relevant
/// procedures.
///
/// The dialogue core only consumes this contract; it does not care
/// whether the ranking comes from a lexical overlap score or a
/// semantic index. Results are ordered best-first, filtered to a
/// minimum relevance threshold, and empty when nothing clears it.
#[async_trait]
pub trait ProcedureMatcher: Send + Sync {
    async fn search(&self, text: &str, top_k: usize) -> Vec<Arc<Procedure>>;
}
