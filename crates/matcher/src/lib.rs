//! Lexical procedure matcher
//!
//! Cheap token-overlap ranking over the catalog, used as the
//! pre-filter in front of model-based intent resolution. A semantic
//! index can replace it behind the same `ProcedureMatcher` contract.

pub mod lexical;

pub use lexical::LexicalMatcher;
