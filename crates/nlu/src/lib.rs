//! Text normalization and intent classification
//!
//! This crate turns free-text chat input into something the ordering engine
//! can act on:
//! - `normalize` / `extract_size` — lowercase, strip punctuation, pull out
//!   size markers (large wins on ambiguity)
//! - `KnowledgeBase` — the fixed, ordered list of knowledge groups with one
//!   consistent reply shape per group
//! - `IntentClassifier` — word-overlap scoring with explicit tier
//!   precedence and deterministic tie-breaking

pub mod classifier;
pub mod knowledge;
pub mod normalize;

pub use classifier::{Classification, IntentClassifier};
pub use knowledge::{GroupTier, KnowledgeBase, KnowledgeGroup, ReplyPayload};
pub use normalize::{extract_size, normalize};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NluError {
    #[error("Knowledge file not found: {0}: {1}")]
    FileNotFound(String, String),

    #[error("Failed to parse knowledge file: {0}")]
    ParseError(String),
}
