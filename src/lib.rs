//! draftsmith: Brief-Driven Article Generation with a Quality Gate
//!
//! Turns a content brief (explicit, from a content idea, or from a raw topic) into a
//! long-form article draft through pluggable generation collaborators, scores the draft
//! against deterministic editorial rules, and runs a bounded field-level repair loop on
//! whatever fails. Every run ends in a structured `GenerationResult`.

pub mod brief;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod repair;
pub mod text;
pub mod validation;
