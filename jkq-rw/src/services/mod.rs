//! Report-processing services
//!
//! Leaf components of the report pipeline: body parsing, question
//! normalization, alternative enrichment, reason classification, dataset
//! reconciliation, audit logging and processed-state tracking.

pub mod audit_log;
pub mod enricher;
pub mod normalizer;
pub mod reason;
pub mod reconciler;
pub mod report_parser;
pub mod state_tracker;
