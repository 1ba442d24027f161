//! typo3scan core library.
//!
//! Processes the results of an external TYPO3 code scanner into reports:
//! matcher bundle selection per target version, filtering by change type and
//! indicator, statistics, documentation lookup and template rendering.
//!
//! High-level modules:
//! - `bundle`: Version-specific matcher lists and matcher config location.
//! - `engine`: Scan engine contract and the external-process adapter.
//! - `filter`: Change type and indicator filters.
//! - `stats`: Counts and percentages by indicator and type.
//! - `docs`: Cached change titles and documentation links per rule file.
//! - `context`: Extension key and base path derived from the scanned path.
//! - `scan`: Orchestration into a `ReportContext` and the scan command.
//! - `output`: Template registry, helpers, and report output.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `models`: Match data and the report context.
//! - `error`: Fatal error type.
//! - `utils`: Supporting helpers.
pub mod bundle;
pub mod cli;
pub mod config;
pub mod context;
pub mod docs;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod output;
pub mod scan;
pub mod stats;
pub mod utils;
