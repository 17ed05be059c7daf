//! Constants used throughout the Nuskha core crate.
//!
//! Defaults, limits and identifiers are collected here so that the REST API, the CLI and the
//! core services agree on them.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "nuskha.db";

/// Default model requested from the remote text-generation API.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// Default timeout for the remote text-generation API, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 15;

/// Upper bound for the remote text-generation API timeout, in seconds.
pub const MAX_AI_TIMEOUT_SECS: u64 = 120;

/// Clinic name printed on PDFs when none is configured.
pub const DEFAULT_CLINIC_NAME: &str = "Nuskha Clinic";

/// Prefix of generated prescription numbers (`RX-YYYYMMDD-XXXXXX`).
pub const PRESCRIPTION_NUMBER_PREFIX: &str = "RX";

pub const DEFAULT_LIST_LIMIT: u32 = 20;
pub const MAX_LIST_LIMIT: u32 = 100;

pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;
pub const MAX_AUTOCOMPLETE_LIMIT: usize = 50;

/// Maximum number of diagnosis suggestions returned by symptom analysis.
pub const MAX_DIAGNOSIS_SUGGESTIONS: usize = 5;

pub const MAX_PATIENT_AGE: u32 = 150;

/// Number of diagnoses reported in prescription statistics.
pub const TOP_DIAGNOSES_COUNT: usize = 5;
