//! # Nuskha Core
//!
//! Core business logic for the Nuskha prescription service:
//! - prescription and preset storage in SQLite
//! - symptom analysis, medicine suggestions and autocomplete
//! - bilingual PDF rendering
//!
//! **No API concerns**: HTTP servers, request routing and environment handling belong in
//! `api-rest` and the binaries.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod pdf;
pub mod prescription;
pub mod preset;
pub mod suggestions;
pub mod validation;

// Wire types are shared with the API crates and used directly as domain types.
pub use api_shared::dto;

pub use config::{AiConfig, ClinicInfo, CoreConfig};
pub use db::Database;
pub use error::{PrescriptionError, PrescriptionResult};
pub use pdf::PdfRenderer;
pub use prescription::{PrescriptionService, RenderedPdf};
pub use preset::PresetService;
pub use suggestions::SuggestionService;

use std::sync::Arc;

/// Every core service, wired to one database.
#[derive(Clone)]
pub struct Services {
    pub prescriptions: PrescriptionService,
    pub presets: PresetService,
    pub suggestions: SuggestionService,
}

impl Services {
    /// Opens the database, loads the PDF font and builds the AI client described by `cfg`.
    pub fn from_config(cfg: &CoreConfig) -> PrescriptionResult<Self> {
        let db = Arc::new(Database::open(cfg.database_path())?);
        let pdf = Arc::new(PdfRenderer::from_config(cfg)?);
        Ok(Self::new(db, pdf, SuggestionService::from_config(cfg)?))
    }

    pub fn new(db: Arc<Database>, pdf: Arc<PdfRenderer>, suggestions: SuggestionService) -> Self {
        Self {
            prescriptions: PrescriptionService::new(db.clone(), pdf),
            presets: PresetService::new(db),
            suggestions,
        }
    }
}
