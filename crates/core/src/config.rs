//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Core never reads environment variables itself; the binaries do
//! that and hand the parsed values to the constructors here.

use crate::constants::{DEFAULT_AI_TIMEOUT_SECS, MAX_AI_TIMEOUT_SECS};
use crate::{PrescriptionError, PrescriptionResult};
use nuskha_types::{normalize_optional, NonEmptyText};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connection settings for the optional remote text-generation API.
#[derive(Clone, Debug)]
pub struct AiConfig {
    api_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl AiConfig {
    /// Create a new `AiConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PrescriptionError::InvalidInput` if the URL is not http(s), the model is blank,
    /// or the timeout is outside `1..=MAX_AI_TIMEOUT_SECS`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: String,
        timeout_secs: u64,
    ) -> PrescriptionResult<Self> {
        let api_url = api_url.trim().to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(PrescriptionError::InvalidInput(
                "AI API URL must start with http:// or https://".into(),
            ));
        }
        if model.trim().is_empty() {
            return Err(PrescriptionError::InvalidInput(
                "AI model cannot be empty".into(),
            ));
        }
        if !(1..=MAX_AI_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(PrescriptionError::InvalidInput(format!(
                "AI timeout must be between 1 and {} seconds",
                MAX_AI_TIMEOUT_SECS
            )));
        }

        Ok(Self {
            api_url,
            api_key: normalize_optional(api_key),
            model: model.trim().to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Clinic details printed in the PDF header.
#[derive(Clone, Debug)]
pub struct ClinicInfo {
    pub name: NonEmptyText,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl ClinicInfo {
    pub fn new(
        name: impl AsRef<str>,
        address: Option<String>,
        phone: Option<String>,
    ) -> PrescriptionResult<Self> {
        Ok(Self {
            name: NonEmptyText::new(name)?,
            address: normalize_optional(address),
            phone: normalize_optional(phone),
        })
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    ai: Option<AiConfig>,
    pdf_font_path: Option<PathBuf>,
    clinic: ClinicInfo,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// A configured PDF font must point at an existing file; this is checked here so that a
    /// typo in the environment fails at startup instead of on the first PDF request.
    pub fn new(
        database_path: PathBuf,
        ai: Option<AiConfig>,
        pdf_font_path: Option<PathBuf>,
        clinic: ClinicInfo,
    ) -> PrescriptionResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(PrescriptionError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        if let Some(font) = &pdf_font_path {
            if !font.is_file() {
                return Err(PrescriptionError::InvalidInput(format!(
                    "PDF font file does not exist: {}",
                    font.display()
                )));
            }
        }

        Ok(Self {
            database_path,
            ai,
            pdf_font_path,
            clinic,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn ai(&self) -> Option<&AiConfig> {
        self.ai.as_ref()
    }

    pub fn pdf_font_path(&self) -> Option<&Path> {
        self.pdf_font_path.as_deref()
    }

    pub fn clinic(&self) -> &ClinicInfo {
        &self.clinic
    }
}

/// Parse the AI timeout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn ai_timeout_from_env_value(value: Option<String>) -> PrescriptionResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_AI_TIMEOUT_SECS),
        Some(v) => v.parse::<u64>().map_err(|_| {
            PrescriptionError::InvalidInput(format!("invalid AI timeout seconds: {v}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn clinic() -> ClinicInfo {
        ClinicInfo::new("شفاخانه امید", Some("کابل".into()), Some("  ".into())).unwrap()
    }

    #[test]
    fn ai_config_rejects_non_http_url() {
        let err = AiConfig::new("ftp://example.com".into(), None, "m".into(), 10).unwrap_err();
        assert!(matches!(err, PrescriptionError::InvalidInput(_)));
    }

    #[test]
    fn ai_config_rejects_out_of_range_timeout() {
        assert!(AiConfig::new("http://localhost".into(), None, "m".into(), 0).is_err());
        assert!(AiConfig::new(
            "http://localhost".into(),
            None,
            "m".into(),
            MAX_AI_TIMEOUT_SECS + 1
        )
        .is_err());
    }

    #[test]
    fn ai_config_drops_blank_key() {
        let cfg = AiConfig::new(
            " https://api.example.com/v1/chat/completions ".into(),
            Some("".into()),
            "gpt".into(),
            5,
        )
        .unwrap();
        assert_eq!(cfg.api_url(), "https://api.example.com/v1/chat/completions");
        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn clinic_info_normalises_optional_fields() {
        let clinic = clinic();
        assert_eq!(clinic.name.as_str(), "شفاخانه امید");
        assert_eq!(clinic.address.as_deref(), Some("کابل"));
        assert_eq!(clinic.phone, None);
        assert!(ClinicInfo::new(" ", None, None).is_err());
    }

    #[test]
    fn core_config_requires_existing_font() {
        let err = CoreConfig::new(
            PathBuf::from("nuskha.db"),
            None,
            Some(PathBuf::from("/definitely/not/here.ttf")),
            clinic(),
        )
        .unwrap_err();
        assert!(matches!(err, PrescriptionError::InvalidInput(_)));

        let font = NamedTempFile::new().unwrap();
        let cfg = CoreConfig::new(
            PathBuf::from("nuskha.db"),
            None,
            Some(font.path().to_path_buf()),
            clinic(),
        )
        .unwrap();
        assert_eq!(cfg.pdf_font_path(), Some(font.path()));
    }

    #[test]
    fn ai_timeout_parsing() {
        assert_eq!(
            ai_timeout_from_env_value(None).unwrap(),
            DEFAULT_AI_TIMEOUT_SECS
        );
        assert_eq!(
            ai_timeout_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_AI_TIMEOUT_SECS
        );
        assert_eq!(ai_timeout_from_env_value(Some("30".into())).unwrap(), 30);
        assert!(ai_timeout_from_env_value(Some("soon".into())).is_err());
    }
}
