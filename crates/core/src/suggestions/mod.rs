//! Diagnosis and medication suggestions.
//!
//! The local engine is a keyword lookup over static Dari/English dictionaries. When a remote
//! text-generation API is configured it is tried first for symptom analysis; every failure
//! there degrades silently to the local engine.

pub mod ai;
pub mod analysis;
pub mod autocomplete;
pub mod dictionary;
pub mod normalize;

use crate::config::CoreConfig;
use crate::PrescriptionResult;
use ai::AiClient;
use api_shared::dto::{AnalyzeSymptomsReq, AutocompleteField, MedicineSuggestion, SymptomAnalysisRes};
use dictionary::CONDITIONS;
use normalize::normalize;
use crate::validation::required_text;
use nuskha_types::normalize_optional;

pub use analysis::analyze_symptoms;
pub use autocomplete::autocomplete;

#[derive(Clone, Debug, Default)]
pub struct SuggestionService {
    ai: Option<AiClient>,
}

impl SuggestionService {
    /// Local-only suggestions.
    pub fn local() -> Self {
        Self { ai: None }
    }

    pub fn with_ai(ai: AiClient) -> Self {
        Self { ai: Some(ai) }
    }

    /// Builds the service from configuration, enabling the remote API when configured.
    pub fn from_config(cfg: &CoreConfig) -> PrescriptionResult<Self> {
        match cfg.ai() {
            Some(ai_cfg) => {
                tracing::info!("remote AI suggestions enabled ({})", ai_cfg.model());
                Ok(Self::with_ai(AiClient::new(ai_cfg)?))
            }
            None => Ok(Self::local()),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Analyses free-text symptoms.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PrescriptionError::MissingRequiredField`] when `symptoms` is blank. Remote
    /// failures are never returned; they are logged and the local dictionary answers instead.
    pub async fn analyze(&self, req: &AnalyzeSymptomsReq) -> PrescriptionResult<SymptomAnalysisRes> {
        let symptoms = required_text(&req.symptoms, "symptoms")?;
        let gender = normalize_optional(req.patient_gender.clone());

        let local = analyze_symptoms(symptoms.as_str(), req.patient_age, gender.as_deref());

        if let Some(ai) = &self.ai {
            match ai
                .analyze(symptoms.as_str(), req.patient_age, gender.as_deref())
                .await
            {
                Ok(mut remote) => {
                    if remote.medications.is_empty() {
                        remote.medications = local.medications;
                    }
                    if remote.recommendations.is_empty() {
                        remote.recommendations = local.recommendations;
                    }
                    return Ok(remote);
                }
                Err(e) => {
                    tracing::warn!("remote AI analysis failed, using local dictionary: {e}");
                }
            }
        }

        Ok(local)
    }

    /// Medicines typically prescribed for `diagnosis`.
    ///
    /// The diagnosis is matched against the Dari name, English name and ICD code of each
    /// dictionary condition; the first match wins. Unknown diagnoses yield an empty list.
    pub fn medicines_for_diagnosis(
        &self,
        diagnosis: &str,
    ) -> PrescriptionResult<Vec<MedicineSuggestion>> {
        let diagnosis = required_text(diagnosis, "diagnosis")?;
        let query = normalize(diagnosis.as_str());

        let found = CONDITIONS.iter().find(|c| {
            let name = normalize(c.name);
            let name_en = normalize(c.name_en);
            let icd = normalize(c.icd_code);
            query == icd
                || name.contains(&query)
                || query.contains(&name)
                || name_en.contains(&query)
                || query.contains(&name_en)
        });

        Ok(found
            .map(|c| c.medicines.iter().map(|m| m.to_suggestion()).collect())
            .unwrap_or_default())
    }

    pub fn autocomplete(
        &self,
        field: AutocompleteField,
        query: &str,
        limit: Option<usize>,
    ) -> Vec<String> {
        autocomplete(field, query, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::PrescriptionError;
    use api_shared::dto::SuggestionSource;
    use axum::{routing::post, Json, Router};

    fn req(symptoms: &str) -> AnalyzeSymptomsReq {
        AnalyzeSymptomsReq {
            symptoms: symptoms.into(),
            patient_age: Some(40),
            patient_gender: None,
        }
    }

    /// Serves `reply` as the assistant message of a chat-completions response.
    async fn mock_ai(reply: &'static str) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": reply}}]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn client(url: String) -> AiClient {
        let cfg = AiConfig::new(url, Some("test-key".into()), "test-model".into(), 2).unwrap();
        AiClient::new(&cfg).unwrap()
    }

    #[tokio::test]
    async fn blank_symptoms_are_rejected() {
        let err = SuggestionService::local().analyze(&req("  ")).await.unwrap_err();
        assert!(matches!(
            err,
            PrescriptionError::MissingRequiredField("symptoms")
        ));
    }

    #[tokio::test]
    async fn overlong_symptoms_are_a_text_error() {
        let long = "سرفه ".repeat(nuskha_types::MAX_TEXT_CHARS);
        let err = SuggestionService::local().analyze(&req(&long)).await.unwrap_err();
        assert!(matches!(err, PrescriptionError::Text(_)));

        let err = SuggestionService::local()
            .medicines_for_diagnosis(&"x".repeat(nuskha_types::MAX_TEXT_CHARS + 1))
            .unwrap_err();
        assert!(matches!(err, PrescriptionError::Text(_)));
    }

    #[tokio::test]
    async fn local_service_uses_dictionary() {
        let res = SuggestionService::local()
            .analyze(&req("گلودرد و تب"))
            .await
            .unwrap();
        assert_eq!(res.source, SuggestionSource::Local);
        assert!(!res.diagnoses.is_empty());
    }

    #[tokio::test]
    async fn remote_answer_is_used_and_enriched() {
        let url = mock_ai(
            r#"```json
{"diagnoses":[{"name":"آنفلوانزا","name_en":"Influenza","confidence":0.8}]}
```"#,
        )
        .await;
        let service = SuggestionService::with_ai(client(url));

        let res = service.analyze(&req("تب و لرز")).await.unwrap();
        assert_eq!(res.source, SuggestionSource::Ai);
        assert_eq!(res.diagnoses[0].name, "آنفلوانزا");
        assert!(res.medications.iter().any(|m| m.name == "Paracetamol"));
        assert!(!res.recommendations.is_empty());
    }

    #[tokio::test]
    async fn malformed_remote_answer_falls_back() {
        let url = mock_ai("I am not sure, please examine the patient.").await;
        let service = SuggestionService::with_ai(client(url));

        let res = service.analyze(&req("اسهال")).await.unwrap();
        assert_eq!(res.source, SuggestionSource::Local);
        assert_eq!(res.diagnoses[0].name_en.as_deref(), Some("Gastroenteritis"));
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = SuggestionService::with_ai(client(format!("http://{addr}/v1")));
        let res = service.analyze(&req("سرفه")).await.unwrap();
        assert_eq!(res.source, SuggestionSource::Local);
    }

    #[test]
    fn medicines_for_diagnosis_matches_both_languages() {
        let service = SuggestionService::local();

        let dari = service.medicines_for_diagnosis("گاستریت مزمن").unwrap();
        assert_eq!(dari[0].name, "Omeprazole");

        let english = service.medicines_for_diagnosis("hypertension").unwrap();
        assert_eq!(english[0].name, "Amlodipine");

        let icd = service.medicines_for_diagnosis("E11").unwrap();
        assert_eq!(icd[0].name, "Metformin");

        assert!(service
            .medicines_for_diagnosis("rare syndrome")
            .unwrap()
            .is_empty());
        assert!(service.medicines_for_diagnosis(" ").is_err());
    }
}
