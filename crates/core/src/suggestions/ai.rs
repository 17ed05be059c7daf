//! Client for an OpenAI-compatible chat-completions endpoint.
//!
//! The model is asked to answer with a single JSON object. Anything else (transport errors,
//! non-2xx responses, prose around the JSON, an empty diagnosis list) is reported as an error
//! and the caller falls back to the local dictionary.

use crate::config::AiConfig;
use crate::{PrescriptionError, PrescriptionResult};
use api_shared::dto::{
    DiagnosisSuggestion, MedicineSuggestion, SuggestionSource, SymptomAnalysisRes,
};
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are a clinical decision-support assistant for doctors in \
Afghanistan. Reply with ONLY a JSON object of the form \
{\"diagnoses\":[{\"name\":\"<Dari name>\",\"name_en\":\"<English name>\",\"icd_code\":\"<ICD-10>\",\"confidence\":0.0}],\
\"medications\":[{\"name\":\"<generic name>\",\"dosage\":\"\",\"frequency\":\"<Dari>\",\"route\":\"<Dari>\",\"duration\":\"<Dari>\",\"instructions\":\"<Dari>\"}],\
\"recommendations\":[\"<Dari>\"]}. At most 5 diagnoses.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AiAnalysis {
    #[serde(default)]
    diagnoses: Vec<AiDiagnosis>,
    #[serde(default)]
    medications: Vec<MedicineSuggestion>,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Deserialize)]
struct AiDiagnosis {
    name: String,
    #[serde(default)]
    name_en: Option<String>,
    #[serde(default)]
    icd_code: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct AiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn new(cfg: &AiConfig) -> PrescriptionResult<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            client,
            api_url: cfg.api_url().to_string(),
            api_key: cfg.api_key().map(str::to_string),
            model: cfg.model().to_string(),
        })
    }

    /// Asks the remote model for diagnoses and medications.
    ///
    /// # Errors
    ///
    /// [`PrescriptionError::AiRequest`] for transport failures and non-2xx statuses,
    /// [`PrescriptionError::AiResponse`] when the reply holds no usable JSON analysis.
    pub async fn analyze(
        &self,
        symptoms: &str,
        patient_age: Option<u32>,
        patient_gender: Option<&str>,
    ) -> PrescriptionResult<SymptomAnalysisRes> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(symptoms, patient_age, patient_gender),
                },
            ],
            temperature: 0.2,
        };

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PrescriptionError::AiResponse("no message content".into()))?;

        parse_analysis(&content)
    }
}

fn user_prompt(symptoms: &str, patient_age: Option<u32>, patient_gender: Option<&str>) -> String {
    let mut prompt = format!("Symptoms: {symptoms}");
    if let Some(age) = patient_age {
        prompt.push_str(&format!("\nAge: {age}"));
    }
    if let Some(gender) = patient_gender {
        prompt.push_str(&format!("\nGender: {gender}"));
    }
    prompt
}

/// Extracts the outermost `{...}` object from a model reply.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn parse_analysis(content: &str) -> PrescriptionResult<SymptomAnalysisRes> {
    let json = extract_json_object(content)
        .ok_or_else(|| PrescriptionError::AiResponse("reply contains no JSON object".into()))?;
    let analysis: AiAnalysis =
        serde_json::from_str(json).map_err(PrescriptionError::Deserialization)?;

    let diagnoses: Vec<DiagnosisSuggestion> = analysis
        .diagnoses
        .into_iter()
        .filter(|d| !d.name.trim().is_empty())
        .map(|d| DiagnosisSuggestion {
            name: d.name.trim().to_string(),
            name_en: d.name_en,
            icd_code: d.icd_code,
            confidence: d.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
            matched_keywords: Vec::new(),
        })
        .collect();

    if diagnoses.is_empty() {
        return Err(PrescriptionError::AiResponse("no diagnoses in reply".into()));
    }

    Ok(SymptomAnalysisRes {
        diagnoses,
        medications: analysis
            .medications
            .into_iter()
            .filter(|m| !m.name.trim().is_empty())
            .collect(),
        recommendations: analysis.recommendations,
        source: SuggestionSource::Ai,
    })
}
