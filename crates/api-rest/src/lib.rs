//! # API REST
//!
//! REST API implementation for Nuskha.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//! - resolving `CoreConfig` from the environment
//!
//! Uses `api-shared` for wire types and `nuskha-core` for everything else.

#![warn(rust_2018_idioms)]

mod extract;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::dto;
use nuskha_core::config::ai_timeout_from_env_value;
use nuskha_core::constants::{DEFAULT_AI_MODEL, DEFAULT_CLINIC_NAME, DEFAULT_DATABASE_PATH};
use nuskha_core::{AiConfig, ClinicInfo, CoreConfig, Services};

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Opens the database and builds every service from `cfg`.
    pub fn from_config(cfg: &CoreConfig) -> anyhow::Result<Self> {
        Ok(Self::new(Services::from_config(cfg)?))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::analyze_symptoms,
        handlers::autocomplete,
        handlers::medicines_for_diagnosis,
        handlers::list_prescriptions,
        handlers::create_prescription,
        handlers::prescription_stats,
        handlers::get_prescription,
        handlers::update_prescription,
        handlers::delete_prescription,
        handlers::prescription_pdf,
        handlers::list_presets,
        handlers::create_preset,
        handlers::get_preset,
        handlers::update_preset,
        handlers::delete_preset,
    ),
    components(schemas(
        dto::HealthRes,
        dto::Vitals,
        dto::MedicineInput,
        dto::Medicine,
        dto::PrescriptionInput,
        dto::Prescription,
        dto::PrescriptionSummary,
        dto::ListPrescriptionsRes,
        dto::DiagnosisCount,
        dto::PrescriptionStats,
        dto::PresetInput,
        dto::Preset,
        dto::ListPresetsRes,
        dto::AnalyzeSymptomsReq,
        dto::DiagnosisSuggestion,
        dto::MedicineSuggestion,
        dto::SuggestionSource,
        dto::SymptomAnalysisRes,
        dto::AutocompleteField,
        dto::AutocompleteRes,
        dto::MedicinesForDiagnosisReq,
        dto::MedicinesForDiagnosisRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI at `/swagger-ui` and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/ai/analyze", post(handlers::analyze_symptoms))
        .route("/api/ai/autocomplete", get(handlers::autocomplete))
        .route("/api/ai/medicines", post(handlers::medicines_for_diagnosis))
        .route(
            "/api/prescriptions",
            get(handlers::list_prescriptions).post(handlers::create_prescription),
        )
        .route("/api/prescriptions/stats", get(handlers::prescription_stats))
        .route(
            "/api/prescriptions/:id",
            get(handlers::get_prescription)
                .put(handlers::update_prescription)
                .delete(handlers::delete_prescription),
        )
        .route("/api/prescriptions/:id/pdf", get(handlers::prescription_pdf))
        .route(
            "/api/presets",
            get(handlers::list_presets).post(handlers::create_preset),
        )
        .route(
            "/api/presets/:id",
            get(handlers::get_preset)
                .put(handlers::update_preset)
                .delete(handlers::delete_preset),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolves `CoreConfig` from `NUSKHA_*` environment variables.
///
/// # Environment Variables
/// - `NUSKHA_DATABASE_PATH`: SQLite file (default: `nuskha.db`)
/// - `NUSKHA_AI_API_URL`: chat-completions endpoint; unset disables remote suggestions
/// - `NUSKHA_AI_API_KEY`: bearer token for the endpoint
/// - `NUSKHA_AI_MODEL`: model name (default: `gpt-4o-mini`)
/// - `NUSKHA_AI_TIMEOUT_SECS`: request timeout (default: 15)
/// - `NUSKHA_PDF_FONT`: TrueType font with Arabic-script glyphs
/// - `NUSKHA_CLINIC_NAME` / `NUSKHA_CLINIC_ADDRESS` / `NUSKHA_CLINIC_PHONE`: PDF header
///
/// # Errors
/// Returns an error if any value is present but invalid (bad URL or timeout, missing font
/// file, blank clinic name).
pub fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let database_path = env_var("NUSKHA_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

    let ai = match env_var("NUSKHA_AI_API_URL") {
        Some(url) => Some(AiConfig::new(
            url,
            env_var("NUSKHA_AI_API_KEY"),
            env_var("NUSKHA_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.into()),
            ai_timeout_from_env_value(env_var("NUSKHA_AI_TIMEOUT_SECS"))?,
        )?),
        None => None,
    };

    let clinic = ClinicInfo::new(
        env_var("NUSKHA_CLINIC_NAME").unwrap_or_else(|| DEFAULT_CLINIC_NAME.into()),
        env_var("NUSKHA_CLINIC_ADDRESS"),
        env_var("NUSKHA_CLINIC_PHONE"),
    )?;

    let font = env_var("NUSKHA_PDF_FONT").map(PathBuf::from);

    Ok(CoreConfig::new(database_path, ai, font, clinic)?)
}

/// Reads an environment variable, treating blank values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::messages;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use nuskha_core::{Database, PdfRenderer, SuggestionService};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let clinic = ClinicInfo::new("Test Clinic", None, None).unwrap();
        let pdf = Arc::new(PdfRenderer::new(clinic, None));
        router(AppState::new(Services::new(
            db,
            pdf,
            SuggestionService::local(),
        )))
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, req).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn prescription_body(patient: &str, diagnosis: &str) -> Value {
        json!({
            "patient_name": patient,
            "patient_age": 42,
            "diagnosis": diagnosis,
            "vitals": {"blood_pressure": "130/85"},
            "medicines": [
                {"name": "Amlodipine", "dosage": "5mg", "frequency": "روزانه یک بار"},
                {"name": ""},
                {"name": "Aspirin", "dosage": "81mg"}
            ]
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send_json(&app(), request("GET", "/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn prescription_lifecycle() {
        let app = app();

        let (status, created) = send_json(
            &app,
            request(
                "POST",
                "/api/prescriptions",
                Some(prescription_body("کریم", "فشار خون بلند")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["medicines"].as_array().unwrap().len(), 2);
        assert_eq!(created["medicines"][1]["name"], "Aspirin");

        let (status, fetched) =
            send_json(&app, request("GET", &format!("/api/prescriptions/{id}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, list) = send_json(
            &app,
            request("GET", "/api/prescriptions?search=%DA%A9%D8%B1%DB%8C%D9%85", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total"], 1);
        assert_eq!(list["items"][0]["medicine_count"], 2);

        let (status, updated) = send_json(
            &app,
            request(
                "PUT",
                &format!("/api/prescriptions/{id}"),
                Some(prescription_body("کریم", "Hypertension")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["diagnosis"], "Hypertension");
        assert_eq!(updated["prescription_number"], created["prescription_number"]);

        let (status, stats) =
            send_json(&app, request("GET", "/api/prescriptions/stats", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_prescriptions"], 1);
        assert_eq!(stats["total_medicines"], 2);

        let (status, _) = send(
            &app,
            request("DELETE", &format!("/api/prescriptions/{id}"), None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, bytes) =
            send(&app, request("GET", &format!("/api/prescriptions/{id}"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            messages::PRESCRIPTION_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn missing_required_fields_return_localised_400() {
        let (status, bytes) = send(
            &app(),
            request(
                "POST",
                "/api/prescriptions",
                Some(json!({"patient_name": "  ", "diagnosis": "Flu"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::REQUIRED_FIELDS);
    }

    #[tokio::test]
    async fn overlong_text_is_invalid_input() {
        let (status, bytes) = send(
            &app(),
            request(
                "POST",
                "/api/prescriptions",
                Some(json!({"patient_name": "کریم", "diagnosis": "x".repeat(10_001)})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);
    }

    #[tokio::test]
    async fn undecodable_requests_get_localised_400() {
        let app = app();

        let (status, bytes) = send(
            &app,
            request("GET", "/api/ai/autocomplete?field=bogus&q=am", None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);

        let (status, bytes) = send(&app, request("GET", "/api/prescriptions?limit=many", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/prescriptions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{patient_name: "))
            .unwrap();
        let (status, bytes) = send(&app, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/api/ai/analyze")
            .body(Body::from(r#"{"symptoms": "تب"}"#))
            .unwrap();
        let (status, bytes) = send(&app, no_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);

        let (status, bytes) = send(
            &app,
            request("POST", "/api/presets", Some(json!({"name": 7, "medicines": []}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_INPUT);
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let (status, bytes) =
            send(&app(), request("GET", "/api/prescriptions/not-an-id", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::INVALID_ID);
    }

    #[tokio::test]
    async fn pdf_download_has_pdf_headers() {
        let app = app();
        let (_, created) = send_json(
            &app,
            request(
                "POST",
                "/api/prescriptions",
                Some(prescription_body("Ali", "Flu")),
            ),
        )
        .await;
        let id = created["id"].as_str().unwrap();
        let number = created["prescription_number"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/api/prescriptions/{id}/pdf"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(number));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn analyze_uses_local_dictionary() {
        let app = app();
        let (status, body) = send_json(
            &app,
            request(
                "POST",
                "/api/ai/analyze",
                Some(json!({"symptoms": "سرفه و خس خس سینه", "patient_age": 8})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local");
        assert!(!body["diagnoses"].as_array().unwrap().is_empty());

        let (status, bytes) = send(
            &app,
            request("POST", "/api/ai/analyze", Some(json!({"symptoms": ""}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::SYMPTOMS_REQUIRED);
    }

    #[tokio::test]
    async fn autocomplete_and_medicine_suggestions() {
        let app = app();
        let (status, body) = send_json(
            &app,
            request("GET", "/api/ai/autocomplete?field=medicine&q=amo&limit=5", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"][0], "Amoxicillin");

        let (status, body) = send_json(
            &app,
            request(
                "POST",
                "/api/ai/medicines",
                Some(json!({"diagnosis": "Migraine"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["medicines"].as_array().unwrap().is_empty());

        let (status, bytes) = send(
            &app,
            request("POST", "/api/ai/medicines", Some(json!({"diagnosis": " "}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(bytes).unwrap(), messages::DIAGNOSIS_REQUIRED);
    }

    #[tokio::test]
    async fn preset_lifecycle() {
        let app = app();
        let (status, created) = send_json(
            &app,
            request(
                "POST",
                "/api/presets",
                Some(json!({
                    "name": "سرماخوردگی",
                    "medicines": [{"name": "Paracetamol", "dosage": "500mg"}]
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, list) = send_json(&app, request("GET", "/api/presets", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["presets"].as_array().unwrap().len(), 1);

        let (status, updated) = send_json(
            &app,
            request(
                "PUT",
                &format!("/api/presets/{id}"),
                Some(json!({"name": "Cold", "medicines": []})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Cold");

        let (status, bytes) = send(
            &app,
            request("POST", "/api/presets", Some(json!({"name": ""}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            messages::PRESET_NAME_REQUIRED
        );

        let (status, _) = send(&app, request("DELETE", &format!("/api/presets/{id}"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, request("GET", &format!("/api/presets/{id}"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/ai/analyze",
            "/api/prescriptions",
            "/api/prescriptions/{id}/pdf",
            "/api/presets/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
