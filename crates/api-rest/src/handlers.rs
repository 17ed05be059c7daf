//! HTTP handlers.
//!
//! Each handler calls one core service method and maps the result. Errors are logged and
//! turned into a status code with a generic Dari message; internal error text never reaches
//! the client. Undecodable requests are answered the same way by the extractors in
//! [`crate::extract`].

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::AppState;
use api_shared::{dto, messages, HealthService};
use nuskha_core::PrescriptionError;

type ApiError = (StatusCode, &'static str);

/// Maps a core error to a status code and localised message.
///
/// `not_found` is the message used for [`PrescriptionError::NotFound`].
fn error_response(e: PrescriptionError, not_found: &'static str) -> ApiError {
    let response = match &e {
        PrescriptionError::MissingRequiredField(field) => (
            StatusCode::BAD_REQUEST,
            match *field {
                "symptoms" => messages::SYMPTOMS_REQUIRED,
                "name" => messages::PRESET_NAME_REQUIRED,
                _ => messages::REQUIRED_FIELDS,
            },
        ),
        PrescriptionError::InvalidInput(_) | PrescriptionError::Text(_) => {
            (StatusCode::BAD_REQUEST, messages::INVALID_INPUT)
        }
        PrescriptionError::InvalidId(_) => (StatusCode::BAD_REQUEST, messages::INVALID_ID),
        PrescriptionError::NotFound { .. } => (StatusCode::NOT_FOUND, not_found),
        PrescriptionError::Pdf(_) | PrescriptionError::FontRead(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, messages::PDF_FAILED)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, messages::INTERNAL_ERROR),
    };
    tracing::error!("request failed ({}): {e}", response.0);
    response
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<dto::HealthRes> {
    Json(HealthService::check_health())
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/ai/analyze",
    request_body = dto::AnalyzeSymptomsReq,
    responses(
        (status = 200, description = "Suggested diagnoses and medicines", body = dto::SymptomAnalysisRes),
        (status = 400, description = "Symptoms missing")
    )
)]
/// Analyse free-text symptoms
///
/// Uses the remote AI when configured and falls back to the local dictionary on any
/// remote failure, so only a blank symptom text is an error.
#[axum::debug_handler]
pub(crate) async fn analyze_symptoms(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<dto::AnalyzeSymptomsReq>,
) -> Result<Json<dto::SymptomAnalysisRes>, ApiError> {
    state
        .services
        .suggestions
        .analyze(&req)
        .await
        .map(Json)
        .map_err(|e| error_response(e, messages::INTERNAL_ERROR))
}

#[utoipa::path(
    get,
    path = "/api/ai/autocomplete",
    params(dto::AutocompleteQuery),
    responses(
        (status = 200, description = "Completions for the field", body = dto::AutocompleteRes),
        (status = 400, description = "Unknown field")
    )
)]
#[axum::debug_handler]
pub(crate) async fn autocomplete(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<dto::AutocompleteQuery>,
) -> Json<dto::AutocompleteRes> {
    let suggestions = state
        .services
        .suggestions
        .autocomplete(query.field, &query.q, query.limit);
    Json(dto::AutocompleteRes { suggestions })
}

#[utoipa::path(
    post,
    path = "/api/ai/medicines",
    request_body = dto::MedicinesForDiagnosisReq,
    responses(
        (status = 200, description = "Medicines usually prescribed for the diagnosis", body = dto::MedicinesForDiagnosisRes),
        (status = 400, description = "Diagnosis missing")
    )
)]
#[axum::debug_handler]
pub(crate) async fn medicines_for_diagnosis(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<dto::MedicinesForDiagnosisReq>,
) -> Result<Json<dto::MedicinesForDiagnosisRes>, ApiError> {
    match state.services.suggestions.medicines_for_diagnosis(&req.diagnosis) {
        Ok(medicines) => Ok(Json(dto::MedicinesForDiagnosisRes { medicines })),
        Err(PrescriptionError::MissingRequiredField(_)) => {
            Err((StatusCode::BAD_REQUEST, messages::DIAGNOSIS_REQUIRED))
        }
        Err(e) => Err(error_response(e, messages::INTERNAL_ERROR)),
    }
}

// ============================================================================
// PRESCRIPTIONS
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/prescriptions",
    params(dto::ListPrescriptionsQuery),
    responses(
        (status = 200, description = "Page of prescriptions, newest first", body = dto::ListPrescriptionsRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_prescriptions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<dto::ListPrescriptionsQuery>,
) -> Result<Json<dto::ListPrescriptionsRes>, ApiError> {
    state
        .services
        .prescriptions
        .list(query)
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))
}

#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = dto::PrescriptionInput,
    responses(
        (status = 201, description = "Prescription created", body = dto::Prescription),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a prescription
///
/// Patient name and diagnosis are required. Medicine rows without a name are ignored.
#[axum::debug_handler]
pub(crate) async fn create_prescription(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<dto::PrescriptionInput>,
) -> Result<(StatusCode, Json<dto::Prescription>), ApiError> {
    match state.services.prescriptions.create(input) {
        Ok(prescription) => Ok((StatusCode::CREATED, Json(prescription))),
        Err(e) => Err(error_response(e, messages::PRESCRIPTION_NOT_FOUND)),
    }
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/stats",
    responses(
        (status = 200, description = "Prescription counts", body = dto::PrescriptionStats),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn prescription_stats(
    State(state): State<AppState>,
) -> Result<Json<dto::PrescriptionStats>, ApiError> {
    state
        .services
        .prescriptions
        .stats()
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/{id}",
    params(("id" = String, Path, description = "Prescription id (32 hex characters)")),
    responses(
        (status = 200, description = "Prescription with medicines", body = dto::Prescription),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_prescription(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<dto::Prescription>, ApiError> {
    state
        .services
        .prescriptions
        .get(&id)
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))
}

#[utoipa::path(
    put,
    path = "/api/prescriptions/{id}",
    params(("id" = String, Path, description = "Prescription id (32 hex characters)")),
    request_body = dto::PrescriptionInput,
    responses(
        (status = 200, description = "Prescription updated", body = dto::Prescription),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Not found")
    )
)]
/// Replace a prescription
///
/// All fields and the full medicine list are replaced; the number and creation time are kept.
#[axum::debug_handler]
pub(crate) async fn update_prescription(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(input): JsonBody<dto::PrescriptionInput>,
) -> Result<Json<dto::Prescription>, ApiError> {
    state
        .services
        .prescriptions
        .update(&id, input)
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))
}

#[utoipa::path(
    delete,
    path = "/api/prescriptions/{id}",
    params(("id" = String, Path, description = "Prescription id (32 hex characters)")),
    responses(
        (status = 204, description = "Prescription deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_prescription(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .prescriptions
        .delete(&id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/{id}/pdf",
    params(("id" = String, Path, description = "Prescription id (32 hex characters)")),
    responses(
        (status = 200, description = "Printable prescription (application/pdf)"),
        (status = 404, description = "Not found"),
        (status = 500, description = "PDF rendering failed")
    )
)]
/// Download a prescription as PDF
#[axum::debug_handler]
pub(crate) async fn prescription_pdf(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<impl IntoResponse, ApiError> {
    let pdf = state
        .services
        .prescriptions
        .render_pdf(&id)
        .map_err(|e| error_response(e, messages::PRESCRIPTION_NOT_FOUND))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.filename),
        ),
    ];
    Ok((headers, pdf.bytes))
}

// ============================================================================
// PRESETS
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/presets",
    responses(
        (status = 200, description = "All presets by name", body = dto::ListPresetsRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_presets(
    State(state): State<AppState>,
) -> Result<Json<dto::ListPresetsRes>, ApiError> {
    state
        .services
        .presets
        .list()
        .map(|presets| Json(dto::ListPresetsRes { presets }))
        .map_err(|e| error_response(e, messages::PRESET_NOT_FOUND))
}

#[utoipa::path(
    post,
    path = "/api/presets",
    request_body = dto::PresetInput,
    responses(
        (status = 201, description = "Preset created", body = dto::Preset),
        (status = 400, description = "Missing or invalid fields")
    )
)]
#[axum::debug_handler]
pub(crate) async fn create_preset(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<dto::PresetInput>,
) -> Result<(StatusCode, Json<dto::Preset>), ApiError> {
    match state.services.presets.create(input) {
        Ok(preset) => Ok((StatusCode::CREATED, Json(preset))),
        Err(e) => Err(error_response(e, messages::PRESET_NOT_FOUND)),
    }
}

#[utoipa::path(
    get,
    path = "/api/presets/{id}",
    params(("id" = String, Path, description = "Preset id (32 hex characters)")),
    responses(
        (status = 200, description = "Preset", body = dto::Preset),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_preset(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<dto::Preset>, ApiError> {
    state
        .services
        .presets
        .get(&id)
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESET_NOT_FOUND))
}

#[utoipa::path(
    put,
    path = "/api/presets/{id}",
    params(("id" = String, Path, description = "Preset id (32 hex characters)")),
    request_body = dto::PresetInput,
    responses(
        (status = 200, description = "Preset updated", body = dto::Preset),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn update_preset(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(input): JsonBody<dto::PresetInput>,
) -> Result<Json<dto::Preset>, ApiError> {
    state
        .services
        .presets
        .update(&id, input)
        .map(Json)
        .map_err(|e| error_response(e, messages::PRESET_NOT_FOUND))
}

#[utoipa::path(
    delete,
    path = "/api/presets/{id}",
    params(("id" = String, Path, description = "Preset id (32 hex characters)")),
    responses(
        (status = 204, description = "Preset deleted"),
        (status = 404, description = "Not found")
    )
)]
#[axum::debug_handler]
pub(crate) async fn delete_preset(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .presets
        .delete(&id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| error_response(e, messages::PRESET_NOT_FOUND))
}
