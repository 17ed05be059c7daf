//! Wire types for the Nuskha APIs.
//!
//! These are plain serde structs with OpenAPI schemas. `nuskha-core` reads and writes them
//! directly so that the REST layer only has to map errors to status codes.
//!
//! Optional narrative fields are `Option<String>`; blank strings submitted by the UI are
//! normalised to `None` by core before they are stored.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

// ============================================================================
// PRESCRIPTIONS
// ============================================================================

/// Vital signs captured during the visit. Values are free text (e.g. `120/80`, `37.5`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Vitals {
    pub blood_pressure: Option<String>,
    pub pulse_rate: Option<String>,
    pub temperature: Option<String>,
    pub respiratory_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.blood_pressure.is_none()
            && self.pulse_rate.is_none()
            && self.temperature.is_none()
            && self.respiratory_rate.is_none()
            && self.oxygen_saturation.is_none()
            && self.weight.is_none()
            && self.height.is_none()
    }
}

/// One medicine line as submitted by a form or stored in a preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MedicineInput {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub route: Option<String>,
    pub quantity: Option<String>,
    pub instructions: Option<String>,
}

/// A stored medicine line attached to a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Medicine {
    pub id: String,
    pub prescription_id: String,
    pub position: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub route: Option<String>,
    pub quantity: Option<String>,
    pub instructions: Option<String>,
}

/// Create/update request body for a prescription.
///
/// `patient_name` and `diagnosis` default to empty so that a missing field is reported as a
/// validation error rather than a deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PrescriptionInput {
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_address: Option<String>,
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub past_medical_history: Option<String>,
    pub allergies: Option<String>,
    pub physical_examination: Option<String>,
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
    pub vitals: Vitals,
    pub doctor_name: Option<String>,
    /// Visit date as `YYYY-MM-DD`. Defaults to today when absent.
    pub prescription_date: Option<String>,
    pub medicines: Vec<MedicineInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Prescription {
    pub id: String,
    pub prescription_number: String,
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_address: Option<String>,
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub past_medical_history: Option<String>,
    pub allergies: Option<String>,
    pub physical_examination: Option<String>,
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
    pub vitals: Vitals,
    pub doctor_name: Option<String>,
    pub prescription_date: String,
    pub created_at: String,
    pub updated_at: String,
    pub medicines: Vec<Medicine>,
}

/// Row shown in prescription listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionSummary {
    pub id: String,
    pub prescription_number: String,
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub diagnosis: String,
    pub prescription_date: String,
    pub medicine_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPrescriptionsQuery {
    /// Substring matched against patient name, diagnosis and prescription number.
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListPrescriptionsRes {
    pub items: Vec<PrescriptionSummary>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisCount {
    pub diagnosis: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionStats {
    pub total_prescriptions: i64,
    pub prescriptions_today: i64,
    pub total_medicines: i64,
    pub top_diagnoses: Vec<DiagnosisCount>,
}

// ============================================================================
// PRESETS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PresetInput {
    pub name: String,
    pub diagnosis: Option<String>,
    pub medicines: Vec<MedicineInput>,
}

/// A saved, reusable medicine regimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub diagnosis: Option<String>,
    pub medicines: Vec<MedicineInput>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListPresetsRes {
    pub presets: Vec<Preset>,
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnalyzeSymptomsReq {
    pub symptoms: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisSuggestion {
    /// Dari name of the condition.
    pub name: String,
    pub name_en: Option<String>,
    pub icd_code: Option<String>,
    /// Heuristic score in `0.0..=1.0`.
    pub confidence: f32,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicineSuggestion {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// Static keyword dictionary.
    Local,
    /// Remote text-generation API.
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymptomAnalysisRes {
    pub diagnoses: Vec<DiagnosisSuggestion>,
    pub medications: Vec<MedicineSuggestion>,
    pub recommendations: Vec<String>,
    pub source: SuggestionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AutocompleteField {
    Diagnosis,
    Medicine,
    Symptom,
    Frequency,
    Route,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutocompleteQuery {
    pub field: AutocompleteField,
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AutocompleteRes {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MedicinesForDiagnosisReq {
    pub diagnosis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicinesForDiagnosisRes {
    pub medicines: Vec<MedicineSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescription_input_tolerates_missing_fields() {
        let input: PrescriptionInput =
            serde_json::from_str(r#"{"patient_name": "مریم", "vitals": {"temperature": "38"}}"#)
                .unwrap();
        assert_eq!(input.patient_name, "مریم");
        assert_eq!(input.diagnosis, "");
        assert_eq!(input.vitals.temperature.as_deref(), Some("38"));
        assert!(input.medicines.is_empty());
    }

    #[test]
    fn suggestion_source_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&SuggestionSource::Ai).unwrap(),
            "\"ai\""
        );
        let field: AutocompleteField = serde_json::from_str("\"medicine\"").unwrap();
        assert_eq!(field, AutocompleteField::Medicine);
    }

    #[test]
    fn vitals_is_empty_only_when_all_absent() {
        assert!(Vitals::default().is_empty());
        let vitals = Vitals {
            weight: Some("70".into()),
            ..Vitals::default()
        };
        assert!(!vitals.is_empty());
    }
}
