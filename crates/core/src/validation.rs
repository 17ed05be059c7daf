//! Input validation utilities.
//!
//! Form input is validated and normalised here before it is used by the services:
//! - required text (patient name, diagnosis, preset name) must be non-blank
//! - optional text is trimmed and blank values become `None`
//! - medicine rows without a name are dropped
//! - record identifiers must be canonical 32-character lowercase hex

use crate::constants::MAX_PATIENT_AGE;
use crate::{PrescriptionError, PrescriptionResult};
use api_shared::dto::{MedicineInput, PrescriptionInput, PresetInput, Vitals};
use chrono::NaiveDate;
use nuskha_types::{normalize_optional, NonEmptyText, TextError};

/// Prescription input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPrescription {
    pub patient_name: NonEmptyText,
    pub diagnosis: NonEmptyText,
    pub prescription_date: NaiveDate,
    /// Normalised copy of the submitted input. `patient_name` and `diagnosis` are trimmed.
    pub input: PrescriptionInput,
}

/// Preset input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPreset {
    pub name: NonEmptyText,
    pub diagnosis: Option<String>,
    pub medicines: Vec<MedicineInput>,
}

/// Validates and normalises a prescription form.
///
/// # Arguments
///
/// * `input` - The submitted form.
/// * `today` - Date used when the form carries no prescription date.
///
/// # Errors
///
/// Returns a `PrescriptionError` if:
/// - `patient_name` or `diagnosis` is blank ([`PrescriptionError::MissingRequiredField`]),
/// - either of them exceeds the text length limit ([`PrescriptionError::Text`]),
/// - `patient_age` exceeds [`MAX_PATIENT_AGE`],
/// - `prescription_date` is not `YYYY-MM-DD`.
pub fn validate_prescription(
    input: PrescriptionInput,
    today: NaiveDate,
) -> PrescriptionResult<ValidPrescription> {
    let patient_name = required_text(&input.patient_name, "patient_name")?;
    let diagnosis = required_text(&input.diagnosis, "diagnosis")?;

    if let Some(age) = input.patient_age {
        if age > MAX_PATIENT_AGE {
            return Err(PrescriptionError::InvalidInput(format!(
                "patient_age must be at most {MAX_PATIENT_AGE}"
            )));
        }
    }

    let prescription_date = match normalize_optional(input.prescription_date) {
        None => today,
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            PrescriptionError::InvalidInput(format!("invalid prescription_date: {raw}"))
        })?,
    };

    let input = PrescriptionInput {
        patient_name: patient_name.as_str().to_string(),
        patient_age: input.patient_age,
        patient_gender: normalize_optional(input.patient_gender),
        patient_phone: normalize_optional(input.patient_phone),
        patient_address: normalize_optional(input.patient_address),
        chief_complaint: normalize_optional(input.chief_complaint),
        history_of_present_illness: normalize_optional(input.history_of_present_illness),
        past_medical_history: normalize_optional(input.past_medical_history),
        allergies: normalize_optional(input.allergies),
        physical_examination: normalize_optional(input.physical_examination),
        diagnosis: diagnosis.as_str().to_string(),
        treatment_plan: normalize_optional(input.treatment_plan),
        follow_up: normalize_optional(input.follow_up),
        notes: normalize_optional(input.notes),
        vitals: normalize_vitals(input.vitals),
        doctor_name: normalize_optional(input.doctor_name),
        prescription_date: Some(prescription_date.format("%Y-%m-%d").to_string()),
        medicines: normalize_medicines(input.medicines),
    };

    Ok(ValidPrescription {
        patient_name,
        diagnosis,
        prescription_date,
        input,
    })
}

/// Validates and normalises a preset.
///
/// Unlike prescriptions, a preset medicine line with a blank name is an error.
pub fn validate_preset(input: PresetInput) -> PrescriptionResult<ValidPreset> {
    let name = required_text(&input.name, "name")?;

    if input.medicines.iter().any(|m| m.name.trim().is_empty()) {
        return Err(PrescriptionError::InvalidInput(
            "every preset medicine needs a name".into(),
        ));
    }

    Ok(ValidPreset {
        name,
        diagnosis: normalize_optional(input.diagnosis),
        medicines: normalize_medicines(input.medicines),
    })
}

/// A required free-text field. Blank input is reported as the missing `field`; overlong
/// input stays a [`PrescriptionError::Text`] error.
pub fn required_text(value: &str, field: &'static str) -> PrescriptionResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| match e {
        TextError::Empty => PrescriptionError::MissingRequiredField(field),
        other => PrescriptionError::Text(other),
    })
}

/// Validates that a record id is in canonical form (32 lowercase hex characters).
pub fn validate_record_id(id: &str) -> PrescriptionResult<()> {
    let ok = id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if ok {
        Ok(())
    } else {
        Err(PrescriptionError::InvalidId(id.to_string()))
    }
}

fn normalize_vitals(vitals: Vitals) -> Vitals {
    Vitals {
        blood_pressure: normalize_optional(vitals.blood_pressure),
        pulse_rate: normalize_optional(vitals.pulse_rate),
        temperature: normalize_optional(vitals.temperature),
        respiratory_rate: normalize_optional(vitals.respiratory_rate),
        oxygen_saturation: normalize_optional(vitals.oxygen_saturation),
        weight: normalize_optional(vitals.weight),
        height: normalize_optional(vitals.height),
    }
}

fn normalize_medicines(medicines: Vec<MedicineInput>) -> Vec<MedicineInput> {
    medicines
        .into_iter()
        .filter(|m| !m.name.trim().is_empty())
        .map(|m| MedicineInput {
            name: m.name.trim().to_string(),
            dosage: normalize_optional(m.dosage),
            frequency: normalize_optional(m.frequency),
            duration: normalize_optional(m.duration),
            route: normalize_optional(m.route),
            quantity: normalize_optional(m.quantity),
            instructions: normalize_optional(m.instructions),
        })
        .collect()
}
