//! Prescription management.
//!
//! [`PrescriptionService`] validates form input, assigns identifiers, numbers and timestamps,
//! and delegates storage to [`crate::db::prescriptions`]. It also renders stored
//! prescriptions to PDF.

use crate::constants::{
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, PRESCRIPTION_NUMBER_PREFIX, TOP_DIAGNOSES_COUNT,
};
use crate::db::{prescriptions as repo, Database};
use crate::pdf::PdfRenderer;
use crate::validation::{validate_prescription, validate_record_id, ValidPrescription};
use crate::{PrescriptionError, PrescriptionResult};
use api_shared::dto::{
    ListPrescriptionsQuery, ListPrescriptionsRes, Medicine, Prescription, PrescriptionInput,
    PrescriptionStats,
};
use chrono::{Local, NaiveDate, NaiveTime, SecondsFormat, Utc};
use nuskha_types::normalize_optional;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Attempts at allocating an unused id/number pair before giving up.
const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// A rendered prescription document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedPdf {
    /// Writes the document into `dir` under its own filename and returns the full path.
    pub fn write_to(&self, dir: &Path) -> PrescriptionResult<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(PrescriptionError::FileWrite)?;
        Ok(path)
    }
}

#[derive(Clone)]
pub struct PrescriptionService {
    db: Arc<Database>,
    pdf: Arc<PdfRenderer>,
}

impl PrescriptionService {
    pub fn new(db: Arc<Database>, pdf: Arc<PdfRenderer>) -> Self {
        Self { db, pdf }
    }
}

impl PrescriptionService {
    /// Creates a prescription with its medicines.
    ///
    /// The prescription receives a fresh id and a number of the form `RX-YYYYMMDD-XXXXXX`
    /// based on today's date. Medicines keep their submitted order.
    ///
    /// # Errors
    ///
    /// Returns a `PrescriptionError` if:
    /// - the input fails validation (blank patient name or diagnosis, bad age or date),
    /// - no unused id/number could be allocated,
    /// - the database write fails.
    pub fn create(&self, input: PrescriptionInput) -> PrescriptionResult<Prescription> {
        let today = Local::now().date_naive();
        let valid = validate_prescription(input, today)?;
        let now = timestamp();

        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let prescription = assemble(
                new_record_id(),
                prescription_number(today),
                &valid,
                now.clone(),
                now.clone(),
            );

            match self
                .db
                .with_conn(|conn| repo::insert_prescription(conn, &prescription))
            {
                Ok(()) => {
                    tracing::info!(
                        "created prescription {} ({})",
                        prescription.prescription_number,
                        prescription.id
                    );
                    return Ok(prescription);
                }
                Err(PrescriptionError::Database(rusqlite::Error::SqliteFailure(e, _)))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    tracing::warn!("prescription id/number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(PrescriptionError::InvalidInput(format!(
            "could not allocate a prescription number after {MAX_ALLOCATION_ATTEMPTS} attempts"
        )))
    }

    /// Fetches one prescription with its medicines.
    pub fn get(&self, id: &str) -> PrescriptionResult<Prescription> {
        validate_record_id(id)?;
        self.db
            .with_conn(|conn| repo::get_prescription(conn, id))?
            .ok_or_else(|| not_found(id))
    }

    /// Lists prescriptions, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_LIST_LIMIT`] and is clamped to `1..=MAX_LIST_LIMIT`.
    /// A blank search term lists everything.
    pub fn list(&self, query: ListPrescriptionsQuery) -> PrescriptionResult<ListPrescriptionsRes> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = query.offset.unwrap_or(0);
        let search = normalize_optional(query.search);

        let (items, total) = self.db.with_conn(|conn| {
            repo::list_prescriptions(conn, search.as_deref(), limit, offset)
        })?;

        Ok(ListPrescriptionsRes {
            items,
            total,
            limit,
            offset,
        })
    }

    /// Replaces every field and all medicines of an existing prescription.
    ///
    /// The id, number and creation time are kept; `updated_at` is bumped.
    pub fn update(&self, id: &str, input: PrescriptionInput) -> PrescriptionResult<Prescription> {
        validate_record_id(id)?;
        let valid = validate_prescription(input, Local::now().date_naive())?;

        let updated = self.db.with_conn(|conn| {
            let Some(existing) = repo::get_prescription(conn, id)? else {
                return Ok(None);
            };
            let prescription = assemble(
                existing.id,
                existing.prescription_number,
                &valid,
                existing.created_at,
                timestamp(),
            );
            if repo::update_prescription(conn, &prescription)? {
                Ok(Some(prescription))
            } else {
                Ok(None)
            }
        })?;

        let prescription = updated.ok_or_else(|| not_found(id))?;
        tracing::info!("updated prescription {}", prescription.prescription_number);
        Ok(prescription)
    }

    /// Deletes a prescription and, by cascade, its medicines.
    pub fn delete(&self, id: &str) -> PrescriptionResult<()> {
        validate_record_id(id)?;
        if self.db.with_conn(|conn| repo::delete_prescription(conn, id))? {
            tracing::info!("deleted prescription {id}");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Counts for the dashboard. "Today" means created since local midnight, regardless of
    /// the date written on the prescription.
    pub fn stats(&self) -> PrescriptionResult<PrescriptionStats> {
        let today = Local::now().date_naive();
        let from = local_midnight_utc(today);
        let until = local_midnight_utc(today.succ_opt().unwrap_or(NaiveDate::MAX));
        self.db.with_conn(|conn| {
            repo::prescription_stats(conn, &from, &until, TOP_DIAGNOSES_COUNT)
        })
    }

    /// Renders a stored prescription to PDF.
    pub fn render_pdf(&self, id: &str) -> PrescriptionResult<RenderedPdf> {
        let prescription = self.get(id)?;
        let bytes = self.pdf.render(&prescription)?;
        Ok(RenderedPdf {
            filename: format!("{}.pdf", prescription.prescription_number),
            bytes,
        })
    }
}

fn not_found(id: &str) -> PrescriptionError {
    PrescriptionError::NotFound {
        entity: "prescription",
        id: id.to_string(),
    }
}

/// RFC 3339 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Start of `day` in the local timezone, as a stored UTC timestamp. A midnight skipped by a
/// DST change falls back to UTC midnight.
fn local_midnight_utc(day: NaiveDate) -> String {
    let midnight = day.and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A fresh record id in canonical form (32 lowercase hex characters).
pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `RX-YYYYMMDD-XXXXXX` with six random uppercase hex characters.
fn prescription_number(date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!(
        "{PRESCRIPTION_NUMBER_PREFIX}-{}-{suffix}",
        date.format("%Y%m%d")
    )
}

fn assemble(
    id: String,
    prescription_number: String,
    valid: &ValidPrescription,
    created_at: String,
    updated_at: String,
) -> Prescription {
    let input = &valid.input;
    let medicines = input
        .medicines
        .iter()
        .enumerate()
        .map(|(position, m)| Medicine {
            id: new_record_id(),
            prescription_id: id.clone(),
            position: position as i64,
            name: m.name.clone(),
            dosage: m.dosage.clone(),
            frequency: m.frequency.clone(),
            duration: m.duration.clone(),
            route: m.route.clone(),
            quantity: m.quantity.clone(),
            instructions: m.instructions.clone(),
        })
        .collect();

    Prescription {
        id,
        prescription_number,
        patient_name: valid.patient_name.as_str().to_string(),
        patient_age: input.patient_age,
        patient_gender: input.patient_gender.clone(),
        patient_phone: input.patient_phone.clone(),
        patient_address: input.patient_address.clone(),
        chief_complaint: input.chief_complaint.clone(),
        history_of_present_illness: input.history_of_present_illness.clone(),
        past_medical_history: input.past_medical_history.clone(),
        allergies: input.allergies.clone(),
        physical_examination: input.physical_examination.clone(),
        diagnosis: valid.diagnosis.as_str().to_string(),
        treatment_plan: input.treatment_plan.clone(),
        follow_up: input.follow_up.clone(),
        notes: input.notes.clone(),
        vitals: input.vitals.clone(),
        doctor_name: input.doctor_name.clone(),
        prescription_date: valid.prescription_date.format("%Y-%m-%d").to_string(),
        created_at,
        updated_at,
        medicines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClinicInfo;
    use api_shared::dto::MedicineInput;

    fn service() -> PrescriptionService {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let clinic = ClinicInfo::new("Test Clinic", None, None).unwrap();
        PrescriptionService::new(db, Arc::new(PdfRenderer::new(clinic, None)))
    }

    fn medicine(name: &str) -> MedicineInput {
        MedicineInput {
            name: name.into(),
            dosage: Some("500mg".into()),
            ..MedicineInput::default()
        }
    }

    fn input(name: &str, diagnosis: &str) -> PrescriptionInput {
        PrescriptionInput {
            patient_name: name.into(),
            patient_age: Some(30),
            diagnosis: diagnosis.into(),
            chief_complaint: Some("  ".into()),
            medicines: vec![medicine("Paracetamol"), medicine(""), medicine("Cetirizine")],
            ..PrescriptionInput::default()
        }
    }

    #[test]
    fn create_assigns_identity_and_keeps_medicine_order() {
        let svc = service();
        let created = svc.create(input(" مریم ", "سرماخوردگی")).unwrap();

        assert!(validate_record_id(&created.id).is_ok());
        assert!(created.prescription_number.starts_with("RX-"));
        assert_eq!(created.prescription_number.len(), "RX-20260101-ABCDEF".len());
        assert_eq!(created.patient_name, "مریم");
        assert_eq!(created.chief_complaint, None);
        assert_eq!(created.created_at, created.updated_at);

        let names: Vec<_> = created.medicines.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol", "Cetirizine"]);

        let fetched = svc.get(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn create_rejects_blank_required_fields() {
        let svc = service();
        let err = svc.create(input("   ", "Flu")).unwrap_err();
        assert!(matches!(
            err,
            PrescriptionError::MissingRequiredField("patient_name")
        ));
        let err = svc.create(input("Ali", "")).unwrap_err();
        assert!(matches!(
            err,
            PrescriptionError::MissingRequiredField("diagnosis")
        ));
        assert_eq!(svc.stats().unwrap().total_prescriptions, 0);
    }

    #[test]
    fn get_distinguishes_bad_ids_from_missing_ones() {
        let svc = service();
        assert!(matches!(
            svc.get("not-an-id").unwrap_err(),
            PrescriptionError::InvalidId(_)
        ));
        assert!(matches!(
            svc.get(&"0".repeat(32)).unwrap_err(),
            PrescriptionError::NotFound { .. }
        ));
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let svc = service();
        let created = svc.create(input("Ali", "Flu")).unwrap();

        let mut changed = input("Ali Ahmadi", "Influenza");
        changed.medicines = vec![medicine("Oseltamivir")];
        let updated = svc.update(&created.id, changed).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.prescription_number, created.prescription_number);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.diagnosis, "Influenza");
        assert_eq!(updated.medicines.len(), 1);
        assert_eq!(svc.get(&created.id).unwrap(), updated);

        let missing = svc.update(&"f".repeat(32), input("A", "B")).unwrap_err();
        assert!(matches!(missing, PrescriptionError::NotFound { .. }));
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let svc = service();
        let created = svc.create(input("Ali", "Flu")).unwrap();
        svc.delete(&created.id).unwrap();
        assert!(matches!(
            svc.delete(&created.id).unwrap_err(),
            PrescriptionError::NotFound { .. }
        ));
        assert_eq!(svc.stats().unwrap().total_medicines, 0);
    }

    #[test]
    fn list_clamps_limit_and_searches() {
        let svc = service();
        svc.create(input("Zahra", "Migraine")).unwrap();
        svc.create(input("Karim", "Asthma")).unwrap();

        let all = svc
            .list(ListPrescriptionsQuery {
                search: Some("  ".into()),
                limit: Some(10_000),
                offset: None,
            })
            .unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.limit, MAX_LIST_LIMIT);

        let found = svc
            .list(ListPrescriptionsQuery {
                search: Some("migr".into()),
                ..ListPrescriptionsQuery::default()
            })
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].patient_name, "Zahra");
        assert_eq!(found.limit, DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn stats_count_todays_prescriptions() {
        let svc = service();
        svc.create(input("A", "Flu")).unwrap();
        svc.create(PrescriptionInput {
            prescription_date: Some("2020-01-01".into()),
            ..input("B", "Flu")
        })
        .unwrap();

        let stats = svc.stats().unwrap();
        assert_eq!(stats.total_prescriptions, 2);
        assert_eq!(stats.prescriptions_today, 2);
        assert_eq!(stats.total_medicines, 4);
        assert_eq!(stats.top_diagnoses[0].diagnosis, "Flu");
        assert_eq!(stats.top_diagnoses[0].count, 2);
    }

    #[test]
    fn local_midnight_is_stored_timestamp_form() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 21).unwrap();
        let start = local_midnight_utc(day);
        let end = local_midnight_utc(day.succ_opt().unwrap());
        assert_eq!(start.len(), "2026-03-21T00:00:00.000Z".len());
        assert!(start.ends_with('Z'));
        assert!(start < end);
    }

    #[test]
    fn render_pdf_names_file_after_number() {
        let svc = service();
        let created = svc.create(input("Ali", "Flu")).unwrap();
        let pdf = svc.render_pdf(&created.id).unwrap();
        assert_eq!(pdf.filename, format!("{}.pdf", created.prescription_number));
        assert!(pdf.bytes.starts_with(b"%PDF"));

        let dir = tempfile::tempdir().unwrap();
        let path = pdf.write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), pdf.bytes);
    }

    #[test]
    fn prescription_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let number = prescription_number(date);
        assert!(number.starts_with("RX-20260309-"));
        let suffix = &number["RX-20260309-".len()..];
        assert_eq!(suffix.len(), 6);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }
}
