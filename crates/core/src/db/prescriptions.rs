//! Prescription and medicine tables.
//!
//! A prescription row and its medicine rows are always written in one transaction.

use api_shared::dto::{
    DiagnosisCount, Medicine, Prescription, PrescriptionStats, PrescriptionSummary, Vitals,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::PrescriptionResult;

const PRESCRIPTION_COLUMNS: &str = "id, prescription_number, patient_name, patient_age, \
     patient_gender, patient_phone, patient_address, chief_complaint, \
     history_of_present_illness, past_medical_history, allergies, physical_examination, \
     diagnosis, treatment_plan, follow_up, notes, blood_pressure, pulse_rate, temperature, \
     respiratory_rate, oxygen_saturation, weight, height, doctor_name, prescription_date, \
     created_at, updated_at";

/// Inserts a prescription together with its medicines.
pub fn insert_prescription(conn: &mut Connection, p: &Prescription) -> PrescriptionResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        &format!(
            "INSERT INTO prescriptions ({PRESCRIPTION_COLUMNS}) VALUES
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
              ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)"
        ),
        params![
            p.id,
            p.prescription_number,
            p.patient_name,
            p.patient_age,
            p.patient_gender,
            p.patient_phone,
            p.patient_address,
            p.chief_complaint,
            p.history_of_present_illness,
            p.past_medical_history,
            p.allergies,
            p.physical_examination,
            p.diagnosis,
            p.treatment_plan,
            p.follow_up,
            p.notes,
            p.vitals.blood_pressure,
            p.vitals.pulse_rate,
            p.vitals.temperature,
            p.vitals.respiratory_rate,
            p.vitals.oxygen_saturation,
            p.vitals.weight,
            p.vitals.height,
            p.doctor_name,
            p.prescription_date,
            p.created_at,
            p.updated_at,
        ],
    )?;
    insert_medicines(&tx, &p.medicines)?;
    tx.commit()?;
    Ok(())
}

/// Replaces every field of an existing prescription and all of its medicines.
///
/// Returns `false` when no prescription with `p.id` exists.
pub fn update_prescription(conn: &mut Connection, p: &Prescription) -> PrescriptionResult<bool> {
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE prescriptions SET
             patient_name = ?2, patient_age = ?3, patient_gender = ?4, patient_phone = ?5,
             patient_address = ?6, chief_complaint = ?7, history_of_present_illness = ?8,
             past_medical_history = ?9, allergies = ?10, physical_examination = ?11,
             diagnosis = ?12, treatment_plan = ?13, follow_up = ?14, notes = ?15,
             blood_pressure = ?16, pulse_rate = ?17, temperature = ?18,
             respiratory_rate = ?19, oxygen_saturation = ?20, weight = ?21, height = ?22,
             doctor_name = ?23, prescription_date = ?24, updated_at = ?25
         WHERE id = ?1",
        params![
            p.id,
            p.patient_name,
            p.patient_age,
            p.patient_gender,
            p.patient_phone,
            p.patient_address,
            p.chief_complaint,
            p.history_of_present_illness,
            p.past_medical_history,
            p.allergies,
            p.physical_examination,
            p.diagnosis,
            p.treatment_plan,
            p.follow_up,
            p.notes,
            p.vitals.blood_pressure,
            p.vitals.pulse_rate,
            p.vitals.temperature,
            p.vitals.respiratory_rate,
            p.vitals.oxygen_saturation,
            p.vitals.weight,
            p.vitals.height,
            p.doctor_name,
            p.prescription_date,
            p.updated_at,
        ],
    )?;
    if changed == 0 {
        return Ok(false);
    }

    tx.execute(
        "DELETE FROM medicines WHERE prescription_id = ?1",
        params![p.id],
    )?;
    insert_medicines(&tx, &p.medicines)?;
    tx.commit()?;
    Ok(true)
}

fn insert_medicines(tx: &Transaction<'_>, medicines: &[Medicine]) -> PrescriptionResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO medicines (id, prescription_id, position, name, dosage, frequency,
                                duration, route, quantity, instructions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for m in medicines {
        stmt.execute(params![
            m.id,
            m.prescription_id,
            m.position,
            m.name,
            m.dosage,
            m.frequency,
            m.duration,
            m.route,
            m.quantity,
            m.instructions,
        ])?;
    }
    Ok(())
}

pub fn get_prescription(conn: &Connection, id: &str) -> PrescriptionResult<Option<Prescription>> {
    let prescription = conn
        .query_row(
            &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"),
            params![id],
            row_to_prescription,
        )
        .optional()?;

    match prescription {
        Some(mut p) => {
            p.medicines = medicines_for(conn, &p.id)?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

/// Returns `false` when nothing was deleted. Medicines go with the prescription via
/// `ON DELETE CASCADE`.
pub fn delete_prescription(conn: &Connection, id: &str) -> PrescriptionResult<bool> {
    let deleted = conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Lists prescriptions newest first, optionally filtered by a search term.
///
/// Returns the requested page and the total number of matching rows.
pub fn list_prescriptions(
    conn: &Connection,
    search: Option<&str>,
    limit: u32,
    offset: u32,
) -> PrescriptionResult<(Vec<PrescriptionSummary>, i64)> {
    let pattern = search.map(like_pattern);

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM prescriptions p
         WHERE ?1 IS NULL
            OR p.patient_name LIKE ?1 ESCAPE '\\'
            OR p.diagnosis LIKE ?1 ESCAPE '\\'
            OR p.prescription_number LIKE ?1 ESCAPE '\\'",
        params![pattern],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT p.id, p.prescription_number, p.patient_name, p.patient_age, p.diagnosis,
                p.prescription_date, p.created_at,
                (SELECT COUNT(*) FROM medicines m WHERE m.prescription_id = p.id)
         FROM prescriptions p
         WHERE ?1 IS NULL
            OR p.patient_name LIKE ?1 ESCAPE '\\'
            OR p.diagnosis LIKE ?1 ESCAPE '\\'
            OR p.prescription_number LIKE ?1 ESCAPE '\\'
         ORDER BY p.created_at DESC, p.rowid DESC
         LIMIT ?2 OFFSET ?3",
    )?;

    let items = stmt
        .query_map(params![pattern, limit, offset], |row| {
            Ok(PrescriptionSummary {
                id: row.get(0)?,
                prescription_number: row.get(1)?,
                patient_name: row.get(2)?,
                patient_age: row.get(3)?,
                diagnosis: row.get(4)?,
                prescription_date: row.get(5)?,
                created_at: row.get(6)?,
                medicine_count: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((items, total))
}

/// Aggregate counts for the dashboard.
///
/// `created_from..created_until` is the half-open window of `created_at` timestamps that
/// count as "today", in the stored RFC 3339 UTC form.
pub fn prescription_stats(
    conn: &Connection,
    created_from: &str,
    created_until: &str,
    top_n: usize,
) -> PrescriptionResult<PrescriptionStats> {
    let total_prescriptions: i64 =
        conn.query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))?;
    let prescriptions_today: i64 = conn.query_row(
        "SELECT COUNT(*) FROM prescriptions WHERE created_at >= ?1 AND created_at < ?2",
        params![created_from, created_until],
        |row| row.get(0),
    )?;
    let total_medicines: i64 =
        conn.query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))?;

    let mut stmt = conn.prepare(
        "SELECT diagnosis, COUNT(*) AS n FROM prescriptions
         GROUP BY diagnosis
         ORDER BY n DESC, diagnosis ASC
         LIMIT ?1",
    )?;
    let top_diagnoses = stmt
        .query_map(params![top_n as i64], |row| {
            Ok(DiagnosisCount {
                diagnosis: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PrescriptionStats {
        total_prescriptions,
        prescriptions_today,
        total_medicines,
        top_diagnoses,
    })
}

fn medicines_for(conn: &Connection, prescription_id: &str) -> PrescriptionResult<Vec<Medicine>> {
    let mut stmt = conn.prepare(
        "SELECT id, prescription_id, position, name, dosage, frequency, duration, route,
                quantity, instructions
         FROM medicines WHERE prescription_id = ?1
         ORDER BY position ASC",
    )?;
    let medicines = stmt
        .query_map(params![prescription_id], |row| {
            Ok(Medicine {
                id: row.get(0)?,
                prescription_id: row.get(1)?,
                position: row.get(2)?,
                name: row.get(3)?,
                dosage: row.get(4)?,
                frequency: row.get(5)?,
                duration: row.get(6)?,
                route: row.get(7)?,
                quantity: row.get(8)?,
                instructions: row.get(9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(medicines)
}

fn row_to_prescription(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        prescription_number: row.get(1)?,
        patient_name: row.get(2)?,
        patient_age: row.get(3)?,
        patient_gender: row.get(4)?,
        patient_phone: row.get(5)?,
        patient_address: row.get(6)?,
        chief_complaint: row.get(7)?,
        history_of_present_illness: row.get(8)?,
        past_medical_history: row.get(9)?,
        allergies: row.get(10)?,
        physical_examination: row.get(11)?,
        diagnosis: row.get(12)?,
        treatment_plan: row.get(13)?,
        follow_up: row.get(14)?,
        notes: row.get(15)?,
        vitals: Vitals {
            blood_pressure: row.get(16)?,
            pulse_rate: row.get(17)?,
            temperature: row.get(18)?,
            respiratory_rate: row.get(19)?,
            oxygen_saturation: row.get(20)?,
            weight: row.get(21)?,
            height: row.get(22)?,
        },
        doctor_name: row.get(23)?,
        prescription_date: row.get(24)?,
        created_at: row.get(25)?,
        updated_at: row.get(26)?,
        medicines: Vec::new(),
    })
}

/// Builds a `LIKE` pattern that matches `term` literally anywhere in the column.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
