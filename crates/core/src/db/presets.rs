use api_shared::dto::{MedicineInput, Preset};
use rusqlite::{params, Connection, OptionalExtension};

use crate::{PrescriptionError, PrescriptionResult};

/// Raw row; medicines are still JSON text.
struct PresetRow {
    id: String,
    name: String,
    diagnosis: Option<String>,
    medicines: String,
    created_at: String,
    updated_at: String,
}

impl PresetRow {
    fn into_preset(self) -> PrescriptionResult<Preset> {
        let medicines: Vec<MedicineInput> =
            serde_json::from_str(&self.medicines).map_err(PrescriptionError::Deserialization)?;
        Ok(Preset {
            id: self.id,
            name: self.name,
            diagnosis: self.diagnosis,
            medicines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PresetRow> {
    Ok(PresetRow {
        id: row.get(0)?,
        name: row.get(1)?,
        diagnosis: row.get(2)?,
        medicines: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn insert_preset(conn: &Connection, preset: &Preset) -> PrescriptionResult<()> {
    let medicines =
        serde_json::to_string(&preset.medicines).map_err(PrescriptionError::Serialization)?;
    conn.execute(
        "INSERT INTO presets (id, name, diagnosis, medicines, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            preset.id,
            preset.name,
            preset.diagnosis,
            medicines,
            preset.created_at,
            preset.updated_at,
        ],
    )?;
    Ok(())
}

/// Returns `false` when no preset with `preset.id` exists. `created_at` is left untouched.
pub fn update_preset(conn: &Connection, preset: &Preset) -> PrescriptionResult<bool> {
    let medicines =
        serde_json::to_string(&preset.medicines).map_err(PrescriptionError::Serialization)?;
    let changed = conn.execute(
        "UPDATE presets SET name = ?2, diagnosis = ?3, medicines = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            preset.id,
            preset.name,
            preset.diagnosis,
            medicines,
            preset.updated_at,
        ],
    )?;
    Ok(changed > 0)
}

pub fn get_preset(conn: &Connection, id: &str) -> PrescriptionResult<Option<Preset>> {
    conn.query_row(
        "SELECT id, name, diagnosis, medicines, created_at, updated_at
         FROM presets WHERE id = ?1",
        params![id],
        map_row,
    )
    .optional()?
    .map(PresetRow::into_preset)
    .transpose()
}

/// All presets, alphabetically by name.
pub fn list_presets(conn: &Connection) -> PrescriptionResult<Vec<Preset>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, diagnosis, medicines, created_at, updated_at
         FROM presets ORDER BY name ASC, created_at ASC",
    )?;
    let rows = stmt
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(PresetRow::into_preset).collect()
}

pub fn delete_preset(conn: &Connection, id: &str) -> PrescriptionResult<bool> {
    let deleted = conn.execute("DELETE FROM presets WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
