//! Saved medicine regimens.

use crate::db::{presets as repo, Database};
use crate::prescription::{new_record_id, timestamp};
use crate::validation::{validate_preset, validate_record_id};
use crate::{PrescriptionError, PrescriptionResult};
use api_shared::dto::{Preset, PresetInput};
use std::sync::Arc;

#[derive(Clone)]
pub struct PresetService {
    db: Arc<Database>,
}

impl PresetService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All presets, alphabetically by name.
    pub fn list(&self) -> PrescriptionResult<Vec<Preset>> {
        self.db.with_conn(|conn| repo::list_presets(conn))
    }

    pub fn get(&self, id: &str) -> PrescriptionResult<Preset> {
        validate_record_id(id)?;
        self.db
            .with_conn(|conn| repo::get_preset(conn, id))?
            .ok_or_else(|| not_found(id))
    }

    /// # Errors
    ///
    /// [`PrescriptionError::MissingRequiredField`] for a blank name and
    /// [`PrescriptionError::InvalidInput`] for a medicine line without a name.
    pub fn create(&self, input: PresetInput) -> PrescriptionResult<Preset> {
        let valid = validate_preset(input)?;
        let now = timestamp();
        let preset = Preset {
            id: new_record_id(),
            name: valid.name.into_inner(),
            diagnosis: valid.diagnosis,
            medicines: valid.medicines,
            created_at: now.clone(),
            updated_at: now,
        };
        self.db.with_conn(|conn| repo::insert_preset(conn, &preset))?;
        tracing::info!("created preset {} ({})", preset.name, preset.id);
        Ok(preset)
    }

    pub fn update(&self, id: &str, input: PresetInput) -> PrescriptionResult<Preset> {
        validate_record_id(id)?;
        let valid = validate_preset(input)?;

        let updated = self.db.with_conn(|conn| {
            let Some(existing) = repo::get_preset(conn, id)? else {
                return Ok(None);
            };
            let preset = Preset {
                id: existing.id,
                name: valid.name.into_inner(),
                diagnosis: valid.diagnosis,
                medicines: valid.medicines,
                created_at: existing.created_at,
                updated_at: timestamp(),
            };
            if repo::update_preset(conn, &preset)? {
                Ok(Some(preset))
            } else {
                Ok(None)
            }
        })?;

        let preset = updated.ok_or_else(|| not_found(id))?;
        tracing::info!("updated preset {}", preset.id);
        Ok(preset)
    }

    pub fn delete(&self, id: &str) -> PrescriptionResult<()> {
        validate_record_id(id)?;
        if self.db.with_conn(|conn| repo::delete_preset(conn, id))? {
            tracing::info!("deleted preset {id}");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: &str) -> PrescriptionError {
    PrescriptionError::NotFound {
        entity: "preset",
        id: id.to_string(),
    }
}
