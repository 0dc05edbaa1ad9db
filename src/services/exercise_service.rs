use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::errors::ApiError;
use crate::models::{validate_exercise, Exercise, PopulatedExercise};
use crate::store::ExerciseStore;

/// Exercise workflows: validate, hit the store once, report the outcome.
#[derive(Clone)]
pub struct ExerciseService {
    store: Arc<dyn ExerciseStore>,
}

impl ExerciseService {
    pub fn new(store: Arc<dyn ExerciseStore>) -> Self {
        Self { store }
    }

    /// Shared lookup for the item operations. A missing record is a `NotFound`.
    pub async fn get_exercise(&self, id: i64) -> Result<Exercise, ApiError> {
        Ok(self.store.find(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<PopulatedExercise>, ApiError> {
        Ok(self.store.list_populated().await?)
    }

    pub async fn read(&self, id: i64) -> Result<PopulatedExercise, ApiError> {
        let exercise = self.get_exercise(id).await?;
        Ok(self.store.find_populated(exercise.id).await?)
    }

    pub async fn create(&self, payload: Value) -> Result<Exercise, ApiError> {
        let exercise = validate_exercise(payload).map_err(|failure| {
            warn!("Rejected exercise payload: {}", failure);
            ApiError::from(failure)
        })?;

        let created = self.store.create(&exercise).await?;
        info!(exercise_id = created.id, name = %created.name, "Created exercise");

        Ok(created)
    }

    /// Full replacement: the payload is validated as a complete record.
    ///
    /// `payload` is the already-decoded request body; a decoding error is
    /// surfaced only after the lookup succeeds.
    pub async fn update(
        &self,
        id: i64,
        payload: Result<Value, ApiError>,
    ) -> Result<Exercise, ApiError> {
        let existing = self.get_exercise(id).await?;

        let replacement = validate_exercise(payload?).map_err(|failure| {
            warn!(exercise_id = existing.id, "Rejected exercise replacement: {}", failure);
            ApiError::from(failure)
        })?;

        let updated = self.store.update(existing.id, &replacement).await?;
        info!(exercise_id = updated.id, "Updated exercise");

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let existing = self.get_exercise(id).await?;

        self.store.delete(existing.id).await?;
        info!(exercise_id = existing.id, "Deleted exercise");

        Ok(())
    }
}
