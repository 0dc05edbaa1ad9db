// Persistence ports for exercises and the backends implementing them

pub mod memory;
pub mod postgres;

pub use memory::InMemoryExerciseStore;
pub use postgres::PgExerciseStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Exercise, Group, NewExercise, PopulatedExercise};

/// Detail carried by a failed lookup.
pub const EXERCISE_NOT_FOUND: &str = "Exercise matching query does not exist.";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness, foreign-key and check constraint violations.
    #[error("{0}")]
    Integrity(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository for exercise records.
///
/// Every method is a single unit of work; create and update either persist
/// the record together with its group membership or nothing at all.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// All exercises ordered by id, with groups and workouts expanded.
    async fn list_populated(&self) -> Result<Vec<PopulatedExercise>, StoreError>;

    /// Returns `Err(StoreError::NotFound)` if the exercise doesn't exist.
    async fn find(&self, id: i64) -> Result<Exercise, StoreError>;

    async fn find_populated(&self, id: i64) -> Result<PopulatedExercise, StoreError>;

    /// Insert a new exercise and return it with its assigned id.
    async fn create(&self, exercise: &NewExercise) -> Result<Exercise, StoreError>;

    /// Replace every field of an existing exercise, group membership included.
    async fn update(&self, id: i64, exercise: &NewExercise) -> Result<Exercise, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Return the group with this name, creating it when missing.
    async fn ensure_group(&self, name: &str) -> Result<Group, StoreError>;
}

pub(crate) fn duplicate_name(name: &str) -> StoreError {
    StoreError::Integrity(format!("exercise with this name already exists: {name}"))
}

pub(crate) fn missing_group(id: i64) -> StoreError {
    StoreError::Integrity(format!("Invalid pk \"{id}\" - group does not exist."))
}
