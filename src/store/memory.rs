use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{duplicate_name, missing_group, ExerciseStore, StoreError, EXERCISE_NOT_FOUND};
use crate::models::{Exercise, Group, NewExercise, PopulatedExercise, WorkoutSummary};

#[derive(Debug, Default)]
struct State {
    exercises: BTreeMap<i64, Exercise>,
    groups: BTreeMap<i64, Group>,
    workouts: BTreeMap<i64, StoredWorkout>,
    next_exercise_id: i64,
    next_group_id: i64,
    next_workout_id: i64,
}

#[derive(Debug, Clone)]
struct StoredWorkout {
    name: String,
    exercises: BTreeSet<i64>,
}

impl State {
    fn check(&self, exercise: &NewExercise, current: Option<i64>) -> Result<(), StoreError> {
        let taken = self
            .exercises
            .values()
            .any(|e| e.name == exercise.name && Some(e.id) != current);
        if taken {
            return Err(duplicate_name(&exercise.name));
        }

        match exercise.groups.iter().find(|id| !self.groups.contains_key(*id)) {
            Some(id) => Err(missing_group(*id)),
            None => Ok(()),
        }
    }

    fn populate(&self, exercise: &Exercise) -> PopulatedExercise {
        let mut group_ids = exercise.groups.clone();
        group_ids.sort_unstable();
        let groups = group_ids
            .iter()
            .filter_map(|id| self.groups.get(id).cloned())
            .collect();

        let workouts = self
            .workouts
            .iter()
            .filter(|(_, w)| w.exercises.contains(&exercise.id))
            .map(|(id, w)| WorkoutSummary {
                id: *id,
                name: w.name.clone(),
            })
            .collect();

        PopulatedExercise::new(exercise.clone(), groups, workouts)
    }
}

/// Process-local exercise store.
///
/// Ids grow monotonically and are never reused after a delete.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExerciseStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workout referencing the given exercises, returning its id.
    /// Workouts are otherwise managed outside this service.
    pub async fn add_workout(&self, name: &str, exercise_ids: &[i64]) -> Result<i64, StoreError> {
        let mut state = self.state.write().await;
        if let Some(id) = exercise_ids.iter().find(|id| !state.exercises.contains_key(*id)) {
            return Err(StoreError::Integrity(format!(
                "Invalid pk \"{id}\" - exercise does not exist."
            )));
        }

        state.next_workout_id += 1;
        let id = state.next_workout_id;
        state.workouts.insert(
            id,
            StoredWorkout {
                name: name.to_string(),
                exercises: exercise_ids.iter().copied().collect(),
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl ExerciseStore for InMemoryExerciseStore {
    async fn list_populated(&self) -> Result<Vec<PopulatedExercise>, StoreError> {
        let state = self.state.read().await;
        Ok(state.exercises.values().map(|e| state.populate(e)).collect())
    }

    async fn find(&self, id: i64) -> Result<Exercise, StoreError> {
        let state = self.state.read().await;
        state
            .exercises
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))
    }

    async fn find_populated(&self, id: i64) -> Result<PopulatedExercise, StoreError> {
        let state = self.state.read().await;
        state
            .exercises
            .get(&id)
            .map(|e| state.populate(e))
            .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))
    }

    async fn create(&self, exercise: &NewExercise) -> Result<Exercise, StoreError> {
        let mut state = self.state.write().await;
        state.check(exercise, None)?;

        state.next_exercise_id += 1;
        let created = Exercise::from_new(state.next_exercise_id, exercise.clone());
        state.exercises.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, exercise: &NewExercise) -> Result<Exercise, StoreError> {
        let mut state = self.state.write().await;
        if !state.exercises.contains_key(&id) {
            return Err(StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()));
        }
        state.check(exercise, Some(id))?;

        let updated = Exercise::from_new(id, exercise.clone());
        state.exercises.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.exercises.remove(&id).is_none() {
            return Err(StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()));
        }
        for workout in state.workouts.values_mut() {
            workout.exercises.remove(&id);
        }
        Ok(())
    }

    async fn ensure_group(&self, name: &str) -> Result<Group, StoreError> {
        let mut state = self.state.write().await;
        if let Some(group) = state.groups.values().find(|g| g.name == name) {
            return Ok(group.clone());
        }

        state.next_group_id += 1;
        let group = Group {
            id: state.next_group_id,
            name: name.to_string(),
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }
}
