use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Exercise in its write representation: related groups are referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub reps: Option<i32>,
    pub sets: Option<i32>,
    pub groups: Vec<i64>,
}

impl Exercise {
    pub fn from_new(id: i64, exercise: NewExercise) -> Self {
        Self {
            id,
            name: exercise.name,
            description: exercise.description,
            reps: exercise.reps,
            sets: exercise.sets,
            groups: exercise.groups,
        }
    }
}

/// A validated exercise that has not been assigned an id yet.
///
/// Also used as the full replacement on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub reps: Option<i32>,
    pub sets: Option<i32>,
    pub groups: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkoutSummary {
    pub id: i64,
    pub name: String,
}

/// Exercise enriched with its related groups and the workouts it belongs to.
/// Only used for read responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedExercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub reps: Option<i32>,
    pub sets: Option<i32>,
    pub groups: Vec<Group>,
    pub workouts: Vec<WorkoutSummary>,
}

impl PopulatedExercise {
    pub fn new(exercise: Exercise, groups: Vec<Group>, workouts: Vec<WorkoutSummary>) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name,
            description: exercise.description,
            reps: exercise.reps,
            sets: exercise.sets,
            groups,
            workouts,
        }
    }
}
