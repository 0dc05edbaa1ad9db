use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use super::{duplicate_name, ExerciseStore, StoreError, EXERCISE_NOT_FOUND};
use crate::models::{Exercise, Group, NewExercise, PopulatedExercise, WorkoutSummary};

const EXERCISE_COLUMNS: &str = "id, name, description, reps, sets";

#[derive(Debug, FromRow)]
struct ExerciseRow {
    id: i64,
    name: String,
    description: Option<String>,
    reps: Option<i32>,
    sets: Option<i32>,
}

impl ExerciseRow {
    fn into_exercise(self, groups: Vec<i64>) -> Exercise {
        Exercise {
            id: self.id,
            name: self.name,
            description: self.description,
            reps: self.reps,
            sets: self.sets,
            groups,
        }
    }
}

/// A related row tagged with the exercise it was joined through.
#[derive(Debug, FromRow)]
struct RelatedRow {
    exercise_id: i64,
    id: i64,
    name: String,
}

/// Exercise store backed by the `exercises` table and its join tables.
#[derive(Clone)]
pub struct PgExerciseStore {
    db: PgPool,
}

impl PgExerciseStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn populate(&self, rows: Vec<ExerciseRow>) -> Result<Vec<PopulatedExercise>, StoreError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let group_rows = sqlx::query_as::<_, RelatedRow>(
            r#"
            SELECT eg.exercise_id, g.id, g.name
            FROM exercise_groups eg
            JOIN groups g ON g.id = eg.group_id
            WHERE eg.exercise_id = ANY($1)
            ORDER BY g.id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.db)
        .await?;

        let workout_rows = sqlx::query_as::<_, RelatedRow>(
            r#"
            SELECT we.exercise_id, w.id, w.name
            FROM workout_exercises we
            JOIN workouts w ON w.id = we.workout_id
            WHERE we.exercise_id = ANY($1)
            ORDER BY w.id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.db)
        .await?;

        let mut groups: HashMap<i64, Vec<Group>> = HashMap::new();
        for row in group_rows {
            groups.entry(row.exercise_id).or_default().push(Group {
                id: row.id,
                name: row.name,
            });
        }

        let mut workouts: HashMap<i64, Vec<WorkoutSummary>> = HashMap::new();
        for row in workout_rows {
            workouts.entry(row.exercise_id).or_default().push(WorkoutSummary {
                id: row.id,
                name: row.name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let exercise_groups = groups.remove(&row.id).unwrap_or_default();
                let exercise_workouts = workouts.remove(&row.id).unwrap_or_default();
                let group_ids = exercise_groups.iter().map(|g| g.id).collect();
                PopulatedExercise::new(row.into_exercise(group_ids), exercise_groups, exercise_workouts)
            })
            .collect())
    }

    async fn link_groups(
        tx: &mut Transaction<'_, Postgres>,
        exercise_id: i64,
        groups: &[i64],
    ) -> Result<(), sqlx::Error> {
        if groups.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO exercise_groups (exercise_id, group_id) SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(exercise_id)
        .bind(groups)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Map constraint violations to integrity errors; everything else is a
/// database failure.
fn classify(err: sqlx::Error, exercise: &NewExercise) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return duplicate_name(&exercise.name);
        }
        if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
            return StoreError::Integrity(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl ExerciseStore for PgExerciseStore {
    async fn list_populated(&self) -> Result<Vec<PopulatedExercise>, StoreError> {
        let rows = sqlx::query_as::<_, ExerciseRow>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await?;

        self.populate(rows).await
    }

    async fn find(&self, id: i64) -> Result<Exercise, StoreError> {
        let row = sqlx::query_as::<_, ExerciseRow>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))?;

        let groups = sqlx::query_scalar::<_, i64>(
            "SELECT group_id FROM exercise_groups WHERE exercise_id = $1 ORDER BY group_id",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(row.into_exercise(groups))
    }

    async fn find_populated(&self, id: i64) -> Result<PopulatedExercise, StoreError> {
        let row = sqlx::query_as::<_, ExerciseRow>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))?;

        self.populate(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))
    }

    async fn create(&self, exercise: &NewExercise) -> Result<Exercise, StoreError> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ExerciseRow>(&format!(
            r#"
            INSERT INTO exercises (name, description, reps, sets, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(exercise.reps)
        .bind(exercise.sets)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, exercise))?;

        Self::link_groups(&mut tx, row.id, &exercise.groups)
            .await
            .map_err(|e| classify(e, exercise))?;

        tx.commit().await?;

        Ok(row.into_exercise(exercise.groups.clone()))
    }

    async fn update(&self, id: i64, exercise: &NewExercise) -> Result<Exercise, StoreError> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ExerciseRow>(&format!(
            r#"
            UPDATE exercises
            SET name = $2, description = $3, reps = $4, sets = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(exercise.reps)
        .bind(exercise.sets)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, exercise))?
        .ok_or_else(|| StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()))?;

        sqlx::query("DELETE FROM exercise_groups WHERE exercise_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::link_groups(&mut tx, id, &exercise.groups)
            .await
            .map_err(|e| classify(e, exercise))?;

        tx.commit().await?;

        Ok(row.into_exercise(exercise.groups.clone()))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(EXERCISE_NOT_FOUND.to_string()));
        }

        Ok(())
    }

    async fn ensure_group(&self, name: &str) -> Result<Group, StoreError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(group)
    }
}
