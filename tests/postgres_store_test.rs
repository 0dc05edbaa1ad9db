use assert_matches::assert_matches;
use serial_test::serial;
use sqlx::PgPool;

use exercises_api::config::{run_migrations, DatabaseConfig};
use exercises_api::models::NewExercise;
use exercises_api::store::{ExerciseStore, PgExerciseStore, StoreError};

/// Connect to the test database, or `None` when it is not available.
async fn test_store() -> Option<(PgExerciseStore, PgPool)> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = match DatabaseConfig::with_url(database_url).connect().await {
        Ok(pool) => pool,
        Err(_) => {
            println!("Test database not available, skipping integration test");
            return None;
        }
    };
    run_migrations(&pool).await.expect("migrations");

    sqlx::query("TRUNCATE workout_exercises, workout_groups, workouts, exercise_groups, exercises, groups RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("truncate");

    Some((PgExerciseStore::new(pool.clone()), pool))
}

fn new_exercise(name: &str, groups: Vec<i64>) -> NewExercise {
    NewExercise {
        name: name.to_string(),
        description: Some("test".to_string()),
        reps: Some(10),
        sets: Some(3),
        groups,
    }
}

#[tokio::test]
#[serial]
async fn test_postgres_store_round_trip() {
    let Some((store, pool)) = test_store().await else {
        return;
    };

    let legs = store.ensure_group("Legs").await.unwrap();
    let core = store.ensure_group("Core").await.unwrap();
    assert_eq!(store.ensure_group("Legs").await.unwrap(), legs);

    let created = store
        .create(&new_exercise("Squat", vec![legs.id]))
        .await
        .unwrap();
    assert_eq!(created.groups, vec![legs.id]);

    let workout_id: i64 = sqlx::query_scalar("INSERT INTO workouts (name) VALUES ('Leg day') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO workout_exercises (workout_id, exercise_id) VALUES ($1, $2)")
        .bind(workout_id)
        .bind(created.id)
        .execute(&pool)
        .await
        .unwrap();

    let populated = store.find_populated(created.id).await.unwrap();
    assert_eq!(populated.groups, vec![legs.clone()]);
    assert_eq!(populated.workouts.len(), 1);

    let updated = store
        .update(created.id, &new_exercise("Front squat", vec![core.id, legs.id]))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(store.find(created.id).await.unwrap().groups, vec![legs.id, core.id]);

    assert_eq!(store.list_populated().await.unwrap().len(), 1);

    store.delete(created.id).await.unwrap();
    assert_matches!(store.find(created.id).await, Err(StoreError::NotFound(_)));
    assert_matches!(store.delete(created.id).await, Err(StoreError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_postgres_store_integrity_errors() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    store.create(&new_exercise("Plank", vec![])).await.unwrap();

    assert_matches!(
        store.create(&new_exercise("Plank", vec![])).await,
        Err(StoreError::Integrity(_))
    );
    assert_matches!(
        store.create(&new_exercise("Row", vec![12345])).await,
        Err(StoreError::Integrity(_))
    );
    // the failed insert rolled back with its links
    assert_eq!(store.list_populated().await.unwrap().len(), 1);
}
