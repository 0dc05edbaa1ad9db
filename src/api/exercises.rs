use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use super::errors::ApiError;
use crate::auth::{AuthUser, JwtService};
use crate::models::{Exercise, PopulatedExercise};
use crate::services::ExerciseService;

#[derive(Clone)]
pub struct ExercisesAppState {
    pub exercise_service: ExerciseService,
    pub jwt_service: JwtService,
}

impl FromRef<ExercisesAppState> for JwtService {
    fn from_ref(state: &ExercisesAppState) -> Self {
        state.jwt_service.clone()
    }
}

type ExerciseId = WithRejection<Path<i64>, ApiError>;
type ExerciseBody = WithRejection<Json<Value>, ApiError>;

pub fn exercise_routes(exercise_service: ExerciseService, jwt_service: JwtService) -> Router {
    let shared_state = ExercisesAppState {
        exercise_service,
        jwt_service,
    };

    Router::new()
        .route("/exercises/", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/:id/",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .with_state(shared_state)
}

/// List every exercise with its groups and workouts
pub async fn list_exercises(
    State(state): State<ExercisesAppState>,
) -> Result<Json<Vec<PopulatedExercise>>, ApiError> {
    let exercises = state.exercise_service.list().await?;
    Ok(Json(exercises))
}

/// Create an exercise
pub async fn create_exercise(
    State(state): State<ExercisesAppState>,
    user: AuthUser,
    WithRejection(Json(payload), _): ExerciseBody,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    tracing::debug!(subject = %user.subject, "create exercise");
    let exercise = state.exercise_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Get a single exercise with its groups and workouts
pub async fn get_exercise(
    State(state): State<ExercisesAppState>,
    WithRejection(Path(id), _): ExerciseId,
) -> Result<Json<PopulatedExercise>, ApiError> {
    let exercise = state.exercise_service.read(id).await?;
    Ok(Json(exercise))
}

/// Replace an exercise
///
/// A body that fails to parse is only reported once the exercise is known
/// to exist.
pub async fn update_exercise(
    State(state): State<ExercisesAppState>,
    user: AuthUser,
    WithRejection(Path(id), _): ExerciseId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    tracing::debug!(subject = %user.subject, exercise_id = id, "replace exercise");
    let payload = body.map(|Json(payload)| payload).map_err(ApiError::from);
    let exercise = state.exercise_service.update(id, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(exercise)))
}

/// Delete an exercise
pub async fn delete_exercise(
    State(state): State<ExercisesAppState>,
    user: AuthUser,
    WithRejection(Path(id), _): ExerciseId,
) -> Result<StatusCode, ApiError> {
    tracing::debug!(subject = %user.subject, exercise_id = id, "delete exercise");
    state.exercise_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
