//! API service routes

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    metrics::MealMetrics,
    models::{
        MealResponse, NewUser, UserListResponse, UserResponse,
        meal::{MealEnvelope, MealListResponse},
    },
    session::{AuthenticatedUser, presented_token},
    state::AppState,
    validation::{CreateUserPayload, MealPayload},
};


/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", get(list_users).post(create_user))
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(meal_metrics))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn meal_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

fn meal_body(body: Result<Json<MealPayload>, JsonRejection>) -> ApiResult<MealPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(true) => "ok",
            _ => "unavailable",
        },
        None => "in-memory",
    };

    Json(json!({
        "status": "ok",
        "service": "diet-api",
        "database": database,
    }))
}

/// Register a user and hand out a session cookie
///
/// A presented token is kept when it is well formed and not yet bound to a
/// user. Otherwise a fresh one is issued, so no token ever maps to two users.
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<CreateUserPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (name, email) = payload.validate()?;

    let mut reusable = presented_token(&jar);
    if let Some(token) = reusable {
        if state.user_repository.session_in_use(token).await? {
            reusable = None;
        }
    }
    let session_id = reusable.unwrap_or_else(Uuid::new_v4);

    let user = state
        .user_repository
        .create(&NewUser {
            name,
            email,
            session_id,
        })
        .await?;
    info!("Registered user {}", user.id);

    let jar = match reusable {
        Some(_) => jar,
        None => jar.add(state.session.cookie(session_id)),
    };

    Ok((StatusCode::CREATED, jar))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.list().await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// List the caller's meals
pub async fn list_meals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let meals = state.meal_repository.list(user.id).await?;

    Ok(Json(MealListResponse {
        meals: meals.into_iter().map(MealResponse::from).collect(),
    }))
}

/// Get one of the caller's meals
pub async fn get_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = meal_id(path)?;

    let meal = state
        .meal_repository
        .find(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(MealEnvelope {
        meal: MealResponse::from(meal),
    }))
}

/// Record a meal
pub async fn create_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<MealPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = meal_body(body)?.validate()?;

    state.meal_repository.create(user.id, &input).await?;

    Ok(StatusCode::CREATED)
}

/// Replace the mutable fields of one of the caller's meals
pub async fn update_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<MealPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = meal_id(path)?;
    let input = meal_body(body)?.validate()?;

    if state.meal_repository.update(user.id, id, &input).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Delete one of the caller's meals
pub async fn delete_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = meal_id(path)?;

    if state.meal_repository.delete(user.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Adherence metrics over the caller's meal history
pub async fn meal_metrics(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let meals = state.meal_repository.list(user.id).await?;

    Ok(Json(MealMetrics::from_history(meals)))
}
