use axum::{
    extract::{FromRef, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::service::{DeleteOutcome, UpdateOutcome, UserService, UserUpdate};
use crate::{state::AppState, users::UserRecord};

pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/home/users", get(list_users).post(create_user))
        .route(
            "/home/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRecord>>, (StatusCode, String)> {
    let users = UserService::from_ref(&state).load_users().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>, (StatusCode, String)> {
    let user = UserService::from_ref(&state).get_user(id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserRecord>), (StatusCode, String)> {
    let user = UserService::from_ref(&state)
        .create_user(&body.name, &body.email, &body.password)
        .await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/home/users/{}", user.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(user)))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UpdateOutcome>, (StatusCode, String)> {
    let outcome = UserService::from_ref(&state)
        .update_user(
            id,
            UserUpdate {
                name: body.name,
                email: body.email,
                password: body.password,
            },
        )
        .await?;
    Ok(Json(outcome))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteOutcome>, (StatusCode, String)> {
    let outcome = UserService::from_ref(&state).delete_user(id).await?;
    Ok(Json(outcome))
}
