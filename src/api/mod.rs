use crate::database::{ProfileUpdate, RolesUpdate, User, UserStore};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod error_handler;

pub use error_handler::{ApiError, ErrorMessage};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", get(get_users).post(post_user))
        .route(
            "/users/{id}",
            get(get_user)
                .post(edit_user)
                .put(replace_user)
                .delete(delete_user),
        )
        .route("/users/{id}/roles", get(get_roles).post(edit_roles))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.find_by_identifier(&id).await?))
}

async fn get_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ApiError> {
    Ok(Json(state.store.get_roles(&id).await?))
}

async fn post_user(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(user) = payload?;
    let created = state.store.insert(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.delete_by_identifier(&id).await?))
}

async fn edit_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RolesUpdate>, JsonRejection>,
) -> Result<Json<String>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.store.update_roles(&id, &update.roles).await?))
}

// Partial update: fio and group_number only
async fn edit_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(update) = payload?;
    let user = state
        .store
        .update_profile(&id, &update.fio, &update.group_number)
        .await?;
    Ok(Json(user))
}

async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(replacement) = payload?;
    Ok(Json(state.store.replace_user(&id, replacement).await?))
}
