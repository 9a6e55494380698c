use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::models::User;
use crate::AppState;

// Стоимость bcrypt как в оригинальном сервисе
const BCRYPT_COST: u32 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize, Validate)]
struct CredentialsRequest {
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(length(min = 6))]
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

// POST /api/signup
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    req.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    let password_hash = bcrypt::hash(&req.password, BCRYPT_COST).map_err(|e| {
        tracing::error!("bcrypt hash error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to register user" })),
        )
    })?;

    let res = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&req.username)
        .bind(&password_hash)
        .execute(&state.db.pool)
        .await;

    match res {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully!" })),
        )),
        // Дубликат username - единственная ожидаемая ошибка
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Username already exists" })),
        )),
        Err(e) => {
            tracing::error!("signup sql error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to register user" })),
            ))
        }
    }
}

// POST /api/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let invalid = || {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid credentials" })),
        )
    };

    let user = User::find_by_username(&req.username, &state.db)
        .await
        .map_err(|e| {
            tracing::error!("login sql error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to log in" })),
            )
        })?
        .ok_or_else(invalid)?;

    if !user.verify_password(&req.password) {
        return Err(invalid());
    }

    let token = crate::middleware::issue_token(
        user.id,
        &state.config.jwt.secret,
        state.config.jwt.expires_in_hours,
    )
    .map_err(|e| {
        tracing::error!("token issue error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to log in" })),
        )
    })?;

    Ok((StatusCode::OK, Json(LoginResponse { token })))
}
