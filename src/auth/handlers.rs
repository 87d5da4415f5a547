use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::password;
use crate::auth::repo::User;
use crate::db::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public projection of a user, answered on "who am I" queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/user", get(current_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.username.is_empty() || payload.full_name.is_empty() || payload.role.is_empty() {
        return Err(ApiError::InvalidInput("Please enter all fields".into()));
    }

    // Policy check comes before any hashing or storage.
    if !password::is_strong(&payload.password) {
        warn!(username = %payload.username, "weak password rejected");
        return Err(ApiError::InvalidInput(
            "Password must be at least 8 characters long and include uppercase, lowercase, number, and special character".into(),
        ));
    }

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = password::hash_password(&payload.password)?;

    // The unique constraint backstops a concurrent registration that slipped
    // past the pre-check.
    let user = User::create(
        &state.db,
        &payload.username,
        &hash,
        &payload.full_name,
        &payload.role,
    )
    .await
    .map_err(|e| ApiError::from_db(e, "User already exists"))?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username, &user.role)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown username and wrong password produce the identical outcome so
    // the response cannot be used to enumerate accounts.
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let ok = password::verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(username = %payload.username, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username, &user.role)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<CurrentUser>, ApiError> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(CurrentUser {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: user.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_user_serializes_camel_case() {
        let me = CurrentUser {
            id: 3,
            username: "admin1".into(),
            full_name: "Admin One".into(),
            role: "admin".into(),
        };
        let json = serde_json::to_string(&me).unwrap();
        assert!(json.contains("\"fullName\":\"Admin One\""));
        assert!(json.contains("\"username\":\"admin1\""));
    }

    #[test]
    fn register_request_defaults_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"username":"a"}"#).unwrap();
        assert_eq!(req.username, "a");
        assert!(req.password.is_empty());
        assert!(req.full_name.is_empty());
    }
}
