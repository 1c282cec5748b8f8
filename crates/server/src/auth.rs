//! Seller account endpoints.
//!
//! - `POST /api/auth/register` - create an account, returns a session token
//! - `POST /api/auth/login`    - email or username login
//! - `GET  /api/auth/me`       - profile of the bearer-token holder

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use sellery_core::auth::passwords::{hash_password, verify_password};
use sellery_core::auth::tokens::{TokenClaims, TokenError, TokenSigner};
use sellery_core::domain::user::{User, UserId};
use sellery_db::repositories::{RepositoryError, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AuthState {
    users: Arc<dyn UserRepository>,
    signer: TokenSigner,
    token_ttl_hours: u64,
}

impl AuthState {
    pub fn new(users: Arc<dyn UserRepository>, signer: TokenSigner, token_ttl_hours: u64) -> Self {
        Self { users, signer, token_ttl_hours }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl UserProfile {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.0.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .with_state(state)
}

/// Resolve the `Authorization: Bearer <token>` header into verified
/// claims. Shared by every protected router.
pub fn authenticate(
    headers: &HeaderMap,
    signer: &TokenSigner,
) -> Result<TokenClaims, (StatusCode, Json<ApiError>)> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("Bearer "));

    let Some(header) = header else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("Not authorized, token missing")),
        ));
    };

    let token = &header["Bearer ".len()..];
    signer.verify(token).map_err(|error| {
        let message = match error {
            TokenError::Expired => "Token expired",
            TokenError::Malformed | TokenError::InvalidSignature => "Token invalid",
        };
        (StatusCode::UNAUTHORIZED, Json(ApiError::new(message)))
    })
}

pub(crate) fn repository_error(error: RepositoryError) -> (StatusCode, Json<ApiError>) {
    error!(error = %error, "repository error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("an internal repository error occurred")),
    )
}

async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), (StatusCode, Json<ApiError>)> {
    let username = payload.username.trim();
    let name = payload.name.trim();
    let email = payload.email.trim();
    if username.is_empty() || name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(ApiError::new("Please fill all fields"))));
    }

    let existing = state
        .users
        .find_by_username_or_email(username, email)
        .await
        .map_err(repository_error)?;
    if existing.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Email or username already exists")),
        ));
    }

    let user = User::new(username, name, email, hash_password(&payload.password))
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ApiError::new(error.to_string()))))?;

    state.users.insert(user.clone()).await.map_err(repository_error)?;

    info!(
        event_name = "auth.register.created",
        user_id = %user.id.0,
        "seller account registered"
    );

    let token = state.signer.issue(&user.id, state.token_ttl_hours);
    Ok((StatusCode::CREATED, Json(session_response(&user, token.0))))
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ApiError>)> {
    let login_input = payload
        .email
        .as_deref()
        .or(payload.username.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (Some(login_input), false) = (login_input, payload.password.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Enter email/username and password")),
        ));
    };

    let user = state
        .users
        .find_by_login(login_input)
        .await
        .map_err(repository_error)?
        .ok_or_else(|| (StatusCode::BAD_REQUEST, Json(ApiError::new("User not found"))))?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(
            event_name = "auth.login.rejected",
            user_id = %user.id.0,
            "password verification failed"
        );
        return Err((StatusCode::UNAUTHORIZED, Json(ApiError::new("Invalid password"))));
    }

    let token = state.signer.issue(&user.id, state.token_ttl_hours);
    Ok(Json(session_response(&user, token.0)))
}

async fn me(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, (StatusCode, Json<ApiError>)> {
    let claims = authenticate(&headers, &state.signer)?;

    let user = state
        .users
        .find_by_id(&UserId(claims.sub))
        .await
        .map_err(repository_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(ApiError::new("User not found"))))?;

    Ok(Json(UserProfile::from_user(&user)))
}

fn session_response(user: &User, token: String) -> SessionResponse {
    SessionResponse {
        id: user.id.0.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        token,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
    use axum::Json;
    use sellery_core::auth::tokens::TokenSigner;
    use sellery_db::repositories::InMemoryUserRepository;

    use super::{login, me, register, AuthState, LoginRequest, RegisterRequest};

    fn state() -> AuthState {
        AuthState::new(
            Arc::new(InMemoryUserRepository::default()),
            TokenSigner::new("unit-test-signing-secret".to_string().into()),
            24,
        )
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "ledsone".to_string(),
            name: "LEDSONE Stores".to_string(),
            email: "sales@ledsone.lk".to_string(),
            password: "a-strong-password".to_string(),
        }
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
        );
        headers
    }

    #[tokio::test]
    async fn register_login_me_flow() {
        let state = state();

        let (status, Json(session)) =
            register(State(state.clone()), Json(register_request())).await.expect("register");
        assert_eq!(status, StatusCode::CREATED);
        assert!(session.id.starts_with("U-"));
        assert!(!session.token.is_empty());

        let Json(login_session) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("sales@ledsone.lk".to_string()),
                username: None,
                password: "a-strong-password".to_string(),
            }),
        )
        .await
        .expect("login by email");
        assert_eq!(login_session.id, session.id);

        let Json(profile) = me(State(state), bearer_headers(&login_session.token))
            .await
            .expect("me with valid token");
        assert_eq!(profile.username, "ledsone");
        assert_eq!(profile.email, "sales@ledsone.lk");
    }

    #[tokio::test]
    async fn login_accepts_username_as_login_input() {
        let state = state();
        register(State(state.clone()), Json(register_request())).await.expect("register");

        let result = login(
            State(state),
            Json(LoginRequest {
                email: None,
                username: Some("ledsone".to_string()),
                password: "a-strong-password".to_string(),
            }),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let result = register(
            State(state()),
            Json(RegisterRequest { password: String::new(), ..register_request() }),
        )
        .await;

        let (status, Json(body)) = result.err().expect("missing password should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Please fill all fields");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_or_username() {
        let state = state();
        register(State(state.clone()), Json(register_request())).await.expect("first register");

        let duplicate_email = RegisterRequest {
            username: "other-handle".to_string(),
            ..register_request()
        };
        let (status, Json(body)) = register(State(state), Json(duplicate_email))
            .await
            .err()
            .expect("duplicate email should fail");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Email or username already exists");
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_from_bad_password() {
        let state = state();
        register(State(state.clone()), Json(register_request())).await.expect("register");

        let (unknown_status, _) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("nobody@example.com".to_string()),
                username: None,
                password: "whatever".to_string(),
            }),
        )
        .await
        .err()
        .expect("unknown user should fail");
        assert_eq!(unknown_status, StatusCode::BAD_REQUEST);

        let (bad_password_status, Json(body)) = login(
            State(state),
            Json(LoginRequest {
                email: Some("sales@ledsone.lk".to_string()),
                username: None,
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .err()
        .expect("bad password should fail");
        assert_eq!(bad_password_status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Invalid password");
    }

    #[tokio::test]
    async fn me_requires_a_valid_bearer_token() {
        let state = state();

        let (status, Json(body)) =
            me(State(state.clone()), HeaderMap::new()).await.err().expect("missing token");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Not authorized, token missing");

        let (status, Json(body)) = me(State(state), bearer_headers("not-a-real-token"))
            .await
            .err()
            .expect("bogus token");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Token invalid");
    }
}
