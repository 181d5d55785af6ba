//! JWT Authentication Middleware
//!
//! Resolves the calling identity for every protected request. A token is only
//! accepted when it is a valid access token and its subject still exists in the
//! `users` table.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::UserRepository, models::User, utils::error::ErrorResponse, AppState};

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// JWT ID (unique identifier for this token)
    pub jti: String,
    /// Token type (access or refresh)
    #[serde(default = "default_token_type")]
    pub token_type: TokenType,
}

fn default_token_type() -> TokenType {
    TokenType::Access
}

/// Token type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
}

/// Authenticated caller, as resolved from the token and the users table
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl AuthUser {
    /// Get the user ID
    pub fn user_id(&self) -> Uuid {
        self.id
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Extractor for AuthUser from request extensions
///
/// This allows using AuthUser as a handler parameter after auth middleware has run.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("unauthorized", "Authentication required")),
            )
        })
    }
}

/// Create a new JWT access token
pub fn create_access_token(
    user_id: &Uuid,
    email: &str,
    name: Option<&str>,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.map(str::to_string),
        iat: now.timestamp(),
        exp: exp.timestamp(),
        nbf: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<TokenData<Claims>, AuthError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenExpired,
    InvalidTokenType,
    /// Token is valid but its subject is not a known user
    UnknownUser,
    /// The user store could not be queried
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing authentication token",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid authentication token",
            ),
            AuthError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication token has expired",
            ),
            AuthError::InvalidTokenType => {
                (StatusCode::UNAUTHORIZED, "unauthorized", "Invalid token type")
            }
            AuthError::UnknownUser => (StatusCode::UNAUTHORIZED, "unauthorized", "Unknown user"),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to resolve session",
            ),
        };

        (status, Json(ErrorResponse::new(error, message))).into_response()
    }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

/// Authentication middleware
///
/// Validates the bearer token, loads the user it names and injects the
/// resulting [`AuthUser`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)
        .and_then(|header| extract_bearer_token(header).ok_or(AuthError::InvalidToken))?;

    let token_data = validate_token(token, &state.config.auth.jwt_secret)?;
    if token_data.claims.token_type != TokenType::Access {
        return Err(AuthError::InvalidTokenType);
    }

    let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

    let user = UserRepository::new(&state.db)
        .get_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve session user: {:#}", e);
            AuthError::Unavailable
        })?
        .ok_or_else(|| {
            tracing::debug!(user_id = %user_id, "Token subject does not exist");
            AuthError::UnknownUser
        })?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}
