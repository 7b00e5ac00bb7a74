use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{app_error::AppError, app_state::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id of the token holder.
    pub id: i32,
    pub exp: usize,
}

pub fn verify_token(token: &str, key: &DecodingKey) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, key, &Validation::default()).map(|data| data.claims)
}

/// Requires a valid bearer token of an existing user and exposes the
/// caller's user id to handlers as `Extension<i32>`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_token(token, &state.jwt_key).map_err(|err| {
        tracing::debug!(error = %err, "Rejected bearer token");
        AppError::Unauthorized
    })?;

    // Tokens outlive deleted accounts.
    if !state.orders.user_exists(claims.id).await? {
        tracing::debug!(user_id = claims.id, "Bearer token belongs to an unknown user");
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(claims.id);
    Ok(next.run(request).await)
}

#[cfg(test)]
pub fn issue_token(user_id: i32, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        id: user_id,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token should encode")
}
