//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::Role;
use crate::domain::ports::Claims;
use crate::{error::AppError, state::AppState};

/// Authenticates requests with a signed access token.
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the decoded [`Claims`] are stored in request extensions for
/// handlers to pick up with `Extension<Claims>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header is
/// missing, malformed, or the token is invalid or expired.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let claims = st.auth_service.authenticate(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Rejects callers whose token does not carry the admin role.
pub fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.role == Role::Admin.as_str() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Admin role required",
            json!({ "role": claims.role }),
        ))
    }
}
