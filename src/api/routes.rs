//! API route configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::handlers::{
    create_link_handler, list_links_handler, list_users_handler, login_handler, me_handler,
    redirect_handler, register_handler, resend_otp_handler, verify_otp_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;

/// Routes mounted under `/api/v1/auth`.
///
/// # Endpoints
///
/// - `POST /register`    - Create an account and email an OTP
/// - `POST /verify`      - Confirm the account with the OTP
/// - `POST /resend-otp`  - Issue a fresh OTP
/// - `POST /login`       - Exchange credentials for an access token
/// - `GET  /me`          - Current account (Bearer)
/// - `GET  /users`       - Paginated account list (Bearer, admin)
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me_handler))
        .route("/users", get(list_users_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    Router::new()
        .route("/register", post(register_handler))
        .route("/verify", post(verify_otp_handler))
        .route("/resend-otp", post(resend_otp_handler))
        .route("/login", post(login_handler))
        .merge(protected)
}

/// Routes mounted under `/api/v1/shortener-link`.
///
/// # Endpoints
///
/// - `POST /`        - Create a short link
/// - `GET  /`        - Paginated link list
/// - `GET  /{code}`  - 301 redirect to the original URL
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links_handler).post(create_link_handler))
        .route("/{code}", get(redirect_handler))
}
