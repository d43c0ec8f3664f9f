//! Handlers for `/api/v1/auth`.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, ResendOtpRequest,
    UserResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::api::dto::response::{ApiResponse, PaginatedResponse};
use crate::api::middleware::auth::require_admin;
use crate::domain::ports::Claims;
use crate::error::AppError;
use crate::query::{QueryParameters, RawQueryMap};
use crate::state::{AppState, USER_SEARCH_COLUMNS};

/// `POST /api/v1/auth/register`
///
/// Creates an unverified account and emails a one-time code.
///
/// ```json
/// { "email": "alice@example.com", "password": "...", "confirm_password": "..." }
/// ```
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::new(
        "User registered successfully, check your email for the OTP code",
        RegisterResponse {
            email: user.email,
            role: user.role.to_string(),
        },
    )))
}

/// `POST /api/v1/auth/verify`
pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<VerifyOtpResponse>>, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .verify_otp(&payload.email, &payload.otp)
        .await?;

    Ok(Json(ApiResponse::new(
        "Account verified successfully",
        VerifyOtpResponse {
            email: user.email,
            verified_at: user.verified_at,
        },
    )))
}

/// `POST /api/v1/auth/resend-otp`
pub async fn resend_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, AppError> {
    payload.validate()?;

    let user = state.auth_service.resend_otp(&payload.email).await?;

    Ok(Json(ApiResponse::new(
        "A new OTP code has been sent",
        RegisterResponse {
            email: user.email,
            role: user.role.to_string(),
        },
    )))
}

/// `POST /api/v1/auth/login`
///
/// Returns an access token for a verified account.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    payload.validate()?;

    let (user, token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::new(
        "Login successful",
        LoginResponse {
            email: user.email,
            role: user.role.to_string(),
            token,
        },
    )))
}

/// `GET /api/v1/auth/me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.auth_service.me(claims.sub).await?;

    Ok(Json(ApiResponse::new(
        "User retrieved successfully",
        UserResponse::from(user),
    )))
}

/// `GET /api/v1/auth/users`
///
/// Admin only. Accepts `search`, `order_by`, `order_dir`, `page`, `page_size`
/// and `role` as an equality filter.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Result<Json<PaginatedResponse<UserResponse>>, AppError> {
    require_admin(&claims)?;

    let raw: RawQueryMap = raw.into_iter().collect();
    let params = QueryParameters::parse(&raw, USER_SEARCH_COLUMNS, &state.default_page_size);
    params.validate(&state.user_policy)?;

    let (users, meta) = state.auth_service.list_users(&params).await?;

    Ok(Json(PaginatedResponse::new(
        "Users retrieved successfully",
        meta,
        users.into_iter().map(UserResponse::from).collect(),
    )))
}
