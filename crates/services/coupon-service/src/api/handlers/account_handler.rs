//! Registration and login handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{AccountResponse, ClientProfile, EmployeeProfile, EnterpriseProfile, Role};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::{Credentials, TokenResponse};
use crate::types::Created;

/// Client self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "DUI is required"))]
    pub dui: String,
}

/// Enterprise self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEnterpriseRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "contact@atoniosfoods.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    /// Uppercase letters and digits, prefixes every offer id
    #[schema(example = "ATONIOSFOODS")]
    pub enterprise_code: String,
    #[validate(length(min = 1, message = "Enterprise name is required"))]
    pub enterprise_name: String,
    pub schedule_description: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

/// Employee registration request, sent by the employing enterprise
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployeeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "DUI is required"))]
    pub dui: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Role the account was registered with
    pub role: Role,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Public account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/accounts/clients", post(register_client))
        .route("/accounts/enterprises", post(register_enterprise))
}

/// Account routes that require a bearer token
pub fn protected_account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/employees", post(register_employee))
        .route("/users/:user_id/profile", get(client_profile))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .accounts
        .login(payload.role, &payload.email, &payload.password)
        .await?;

    Ok(Json(token))
}

/// Register a client
#[utoipa::path(
    post,
    path = "/accounts/clients",
    tag = "Accounts",
    request_body = RegisterClientRequest,
    responses(
        (status = 201, description = "Client registered", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_client(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterClientRequest>,
) -> AppResult<Created<AccountResponse>> {
    let credentials = Credentials {
        email: payload.email,
        username: payload.username,
        password: payload.password,
    };
    let profile = ClientProfile {
        first_name: payload.first_name,
        last_name: payload.last_name,
        address: payload.address,
        phone_number: payload.phone_number,
        dui: payload.dui,
    };

    let account = state.accounts.register_client(credentials, profile).await?;
    Ok(Created(account.into()))
}

/// Register an enterprise
#[utoipa::path(
    post,
    path = "/accounts/enterprises",
    tag = "Accounts",
    request_body = RegisterEnterpriseRequest,
    responses(
        (status = 201, description = "Enterprise registered", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or enterprise code already registered")
    )
)]
pub async fn register_enterprise(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterEnterpriseRequest>,
) -> AppResult<Created<AccountResponse>> {
    let credentials = Credentials {
        email: payload.email,
        username: payload.username,
        password: payload.password,
    };
    let profile = EnterpriseProfile {
        enterprise_code: payload.enterprise_code,
        enterprise_name: payload.enterprise_name,
        schedule_description: payload.schedule_description,
        location: payload.location,
        phone_number: payload.phone_number,
        category: payload.category,
    };

    let account = state
        .accounts
        .register_enterprise(credentials, profile)
        .await?;
    Ok(Created(account.into()))
}

/// Register an employee of the calling enterprise
#[utoipa::path(
    post,
    path = "/accounts/employees",
    tag = "Accounts",
    request_body = RegisterEmployeeRequest,
    responses(
        (status = 201, description = "Employee registered", body = AccountResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an enterprise"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_employee(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RegisterEmployeeRequest>,
) -> AppResult<Created<AccountResponse>> {
    let credentials = Credentials {
        email: payload.email,
        username: payload.username,
        password: payload.password,
    };
    let profile = EmployeeProfile {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
        dui: payload.dui,
        enterprise_id: caller.sub.clone(),
    };

    let account = state
        .accounts
        .register_employee(&caller, credentials, profile)
        .await?;
    Ok(Created(account.into()))
}

/// Get a client's profile
#[utoipa::path(
    get,
    path = "/users/{user_id}/profile",
    tag = "Accounts",
    params(("user_id" = String, Path, description = "Client email")),
    responses(
        (status = 200, description = "Client profile", body = AccountResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is neither the client nor an administrator"),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn client_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> AppResult<Json<AccountResponse>> {
    Ok(Json(state.accounts.client_profile(&caller, &user_id).await?))
}
