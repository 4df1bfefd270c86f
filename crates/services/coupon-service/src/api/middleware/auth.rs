//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use common::AppError;
use domain::BEARER_TOKEN_PREFIX;

use crate::api::AppState;
use crate::service::Claims;

/// Authenticated caller extracted from the bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Claims);

/// Verifies the bearer token and injects [`CurrentUser`] into the request
/// extensions. A header without the `Bearer ` prefix counts as missing.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX));

    let claims = state.guard.authenticate(token)?;
    request.extensions_mut().insert(CurrentUser(claims));

    Ok(next.run(request).await)
}
