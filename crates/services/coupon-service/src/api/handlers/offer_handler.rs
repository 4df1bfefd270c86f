//! Generated offer handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use common::AppResult;
use domain::GeneratedOffer;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// Offer routes. All of them require a bearer token.
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/offers/user/:user_id", get(list_user_offers))
        .route("/offers/:id", get(get_offer))
        .route("/offers/:id/redeem", post(redeem_offer))
}

/// List the offers bought by a client
#[utoipa::path(
    get,
    path = "/offers/user/{user_id}",
    tag = "Offers",
    params(("user_id" = String, Path, description = "Client email")),
    responses(
        (status = 200, description = "Offers, newest first", body = Vec<GeneratedOffer>),
        (status = 403, description = "Caller may not list these offers")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_user_offers(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<GeneratedOffer>>> {
    Ok(Json(state.purchases.list_user_offers(&caller, &user_id).await?))
}

/// Get one offer
#[utoipa::path(
    get,
    path = "/offers/{id}",
    tag = "Offers",
    params(("id" = String, Path, description = "Offer id")),
    responses(
        (status = 200, description = "Offer found", body = GeneratedOffer),
        (status = 403, description = "Caller may not view this offer"),
        (status = 404, description = "Offer not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_offer(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<GeneratedOffer>> {
    Ok(Json(state.purchases.view_offer(&caller, &id).await?))
}

/// Redeem an offer at the point of sale
#[utoipa::path(
    post,
    path = "/offers/{id}/redeem",
    tag = "Offers",
    params(("id" = String, Path, description = "Offer id")),
    responses(
        (status = 200, description = "Offer redeemed", body = GeneratedOffer),
        (status = 403, description = "Caller is not an employee of the issuing enterprise"),
        (status = 404, description = "Offer not found"),
        (status = 409, description = "Offer already redeemed"),
        (status = 410, description = "Offer expired")
    ),
    security(("bearer_auth" = []))
)]
pub async fn redeem_offer(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<GeneratedOffer>> {
    Ok(Json(state.purchases.redeem(&caller, &id).await?))
}
