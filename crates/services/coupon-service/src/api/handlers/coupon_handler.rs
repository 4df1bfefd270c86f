//! Coupon catalogue handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Coupon, CouponDraft, CouponPage, EnterpriseSummary, GeneratedOffer};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::CouponDetail;
use crate::types::Created;

/// Coupon fields sent on create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    /// Required on update and must match the path id. Ignored on create.
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    #[schema(example = "Two pizzas for one")]
    pub title: String,
    #[schema(example = 20.0)]
    pub regular_price: f64,
    #[schema(example = 10.0)]
    pub offer_price: f64,
    /// Defaults to now
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: DateTime<Utc>,
    /// Stock, or `-1` for unlimited
    #[schema(example = 50)]
    pub available_coupons: i32,
    #[validate(length(min = 1, message = "Offer description is required"))]
    pub offer_desc: String,
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "food")]
    pub category: String,
    /// Owning enterprise email. Used only when an administrator writes.
    pub enterprise_id: Option<String>,
}

impl CouponRequest {
    fn into_parts(self) -> (Option<String>, CouponDraft, Option<String>) {
        let draft = CouponDraft {
            title: self.title,
            regular_price: self.regular_price,
            offer_price: self.offer_price,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            available_coupons: self.available_coupons,
            offer_desc: self.offer_desc,
            category: self.category,
        };
        (self.id, draft, self.enterprise_id)
    }
}

/// Listing cursor
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// `next` token from the previous page
    pub next: Option<String>,
}

/// Coupon with its enterprise details
#[derive(Debug, Serialize, ToSchema)]
pub struct CouponDetailResponse {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub enterprise: EnterpriseSummary,
}

impl From<CouponDetail> for CouponDetailResponse {
    fn from(detail: CouponDetail) -> Self {
        Self {
            coupon: detail.coupon,
            enterprise: detail.enterprise,
        }
    }
}

/// Public coupon routes
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/coupons", get(list_coupons))
        .route("/coupons/category/:category", get(list_by_category))
        .route("/coupons/:id", get(get_coupon))
}

/// Coupon routes that require a bearer token
pub fn protected_coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/coupons", post(create_coupon))
        .route("/coupons/:id", put(update_coupon))
        .route("/coupons/:id/buy", post(buy_coupon))
}

/// List coupons, ten per page
#[utoipa::path(
    get,
    path = "/coupons",
    tag = "Coupons",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of coupons", body = CouponPage)
    )
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CouponPage>> {
    Ok(Json(state.coupons.list_all(query.next).await?))
}

/// List every coupon in a category
#[utoipa::path(
    get,
    path = "/coupons/category/{category}",
    tag = "Coupons",
    params(("category" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Coupons in the category", body = Vec<Coupon>)
    )
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Coupon>>> {
    Ok(Json(state.coupons.list_by_category(&category).await?))
}

/// Get a coupon together with its enterprise
#[utoipa::path(
    get,
    path = "/coupons/{id}",
    tag = "Coupons",
    params(("id" = String, Path, description = "Coupon id")),
    responses(
        (status = 200, description = "Coupon found", body = CouponDetailResponse),
        (status = 404, description = "Coupon not found")
    )
)]
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CouponDetailResponse>> {
    let detail = state.coupons.get_with_enterprise(&id).await?;
    Ok(Json(detail.into()))
}

/// Publish a coupon
#[utoipa::path(
    post,
    path = "/coupons",
    tag = "Coupons",
    request_body = CouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = Coupon),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an enterprise or administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CouponRequest>,
) -> AppResult<Created<Coupon>> {
    let (_, draft, enterprise_id) = payload.into_parts();
    let coupon = state.coupons.create(&caller, draft, enterprise_id).await?;
    Ok(Created(coupon))
}

/// Overwrite a coupon
#[utoipa::path(
    put,
    path = "/coupons/{id}",
    tag = "Coupons",
    params(("id" = String, Path, description = "Coupon id")),
    request_body = CouponRequest,
    responses(
        (status = 200, description = "Coupon stored", body = Coupon),
        (status = 400, description = "Validation error or id mismatch"),
        (status = 403, description = "Caller may not write this coupon")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_coupon(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CouponRequest>,
) -> AppResult<Json<Coupon>> {
    let (body_id, draft, enterprise_id) = payload.into_parts();
    let body_id = body_id.ok_or_else(|| AppError::validation("Coupon id is required"))?;

    let coupon = state
        .coupons
        .update(&caller, &id, &body_id, draft, enterprise_id)
        .await?;
    Ok(Json(coupon))
}

/// Buy one unit of a coupon
#[utoipa::path(
    post,
    path = "/coupons/{id}/buy",
    tag = "Coupons",
    params(("id" = String, Path, description = "Coupon id")),
    responses(
        (status = 201, description = "Offer generated", body = GeneratedOffer),
        (status = 403, description = "Caller is not a client"),
        (status = 404, description = "Coupon not found"),
        (status = 409, description = "Coupon sold out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn buy_coupon(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Created<GeneratedOffer>> {
    let offer = state.purchases.buy(&caller, &id).await?;
    Ok(Created(offer))
}
