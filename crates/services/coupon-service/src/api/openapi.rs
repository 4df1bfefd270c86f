//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use domain::{
    AccountResponse, AdministratorProfile, ClientProfile, Coupon, CouponPage, EmployeeProfile,
    EnterpriseProfile, EnterpriseSummary, GeneratedOffer, Profile, Role,
};

use crate::api::handlers::{account_handler, coupon_handler, offer_handler};
use crate::service::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coupon Marketplace",
        version = "0.1.0",
        description = "Coupon publishing, purchase and point-of-sale redemption"
    ),
    paths(
        account_handler::login,
        account_handler::register_client,
        account_handler::register_enterprise,
        account_handler::register_employee,
        account_handler::client_profile,
        coupon_handler::list_coupons,
        coupon_handler::list_by_category,
        coupon_handler::get_coupon,
        coupon_handler::create_coupon,
        coupon_handler::update_coupon,
        coupon_handler::buy_coupon,
        offer_handler::list_user_offers,
        offer_handler::get_offer,
        offer_handler::redeem_offer,
    ),
    components(
        schemas(
            Role,
            Profile,
            ClientProfile,
            EmployeeProfile,
            EnterpriseProfile,
            AdministratorProfile,
            AccountResponse,
            EnterpriseSummary,
            Coupon,
            CouponPage,
            GeneratedOffer,
            TokenResponse,
            account_handler::LoginRequest,
            account_handler::RegisterClientRequest,
            account_handler::RegisterEnterpriseRequest,
            account_handler::RegisterEmployeeRequest,
            coupon_handler::CouponRequest,
            coupon_handler::CouponDetailResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Registration, login and profiles"),
        (name = "Coupons", description = "Coupon catalogue and purchase"),
        (name = "Offers", description = "Purchased offers and redemption")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
