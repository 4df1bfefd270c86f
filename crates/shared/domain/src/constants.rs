//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Account Roles
// =============================================================================

/// Customer who buys coupons
pub const ROLE_CLIENT: &str = "client";

/// Enterprise staff member who redeems offers at the point of sale
pub const ROLE_EMPLOYEE: &str = "employee";

/// Business that publishes coupons
pub const ROLE_ENTERPRISE: &str = "enterprise";

/// Platform administrator
pub const ROLE_ADMINISTRATOR: &str = "administrator";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_CLIENT, ROLE_EMPLOYEE, ROLE_ENTERPRISE, ROLE_ADMINISTRATOR];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock sentinel for coupons that never run out
pub const UNLIMITED_STOCK: i32 = -1;

/// Page size for the paginated coupon listing
pub const COUPON_PAGE_SIZE: u64 = 10;

/// Maximum coupon title length
pub const MAX_TITLE_LENGTH: usize = 100;

// =============================================================================
// Generated offers
// =============================================================================

/// Exclusive upper bound of the numeric offer code suffix
pub const OFFER_SUFFIX_UPPER_BOUND: u32 = 9_999_999;

/// Attempts at finding an unused offer code before giving up
pub const MAX_OFFER_ID_ATTEMPTS: usize = 5;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 6;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
