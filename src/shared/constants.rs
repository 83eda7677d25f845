/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Platform staff - can manage every tenant's website
pub const ROLE_ADMIN: &str = "admin";

/// Platform owner - superset of admin
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

// =============================================================================
// TENANT LIMITS
// =============================================================================

/// Upper bound on sections a single page may hold
pub const MAX_SECTIONS: usize = 30;

/// Upper bound on line items in a single public order
pub const MAX_ORDER_ITEMS: usize = 50;

/// Exclusive upper bound on a unit price or order total; fits `NUMERIC(12, 2)`
pub const MAX_ORDER_AMOUNT: i64 = 10_000_000_000;
