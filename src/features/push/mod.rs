//! Web push subscription support for tenant sites.
//!
//! Only the VAPID public key is served here so that site visitors can subscribe;
//! delivering notifications happens outside this service.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/public/push/vapid-key` | No | VAPID application server key |

pub mod handler;
pub mod routes;

/// Shared state for the push routes
#[derive(Debug, Clone, Default)]
pub struct PushSettings {
    pub vapid_public_key: Option<String>,
}
