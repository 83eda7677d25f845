//! Website lookups shared by every tenant-scoped feature.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::websites::models::Website;
use crate::shared::validation::is_valid_uuid;

/// Load a website the user may manage.
///
/// Sites owned by someone else are reported as missing so their existence does not leak.
pub async fn fetch_owned_website(
    pool: &PgPool,
    user: &AuthenticatedUser,
    website_id: Uuid,
) -> Result<Website> {
    let website = sqlx::query_as::<_, Website>("SELECT * FROM websites WHERE id = $1")
        .bind(website_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get website: {:?}", e);
            AppError::Database(e)
        })?;

    match website {
        Some(website) if user.can_manage(&website.client_id) => Ok(website),
        _ => Err(AppError::NotFound(format!(
            "Website '{}' not found",
            website_id
        ))),
    }
}

/// Parse the `{site}` segment of a public submission path.
///
/// Malformed ids are reported as a missing site, same as unknown ones.
pub fn parse_site_id(site: &str) -> Result<Uuid> {
    if !is_valid_uuid(site) {
        return Err(AppError::NotFound(format!("Website '{}' not found", site)));
    }
    Uuid::parse_str(site)
        .map_err(|_| AppError::NotFound(format!("Website '{}' not found", site)))
}

/// Load an active website for a public (unauthenticated) submission
pub async fn fetch_active_website(pool: &PgPool, website_id: Uuid) -> Result<Website> {
    sqlx::query_as::<_, Website>("SELECT * FROM websites WHERE id = $1 AND is_active = TRUE")
        .bind(website_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get active website: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Website '{}' not found", website_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_id() {
        let id = parse_site_id("0190f3a4-7c1e-7d2a-9b3c-123456789abc").unwrap();
        assert_eq!(id.to_string(), "0190f3a4-7c1e-7d2a-9b3c-123456789abc");

        assert!(matches!(
            parse_site_id("bistro.sitekit.app"),
            Err(AppError::NotFound(_))
        ));
    }
}
