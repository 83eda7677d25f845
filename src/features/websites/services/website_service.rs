use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::cors::normalize_origin_host;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::websites::dtos::{
    CreateWebsiteDto, PublicWebsiteDto, UpdateWebsiteDto, WebsiteResponseDto,
};
use crate::features::websites::models::{Website, WebsiteConfig};
use crate::features::websites::sections::{
    move_section, set_visibility, validate_sections, SectionEntry,
};
use crate::features::websites::services::website_access::fetch_owned_website;
use crate::features::websites::variants::default_sections;

const DEFAULT_THEME: &str = "default";

/// How a request host maps onto a website record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostLookup {
    Subdomain(String),
    CustomDomain(String),
}

/// Classify a host as a platform subdomain or a tenant's own domain.
///
/// `bistro`, `bistro.sitekit.app` and `www.bistro.sitekit.app` all resolve to the
/// `bistro` subdomain; anything else is a custom domain.
pub fn classify_host(raw: &str, platform_domain: &str) -> Option<HostLookup> {
    let host = normalize_origin_host(raw)?;

    if !host.contains('.') {
        return Some(HostLookup::Subdomain(host));
    }

    if let Some(prefix) = host
        .strip_suffix(platform_domain)
        .and_then(|p| p.strip_suffix('.'))
    {
        let label = prefix.strip_prefix("www.").unwrap_or(prefix);
        if label.is_empty() || label.contains('.') {
            return None;
        }
        return Some(HostLookup::Subdomain(label.to_string()));
    }

    Some(HostLookup::CustomDomain(host))
}

fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("websites_subdomain_key") => "Subdomain is already taken",
        Some("websites_custom_domain_key") => "Custom domain is already in use",
        Some("websites_one_active_per_client") => "Client already has an active website",
        _ => "Website conflicts with an existing one",
    }
    .to_string()
}

/// Service for tenant website records and their section layout
pub struct WebsiteService {
    pool: PgPool,
    platform_domain: String,
}

impl WebsiteService {
    pub fn new(pool: PgPool, platform_domain: String) -> Self {
        Self {
            pool,
            platform_domain,
        }
    }

    /// Resolve the active website served at `host`
    pub async fn resolve(&self, host: &str) -> Result<PublicWebsiteDto> {
        let not_found = || AppError::NotFound(format!("No website is served at '{}'", host));
        let lookup = classify_host(host, &self.platform_domain).ok_or_else(not_found)?;

        let website = match &lookup {
            HostLookup::Subdomain(subdomain) => {
                sqlx::query_as::<_, Website>(
                    "SELECT * FROM websites WHERE subdomain = $1 AND is_active = TRUE",
                )
                .bind(subdomain)
                .fetch_optional(&self.pool)
                .await
            }
            HostLookup::CustomDomain(domain) => {
                // Tenants register either the apex or the www form
                let alternate = match domain.strip_prefix("www.") {
                    Some(apex) => apex.to_string(),
                    None => format!("www.{}", domain),
                };
                sqlx::query_as::<_, Website>(
                    r#"
                    SELECT * FROM websites
                    WHERE custom_domain IN ($1, $2) AND is_active = TRUE
                    LIMIT 1
                    "#,
                )
                .bind(domain)
                .bind(alternate)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to resolve website by host: {:?}", e);
            AppError::Database(e)
        })?;

        website.map(Into::into).ok_or_else(not_found)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateWebsiteDto,
    ) -> Result<WebsiteResponseDto> {
        let client_id = match dto.client_id {
            Some(client_id) if client_id != user.user_id => {
                if !user.is_admin() {
                    return Err(AppError::Forbidden(
                        "Only admins can create websites for other clients".to_string(),
                    ));
                }
                client_id
            }
            _ => user.user_id.clone(),
        };

        let sections = match dto.sections {
            Some(sections) => {
                validate_sections(dto.business_type, &sections)?;
                sections
            }
            None => default_sections(dto.business_type),
        };

        let config = WebsiteConfig {
            sections,
            branding: dto.branding.map(Into::into),
            contact: dto.contact,
        };

        let website = sqlx::query_as::<_, Website>(
            r#"
            INSERT INTO websites (client_id, name, subdomain, custom_domain, theme, business_type, config)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&client_id)
        .bind(&dto.name)
        .bind(&dto.subdomain)
        .bind(&dto.custom_domain)
        .bind(dto.theme.as_deref().unwrap_or(DEFAULT_THEME))
        .bind(dto.business_type)
        .bind(Json(config))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, conflict_message))?;

        tracing::info!(
            "Website created: id={}, subdomain={}, client_id={}, business_type={}",
            website.id,
            website.subdomain,
            website.client_id,
            website.business_type
        );

        Ok(website.into())
    }

    /// List websites owned by `client_id`, newest first
    pub async fn list_for_client(
        &self,
        client_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<WebsiteResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM websites WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count websites: {:?}", e);
                AppError::Database(e)
            })?;

        let websites = sqlx::query_as::<_, Website>(
            r#"
            SELECT * FROM websites
            WHERE client_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(client_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list websites: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((websites.into_iter().map(Into::into).collect(), total))
    }

    /// List every website on the platform (admin view)
    pub async fn list_all(&self, offset: i64, limit: i64) -> Result<(Vec<WebsiteResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM websites")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count websites: {:?}", e);
                AppError::Database(e)
            })?;

        let websites = sqlx::query_as::<_, Website>(
            "SELECT * FROM websites ORDER BY created_at DESC OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list all websites: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((websites.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<WebsiteResponseDto> {
        Ok(fetch_owned_website(&self.pool, user, id).await?.into())
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateWebsiteDto,
    ) -> Result<WebsiteResponseDto> {
        let mut tx = self.begin().await?;
        let current = lock_owned_website(&mut tx, user, id).await?;

        let mut config = current.config.0;
        if let Some(branding) = dto.branding {
            config.branding = Some(branding.into());
        }
        if let Some(contact) = dto.contact {
            config.contact = Some(contact);
        }

        let custom_domain = match dto.custom_domain {
            Some(domain) if domain.is_empty() => None,
            Some(domain) => Some(domain),
            None => current.custom_domain,
        };

        let website = sqlx::query_as::<_, Website>(
            r#"
            UPDATE websites
            SET name = $2, theme = $3, custom_domain = $4, is_active = $5, config = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.name.unwrap_or(current.name))
        .bind(dto.theme.unwrap_or(current.theme))
        .bind(custom_domain)
        .bind(dto.is_active.unwrap_or(current.is_active))
        .bind(Json(config))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_unique_violation(e, conflict_message))?;

        self.commit(tx).await?;

        tracing::info!("Website updated: id={} by {}", id, user.user_id);

        Ok(website.into())
    }

    /// Soft delete: the record stays for billing and history, the site stops resolving
    pub async fn deactivate(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        fetch_owned_website(&self.pool, user, id).await?;

        sqlx::query("UPDATE websites SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to deactivate website: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Website deactivated: id={} by {}", id, user.user_id);

        Ok(())
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    pub async fn get_sections(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<SectionEntry>> {
        let website = fetch_owned_website(&self.pool, user, id).await?;
        Ok(website.config.0.sections)
    }

    pub async fn replace_sections(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        sections: Vec<SectionEntry>,
    ) -> Result<Vec<SectionEntry>> {
        self.update_sections(user, id, |website, _| {
            validate_sections(website.business_type, &sections)?;
            Ok(sections)
        })
        .await
    }

    pub async fn move_section(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        from_index: usize,
        to_index: usize,
    ) -> Result<Vec<SectionEntry>> {
        self.update_sections(user, id, |_, current| {
            Ok(move_section(current, from_index, to_index)?)
        })
        .await
    }

    pub async fn set_section_visibility(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        section_id: &str,
        visible: bool,
    ) -> Result<Vec<SectionEntry>> {
        self.update_sections(user, id, |_, current| {
            Ok(set_visibility(current, section_id, visible)?)
        })
        .await
    }

    /// Read-modify-write of `config.sections` under a row lock
    async fn update_sections<F>(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        apply: F,
    ) -> Result<Vec<SectionEntry>>
    where
        F: FnOnce(&Website, &[SectionEntry]) -> Result<Vec<SectionEntry>>,
    {
        let mut tx = self.begin().await?;
        let website = lock_owned_website(&mut tx, user, id).await?;

        let sections = apply(&website, &website.config.0.sections)?;

        sqlx::query(
            r#"
            UPDATE websites
            SET config = jsonb_set(config, '{sections}', $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(&sections))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save website sections: {:?}", e);
            AppError::Database(e)
        })?;

        self.commit(tx).await?;

        tracing::info!(
            "Website sections updated: id={}, count={} by {}",
            id,
            sections.len(),
            user.user_id
        );

        Ok(sections)
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(&self, tx: Transaction<'static, Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

/// Same ownership rule as `fetch_owned_website`, but locks the row for the transaction
async fn lock_owned_website(
    tx: &mut Transaction<'static, Postgres>,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<Website> {
    let website = sqlx::query_as::<_, Website>("SELECT * FROM websites WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock website: {:?}", e);
            AppError::Database(e)
        })?;

    match website {
        Some(website) if user.can_manage(&website.client_id) => Ok(website),
        _ => Err(AppError::NotFound(format!("Website '{}' not found", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: &str = "sitekit.app";

    #[test]
    fn test_classify_platform_subdomain() {
        for host in [
            "bistro",
            "bistro.sitekit.app",
            "https://Bistro.sitekit.app:443",
            "www.bistro.sitekit.app",
        ] {
            assert_eq!(
                classify_host(host, PLATFORM),
                Some(HostLookup::Subdomain("bistro".to_string())),
                "{}",
                host
            );
        }
    }

    #[test]
    fn test_classify_custom_domain() {
        assert_eq!(
            classify_host("www.bistroverde.com", PLATFORM),
            Some(HostLookup::CustomDomain("www.bistroverde.com".to_string()))
        );
        assert_eq!(
            classify_host("bistroverde.com:8080", PLATFORM),
            Some(HostLookup::CustomDomain("bistroverde.com".to_string()))
        );
    }

    #[test]
    fn test_classify_rejects_platform_root_and_deep_labels() {
        assert_eq!(
            classify_host("sitekit.app", PLATFORM),
            Some(HostLookup::CustomDomain("sitekit.app".to_string()))
        );
        assert_eq!(classify_host("a.b.sitekit.app", PLATFORM), None);
        assert_eq!(classify_host("", PLATFORM), None);
    }

    #[test]
    fn test_conflict_messages() {
        assert_eq!(
            conflict_message(Some("websites_subdomain_key")),
            "Subdomain is already taken"
        );
        assert_eq!(
            conflict_message(Some("websites_one_active_per_client")),
            "Client already has an active website"
        );
        assert_eq!(conflict_message(None), "Website conflicts with an existing one");
    }
}
