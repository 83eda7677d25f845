use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::cors::normalize_origin_host;
use crate::features::websites::models::{BusinessType, Branding, Website, WebsiteConfig};
use crate::features::websites::sections::SectionEntry;
use crate::shared::validation::{validate_plain_object, HEX_COLOR_REGEX, SUBDOMAIN_REGEX};

/// Branding payload accepted from the dashboard
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandingDto {
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "primaryColor must be a hex color"))]
    pub primary_color: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "secondaryColor must be a hex color"))]
    pub secondary_color: Option<String>,

    #[validate(url(message = "logoUrl must be a valid URL"))]
    pub logo_url: Option<String>,

    #[validate(length(max = 64, message = "fontFamily must not exceed 64 characters"))]
    pub font_family: Option<String>,
}

impl From<BrandingDto> for Branding {
    fn from(dto: BrandingDto) -> Self {
        Self {
            primary_color: dto.primary_color,
            secondary_color: dto.secondary_color,
            logo_url: dto.logo_url,
            font_family: dto.font_family,
        }
    }
}

/// Request DTO for creating a website
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWebsiteDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(regex(
        path = *SUBDOMAIN_REGEX,
        message = "Subdomain must be lowercase letters, digits and inner hyphens"
    ))]
    pub subdomain: String,

    #[validate(custom(function = "validate_custom_domain"))]
    pub custom_domain: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Theme must be 1-64 characters"))]
    pub theme: Option<String>,

    pub business_type: BusinessType,

    /// Owner to create the site for; admins only, defaults to the caller
    pub client_id: Option<String>,

    /// Initial section layout; defaults to the vertical's standard layout
    pub sections: Option<Vec<SectionEntry>>,

    #[validate(nested)]
    pub branding: Option<BrandingDto>,

    #[validate(custom(function = "validate_plain_object"))]
    pub contact: Option<serde_json::Value>,
}

/// Request DTO for updating a website; absent fields are left unchanged
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateWebsiteDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Theme must be 1-64 characters"))]
    pub theme: Option<String>,

    /// Empty string removes the custom domain
    #[validate(custom(function = "validate_custom_domain_or_empty"))]
    pub custom_domain: Option<String>,

    pub is_active: Option<bool>,

    #[validate(nested)]
    pub branding: Option<BrandingDto>,

    #[validate(custom(function = "validate_plain_object"))]
    pub contact: Option<serde_json::Value>,
}

/// Response DTO for a website, as seen by its owner
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebsiteResponseDto {
    pub id: Uuid,
    pub client_id: String,
    pub name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub theme: String,
    pub business_type: BusinessType,
    pub config: WebsiteConfig,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Website> for WebsiteResponseDto {
    fn from(w: Website) -> Self {
        Self {
            id: w.id,
            client_id: w.client_id,
            name: w.name,
            subdomain: w.subdomain,
            custom_domain: w.custom_domain,
            theme: w.theme,
            business_type: w.business_type,
            config: w.config.0,
            is_active: w.is_active,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Response DTO for the public template renderer: visible sections only, no owner data
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicWebsiteDto {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub theme: String,
    pub business_type: BusinessType,
    pub sections: Vec<SectionEntry>,
    pub branding: Option<Branding>,
    pub contact: Option<serde_json::Value>,
}

impl From<Website> for PublicWebsiteDto {
    fn from(w: Website) -> Self {
        let config = w.config.0;
        Self {
            id: w.id,
            name: w.name,
            subdomain: w.subdomain,
            custom_domain: w.custom_domain,
            theme: w.theme,
            business_type: w.business_type,
            sections: config.sections.into_iter().filter(|s| s.visible).collect(),
            branding: config.branding,
            contact: config.contact,
        }
    }
}

/// Request DTO replacing the whole section list
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceSectionsDto {
    pub sections: Vec<SectionEntry>,
}

/// Request DTO for a drag-and-drop move
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MoveSectionDto {
    pub from_index: usize,
    pub to_index: usize,
}

/// Request DTO for showing or hiding a section
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SectionVisibilityDto {
    pub visible: bool,
}

/// A custom domain must be a bare, lowercase hostname with at least one dot
fn validate_custom_domain(value: &str) -> Result<(), ValidationError> {
    let is_bare_host = normalize_origin_host(value).as_deref() == Some(value)
        && value.contains('.')
        && value.len() <= 253;

    if is_bare_host {
        Ok(())
    } else {
        Err(ValidationError::new("custom_domain")
            .with_message("Custom domain must be a bare lowercase hostname".into()))
    }
}

fn validate_custom_domain_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    validate_custom_domain(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_dto(overrides: serde_json::Value) -> CreateWebsiteDto {
        let mut base = json!({
            "name": "Bistro Verde",
            "subdomain": "bistro-verde",
            "business_type": "restaurant",
        });
        if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in overrides {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_valid_create_dto() {
        let dto = create_dto(json!({
            "custom_domain": "bistroverde.com",
            "branding": { "primaryColor": "#1a7f37", "logoUrl": "https://cdn.test/logo.png" },
            "contact": { "phone": "+1 555 0100" },
        }));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_subdomain() {
        assert!(create_dto(json!({ "subdomain": "Bistro_Verde" }))
            .validate()
            .is_err());
    }

    #[test]
    fn test_invalid_custom_domain() {
        for domain in ["https://bistro.com", "Bistro.com", "localhost", "bistro.com:8080"] {
            let dto = create_dto(json!({ "custom_domain": domain }));
            assert!(dto.validate().is_err(), "{} should be rejected", domain);
        }
    }

    #[test]
    fn test_invalid_branding_color() {
        let dto = create_dto(json!({ "branding": { "primaryColor": "green" } }));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_contact_must_be_object() {
        let dto = create_dto(json!({ "contact": ["+1 555 0100"] }));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_allows_clearing_custom_domain() {
        let dto: UpdateWebsiteDto = serde_json::from_value(json!({ "custom_domain": "" })).unwrap();
        assert!(dto.validate().is_ok());
    }
}
