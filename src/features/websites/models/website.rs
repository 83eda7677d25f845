use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::websites::sections::SectionEntry;

/// Vertical a tenant site is built for; decides which sections and variants apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "business_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Restaurant,
    Gym,
    Salon,
    Clinic,
    Repair,
    Store,
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessType::Restaurant => write!(f, "restaurant"),
            BusinessType::Gym => write!(f, "gym"),
            BusinessType::Salon => write!(f, "salon"),
            BusinessType::Clinic => write!(f, "clinic"),
            BusinessType::Repair => write!(f, "repair"),
            BusinessType::Store => write!(f, "store"),
        }
    }
}

/// Brand styling shared by every section of a site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// JSON blob stored in `websites.config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WebsiteConfig {
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    /// Free-form contact block (phone, address, opening hours, socials)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<serde_json::Value>,
}

/// Database model for a tenant website
#[derive(Debug, Clone, FromRow)]
pub struct Website {
    pub id: Uuid,
    pub client_id: String,
    pub name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub theme: String,
    pub business_type: BusinessType,
    pub config: Json<WebsiteConfig>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
