use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Auth subject; matches `websites.client_id` for the sites this user owns
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Platform staff: may manage every tenant's website
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN) || self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Whether this user may manage a website owned by `client_id`
    pub fn can_manage(&self, client_id: &str) -> bool {
        self.is_admin() || self.user_id == client_id
    }
}

/// Supabase puts platform roles under `app_metadata`, which only the service role can write
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AppMetadata {
    pub fn into_roles(self) -> Vec<String> {
        let mut roles = self.roles;
        if let Some(role) = self.role {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin_user, create_owner_user};

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "owner-1".to_string(),
            email: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_can_manage() {
        assert!(user(&[]).can_manage("owner-1"));
        assert!(!user(&[]).can_manage("owner-2"));
        assert!(user(&["admin"]).can_manage("owner-2"));
        assert!(user(&["super_admin"]).can_manage("owner-2"));
    }

    #[test]
    fn test_admin_and_owner_helpers() {
        assert!(create_admin_user().is_admin());
        assert!(!create_owner_user("owner-9").is_admin());
        assert!(!create_owner_user("owner-9").has_role("admin"));
    }

    #[test]
    fn test_app_metadata_roles_merge() {
        let metadata = AppMetadata {
            role: Some("admin".to_string()),
            roles: vec!["support".to_string(), "admin".to_string()],
        };
        assert_eq!(metadata.into_roles(), vec!["support", "admin"]);
    }
}
