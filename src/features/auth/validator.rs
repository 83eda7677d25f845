use super::model::{AppMetadata, AuthenticatedUser};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;

/// Validates Supabase access tokens (HS256, shared project secret)
pub struct JwtValidator {
    decoding_key: DecodingKey,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    email: Option<String>,
    /// Postgres role the token maps to ("authenticated", "anon", "service_role")
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    app_metadata: Option<AppMetadata>,
}

impl JwtValidator {
    pub fn new(secret: &str, audience: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        if claims.role.as_deref() == Some("anon") {
            return Err(AppError::Auth(
                "Anonymous tokens cannot access this resource".to_string(),
            ));
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            roles: claims.app_metadata.unwrap_or_default().into_roles(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sign_token, TEST_JWT_SECRET};
    use serde_json::json;

    fn validator() -> JwtValidator {
        JwtValidator::new(
            TEST_JWT_SECRET,
            "authenticated".to_string(),
            Duration::from_secs(0),
        )
    }

    #[test]
    fn test_valid_token() {
        let token = sign_token(json!({
            "sub": "user-123",
            "aud": "authenticated",
            "role": "authenticated",
            "email": "owner@bistro.test",
            "app_metadata": { "roles": ["admin"] },
        }));

        let user = validator().validate_token(&token).unwrap();
        assert_eq!(user.user_id, "user-123");
        assert_eq!(user.email.as_deref(), Some("owner@bistro.test"));
        assert!(user.is_admin());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = sign_token(json!({ "sub": "user-123", "aud": "other" }));
        assert!(matches!(
            validator().validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_anon_token_rejected() {
        let token = sign_token(json!({
            "sub": "anon",
            "aud": "authenticated",
            "role": "anon",
        }));
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validator().validate_token("not-a-jwt").is_err());
    }
}
