//! Origin matching for cross-origin requests.
//!
//! Tenant sites are served from many hosts (platform subdomains, custom domains, local
//! dev servers), so the allow-list works on normalized hosts rather than exact origin
//! strings: scheme, port and path are dropped and the host is compared case-insensitively,
//! either exactly or as a subdomain of an allowed domain.

use axum::http::{header, HeaderMap, HeaderValue};
use url::Url;

use crate::core::config::CorsConfig;

/// Hosts that are always allowed while dev mode is on
pub const DEV_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "0.0.0.0"];

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Request-Id";
const MAX_AGE_SECS: &str = "86400";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_domains: Vec<String>,
    allow_any: bool,
    allow_dev_hosts: bool,
}

#[derive(Debug, Clone)]
pub enum CorsDecision {
    /// Origin is allowed; carries the headers to attach to the response
    Allowed(HeaderMap),
    Denied,
}

impl CorsPolicy {
    pub fn new(allowed_domains: Vec<String>, allow_dev_hosts: bool) -> Self {
        let allow_any = allowed_domains.iter().any(|d| d.trim() == "*");
        let allowed_domains = allowed_domains
            .iter()
            .filter(|d| d.trim() != "*")
            .filter_map(|d| normalize_origin_host(d))
            .collect();

        Self {
            allowed_domains,
            allow_any,
            allow_dev_hosts,
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.allowed_domains.clone(), config.allow_dev_hosts)
    }

    /// Check whether an `Origin` header value may access the API
    pub fn is_allowed(&self, origin: &str) -> bool {
        let Some(host) = normalize_origin_host(origin) else {
            return false;
        };

        if self.allow_any {
            return true;
        }

        if self.allow_dev_hosts && DEV_HOSTS.contains(&host.as_str()) {
            return true;
        }

        self.allowed_domains
            .iter()
            .any(|domain| host_matches_domain(&host, domain))
    }

    /// Decide on an origin and build the response headers for it.
    ///
    /// A `*` policy echoes any origin but never allows credentials.
    pub fn evaluate(&self, origin: &str) -> CorsDecision {
        if !self.is_allowed(origin) {
            return CorsDecision::Denied;
        }

        let Ok(origin_value) = HeaderValue::from_str(origin.trim()) else {
            return CorsDecision::Denied;
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        if !self.allow_any {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));

        CorsDecision::Allowed(headers)
    }
}

/// Reduce an origin (or bare domain) to its lowercase host.
///
/// Accepts values with or without a scheme: `https://Shop.Example.com:8443/x` and
/// `shop.example.com:8443` both yield `shop.example.com`. Returns `None` for empty,
/// `null` and unparsable values.
pub fn normalize_origin_host(origin: &str) -> Option<String> {
    let origin = origin.trim();
    if origin.is_empty() || origin.eq_ignore_ascii_case("null") {
        return None;
    }

    let with_scheme = if origin.contains("://") {
        origin.to_string()
    } else {
        format!("http://{}", origin)
    };

    let url = Url::parse(&with_scheme).ok()?;
    let host = url
        .host_str()?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_lowercase();

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

fn host_matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(dev: bool) -> CorsPolicy {
        CorsPolicy::new(vec!["example.com".to_string()], dev)
    }

    #[test]
    fn test_normalize_origin_host() {
        assert_eq!(
            normalize_origin_host("https://Shop.Example.com:8443/path"),
            Some("shop.example.com".to_string())
        );
        assert_eq!(
            normalize_origin_host("localhost:3000"),
            Some("localhost".to_string())
        );
        assert_eq!(
            normalize_origin_host("http://[::1]:5173"),
            Some("::1".to_string())
        );
        assert_eq!(
            normalize_origin_host("example.com."),
            Some("example.com".to_string())
        );
        assert_eq!(normalize_origin_host(""), None);
        assert_eq!(normalize_origin_host("null"), None);
    }

    #[test]
    fn test_configured_domain_allowed() {
        let policy = policy(false);
        assert!(policy.is_allowed("https://example.com"));
        assert!(policy.is_allowed("http://EXAMPLE.com:8080"));
        assert!(policy.is_allowed("https://shop.example.com"));
    }

    #[test]
    fn test_unlisted_domain_denied() {
        let policy = policy(false);
        assert!(!policy.is_allowed("https://evil.com"));
        assert!(!policy.is_allowed("https://notexample.com"));
        assert!(!policy.is_allowed("https://example.com.evil.com"));
    }

    #[test]
    fn test_dev_hosts() {
        assert!(policy(true).is_allowed("localhost:3000"));
        assert!(policy(true).is_allowed("http://127.0.0.1:4321"));
        assert!(!policy(false).is_allowed("localhost:3000"));
    }

    #[test]
    fn test_wildcard_allows_everything() {
        let policy = CorsPolicy::new(vec!["*".to_string()], false);
        assert!(policy.is_allowed("https://anything.io"));
        assert!(!policy.is_allowed("null"));
    }

    #[test]
    fn test_wildcard_never_allows_credentials() {
        let wildcard = CorsPolicy::new(vec!["*".to_string(), "example.com".to_string()], false);
        let CorsDecision::Allowed(headers) = wildcard.evaluate("https://anything.io") else {
            panic!("wildcard should allow any origin");
        };
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));

        let CorsDecision::Allowed(headers) = policy(false).evaluate("https://example.com") else {
            panic!("configured domain should be allowed");
        };
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[test]
    fn test_configured_entries_are_normalized() {
        let policy = CorsPolicy::new(vec!["https://Sitekit.App:443".to_string()], false);
        assert!(policy.is_allowed("https://bistro.sitekit.app"));
    }

    #[test]
    fn test_evaluate_headers() {
        let decision = policy(false).evaluate("https://example.com");
        let CorsDecision::Allowed(headers) = decision else {
            panic!("expected origin to be allowed");
        };

        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://example.com"
        );
        assert_eq!(headers.get(header::VARY).unwrap(), "Origin");
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );

        assert!(matches!(
            policy(false).evaluate("https://evil.com"),
            CorsDecision::Denied
        ));
    }
}
