//! Cloud reachability and credential probing.
//!
//! A single best-effort password-auth request against the deployment's
//! identity endpoint. No retries; the caller decides whether a failure
//! is soft (reported) or hard (propagated).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::errors::VerifyError;
use crate::model::Endpoint;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts an authenticated call against a cloud.
#[async_trait]
pub trait CloudVerifier: Send + Sync {
    async fn verify(&self, endpoint: &Endpoint) -> Result<(), VerifyError>;
}

/// Identity request target and body for one endpoint.
///
/// v3 URLs get a domain-scoped password payload; anything else is sent
/// the v2 tenant-scoped shape.
pub(crate) fn auth_request(endpoint: &Endpoint) -> (String, Value) {
    let base = endpoint.auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        let user_domain = endpoint.user_domain_name.as_deref().unwrap_or("Default");
        let mut auth = json!({
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": endpoint.username,
                        "password": endpoint.password,
                        "domain": {"name": user_domain},
                    },
                },
            },
        });
        if let Some(project) = &endpoint.tenant_name {
            let project_domain = endpoint.project_domain_name.as_deref().unwrap_or("Default");
            auth["scope"] = json!({
                "project": {"name": project, "domain": {"name": project_domain}},
            });
        }
        (format!("{base}/auth/tokens"), json!({"auth": auth}))
    } else {
        let mut auth = json!({
            "passwordCredentials": {
                "username": endpoint.username,
                "password": endpoint.password,
            },
        });
        if let Some(tenant) = &endpoint.tenant_name {
            auth["tenantName"] = Value::String(tenant.clone());
        }
        (format!("{base}/tokens"), json!({"auth": auth}))
    }
}

/// Production verifier issuing the identity request over HTTP.
pub struct HttpVerifier {
    client: reqwest::Client,
}

impl HttpVerifier {
    pub fn new() -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VerifyError::Unexpected(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CloudVerifier for HttpVerifier {
    async fn verify(&self, endpoint: &Endpoint) -> Result<(), VerifyError> {
        let (url, body) = auth_request(endpoint);
        tracing::debug!(%url, "probing identity endpoint");

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) if response.status() == reqwest::StatusCode::UNAUTHORIZED => Err(
                VerifyError::Unauthorized(format!("{url} rejected the credentials")),
            ),
            Ok(response) => Err(VerifyError::Unexpected(format!(
                "unexpected response from {url}: {}",
                response.status()
            ))),
            Err(e) if e.is_connect() || e.is_timeout() => Err(VerifyError::Unreachable(format!(
                "{url} is not reachable: {e}"
            ))),
            Err(e) => Err(VerifyError::Unexpected(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::EndpointType;

    use super::*;

    fn endpoint(auth_url: &str) -> Endpoint {
        Endpoint {
            auth_url: auth_url.to_string(),
            username: "admin".to_string(),
            password: "adminpass".to_string(),
            tenant_name: Some("demo".to_string()),
            region_name: None,
            endpoint: None,
            endpoint_type: EndpointType::Public,
            user_domain_name: None,
            project_domain_name: None,
        }
    }

    #[test]
    fn builds_v2_token_request() {
        let (url, body) = auth_request(&endpoint("http://192.168.1.1:5000/v2.0/"));

        assert_eq!(url, "http://192.168.1.1:5000/v2.0/tokens");
        assert_eq!(body["auth"]["passwordCredentials"]["username"], "admin");
        assert_eq!(body["auth"]["tenantName"], "demo");
    }

    #[test]
    fn builds_v3_token_request_with_default_domains() {
        let (url, body) = auth_request(&endpoint("http://localhost:5000/v3"));

        assert_eq!(url, "http://localhost:5000/v3/auth/tokens");
        assert_eq!(
            body["auth"]["identity"]["password"]["user"]["domain"]["name"],
            "Default"
        );
        assert_eq!(
            body["auth"]["scope"]["project"]["domain"]["name"],
            "Default"
        );
    }

    #[test]
    fn v3_request_uses_explicit_domains() {
        let mut ep = endpoint("http://localhost:5000/v3");
        ep.user_domain_name = Some("users".to_string());
        ep.project_domain_name = Some("projects".to_string());

        let (_, body) = auth_request(&ep);
        assert_eq!(
            body["auth"]["identity"]["password"]["user"]["domain"]["name"],
            "users"
        );
        assert_eq!(
            body["auth"]["scope"]["project"]["domain"]["name"],
            "projects"
        );
    }

    #[test]
    fn unscoped_request_omits_scope_and_tenant() {
        let mut ep = endpoint("http://localhost:5000/v3");
        ep.tenant_name = None;
        let (_, body) = auth_request(&ep);
        assert!(body["auth"].get("scope").is_none());

        let mut ep = endpoint("http://cloud:5000/v2.0");
        ep.tenant_name = None;
        let (_, body) = auth_request(&ep);
        assert!(body["auth"].get("tenantName").is_none());
    }
}
