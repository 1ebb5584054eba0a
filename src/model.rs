//! Deployment records and the credential model.
//!
//! A `Deployment` is the persisted description of one target cloud; its
//! `admin` and `users` blocks are kept as raw JSON so that corruption of
//! persisted state surfaces at the strict `Endpoint` parse instead of
//! being silently reinterpreted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EndpointDataError;

/// Placeholder rendered wherever a password would otherwise appear.
pub const PASSWORD_MASK: &str = "***";

/// Which service catalog interface an endpoint talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    #[default]
    Public,
    Internal,
    Admin,
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Internal => write!(f, "internal"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// One credential/connection tuple for a cloud or a user within it.
///
/// Deserialization is strict: an unknown key in a stored credential block
/// is a data defect and must fail rather than be dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub endpoint_type: EndpointType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_domain_name: Option<String>,
}

impl Endpoint {
    /// Parse a stored credential block.
    pub fn from_value(value: &Value) -> Result<Self, EndpointDataError> {
        serde_json::from_value(value.clone()).map_err(|e| EndpointDataError(e.to_string()))
    }
}

/// Credentials for one identity inside a cloud, without connection info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudCredentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_domain_name: Option<String>,
}

/// Parsed, validated form of a deployment configuration document.
///
/// The tag dispatches to the supported deployment kinds; each variant
/// carries its own required fields, so an unsupported or incomplete
/// document fails here rather than at point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeploymentConfig {
    ExistingCloud {
        auth_url: String,
        #[serde(default)]
        region_name: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        admin: CloudCredentials,
        #[serde(default)]
        users: Vec<CloudCredentials>,
    },
}

impl DeploymentConfig {
    pub fn from_value(value: &Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }

    /// Expand into the admin/users endpoint blocks persisted on the record.
    pub fn endpoints(&self) -> Result<(Value, Vec<Value>), serde_json::Error> {
        let Self::ExistingCloud {
            auth_url,
            region_name,
            endpoint,
            admin,
            users,
        } = self;

        let build = |credentials: &CloudCredentials| {
            serde_json::to_value(Endpoint {
                auth_url: auth_url.clone(),
                username: credentials.username.clone(),
                password: credentials.password.clone(),
                tenant_name: credentials.tenant_name.clone(),
                region_name: region_name.clone(),
                endpoint: endpoint.clone(),
                endpoint_type: EndpointType::default(),
                user_domain_name: credentials.user_domain_name.clone(),
                project_domain_name: credentials.project_domain_name.clone(),
            })
        };

        let admin = build(admin)?;
        let users = users.iter().map(build).collect::<Result<Vec<_>, _>>()?;
        Ok((admin, users))
    }
}

/// Lifecycle state of a deployment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    #[serde(rename = "deploy->init")]
    DeployInit,
    #[serde(rename = "deploy->started")]
    DeployStarted,
    #[serde(rename = "deploy->finished")]
    DeployFinished,
    #[serde(rename = "deploy->failed")]
    DeployFailed,
    #[serde(rename = "cleanup->started")]
    CleanupStarted,
    #[serde(rename = "cleanup->finished")]
    CleanupFinished,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DeployInit => "deploy->init",
            Self::DeployStarted => "deploy->started",
            Self::DeployFinished => "deploy->finished",
            Self::DeployFailed => "deploy->failed",
            Self::CleanupStarted => "cleanup->started",
            Self::CleanupFinished => "cleanup->finished",
        };
        write!(f, "{text}")
    }
}

/// A persisted record describing one target cloud under management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub uuid: String,
    pub name: String,
    pub status: DeploymentStatus,
    pub created_at: DateTime<Utc>,
    /// Original input configuration, kept verbatim for `config` and
    /// `recreate`.
    pub config: Value,
    #[serde(default)]
    pub admin: Option<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
}
