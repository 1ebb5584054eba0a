//! Error types shared across the deployment workflow.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the deployment record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("deployment {0:?} not found")]
    NotFound(String),

    #[error("a deployment named {0:?} already exists")]
    DuplicateName(String),

    #[error("invalid deployment configuration: {0}")]
    InvalidConfig(String),

    #[error("store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt deployment record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures raised while probing a cloud endpoint.
///
/// `Unreachable` and `Unauthorized` are expected operational conditions
/// that the check command reports as a non-zero exit code. `Unexpected`
/// always propagates.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("cloud unreachable: {0}")]
    Unreachable(String),

    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    #[error("verification failed: {0}")]
    Unexpected(String),
}

/// A persisted credential block that no longer parses as an endpoint.
///
/// This indicates corrupt or hand-edited state, not an operator mistake,
/// so callers let it propagate instead of mapping it to an exit code.
#[derive(Debug, Error)]
#[error("malformed endpoint data: {0}")]
pub struct EndpointDataError(pub String);

/// User-input failures surfaced by the command layer. Never retried.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no deployment specified and no active deployment is set")]
    NoDeployment,

    #[error("failed to read config file {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    #[error("config file {path} is not valid JSON: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
}
