//! CLI command implementations.

pub mod activate;
pub mod check;
pub mod config;
pub mod create;
pub mod destroy;
pub mod list;
pub mod recreate;
pub mod show;

use std::sync::Arc;

use crate::envstate::EnvState;
use crate::errors::CommandError;

/// Resolve the target deployment id: the explicit argument wins, then
/// the active-deployment pointer.
pub(crate) fn resolve_deployment_id(
    explicit: Option<&str>,
    env_state: &Arc<dyn EnvState>,
) -> Result<String, CommandError> {
    match explicit {
        Some(id) => Ok(id.to_string()),
        None => env_state
            .active_deployment()
            .ok_or(CommandError::NoDeployment),
    }
}
