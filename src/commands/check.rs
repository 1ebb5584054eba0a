//! Probe a deployment's endpoints for reachability and credential validity.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::errors::{EndpointDataError, StoreError, VerifyError};
use crate::model::Endpoint;
use crate::store::DeploymentStore;
use crate::verify::CloudVerifier;

use super::resolve_deployment_id;

/// Dependencies for the check command
pub struct CheckDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// Cloud verification client
    pub verifier: Arc<dyn CloudVerifier>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Check command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Deployment uuid or name; defaults to the active deployment
    pub deployment: Option<String>,
}

/// Execute the check command with injected dependencies.
///
/// Transport failures and rejected credentials are expected operational
/// conditions: they are reported per endpoint and folded into exit code
/// 1. Malformed persisted endpoint data is a defect and propagates.
pub async fn execute_with_deps(args: CheckArgs, deps: &Arc<CheckDependencies>) -> Result<i32> {
    let id = resolve_deployment_id(args.deployment.as_deref(), &deps.env_state)?;

    let record = match deps.store.get(&id) {
        Ok(record) => record,
        Err(StoreError::NotFound(id)) => {
            deps.ui
                .print_styled(&format!("Deployment {id:?} not found."), MessageStyle::Error);
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    deps.ui.print_styled(
        &format!("→ Checking deployment {} ({})", record.name, record.uuid),
        MessageStyle::Cyan,
    );

    let admin_value = record
        .admin
        .as_ref()
        .ok_or_else(|| EndpointDataError("record has no admin credentials".to_string()))?;
    let mut endpoints = vec![("admin".to_string(), Endpoint::from_value(admin_value)?)];
    for (index, user) in record.users.iter().enumerate() {
        endpoints.push((format!("user {index}"), Endpoint::from_value(user)?));
    }

    let mut code = 0;
    for (label, endpoint) in endpoints {
        let spinner = deps.ui.create_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(&format!("Verifying {label} against {}", endpoint.auth_url));

        let outcome = deps.verifier.verify(&endpoint).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(()) => deps.ui.print_styled(
                &format!(
                    "✓ {label}: reachable, credentials accepted ({})",
                    endpoint.auth_url
                ),
                MessageStyle::Success,
            ),
            Err(VerifyError::Unreachable(reason)) => {
                deps.ui
                    .print_styled(&format!("✗ {label}: {reason}"), MessageStyle::Red);
                code = 1;
            }
            Err(VerifyError::Unauthorized(reason)) => {
                deps.ui
                    .print_styled(&format!("✗ {label}: {reason}"), MessageStyle::Red);
                code = 1;
            }
            Err(e @ VerifyError::Unexpected(_)) => return Err(e.into()),
        }
    }
    Ok(code)
}

/// Execute the check command with production dependencies
pub async fn execute(args: CheckArgs) -> Result<i32> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;
    use crate::verify::HttpVerifier;

    let deps = Arc::new(CheckDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        verifier: Arc::new(HttpVerifier::new()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps).await
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
