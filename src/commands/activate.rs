//! The `use` subcommand: point host-wide state at one deployment.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::errors::StoreError;
use crate::model::Endpoint;
use crate::store::DeploymentStore;

/// Dependencies for the use command
pub struct ActivateDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Use command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct ActivateArgs {
    /// Deployment uuid or name
    pub deployment: String,
}

/// Execute the use command with injected dependencies.
///
/// An unknown deployment is an expected operator mistake, not a
/// programming error: it is reported and turned into exit code 1 without
/// touching any host-wide state.
pub fn execute_with_deps(args: ActivateArgs, deps: &Arc<ActivateDependencies>) -> Result<i32> {
    let record = match deps.store.get(&args.deployment) {
        Ok(record) => record,
        Err(StoreError::NotFound(id)) => {
            deps.ui
                .print_styled(&format!("Deployment {id:?} not found."), MessageStyle::Error);
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    let admin_value = record
        .admin
        .as_ref()
        .with_context(|| format!("deployment {} has no admin credentials", record.uuid))?;
    let admin = Endpoint::from_value(admin_value)?;

    deps.env_state.set_active(&record.uuid)?;
    deps.env_state.write_openrc(&record.uuid, &admin)?;

    deps.ui
        .print(&format!("Using deployment: {}", record.uuid));
    deps.ui
        .print("source ~/.stratus/openrc to export the credentials");
    Ok(0)
}

/// Execute the use command with production dependencies
pub fn execute(args: ActivateArgs) -> Result<i32> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(ActivateDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "activate_tests.rs"]
mod tests;
