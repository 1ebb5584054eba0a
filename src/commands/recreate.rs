//! Re-run the deployment workflow against a record's stored config.

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::store::DeploymentStore;

use super::resolve_deployment_id;

/// Dependencies for the recreate command
pub struct RecreateDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Recreate command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct RecreateArgs {
    /// Deployment uuid or name; defaults to the active deployment
    pub deployment: Option<String>,
}

/// Execute the recreate command with injected dependencies
pub fn execute_with_deps(args: RecreateArgs, deps: &Arc<RecreateDependencies>) -> Result<()> {
    let id = resolve_deployment_id(args.deployment.as_deref(), &deps.env_state)?;
    let record = deps.store.recreate(&id)?;

    deps.ui.print_styled(
        &format!("✓ Recreated deployment {} ({})", record.name, record.uuid),
        MessageStyle::Success,
    );
    Ok(())
}

/// Execute the recreate command with production dependencies
pub fn execute(args: RecreateArgs) -> Result<()> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(RecreateDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "recreate_tests.rs"]
mod tests;
