//! Destroy a deployment record and its host-wide state.

use std::sync::Arc;

use anyhow::Result;

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::store::DeploymentStore;

use super::resolve_deployment_id;

/// Dependencies for the destroy command
pub struct DestroyDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output and interaction
    pub ui: Arc<dyn UserInterface>,
}

/// Destroy command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct DestroyArgs {
    /// Deployment uuid or name; defaults to the active deployment
    pub deployment: Option<String>,
    /// Skip the confirmation prompt
    pub force: bool,
}

/// Execute the destroy command with injected dependencies
pub fn execute_with_deps(args: DestroyArgs, deps: &Arc<DestroyDependencies>) -> Result<()> {
    let id = resolve_deployment_id(args.deployment.as_deref(), &deps.env_state)?;
    let record = deps.store.get(&id)?;

    if !args.force && deps.ui.is_interactive() {
        deps.ui.print_styled(
            "⚠️  This removes the deployment record and its exported credentials!",
            MessageStyle::Warning,
        );
        let prompt = format!("Type '{}' to confirm destruction", record.name);
        let input = deps.ui.prompt_input(&prompt, None)?;
        if input != record.name {
            deps.ui
                .print_styled("Destroy cancelled.", MessageStyle::Yellow);
            return Ok(());
        }
    }

    deps.store.destroy(&record.uuid)?;

    // A destroyed deployment must not stay active: drop the pointer and
    // the export files it references.
    if deps.env_state.active_deployment().as_deref() == Some(record.uuid.as_str()) {
        deps.env_state.clear_active(&record.uuid)?;
    }

    deps.ui.print_styled(
        &format!("✓ Destroyed deployment {} ({})", record.name, record.uuid),
        MessageStyle::Success,
    );
    Ok(())
}

/// Execute the destroy command with production dependencies
pub fn execute(args: DestroyArgs) -> Result<()> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(DestroyDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "destroy_tests.rs"]
mod tests;
