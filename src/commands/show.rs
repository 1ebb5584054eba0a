//! Show the admin credentials of a deployment, password masked.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::deps::{MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::model::{Endpoint, PASSWORD_MASK};
use crate::store::DeploymentStore;

use super::resolve_deployment_id;

/// Dependencies for the show command
pub struct ShowDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Show command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct ShowArgs {
    /// Deployment uuid or name; defaults to the active deployment
    pub deployment: Option<String>,
}

/// Execute the show command with injected dependencies
pub fn execute_with_deps(args: ShowArgs, deps: &Arc<ShowDependencies>) -> Result<()> {
    let id = resolve_deployment_id(args.deployment.as_deref(), &deps.env_state)?;
    let record = deps.store.get(&id)?;

    let admin_value = record
        .admin
        .as_ref()
        .with_context(|| format!("deployment {} has no admin credentials", record.uuid))?;
    let admin = Endpoint::from_value(admin_value)?;

    deps.ui.print("");
    deps.ui.print_styled(
        &format!("Deployment {} ({})", record.name, record.uuid),
        MessageStyle::Bold,
    );
    render_endpoint(&admin, &deps.ui);
    Ok(())
}

fn render_endpoint(admin: &Endpoint, ui: &Arc<dyn UserInterface>) {
    let auth_url = &admin.auth_url;
    ui.print(&format!("  auth_url:       {auth_url}"));
    let username = &admin.username;
    ui.print(&format!("  username:       {username}"));
    // Never render the real password.
    ui.print(&format!("  password:       {PASSWORD_MASK}"));
    let tenant_name = admin.tenant_name.as_deref().unwrap_or("");
    ui.print(&format!("  tenant_name:    {tenant_name}"));
    let region_name = admin.region_name.as_deref().unwrap_or("");
    ui.print(&format!("  region_name:    {region_name}"));
    let endpoint_type = admin.endpoint_type;
    ui.print(&format!("  endpoint_type:  {endpoint_type}"));
}

/// Execute the show command with production dependencies
pub fn execute(args: ShowArgs) -> Result<()> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(ShowDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
