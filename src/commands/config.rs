//! Print a deployment's stored configuration as canonical JSON.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::deps::UserInterface;
use crate::envstate::EnvState;
use crate::store::DeploymentStore;

use super::resolve_deployment_id;

/// Dependencies for the config command
pub struct ConfigDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Config command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct ConfigArgs {
    /// Deployment uuid or name; defaults to the active deployment
    pub deployment: Option<String>,
}

/// Execute the config command with injected dependencies
pub fn execute_with_deps(args: ConfigArgs, deps: &Arc<ConfigDependencies>) -> Result<()> {
    let id = resolve_deployment_id(args.deployment.as_deref(), &deps.env_state)?;
    let record = deps.store.get(&id)?;

    deps.ui.print(&to_pretty_sorted(&record.config)?);
    Ok(())
}

/// Render with a 4-space indent. Object keys come out sorted because
/// `serde_json::Map` keeps them ordered.
pub(crate) fn to_pretty_sorted(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Execute the config command with production dependencies
pub fn execute(args: ConfigArgs) -> Result<()> {
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(ConfigDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
