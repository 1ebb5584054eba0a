//! Create a deployment record from a config file or the OS_* environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::deps::{EnvReader, FileSystem, MessageStyle, UserInterface};
use crate::envstate::EnvState;
use crate::errors::CommandError;
use crate::store::DeploymentStore;

use super::list::{self, ListDependencies};

const ENV_AUTH_URL: &str = "OS_AUTH_URL";
const ENV_USERNAME: &str = "OS_USERNAME";
const ENV_PASSWORD: &str = "OS_PASSWORD";
const ENV_TENANT_NAME: &str = "OS_TENANT_NAME";
const ENV_REGION_NAME: &str = "OS_REGION_NAME";
const ENV_ENDPOINT: &str = "OS_ENDPOINT";

/// Activation seam so `create --use` can hand off to the use workflow.
pub trait DeploymentActivator: Send + Sync {
    /// Make `deployment_id` the active deployment.
    fn activate(&self, deployment_id: &str) -> Result<i32>;
}

/// Dependencies for the create command
pub struct CreateDependencies {
    /// Deployment record store
    pub store: Arc<dyn DeploymentStore>,
    /// Host-wide deployment state
    pub env_state: Arc<dyn EnvState>,
    /// File system operations
    pub file_system: Arc<dyn FileSystem>,
    /// Process environment lookup
    pub env: Arc<dyn EnvReader>,
    /// Hand-off to the use workflow
    pub activator: Arc<dyn DeploymentActivator>,
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
}

/// Create command arguments (matches CLI parser)
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Name for the new deployment
    pub name: String,
    /// Path to a JSON config document; absent means build from OS_* vars
    pub filename: Option<PathBuf>,
    /// Activate the deployment once created
    pub do_use: bool,
}

/// Execute the create command with injected dependencies
pub fn execute_with_deps(args: CreateArgs, deps: &Arc<CreateDependencies>) -> Result<()> {
    let document = match &args.filename {
        Some(path) => read_config_file(path, &deps.file_system)?,
        None => config_from_env(&deps.env)?,
    };

    let record = deps.store.create(&document, &args.name)?;
    deps.ui.print_styled(
        &format!("✓ Created deployment {} ({})", record.name, record.uuid),
        MessageStyle::Success,
    );

    if args.do_use {
        let code = deps.activator.activate(&record.uuid)?;
        if code != 0 {
            deps.ui.print_styled(
                &format!("Could not switch to deployment {}", record.uuid),
                MessageStyle::Warning,
            );
        }
    }

    // Refresh the listing so the operator sees the new record in context.
    deps.ui.print("");
    list::execute_with_deps(&Arc::new(ListDependencies {
        store: deps.store.clone(),
        env_state: deps.env_state.clone(),
        ui: deps.ui.clone(),
    }))?;

    Ok(())
}

fn read_config_file(path: &Path, file_system: &Arc<dyn FileSystem>) -> Result<Value, CommandError> {
    if !file_system.exists(path) {
        return Err(CommandError::ConfigRead {
            path: path.to_path_buf(),
            reason: "no such file".to_string(),
        });
    }

    let raw = file_system
        .read_to_string(path)
        .map_err(|e| CommandError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    serde_json::from_str(&raw).map_err(|e| CommandError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Build an ExistingCloud config from the recognized OS_* variables.
///
/// Every absent required variable is reported in one error, not just the
/// first one encountered.
fn config_from_env(env: &Arc<dyn EnvReader>) -> Result<Value, CommandError> {
    let mut missing = Vec::new();
    let mut required = |key: &str| {
        env.var(key).unwrap_or_else(|| {
            missing.push(key.to_string());
            String::new()
        })
    };

    let auth_url = required(ENV_AUTH_URL);
    let username = required(ENV_USERNAME);
    let password = required(ENV_PASSWORD);
    let tenant_name = required(ENV_TENANT_NAME);
    if !missing.is_empty() {
        return Err(CommandError::MissingEnv(missing));
    }

    let mut document = serde_json::json!({
        "type": "ExistingCloud",
        "auth_url": auth_url,
        "admin": {
            "username": username,
            "password": password,
            "tenant_name": tenant_name,
        },
    });
    if let Some(region_name) = env.var(ENV_REGION_NAME) {
        document["region_name"] = Value::String(region_name);
    }
    if let Some(endpoint) = env.var(ENV_ENDPOINT) {
        document["endpoint"] = Value::String(endpoint);
    }
    Ok(document)
}

// Real activator delegating to the use command
struct RealDeploymentActivator;

impl DeploymentActivator for RealDeploymentActivator {
    fn activate(&self, deployment_id: &str) -> Result<i32> {
        super::activate::execute(super::activate::ActivateArgs {
            deployment: deployment_id.to_string(),
        })
    }
}

/// Execute the create command with production dependencies
pub fn execute(args: CreateArgs) -> Result<()> {
    use crate::deps::{RealEnvReader, RealFileSystem};
    use crate::envstate::FileEnvState;
    use crate::store::FileStore;
    use crate::ui::RealUserInterface;

    let deps = Arc::new(CreateDependencies {
        store: Arc::new(FileStore::open_default()?),
        env_state: Arc::new(FileEnvState::open_default()?),
        file_system: Arc::new(RealFileSystem),
        env: Arc::new(RealEnvReader),
        activator: Arc::new(RealDeploymentActivator),
        ui: Arc::new(RealUserInterface),
    });

    execute_with_deps(args, &deps)
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
