//! Host-wide deployment state: the active pointer and credential exports.
//!
//! The active-deployment pointer and the export files are shared,
//! host-wide mutable resources. Only the use command (and destroy of the
//! active deployment) may mutate them; safety relies on single-operator
//! CLI usage, not internal locking.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::Endpoint;

/// Environment variable holding the default deployment id.
pub const ACTIVE_ENV_VAR: &str = "STRATUS_DEPLOYMENT";

const GLOBALS_FILE: &str = "globals";
const OPENRC_LINK: &str = "openrc";

/// Durable per-host deployment state.
pub trait EnvState: Send + Sync {
    /// The deployment id commands fall back to when none is given.
    fn active_deployment(&self) -> Option<String>;

    /// Point the active-deployment pointer at `deployment_id`.
    fn set_active(&self, deployment_id: &str) -> Result<()>;

    /// Drop the pointer and the export files for `deployment_id`.
    fn clear_active(&self, deployment_id: &str) -> Result<()>;

    /// Regenerate the export file for `deployment_id` and repoint the
    /// stable `openrc` link at it.
    fn write_openrc(&self, deployment_id: &str, admin: &Endpoint) -> Result<()>;
}

/// Render the `export KEY=value` lines for one admin endpoint.
///
/// Block order is fixed so regenerated files are byte-stable: the core
/// auth quadruple, then the endpoint override, then the v3 domain pair
/// (emitted only when both names are present).
pub fn render_exports(admin: &Endpoint) -> String {
    let mut out = format!(
        "export OS_AUTH_URL={}\nexport OS_USERNAME={}\nexport OS_PASSWORD={}\nexport OS_TENANT_NAME={}\n",
        admin.auth_url,
        admin.username,
        admin.password,
        admin.tenant_name.as_deref().unwrap_or(""),
    );
    if let Some(endpoint) = &admin.endpoint {
        out.push_str(&format!("export OS_ENDPOINT={endpoint}\n"));
    }
    if let (Some(user_domain), Some(project_domain)) =
        (&admin.user_domain_name, &admin.project_domain_name)
    {
        out.push_str(&format!(
            "export OS_USER_DOMAIN_NAME={user_domain}\nexport OS_PROJECT_DOMAIN_NAME={project_domain}\n"
        ));
    }
    out
}

/// File-backed state under the data root (`~/.stratus`).
pub struct FileEnvState {
    root: PathBuf,
}

impl FileEnvState {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data root {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Self::new(home.join(".stratus"))
    }

    fn globals_path(&self) -> PathBuf {
        self.root.join(GLOBALS_FILE)
    }

    fn openrc_path(&self, deployment_id: &str) -> PathBuf {
        self.root.join(format!("openrc-{deployment_id}"))
    }

    fn link_path(&self) -> PathBuf {
        self.root.join(OPENRC_LINK)
    }

    fn read_globals(&self) -> Vec<(String, String)> {
        let Ok(raw) = fs::read_to_string(self.globals_path()) else {
            return Vec::new();
        };
        raw.lines()
            .filter_map(|line| {
                line.split_once('=')
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            })
            .collect()
    }

    /// Rewrite the globals file with `key` set to `value` (or removed),
    /// preserving every other entry.
    fn update_globals(&self, key: &str, value: Option<&str>) -> Result<()> {
        let mut entries = self.read_globals();
        entries.retain(|(k, _)| k != key);
        if let Some(value) = value {
            entries.push((key.to_string(), value.to_string()));
        }

        let mut body = String::new();
        for (k, v) in &entries {
            body.push_str(&format!("{k}={v}\n"));
        }
        fs::write(self.globals_path(), body)
            .with_context(|| format!("Failed to write {}", self.globals_path().display()))
    }

    fn remove_if_present(&self, path: &std::path::Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

impl EnvState for FileEnvState {
    fn active_deployment(&self) -> Option<String> {
        if let Ok(id) = std::env::var(ACTIVE_ENV_VAR) {
            if !id.is_empty() {
                return Some(id);
            }
        }
        self.read_globals()
            .into_iter()
            .find(|(k, _)| k == ACTIVE_ENV_VAR)
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
    }

    fn set_active(&self, deployment_id: &str) -> Result<()> {
        tracing::debug!(deployment_id, "updating active deployment pointer");
        self.update_globals(ACTIVE_ENV_VAR, Some(deployment_id))
    }

    fn clear_active(&self, deployment_id: &str) -> Result<()> {
        tracing::debug!(deployment_id, "clearing active deployment pointer");
        self.update_globals(ACTIVE_ENV_VAR, None)?;
        self.remove_if_present(&self.link_path())?;
        self.remove_if_present(&self.openrc_path(deployment_id))
    }

    fn write_openrc(&self, deployment_id: &str, admin: &Endpoint) -> Result<()> {
        let path = self.openrc_path(deployment_id);
        fs::write(&path, render_exports(admin))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        // Replace the stable link: drop the old target reference first so
        // re-running use against another deployment never leaves a stale
        // link behind.
        let link = self.link_path();
        if fs::symlink_metadata(&link).is_ok() {
            fs::remove_file(&link)
                .with_context(|| format!("Failed to remove {}", link.display()))?;
        }

        #[cfg(unix)]
        std::os::unix::fs::symlink(&path, &link)
            .with_context(|| format!("Failed to link {}", link.display()))?;
        #[cfg(not(unix))]
        fs::copy(&path, &link)
            .with_context(|| format!("Failed to copy to {}", link.display()))?;

        tracing::debug!(deployment_id, path = %path.display(), "export file regenerated");
        Ok(())
    }
}
