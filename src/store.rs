//! Deployment record persistence.
//!
//! The store exclusively owns persisted records; commands always
//! re-fetch before mutating. `FileStore` keeps one JSON document per
//! deployment under the data root and runs the status state machine on
//! create/recreate/destroy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::model::{Deployment, DeploymentConfig, DeploymentStatus};

/// Persistence operations for deployment records.
///
/// `get` accepts either a uuid or a human name; disambiguation is the
/// store's job.
pub trait DeploymentStore: Send + Sync {
    /// Create a record for `config` and run the deploy workflow.
    fn create(&self, config: &Value, name: &str) -> Result<Deployment, StoreError>;

    /// Re-run the deploy workflow against a record's stored config,
    /// preserving its uuid.
    fn recreate(&self, deployment_id: &str) -> Result<Deployment, StoreError>;

    /// Fetch a record by uuid or name.
    fn get(&self, id_or_name: &str) -> Result<Deployment, StoreError>;

    /// Enumerate all records, in no particular order.
    fn list(&self) -> Result<Vec<Deployment>, StoreError>;

    /// Overwrite a record's lifecycle status.
    fn update_status(
        &self,
        deployment_id: &str,
        status: DeploymentStatus,
    ) -> Result<(), StoreError>;

    /// Run the cleanup workflow and remove the record.
    fn destroy(&self, deployment_id: &str) -> Result<(), StoreError>;
}

/// File-backed store keeping one JSON document per deployment.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open the store under the user's data root (`~/.stratus/deployments`).
    pub fn open_default() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        Self::new(home.join(".stratus").join("deployments"))
    }

    fn record_path(&self, uuid: &str) -> PathBuf {
        self.root.join(format!("{uuid}.json"))
    }

    fn load(&self, path: &Path) -> Result<Deployment, StoreError> {
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    fn save(&self, record: &Deployment) -> Result<(), StoreError> {
        fs::write(
            self.record_path(&record.uuid),
            serde_json::to_vec_pretty(record)?,
        )?;
        Ok(())
    }

    /// Drive a record through deploy->started and into finished or failed.
    ///
    /// A failed config validation leaves the record behind in
    /// deploy->failed so the operator can inspect it and retry with
    /// recreate.
    fn deploy(&self, mut record: Deployment, config: &Value) -> Result<Deployment, StoreError> {
        record.status = DeploymentStatus::DeployStarted;
        self.save(&record)?;
        tracing::debug!(uuid = %record.uuid, name = %record.name, "deployment started");

        match DeploymentConfig::from_value(config) {
            Ok(parsed) => {
                let (admin, users) = parsed.endpoints()?;
                record.admin = Some(admin);
                record.users = users;
                record.status = DeploymentStatus::DeployFinished;
                self.save(&record)?;
                tracing::debug!(uuid = %record.uuid, "deployment finished");
                Ok(record)
            }
            Err(reason) => {
                record.status = DeploymentStatus::DeployFailed;
                self.save(&record)?;
                tracing::debug!(uuid = %record.uuid, %reason, "deployment failed");
                Err(StoreError::InvalidConfig(reason))
            }
        }
    }
}

impl DeploymentStore for FileStore {
    fn create(&self, config: &Value, name: &str) -> Result<Deployment, StoreError> {
        if self.list()?.iter().any(|d| d.name == name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let record = Deployment {
            uuid: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: DeploymentStatus::DeployInit,
            created_at: Utc::now(),
            config: config.clone(),
            admin: None,
            users: Vec::new(),
        };
        self.save(&record)?;

        self.deploy(record, config)
    }

    fn recreate(&self, deployment_id: &str) -> Result<Deployment, StoreError> {
        let mut record = self.get(deployment_id)?;
        record.status = DeploymentStatus::DeployInit;
        record.admin = None;
        record.users.clear();
        self.save(&record)?;

        let config = record.config.clone();
        self.deploy(record, &config)
    }

    fn get(&self, id_or_name: &str) -> Result<Deployment, StoreError> {
        let path = self.record_path(id_or_name);
        if path.is_file() {
            return self.load(&path);
        }

        self.list()?
            .into_iter()
            .find(|d| d.name == id_or_name)
            .ok_or_else(|| StoreError::NotFound(id_or_name.to_string()))
    }

    fn list(&self) -> Result<Vec<Deployment>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                records.push(self.load(&path)?);
            }
        }
        Ok(records)
    }

    fn update_status(
        &self,
        deployment_id: &str,
        status: DeploymentStatus,
    ) -> Result<(), StoreError> {
        let mut record = self.get(deployment_id)?;
        record.status = status;
        self.save(&record)
    }

    fn destroy(&self, deployment_id: &str) -> Result<(), StoreError> {
        let mut record = self.get(deployment_id)?;
        record.status = DeploymentStatus::CleanupStarted;
        self.save(&record)?;
        tracing::debug!(uuid = %record.uuid, "cleanup started");

        record.status = DeploymentStatus::CleanupFinished;
        self.save(&record)?;

        fs::remove_file(self.record_path(&record.uuid))?;
        tracing::debug!(uuid = %record.uuid, "record removed");
        Ok(())
    }
}
