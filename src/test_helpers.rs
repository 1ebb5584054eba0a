//! Test helper utilities and mock implementations

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use serde_json::{Value, json};

use crate::deps::{EnvReader, FileSystem};
use crate::envstate::EnvState;
use crate::errors::{StoreError, VerifyError};
use crate::model::{Deployment, DeploymentStatus, Endpoint};
use crate::store::DeploymentStore;
use crate::verify::CloudVerifier;

// Mock implementations using mockall

mock! {
    pub DeploymentStoreMock {}

    impl DeploymentStore for DeploymentStoreMock {
        fn create(&self, config: &Value, name: &str) -> Result<Deployment, StoreError>;
        fn recreate(&self, deployment_id: &str) -> Result<Deployment, StoreError>;
        fn get(&self, id_or_name: &str) -> Result<Deployment, StoreError>;
        fn list(&self) -> Result<Vec<Deployment>, StoreError>;
        fn update_status(&self, deployment_id: &str, status: DeploymentStatus) -> Result<(), StoreError>;
        fn destroy(&self, deployment_id: &str) -> Result<(), StoreError>;
    }
}

mock! {
    pub EnvStateMock {}

    impl EnvState for EnvStateMock {
        fn active_deployment(&self) -> Option<String>;
        fn set_active(&self, deployment_id: &str) -> Result<()>;
        fn clear_active(&self, deployment_id: &str) -> Result<()>;
        fn write_openrc(&self, deployment_id: &str, admin: &Endpoint) -> Result<()>;
    }
}

mock! {
    pub CloudVerifierMock {}

    #[async_trait]
    impl CloudVerifier for CloudVerifierMock {
        async fn verify(&self, endpoint: &Endpoint) -> Result<(), VerifyError>;
    }
}

mock! {
    pub FileSystemMock {}

    impl FileSystem for FileSystemMock {
        fn exists(&self, path: &Path) -> bool;
        fn read_to_string(&self, path: &Path) -> Result<String>;
    }
}

mock! {
    pub EnvReaderMock {}

    impl EnvReader for EnvReaderMock {
        fn var(&self, key: &str) -> Option<String>;
    }
}

/// Deterministic creation timestamp, offset by `day` for ordering tests.
pub fn test_created_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 12, day, 10, 0, 0).unwrap()
}

/// Helper to create a stored admin credential block
pub fn test_admin_value() -> Value {
    json!({
        "auth_url": "http://192.168.1.1:5000/v2.0",
        "username": "admin",
        "password": "adminpass",
        "tenant_name": "demo",
        "region_name": null,
        "endpoint": "http://192.168.1.1:35357/v2.0",
    })
}

/// Helper to create a finished deployment record
pub fn test_deployment(uuid: &str, name: &str, status: DeploymentStatus) -> Deployment {
    Deployment {
        uuid: uuid.to_string(),
        name: name.to_string(),
        status,
        created_at: test_created_at(3),
        config: json!({
            "type": "ExistingCloud",
            "auth_url": "http://192.168.1.1:5000/v2.0",
            "admin": {
                "username": "admin",
                "password": "adminpass",
                "tenant_name": "demo",
            },
        }),
        admin: Some(test_admin_value()),
        users: Vec::new(),
    }
}
