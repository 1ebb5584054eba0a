//! Unit tests for the check command

use std::sync::Arc;

use serde_json::json;

use crate::commands::check::*;
use crate::deps::UserInterface;
use crate::envstate::EnvState;
use crate::errors::{StoreError, VerifyError};
use crate::model::DeploymentStatus;
use crate::store::DeploymentStore;
use crate::test_helpers::*;
use crate::ui::TestUserInterface;
use crate::verify::CloudVerifier;

struct TestFixture {
    store: MockDeploymentStoreMock,
    env_state: MockEnvStateMock,
    verifier: MockCloudVerifierMock,
    ui: Arc<TestUserInterface>,
}

impl TestFixture {
    fn new() -> Self {
        Self {
            store: MockDeploymentStoreMock::new(),
            env_state: MockEnvStateMock::new(),
            verifier: MockCloudVerifierMock::new(),
            ui: Arc::new(TestUserInterface::new()),
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn to_deps(self) -> Arc<CheckDependencies> {
        Arc::new(CheckDependencies {
            store: Arc::new(self.store) as Arc<dyn DeploymentStore>,
            env_state: Arc::new(self.env_state) as Arc<dyn EnvState>,
            verifier: Arc::new(self.verifier) as Arc<dyn CloudVerifier>,
            ui: self.ui as Arc<dyn UserInterface>,
        })
    }
}

fn args(deployment: &str) -> CheckArgs {
    CheckArgs {
        deployment: Some(deployment.to_string()),
    }
}

#[tokio::test]
async fn test_check_verifies_admin_and_users() {
    let deployment_id = "e87e4dca-b515-4477-888d-5f6103f13b42";
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .withf(move |id| id == deployment_id)
        .times(1)
        .returning(|id| {
            let mut record = test_deployment(id, "dep1", DeploymentStatus::DeployFinished);
            record.users = vec![test_admin_value()];
            Ok(record)
        });
    fixture
        .verifier
        .expect_verify()
        .withf(|endpoint| endpoint.auth_url == "http://192.168.1.1:5000/v2.0")
        .times(2)
        .returning(|_| Ok(()));

    let ui = fixture.ui.clone();
    let deps = fixture.to_deps();

    let code = execute_with_deps(args(deployment_id), &deps).await.unwrap();
    assert_eq!(code, 0);

    let output = ui.get_output();
    assert!(output.iter().any(|s| s.contains("admin: reachable")));
    assert!(output.iter().any(|s| s.contains("user 0: reachable")));
}

#[tokio::test]
async fn test_check_unknown_deployment_returns_1() {
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .times(1)
        .returning(|id| Err(StoreError::NotFound(id.to_string())));

    let deps = fixture.to_deps();
    let code = execute_with_deps(args("e87e4dca-b515-4477-888d-5f6103f13b42"), &deps)
        .await
        .unwrap();
    assert_eq!(code, 1);
}

#[tokio::test]
async fn test_check_unreachable_cloud_returns_1() {
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .times(1)
        .returning(|id| Ok(test_deployment(id, "dep1", DeploymentStatus::DeployFinished)));
    // A refused connection is an expected operational failure: swallowed,
    // reported, folded into the exit code.
    fixture
        .verifier
        .expect_verify()
        .times(1)
        .returning(|_| Err(VerifyError::Unreachable("connection refused".to_string())));

    let ui = fixture.ui.clone();
    let deps = fixture.to_deps();

    let code = execute_with_deps(args("uuid"), &deps).await.unwrap();
    assert_eq!(code, 1);
    assert!(
        ui.get_output()
            .iter()
            .any(|s| s.contains("connection refused"))
    );
}

#[tokio::test]
async fn test_check_rejected_credentials_return_1() {
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .times(1)
        .returning(|id| Ok(test_deployment(id, "dep1", DeploymentStatus::DeployFinished)));
    fixture
        .verifier
        .expect_verify()
        .times(1)
        .returning(|_| Err(VerifyError::Unauthorized("rejected".to_string())));

    let deps = fixture.to_deps();
    assert_eq!(execute_with_deps(args("uuid"), &deps).await.unwrap(), 1);
}

#[tokio::test]
async fn test_check_malformed_endpoint_data_raises() {
    let mut fixture = TestFixture::new();

    fixture.store.expect_get().times(1).returning(|id| {
        let mut record = test_deployment(id, "dep1", DeploymentStatus::DeployFinished);
        let mut admin = test_admin_value();
        admin["not-exist-key"] = json!("error");
        record.admin = Some(admin);
        Ok(record)
    });
    // The verifier is never consulted for corrupt records.

    let deps = fixture.to_deps();
    let err = execute_with_deps(args("uuid"), &deps).await.unwrap_err();
    assert!(err.to_string().contains("malformed endpoint data"));
}

#[tokio::test]
async fn test_check_unexpected_verifier_failure_propagates() {
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .times(1)
        .returning(|id| Ok(test_deployment(id, "dep1", DeploymentStatus::DeployFinished)));
    fixture
        .verifier
        .expect_verify()
        .times(1)
        .returning(|_| Err(VerifyError::Unexpected("bad endpoint url".to_string())));

    let deps = fixture.to_deps();
    let err = execute_with_deps(args("uuid"), &deps).await.unwrap_err();
    assert!(err.to_string().contains("verification failed"));
}

#[tokio::test]
async fn test_check_falls_back_to_active_deployment() {
    let mut fixture = TestFixture::new();

    fixture
        .env_state
        .expect_active_deployment()
        .times(1)
        .returning(|| Some("active-uuid".to_string()));
    fixture
        .store
        .expect_get()
        .withf(|id| id == "active-uuid")
        .times(1)
        .returning(|id| Ok(test_deployment(id, "dep1", DeploymentStatus::DeployFinished)));
    fixture
        .verifier
        .expect_verify()
        .times(1)
        .returning(|_| Ok(()));

    let deps = fixture.to_deps();
    assert_eq!(
        execute_with_deps(CheckArgs { deployment: None }, &deps)
            .await
            .unwrap(),
        0
    );
}
