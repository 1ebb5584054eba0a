//! Unit tests for the config command

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::commands::config::*;
use crate::deps::UserInterface;
use crate::envstate::EnvState;
use crate::errors::CommandError;
use crate::model::DeploymentStatus;
use crate::store::DeploymentStore;
use crate::test_helpers::*;
use crate::ui::TestUserInterface;

struct TestFixture {
    store: MockDeploymentStoreMock,
    env_state: MockEnvStateMock,
    ui: Arc<TestUserInterface>,
}

impl TestFixture {
    fn new() -> Self {
        Self {
            store: MockDeploymentStoreMock::new(),
            env_state: MockEnvStateMock::new(),
            ui: Arc::new(TestUserInterface::new()),
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn to_deps(self) -> Arc<ConfigDependencies> {
        Arc::new(ConfigDependencies {
            store: Arc::new(self.store) as Arc<dyn DeploymentStore>,
            env_state: Arc::new(self.env_state) as Arc<dyn EnvState>,
            ui: self.ui as Arc<dyn UserInterface>,
        })
    }
}

#[test]
fn test_config_renders_sorted_indented_json() {
    let deployment_id = "fa4a423e-f15d-4d83-971a-89574f892999";
    let mut fixture = TestFixture::new();

    fixture
        .store
        .expect_get()
        .withf(move |id| id == deployment_id)
        .times(1)
        .returning(|id| {
            let mut record = test_deployment(id, "dep1", DeploymentStatus::DeployFinished);
            record.config = json!({"b": 1, "a": {"d": 2, "c": 3}});
            Ok(record)
        });

    let ui = fixture.ui.clone();
    let deps = fixture.to_deps();

    let result = execute_with_deps(
        ConfigArgs {
            deployment: Some(deployment_id.to_string()),
        },
        &deps,
    );
    assert!(result.is_ok());

    let expected = "{\n    \"a\": {\n        \"c\": 3,\n        \"d\": 2\n    },\n    \"b\": 1\n}";
    assert_eq!(ui.get_output(), vec![expected.to_string()]);
}

#[test]
fn test_config_no_deployment_id() {
    let mut fixture = TestFixture::new();

    fixture
        .env_state
        .expect_active_deployment()
        .times(1)
        .returning(|| None);

    let deps = fixture.to_deps();
    let err = execute_with_deps(ConfigArgs { deployment: None }, &deps).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::NoDeployment)
    ));
}

#[test]
fn test_to_pretty_sorted_orders_nested_keys() {
    let value = json!({"z": [1, 2], "m": {"b": true, "a": false}, "a": "x"});
    let rendered = to_pretty_sorted(&value).unwrap();

    let a = rendered.find("\"a\"").unwrap();
    let m = rendered.find("\"m\"").unwrap();
    let z = rendered.find("\"z\"").unwrap();
    assert!(a < m && m < z);
    assert!(rendered.contains("    \"m\": {\n        \"a\": false"));
}
