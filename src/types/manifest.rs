//! On-disk JSON documents read during discovery.

use crate::deploy::error::{DeployError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reads and deserializes a JSON document, naming the file in any error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|source| DeployError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DeployError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Identity of a stack, read from the stack root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackIdentity {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub stage: String,
}

/// A unit's `local.settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    #[serde(rename = "IsEncrypted", default)]
    pub is_encrypted: bool,
    #[serde(rename = "Values")]
    pub values: SettingsValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsValues {
    #[serde(rename = "FUNCTIONS_WORKER_RUNTIME")]
    pub worker_runtime: String,
    #[serde(rename = "WEBSITE_NODE_DEFAULT_VERSION", default)]
    pub node_default_version: Option<String>,
    #[serde(rename = "AzureWebJobsStorage", default)]
    pub storage_connection: Option<String>,
}

impl SettingsValues {
    pub fn node_version(&self) -> Option<&str> {
        self.node_default_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// A function's `function.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionManifest {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(rename = "entryPoint", default)]
    pub entry_point: String,
    #[serde(rename = "scriptFile", default)]
    pub script_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    #[serde(rename = "type", default)]
    pub binding_type: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "authLevel", default, skip_serializing_if = "Option::is_none")]
    pub auth_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_with_node_version() {
        let settings: DeploymentSettings = serde_json::from_str(
            r#"{
                "IsEncrypted": false,
                "Values": {
                    "FUNCTIONS_WORKER_RUNTIME": "node",
                    "WEBSITE_NODE_DEFAULT_VERSION": "10",
                    "AzureWebJobsStorage": "UseDevelopmentStorage=true"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.values.worker_runtime, "node");
        assert_eq!(settings.values.node_version(), Some("10"));
    }

    #[test]
    fn test_blank_node_version_is_absent() {
        let values = SettingsValues {
            worker_runtime: "node".to_string(),
            node_default_version: Some("  ".to_string()),
            storage_connection: None,
        };
        assert_eq!(values.node_version(), None);
    }

    #[test]
    fn test_function_manifest_tolerates_missing_fields() {
        let manifest: FunctionManifest = serde_json::from_str(
            r#"{"bindings": [{"type": "httpTrigger", "direction": "in", "name": "req", "authLevel": "anonymous"}]}"#,
        )
        .unwrap();
        assert!(!manifest.disabled);
        assert_eq!(manifest.entry_point, "");
        assert_eq!(manifest.bindings.len(), 1);
        assert_eq!(manifest.bindings[0].auth_level.as_deref(), Some("anonymous"));
    }

    #[test]
    fn test_read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = read_json::<StackIdentity>(&path).unwrap_err();
        assert!(matches!(error, DeployError::ConfigParse { .. }));
        assert!(error.to_string().contains("stack.json"));

        let missing = read_json::<StackIdentity>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, DeployError::ConfigRead { .. }));
    }
}
