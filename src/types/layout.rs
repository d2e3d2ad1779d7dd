//! Fixed names and constants that shape stack discovery and deployment.

use crate::deploy::error::{DeployError, Result};
use crate::deploy::retry::RetryPolicy;
use crate::types::manifest::read_json;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable discovery and deployment settings shared by every unit of a stack.
///
/// The defaults describe an Azure Functions project tree; a JSON file with
/// any subset of these fields can override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayout {
    /// Stack identity file at the stack root.
    pub stack_config_file: String,
    /// Per-unit settings file naming the worker runtime.
    pub settings_file: String,
    /// Infrastructure template whose presence marks a deployment unit.
    pub template_file: String,
    /// Per-function manifest inside a unit's build output.
    pub function_manifest_file: String,
    /// Memory size reported for every function, in MB.
    pub function_memory_size: String,
    /// Appended to the generated function app name to name its resource group.
    pub resource_group_suffix: String,
    /// Host suffix of published function apps.
    pub provider_domain: String,
    pub publish_retry: RetryPolicy,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            stack_config_file: "stack.json".to_string(),
            settings_file: "local.settings.json".to_string(),
            template_file: "template.json".to_string(),
            function_manifest_file: "function.json".to_string(),
            function_memory_size: "1536".to_string(),
            resource_group_suffix: "-faastestrg".to_string(),
            provider_domain: "azurewebsites.net".to_string(),
            publish_retry: RetryPolicy::default(),
        }
    }
}

impl StackLayout {
    pub fn from_file(path: &Path) -> Result<Self> {
        let layout: StackLayout = read_json(path)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn with_publish_retry(mut self, policy: RetryPolicy) -> Self {
        self.publish_retry = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let file_names = [
            ("stack_config_file", &self.stack_config_file),
            ("settings_file", &self.settings_file),
            ("template_file", &self.template_file),
            ("function_manifest_file", &self.function_manifest_file),
        ];
        for (field, value) in file_names {
            if value.trim().is_empty() {
                return Err(DeployError::Configuration(format!("{field} must not be empty")));
            }
        }
        if self.provider_domain.trim().is_empty() {
            return Err(DeployError::Configuration(
                "provider_domain must not be empty".to_string(),
            ));
        }
        if self.publish_retry.max_attempts == 0 {
            return Err(DeployError::Configuration(
                "publish_retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_azure_functions_layout() {
        let layout = StackLayout::default();
        assert_eq!(layout.template_file, "template.json");
        assert_eq!(layout.function_memory_size, "1536");
        assert_eq!(layout.publish_retry.max_attempts, 11);
        assert_eq!(layout.publish_retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_partial_override_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{"provider_domain": "example.net", "publish_retry": {"max_attempts": 3, "delay_secs": 1}}"#,
        )
        .unwrap();

        let layout = StackLayout::from_file(&path).unwrap();
        assert_eq!(layout.provider_domain, "example.net");
        assert_eq!(layout.publish_retry.max_attempts, 3);
        assert_eq!(layout.publish_retry.delay, Duration::from_secs(1));
        assert_eq!(layout.settings_file, "local.settings.json");
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let layout = StackLayout::default().with_publish_retry(RetryPolicy::new(0, Duration::ZERO));
        assert!(matches!(
            layout.validate(),
            Err(DeployError::Configuration(_))
        ));
    }
}
