use crate::types::manifest::FunctionManifest;
use crate::types::runtime::reported_runtime;
use crate::types::StackLayout;
use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
use tracing::warn;
use url::Url;

/// One externally invocable function of a deployment unit.
///
/// Immutable after discovery except for the function app name, which the
/// owning unit fills in each time it generates a new deployment identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    display_name: String,
    handler: String,
    script_file: String,
    disabled: bool,
    binding_count: usize,
    runtime: String,
    memory_size: String,
    provider_domain: String,
    function_app_name: Option<String>,
}

impl FunctionDescriptor {
    pub fn new(
        display_name: impl Into<String>,
        manifest: &FunctionManifest,
        runtime: impl Into<String>,
        layout: &StackLayout,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            handler: manifest.entry_point.clone(),
            script_file: manifest.script_file.clone(),
            disabled: manifest.disabled,
            binding_count: manifest.bindings.len(),
            runtime: runtime.into(),
            memory_size: layout.function_memory_size.clone(),
            provider_domain: layout.provider_domain.clone(),
            function_app_name: None,
        }
    }

    /// Descriptor for a function directory; the directory name becomes the
    /// UpperCamel display name.
    pub fn from_directory(
        directory_name: &str,
        manifest: &FunctionManifest,
        runtime: impl Into<String>,
        layout: &StackLayout,
    ) -> Self {
        Self::new(directory_name.to_upper_camel_case(), manifest, runtime, layout)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// URL and resource safe name, e.g. `my-function`.
    pub fn name(&self) -> String {
        self.display_name.to_kebab_case()
    }

    /// Human readable name, e.g. `my function`.
    pub fn description(&self) -> String {
        self.display_name.to_snake_case().replace('_', " ")
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn script_file(&self) -> &str {
        &self.script_file
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn binding_count(&self) -> usize {
        self.binding_count
    }

    pub fn runtime(&self) -> &str {
        reported_runtime(&self.runtime)
    }

    /// Runtime identifier exactly as inherited from the owning unit.
    pub fn unit_runtime(&self) -> &str {
        &self.runtime
    }

    pub fn memory_size(&self) -> &str {
        &self.memory_size
    }

    pub fn function_app_name(&self) -> Option<&str> {
        self.function_app_name.as_deref()
    }

    /// Public invocation URL; `None` until the owning unit has been deployed,
    /// or when the app name does not form a valid host (logged as a warning).
    pub fn invoke_url(&self) -> Option<Url> {
        let app = self.function_app_name.as_deref()?;
        let raw = format!("https://{}.{}/api/{}", app, self.provider_domain, self.name());
        match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    "Function {} of app {} has no valid invocation URL ({}): {}",
                    self.display_name, app, raw, e
                );
                None
            }
        }
    }

    pub(crate) fn assign_function_app(&mut self, function_app_name: &str) {
        self.function_app_name = Some(function_app_name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> FunctionDescriptor {
        let manifest = FunctionManifest {
            entry_point: "Company.Functions.Run".to_string(),
            ..FunctionManifest::default()
        };
        FunctionDescriptor::new(name, &manifest, "node10", &StackLayout::default())
    }

    #[test]
    fn test_url_and_description_casing() {
        let mut function = descriptor("My Function");
        assert_eq!(function.invoke_url(), None);

        function.assign_function_app("app123");
        assert_eq!(
            function.invoke_url().unwrap().as_str(),
            "https://app123.azurewebsites.net/api/my-function"
        );
        assert_eq!(function.name(), "my-function");
        assert_eq!(function.description(), "my function");
    }

    #[test]
    fn test_unparseable_host_has_no_url_but_keeps_app_name() {
        let mut function = descriptor("Echo");
        function.assign_function_app("bad app");
        assert_eq!(function.function_app_name(), Some("bad app"));
        assert_eq!(function.invoke_url(), None);
    }

    #[test]
    fn test_directory_names_become_upper_camel() {
        let manifest = FunctionManifest::default();
        let function = FunctionDescriptor::from_directory(
            "http_trigger-echo",
            &manifest,
            "dotnet",
            &StackLayout::default(),
        );
        assert_eq!(function.display_name(), "HttpTriggerEcho");
        assert_eq!(function.name(), "http-trigger-echo");
        assert_eq!(function.description(), "http trigger echo");
    }

    #[test]
    fn test_reports_normalized_runtime_and_fixed_memory() {
        let function = descriptor("Echo");
        assert_eq!(function.runtime(), "nodejs10");
        assert_eq!(function.unit_runtime(), "node10");
        assert_eq!(function.memory_size(), "1536");
        assert_eq!(function.handler(), "Company.Functions.Run");
    }
}
