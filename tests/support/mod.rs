//! Builders for on-disk stack trees used by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a stack root with deployment units and function directories
pub struct StackFixture {
    dir: TempDir,
}

impl StackFixture {
    pub fn new(name: &str, location: &str) -> Self {
        let dir = tempfile::tempdir().expect("create stack root");
        let stack = serde_json::json!({
            "name": name,
            "location": location,
            "project": "bench",
            "stage": "ci",
        });
        std::fs::write(dir.path().join("stack.json"), stack.to_string()).expect("write stack.json");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Adds a unit with an infrastructure template and the given runtime.
    pub fn unit(&self, name: &str, runtime: &str, node_version: Option<&str>) -> UnitFixture {
        let path = self.root().join(name);
        std::fs::create_dir_all(&path).expect("create unit dir");
        std::fs::write(path.join("template.json"), r#"{"resources": []}"#).expect("write template");

        let mut values = serde_json::json!({
            "FUNCTIONS_WORKER_RUNTIME": runtime,
            "AzureWebJobsStorage": "UseDevelopmentStorage=true",
        });
        if let Some(version) = node_version {
            values["WEBSITE_NODE_DEFAULT_VERSION"] = serde_json::json!(version);
        }
        let settings = serde_json::json!({ "IsEncrypted": false, "Values": values });
        std::fs::write(path.join("local.settings.json"), settings.to_string())
            .expect("write settings");
        UnitFixture { path }
    }

    /// Adds a subdirectory that is not a deployment unit.
    pub fn plain_dir(&self, name: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::create_dir_all(&path).expect("create plain dir");
        path
    }
}

pub struct UnitFixture {
    pub path: PathBuf,
}

impl UnitFixture {
    pub fn function(&self, name: &str, entry_point: &str) -> &Self {
        let dir = self.path.join(name);
        std::fs::create_dir_all(&dir).expect("create function dir");
        let manifest = serde_json::json!({
            "disabled": false,
            "bindings": [
                {"type": "httpTrigger", "direction": "in", "name": "req", "authLevel": "anonymous"},
                {"type": "http", "direction": "out", "name": "res"}
            ],
            "entryPoint": entry_point,
            "scriptFile": "index.js",
        });
        std::fs::write(dir.join("function.json"), manifest.to_string()).expect("write manifest");
        self
    }

    pub fn non_function_dir(&self, name: &str) -> &Self {
        std::fs::create_dir_all(self.path.join(name)).expect("create dir");
        self
    }
}
