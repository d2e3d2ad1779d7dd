use crate::process::Invocation;
use std::fmt;
use std::path::{Path, PathBuf};

/// Worker runtime named by a unit's settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerRuntime {
    Node,
    Dotnet,
    Java,
    Other(String),
}

impl WorkerRuntime {
    pub fn parse(value: &str) -> Self {
        match value {
            "node" => WorkerRuntime::Node,
            "dotnet" => WorkerRuntime::Dotnet,
            "java" => WorkerRuntime::Java,
            other => WorkerRuntime::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WorkerRuntime::Node => "node",
            WorkerRuntime::Dotnet => "dotnet",
            WorkerRuntime::Java => "java",
            WorkerRuntime::Other(other) => other,
        }
    }

    /// Runtime identifier stored on a unit: node carries its version suffix.
    pub fn identifier(&self, node_version: Option<&str>) -> String {
        match (self, node_version) {
            (WorkerRuntime::Node, Some(version)) => format!("node{version}"),
            _ => self.as_str().to_string(),
        }
    }

    /// Build step for compiled runtimes; `None` when sources deploy as-is.
    pub fn build_step(&self) -> Option<BuildStep> {
        match self {
            WorkerRuntime::Dotnet => Some(BuildStep {
                program: "dotnet",
                args: &["build", "--output", "bin/publish"],
                output_dir: &["bin", "publish"],
            }),
            WorkerRuntime::Java => Some(BuildStep {
                program: "mvn",
                args: &["package"],
                output_dir: &["target", "azure-functions", "deployment"],
            }),
            _ => None,
        }
    }
}

impl fmt::Display for WorkerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStep {
    pub program: &'static str,
    pub args: &'static [&'static str],
    output_dir: &'static [&'static str],
}

impl BuildStep {
    pub fn invocation(&self, source_path: &Path) -> Invocation {
        Invocation::new(source_path, self.program, self.args.iter().copied())
    }

    /// Directory the toolchain leaves the publishable function tree in.
    pub fn output_path(&self, source_path: &Path) -> PathBuf {
        self.output_dir
            .iter()
            .fold(source_path.to_path_buf(), |path, part| path.join(part))
    }
}

/// Runtime name reported for a function, folding node 8 and 10 spellings.
pub fn reported_runtime(stored: &str) -> &str {
    if stored.starts_with("node8") || stored.starts_with("nodejs8") {
        "nodejs8"
    } else if stored.starts_with("node10") || stored.starts_with("nodejs10") {
        "nodejs10"
    } else {
        stored
    }
}
