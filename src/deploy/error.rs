use crate::process::CommandError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Provisioning step that failed inside a unit deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    ResourceGroup,
    Infrastructure,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionStep::ResourceGroup => f.write_str("resource group"),
            ProvisionStep::Infrastructure => f.write_str("infrastructure template"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to scan {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Build failed for deployment {unit}: {source}")]
    BuildFailed {
        unit: String,
        #[source]
        source: CommandError,
    },

    #[error("Creating {step} failed for deployment {unit}: {source}")]
    ProvisionFailed {
        unit: String,
        step: ProvisionStep,
        #[source]
        source: CommandError,
    },

    #[error("Publishing functions of deployment {unit} failed after {attempts} attempts: {source}")]
    PublishFailed {
        unit: String,
        attempts: u32,
        #[source]
        source: CommandError,
    },

    #[error("Removing deployment {unit} failed: {source}")]
    TeardownFailed {
        unit: String,
        #[source]
        source: CommandError,
    },

    #[error("Deployment {unit} is already deployed")]
    AlreadyDeployed { unit: String },

    #[error("Deployment {unit} has no resource group to remove")]
    NotDeployed { unit: String },

    #[error("deploy error: {deploy}, cleanup error: {cleanup}")]
    RollbackFailed {
        deploy: Box<DeployError>,
        cleanup: Box<DeployError>,
    },
}

impl DeployError {
    /// Name of the deployment unit the error is about, if any.
    pub fn unit(&self) -> Option<&str> {
        match self {
            DeployError::BuildFailed { unit, .. }
            | DeployError::ProvisionFailed { unit, .. }
            | DeployError::PublishFailed { unit, .. }
            | DeployError::TeardownFailed { unit, .. }
            | DeployError::AlreadyDeployed { unit }
            | DeployError::NotDeployed { unit } => Some(unit.as_str()),
            DeployError::RollbackFailed { deploy, .. } => deploy.unit(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
