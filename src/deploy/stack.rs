use crate::deploy::deployment::DeploymentUnit;
use crate::deploy::discovery::subdirectories;
use crate::deploy::error::{DeployError, Result};
use crate::deploy::function::FunctionDescriptor;
use crate::process::CommandRunner;
use crate::types::manifest::{read_json, StackIdentity};
use crate::types::StackLayout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// First unit that failed during the deploy phase of a stack deploy.
#[derive(Debug)]
pub struct UnitFailure {
    pub index: usize,
    pub unit: String,
    pub error: DeployError,
}

/// All deployment units found under one root directory.
#[derive(Debug)]
pub struct Stack {
    identity: StackIdentity,
    root: PathBuf,
    layout: Arc<StackLayout>,
    units: Vec<DeploymentUnit>,
}

impl Stack {
    /// Reads the stack identity and discovers every deployment unit under
    /// `root`, building compiled units along the way.
    pub async fn load(
        root: &Path,
        layout: StackLayout,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        layout.validate()?;
        let layout = Arc::new(layout);
        let identity: StackIdentity = read_json(&root.join(&layout.stack_config_file))?;
        info!(
            "Loading stack {} ({}/{}) from {}",
            identity.name,
            identity.project,
            identity.stage,
            root.display()
        );

        let mut units = Vec::new();
        for directory in subdirectories(root)? {
            if !directory.join(&layout.template_file).is_file() {
                debug!("Skipping {}: no infrastructure template", directory.display());
                continue;
            }
            let unit = DeploymentUnit::load(
                &directory,
                &identity,
                Arc::clone(&layout),
                Arc::clone(&runner),
            )
            .await?;
            units.push(unit);
        }

        let stack = Self {
            identity,
            root: root.to_path_buf(),
            layout,
            units,
        };
        info!(
            "Stack {} has {} deployments and {} functions",
            stack.name(),
            stack.units.len(),
            stack.functions().count()
        );
        Ok(stack)
    }

    pub fn identity(&self) -> &StackIdentity {
        &self.identity
    }

    pub fn stack_id(&self) -> &str {
        &self.identity.name
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn location(&self) -> &str {
        &self.identity.location
    }

    pub fn project(&self) -> &str {
        &self.identity.project
    }

    pub fn stage(&self) -> &str {
        &self.identity.stage
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    pub fn units(&self) -> &[DeploymentUnit] {
        &self.units
    }

    /// Every function of every unit, in discovery order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> + '_ {
        self.units.iter().flat_map(|unit| unit.functions().iter())
    }

    pub fn deployed_units(&self) -> impl Iterator<Item = &DeploymentUnit> + '_ {
        self.units.iter().filter(|unit| unit.is_deployed())
    }

    /// Deploys every unit in order; on the first failure the units that
    /// already hold resources are removed again.
    pub async fn deploy_stack(&mut self) -> Result<()> {
        info!("Deploying stack {}", self.name());
        match self.deploy_units().await {
            Ok(()) => {
                info!("Stack {} deployed", self.name());
                Ok(())
            }
            Err(failure) => Err(self.rollback(failure).await),
        }
    }

    /// Deploy phase: stops at the first failing unit and never touches the
    /// units after it.
    pub async fn deploy_units(&mut self) -> std::result::Result<(), UnitFailure> {
        for (index, unit) in self.units.iter_mut().enumerate() {
            if let Err(error) = unit.deploy().await {
                error!("Deployment {} failed: {}", unit.name(), error);
                return Err(UnitFailure {
                    index,
                    unit: unit.name().to_string(),
                    error,
                });
            }
        }
        Ok(())
    }

    /// Rollback phase: removes every deployed unit and folds the cleanup
    /// outcome into the error returned to the caller.
    pub async fn rollback(&mut self, failure: UnitFailure) -> DeployError {
        warn!(
            "Rolling back stack {} after deployment {} failed",
            self.name(),
            failure.unit
        );
        let cleanup = self.remove_stack().await;
        combine_failure(failure.error, cleanup)
    }

    /// Removes every deployed unit in discovery order, stopping at the
    /// first removal that fails.
    pub async fn remove_stack(&mut self) -> Result<()> {
        for unit in self.units.iter_mut().filter(|unit| unit.is_deployed()) {
            unit.remove().await?;
        }
        Ok(())
    }
}

/// Error reported for a failed stack deploy given the rollback outcome.
pub fn combine_failure(deploy: DeployError, cleanup: Result<()>) -> DeployError {
    match cleanup {
        Ok(()) => deploy,
        Err(cleanup) => {
            error!("Rollback failed: {}", cleanup);
            DeployError::RollbackFailed {
                deploy: Box::new(deploy),
                cleanup: Box::new(cleanup),
            }
        }
    }
}
