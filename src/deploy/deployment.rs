use crate::deploy::discovery::subdirectories;
use crate::deploy::error::{DeployError, ProvisionStep, Result};
use crate::deploy::function::FunctionDescriptor;
use crate::process::{CommandRunner, Invocation};
use crate::types::manifest::{read_json, DeploymentSettings, FunctionManifest, StackIdentity};
use crate::types::{StackLayout, WorkerRuntime};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// How far the last deploy attempt of a unit got.
///
/// Everything past `NotDeployed` means a resource group exists and must be
/// removed on rollback, even when later steps failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    NotDeployed,
    GroupCreated,
    InfrastructureDeployed,
    Published,
}

impl DeploymentState {
    pub fn is_deployed(&self) -> bool {
        !matches!(self, DeploymentState::NotDeployed)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DeploymentState::Published)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeploymentState::NotDeployed => "not deployed",
            DeploymentState::GroupCreated => "resource group created",
            DeploymentState::InfrastructureDeployed => "infrastructure deployed",
            DeploymentState::Published => "published",
        };
        f.write_str(label)
    }
}

/// A group of functions built together and provisioned from one template.
pub struct DeploymentUnit {
    name: String,
    source_path: PathBuf,
    functions_path: PathBuf,
    runtime: String,
    node_version: Option<String>,
    location: String,
    layout: Arc<StackLayout>,
    runner: Arc<dyn CommandRunner>,
    function_app_name: Option<String>,
    resource_group: Option<String>,
    functions: Vec<FunctionDescriptor>,
    state: DeploymentState,
}

impl fmt::Debug for DeploymentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentUnit")
            .field("name", &self.name)
            .field("source_path", &self.source_path)
            .field("functions_path", &self.functions_path)
            .field("runtime", &self.runtime)
            .field("function_app_name", &self.function_app_name)
            .field("resource_group", &self.resource_group)
            .field("functions", &self.functions.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DeploymentUnit {
    /// Reads the unit's settings, builds compiled runtimes and discovers
    /// the functions in the build output.
    pub async fn load(
        path: &Path,
        identity: &StackIdentity,
        layout: Arc<StackLayout>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        let directory = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{}{}", identity.name, directory);

        let settings: DeploymentSettings = read_json(&path.join(&layout.settings_file))?;
        let worker = WorkerRuntime::parse(&settings.values.worker_runtime);
        let node_version = settings.values.node_version().map(str::to_string);
        let runtime = worker.identifier(node_version.as_deref());
        debug!("Deployment {} uses runtime {}", name, runtime);

        let functions_path = match worker.build_step() {
            Some(step) => {
                let invocation = step.invocation(path);
                info!("Building deployment {} with `{}`", name, invocation);
                runner
                    .run(&invocation)
                    .await
                    .map_err(|source| DeployError::BuildFailed {
                        unit: name.clone(),
                        source,
                    })?;
                step.output_path(path)
            }
            None => path.to_path_buf(),
        };

        let functions = list_functions(&functions_path, &runtime, &layout)?;
        info!(
            "Discovered deployment {} with {} functions",
            name,
            functions.len()
        );

        Ok(Self {
            name,
            source_path: path.to_path_buf(),
            functions_path,
            runtime,
            node_version,
            location: identity.location.clone(),
            layout,
            runner,
            function_app_name: None,
            resource_group: None,
            functions,
            state: DeploymentState::NotDeployed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn functions_path(&self) -> &Path {
        &self.functions_path
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn node_version(&self) -> Option<&str> {
        self.node_version.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn function_app_name(&self) -> Option<&str> {
        self.function_app_name.as_deref()
    }

    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn is_deployed(&self) -> bool {
        self.state.is_deployed()
    }

    /// Provisions the resource group and infrastructure, then publishes the
    /// function code with the layout's retry policy.
    ///
    /// Identifiers are regenerated on every call. The unit counts as deployed
    /// as soon as its resource group exists.
    pub async fn deploy(&mut self) -> Result<()> {
        if self.state.is_deployed() {
            return Err(DeployError::AlreadyDeployed {
                unit: self.name.clone(),
            });
        }

        let (app, group) = self.assign_identifiers();
        info!("Deploying {} as {} in {}", self.name, app, group);

        self.provision(
            ProvisionStep::ResourceGroup,
            Invocation::new(
                &self.source_path,
                "az",
                ["group", "create", "-n", group.as_str(), "-l", self.location.as_str()],
            ),
        )
        .await?;
        self.state = DeploymentState::GroupCreated;

        self.provision(
            ProvisionStep::Infrastructure,
            self.template_invocation(&app, &group),
        )
        .await?;
        self.state = DeploymentState::InfrastructureDeployed;

        self.publish(&app).await?;
        self.state = DeploymentState::Published;
        info!("Deployment {} published", self.name);
        Ok(())
    }

    /// Deletes the unit's resource group without waiting for completion.
    pub async fn remove(&mut self) -> Result<()> {
        let group = self
            .resource_group
            .clone()
            .ok_or_else(|| DeployError::NotDeployed {
                unit: self.name.clone(),
            })?;

        info!("Removing resource group {} of {}", group, self.name);
        let invocation = Invocation::new(
            &self.source_path,
            "az",
            ["group", "delete", "-n", group.as_str(), "-y", "--no-wait"],
        );
        self.runner
            .run(&invocation)
            .await
            .map_err(|source| DeployError::TeardownFailed {
                unit: self.name.clone(),
                source,
            })?;
        self.state = DeploymentState::NotDeployed;
        Ok(())
    }

    fn assign_identifiers(&mut self) -> (String, String) {
        let now = Utc::now();
        let stamp = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros());
        let app = format!("{}{}", self.name, stamp);
        let group = format!("{}{}", app, self.layout.resource_group_suffix);

        for function in &mut self.functions {
            function.assign_function_app(&app);
        }
        self.function_app_name = Some(app.clone());
        self.resource_group = Some(group.clone());
        (app, group)
    }

    fn template_invocation(&self, app: &str, group: &str) -> Invocation {
        let mut args = vec![
            "group".to_string(),
            "deployment".to_string(),
            "create".to_string(),
            "--template-file".to_string(),
            self.layout.template_file.clone(),
            "-g".to_string(),
            group.to_string(),
            "--parameters".to_string(),
            format!("functionAppName={app}"),
            format!("location={}", self.location),
        ];
        if let Some(version) = &self.node_version {
            args.push(format!("nodeVersion={version}"));
        }
        Invocation::new(&self.source_path, "az", args)
    }

    async fn provision(&self, step: ProvisionStep, invocation: Invocation) -> Result<()> {
        debug!("Creating {} for {}", step, self.name);
        self.runner
            .run(&invocation)
            .await
            .map(|_| ())
            .map_err(|source| DeployError::ProvisionFailed {
                unit: self.name.clone(),
                step,
                source,
            })
    }

    async fn publish(&self, app: &str) -> Result<()> {
        let invocation = Invocation::new(
            &self.functions_path,
            "func",
            ["azure", "functionapp", "publish", app],
        );
        let runner = self.runner.as_ref();
        let invocation = &invocation;
        let what = format!("Publishing {app}");
        self.layout
            .publish_retry
            .run(&what, move |_| runner.run(invocation))
            .await
            .map(|_| ())
            .map_err(|(source, attempts)| DeployError::PublishFailed {
                unit: self.name.clone(),
                attempts,
                source,
            })
    }
}

/// Function descriptors for every subdirectory of `functions_path` that
/// holds a function manifest; other subdirectories are skipped.
pub fn list_functions(
    functions_path: &Path,
    runtime: &str,
    layout: &StackLayout,
) -> Result<Vec<FunctionDescriptor>> {
    let mut functions = Vec::new();
    for directory in subdirectories(functions_path)? {
        let manifest_path = directory.join(&layout.function_manifest_file);
        if !manifest_path.is_file() {
            debug!("Skipping {}: no function manifest", directory.display());
            continue;
        }
        let manifest: FunctionManifest = read_json(&manifest_path)?;
        let directory_name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        functions.push(FunctionDescriptor::from_directory(
            &directory_name,
            &manifest,
            runtime,
            layout,
        ));
    }
    Ok(functions)
}
