use crate::cli::options::{Commands, DeployOptions, FuncstackCli, OutputFormat};
use crate::cli::output::{print_capability_report, print_dry_run, print_stack_report, StackReport};
use crate::deploy::{RetryPolicy, Stack};
use crate::process::{CommandRunner, RecordingRunner, SystemCommandRunner};
use crate::types::StackLayout;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const TOOLS: &[(&str, &str)] = &[
    ("az", "resource groups and templates"),
    ("func", "function code publishing"),
    ("dotnet", "dotnet builds"),
    ("mvn", "java builds"),
];

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub tools: Vec<ToolCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub name: String,
    pub purpose: String,
    pub status: ToolStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    Available { path: String },
    Missing,
}

impl CapabilityReport {
    pub fn is_available(&self, name: &str) -> bool {
        self.tools
            .iter()
            .any(|t| t.name == name && matches!(t.status, ToolStatus::Available { .. }))
    }

    pub fn ready_to_deploy(&self) -> bool {
        self.is_available("az") && self.is_available("func")
    }
}

pub async fn run(cli: FuncstackCli) -> anyhow::Result<()> {
    let layout = load_layout(cli.config.as_deref())?;
    match cli.command {
        Commands::Inspect { root, dry_run } => {
            let (runner, _) = make_runner(dry_run, cli.quiet);
            inspect(&root, layout, runner, cli.format).await
        }
        Commands::Deploy {
            root,
            remove_after,
            dry_run,
            publish_attempts,
            publish_delay_secs,
        } => {
            let options = DeployOptions {
                remove_after,
                dry_run,
                publish_attempts,
                publish_delay_secs,
                quiet: cli.quiet,
                format: cli.format,
            };
            deploy(&root, layout, &options).await
        }
        Commands::Check => print_capability_report(&check_tools(), cli.format),
    }
}

pub fn load_layout(config: Option<&Path>) -> anyhow::Result<StackLayout> {
    match config {
        Some(path) => StackLayout::from_file(path)
            .with_context(|| format!("Failed to load layout from {}", path.display())),
        None => Ok(StackLayout::default()),
    }
}

/// Applies command line retry overrides on top of the configured policy.
pub fn apply_retry_overrides(layout: StackLayout, options: &DeployOptions) -> StackLayout {
    let current = layout.publish_retry;
    let policy = RetryPolicy::new(
        options.publish_attempts.unwrap_or(current.max_attempts),
        options
            .publish_delay_secs
            .map(Duration::from_secs)
            .unwrap_or(current.delay),
    );
    layout.with_publish_retry(policy)
}

fn make_runner(dry_run: bool, quiet: bool) -> (Arc<dyn CommandRunner>, Option<Arc<RecordingRunner>>) {
    if dry_run {
        let recorder = Arc::new(RecordingRunner::announcing());
        let runner: Arc<dyn CommandRunner> = recorder.clone();
        return (runner, Some(recorder));
    }
    let runner: Arc<dyn CommandRunner> = if quiet {
        Arc::new(SystemCommandRunner::quiet())
    } else {
        Arc::new(SystemCommandRunner::new())
    };
    (runner, None)
}

pub async fn inspect(
    root: &Path,
    layout: StackLayout,
    runner: Arc<dyn CommandRunner>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stack = Stack::load(root, layout, runner)
        .await
        .with_context(|| format!("Failed to load stack from {}", root.display()))?;
    print_stack_report(&StackReport::from(&stack), format)
}

pub async fn deploy(root: &Path, layout: StackLayout, options: &DeployOptions) -> anyhow::Result<()> {
    let layout = apply_retry_overrides(layout, options);
    let (runner, recorder) = make_runner(options.dry_run, options.quiet);

    let mut stack = Stack::load(root, layout, runner)
        .await
        .with_context(|| format!("Failed to load stack from {}", root.display()))?;

    stack
        .deploy_stack()
        .await
        .with_context(|| format!("Failed to deploy stack {}", stack.name()))?;
    info!("Stack {} deployed", stack.name());
    let report = StackReport::from(&stack);

    if options.remove_after {
        info!("Removing stack {}", stack.name());
        if let Err(e) = stack.remove_stack().await {
            warn!("Teardown of stack {} failed: {}", stack.name(), e);
            return Err(e).with_context(|| format!("Failed to remove stack {}", stack.name()));
        }
    }

    match recorder {
        Some(recorder) => print_dry_run(&recorder.command_lines(), options.format),
        None => print_stack_report(&report, options.format),
    }
}

pub fn check_tools() -> CapabilityReport {
    let tools = TOOLS
        .iter()
        .map(|(name, purpose)| ToolCheck {
            name: name.to_string(),
            purpose: purpose.to_string(),
            status: match which::which(name) {
                Ok(path) => ToolStatus::Available {
                    path: path.display().to_string(),
                },
                Err(_) => ToolStatus::Missing,
            },
        })
        .collect();
    CapabilityReport { tools }
}
