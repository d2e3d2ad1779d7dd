use crate::cli::commands::{CapabilityReport, ToolStatus};
use crate::cli::options::OutputFormat;
use crate::deploy::{DeploymentState, DeploymentUnit, FunctionDescriptor, Stack};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StackReport {
    pub name: String,
    pub project: String,
    pub stage: String,
    pub location: String,
    pub deployments: Vec<DeploymentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub name: String,
    pub runtime: String,
    pub state: DeploymentState,
    pub function_app_name: Option<String>,
    pub resource_group: Option<String>,
    pub functions: Vec<FunctionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub description: String,
    pub runtime: String,
    pub handler: String,
    pub memory_size: String,
    pub disabled: bool,
    pub url: Option<String>,
}

impl From<&Stack> for StackReport {
    fn from(stack: &Stack) -> Self {
        Self {
            name: stack.name().to_string(),
            project: stack.project().to_string(),
            stage: stack.stage().to_string(),
            location: stack.location().to_string(),
            deployments: stack.units().iter().map(DeploymentReport::from).collect(),
        }
    }
}

impl From<&DeploymentUnit> for DeploymentReport {
    fn from(unit: &DeploymentUnit) -> Self {
        Self {
            name: unit.name().to_string(),
            runtime: unit.runtime().to_string(),
            state: unit.state(),
            function_app_name: unit.function_app_name().map(str::to_string),
            resource_group: unit.resource_group().map(str::to_string),
            functions: unit.functions().iter().map(FunctionReport::from).collect(),
        }
    }
}

impl From<&FunctionDescriptor> for FunctionReport {
    fn from(function: &FunctionDescriptor) -> Self {
        Self {
            name: function.name(),
            description: function.description(),
            runtime: function.runtime().to_string(),
            handler: function.handler().to_string(),
            memory_size: function.memory_size().to_string(),
            disabled: function.is_disabled(),
            url: function.invoke_url().map(|url| url.to_string()),
        }
    }
}

pub fn print_stack_report(report: &StackReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("📦 Stack {} ({}/{})", report.name, report.project, report.stage);
            println!("   Location: {}", report.location);
            println!();
            for deployment in &report.deployments {
                println!(
                    "🚀 {} [{}] - {}",
                    deployment.name, deployment.runtime, deployment.state
                );
                if let Some(group) = &deployment.resource_group {
                    println!("   Resource group: {group}");
                }
                for function in &deployment.functions {
                    let disabled = if function.disabled { " (disabled)" } else { "" };
                    println!(
                        "  • {} - {} [{}, {} MB]{}",
                        function.name,
                        function.description,
                        function.runtime,
                        function.memory_size,
                        disabled
                    );
                    if !function.handler.is_empty() {
                        println!("      handler: {}", function.handler);
                    }
                    if let Some(url) = &function.url {
                        println!("      url: {url}");
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

pub fn print_dry_run(commands: &[String], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(commands)?),
        OutputFormat::Text => {
            println!("📋 Commands that would run ({}):", commands.len());
            for command in commands {
                println!("  $ {command}");
            }
        }
    }
    Ok(())
}

pub fn print_capability_report(report: &CapabilityReport, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("🔧 External Tools");
    println!("=================");
    for tool in &report.tools {
        match &tool.status {
            ToolStatus::Available { path } => {
                println!("  ✅ {:<8} {} ({})", tool.name, path, tool.purpose)
            }
            ToolStatus::Missing => println!("  ❌ {:<8} missing ({})", tool.name, tool.purpose),
        }
    }
    println!();
    if report.ready_to_deploy() {
        println!("✅ Ready to deploy interpreted-runtime stacks");
    } else {
        println!("❌ Not ready: az and func are required for every deploy");
    }
    Ok(())
}
