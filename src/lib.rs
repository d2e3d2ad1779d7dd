//! funcstack - serverless function stack deployment
//!
//! Discovers deployment units under a stack root, builds compiled runtimes,
//! provisions a resource group and infrastructure template per unit and
//! publishes the function code, rolling the whole stack back when any unit
//! fails.

pub mod cli;
pub mod deploy;
pub mod process;
pub mod types;

pub use deploy::{DeployError, DeploymentState, DeploymentUnit, FunctionDescriptor, Result, RetryPolicy, Stack};
pub use process::{CommandRunner, Invocation, RecordingRunner, SystemCommandRunner};
pub use types::{StackIdentity, StackLayout};
