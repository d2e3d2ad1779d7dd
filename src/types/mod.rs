pub mod layout;
pub mod manifest;
pub mod runtime;

pub use layout::StackLayout;
pub use manifest::{Binding, DeploymentSettings, FunctionManifest, SettingsValues, StackIdentity};
pub use runtime::{reported_runtime, BuildStep, WorkerRuntime};
