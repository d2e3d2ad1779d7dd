pub mod deployment;
pub mod discovery;
pub mod error;
pub mod function;
pub mod retry;
pub mod stack;

pub use deployment::{list_functions, DeploymentState, DeploymentUnit};
pub use error::*;
pub use function::FunctionDescriptor;
pub use retry::RetryPolicy;
pub use stack::{combine_failure, Stack, UnitFailure};
