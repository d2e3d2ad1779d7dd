pub mod recording;
pub mod runner;
pub mod system;

pub use recording::{RecordedInvocation, RecordingRunner};
pub use runner::{CommandError, CommandOutput, CommandRunner, Invocation};
pub use system::SystemCommandRunner;
