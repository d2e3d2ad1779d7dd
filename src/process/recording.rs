use crate::process::runner::{CommandError, CommandOutput, CommandRunner, Invocation};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub invocation: Invocation,
    pub started_at: Instant,
}

#[derive(Debug)]
struct FailureRule {
    pattern: String,
    remaining: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    recorded: Vec<RecordedInvocation>,
    rules: Vec<FailureRule>,
}

/// A runner that never starts a process.
///
/// Every invocation is recorded and succeeds with empty output unless a
/// failure rule matches its command line. Used for `--dry-run` and to drive
/// the orchestration core in tests.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    state: Mutex<State>,
    announce: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs each invocation at INFO as it is recorded.
    pub fn announcing() -> Self {
        Self {
            announce: true,
            ..Self::default()
        }
    }

    /// Fails the first `times` invocations whose command line contains `pattern`.
    pub fn fail_times(self, pattern: impl Into<String>, times: usize) -> Self {
        self.push_rule(pattern.into(), Some(times))
    }

    /// Fails every invocation whose command line contains `pattern`.
    pub fn fail_always(self, pattern: impl Into<String>) -> Self {
        self.push_rule(pattern.into(), None)
    }

    fn push_rule(self, pattern: String, remaining: Option<usize>) -> Self {
        self.lock().rules.push(FailureRule { pattern, remaining });
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.lock().recorded.clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.lock()
            .recorded
            .iter()
            .map(|r| r.invocation.command_line())
            .collect()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.lock()
            .recorded
            .iter()
            .filter(|r| r.invocation.command_line().contains(pattern))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().recorded.is_empty()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let command = invocation.command_line();
        if self.announce {
            info!(
                "[dry-run] {} (in {})",
                command,
                invocation.working_dir.display()
            );
        }

        let mut state = self.lock();
        state.recorded.push(RecordedInvocation {
            invocation: invocation.clone(),
            started_at: Instant::now(),
        });

        let rule = state.rules.iter_mut().find(|rule| {
            command.contains(&rule.pattern) && rule.remaining.map_or(true, |n| n > 0)
        });
        match rule {
            Some(rule) => {
                if let Some(remaining) = rule.remaining.as_mut() {
                    *remaining -= 1;
                }
                Err(CommandError::Failed {
                    command,
                    status: "exit status: 1".to_string(),
                    exit_code: Some(1),
                    output: CommandOutput {
                        stdout: String::new(),
                        stderr: format!("scripted failure matching '{}'", rule.pattern),
                    },
                })
            }
            None => Ok(CommandOutput::default()),
        }
    }
}
