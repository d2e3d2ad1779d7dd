use crate::process::runner::{CommandError, CommandOutput, CommandRunner, Invocation};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 8 * 1024;

/// Runs invocations as real OS processes.
///
/// Both output streams are drained concurrently with waiting for the child,
/// so a chatty tool can never block on a full pipe. Each chunk is echoed to
/// this process's own stdout/stderr (unless the runner is quiet) and kept in
/// memory for the returned [`CommandOutput`].
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    echo: bool,
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self { echo: true }
    }

    /// A runner that captures output without echoing it to the console.
    pub fn quiet() -> Self {
        Self { echo: false }
    }

    pub fn echoes_output(&self) -> bool {
        self.echo
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let command = invocation.command_line();
        debug!(
            "Running `{}` in {}",
            command,
            invocation.working_dir.display()
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| missing_pipe(&command, "stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| missing_pipe(&command, "stderr"))?;

        let (stdout, stderr, status) = tokio::try_join!(
            tee(stdout, self.echo.then(tokio::io::stdout)),
            tee(stderr, self.echo.then(tokio::io::stderr)),
            child.wait(),
        )
        .map_err(|source| CommandError::Capture {
            command: command.clone(),
            source,
        })?;

        let output = CommandOutput::from_bytes(&stdout, &stderr);
        if !status.success() {
            warn!("`{}` failed with {}", command, status);
            return Err(CommandError::Failed {
                command,
                status: status.to_string(),
                exit_code: status.code(),
                output,
            });
        }

        Ok(output)
    }
}

fn missing_pipe(command: &str, stream: &str) -> CommandError {
    CommandError::Capture {
        command: command.to_string(),
        source: std::io::Error::other(format!("{stream} pipe was not created")),
    }
}

/// Copies `reader` to completion, mirroring every chunk to `console`.
async fn tee<R, W>(mut reader: R, mut console: Option<W>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        if let Some(console) = console.as_mut() {
            console.write_all(&chunk[..read]).await?;
            console.flush().await?;
        }
        captured.extend_from_slice(&chunk[..read]);
    }
    Ok(captured)
}
