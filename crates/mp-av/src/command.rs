//! Builder for executing external tool commands under a hard deadline.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use mp_core::{Error, Result};

/// Default command timeout: 10 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// The child is owned for the whole call: when the deadline expires it is
/// killed and reaped before [`ToolCommand::execute`] returns, and it is also
/// killed if the returned future is dropped early.
///
/// # Example
///
/// ```no_run
/// use mp_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> mp_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffprobe"))
///     .arg("-v").arg("error")
///     .arg("-of").arg("json")
///     .arg("-show_streams")
///     .arg("/path/to/video.mkv")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    subject: Option<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            subject: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Name what the command operates on; reported in timeout errors.
    pub fn subject(&mut self, s: impl Into<String>) -> &mut Self {
        self.subject = Some(s.into());
        self
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error; callers inspect
    /// [`ToolOutput::status`] themselves.
    ///
    /// # Errors
    ///
    /// - [`Error::ProbeToolMissing`] if the process cannot be spawned.
    /// - [`Error::ProbeTimeout`] if the deadline expires; the process has
    ///   been killed by the time this is returned.
    /// - [`Error::Tool`] on an I/O error while collecting output.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            tool = %program_name,
            subject = self.subject.as_deref().unwrap_or(""),
            timeout = ?self.timeout,
            "spawning tool"
        );

        let mut child = cmd.spawn().map_err(|e| {
            tracing::error!(tool = %program_name, "failed to spawn: {e}");
            Error::tool_missing(self.program.to_string_lossy())
        })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::tool(&program_name, "stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::tool(&program_name, "stderr was not captured"))?;

        let collect = async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let (status, _, _) = tokio::try_join!(
                child.wait(),
                stdout.read_to_end(&mut out),
                stderr.read_to_end(&mut err),
            )?;
            Ok::<_, std::io::Error>((status, out, err))
        };

        let result = tokio::time::timeout(self.timeout, collect).await;

        match result {
            Ok(Ok((status, out, err))) => Ok(ToolOutput {
                status,
                stdout: String::from_utf8_lossy(&out).to_string(),
                stderr: String::from_utf8_lossy(&err).to_string(),
            }),
            Ok(Err(e)) => {
                tracing::warn!(tool = %program_name, "I/O error collecting output: {e}");
                if let Err(kill_err) = child.kill().await {
                    tracing::warn!(tool = %program_name, "failed to kill process: {kill_err}");
                }
                Err(Error::tool(
                    program_name,
                    format!("I/O error waiting for process: {e}"),
                ))
            }
            Err(_elapsed) => {
                tracing::warn!(
                    tool = %program_name,
                    "no result after {:?}; killing process",
                    self.timeout
                );
                // kill() also waits, so the process is reaped on return.
                if let Err(e) = child.kill().await {
                    tracing::warn!(tool = %program_name, "failed to kill process: {e}");
                }
                let subject = self.subject.clone().unwrap_or(program_name);
                Err(Error::timeout(subject, self.timeout))
            }
        }
    }
}
