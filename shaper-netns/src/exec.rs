//! Command execution, optionally inside a named network namespace

use async_trait::async_trait;
use shaper_core::{Error, Result};
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `128 + signal` for signal-terminated commands
    pub code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given code and stderr
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `argv[0]` with the remaining arguments and capture its output.
    ///
    /// A non-zero exit is not an error at this level.
    ///
    /// # Errors
    /// Returns error if the command is empty or cannot be spawned
    async fn run(&self, argv: &[String]) -> Result<CommandOutput>;
}

/// Runs commands on the host with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| Error::InvalidConfig {
            message: "Command cannot be empty".to_string(),
        })?;

        tracing::debug!(command = %argv.join(" "), "Running command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        let code = output
            .status
            .code()
            .or_else(|| output.status.signal().map(|signal| 128 + signal))
            .unwrap_or(-1);

        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Where a veth listing is taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VethListing {
    /// The host's default namespace
    Host,
    /// A named namespace, entered with `ip netns exec`
    Namespace(String),
}

impl VethListing {
    /// Command line for this listing
    #[must_use]
    pub fn argv(&self, ip_command: &str) -> Vec<String> {
        let mut argv = Vec::with_capacity(9);

        if let Self::Namespace(name) = self {
            argv.extend([
                ip_command.to_string(),
                "netns".to_string(),
                "exec".to_string(),
                name.clone(),
            ]);
        }

        argv.extend(
            [ip_command, "link", "show", "type", "veth"]
                .into_iter()
                .map(str::to_string),
        );
        argv
    }

    /// Run the listing and return its standard output.
    ///
    /// # Errors
    /// Returns [`Error::ListingCommand`] carrying the command's exit code and
    /// stderr if it exits non-zero.
    pub async fn run(&self, runner: &dyn CommandRunner, ip_command: &str) -> Result<String> {
        let argv = self.argv(ip_command);
        let output = runner.run(&argv).await?;

        if !output.success() {
            let command = argv.join(" ");
            tracing::error!(
                command = %command,
                code = output.code,
                stderr = %output.stderr.trim_end(),
                "Veth listing failed"
            );
            return Err(Error::ListingCommand {
                command,
                code: output.code,
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }
}

/// Mock runner for testing (doesn't spawn processes)
///
/// Responses are keyed by the space-joined command line. Unknown commands
/// exit with code 127.
#[derive(Clone, Default)]
pub struct MockRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
    /// Create a runner with no canned responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the output for a command line
    #[must_use]
    pub fn with_output(mut self, command: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.insert(command.into(), output);
        self
    }

    /// Register the output of a veth listing using the default `ip` binary
    #[must_use]
    pub fn with_listing(self, listing: &VethListing, output: CommandOutput) -> Self {
        let command = listing.argv("ip").join(" ");
        self.with_output(command, output)
    }

    /// Command lines run so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("responses", &self.responses.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let command = argv.join(" ");
        self.calls.lock().await.push(command.clone());

        let output = self
            .responses
            .get(&command)
            .cloned()
            .unwrap_or_else(|| CommandOutput::failed(127, format!("{command}: not found")));

        tracing::debug!(command = %command, code = output.code, "Mock: Ran command");

        Ok(output)
    }
}
