// ABOUTME: Thin async wrapper around an external command-line tool.
// ABOUTME: Captures output, parses JSON responses and keeps secrets out of error messages.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::error::{AzError, FailedSnafu, ParseSnafu, SpawnSnafu};

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone)]
pub struct CliRunner {
    program: PathBuf,
    /// Passed through the environment so values never appear in `ps` output.
    secret_env: Vec<(&'static str, SecretString)>,
}

impl CliRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            secret_env: Vec::new(),
        }
    }

    /// A copy of this runner that sets `key` in the child's environment.
    pub fn with_secret_env(&self, key: &'static str, value: &SecretString) -> Self {
        let mut runner = self.clone();
        runner.secret_env.push((key, value.clone()));
        runner
    }

    /// Run to completion and capture output. Only spawn failures are errors.
    pub async fn output(&self, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput, AzError> {
        let command = self.describe(args);
        tracing::debug!(%command, "running");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.secret_env {
            cmd.env(key, value.expose_secret());
        }
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        // Own process group: a terminal Ctrl-C reaches only funcship, which
        // stops between steps instead of killing the command mid-flight.
        #[cfg(unix)]
        cmd.process_group(0);

        let output = cmd.output().await.context(SpawnSnafu {
            command: command.clone(),
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run and return stdout, failing on a non-zero exit.
    pub async fn run_in(&self, args: &[&str], cwd: Option<&Path>) -> Result<String, AzError> {
        let output = self.output(args, cwd).await?;
        if !output.success() {
            return FailedSnafu {
                command: self.describe(args),
                code: output.code,
                stderr: output.stderr,
            }
            .fail();
        }
        Ok(output.stdout)
    }

    pub async fn run(&self, args: &[&str]) -> Result<String, AzError> {
        self.run_in(args, None).await
    }

    /// Run with `--output json` and deserialize stdout.
    pub async fn json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, AzError> {
        let mut full: Vec<&str> = args.to_vec();
        full.extend(["--output", "json"]);
        let stdout = self.run(&full).await?;
        serde_json::from_str(&stdout).context(ParseSnafu {
            command: self.describe(args),
        })
    }

    /// Run attached to the user's terminal (interactive flows).
    pub async fn interactive(&self, args: &[&str]) -> Result<(), AzError> {
        let command = self.describe(args);
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .context(SpawnSnafu {
                command: command.clone(),
            })?;

        if !status.success() {
            return FailedSnafu {
                command,
                code: status.code(),
                stderr: "interactive command failed".to_string(),
            }
            .fail();
        }
        Ok(())
    }

    /// Program plus the leading subcommand words; flag values may hold secrets.
    fn describe(&self, args: &[&str]) -> String {
        describe(&self.program, args)
    }
}

fn describe(program: &Path, args: &[&str]) -> String {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());
    std::iter::once(name)
        .chain(
            args.iter()
                .take_while(|a| !a.starts_with('-'))
                .map(|a| a.to_string()),
        )
        .collect::<Vec<_>>()
        .join(" ")
}
