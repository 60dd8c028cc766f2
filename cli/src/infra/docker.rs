//! Infrastructure implementation of the `ContainerEngine` port.
//!
//! `DockerEngine<R>` drives a docker-compatible CLI through a
//! `CommandRunner`, so tests can inject a scripted runner.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ContainerEngine};
use crate::domain::{ContainerEngineError, DemConfig, ImageSet, ToolImage};
use crate::infra::command_runner::TokioCommandRunner;

/// Container engine adapter over a docker-compatible CLI.
pub struct DockerEngine<R: CommandRunner> {
    runner: R,
    program: String,
    pull_timeout: Duration,
}

impl<R: CommandRunner> DockerEngine<R> {
    pub fn new(runner: R, program: impl Into<String>, pull_timeout: Duration) -> Self {
        Self {
            runner,
            program: program.into(),
            pull_timeout,
        }
    }
}

impl DockerEngine<TokioCommandRunner> {
    /// Engine configured from `engine.*` settings.
    #[must_use]
    pub fn from_config(config: &DemConfig) -> Self {
        Self::new(
            TokioCommandRunner::new(config.engine_timeout()),
            config.engine.program.clone(),
            config.pull_timeout(),
        )
    }
}

/// Map a spawn failure, timeout, or non-zero exit to a `ContainerEngineError`.
fn check(
    result: Result<Output>,
    operation: &str,
    target: &str,
) -> Result<Output, ContainerEngineError> {
    let output =
        result.map_err(|e| ContainerEngineError::new(operation, target, format!("{e:#}")))?;
    if output.status.success() {
        Ok(output)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("exited with {}", output.status),
            msg => msg.to_string(),
        };
        Err(ContainerEngineError::new(operation, target, reason))
    }
}

/// Parse `image ls` output, one `repository:tag` per line.
fn parse_image_list(stdout: &[u8]) -> ImageSet {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("<none>"))
        .map(ToString::to_string)
        .collect()
}

impl<R: CommandRunner> ContainerEngine for DockerEngine<R> {
    async fn list_local_images(&self) -> Result<ImageSet, ContainerEngineError> {
        let result = self
            .runner
            .run(
                &self.program,
                &["image", "ls", "--format", "{{.Repository}}:{{.Tag}}"],
            )
            .await;
        let output = check(result, "list", "local images")?;
        Ok(parse_image_list(&output.stdout))
    }

    async fn pull(&self, image: &ToolImage) -> Result<(), ContainerEngineError> {
        let reference = image.reference();
        let result = self
            .runner
            .run_with_timeout(&self.program, &["pull", &reference], self.pull_timeout)
            .await;
        check(result, "pull", &reference).map(|_| ())
    }

    async fn remove(&self, image: &ToolImage) -> Result<(), ContainerEngineError> {
        let reference = image.reference();
        let result = self
            .runner
            .run(&self.program, &["image", "rm", &reference])
            .await;
        check(result, "remove", &reference).map(|_| ())
    }

    async fn run(
        &self,
        image: &ToolImage,
        workdir: &Path,
        command: &[String],
    ) -> Result<i32, ContainerEngineError> {
        let reference = image.reference();
        let mount = format!("{}:/work", workdir.display());
        let mut args = vec!["run", "--rm", "-i", "-v", &mount, "-w", "/work", &reference];
        args.extend(command.iter().map(String::as_str));

        let status = self
            .runner
            .run_status(&self.program, &args)
            .await
            .map_err(|e| ContainerEngineError::new("run", &reference, format!("{e:#}")))?;
        // Killed by a signal: report the shell convention of a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}
