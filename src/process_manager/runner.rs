// External process execution
// Runs a program to completion off the caller's thread and captures its output

use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Added on top of the inherited environment.
    pub envs: Vec<(String, String)>,
}

impl ProcessRequest {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            envs: Vec::new(),
        }
    }

    pub fn with_envs(mut self, envs: Vec<(String, String)>) -> Self {
        self.envs = envs;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// -1 when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Launch failures come back as `Err`; a process that ran and exited non-zero is `Ok`.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, request: &ProcessRequest) -> std::io::Result<ProcessOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, request: &ProcessRequest) -> std::io::Result<ProcessOutput> {
        debug!("Running {:?} {:?}", request.program, request.args);

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .envs(request.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        // Waits for exit while reading both pipes to the end
        let output = cmd.output().await?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!("{:?} exited with code: {}", request.program, exit_code);

        Ok(ProcessOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
