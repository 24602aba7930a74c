use crate::shared::config::{SmartctlConfig, StderrPolicy};
use crate::shared::error::CollectionError;
use crate::shared::traits::CommandExecutor;
use log::{debug, warn};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use which::which;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// smartctl exit-status bit 0: the command line did not parse. Bit 1 (device open
/// failed) is left to the parser, which reports such devices as unsupported.
const FATAL_EXIT_BITS: i32 = 0b01;

/// Process-backed `CommandExecutor` for the configured smartctl binary.
#[derive(Debug, Clone)]
pub struct SmartctlRunner {
    path: String,
    sudo: Option<String>,
    timeout: Option<Duration>,
    stderr_policy: StderrPolicy,
}

impl SmartctlRunner {
    pub fn new(config: &SmartctlConfig) -> Self {
        Self {
            path: config.path.clone(),
            sudo: config.sudo.clone(),
            timeout: config.timeout(),
            stderr_policy: config.stderr_policy,
        }
    }

    /// Full argv of an invocation, privilege wrapper first.
    pub fn command_line(&self, args: &[&str]) -> Vec<String> {
        self.sudo
            .iter()
            .cloned()
            .chain(std::iter::once(self.path.clone()))
            .chain(args.iter().map(|arg| arg.to_string()))
            .collect()
    }

    fn build_command(&self, args: &[&str]) -> Command {
        let mut command = match self.sudo {
            Some(ref sudo) => {
                let mut command = Command::new(sudo);
                command.arg(&self.path);
                command
            }
            None => Command::new(&self.path),
        };
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn wait(&self, child: &mut Child, command_line: &str) -> Result<ExitStatus, CollectionError> {
        let exec_error = |e: io::Error| CollectionError::Execution {
            command: command_line.to_string(),
            reason: e.to_string(),
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(exec_error);
        };

        let started = Instant::now();
        loop {
            match child.try_wait().map_err(exec_error)? {
                Some(status) => return Ok(status),
                None if started.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CollectionError::Timeout {
                        command: command_line.to_string(),
                        timeout,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn check_outcome(
        &self,
        command_line: &str,
        status: ExitStatus,
        stderr: &[u8],
    ) -> Result<(), CollectionError> {
        let stderr_text = String::from_utf8_lossy(stderr);
        let stderr_text = stderr_text.trim_end();

        match self.stderr_policy {
            StderrPolicy::Strict => {
                if !stderr.is_empty() {
                    return Err(CollectionError::Execution {
                        command: command_line.to_string(),
                        reason: stderr_text.to_string(),
                    });
                }
            }
            StderrPolicy::Lenient => {
                if !stderr.is_empty() {
                    warn!("\"{}\" wrote to stderr: {}", command_line, stderr_text);
                }
                let reason = match status.code() {
                    None => Some("terminated by signal".to_string()),
                    Some(code) if code & FATAL_EXIT_BITS != 0 => {
                        Some(format!("exit status {}", code))
                    }
                    Some(_) => None,
                };
                if let Some(reason) = reason {
                    return Err(CollectionError::Execution {
                        command: command_line.to_string(),
                        reason,
                    });
                }
            }
        }
        Ok(())
    }
}

impl CommandExecutor for SmartctlRunner {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, CollectionError> {
        let command_line = self.command_line(args).join(" ");
        debug!("Executing: {}", command_line);

        let mut child = self
            .build_command(args)
            .spawn()
            .map_err(|e| CollectionError::Execution {
                command: command_line.clone(),
                reason: format!("failed to get disk information: {}", e),
            })?;

        // Both pipes are drained concurrently so a chatty child cannot block on a full pipe.
        let stdout_reader = spawn_drain(child.stdout.take());
        let stderr_reader = spawn_drain(child.stderr.take());

        let status = self.wait(&mut child, &command_line)?;
        let stdout = join_drain(stdout_reader, &command_line)?;
        let stderr = join_drain(stderr_reader, &command_line)?;

        self.check_outcome(&command_line, status, &stderr)?;

        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn is_available(&self) -> bool {
        let wrapper_found = self.sudo.as_ref().map_or(true, |sudo| which(sudo).is_ok());
        wrapper_found && which(&self.path).is_ok()
    }
}

fn spawn_drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buffer)?;
        }
        Ok(buffer)
    })
}

fn join_drain(
    reader: JoinHandle<io::Result<Vec<u8>>>,
    command_line: &str,
) -> Result<Vec<u8>, CollectionError> {
    reader
        .join()
        .map_err(|_| CollectionError::Execution {
            command: command_line.to_string(),
            reason: "output reader panicked".to_string(),
        })?
        .map_err(|e| CollectionError::Execution {
            command: command_line.to_string(),
            reason: e.to_string(),
        })
}
