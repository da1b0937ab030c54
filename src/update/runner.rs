use libc::{killpg, SIGKILL};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::UpdateSettings;
use crate::utils::format_duration;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Update already in progress")]
    Busy,

    #[error("Failed to run update command `{command}`: {source}")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command} (exit code {}){}", exit_code_label(.code), stderr_suffix(.stderr))]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command timed out after {}: {command}", timeout_label(.timeout))]
    TimedOut { command: String, timeout: Duration },
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none, killed by signal".to_string())
}

fn timeout_label(timeout: &Duration) -> String {
    format_duration(*timeout)
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr)
    }
}

/// Výstup úspěšně dokončeného update skriptu
#[derive(Debug, Clone)]
pub struct UpdateOutput {
    pub stdout: String,
    pub elapsed: Duration,
}

/// Spouští update skript, vždy nejvýše jeden běh najednou
#[derive(Debug, Clone)]
pub struct UpdateRunner {
    settings: Arc<UpdateSettings>,
    permit: Arc<Semaphore>,
}

impl UpdateRunner {
    pub fn new(settings: UpdateSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn settings(&self) -> &UpdateSettings {
        &self.settings
    }

    /// Vrací true, pokud právě běží update
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.permit.available_permits() == 0
    }

    /// Zabere runner pro jeden běh updatu.
    ///
    /// Pokud už jiný update běží, vrací `UpdateError::Busy`. Runner zůstává
    /// obsazený, dokud žije vrácený `UpdateTicket`.
    pub fn try_start(&self) -> Result<UpdateTicket, UpdateError> {
        let permit = self
            .permit
            .clone()
            .try_acquire_owned()
            .map_err(|_| UpdateError::Busy)?;

        Ok(UpdateTicket {
            settings: self.settings.clone(),
            permit: Some(permit),
        })
    }

    /// Spustí update skript a počká na jeho dokončení
    #[cfg(test)]
    pub async fn run(&self) -> Result<UpdateOutput, UpdateError> {
        self.try_start()?.run().await
    }
}

/// Oprávnění k jednomu běhu updatu
#[derive(Debug)]
pub struct UpdateTicket {
    settings: Arc<UpdateSettings>,
    permit: Option<OwnedSemaphorePermit>,
}

impl UpdateTicket {
    /// Spustí skript ve vlastní skupině procesů a počká na jeho dokončení.
    ///
    /// Při timeoutu se celá skupina zabije a runner zůstane obsazený, dokud
    /// strom procesů skutečně neskončí. Jinak se runner uvolní až s ticketem.
    pub async fn run(&mut self) -> Result<UpdateOutput, UpdateError> {
        let command = self.settings.command_line();
        let timeout = self.settings.timeout;
        tracing::info!("Running update command: {}", command);

        let started = Instant::now();
        let child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| UpdateError::Process {
                command: command.clone(),
                source,
            })?;
        let pgid = child.id();

        // Roury drží i vnuci skriptu, výstup je kompletní až po skončení celého stromu
        let mut pending = Box::pin(child.wait_with_output());
        let output = match timeout {
            Some(timeout) => {
                let waited = tokio::time::timeout(timeout, &mut pending).await;
                match waited {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(
                            "Update timed out after {}, killing process group",
                            format_duration(timeout)
                        );
                        if let Some(pgid) = pgid {
                            kill_process_group(pgid);
                        }

                        let permit = self.permit.take();
                        tokio::spawn(async move {
                            let _ = pending.await;
                            tracing::info!("Timed out update process exited, runner released");
                            drop(permit);
                        });

                        return Err(UpdateError::TimedOut { command, timeout });
                    }
                }
            }
            None => pending.await,
        }
        .map_err(|source| UpdateError::Process {
            command: command.clone(),
            source,
        })?;

        let elapsed = started.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        tracing::info!("Update stdout: {}", stdout.trim_end());
        if !stderr.trim().is_empty() {
            tracing::warn!("Update stderr: {}", stderr.trim_end());
        }

        if !output.status.success() {
            return Err(UpdateError::Exit {
                command,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(UpdateOutput { stdout, elapsed })
    }
}

/// Pošle SIGKILL celé skupině procesů (pod `sudo` může selhat na EPERM)
fn kill_process_group(pgid: u32) {
    #[allow(unsafe_code)]
    let rc = unsafe { killpg(pgid as libc::pid_t, SIGKILL) };
    if rc == -1 {
        tracing::warn!(
            "Failed to kill process group {}: {}",
            pgid,
            std::io::Error::last_os_error()
        );
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_successful_update_captures_stdout() {
        let (_dir, runner) = script_runner("echo X\n");

        let output = runner.run().await.unwrap();
        assert_eq!(output.stdout.trim(), "X");
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_stderr_does_not_fail_update() {
        let (_dir, runner) = script_runner("echo done\necho warning >&2\n");

        let output = runner.run().await.unwrap();
        assert_eq!(output.stdout.trim(), "done");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let (_dir, runner) = script_runner("echo broken >&2\nexit 3\n");

        match runner.run().await {
            Err(UpdateError::Exit { code, stderr, .. }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_script() {
        let runner = missing_script_runner();

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, UpdateError::Exit { .. }));
        assert!(err.to_string().contains("Command failed"));
    }

    #[tokio::test]
    async fn test_concurrent_update_is_rejected() {
        let (_dir, runner) = script_runner("sleep 1\necho slow\n");

        let first = {
            let runner = runner.clone();
            tokio::spawn(async move { runner.run().await })
        };
        wait_until_running(&runner).await;

        assert!(matches!(runner.run().await, Err(UpdateError::Busy)));

        let output = first.await.unwrap().unwrap();
        assert_eq!(output.stdout.trim(), "slow");
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_timeout_kills_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("update-system.sh");
        let marker = dir.path().join("finished");
        std::fs::write(
            &script,
            format!("sleep 1\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        let runner = UpdateRunner::new(UpdateSettings {
            script,
            elevate_with: Some("sh".to_string()),
            timeout: Some(Duration::from_millis(200)),
        });

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, UpdateError::TimedOut { .. }));
        assert_eq!(
            err.to_string(),
            format!("Command timed out after 200 ms: {}", runner.settings().command_line())
        );

        wait_until_idle(&runner).await;
        assert!(runner.try_start().is_ok());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "script kept running after timeout");
    }

    #[test]
    fn test_exit_error_message() {
        let err = UpdateError::Exit {
            command: "sudo /x.sh".to_string(),
            code: Some(1),
            stderr: "permission denied\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command failed: sudo /x.sh (exit code 1)\npermission denied"
        );
    }
}
