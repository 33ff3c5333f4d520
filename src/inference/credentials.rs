//! Provider credential sources.

use super::error::AnalysisError;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Timeout for api_key_command execution.
const API_KEY_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the provider API key. Resolved on every analysis so rotated
/// secrets are picked up without a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Name of an environment variable holding the key.
    Env(String),
    /// Static API key.
    Static(String),
    /// Shell command that outputs the API key (for rotating tokens).
    Command(String),
}

impl ApiKeySource {
    /// Get the current API key, executing the command if necessary.
    ///
    /// Every failure is a configuration error: nothing is sent to the
    /// provider without a key.
    pub async fn resolve(&self) -> Result<String, AnalysisError> {
        match self {
            ApiKeySource::Env(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
                Ok(_) => Err(AnalysisError::Configuration(format!(
                    "Environment variable {} is empty",
                    var
                ))),
                Err(_) => Err(AnalysisError::Configuration(format!(
                    "Environment variable {} is not set",
                    var
                ))),
            },
            ApiKeySource::Static(key) if key.trim().is_empty() => Err(
                AnalysisError::Configuration("Configured API key is empty".to_string()),
            ),
            ApiKeySource::Static(key) => Ok(key.clone()),
            ApiKeySource::Command(cmd) => {
                debug!(command = %cmd, "Fetching API key via command");

                let result = tokio::time::timeout(
                    API_KEY_COMMAND_TIMEOUT,
                    Command::new("sh").arg("-c").arg(cmd).output(),
                )
                .await;

                let output = match result {
                    Ok(Ok(output)) => output,
                    Ok(Err(e)) => {
                        warn!(command = %cmd, error = %e, "api_key_command failed to execute");
                        return Err(AnalysisError::Configuration(format!(
                            "Failed to execute api_key_command: {}",
                            e
                        )));
                    }
                    Err(_) => {
                        warn!(command = %cmd, "api_key_command timed out");
                        return Err(AnalysisError::Configuration(
                            "api_key_command timed out".to_string(),
                        ));
                    }
                };

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(command = %cmd, stderr = %stderr, "api_key_command failed");
                    return Err(AnalysisError::Configuration(format!(
                        "api_key_command failed with status {}: {}",
                        output.status,
                        stderr.trim()
                    )));
                }

                let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if key.is_empty() {
                    warn!(command = %cmd, "api_key_command returned empty key");
                    return Err(AnalysisError::Configuration(
                        "api_key_command returned empty key".to_string(),
                    ));
                }

                Ok(key)
            }
        }
    }

    /// Short description safe to print (never the key itself).
    pub fn describe(&self) -> String {
        match self {
            ApiKeySource::Env(var) => format!("env:{}", var),
            ApiKeySource::Static(_) => "static".to_string(),
            ApiKeySource::Command(_) => "command".to_string(),
        }
    }
}
