use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use executor::shell::ShellConfig;

/// Load local executor settings from environment variables
///
/// Environment variables:
/// - EXEC_SHELL: shell binary for local jobs (default: "bash")
/// - EXEC_TIMEOUT_SECS: default job timeout, 0 disables the deadline
///   (default: 60)
/// - EXEC_SCRIPT_DIR: scratch directory for script files (default: the
///   system temp directory)
pub fn shell_config_from_env() -> anyhow::Result<ShellConfig> {
    let mut config = ShellConfig::default();

    if let Ok(shell) = env::var("EXEC_SHELL") {
        config.shell = shell;
    }
    if let Ok(raw) = env::var("EXEC_TIMEOUT_SECS") {
        let seconds = raw
            .parse()
            .context("EXEC_TIMEOUT_SECS must be a whole number of seconds")?;
        config.timeout = Duration::from_secs(seconds);
    }
    if let Ok(dir) = env::var("EXEC_SCRIPT_DIR") {
        config.script_dir = PathBuf::from(dir);
    }

    Ok(config)
}
