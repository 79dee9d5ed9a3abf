use std::{env, str::FromStr, time::Duration};

use agent::client::AgentConfig;
use anyhow::Context;
use executor::ssh::SshConfig;

/// Transport used to reach remote hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTransport {
    /// Shell out to `ssh`/`scp`.
    Ssh,
    /// POST jobs to the agent running on the target host.
    Http,
}

impl FromStr for RemoteTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ssh" => Ok(RemoteTransport::Ssh),
            "http" => Ok(RemoteTransport::Http),
            _ => Err(format!("unknown remote transport: {s}")),
        }
    }
}

pub struct RemoteConfig {
    pub transport: RemoteTransport,
    pub ssh: SshConfig,
    pub agent: AgentConfig,
}

/// Load remote execution settings from environment variables
///
/// Environment variables:
/// - REMOTE_TRANSPORT: "ssh" or "http" (default: "ssh")
/// - SSH_USER: login user for the ssh transport (default: "root")
/// - SSH_OPTIONS: extra ssh/scp options
///   (default: "-o StrictHostKeyChecking=no")
/// - SSH_SHELL: shell for remote script files (default: "sh")
/// - AGENT_SCHEME: scheme for the http transport (default: "http")
/// - AGENT_PORT: port the remote agents listen on (default: 8000)
/// - AGENT_API_KEY: key sent as X-Api-Key to remote agents (optional)
/// - AGENT_TIMEOUT_SECS: http client timeout (default: 90)
pub fn from_env() -> anyhow::Result<RemoteConfig> {
    let transport = match env::var("REMOTE_TRANSPORT") {
        Ok(raw) => raw
            .parse()
            .map_err(anyhow::Error::msg)
            .context("REMOTE_TRANSPORT must be 'ssh' or 'http'")?,
        Err(_) => RemoteTransport::Ssh,
    };

    let mut ssh = SshConfig::default();
    if let Ok(user) = env::var("SSH_USER") {
        ssh.user = user;
    }
    if let Ok(options) = env::var("SSH_OPTIONS") {
        ssh.options = options;
    }
    if let Ok(shell) = env::var("SSH_SHELL") {
        ssh.shell = shell;
    }

    let mut agent = AgentConfig::default();
    if let Ok(scheme) = env::var("AGENT_SCHEME") {
        agent.scheme = scheme;
    }
    if let Ok(raw) = env::var("AGENT_PORT") {
        agent.port = raw.parse().context("AGENT_PORT must be a port number")?;
    }
    if let Ok(key) = env::var("AGENT_API_KEY") {
        agent.api_key = Some(key);
    }
    if let Ok(raw) = env::var("AGENT_TIMEOUT_SECS") {
        let seconds = raw
            .parse()
            .context("AGENT_TIMEOUT_SECS must be a whole number of seconds")?;
        agent.timeout = Duration::from_secs(seconds);
    }

    Ok(RemoteConfig {
        transport,
        ssh,
        agent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_transports() {
        assert_eq!("ssh".parse::<RemoteTransport>(), Ok(RemoteTransport::Ssh));
        assert_eq!("http".parse::<RemoteTransport>(), Ok(RemoteTransport::Http));
    }

    #[test]
    fn should_reject_unknown_transport() {
        let result = "telnet".parse::<RemoteTransport>();

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("unknown remote transport"));
    }
}
