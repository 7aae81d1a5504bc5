//! Deployment context injected into environment-sensitive components.

use std::fmt;
use std::str::FromStr;

/// Where the pipeline is running.
///
/// The dedup gate and the request enricher change behavior based on this value.
/// It is always passed in explicitly so both modes stay testable in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentEnv {
    /// Developer machine: dedup always admits, geo comes from a loopback fixture.
    #[default]
    Local,
    /// Hosted behind the edge platform: dedup is enforced, geo comes from request annotations.
    Hosted,
}

impl DeploymentEnv {
    pub fn is_hosted(self) -> bool {
        matches!(self, DeploymentEnv::Hosted)
    }
}

impl FromStr for DeploymentEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "development" | "dev" => Ok(DeploymentEnv::Local),
            "hosted" | "production" | "prod" | "preview" => Ok(DeploymentEnv::Hosted),
            other => Err(format!(
                "unknown deployment environment '{other}', expected 'local' or 'hosted'"
            )),
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentEnv::Local => write!(f, "local"),
            DeploymentEnv::Hosted => write!(f, "hosted"),
        }
    }
}
