use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resource::Resource;

/// A functional slot in a distributed training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ps,
    Worker,
    Master,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ps => "ps",
            Self::Worker => "worker",
            Self::Master => "master",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training framework a job is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    #[serde(alias = "tf")]
    Tensorflow,
    Pytorch,
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tensorflow => f.write_str("tensorflow"),
            Self::Pytorch => f.write_str("pytorch"),
        }
    }
}

/// Which pods the orchestrator removes once a job finishes.
///
/// Values other than the three known ones are kept verbatim in `Other` and
/// left for the orchestrator to accept or reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CleanPolicy {
    All,
    #[default]
    Running,
    None,
    Other(String),
}

impl CleanPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Running => "Running",
            Self::None => "None",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for CleanPolicy {
    fn from(s: &str) -> Self {
        match s {
            "All" => Self::All,
            "Running" => Self::Running,
            "None" => Self::None,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CleanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CleanPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CleanPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// The desired training job, as supplied by the caller.
///
/// `R` is the sizing object. It defaults to [`Resource`], but anything that
/// implements [`crate::ResourceLimits`] can stand in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Parameter<R = Resource> {
    pub generate_name: String,
    /// Artifact bundle name. Also names the ConfigMap volume and its mount.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkKind>,
    #[serde(default)]
    pub clean_policy: CleanPolicy,
    #[serde(default)]
    pub ps_count: i64,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub master_count: i64,
    pub resource: R,
}

impl<R> Parameter<R> {
    /// Requested replica count for `role`.
    pub fn replicas(&self, role: Role) -> i64 {
        match role {
            Role::Ps => self.ps_count,
            Role::Worker => self.worker_count,
            Role::Master => self.master_count,
        }
    }
}
