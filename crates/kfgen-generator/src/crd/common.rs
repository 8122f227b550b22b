//! Types shared by every Kubeflow job kind (`common/v1beta2`).

use std::borrow::Cow;

use k8s_openapi::api::core::v1::PodTemplateSpec;
use kfgen_core::CleanPolicy;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

/// Pod template and count for every pod filling one role.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    pub template: PodTemplateSpec,
}

/// Which pods the operator deletes after the job completes.
///
/// Mirrors [`CleanPolicy`]: values outside `All`/`Running`/`None` are carried
/// through unchanged and left to the operator's admission checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CleanPodPolicy {
    All,
    #[default]
    Running,
    None,
    Other(String),
}

impl CleanPodPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Running => "Running",
            Self::None => "None",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&CleanPolicy> for CleanPodPolicy {
    fn from(policy: &CleanPolicy) -> Self {
        match policy {
            CleanPolicy::All => Self::All,
            CleanPolicy::Running => Self::Running,
            CleanPolicy::None => Self::None,
            CleanPolicy::Other(s) => Self::Other(s.clone()),
        }
    }
}

impl std::fmt::Display for CleanPodPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CleanPodPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CleanPodPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(&CleanPolicy::from(s.as_str())))
    }
}

impl JsonSchema for CleanPodPolicy {
    fn schema_name() -> Cow<'static, str> {
        "CleanPodPolicy".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        // Any string is accepted; the operator decides what is valid
        json_schema!({
            "type": "string",
            "description": "Pods to delete when the job finishes: 'All', 'Running' or 'None'"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_is_retyped_not_looked_up() {
        assert_eq!(CleanPodPolicy::from(&CleanPolicy::All), CleanPodPolicy::All);
        assert_eq!(CleanPodPolicy::from(&CleanPolicy::None), CleanPodPolicy::None);
        assert_eq!(
            CleanPodPolicy::from(&CleanPolicy::Other("Eventually".to_string())),
            CleanPodPolicy::Other("Eventually".to_string())
        );
    }

    #[test]
    fn policy_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&CleanPodPolicy::All).unwrap(), "\"All\"");
        let back: CleanPodPolicy = serde_json::from_str("\"Running\"").unwrap();
        assert_eq!(back, CleanPodPolicy::Running);
    }

    #[test]
    fn replica_spec_omits_unset_replicas() {
        let spec = ReplicaSpec::default();
        let value = serde_json::to_value(&spec).unwrap();
        assert!(value.get("replicas").is_none());
        assert!(value.get("template").is_some());
    }
}
