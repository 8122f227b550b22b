use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{CleanPodPolicy, ReplicaSpec};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "kubeflow.org",
    version = "v1beta2",
    kind = "TFJob",
    plural = "tfjobs",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TFJobSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_pod_policy: Option<CleanPodPolicy>,
    pub tf_replica_specs: BTreeMap<TFReplicaType, ReplicaSpec>,
}

/// Role of a pod in a TensorFlow job.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub enum TFReplicaType {
    #[serde(rename = "PS")]
    Ps,
    Worker,
}
