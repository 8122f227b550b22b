//! Per-framework tables driving the generic generator.
//!
//! Supporting another Kubeflow job kind means adding its CRD type under
//! [`crate::crd`] and one more [`Framework`] impl here.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kfgen_core::{FrameworkKind, Role};
use serde::Serialize;

use crate::config::{ContainerDefaults, GeneratorConfig};
use crate::crd::{
    CleanPodPolicy, PyTorchJob, PyTorchJobSpec, PyTorchReplicaType, ReplicaSpec, TFJob,
    TFJobSpec, TFReplicaType,
};

/// Binds a replica type of the descriptor to the role it is sized and
/// counted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSlot<T> {
    pub replica_type: T,
    pub role: Role,
}

pub trait Framework {
    type ReplicaType: Copy + Ord + fmt::Debug + Serialize + 'static;
    type Job: kube::Resource<DynamicType = ()>;

    const KIND: FrameworkKind;

    /// Roles of a job, in resolution order.
    const ROLES: &'static [RoleSlot<Self::ReplicaType>];

    fn container(config: &GeneratorConfig) -> &ContainerDefaults;

    fn assemble(
        metadata: ObjectMeta,
        clean_pod_policy: CleanPodPolicy,
        replica_specs: BTreeMap<Self::ReplicaType, ReplicaSpec>,
    ) -> Self::Job;
}

/// Parameter-server style jobs (`TFJob`).
#[derive(Debug, Clone, Copy)]
pub struct TensorFlow;

impl Framework for TensorFlow {
    type ReplicaType = TFReplicaType;
    type Job = TFJob;

    const KIND: FrameworkKind = FrameworkKind::Tensorflow;

    const ROLES: &'static [RoleSlot<TFReplicaType>] = &[
        RoleSlot {
            replica_type: TFReplicaType::Ps,
            role: Role::Ps,
        },
        RoleSlot {
            replica_type: TFReplicaType::Worker,
            role: Role::Worker,
        },
    ];

    fn container(config: &GeneratorConfig) -> &ContainerDefaults {
        &config.tensorflow
    }

    fn assemble(
        metadata: ObjectMeta,
        clean_pod_policy: CleanPodPolicy,
        replica_specs: BTreeMap<TFReplicaType, ReplicaSpec>,
    ) -> TFJob {
        let spec = TFJobSpec {
            clean_pod_policy: Some(clean_pod_policy),
            tf_replica_specs: replica_specs,
        };
        let mut job = TFJob::new("", spec);
        job.metadata = metadata;
        job
    }
}

/// Master/worker style jobs (`PyTorchJob`).
#[derive(Debug, Clone, Copy)]
pub struct PyTorch;

impl Framework for PyTorch {
    type ReplicaType = PyTorchReplicaType;
    type Job = PyTorchJob;

    const KIND: FrameworkKind = FrameworkKind::Pytorch;

    const ROLES: &'static [RoleSlot<PyTorchReplicaType>] = &[
        RoleSlot {
            replica_type: PyTorchReplicaType::Master,
            role: Role::Master,
        },
        RoleSlot {
            replica_type: PyTorchReplicaType::Worker,
            role: Role::Worker,
        },
    ];

    fn container(config: &GeneratorConfig) -> &ContainerDefaults {
        &config.pytorch
    }

    fn assemble(
        metadata: ObjectMeta,
        clean_pod_policy: CleanPodPolicy,
        replica_specs: BTreeMap<PyTorchReplicaType, ReplicaSpec>,
    ) -> PyTorchJob {
        let spec = PyTorchJobSpec {
            clean_pod_policy: Some(clean_pod_policy),
            pytorch_replica_specs: replica_specs,
        };
        let mut job = PyTorchJob::new("", spec);
        job.metadata = metadata;
        job
    }
}

/// Summary of a framework as configured, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkInfo {
    pub framework: FrameworkKind,
    pub kind: String,
    pub api_version: String,
    pub replica_types: Vec<String>,
    pub container: ContainerDefaults,
}

pub fn describe<F: Framework>(config: &GeneratorConfig) -> FrameworkInfo {
    let replica_types = F::ROLES
        .iter()
        .map(|slot| match serde_json::to_value(slot.replica_type) {
            Ok(serde_json::Value::String(name)) => name,
            _ => format!("{:?}", slot.replica_type),
        })
        .collect();

    FrameworkInfo {
        framework: F::KIND,
        kind: <F::Job as kube::Resource>::kind(&()).into_owned(),
        api_version: <F::Job as kube::Resource>::api_version(&()).into_owned(),
        replica_types,
        container: F::container(config).clone(),
    }
}

/// Every supported framework, in listing order.
pub fn all(config: &GeneratorConfig) -> Vec<FrameworkInfo> {
    vec![describe::<TensorFlow>(config), describe::<PyTorch>(config)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensorflow_table() {
        let info = describe::<TensorFlow>(&GeneratorConfig::default());
        assert_eq!(info.kind, "TFJob");
        assert_eq!(info.api_version, "kubeflow.org/v1beta2");
        assert_eq!(info.replica_types, vec!["PS", "Worker"]);
        assert_eq!(info.container, ContainerDefaults::tensorflow());
    }

    #[test]
    fn pytorch_table() {
        let info = describe::<PyTorch>(&GeneratorConfig::default());
        assert_eq!(info.kind, "PyTorchJob");
        assert_eq!(info.replica_types, vec!["Master", "Worker"]);
        assert_eq!(info.container.image, "pytorch/pytorch:v0.2");
    }

    #[test]
    fn every_framework_has_two_distinct_roles() {
        fn distinct<F: Framework>() -> bool {
            let [a, b] = F::ROLES else {
                return false;
            };
            a.replica_type != b.replica_type && a.role != b.role
        }
        assert!(distinct::<TensorFlow>());
        assert!(distinct::<PyTorch>());
    }

    #[test]
    fn listing_follows_config_overrides() {
        let mut config = GeneratorConfig::default();
        config.pytorch.image = "pytorch/pytorch:1.0".to_string();

        let listing = all(&config);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[1].framework, FrameworkKind::Pytorch);
        assert_eq!(listing[1].container.image, "pytorch/pytorch:1.0");
    }
}
