//! Descriptor generation.
//!
//! One generic algorithm, driven by a [`Framework`] table, turns a
//! [`Parameter`] into a Kubeflow job. Every role of a job shares the same
//! container, command and volume; only replica count and limits differ.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, Container, PodSpec, PodTemplateSpec, ResourceRequirements, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kfgen_core::{Parameter, ResourceLimits, ResourceList, Role};
use kube::Resource;
use tracing::{debug, warn};

use crate::config::{ContainerDefaults, GeneratorConfig};
use crate::crd::{CleanPodPolicy, PyTorchJob, ReplicaSpec, TFJob};
use crate::framework::{Framework, PyTorch, TensorFlow};

/// File the artifact delivery step writes into the `<image>` ConfigMap.
pub const ENTRY_FILE_NAME: &str = "main.py";

const INTERPRETER: &str = "python";

/// Where the `<image>` volume is mounted: `/<image>`.
pub fn mount_path(image: &str) -> String {
    format!("/{image}")
}

/// Entry script inside the mounted volume: `/<image>/main.py`.
pub fn entry_file_path(image: &str) -> String {
    format!("/{image}/{ENTRY_FILE_NAME}")
}

/// Builds Kubeflow job descriptors for one namespace.
///
/// Holds only immutable configuration, so a single instance can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Generator with the built-in container defaults.
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut config = GeneratorConfig::default();
        config.namespace = namespace.into();
        Self { config }
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a `TFJob` with PS and Worker replicas.
    pub fn generate_tf_job<R: ResourceLimits>(
        &self,
        parameter: &Parameter<R>,
    ) -> Result<TFJob, R::Error> {
        self.generate::<TensorFlow, R>(parameter)
    }

    /// Generate a `PyTorchJob` with Master and Worker replicas.
    pub fn generate_pytorch_job<R: ResourceLimits>(
        &self,
        parameter: &Parameter<R>,
    ) -> Result<PyTorchJob, R::Error> {
        self.generate::<PyTorch, R>(parameter)
    }

    /// Generate the job descriptor of framework `F`.
    ///
    /// Limits are resolved for every role before anything is assembled; the
    /// first resolver error is returned as is.
    pub fn generate<F: Framework, R: ResourceLimits>(
        &self,
        parameter: &Parameter<R>,
    ) -> Result<F::Job, R::Error> {
        if !parameter.clean_policy.is_known() {
            warn!(
                policy = %parameter.clean_policy,
                name = %parameter.generate_name,
                "forwarding unrecognised clean pod policy"
            );
        }
        let clean_pod_policy = CleanPodPolicy::from(&parameter.clean_policy);

        let mut resolved = Vec::with_capacity(F::ROLES.len());
        for slot in F::ROLES {
            let limits = parameter.resource.limits(slot.role)?;
            resolved.push((slot, limits));
        }

        let container = F::container(&self.config);
        let replica_specs: BTreeMap<_, _> = resolved
            .into_iter()
            .map(|(slot, limits)| {
                let replicas = replica_count(parameter.replicas(slot.role), slot.role);
                let spec = replica_spec(container, &parameter.image, replicas, limits);
                (slot.replica_type, spec)
            })
            .collect();

        let metadata = ObjectMeta {
            name: Some(parameter.generate_name.clone()),
            namespace: Some(self.config.namespace.clone()),
            ..Default::default()
        };
        let job = F::assemble(metadata, clean_pod_policy, replica_specs);

        debug!(
            kind = %<F::Job as Resource>::kind(&()),
            name = %parameter.generate_name,
            namespace = %self.config.namespace,
            image = %parameter.image,
            "generated job descriptor"
        );
        Ok(job)
    }
}

/// Narrow a caller's count to the descriptor's `i32`, saturating at the
/// bounds. Negative counts are forwarded for the operator to reject.
fn replica_count(requested: i64, role: Role) -> i32 {
    let count = match i32::try_from(requested) {
        Ok(count) => count,
        Err(_) => {
            let clamped = if requested < 0 { i32::MIN } else { i32::MAX };
            warn!(%role, requested, clamped, "replica count out of range, saturating");
            clamped
        }
    };
    if count < 0 {
        warn!(%role, count, "forwarding negative replica count");
    }
    count
}

fn replica_spec(
    container: &ContainerDefaults,
    image: &str,
    replicas: i32,
    limits: ResourceList,
) -> ReplicaSpec {
    ReplicaSpec {
        replicas: Some(replicas),
        template: PodTemplateSpec {
            metadata: None,
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: container.container_name.clone(),
                    image: Some(container.image.clone()),
                    command: Some(vec![INTERPRETER.to_string(), entry_file_path(image)]),
                    resources: Some(ResourceRequirements {
                        limits: Some(limits),
                        ..Default::default()
                    }),
                    volume_mounts: Some(vec![VolumeMount {
                        name: image.to_string(),
                        mount_path: mount_path(image),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }],
                volumes: Some(vec![Volume {
                    name: image.to_string(),
                    config_map: Some(ConfigMapVolumeSource {
                        name: image.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        },
    }
}
