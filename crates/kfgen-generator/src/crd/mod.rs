//! Kubeflow job resources (`kubeflow.org/v1beta2`) emitted by the generator.

mod common;
mod pytorch;
mod tensorflow;

pub use common::{CleanPodPolicy, ReplicaSpec};
pub use pytorch::{PyTorchJob, PyTorchJobSpec, PyTorchReplicaType};
pub use tensorflow::{TFJob, TFJobSpec, TFReplicaType};
