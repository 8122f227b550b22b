//! Kubeflow job descriptor generation.
//!
//! Turns a framework-agnostic [`kfgen_core::Parameter`] into a `TFJob` or
//! `PyTorchJob` for the Kubeflow operators. Pure and synchronous: nothing here
//! talks to a cluster.

pub mod config;
pub mod crd;
pub mod error;
pub mod framework;
pub mod generator;

pub use config::{ContainerDefaults, GeneratorConfig};
pub use error::ConfigError;
pub use framework::{Framework, FrameworkInfo, PyTorch, TensorFlow};
pub use generator::{ENTRY_FILE_NAME, Generator, entry_file_path, mount_path};
