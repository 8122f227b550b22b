//! Framework-agnostic description of a distributed training job.
//!
//! A [`Parameter`] is what callers hand to the descriptor generator. Its
//! `resource` field implements [`ResourceLimits`], the per-role sizing
//! contract the generator consumes.

pub mod error;
pub mod parameter;
pub mod resource;

pub use error::ResourceError;
pub use parameter::{CleanPolicy, FrameworkKind, Parameter, Role};
pub use resource::{Resource, ResourceLimits, ResourceList, RoleResource};
