use thiserror::Error;

use crate::Role;

/// Reasons a role's resource limits could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("malformed {resource} quantity '{value}' for role {role}")]
    MalformedQuantity {
        role: Role,
        resource: String,
        value: String,
    },

    #[error("negative {resource} quantity '{value}' for role {role}")]
    NegativeQuantity {
        role: Role,
        resource: String,
        value: String,
    },

    #[error("unsupported resource '{resource}' for role {role}")]
    UnsupportedResource { role: Role, resource: String },
}
