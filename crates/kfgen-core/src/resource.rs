//! Per-role resource sizing.
//!
//! [`ResourceLimits`] is the contract the generator consumes. [`Resource`] is
//! the stock implementation: quantity strings per role, checked against the
//! Kubernetes quantity grammar before they reach a descriptor.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};

use crate::Role;
use crate::error::ResourceError;

/// Resource name to quantity, as placed in a container's `limits`.
pub type ResourceList = BTreeMap<String, Quantity>;

pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";
pub const GPU: &str = "nvidia.com/gpu";

/// Resolves the container limits for each role of a job.
pub trait ResourceLimits {
    type Error: std::error::Error;

    fn limits(&self, role: Role) -> Result<ResourceList, Self::Error>;
}

/// Sizing for a single role. Unset or blank fields are left out of the limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Accelerator count, emitted as `nvidia.com/gpu`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
    /// Any further resources, keyed by their Kubernetes name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended: BTreeMap<String, String>,
}

impl RoleResource {
    pub fn new(cpu: &str, memory: &str) -> Self {
        Self {
            cpu: Some(cpu.to_string()),
            memory: Some(memory.to_string()),
            ..Default::default()
        }
    }

    /// Build the limits list for `role`, validating every quantity.
    pub fn limits(&self, role: Role) -> Result<ResourceList, ResourceError> {
        let mut list = ResourceList::new();

        for (name, value) in &self.extended {
            if !is_supported_name(name) {
                return Err(ResourceError::UnsupportedResource {
                    role,
                    resource: name.clone(),
                });
            }
            insert_quantity(&mut list, role, name, value)?;
        }

        let named = [(CPU, &self.cpu), (MEMORY, &self.memory), (GPU, &self.gpu)];
        for (name, value) in named {
            if let Some(value) = value {
                insert_quantity(&mut list, role, name, value)?;
            }
        }

        Ok(list)
    }
}

/// Sizing for every role a supported framework can ask about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub ps: RoleResource,
    #[serde(default)]
    pub worker: RoleResource,
    #[serde(default)]
    pub master: RoleResource,
}

impl Resource {
    pub fn role(&self, role: Role) -> &RoleResource {
        match role {
            Role::Ps => &self.ps,
            Role::Worker => &self.worker,
            Role::Master => &self.master,
        }
    }
}

impl ResourceLimits for Resource {
    type Error = ResourceError;

    fn limits(&self, role: Role) -> Result<ResourceList, ResourceError> {
        self.role(role).limits(role)
    }
}

fn insert_quantity(
    list: &mut ResourceList,
    role: Role,
    name: &str,
    raw: &str,
) -> Result<(), ResourceError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(());
    }

    match check_quantity(value) {
        Ok(()) => {
            list.insert(name.to_string(), Quantity(value.to_string()));
            Ok(())
        }
        Err(QuantityFault::Negative) => Err(ResourceError::NegativeQuantity {
            role,
            resource: name.to_string(),
            value: value.to_string(),
        }),
        Err(QuantityFault::Malformed) => Err(ResourceError::MalformedQuantity {
            role,
            resource: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn is_supported_name(name: &str) -> bool {
    if matches!(name, CPU | MEMORY | "ephemeral-storage") {
        return true;
    }
    if let Some(size) = name.strip_prefix("hugepages-") {
        return !size.is_empty();
    }
    match name.split_once('/') {
        Some((domain, resource)) => {
            domain.contains('.')
                && !resource.is_empty()
                && !resource.contains('/')
                && resource
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        None => false,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum QuantityFault {
    Malformed,
    Negative,
}

/// Check `value` against `<sign><number><suffix>`, the Kubernetes quantity
/// grammar. Negative non-zero values are reported separately from syntax
/// errors.
fn check_quantity(value: &str) -> Result<(), QuantityFault> {
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let number_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (number, suffix) = rest.split_at(number_end);

    if !is_decimal(number) || !is_suffix(suffix) {
        return Err(QuantityFault::Malformed);
    }
    if negative && number.chars().any(|c| c != '0' && c != '.') {
        return Err(QuantityFault::Negative);
    }
    Ok(())
}

fn is_decimal(s: &str) -> bool {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());

    if !digits(int) || !frac.is_none_or(digits) {
        return false;
    }
    !int.is_empty() || frac.is_some_and(|f| !f.is_empty())
}

fn is_suffix(s: &str) -> bool {
    match s {
        "" | "n" | "u" | "m" | "k" | "M" | "G" | "T" | "P" | "E" => true,
        "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei" => true,
        _ => {
            let Some(exponent) = s.strip_prefix(['e', 'E']) else {
                return false;
            };
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_quantities() {
        for value in ["1", "500m", "0.5", ".5", "2Gi", "512Mi", "1e3", "1E-2", "+4", "10k", "3E"] {
            assert_eq!(check_quantity(value), Ok(()), "{value}");
        }
    }

    #[test]
    fn rejects_malformed_quantities() {
        for value in ["abc", "1.2.3", "2GB", "Gi", ".", "1e", "1e+", "--1", "1 Gi"] {
            assert_eq!(check_quantity(value), Err(QuantityFault::Malformed), "{value}");
        }
    }

    #[test]
    fn negative_zero_is_not_negative() {
        assert_eq!(check_quantity("-0"), Ok(()));
        assert_eq!(check_quantity("-1"), Err(QuantityFault::Negative));
        assert_eq!(check_quantity("-0.5Gi"), Err(QuantityFault::Negative));
    }

    #[test]
    fn role_limits_map_named_fields() {
        let resource = RoleResource {
            cpu: Some("2".to_string()),
            memory: Some(" 4Gi ".to_string()),
            gpu: Some("1".to_string()),
            extended: BTreeMap::new(),
        };

        let limits = resource.limits(Role::Worker).unwrap();
        assert_eq!(limits.len(), 3);
        assert_eq!(limits[CPU], Quantity("2".to_string()));
        assert_eq!(limits[MEMORY], Quantity("4Gi".to_string()));
        assert_eq!(limits[GPU], Quantity("1".to_string()));
    }

    #[test]
    fn unset_and_blank_fields_are_omitted() {
        let resource = RoleResource {
            cpu: Some("1".to_string()),
            memory: Some("   ".to_string()),
            ..Default::default()
        };

        let limits = resource.limits(Role::Ps).unwrap();
        assert_eq!(limits.keys().collect::<Vec<_>>(), vec![CPU]);
        assert!(RoleResource::default().limits(Role::Ps).unwrap().is_empty());
    }

    #[test]
    fn malformed_quantity_names_role_and_resource() {
        let resource = Resource {
            worker: RoleResource::new("2", "four gigs"),
            ..Default::default()
        };

        let err = resource.limits(Role::Worker).unwrap_err();
        assert_eq!(
            err,
            ResourceError::MalformedQuantity {
                role: Role::Worker,
                resource: MEMORY.to_string(),
                value: "four gigs".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "malformed memory quantity 'four gigs' for role worker"
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let resource = RoleResource::new("-1", "1Gi");
        assert!(matches!(
            resource.limits(Role::Master),
            Err(ResourceError::NegativeQuantity { role: Role::Master, .. })
        ));
    }

    #[test]
    fn extended_resources_are_validated_by_name() {
        let mut resource = RoleResource::default();
        resource
            .extended
            .insert("ephemeral-storage".to_string(), "10Gi".to_string());
        resource
            .extended
            .insert("example.com/fpga".to_string(), "2".to_string());
        resource
            .extended
            .insert("hugepages-2Mi".to_string(), "64Mi".to_string());

        let limits = resource.limits(Role::Worker).unwrap();
        assert_eq!(limits.len(), 3);

        resource
            .extended
            .insert("fpga".to_string(), "1".to_string());
        assert_eq!(
            resource.limits(Role::Worker),
            Err(ResourceError::UnsupportedResource {
                role: Role::Worker,
                resource: "fpga".to_string(),
            })
        );
    }

    #[test]
    fn named_fields_take_precedence_over_extended() {
        let mut resource = RoleResource::new("4", "8Gi");
        resource
            .extended
            .insert(CPU.to_string(), "1".to_string());

        let limits = resource.limits(Role::Ps).unwrap();
        assert_eq!(limits[CPU], Quantity("4".to_string()));
    }

    #[test]
    fn resource_dispatches_by_role() {
        let resource = Resource {
            ps: RoleResource::new("1", "2Gi"),
            worker: RoleResource::new("2", "4Gi"),
            master: RoleResource::new("3", "6Gi"),
        };

        assert_eq!(resource.limits(Role::Ps).unwrap()[CPU], Quantity("1".to_string()));
        assert_eq!(resource.limits(Role::Worker).unwrap()[CPU], Quantity("2".to_string()));
        assert_eq!(resource.limits(Role::Master).unwrap()[CPU], Quantity("3".to_string()));
    }
}
