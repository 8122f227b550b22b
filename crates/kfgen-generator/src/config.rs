//! Generator configuration.
//!
//! Everything here has a compiled-in default. A TOML file can pin a different
//! namespace, base image or container name without touching the mapping code:
//!
//! ```toml
//! namespace = "ml-jobs"
//!
//! [tensorflow]
//! image = "tensorflow/tensorflow:1.15.5-py3"
//!
//! [pytorch]
//! container-name = "pytorch"
//! image = "pytorch/pytorch:v0.2"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const TENSORFLOW_CONTAINER: &str = "tensorflow";
pub const TENSORFLOW_IMAGE: &str = "tensorflow/tensorflow:1.10.1-py3";
pub const PYTORCH_CONTAINER: &str = "pytorch";
pub const PYTORCH_IMAGE: &str = "pytorch/pytorch:v0.2";

/// Name and base image of the single container in every generated pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefaults {
    pub container_name: String,
    pub image: String,
}

impl ContainerDefaults {
    pub fn new(container_name: &str, image: &str) -> Self {
        Self {
            container_name: container_name.to_string(),
            image: image.to_string(),
        }
    }

    pub fn tensorflow() -> Self {
        Self::new(TENSORFLOW_CONTAINER, TENSORFLOW_IMAGE)
    }

    pub fn pytorch() -> Self {
        Self::new(PYTORCH_CONTAINER, PYTORCH_IMAGE)
    }

    fn overlay(self, raw: RawContainer) -> Self {
        Self {
            container_name: raw.container_name.unwrap_or(self.container_name),
            image: raw.image.unwrap_or(self.image),
        }
    }

    fn validate(&self, framework: &'static str) -> Result<(), ConfigError> {
        if self.container_name.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                framework,
                field: "container-name",
            });
        }
        if self.image.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                framework,
                field: "image",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub namespace: String,
    pub tensorflow: ContainerDefaults,
    pub pytorch: ContainerDefaults,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    namespace: Option<String>,
    #[serde(default)]
    tensorflow: RawContainer,
    #[serde(default)]
    pytorch: RawContainer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawContainer {
    container_name: Option<String>,
    image: Option<String>,
}

impl GeneratorConfig {
    /// Built-in container defaults targeting `namespace`.
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            tensorflow: ContainerDefaults::tensorflow(),
            pytorch: ContainerDefaults::pytorch(),
        }
    }

    /// Parse a TOML document. Keys it leaves out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            namespace: raw.namespace.unwrap_or(defaults.namespace),
            tensorflow: defaults.tensorflow.overlay(raw.tensorflow),
            pytorch: defaults.pytorch.overlay(raw.pytorch),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        self.tensorflow.validate("tensorflow")?;
        self.pytorch.validate("pytorch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.tensorflow.image, TENSORFLOW_IMAGE);
        assert_eq!(config.pytorch.container_name, PYTORCH_CONTAINER);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            namespace = "ml-jobs"

            [tensorflow]
            image = "tensorflow/tensorflow:1.15.5-py3"
            "#,
        )
        .unwrap();

        assert_eq!(config.namespace, "ml-jobs");
        assert_eq!(config.tensorflow.image, "tensorflow/tensorflow:1.15.5-py3");
        assert_eq!(config.tensorflow.container_name, TENSORFLOW_CONTAINER);
        assert_eq!(config.pytorch, ContainerDefaults::pytorch());
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = GeneratorConfig::from_toml_str(r#"namespace = """#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNamespace));
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = GeneratorConfig::from_toml_str("[pytorch]\nimage = \" \"").unwrap_err();
        assert_eq!(err.to_string(), "pytorch image must not be empty");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GeneratorConfig::from_toml_str("[mxnet]\nimage = \"mxnet\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/kfgen.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/kfgen.toml"));
    }
}
