use std::path::{Path, PathBuf};

use kfgen_generator::GeneratorConfig;
use tracing::debug;

const CONFIG_PATH: &str = "~/.kfgen/config.toml";

/// Load the generator config.
///
/// An explicit path must exist. The default path is optional: when it is
/// missing the built-in defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        return Ok(GeneratorConfig::load(path)?);
    }

    let config_path = expand_path(CONFIG_PATH)?;
    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(GeneratorConfig::default());
    }
    Ok(GeneratorConfig::load(&config_path)?)
}

/// Expand a path that may contain `~` to the user's home directory
fn expand_path(path: &str) -> Result<PathBuf, String> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or("Unable to determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(
            expand_path("/etc/kfgen.toml").unwrap(),
            PathBuf::from("/etc/kfgen.toml")
        );
    }

    #[test]
    fn tilde_expands_under_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_path("~/.kfgen/config.toml").unwrap(),
                home.join(".kfgen/config.toml")
            );
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/kfgen.toml"))).is_err());
    }
}
