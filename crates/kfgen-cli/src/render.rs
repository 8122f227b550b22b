use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use clap::ValueEnum;
use kfgen_core::{FrameworkKind, Parameter};
use kfgen_generator::Generator;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameworkArg {
    #[value(alias = "tf")]
    Tensorflow,
    Pytorch,
}

impl From<FrameworkArg> for FrameworkKind {
    fn from(arg: FrameworkArg) -> Self {
        match arg {
            FrameworkArg::Tensorflow => FrameworkKind::Tensorflow,
            FrameworkArg::Pytorch => FrameworkKind::Pytorch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

pub fn handle_render(
    generator: &Generator,
    parameter_path: &Path,
    framework: Option<FrameworkArg>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(parameter_path).map_err(|e| {
        format!(
            "Failed to read parameter file {}: {}",
            parameter_path.display(),
            e
        )
    })?;
    let parameter: Parameter = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse parameter file: {}", e))?;

    let framework = resolve_framework(framework, &parameter)?;
    info!(%framework, name = %parameter.generate_name, "rendering job");

    let color = std::io::stdout().is_terminal();
    print!("{}", render(generator, &parameter, framework, format, color)?);
    Ok(())
}

/// The command-line flag wins over the parameter's own `framework` field.
fn resolve_framework(
    flag: Option<FrameworkArg>,
    parameter: &Parameter,
) -> Result<FrameworkKind, String> {
    flag.map(FrameworkKind::from)
        .or(parameter.framework)
        .ok_or_else(|| {
            "No framework given, pass --framework or set `framework` in the parameter file"
                .to_string()
        })
}

fn render(
    generator: &Generator,
    parameter: &Parameter,
    framework: FrameworkKind,
    format: Format,
    color: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    match framework {
        FrameworkKind::Tensorflow => {
            encode(&generator.generate_tf_job(parameter)?, format, color)
        }
        FrameworkKind::Pytorch => {
            encode(&generator.generate_pytorch_job(parameter)?, format, color)
        }
    }
}

fn encode<T: Serialize>(
    job: &T,
    format: Format,
    color: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(job)?),
        Format::Json => {
            let value = serde_json::to_value(job)?;
            let mut json = if color {
                colored_json::to_colored_json_auto(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            json.push('\n');
            Ok(json)
        }
    }
}
