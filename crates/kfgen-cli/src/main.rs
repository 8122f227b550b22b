use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kfgen_generator::Generator;
use tracing_subscriber::EnvFilter;

mod config;
mod frameworks;
mod render;

use render::{Format, FrameworkArg};

#[derive(Parser, Debug)]
#[command(name = "kfgen")]
#[command(about = "kfgen - Render Kubeflow training job descriptors")]
struct Args {
    /// Generator config file (defaults to ~/.kfgen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Target namespace, overriding the config file
    #[arg(short, long, global = true)]
    namespace: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a job descriptor from a parameter file
    Render {
        /// TOML file describing the job
        #[arg(short, long)]
        parameter: PathBuf,
        /// Framework to target; falls back to the parameter file's `framework`
        #[arg(short, long, value_enum)]
        framework: Option<FrameworkArg>,
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// List supported frameworks and their container defaults
    Frameworks,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut generator_config = config::load_config(args.config.as_deref())?;
    if let Some(namespace) = args.namespace {
        generator_config.namespace = namespace;
        generator_config.validate()?;
    }

    match args.command {
        Commands::Render {
            parameter,
            framework,
            format,
        } => {
            let generator = Generator::with_config(generator_config);
            render::handle_render(&generator, &parameter, framework, format)
        }
        Commands::Frameworks => {
            frameworks::handle_frameworks_command(&generator_config);
            Ok(())
        }
    }
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
