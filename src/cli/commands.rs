use crate::diagnostics::{DiagnosticSinks, FileDumpSink};
use crate::generator::Target;
use crate::orchestrator::{run, RunRequest};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for layergen
///
/// Merges a Vulkan registry with supplemental XML and generates layer
/// source files from it.
#[derive(Parser, Debug)]
#[command(name = "layergen")]
#[command(about = "Vulkan layer code generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for layergen
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one target from the registry
    Generate(GenerateArgs),
    /// List the targets that can be generated
    Targets,
}

/// Arguments for `generate`
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Target to generate, e.g. generated_vulkan_dispatch_table.h
    pub target: String,

    /// Output directory for generated files
    #[arg(short = 'o', long, default_value = ".")]
    pub directory: PathBuf,

    /// Base registry document
    #[arg(long, default_value = "vk.xml", env = "LAYERGEN_REGISTRY")]
    pub registry: PathBuf,

    /// Video codec registry document
    #[arg(long, default_value = "video.xml", env = "LAYERGEN_VIDEO")]
    pub video: PathBuf,

    /// Directory with supplemental XML and generator config files
    #[arg(long, default_value = ".")]
    pub configs: PathBuf,

    /// Directory of extra headers to include after vulkan/vulkan.h
    #[arg(long)]
    pub headers_dir: Option<PathBuf>,

    /// Do not wrap generated files in include guards
    #[arg(long, default_value_t = false)]
    pub no_protect: bool,

    /// Check that every `group` attribute names an enums group
    #[arg(long, default_value_t = false)]
    pub validate: bool,

    /// Write a registry listing to regdump.txt
    #[arg(long, default_value_t = false)]
    pub dump: bool,

    /// Write the merged registry after each supplement as <name>_merged.xml
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Report how long each step takes
    #[arg(long, default_value_t = false)]
    pub time: bool,

    /// Print progress and the selected options
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Write errors and warnings to this file instead of stderr
    #[arg(long)]
    pub errfile: Option<PathBuf>,

    /// Write generator diagnostics to this file
    #[arg(long)]
    pub diagfile: Option<PathBuf>,

    /// Directory for regdump.txt and merged registry dumps
    #[arg(long, default_value = ".")]
    pub dump_dir: PathBuf,
}

impl GenerateArgs {
    /// Translate parsed flags into a run request.
    #[must_use]
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            target: self.target.clone(),
            directory: self.directory.clone(),
            registry: self.registry.clone(),
            video: self.video.clone(),
            configs: self.configs.clone(),
            headers_dir: self.headers_dir.clone(),
            protect: !self.no_protect,
            validate: self.validate,
            dump: self.dump,
            debug: self.debug,
            timing: self.time,
            quiet: !self.verbose,
        }
    }
}

impl Cli {
    /// Whether the invocation asked for verbose output.
    #[must_use]
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Generate(args) => args.verbose,
            Commands::Targets => false,
        }
    }
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The error or diagnostic file cannot be created
/// - The requested target is unknown
/// - Any document cannot be read or parsed
/// - Generation fails
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let mut sinks =
                DiagnosticSinks::from_paths(args.errfile.as_deref(), args.diagfile.as_deref())
                    .context("Failed to open error or diagnostic file")?;
            let mut dumps = FileDumpSink::new(&args.dump_dir);
            let outcome = run(&args.to_request(), &mut sinks, &mut dumps)?;
            tracing::debug!(output = %outcome.output.display(), "Run finished");
            Ok(())
        }
        Commands::Targets => {
            for target in Target::ALL {
                println!("{target}");
            }
            Ok(())
        }
    }
}
