//! # CLI Module
//!
//! Command-line surface of the `layergen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Merge the registry with every `*.xml` in the config directory and generate
//! one target:
//!
//! ```bash
//! layergen generate generated_vulkan_dispatch_table.h \
//!     --registry vk.xml --video video.xml --configs layers/json -o src/generated
//! ```
//!
//! Options:
//! - `-o, --directory <DIR>` - Output directory (default: `.`)
//! - `--registry <FILE>` / `--video <FILE>` - Input documents
//! - `--configs <DIR>` - Supplemental XML and `blacklists.json`
//! - `--headers-dir <DIR>` - Extra headers to include after `vulkan/vulkan.h`
//! - `--no-protect` - Skip include guards
//! - `--validate` - Report `group` attributes that name no enums group
//! - `--dump` / `--debug` - Write `regdump.txt` / `<name>_merged.xml` to `--dump-dir`
//! - `--time` - Report per-step timing
//! - `-v, --verbose` - Print the selected options and progress
//! - `--errfile <FILE>` / `--diagfile <FILE>` - Redirect error and diagnostic output
//!
//! ### `targets`
//!
//! List every target name `generate` accepts.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use layergen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands, GenerateArgs};
