//! # Generator Module
//!
//! The generator module defines how output files are produced from a loaded
//! [`Registry`](crate::registry::Registry), and which targets exist.
//!
//! ## Overview
//!
//! - **[`Generator`]** - the contract every output generator implements
//! - **[`GeneratorOptions`]** - the options record for one output file
//! - **[`Target`]** - the closed set of known targets; each knows its file
//!   name, how to build its options and how to construct its generator
//! - **[`build_generator_catalog`]** - resolves every target into a
//!   [`GeneratorDescriptor`] keyed by target name
//!
//! ## Architecture
//!
//! ```text
//! CatalogConfig → build_generator_catalog → { target name → (factory, options) }
//!                                                   │
//!             Registry + GeneratorOptions → Generator::generate → output file
//! ```
//!
//! Output is rendered with Askama templates from `templates/`:
//!
//! - `dispatch_table.h.txt` - instance/device dispatch tables for a layer
//!
//! ## Adding a Target
//!
//! Add a variant to [`Target`], list it in [`Target::ALL`], and fill in its
//! file name, options builder and factory. The catalog picks it up without
//! further changes.

mod catalog;
mod dispatch_table;
mod options;
pub mod preamble;

pub use catalog::{build_generator_catalog, CatalogConfig, GeneratorDescriptor, GeneratorFactory};
pub use dispatch_table::{Blacklists, DispatchLevel, DispatchTableGenerator, TableEntry};
pub use options::GeneratorOptions;

use std::path::{Path, PathBuf};

use crate::diagnostics::DiagnosticSinks;
use crate::document::Document;
use crate::registry::Registry;

/// Produces one output file from a loaded registry.
pub trait Generator {
    /// Short name used in progress output.
    fn name(&self) -> &'static str;

    /// Hand over the video codec document as auxiliary input.
    fn attach_video(&mut self, video: Document);

    /// Write the output described by `options` and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if override files cannot be read, the template fails
    /// to render, or the output cannot be written.
    fn generate(
        &mut self,
        registry: &Registry,
        options: &GeneratorOptions,
        sinks: &mut DiagnosticSinks,
    ) -> anyhow::Result<PathBuf>;
}

/// Known generation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Instance and device dispatch tables for a layer
    DispatchTable,
}

impl Target {
    /// Every supported target.
    pub const ALL: [Target; 1] = [Target::DispatchTable];

    /// Name a target is requested by; also its output file name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Target::DispatchTable => "generated_vulkan_dispatch_table.h",
        }
    }

    /// Resolve a requested target name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Target::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Options for this target under `config`.
    fn build_options(self, config: &CatalogConfig, extra_headers: &[PathBuf]) -> GeneratorOptions {
        match self {
            Target::DispatchTable => GeneratorOptions {
                filename: self.name().to_string(),
                directory: config.directory.clone(),
                prefix_text: preamble::prefix_lines(preamble::VULKAN_PREFIX),
                protect_file: config.protect,
                protect_feature: false,
                extra_headers: extra_headers.to_vec(),
                blacklists: Some(config_file(&config.configs, DEFAULT_BLACKLISTS)),
                ..GeneratorOptions::default()
            },
        }
    }

    fn factory(self) -> GeneratorFactory {
        match self {
            Target::DispatchTable => new_dispatch_table_generator,
        }
    }
}

fn new_dispatch_table_generator() -> Box<dyn Generator> {
    Box::new(DispatchTableGenerator::new())
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Command blacklist read from the config directory.
pub const DEFAULT_BLACKLISTS: &str = "blacklists.json";

fn config_file(configs: &Path, name: &str) -> PathBuf {
    configs.join(name)
}
