//! # layergen
//!
//! **layergen** generates Vulkan layer source files from the Khronos XML API
//! registry, after merging the registry with supplemental XML documents kept
//! next to the layer's configuration.
//!
//! ## Overview
//!
//! A layer rarely wants the upstream registry exactly as published. It may need
//! extra commands, vendor types or private features declared before a
//! generator runs. Rather than patching `vk.xml`, those declarations live in
//! small XML files in a config directory and are merged in at generation time.
//!
//! ## Architecture
//!
//! - **[`document`]** - owned XML element tree and the structural merge
//!   ([`document::extend`])
//! - **[`headers`]** - recursive listing of extra headers to include
//! - **[`registry`]** - indexed view of the merged document: commands, types,
//!   feature/extension selection, group validation, textual dump
//! - **[`generator`]** - the [`Generator`](generator::Generator) contract, per-target
//!   options, the target catalog and the built-in dispatch-table generator
//! - **[`patches`]** - in-place fixes applied to the base registry before merging
//! - **[`orchestrator`]** - one run from target name to written file
//! - **[`diagnostics`]** - stopwatch, dump sinks, error/diagnostic streams
//! - **[`error`]** - [`GenError`], the failure taxonomy of a run
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - the `layergen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(layergen)
//!     participant Orch as orchestrator::run
//!     participant Cat as generator::build_generator_catalog
//!     participant Doc as document
//!     participant Reg as registry::Registry
//!     participant Gen as Generator
//!
//!     CLI->>Orch: RunRequest
//!     Orch->>Cat: CatalogConfig
//!     Cat-->>Orch: { target → (factory, options) }
//!     Orch->>Doc: parse vk.xml, video.xml
//!     Orch->>Doc: extend with each configs/*.xml
//!     Orch->>Reg: Registry::load(merged, options)
//!     Orch->>Gen: generate(&registry, &options)
//!     Gen-->>Orch: output path
//! ```
//!
//! ## Merge Semantics
//!
//! For each child element of the supplement's root, in order: if its tag is in
//! [`LEAF_TAGS`](document::LEAF_TAGS) or the destination has no element with
//! that tag, the whole subtree is appended; otherwise the merge descends into
//! the first destination element with that tag. A supplement that redeclares a
//! command therefore produces two `<command>` siblings; the registry keeps the
//! first and counts the rest as duplicates.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use layergen::diagnostics::{DiagnosticSinks, FileDumpSink};
//! use layergen::orchestrator::{run, RunRequest};
//!
//! let request = RunRequest {
//!     target: "generated_vulkan_dispatch_table.h".to_string(),
//!     configs: "layers/json".into(),
//!     directory: "src/generated".into(),
//!     ..RunRequest::default()
//! };
//! let outcome = run(&request, &mut DiagnosticSinks::stderr(), &mut FileDumpSink::new("."))?;
//! println!("wrote {}", outcome.output.display());
//! ```

pub mod cli;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod generator;
pub mod headers;
pub mod logging;
pub mod orchestrator;
pub mod patches;
pub mod registry;

pub use document::{extend, Document, Element, Node};
pub use error::GenError;
pub use generator::{build_generator_catalog, Generator, GeneratorOptions, Target};
pub use orchestrator::{run, RunOutcome, RunRequest};
pub use registry::Registry;
