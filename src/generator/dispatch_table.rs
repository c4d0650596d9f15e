use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use askama::Template;
use serde::Deserialize;
use tracing::debug;

use super::{Generator, GeneratorOptions};
use crate::diagnostics::DiagnosticSinks;
use crate::document::Document;
use crate::headers::include_path;
use crate::registry::{InterfaceKind, Registry, RequiredCommand};

/// Commands to leave out of generated output.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Blacklists {
    #[serde(default)]
    pub functions: Vec<String>,
}

impl Blacklists {
    /// Load a blacklist file. A missing file yields an empty blacklist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Blacklists::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read blacklist: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse blacklist: {}", path.display()))
    }
}

/// Which table a command is dispatched through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchLevel {
    Instance,
    Device,
}

impl DispatchLevel {
    /// Classify by the type of the first parameter. Commands without a
    /// dispatchable first parameter are global and belong to no table.
    #[must_use]
    pub fn of(first_param_type: Option<&str>) -> Option<Self> {
        match first_param_type? {
            "VkInstance" | "VkPhysicalDevice" => Some(DispatchLevel::Instance),
            "VkDevice" | "VkQueue" | "VkCommandBuffer" => Some(DispatchLevel::Device),
            _ => None,
        }
    }
}

/// One function pointer slot in a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Full command name, e.g. `vkCreateDevice`
    pub command: String,
    /// Struct member name, e.g. `CreateDevice`
    pub member: String,
    /// Whether the entry is wrapped in `#ifdef`
    pub has_protect: bool,
    /// Macro the entry is wrapped in
    pub protect: String,
}

impl TableEntry {
    fn from_required(required: &RequiredCommand, protect_feature: bool) -> Self {
        let name = &required.command.name;
        let protect = required.protect.clone().or_else(|| {
            protect_feature.then(|| required.required_by.clone())
        });
        TableEntry {
            command: name.clone(),
            member: name.strip_prefix("vk").unwrap_or(name).to_string(),
            has_protect: protect.is_some(),
            protect: protect.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "dispatch_table.h.txt", escape = "none")]
struct DispatchTableTemplate {
    prefix_text: Vec<String>,
    protect_file: bool,
    guard: String,
    extra_headers: Vec<String>,
    instance_entries: Vec<TableEntry>,
    device_entries: Vec<TableEntry>,
}

/// Emits `InstanceTable`/`DeviceTable` structs and their loader functions.
#[derive(Debug, Default)]
pub struct DispatchTableGenerator {
    video: Option<Document>,
}

impl DispatchTableGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split required commands into instance and device tables.
    pub fn build_tables(
        registry: &Registry,
        options: &GeneratorOptions,
        blacklists: &Blacklists,
    ) -> (Vec<TableEntry>, Vec<TableEntry>) {
        let skipped: HashSet<&str> = blacklists.functions.iter().map(String::as_str).collect();
        let mut instance = Vec::new();
        let mut device = Vec::new();
        for required in registry.required_commands() {
            if skipped.contains(required.command.name.as_str()) {
                continue;
            }
            let entry = TableEntry::from_required(required, options.protect_feature);
            match DispatchLevel::of(required.command.dispatch_type()) {
                Some(DispatchLevel::Instance) => instance.push(entry),
                Some(DispatchLevel::Device) => device.push(entry),
                None => {}
            }
        }
        (instance, device)
    }

    /// Render the header text without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the blacklist cannot be loaded or the template fails.
    pub fn render(&self, registry: &Registry, options: &GeneratorOptions) -> anyhow::Result<String> {
        let blacklists = match &options.blacklists {
            Some(path) => Blacklists::load(path)?,
            None => Blacklists::default(),
        };
        let (instance_entries, device_entries) = Self::build_tables(registry, options, &blacklists);
        let template = DispatchTableTemplate {
            prefix_text: options.prefix_text.clone(),
            protect_file: options.protect_file,
            guard: include_guard(&options.filename),
            extra_headers: options.extra_headers.iter().map(|h| include_path(h)).collect(),
            instance_entries,
            device_entries,
        };
        Ok(template.render()?)
    }
}

/// `generated_vulkan_dispatch_table.h` → `GENERATED_VULKAN_DISPATCH_TABLE_H`
fn include_guard(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

impl Generator for DispatchTableGenerator {
    fn name(&self) -> &'static str {
        "dispatch_table"
    }

    fn attach_video(&mut self, video: Document) {
        debug!(elements = video.root.element_count(), "Attached video registry");
        self.video = Some(video);
    }

    fn generate(
        &mut self,
        registry: &Registry,
        options: &GeneratorOptions,
        sinks: &mut DiagnosticSinks,
    ) -> anyhow::Result<PathBuf> {
        let rendered = self.render(registry, options)?;

        if let Some(video) = &self.video {
            sinks.diag_line(format!(
                "* video registry: {} extension(s)",
                video
                    .root
                    .find_all("extensions")
                    .flat_map(|e| e.find_all("extension"))
                    .count()
            ));
        }
        for required in registry.required_commands() {
            let kind = match required.required_by_kind {
                InterfaceKind::Feature => "feature",
                InterfaceKind::Extension => "extension",
            };
            sinks.diag_line(format!(
                "* {} required by {kind} {}",
                required.command.name, required.required_by
            ));
        }

        fs::create_dir_all(&options.directory).with_context(|| {
            format!("Failed to create output directory: {}", options.directory.display())
        })?;
        let path = options.output_path();
        fs::write(&path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Generated dispatch table");
        Ok(path)
    }
}
