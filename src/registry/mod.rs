//! # Registry Module
//!
//! Indexes a merged registry document so generators can work from named
//! commands, types, features and extensions instead of raw elements.
//!
//! ## Overview
//!
//! [`Registry::load`] takes ownership of the merged [`Document`] and builds:
//!
//! - **Types** - `types/type`, keyed by `name` attribute or `<name>` child
//! - **Groups** - every `enums` element with a `name`
//! - **Commands** - `commands/command`, with `alias` entries resolved to the
//!   parameters of the command they alias
//! - **Platforms** - platform name to its protect macro
//! - **Features / Extensions** - their `require` blocks
//!
//! It then applies the feature/extension filters from [`GeneratorOptions`]
//! and records which commands are required, in first-required order. A command
//! required by a platform extension carries that platform's protect macro.
//!
//! Duplicate leaf declarations (which the extension engine can produce) are
//! tolerated: the first declaration of a name wins and later ones are counted
//! in [`Registry::duplicates`].

mod dump;
mod validate;

pub use validate::{print_issues, ValidationIssue};

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use regex::Regex;
use tracing::{debug, warn};

use crate::document::{Document, Element};
use crate::generator::GeneratorOptions;

/// A command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Base type name, e.g. `VkDevice`
    pub type_name: String,
    /// Parameter name, e.g. `device`
    pub name: String,
    /// Full declaration text, e.g. `const VkAllocationCallbacks* pAllocator`
    pub decl: String,
    /// Value of the `group` attribute, naming an `enums` group
    pub group: Option<String>,
}

/// A command declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
    /// Name of the command this one aliases
    pub alias: Option<String>,
}

impl Command {
    /// Type of the first parameter, which decides dispatch level.
    #[must_use]
    pub fn dispatch_type(&self) -> Option<&str> {
        self.params.first().map(|p| p.type_name.as_str())
    }
}

/// A `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub category: Option<String>,
    pub alias: Option<String>,
}

/// What kind of interface required a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Feature,
    Extension,
}

/// A feature (`<feature>`) or extension (`<extension>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub kind: InterfaceKind,
    pub name: String,
    /// `api` for features, `supported` for extensions (comma separated)
    pub apis: Vec<String>,
    /// Platform name for platform-specific extensions
    pub platform: Option<String>,
    /// Command names from every `require` block, in order
    pub commands: Vec<String>,
    /// Whether the selection filters include this interface
    pub selected: bool,
    /// Whether the emit filters include this interface
    pub emitted: bool,
}

/// A command required by an emitted feature or extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredCommand {
    pub command: Command,
    /// Feature or extension that first required it
    pub required_by: String,
    pub required_by_kind: InterfaceKind,
    /// Platform protect macro, e.g. `VK_USE_PLATFORM_WIN32_KHR`
    pub protect: Option<String>,
}

/// Counts of leaf declarations that appeared more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Duplicates {
    pub types: usize,
    pub commands: usize,
    pub interfaces: usize,
}

/// Indexed view of a merged registry document.
#[derive(Debug, Clone)]
pub struct Registry {
    document: Document,
    types: Vec<TypeDecl>,
    groups: HashSet<String>,
    commands: Vec<Command>,
    command_index: HashMap<String, usize>,
    platforms: HashMap<String, String>,
    interfaces: Vec<Interface>,
    required: Vec<RequiredCommand>,
    duplicates: Duplicates,
}

/// Compiled feature/extension filters.
struct Filters {
    api_name: String,
    versions: Regex,
    emit_versions: Regex,
    default_extensions: Option<String>,
    add_extensions: Option<Regex>,
    remove_extensions: Option<Regex>,
    emit_extensions: Regex,
}

fn anchored(pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("Invalid name filter pattern: {pattern}"))
}

impl Filters {
    fn compile(options: &GeneratorOptions) -> anyhow::Result<Self> {
        Ok(Filters {
            api_name: options.api_name.clone(),
            versions: anchored(&options.versions)?,
            emit_versions: anchored(&options.emit_versions)?,
            default_extensions: options.default_extensions.clone(),
            add_extensions: options.add_extensions.as_deref().map(anchored).transpose()?,
            remove_extensions: options
                .remove_extensions
                .as_deref()
                .map(anchored)
                .transpose()?,
            emit_extensions: anchored(&options.emit_extensions)?,
        })
    }

    fn apply(&self, iface: &mut Interface) {
        match iface.kind {
            InterfaceKind::Feature => {
                let api_ok = iface.apis.is_empty() || iface.apis.iter().any(|a| *a == self.api_name);
                iface.selected = api_ok && self.versions.is_match(&iface.name);
                iface.emitted = iface.selected && self.emit_versions.is_match(&iface.name);
            }
            InterfaceKind::Extension => {
                let by_default = self
                    .default_extensions
                    .as_ref()
                    .is_some_and(|d| iface.apis.iter().any(|a| a == d));
                let added = self
                    .add_extensions
                    .as_ref()
                    .is_some_and(|r| r.is_match(&iface.name));
                let removed = self
                    .remove_extensions
                    .as_ref()
                    .is_some_and(|r| r.is_match(&iface.name));
                iface.selected = (by_default || added) && !removed;
                iface.emitted = iface.selected && self.emit_extensions.is_match(&iface.name);
            }
        }
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_param(element: &Element) -> Param {
    Param {
        type_name: element.child_text("type").unwrap_or_default(),
        name: element.child_text("name").unwrap_or_default(),
        decl: element.text().split_whitespace().collect::<Vec<_>>().join(" "),
        group: element.attr("group").map(str::to_string),
    }
}

fn parse_command(element: &Element) -> Option<Command> {
    if let Some(alias) = element.attr("alias") {
        return Some(Command {
            name: element.attr("name")?.to_string(),
            return_type: String::new(),
            params: Vec::new(),
            alias: Some(alias.to_string()),
        });
    }
    let proto = element.find("proto")?;
    Some(Command {
        name: proto.child_text("name")?,
        return_type: proto.child_text("type").unwrap_or_default(),
        params: element.find_all("param").map(parse_param).collect(),
        alias: None,
    })
}

fn parse_interface(element: &Element, kind: InterfaceKind) -> Option<Interface> {
    let apis = match kind {
        InterfaceKind::Feature => split_list(element.attr("api")),
        InterfaceKind::Extension => split_list(element.attr("supported")),
    };
    let commands = element
        .find_all("require")
        .flat_map(|r| r.find_all("command"))
        .filter_map(|c| c.attr("name").map(str::to_string))
        .collect();
    Some(Interface {
        kind,
        name: element.attr("name")?.to_string(),
        apis,
        platform: element.attr("platform").map(str::to_string),
        commands,
        selected: false,
        emitted: false,
    })
}

impl Registry {
    /// Index `document` and apply the selection filters in `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if a filter pattern in `options` is not a valid regex.
    pub fn load(document: Document, options: &GeneratorOptions) -> anyhow::Result<Self> {
        let filters = Filters::compile(options)?;
        let mut registry = Registry {
            document: Document::new(Element::new("registry")),
            types: Vec::new(),
            groups: HashSet::new(),
            commands: Vec::new(),
            command_index: HashMap::new(),
            platforms: HashMap::new(),
            interfaces: Vec::new(),
            required: Vec::new(),
            duplicates: Duplicates::default(),
        };

        let root = &document.root;
        let mut type_names = HashSet::new();
        for ty in root.find_all("types").flat_map(|t| t.find_all("type")) {
            let Some(name) = ty
                .attr("name")
                .map(str::to_string)
                .or_else(|| ty.child_text("name"))
            else {
                continue;
            };
            if !type_names.insert(name.clone()) {
                registry.duplicates.types += 1;
                continue;
            }
            registry.types.push(TypeDecl {
                name,
                category: ty.attr("category").map(str::to_string),
                alias: ty.attr("alias").map(str::to_string),
            });
        }

        registry.groups = root
            .find_all("enums")
            .filter_map(|e| e.attr("name").map(str::to_string))
            .collect();

        for element in root.find_all("commands").flat_map(|c| c.find_all("command")) {
            let Some(command) = parse_command(element) else {
                warn!("Skipping command without a name");
                continue;
            };
            if registry.command_index.contains_key(&command.name) {
                registry.duplicates.commands += 1;
                continue;
            }
            registry
                .command_index
                .insert(command.name.clone(), registry.commands.len());
            registry.commands.push(command);
        }

        for platform in root.find_all("platforms").flat_map(|p| p.find_all("platform")) {
            if let (Some(name), Some(protect)) = (platform.attr("name"), platform.attr("protect")) {
                registry
                    .platforms
                    .entry(name.to_string())
                    .or_insert_with(|| protect.to_string());
            }
        }

        let features = root
            .find_all("feature")
            .filter_map(|f| parse_interface(f, InterfaceKind::Feature));
        let extensions = root
            .find_all("extensions")
            .flat_map(|e| e.find_all("extension"))
            .filter_map(|e| parse_interface(e, InterfaceKind::Extension));
        let mut seen = HashSet::new();
        for mut iface in features.chain(extensions) {
            if !seen.insert(iface.name.clone()) {
                registry.duplicates.interfaces += 1;
                continue;
            }
            filters.apply(&mut iface);
            registry.interfaces.push(iface);
        }

        registry.required = registry.resolve_required();
        registry.document = document;

        debug!(
            types = registry.types.len(),
            commands = registry.commands.len(),
            interfaces = registry.interfaces.len(),
            required = registry.required.len(),
            "Loaded registry"
        );
        if registry.duplicates != Duplicates::default() {
            warn!(duplicates = ?registry.duplicates, "Registry contains duplicate declarations");
        }
        Ok(registry)
    }

    fn resolve_required(&self) -> Vec<RequiredCommand> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for iface in self.interfaces.iter().filter(|i| i.emitted) {
            let protect = iface
                .platform
                .as_ref()
                .and_then(|p| self.platforms.get(p))
                .cloned();
            for name in &iface.commands {
                if !seen.insert(name.clone()) {
                    continue;
                }
                let Some(command) = self.resolved_command(name) else {
                    warn!(command = %name, required_by = %iface.name, "Required command is not declared");
                    continue;
                };
                out.push(RequiredCommand {
                    command,
                    required_by: iface.name.clone(),
                    required_by_kind: iface.kind,
                    protect: protect.clone(),
                });
            }
        }
        out
    }

    /// Look up a command, following `alias` to borrow the aliased signature.
    #[must_use]
    pub fn resolved_command(&self, name: &str) -> Option<Command> {
        let mut current = self.command(name)?;
        let mut hops = 0;
        while let Some(target) = current.alias.as_deref() {
            hops += 1;
            if hops > self.commands.len() {
                return None;
            }
            current = self.command(target)?;
        }
        Some(Command {
            name: name.to_string(),
            return_type: current.return_type.clone(),
            params: current.params.clone(),
            alias: self.command(name).and_then(|c| c.alias.clone()),
        })
    }

    /// The merged document this registry was built from.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.command_index.get(name).map(|&i| &self.commands[i])
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    #[must_use]
    pub fn platform_protect(&self, platform: &str) -> Option<&str> {
        self.platforms.get(platform).map(String::as_str)
    }

    #[must_use]
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Commands required by emitted features and extensions, in first-required order.
    #[must_use]
    pub fn required_commands(&self) -> &[RequiredCommand] {
        &self.required
    }

    #[must_use]
    pub fn duplicates(&self) -> Duplicates {
        self.duplicates
    }
}
