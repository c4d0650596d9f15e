use std::path::PathBuf;

/// Everything a generator needs to know about the file it produces.
///
/// Built once per run by the catalog and only borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Output file name
    pub filename: String,
    /// Output directory
    pub directory: PathBuf,
    /// License and preamble lines written at the top of the file
    pub prefix_text: Vec<String>,
    /// Wrap the whole file in an include guard
    pub protect_file: bool,
    /// Wrap each feature/extension's entries in `#ifdef <name>`
    pub protect_feature: bool,
    /// API a feature must list in its `api` attribute
    pub api_name: String,
    /// Feature names to include (regex)
    pub versions: String,
    /// Included feature names to emit (regex)
    pub emit_versions: String,
    /// `supported` value that includes an extension by default
    pub default_extensions: Option<String>,
    /// Extension names to include regardless of support (regex)
    pub add_extensions: Option<String>,
    /// Extension names to exclude (regex)
    pub remove_extensions: Option<String>,
    /// Included extension names to emit (regex)
    pub emit_extensions: String,
    /// Headers included right after `vulkan/vulkan.h`, relative to the headers dir
    pub extra_headers: Vec<PathBuf>,
    /// Optional JSON file listing commands to leave out
    pub blacklists: Option<PathBuf>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            filename: String::new(),
            directory: PathBuf::from("."),
            prefix_text: Vec::new(),
            protect_file: true,
            protect_feature: false,
            api_name: "vulkan".to_string(),
            versions: ".*".to_string(),
            emit_versions: ".*".to_string(),
            default_extensions: Some("vulkan".to_string()),
            add_extensions: None,
            remove_extensions: None,
            emit_extensions: ".*".to_string(),
            extra_headers: Vec::new(),
            blacklists: None,
        }
    }
}

impl GeneratorOptions {
    /// Full path of the file this generator writes.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// `* options.<field> = <value>` lines for verbose progress output.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "None".to_string());
        vec![
            format!("* options.versions          = {}", self.versions),
            format!("* options.emitversions      = {}", self.emit_versions),
            format!("* options.defaultExtensions = {}", opt(&self.default_extensions)),
            format!("* options.addExtensions     = {}", opt(&self.add_extensions)),
            format!("* options.removeExtensions  = {}", opt(&self.remove_extensions)),
            format!("* options.emitExtensions    = {}", self.emit_extensions),
        ]
    }
}
