use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use super::{Generator, GeneratorOptions, Target};
use crate::error::{GenError, Result};
use crate::headers::list_extra_headers;

/// Constructs a fresh generator instance.
pub type GeneratorFactory = fn() -> Box<dyn Generator>;

/// Inputs the catalog needs to build every target's options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Where generated files are written
    pub directory: PathBuf,
    /// Directory with override files and supplemental XML
    pub configs: PathBuf,
    /// Optional directory of extra headers to include
    pub headers_dir: Option<PathBuf>,
    /// Emit include guards
    pub protect: bool,
}

/// A resolved target: how to construct its generator and the options to run it with.
#[derive(Debug, Clone)]
pub struct GeneratorDescriptor {
    pub target: Target,
    pub factory: GeneratorFactory,
    pub options: GeneratorOptions,
}

impl GeneratorDescriptor {
    /// Construct the generator for this target.
    #[must_use]
    pub fn create_generator(&self) -> Box<dyn Generator> {
        (self.factory)()
    }
}

/// Build the descriptor for every known target, keyed by target name.
///
/// Override files in the config directory are not checked here; a missing
/// file is the generator's concern.
///
/// # Errors
///
/// Returns [`GenError::Filesystem`] if `headers_dir` is set but cannot be walked.
pub fn build_generator_catalog(
    config: &CatalogConfig,
) -> Result<BTreeMap<String, GeneratorDescriptor>> {
    let extra_headers = match &config.headers_dir {
        Some(dir) => list_extra_headers(dir).map_err(|e| GenError::filesystem(dir, e))?,
        None => Vec::new(),
    };
    debug!(count = extra_headers.len(), "Collected extra headers");

    Ok(Target::ALL
        .into_iter()
        .map(|target| {
            let descriptor = GeneratorDescriptor {
                target,
                factory: target.factory(),
                options: target.build_options(config, &extra_headers),
            };
            (target.name().to_string(), descriptor)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(headers_dir: Option<PathBuf>) -> CatalogConfig {
        CatalogConfig {
            directory: PathBuf::from("out"),
            configs: PathBuf::from("missing-configs"),
            headers_dir,
            protect: true,
        }
    }

    #[test]
    fn test_catalog_without_headers_dir() {
        let catalog = build_generator_catalog(&config(None)).unwrap();
        assert_eq!(catalog.len(), Target::ALL.len());
        let entry = &catalog["generated_vulkan_dispatch_table.h"];
        assert_eq!(entry.target, Target::DispatchTable);
        assert!(entry.options.extra_headers.is_empty());
        assert!(entry.options.protect_file);
        assert_eq!(entry.create_generator().name(), "dispatch_table");
    }

    #[test]
    fn test_catalog_embeds_header_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vk_video")).unwrap();
        std::fs::write(dir.path().join("vk_video/codec.h"), "").unwrap();

        let catalog = build_generator_catalog(&config(Some(dir.path().to_path_buf()))).unwrap();
        let entry = &catalog["generated_vulkan_dispatch_table.h"];
        assert_eq!(entry.options.extra_headers, vec![PathBuf::from("vk_video/codec.h")]);
    }

    #[test]
    fn test_missing_headers_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_generator_catalog(&config(Some(dir.path().join("absent")))).unwrap_err();
        assert!(matches!(err, GenError::Filesystem { .. }));
    }
}
