//! # Orchestrator Module
//!
//! One generation run, start to finish:
//!
//! ```text
//! catalog → resolve target → parse vk.xml + video.xml → patch
//!         → merge configs/*.xml → load registry → validate? → dump? → generate
//! ```
//!
//! Every failure ends the run and is returned as a [`GenError`]. There is no
//! rollback: if merging a supplement fails, the in-memory registry is simply
//! dropped with whatever was merged before it.
//!
//! Progress, timing and validation output go to the run's
//! [`DiagnosticSinks`]; inspection artifacts (`regdump.txt`, merged XML) go to
//! the injected [`DumpSink`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diagnostics::{DiagnosticSinks, DumpSink, Stopwatch};
use crate::document::{extend_from_path, Document};
use crate::error::{GenError, Result};
use crate::generator::{build_generator_catalog, CatalogConfig, Target};
use crate::patches::apply_patches;
use crate::registry::{print_issues, Registry};

/// Name of the registry dump artifact.
pub const REGISTRY_DUMP: &str = "regdump.txt";

/// Extension a config-directory file needs to be merged as a supplement.
pub const SUPPLEMENT_EXTENSION: &str = "xml";

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Target name, e.g. `generated_vulkan_dispatch_table.h`
    pub target: String,
    /// Output directory
    pub directory: PathBuf,
    /// Base registry document
    pub registry: PathBuf,
    /// Video codec registry document
    pub video: PathBuf,
    /// Config directory: supplemental XML and generator override files
    pub configs: PathBuf,
    /// Optional directory of extra headers to include
    pub headers_dir: Option<PathBuf>,
    /// Emit include guards
    pub protect: bool,
    /// Run group validation
    pub validate: bool,
    /// Write the registry dump
    pub dump: bool,
    /// Write the merged registry after each supplement
    pub debug: bool,
    /// Report step timing
    pub timing: bool,
    /// Suppress progress output
    pub quiet: bool,
}

impl Default for RunRequest {
    fn default() -> Self {
        RunRequest {
            target: String::new(),
            directory: PathBuf::from("."),
            registry: PathBuf::from("vk.xml"),
            video: PathBuf::from("video.xml"),
            configs: PathBuf::from("."),
            headers_dir: None,
            protect: true,
            validate: false,
            dump: false,
            debug: false,
            timing: false,
            quiet: true,
        }
    }
}

impl RunRequest {
    fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            directory: self.directory.clone(),
            configs: self.configs.clone(),
            headers_dir: self.headers_dir.clone(),
            protect: self.protect,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub target: Target,
    /// Path of the generated file
    pub output: PathBuf,
    /// Supplements merged into the registry, in merge order
    pub supplements: Vec<PathBuf>,
    /// Group validation issues reported (always 0 without `validate`)
    pub validation_issues: usize,
}

/// Supplemental documents in `configs`, in directory-listing order.
///
/// Symlinks are followed; a link to a regular file counts as that file.
///
/// # Errors
///
/// Returns [`GenError::Filesystem`] if the directory cannot be listed.
pub fn discover_supplements(configs: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(configs).map_err(|e| GenError::filesystem(configs, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GenError::filesystem(configs, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SUPPLEMENT_EXTENSION) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Run one generation.
///
/// # Errors
///
/// - [`GenError::UnknownTarget`] when `request.target` is not in the catalog;
///   nothing is read or written beyond the headers directory listing
/// - [`GenError::DocumentParse`] when any document fails to parse
/// - [`GenError::Filesystem`] for unreadable inputs or unwritable artifacts
/// - [`GenError::Generation`] when registry loading or the generator fails
pub fn run(
    request: &RunRequest,
    sinks: &mut DiagnosticSinks,
    dumps: &mut dyn DumpSink,
) -> Result<RunOutcome> {
    let mut catalog = build_generator_catalog(&request.catalog_config())?;
    let Some(descriptor) = catalog.remove(&request.target) else {
        let err = GenError::UnknownTarget(request.target.clone());
        sinks.error_line(format!("* {err}"));
        return Err(err);
    };
    let options = &descriptor.options;

    if !request.quiet {
        sinks.error_line(format!("* Building {}", options.filename));
        for line in options.summary_lines() {
            sinks.error_line(line);
        }
    }

    let mut generator = descriptor.create_generator();

    let watch = Stopwatch::start("make ElementTree", request.timing);
    let mut document = Document::from_path(&request.registry)?;
    let video = Document::from_path(&request.video)?;
    watch.stop(&mut sinks.err);
    generator.attach_video(video);

    let watch = Stopwatch::start("patch ElementTree", request.timing);
    apply_patches(&mut document);
    watch.stop(&mut sinks.err);

    let supplements = discover_supplements(&request.configs)?;
    for path in &supplements {
        let debug_sink: Option<&mut dyn DumpSink> = if request.debug {
            Some(&mut *dumps)
        } else {
            None
        };
        extend_from_path(&mut document, path, debug_sink)?;
    }

    let watch = Stopwatch::start("parse ElementTree", request.timing);
    let registry = Registry::load(document, &options)?;
    watch.stop(&mut sinks.err);

    let mut validation_issues = 0;
    if request.validate {
        let issues = registry.validate_groups();
        validation_issues = issues.len();
        if !issues.is_empty() {
            warn!(count = issues.len(), "Group validation found issues; continuing");
            print_issues(&mut sinks.err, &issues)
                .map_err(|e| GenError::filesystem("<error sink>", e))?;
        }
    }

    if request.dump {
        sinks.error_line(format!("* Dumping registry to {REGISTRY_DUMP}"));
        let mut text = Vec::new();
        registry
            .dump(&mut text)
            .map_err(|e| GenError::filesystem(REGISTRY_DUMP, e))?;
        dumps
            .dump(REGISTRY_DUMP, &String::from_utf8_lossy(&text))
            .map_err(|e| GenError::filesystem(REGISTRY_DUMP, e))?;
    }

    let watch = Stopwatch::start(format!("generate {}", options.filename), request.timing);
    let output = generator.generate(&registry, &options, sinks)?;
    watch.stop(&mut sinks.err);

    if !request.quiet {
        sinks.error_line(format!("* Generated {}", options.filename));
    }
    debug!(
        run_target = %descriptor.target,
        generator = generator.name(),
        output = %output.display(),
        supplements = supplements.len(),
        "Generation complete"
    );

    Ok(RunOutcome {
        target: descriptor.target,
        output,
        supplements,
        validation_issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemoryDumpSink, SharedBuffer};

    const BASE: &str = r#"<registry>
    <types><type name="VkResult" category="enum"/></types>
    <commands>
        <command><proto><type>void</type> <name>vkDestroyInstance</name></proto>
            <param><type>VkInstance</type> <name>instance</name></param></command>
    </commands>
    <feature api="vulkan" name="VK_VERSION_1_0">
        <require><command name="vkDestroyInstance"/></require>
    </feature>
</registry>"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        request: RunRequest,
        err: SharedBuffer,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path();
            fs::write(root.join("vk.xml"), BASE).unwrap();
            fs::write(root.join("video.xml"), "<registry/>").unwrap();
            fs::create_dir(root.join("configs")).unwrap();
            let request = RunRequest {
                target: Target::DispatchTable.name().to_string(),
                directory: root.join("out"),
                registry: root.join("vk.xml"),
                video: root.join("video.xml"),
                configs: root.join("configs"),
                ..RunRequest::default()
            };
            Fixture {
                _dir: dir,
                request,
                err: SharedBuffer::default(),
            }
        }

        fn sinks(&self) -> DiagnosticSinks {
            DiagnosticSinks {
                err: Box::new(self.err.clone()),
                diag: None,
            }
        }

        fn run(&self) -> (Result<RunOutcome>, MemoryDumpSink) {
            let mut dumps = MemoryDumpSink::default();
            let outcome = run(&self.request, &mut self.sinks(), &mut dumps);
            (outcome, dumps)
        }
    }

    #[test]
    fn test_unknown_target_writes_nothing() {
        let mut fixture = Fixture::new();
        fixture.request.target = "does-not-exist".to_string();
        let (outcome, dumps) = fixture.run();
        assert!(matches!(outcome, Err(GenError::UnknownTarget(ref t)) if t == "does-not-exist"));
        assert!(!fixture.request.directory.exists());
        assert!(dumps.is_empty());
        assert!(fixture.err.contents().contains("does-not-exist"));
    }

    #[test]
    fn test_run_generates_dispatch_table() {
        let fixture = Fixture::new();
        let (outcome, _) = fixture.run();
        let outcome = outcome.unwrap();
        assert_eq!(outcome.target, Target::DispatchTable);
        assert!(outcome.supplements.is_empty());
        let text = fs::read_to_string(&outcome.output).unwrap();
        assert!(text.contains("PFN_vkDestroyInstance DestroyInstance{ nullptr };"));
        assert!(fixture.err.contents().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_quiet_run_logs_nothing_at_info() {
        let fixture = Fixture::new();
        fs::write(
            fixture.request.configs.join("extra.xml"),
            r#"<registry><types><type name="VkExtra"/></types></registry>"#,
        )
        .unwrap();
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        let (outcome, _) = tracing::subscriber::with_default(subscriber, || fixture.run());

        outcome.unwrap();
        assert!(logs.0.lock().unwrap().is_empty());
        assert!(fixture.err.contents().is_empty());
    }

    #[test]
    fn test_supplement_commands_reach_generator() {
        let fixture = Fixture::new();
        fs::write(
            fixture.request.configs.join("extra.xml"),
            r#"<registry>
                <commands><command><proto><type>void</type> <name>vkCmdFoo</name></proto>
                    <param><type>VkCommandBuffer</type> <name>commandBuffer</name></param></command></commands>
                <feature api="vulkan" name="VK_LAYER_extra"><require><command name="vkCmdFoo"/></require></feature>
            </registry>"#,
        )
        .unwrap();
        fs::write(fixture.request.configs.join("blacklists.json"), r#"{"functions": []}"#).unwrap();

        let (outcome, _) = fixture.run();
        let outcome = outcome.unwrap();
        assert_eq!(outcome.supplements, vec![fixture.request.configs.join("extra.xml")]);
        let text = fs::read_to_string(&outcome.output).unwrap();
        assert!(text.contains("PFN_vkCmdFoo CmdFoo{ nullptr };"));
    }

    #[test]
    fn test_bad_supplement_is_a_parse_error() {
        let fixture = Fixture::new();
        fs::write(fixture.request.configs.join("broken.xml"), "<registry><types>").unwrap();
        let (outcome, _) = fixture.run();
        assert!(matches!(outcome, Err(GenError::DocumentParse { .. })));
        assert!(!fixture.request.directory.exists());
    }

    #[test]
    fn test_missing_registry_is_a_filesystem_error() {
        let mut fixture = Fixture::new();
        fixture.request.registry = fixture.request.configs.join("absent.xml");
        let (outcome, _) = fixture.run();
        assert!(matches!(outcome, Err(GenError::Filesystem { .. })));
    }

    #[test]
    fn test_validation_warns_and_continues() {
        let mut fixture = Fixture::new();
        fs::write(
            fixture.request.configs.join("grouped.xml"),
            r#"<registry><commands><command><proto><type>void</type> <name>vkGrouped</name></proto>
                <param group="VkMissingFlags"><type>VkDevice</type> <name>device</name></param></command></commands></registry>"#,
        )
        .unwrap();
        fixture.request.validate = true;
        let (outcome, _) = fixture.run();
        let outcome = outcome.unwrap();
        assert_eq!(outcome.validation_issues, 1);
        assert!(outcome.output.exists());
        assert!(fixture.err.contents().contains("VkMissingFlags"));
    }

    #[test]
    fn test_dump_and_debug_go_through_dump_sink() {
        let mut fixture = Fixture::new();
        fs::write(
            fixture.request.configs.join("extra.xml"),
            r#"<registry><types><type name="VkExtra"/></types></registry>"#,
        )
        .unwrap();
        fixture.request.dump = true;
        fixture.request.debug = true;
        let (outcome, dumps) = fixture.run();
        outcome.unwrap();
        assert!(dumps.get(REGISTRY_DUMP).unwrap().contains("vkDestroyInstance"));
        assert!(dumps.get("extra_merged.xml").unwrap().contains("VkExtra"));
        assert!(fixture.err.contents().contains("* Dumping registry to regdump.txt"));
    }

    #[test]
    fn test_verbose_and_timing_output() {
        let mut fixture = Fixture::new();
        fixture.request.quiet = false;
        fixture.request.timing = true;
        let (outcome, _) = fixture.run();
        outcome.unwrap();
        let err = fixture.err.contents();
        assert!(err.starts_with("* Building generated_vulkan_dispatch_table.h\n"));
        assert!(err.contains("* options.versions          = .*"));
        assert!(err.contains("* Time to make ElementTree = "));
        assert!(err.contains("* Time to generate generated_vulkan_dispatch_table.h = "));
        assert!(err.trim_end().ends_with("* Generated generated_vulkan_dispatch_table.h"));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_supplements_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let configs = dir.path().join("configs");
        fs::create_dir(&real).unwrap();
        fs::create_dir(&configs).unwrap();
        fs::write(real.join("vendor.xml"), "<registry/>").unwrap();
        fs::create_dir(real.join("dir.xml")).unwrap();
        symlink(real.join("vendor.xml"), configs.join("vendor.xml")).unwrap();
        symlink(real.join("dir.xml"), configs.join("dir.xml")).unwrap();
        symlink(real.join("gone.xml"), configs.join("gone.xml")).unwrap();

        assert_eq!(
            discover_supplements(&configs).unwrap(),
            vec![configs.join("vendor.xml")]
        );
    }

    #[test]
    fn test_discover_supplements_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), "<registry/>").unwrap();
        fs::write(dir.path().join("blacklists.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();
        assert_eq!(
            discover_supplements(dir.path()).unwrap(),
            vec![dir.path().join("a.xml")]
        );
    }
}
