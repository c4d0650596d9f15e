//! Structural merge of a supplemental document into a registry document.
//!
//! The merge walks the supplement's element children in order. A child is
//! appended wholesale when its tag is in [`LEAF_TAGS`] or when the
//! destination has no element with that tag at the same level; otherwise
//! the walk descends into the matching destination element. Nothing already
//! in the destination is removed or rewritten.
//!
//! Leaf declarations (a whole command, a whole type) are never split across
//! files, so a supplement that redeclares one produces a duplicate sibling.
//! Extending twice with the same supplement duplicates leaves twice.

use std::path::Path;

use tracing::debug;

use super::{Document, Element, Node};
use crate::diagnostics::DumpSink;
use crate::error::{GenError, Result};

/// Tags whose elements are atomic: appended as a unit, never descended into.
pub const LEAF_TAGS: [&str; 10] = [
    "command",
    "enums",
    "extension",
    "feature",
    "format",
    "platform",
    "spirvcapability",
    "spirvextension",
    "tag",
    "type",
];

/// How a supplement element picks its merge target among same-tag siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The first destination element with the same tag is the only candidate;
    /// later same-tag siblings are never merge targets.
    #[default]
    FirstMatch,
}

impl MatchPolicy {
    fn locate(self, dest: &Element, tag: &str) -> Option<usize> {
        match self {
            MatchPolicy::FirstMatch => dest.children.iter().position(
                |n| matches!(n, Node::Element(e) if e.tag == tag),
            ),
        }
    }
}

/// Whether elements with this tag are merged as atomic units.
#[must_use]
pub fn is_leaf_tag(tag: &str) -> bool {
    LEAF_TAGS.contains(&tag)
}

/// Merge `supplement` into `dest` in place using [`MatchPolicy::FirstMatch`].
///
/// Ownership of every appended subtree moves into `dest`.
pub fn extend(dest: &mut Document, supplement: Document) {
    extend_with_policy(dest, supplement, MatchPolicy::FirstMatch);
}

/// Merge `supplement` into `dest` in place with an explicit match policy.
pub fn extend_with_policy(dest: &mut Document, supplement: Document, policy: MatchPolicy) {
    merge(&mut dest.root, supplement.root, policy);
}

fn merge(dest: &mut Element, src: Element, policy: MatchPolicy) {
    for child in src.children {
        let Node::Element(src_child) = child else {
            continue;
        };

        let target = if is_leaf_tag(&src_child.tag) {
            None
        } else {
            policy.locate(dest, &src_child.tag)
        };

        match target.and_then(|i| match dest.children.get_mut(i) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }) {
            Some(dest_child) => merge(dest_child, src_child, policy),
            None => dest.append(src_child),
        }
    }
}

/// Parse the XML file at `path` and merge it into `dest`.
///
/// When a debug sink is supplied, the merged registry is written through it as
/// `<stem>_merged.xml` for inspection; generation is unaffected.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or when the debug dump
/// cannot be written. A parse failure leaves `dest` untouched; a dump failure
/// happens after the merge has already been applied.
pub fn extend_from_path(
    dest: &mut Document,
    path: &Path,
    debug_sink: Option<&mut dyn DumpSink>,
) -> Result<()> {
    let supplement = Document::from_path(path)?;
    let before = dest.root.element_count();
    extend(dest, supplement);
    debug!(
        supplement = %path.display(),
        added = dest.root.element_count() - before,
        "Extended registry"
    );

    if let Some(sink) = debug_sink {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "supplement".to_string());
        let name = format!("{stem}_merged.xml");
        let xml = dest.to_xml()?;
        sink.dump(&name, &xml)
            .map_err(|e| GenError::filesystem(&name, e))?;
        debug!(dump = %name, "Wrote merged registry");
    }
    Ok(())
}
