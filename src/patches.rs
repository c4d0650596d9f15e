//! Structural patches applied to the base registry before supplements are merged.
//!
//! A patch is a named in-place edit of the document, for fixing up upstream
//! registry content that cannot be corrected with a supplemental file (which
//! can only add). [`REGISTRY_PATCHES`] is currently empty.

use tracing::debug;

use crate::document::Document;

/// A named in-place edit of a registry document.
#[derive(Debug, Clone, Copy)]
pub struct Patch {
    pub description: &'static str,
    pub apply: fn(&mut Document),
}

/// Patches applied to every base registry, in order.
pub const REGISTRY_PATCHES: &[Patch] = &[];

/// Apply [`REGISTRY_PATCHES`] to `doc`. Returns how many were applied.
pub fn apply_patches(doc: &mut Document) -> usize {
    apply_patches_with(doc, REGISTRY_PATCHES)
}

/// Apply `patches` to `doc` in order. Returns how many were applied.
pub fn apply_patches_with(doc: &mut Document, patches: &[Patch]) -> usize {
    for patch in patches {
        debug!(patch = patch.description, "Applying registry patch");
        (patch.apply)(doc);
    }
    patches.len()
}
