//! Package ancestry resolution
//!
//! Two distinct resolutions over the ancestry chain, kept as separately
//! named functions because conflating them is the dominant bug class in
//! this pipeline:
//!
//! - [`find_root`]: the true root host, for operations that must always
//!   affect the top-level application (configuration merging, lifecycle
//!   delegation) regardless of lazy boundaries.
//! - [`find_lazy_boundary`]: the nearest self-or-ancestor lazy package,
//!   for asset-import registration: an import declared inside a lazily
//!   loaded package belongs to that package's own vendor bundle, not the
//!   root's.
//!
//! An ancestry is a slice ordered from the root host to the package
//! itself, inclusive at both ends.

use crate::error::{ComposeError, ComposeResult};
use crate::package::PackageNode;

/// The true root host of an ancestry chain
pub fn find_root<'a>(ancestry: &[&'a PackageNode]) -> &'a PackageNode {
    ancestry[0]
}

/// Nearest self-or-ancestor lazy boundary, or the root when none exists
pub fn find_lazy_boundary<'a>(ancestry: &[&'a PackageNode]) -> &'a PackageNode {
    ancestry
        .iter()
        .rev()
        .find(|node| node.is_lazy())
        .copied()
        .unwrap_or_else(|| find_root(ancestry))
}

/// Whether resolution from this package crosses a lazy boundary
///
/// True exactly when the nearest boundary is not the root itself; this is
/// what decides route promotion and import delegation.
pub fn crosses_lazy_boundary(ancestry: &[&PackageNode]) -> bool {
    find_lazy_boundary(ancestry).name() != find_root(ancestry).name()
}

/// Reject ancestries containing more than one lazy boundary
///
/// Promotion is resolved against the nearest lazy ancestor only; a lazy
/// engine nested inside another lazy engine is an unsupported
/// configuration and fails loudly instead of silently getting two-hop
/// semantics.
pub fn ensure_single_boundary(ancestry: &[&PackageNode]) -> ComposeResult<()> {
    let mut lazy = ancestry.iter().filter(|node| node.is_lazy());
    if let (Some(outer), Some(inner)) = (lazy.next(), lazy.next()) {
        return Err(ComposeError::NestedLazyBoundary {
            inner: inner.name().to_string(),
            outer: outer.name().to_string(),
        });
    }
    Ok(())
}
