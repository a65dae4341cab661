//! Transpiler seam
//!
//! The module transpiler is an external collaborator: a pure tree-to-tree
//! function that rewrites module bodies into a stable, name-addressable
//! form. The composer guarantees call discipline: each composed tree
//! headed for concatenation is transpiled exactly once, and transpiled
//! output is never fed back in.

use crate::error::ComposeResult;
use crate::tree::AssetTree;

/// External module transpiler interface
pub trait Transpiler {
    fn transpile(&self, tree: AssetTree) -> ComposeResult<AssetTree>;
}

/// Pass-through transpiler
///
/// Used when module sources are already in their final addressable form,
/// and as the default in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranspiler;

impl Transpiler for IdentityTranspiler {
    fn transpile(&self, tree: AssetTree) -> ComposeResult<AssetTree> {
        Ok(tree)
    }
}
