//! Route splitting
//!
//! A package's routing entry module and its transitive dependency closure
//! are relocated between the package's own bundle and the host's module
//! space. The include and exclude splits for one engine must be exact
//! complements over the same input, so their arguments are validated for
//! agreement before either split runs.

use crate::error::{ComposeError, ComposeResult};
use crate::graph::{self, ModuleId, SplitSpec};
use crate::tree::AssetTree;

/// Runtime-provided routing module: always resolvable, never traversed
pub const ROUTE_EXTERNAL_MODULE: &str = "engine-runtime/routes";

/// Basename of a package's routing entry module
pub const ROUTE_ENTRY: &str = "routes";

/// Split arguments for a package's routing entry
pub fn route_split_spec(package: &str) -> SplitSpec {
    SplitSpec::new(
        ModuleId::new(format!("{package}/{ROUTE_ENTRY}")),
        [ModuleId::new(ROUTE_EXTERNAL_MODULE)],
    )
}

/// Partition a module tree into (routing closure, complement)
///
/// The include-side and exclude-side arguments are passed separately and
/// checked for agreement: a disagreement would silently duplicate or drop
/// modules, which is a programming error in the composer, not a user
/// error.
pub fn route_partition(
    tree: &AssetTree,
    package: &str,
    include_spec: &SplitSpec,
    exclude_spec: &SplitSpec,
) -> ComposeResult<(AssetTree, AssetTree)> {
    if include_spec != exclude_spec {
        return Err(ComposeError::SplitAmbiguity {
            package: package.to_string(),
        });
    }
    let closure = graph::split(tree, include_spec, true)?;
    let complement = graph::split(tree, exclude_spec, false)?;
    Ok((closure, complement))
}
