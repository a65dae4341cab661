//! Loading-mode strategies
//!
//! A package's loading mode is fixed at configuration time and selects one
//! of two strategies once per package: plain packages are transparent
//! aggregators whose outputs fold into the consumer's bundle; lazy engines
//! produce a self-contained artifact set. The lazy strategy reuses the
//! plain strategy's collection logic through the named helpers below
//! rather than overriding it.

use tracing::debug;

use crate::error::ComposeResult;
use crate::manifest::AssetManifest;
use crate::package::PackageNode;
use crate::registry::OutputRegistry;
use crate::tree::{AssetTree, FilterOptions};

use super::lazy::LazyStrategy;
use super::routes;
use super::{BuildOutput, OVERWRITE};

/// Everything a strategy needs to compose one package
pub(super) struct StrategyInput<'a> {
    pub node: &'a PackageNode,
    /// The package's transpiled, fully-qualified module tree
    pub app_tree: &'a AssetTree,
    pub child_outputs: &'a [BuildOutput],
    /// Whether this package's ancestry crosses a lazy boundary
    pub crossed: bool,
    /// The nearest boundary's named-output registry
    pub registry: &'a OutputRegistry,
}

pub(super) trait ComposeStrategy {
    fn compose(&self, input: &StrategyInput<'_>) -> ComposeResult<BuildOutput>;
}

/// Select the strategy for a package's fixed loading mode
pub(super) fn strategy_for(node: &PackageNode) -> &'static dyn ComposeStrategy {
    if node.is_lazy() {
        &LazyStrategy
    } else {
        &PlainStrategy
    }
}

/// Transparent pass-through aggregation
pub(super) struct PlainStrategy;

impl ComposeStrategy for PlainStrategy {
    fn compose(&self, input: &StrategyInput<'_>) -> ComposeResult<BuildOutput> {
        let node = input.node;

        // Below a lazy boundary the routing closure is excised from this
        // package's bundle and contributed to the boundary instead.
        let (closure, complement) = if input.crossed {
            let include_spec = routes::route_split_spec(node.name());
            let exclude_spec = routes::route_split_spec(node.name());
            routes::route_partition(input.app_tree, node.name(), &include_spec, &exclude_spec)?
        } else {
            (AssetTree::new(), input.app_tree.clone())
        };

        let mut promoted_parts = child_promoted(input.child_outputs);
        promoted_parts.push(Some(closure));
        let promoted_routes = AssetTree::merge(promoted_parts, &OVERWRITE)?;

        // Verbatim vendor files travel with the package only when a lazy
        // ancestor consumes them.
        let external = if input.crossed {
            external_vendor_tree(node)?
        } else {
            None
        };

        let mut package_parts = child_packages(input.child_outputs);
        package_parts.push(external);
        package_parts.push(Some(complement.filter(&FilterOptions {
            dest_dir: Some("modules".to_string()),
            allow_empty: true,
            ..Default::default()
        })?));
        package_parts.push(Some(node.styles.filter(&FilterOptions {
            dest_dir: Some("styles".to_string()),
            allow_empty: true,
            ..Default::default()
        })?));
        let package = AssetTree::merge(package_parts, &OVERWRITE)?;

        let mut public_parts = child_public(input.child_outputs);
        public_parts.push(Some(node.public.clone()));
        let public = AssetTree::merge(public_parts, &OVERWRITE)?;

        debug!(
            package = node.name(),
            modules = package.len(),
            promoted = promoted_routes.len(),
            "composed plain package"
        );

        Ok(BuildOutput {
            package,
            promoted_routes,
            public,
            manifest: child_manifests(input.child_outputs),
            warnings: Vec::new(),
        })
    }
}

/// Children's upward module contributions, in declaration order
pub(super) fn child_packages(child_outputs: &[BuildOutput]) -> Vec<Option<AssetTree>> {
    child_outputs
        .iter()
        .map(|child| Some(child.package.clone()))
        .collect()
}

/// Children's promoted routing closures, in declaration order
pub(super) fn child_promoted(child_outputs: &[BuildOutput]) -> Vec<Option<AssetTree>> {
    child_outputs
        .iter()
        .map(|child| Some(child.promoted_routes.clone()))
        .collect()
}

/// Children's public asset trees, in declaration order
pub(super) fn child_public(child_outputs: &[BuildOutput]) -> Vec<Option<AssetTree>> {
    child_outputs
        .iter()
        .map(|child| Some(child.public.clone()))
        .collect()
}

/// Union of children's manifests
pub(super) fn child_manifests(child_outputs: &[BuildOutput]) -> AssetManifest {
    let mut manifest = AssetManifest::new();
    for child in child_outputs {
        manifest.merge(child.manifest.clone());
    }
    manifest
}

/// Load a package's on-disk vendor directory, verbatim, under `vendor/`
///
/// A missing directory is simply no tree, not an error.
pub(super) fn external_vendor_tree(node: &PackageNode) -> ComposeResult<Option<AssetTree>> {
    let Some(dir) = &node.vendor_dir else {
        return Ok(None);
    };
    if !dir.is_dir() {
        return Ok(None);
    }
    let tree = AssetTree::from_dir(dir)?;
    Ok(Some(tree.filter(&FilterOptions {
        dest_dir: Some("vendor".to_string()),
        allow_empty: true,
        ..Default::default()
    })?))
}
