//! Engine composer
//!
//! The orchestration layer. For each package in the tree, the loading-mode
//! flag selects a composition strategy: eager packages fold into the
//! host's single bundle, lazy engines produce a self-contained artifact
//! set named by their identifier. Routing modules and their transitive
//! dependency closure are relocated between the two according to the
//! nearest lazy boundary in the package's ancestry.
//!
//! The pipeline is a pure, single-pass, acyclic data flow: every tree
//! operation is a deterministic function of its declared inputs, and each
//! package's derived trees are produced fresh per build.

mod lazy;
mod routes;
mod strategy;

pub use routes::{route_split_spec, ROUTE_ENTRY, ROUTE_EXTERNAL_MODULE};

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::config::{self, ConfigWarning};
use crate::error::ComposeResult;
use crate::manifest::AssetManifest;
use crate::package::PackageNode;
use crate::registry::{self, OutputRegistry};
use crate::resolve;
use crate::transpile::Transpiler;
use crate::tree::{AssetTree, FilterOptions, MergeOptions};

/// Directory every lazily loadable artifact is published under
pub const ENGINES_DIST: &str = "engines-dist";

const OVERWRITE: MergeOptions = MergeOptions { overwrite: true };

/// Composed outputs of one package
///
/// `package` is the contribution folded into the consumer's bundle:
/// compiled modules under `modules/`, compiled styles under `styles/`, and
/// verbatim vendor files under `vendor/` when a lazy ancestor consumes
/// them. `promoted_routes` carries routing closures upward (root-relative
/// module paths) until a lazy boundary folds them into its own host
/// contribution. `public` holds static assets, including a lazy engine's
/// artifact set. `warnings` accumulate across the whole subtree and never
/// fail the build.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub package: AssetTree,
    pub promoted_routes: AssetTree,
    pub public: AssetTree,
    pub manifest: AssetManifest,
    pub warnings: Vec<ConfigWarning>,
}

/// The composition engine
pub struct Composer<'a> {
    transpiler: &'a dyn Transpiler,
}

impl<'a> Composer<'a> {
    pub fn new(transpiler: &'a dyn Transpiler) -> Self {
        Self { transpiler }
    }

    /// Compose a whole package tree rooted at the host application
    ///
    /// Import registries are collected up front so each lazy boundary's
    /// vendor bundles honor every declared import below it.
    pub fn compose_root(&self, root: &PackageNode) -> ComposeResult<BuildOutput> {
        let registries = registry::collect_import_registries(root);
        self.compose_node(root, &[root], &registries)
    }

    #[instrument(level = "debug", skip_all, fields(package = %node.name()))]
    fn compose_node(
        &self,
        node: &PackageNode,
        ancestry: &[&PackageNode],
        registries: &BTreeMap<String, OutputRegistry>,
    ) -> ComposeResult<BuildOutput> {
        resolve::ensure_single_boundary(ancestry)?;

        let mut warnings = Vec::new();
        // The root host is a plain application, not an engine; only
        // packages below it must declare a loading mode.
        if ancestry.len() > 1 {
            warnings.extend(node.config.validate());
        }

        let mut child_outputs = Vec::new();
        for child in &node.children {
            let mut chain = ancestry.to_vec();
            chain.push(child);
            let mut output = self.compose_node(child, &chain, registries)?;
            warnings.append(&mut output.warnings);
            child_outputs.push(output);
        }

        let crossed = resolve::crosses_lazy_boundary(ancestry);
        debug!(
            lazy = node.is_lazy(),
            crossed,
            children = child_outputs.len(),
            "composing package"
        );

        let app_tree = self.transpiler.transpile(self.app_module_tree(node)?)?;
        let fallback = OutputRegistry::for_engine(node.name());
        let registry = registries.get(node.name()).unwrap_or(&fallback);

        let input = strategy::StrategyInput {
            node,
            app_tree: &app_tree,
            child_outputs: &child_outputs,
            crossed,
            registry,
        };
        let mut output = strategy::strategy_for(node).compose(&input)?;
        output.warnings = warnings;
        Ok(output)
    }

    /// The package's fully-qualified, untranspiled module tree
    ///
    /// Children's app contributions merge first, then the package's own
    /// modules, then the generated configuration module; the result is
    /// namespaced under the package identifier.
    fn app_module_tree(&self, node: &PackageNode) -> ComposeResult<AssetTree> {
        let mut parts: Vec<Option<AssetTree>> = node
            .children
            .iter()
            .map(|child| Some(child.app.clone()))
            .collect();
        parts.push(Some(node.modules.clone()));
        parts.push(Some(AssetTree::write_file(
            "config/environment.js",
            config::config_module_source(node.name()),
        )));
        let merged = AssetTree::merge(parts, &OVERWRITE)?;
        merged.filter(&FilterOptions {
            dest_dir: Some(node.name().to_string()),
            allow_empty: true,
            ..Default::default()
        })
    }
}
