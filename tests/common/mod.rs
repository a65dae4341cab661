//! Shared helpers for scenario tests.

use enginepack::{AssetTree, PackageConfig, PackageNode};

/// Build a package with an explicit loading mode (`None` = undeclared).
pub fn package(name: &str, lazy: Option<bool>) -> PackageNode {
    let mut config = PackageConfig::new(name);
    config.lazy_loading = lazy;
    PackageNode::new(config)
}

/// Build a lazy engine with a routing module, its helper, and one plain
/// application module.
pub fn engine_with_routes(name: &str, dynamically_loaded: bool) -> PackageNode {
    let mut config = PackageConfig::new(name);
    config.lazy_loading = Some(true);
    config.dynamically_loaded = dynamically_loaded;
    PackageNode::new(config).with_modules(routed_modules())
}

/// Module tree: `routes.js` imports the runtime boundary module and a
/// local helper; `components/tile.js` is independent of both.
pub fn routed_modules() -> AssetTree {
    AssetTree::new()
        .insert(
            "routes.js",
            "import buildRoutes from 'engine-runtime/routes';\n\
             import helper from './routes-helper';\n\
             export default buildRoutes(helper); // routesMarker\n",
        )
        .insert(
            "routes-helper.js",
            "export default function helperMarker() {}\n",
        )
        .insert(
            "components/tile.js",
            "export default 'tileMarker';\n",
        )
}
