//! Scenario: eager aggregation and cross-boundary promotion.
//!
//! Two journeys: a fully eager package tree folds transparently into the
//! host's bundle with no renaming; an eager engine nested inside a lazy
//! engine has its routing closure excised and promoted across the
//! boundary, determined by ancestry rather than its own flag.

use enginepack::{AssetTree, Composer, IdentityTranspiler};

use crate::common::{package, routed_modules};

#[test]
fn scenario_eager_tree_folds_into_the_host_unrenamed() {
    let comments = package("comments", Some(false))
        .with_modules(AssetTree::write_file("model.js", "export default 'comment';\n"));
    let blog = package("blog", Some(false))
        .with_modules(AssetTree::write_file("post.js", "export default 'post';\n"))
        .with_public(AssetTree::write_file("blog-banner.png", "png"))
        .with_child(comments);
    let host = package("host", Some(false)).with_child(blog);

    let output = Composer::new(&IdentityTranspiler)
        .compose_root(&host)
        .expect("compose should succeed");

    // Own tree plus all descendants' outputs, each under its own
    // fully-qualified module path.
    assert!(output.package.contains("modules/blog/post.js"));
    assert!(output.package.contains("modules/comments/model.js"));

    // No promotion happens without a lazy boundary.
    assert!(output.promoted_routes.is_empty());

    // Public assets merge flat, no namespacing.
    assert!(output.public.contains("blog-banner.png"));
}

#[test]
fn scenario_eager_engine_under_lazy_boundary_promotes_routes() {
    let widget = package("widget", Some(false))
        .with_modules(routed_modules().insert("feature.js", "export default 'featureMarker';\n"));
    let shop = package("shop", Some(true)).with_child(widget);
    let host = package("host", Some(false)).with_child(shop);

    let output = Composer::new(&IdentityTranspiler)
        .compose_root(&host)
        .expect("compose should succeed");

    // The eager child's routing closure crosses the boundary into the
    // host's module space.
    assert!(output.package.contains("modules/widget/routes.js"));
    assert!(output.package.contains("modules/widget/routes-helper.js"));

    // The child's remaining modules are consolidated into the lazy
    // engine's vendor bundle, not the host's.
    let vendor_js = output
        .public
        .get("engines-dist/shop/assets/engine-vendor.js")
        .expect("engine-vendor.js should be produced");
    assert!(vendor_js.contains("featureMarker"));
    assert!(!vendor_js.contains("routesMarker"));
    assert!(!vendor_js.contains("helperMarker"));
    assert!(!output.package.contains("modules/widget/feature.js"));
}

#[test]
fn scenario_child_public_assets_are_namespaced_under_the_lazy_engine() {
    let widget = package("widget", Some(false))
        .with_public(AssetTree::write_file("widget-icon.svg", "<svg/>"));
    let shop = package("shop", Some(true)).with_child(widget);
    let host = package("host", Some(false)).with_child(shop);

    let output = Composer::new(&IdentityTranspiler)
        .compose_root(&host)
        .expect("compose should succeed");

    assert!(output.public.contains("engines-dist/shop/widget-icon.svg"));
    assert!(!output.public.contains("widget-icon.svg"));
}
