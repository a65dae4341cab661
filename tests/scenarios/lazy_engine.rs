//! Scenario: lazy engine, routes promoted into the host.
//!
//! Journey: a host application ships a `blog` engine with
//! `lazy_loading: true` and `dynamically_loaded: false`. The engine's
//! artifacts must be self-contained under its own namespace, while its
//! routing closure is promoted into the host's module space so the
//! initial route table resolves without a network fetch.

use enginepack::{AssetTree, Composer, IdentityTranspiler};

use crate::common::{engine_with_routes, package};

fn compose_blog_host() -> enginepack::BuildOutput {
    let blog = engine_with_routes("blog", false)
        .with_styles(AssetTree::write_file("blog.css", ".blog { color: red; }"))
        .with_public(AssetTree::write_file("images/logo.svg", "<svg/>"));
    let host = package("host", Some(false)).with_child(blog);

    Composer::new(&IdentityTranspiler)
        .compose_root(&host)
        .expect("compose should succeed")
}

#[test]
fn scenario_routing_closure_is_promoted_into_the_host() {
    let output = compose_blog_host();

    // The routing module and its whole closure land in the host's module
    // space.
    assert!(output.package.contains("modules/blog/routes.js"));
    assert!(output.package.contains("modules/blog/routes-helper.js"));
}

#[test]
fn scenario_engine_bundle_excludes_the_routing_closure() {
    let output = compose_blog_host();

    let engine_js = output
        .public
        .get("engines-dist/blog/assets/engine.js")
        .expect("engine.js should be produced");

    // The helper is part of the routing closure: it ships only in the
    // promoted output, never in the engine's own bundle.
    assert!(engine_js.contains("tileMarker"));
    assert!(!engine_js.contains("helperMarker"));
    assert!(!engine_js.contains("routesMarker"));
}

#[test]
fn scenario_engine_artifact_set_is_complete_and_namespaced() {
    let output = compose_blog_host();

    for artifact in [
        "engines-dist/blog/assets/engine.js",
        "engines-dist/blog/assets/engine-vendor.js",
        "engines-dist/blog/assets/engine-vendor.css",
        "engines-dist/blog/assets/engine.css",
        "engines-dist/blog/images/logo.svg",
    ] {
        assert!(output.public.contains(artifact), "missing {artifact}");
    }

    // No routes bundle for a non-dynamically-loaded engine.
    assert!(!output.public.contains("engines-dist/blog/assets/routes.js"));

    // Everything the engine publishes is confined under its namespace.
    for path in output.public.paths() {
        assert!(
            path.starts_with("engines-dist/blog/"),
            "path escaped the engine namespace: {path}"
        );
    }
}

#[test]
fn scenario_engine_styles_concatenate_into_engine_css() {
    let output = compose_blog_host();

    let engine_css = output
        .public
        .get("engines-dist/blog/assets/engine.css")
        .expect("engine.css should be produced");
    assert!(engine_css.contains(".blog"));
}

#[test]
fn scenario_manifest_lists_the_bundle_without_route_bundles() {
    let output = compose_blog_host();

    let bundle = output
        .manifest
        .bundles
        .get("blog")
        .expect("manifest should list the engine");
    assert!(bundle
        .assets
        .iter()
        .any(|asset| asset.uri == "engines-dist/blog/assets/engine.js"));

    // Promoted routing needs no runtime fetch.
    assert!(output.manifest.route_bundle_uris().is_empty());
}

#[test]
fn scenario_generated_config_module_is_bundled() {
    let output = compose_blog_host();

    let engine_js = output
        .public
        .get("engines-dist/blog/assets/engine.js")
        .expect("engine.js should be produced");
    assert!(engine_js.contains("blog/config/environment"));
}
