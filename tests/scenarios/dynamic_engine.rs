//! Scenario: dynamically loaded engine, standalone routes bundle.
//!
//! Journey: a `checkout` engine with `lazy_loading: true` and
//! `dynamically_loaded: true`. Its routing closure ships as a separate
//! fetchable `routes.js` artifact; nothing is promoted into the host's
//! module space.

use enginepack::{Composer, IdentityTranspiler};

use crate::common::{engine_with_routes, package};

fn compose_checkout_host() -> enginepack::BuildOutput {
    let checkout = engine_with_routes("checkout", true);
    let host = package("host", Some(false)).with_child(checkout);

    Composer::new(&IdentityTranspiler)
        .compose_root(&host)
        .expect("compose should succeed")
}

#[test]
fn scenario_routes_ship_as_a_standalone_artifact() {
    let output = compose_checkout_host();

    let routes_js = output
        .public
        .get("engines-dist/checkout/assets/routes.js")
        .expect("routes.js should be produced");
    assert!(routes_js.contains("routesMarker"));
    assert!(routes_js.contains("helperMarker"));
}

#[test]
fn scenario_engine_bundle_still_excludes_the_closure() {
    let output = compose_checkout_host();

    let engine_js = output
        .public
        .get("engines-dist/checkout/assets/engine.js")
        .expect("engine.js should be produced");
    assert!(engine_js.contains("tileMarker"));
    assert!(!engine_js.contains("helperMarker"));
    assert!(!engine_js.contains("routesMarker"));
}

#[test]
fn scenario_nothing_is_promoted_into_the_host() {
    let output = compose_checkout_host();

    for path in output.package.paths() {
        assert!(
            !path.starts_with("modules/checkout/"),
            "checkout module leaked into the host: {path}"
        );
    }
}

#[test]
fn scenario_manifest_flags_the_route_bundle_for_prefetch() {
    let output = compose_checkout_host();

    assert_eq!(
        output.manifest.route_bundle_uris(),
        vec!["engines-dist/checkout/assets/routes.js"]
    );
}
