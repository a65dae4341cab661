//! Lazy engine artifact assembly
//!
//! A lazy engine produces a fully self-contained artifact set named by its
//! identifier under `engines-dist/<name>/assets/`: the engine script
//! bundle (routing closure excluded), vendor script and style bundles
//! gathered from child packages and the engine's own vendor directory, the
//! engine's own style bundle, and, only for dynamically loaded engines, a
//! standalone routes bundle. These filenames are the runtime loader's wire
//! contract; renaming any of them breaks runtime loading.

use tracing::debug;

use crate::error::ComposeResult;
use crate::tree::{AssetTree, ConcatOptions, FilterOptions};

use super::strategy::{
    child_manifests, child_packages, child_promoted, child_public, external_vendor_tree,
    ComposeStrategy, StrategyInput,
};
use super::{routes, BuildOutput, ENGINES_DIST, OVERWRITE};

/// Self-contained artifact production for lazy engines
pub(super) struct LazyStrategy;

impl ComposeStrategy for LazyStrategy {
    fn compose(&self, input: &StrategyInput<'_>) -> ComposeResult<BuildOutput> {
        let node = input.node;
        let name = node.name();
        let asset_root = format!("{ENGINES_DIST}/{name}/assets");

        // Child packages are consolidated into the engine's namespace as
        // vendor content rather than leaking into the host's bundle.
        let vendor_tree = AssetTree::merge(child_packages(input.child_outputs), &OVERWRITE)?;
        let vendor_js = vendor_tree
            .filter(&FilterOptions {
                include: vec!["**/*.js".to_string()],
                exclude: vec!["vendor/**".to_string()],
                allow_empty: true,
                ..Default::default()
            })?
            .filter(&FilterOptions {
                src_dir: Some("modules".to_string()),
                allow_empty: true,
                ..Default::default()
            })?;
        let vendor_css = vendor_tree.filter(&FilterOptions {
            include: vec!["**/*.css".to_string()],
            exclude: vec!["vendor/**".to_string()],
            allow_empty: true,
            ..Default::default()
        })?;
        let gathered_vendor_files = vendor_tree.filter(&FilterOptions {
            include: vec!["vendor/**".to_string()],
            allow_empty: true,
            ..Default::default()
        })?;
        let own_vendor_files = external_vendor_tree(node)?;

        // Engine bundle: the package's modules minus the routing closure.
        let include_spec = routes::route_split_spec(name);
        let exclude_spec = routes::route_split_spec(name);
        let (app_closure, bundle_complement) =
            routes::route_partition(input.app_tree, name, &include_spec, &exclude_spec)?;
        let engine_js = bundle_complement.concatenate(&ConcatOptions {
            input_files: vec!["**/*.js".to_string()],
            output_file: format!("{asset_root}/engine.js"),
            separator: "\n".to_string(),
            allow_none: true,
            ..Default::default()
        })?;

        // Routing closure: either a standalone fetchable bundle, or
        // promoted whole into the host's module space so the initial route
        // table resolves without a network round trip.
        let mut package = AssetTree::new();
        let mut routes_artifact: Option<AssetTree> = None;
        if node.config.dynamically_loaded {
            let mut route_parts = child_promoted(input.child_outputs);
            route_parts.push(Some(app_closure));
            let route_tree = AssetTree::merge(route_parts, &OVERWRITE)?;
            routes_artifact = Some(route_tree.concatenate(&ConcatOptions {
                input_files: vec!["**/*.js".to_string()],
                output_file: format!("{asset_root}/routes.js"),
                separator: "\n".to_string(),
                allow_none: true,
                ..Default::default()
            })?);
        } else {
            // The closure is computed over the complete script tree so
            // routing code may reach into consolidated child modules.
            let complete_js = AssetTree::merge(
                vec![Some(vendor_js.clone()), Some(input.app_tree.clone())],
                &OVERWRITE,
            )?;
            let promotion_include = routes::route_split_spec(name);
            let promotion_exclude = routes::route_split_spec(name);
            let (promoted_closure, _) =
                routes::route_partition(&complete_js, name, &promotion_include, &promotion_exclude)?;
            let mut promoted_parts = child_promoted(input.child_outputs);
            promoted_parts.push(Some(promoted_closure));
            package = AssetTree::merge(promoted_parts, &OVERWRITE)?.filter(&FilterOptions {
                dest_dir: Some("modules".to_string()),
                allow_empty: true,
                ..Default::default()
            })?;
        }

        // Vendor bundles, assembled in two passes: consolidate child
        // modules into one file, then honor the registry's declared import
        // order so prepended imports execute first.
        let concat_vendor_js = vendor_js.concatenate(&ConcatOptions {
            input_files: vec!["**/*.js".to_string()],
            output_file: format!("{asset_root}/engine-vendor.js"),
            separator: "\n".to_string(),
            allow_none: true,
            ..Default::default()
        })?;
        let combined_js = AssetTree::merge(
            vec![
                Some(gathered_vendor_files.clone()),
                own_vendor_files.clone(),
                Some(concat_vendor_js),
            ],
            &OVERWRITE,
        )?;
        let mut vendor_js_outputs: Vec<Option<AssetTree>> = Vec::new();
        for named in input.registry.script_outputs() {
            vendor_js_outputs.push(Some(combined_js.concatenate(&ConcatOptions {
                header_files: named.input_files.clone(),
                output_file: format!("{ENGINES_DIST}/{name}{}", named.output_file),
                separator: "\n;".to_string(),
                allow_none: true,
                ..Default::default()
            })?));
        }
        let vendor_js_final = AssetTree::merge(vendor_js_outputs, &OVERWRITE)?;

        let concat_vendor_css = vendor_css.concatenate(&ConcatOptions {
            input_files: vec!["**/*.css".to_string()],
            output_file: format!("{asset_root}/engine-vendor.css"),
            separator: "\n".to_string(),
            allow_none: true,
            ..Default::default()
        })?;
        let combined_css = AssetTree::merge(
            vec![
                Some(gathered_vendor_files),
                own_vendor_files,
                Some(concat_vendor_css),
            ],
            &OVERWRITE,
        )?;
        let mut vendor_css_outputs: Vec<Option<AssetTree>> = Vec::new();
        for named in input.registry.style_outputs() {
            vendor_css_outputs.push(Some(combined_css.concatenate(&ConcatOptions {
                header_files: named.input_files.clone(),
                output_file: format!("{ENGINES_DIST}/{name}{}", named.output_file),
                separator: "\n".to_string(),
                allow_none: true,
                ..Default::default()
            })?));
        }
        let vendor_css_final = AssetTree::merge(vendor_css_outputs, &OVERWRITE)?;

        // The engine's own compiled styles.
        let primary_style = if node.styles.is_empty() {
            None
        } else {
            Some(node.styles.concatenate(&ConcatOptions {
                input_files: vec!["**/*.css".to_string()],
                output_file: format!("{asset_root}/engine.css"),
                separator: "\n".to_string(),
                allow_none: true,
                ..Default::default()
            })?)
        };

        // Public assets: the engine's own are confined under its
        // namespace; child artifact sets already under `engines-dist/`
        // pass through, everything else is relocated under this engine.
        let own_public = node.public.filter(&FilterOptions {
            dest_dir: Some(format!("{ENGINES_DIST}/{name}")),
            allow_empty: true,
            ..Default::default()
        })?;
        let children_public = AssetTree::merge(child_public(input.child_outputs), &OVERWRITE)?;
        let child_engine_sets = children_public.filter(&FilterOptions {
            src_dir: Some(ENGINES_DIST.to_string()),
            dest_dir: Some(ENGINES_DIST.to_string()),
            allow_empty: true,
            ..Default::default()
        })?;
        let children_relocated = children_public.filter(&FilterOptions {
            exclude: vec![format!("{ENGINES_DIST}/**")],
            dest_dir: Some(format!("{ENGINES_DIST}/{name}")),
            allow_empty: true,
            ..Default::default()
        })?;

        let public = AssetTree::merge(
            vec![
                Some(own_public),
                Some(child_engine_sets),
                Some(children_relocated),
                Some(vendor_css_final),
                primary_style.clone(),
                Some(vendor_js_final),
                Some(engine_js),
                routes_artifact.clone(),
            ],
            &OVERWRITE,
        )?;

        let mut manifest = child_manifests(input.child_outputs);
        let mut uris = vec![
            format!("{asset_root}/engine-vendor.js"),
            format!("{asset_root}/engine-vendor.css"),
        ];
        if primary_style.is_some() {
            uris.push(format!("{asset_root}/engine.css"));
        }
        uris.push(format!("{asset_root}/engine.js"));
        if routes_artifact.is_some() {
            uris.push(format!("{asset_root}/routes.js"));
        }
        manifest.add_bundle(name, &uris, &public);

        debug!(
            package = name,
            artifacts = public.len(),
            promoted = package.len(),
            dynamic = node.config.dynamically_loaded,
            "assembled lazy engine artifact set"
        );

        Ok(BuildOutput {
            package,
            promoted_routes: AssetTree::new(),
            public,
            manifest,
            warnings: Vec::new(),
        })
    }
}
