//! Property tests for asset tree operations.

use proptest::prelude::*;

use enginepack::{AssetTree, ConcatOptions, MergeOptions};

fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,6}(/[a-z][a-z0-9]{0,6}){0,2}\\.js").unwrap()
}

fn file_content() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ;=']{0,40}").unwrap()
}

fn tree() -> impl Strategy<Value = AssetTree> {
    proptest::collection::btree_map(file_name(), file_content(), 0..=8).prop_map(|files| {
        let mut tree = AssetTree::new();
        for (path, content) in files {
            tree = tree.insert(path, content);
        }
        tree
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Merging a tree with itself under overwrite is a no-op.
    #[test]
    fn property_merge_with_self_is_identity(tree in tree()) {
        let merged = AssetTree::merge(
            vec![Some(tree.clone()), Some(tree.clone())],
            &MergeOptions { overwrite: true },
        ).unwrap();

        prop_assert_eq!(merged, tree);
    }

    /// PROPERTY: Merge without overwrite fails exactly when trees share a path.
    #[test]
    fn property_merge_collision_detection(a in tree(), b in tree()) {
        let share_a_path = a.paths().any(|path| b.contains(path));

        let result = AssetTree::merge(
            vec![Some(a), Some(b)],
            &MergeOptions { overwrite: false },
        );

        prop_assert_eq!(result.is_err(), share_a_path);
    }

    /// PROPERTY: Concatenation emits declared inputs in declared order,
    /// joined with the separator, regardless of tree enumeration order.
    #[test]
    fn property_concatenate_preserves_declared_order(
        contents in proptest::collection::vec(file_content(), 3..=3),
        separator in proptest::string::string_regex("[;\\n]{0,2}").unwrap(),
    ) {
        let tree = AssetTree::new()
            .insert("z.js", contents[0].clone())
            .insert("m.js", contents[1].clone())
            .insert("a.js", contents[2].clone());

        let out = tree.concatenate(&ConcatOptions {
            header_files: vec!["z.js".into(), "m.js".into(), "a.js".into()],
            output_file: "out.js".into(),
            separator: separator.clone(),
            ..Default::default()
        }).unwrap();

        let expected = format!(
            "{}{sep}{}{sep}{}",
            contents[0], contents[1], contents[2], sep = separator
        );
        prop_assert_eq!(out.get("out.js"), Some(expected.as_str()));
    }

    /// PROPERTY: An unrestricted filter is the identity.
    #[test]
    fn property_unrestricted_filter_is_identity(tree in tree()) {
        let filtered = tree.filter(&enginepack::FilterOptions {
            allow_empty: true,
            ..Default::default()
        }).unwrap();

        prop_assert_eq!(filtered, tree);
    }
}
