//! Property tests for the dependency graph splitter.

use proptest::prelude::*;

use enginepack::graph::{split, SplitSpec};
use enginepack::{AssetTree, ModuleId};

/// A random module universe: `pkg/m0..pkg/mN`, each importing a random
/// subset of the others, plus one non-module file.
fn module_universe() -> impl Strategy<Value = (AssetTree, usize)> {
    proptest::collection::vec(proptest::collection::vec(0usize..8, 0..=3), 2..=8).prop_map(
        |imports_per_module| {
            let count = imports_per_module.len();
            let mut tree = AssetTree::new();
            for (index, imports) in imports_per_module.iter().enumerate() {
                let mut source = String::new();
                for target in imports {
                    source.push_str(&format!(
                        "import dep{t} from 'pkg/m{t}';\n",
                        t = target % count
                    ));
                }
                source.push_str(&format!("export default {index};\n"));
                tree = tree.insert(format!("pkg/m{index}.js"), source);
            }
            tree = tree.insert("pkg/readme.txt", "not a module");
            (tree, count)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The include and exclude splits partition the tree: their
    /// union is the original and their intersection is empty.
    #[test]
    fn property_split_complementarity(
        (tree, count) in module_universe(),
        entry_index in 0usize..8,
        external_mask in 0u8..255,
    ) {
        let entry = ModuleId::new(format!("pkg/m{}", entry_index % count));
        let external = (0..count)
            .filter(|index| external_mask & (1u8 << index) != 0)
            .map(|index| ModuleId::new(format!("pkg/m{index}")));
        let spec = SplitSpec::new(entry, external);

        let closure = split(&tree, &spec, true).unwrap();
        let complement = split(&tree, &spec, false).unwrap();

        // Disjoint.
        for path in closure.paths() {
            prop_assert!(!complement.contains(path), "path in both splits: {}", path);
        }
        // Union restores the original exactly.
        prop_assert_eq!(closure.len() + complement.len(), tree.len());
        for (path, content) in tree.entries() {
            let joined = closure.get(path).or_else(|| complement.get(path));
            prop_assert_eq!(joined, Some(content));
        }
    }

    /// PROPERTY: External identifiers never appear in a closure, even when
    /// they are present in the tree.
    #[test]
    fn property_externals_never_join_the_closure(
        (tree, count) in module_universe(),
        external_mask in 0u8..255,
    ) {
        let external: Vec<ModuleId> = (0..count)
            .filter(|index| external_mask & (1u8 << index) != 0)
            .map(|index| ModuleId::new(format!("pkg/m{index}")))
            .collect();
        let spec = SplitSpec::new(ModuleId::new("pkg/m0"), external.clone());

        let closure = split(&tree, &spec, true).unwrap();

        for id in &external {
            prop_assert!(
                !closure.contains(&id.tree_path()),
                "external module joined the closure: {}",
                id
            );
        }
    }

    /// PROPERTY: Non-module files always land in the complement.
    #[test]
    fn property_non_modules_stay_in_the_complement(
        (tree, _count) in module_universe(),
    ) {
        let spec = SplitSpec::new(ModuleId::new("pkg/m0"), []);

        let closure = split(&tree, &spec, true).unwrap();
        let complement = split(&tree, &spec, false).unwrap();

        prop_assert!(!closure.contains("pkg/readme.txt"));
        prop_assert!(complement.contains("pkg/readme.txt"));
    }
}
