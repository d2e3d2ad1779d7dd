//! Property tests for unit and function discovery

mod support;

use funcstack::deploy::{list_functions, Stack};
use funcstack::process::RecordingRunner;
use funcstack::types::StackLayout;
use proptest::prelude::*;
use std::sync::Arc;
use support::StackFixture;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_functions_never_exceed_subdirectories(with_manifest in 0usize..6, without_manifest in 0usize..6) {
        let root = tempfile::tempdir().unwrap();
        for i in 0..with_manifest {
            let dir = root.path().join(format!("fn{i}"));
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("function.json"), "{}").unwrap();
        }
        for i in 0..without_manifest {
            std::fs::create_dir_all(root.path().join(format!("lib{i}"))).unwrap();
        }

        let functions = list_functions(root.path(), "python", &StackLayout::default()).unwrap();
        prop_assert_eq!(functions.len(), with_manifest);
        prop_assert!(functions.len() <= with_manifest + without_manifest);
    }

    #[test]
    fn prop_stack_discovers_only_marked_units(
        functions_per_unit in proptest::collection::vec(0usize..4, 0..5),
        unmarked in 0usize..4,
    ) {
        let fixture = StackFixture::new("prop", "westus");
        for (i, count) in functions_per_unit.iter().enumerate() {
            let unit = fixture.unit(&format!("unit{i}"), "python", None);
            for f in 0..*count {
                unit.function(&format!("f{f}"), "main");
            }
        }
        for i in 0..unmarked {
            fixture.plain_dir(&format!("other{i}"));
        }

        let stack = tokio_test::block_on(Stack::load(
            fixture.root(),
            StackLayout::default(),
            Arc::new(RecordingRunner::new()),
        ))
        .unwrap();

        prop_assert_eq!(stack.units().len(), functions_per_unit.len());
        let expected: usize = functions_per_unit.iter().sum();
        prop_assert_eq!(stack.functions().count(), expected);
        let flattened: Vec<String> = stack.functions().map(|f| f.name()).collect();
        let concatenated: Vec<String> = stack
            .units()
            .iter()
            .flat_map(|u| u.functions().iter().map(|f| f.name()))
            .collect();
        prop_assert_eq!(flattened, concatenated);
    }
}
