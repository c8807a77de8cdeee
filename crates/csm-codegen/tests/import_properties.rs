//! Import rewriting is idempotent and never breaks valid code

use csm_codegen::{cleanup_unused_imports, merge_duplicate_imports};
use csm_parser::ParsedSource;
use proptest::prelude::*;

const MODULES: &[&str] = &["os", "json", "typing", "clearskies", "clearskies.columns", "models.user"];
const NAMES: &[&str] = &["Any", "String", "User", "path", "dumps"];

fn import_line() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(MODULES).prop_map(|m| format!("import {m}")),
        (prop::sample::select(MODULES), prop::sample::select(NAMES))
            .prop_map(|(m, n)| format!("from {m} import {n}")),
    ]
}

fn usage_line() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(|n| format!("value = {n}"))
}

fn program() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(import_line(), 0..6),
        prop::collection::vec(usage_line(), 0..4),
    )
        .prop_map(|(imports, usages)| {
            let mut lines = imports;
            lines.push(String::new());
            lines.extend(usages);
            lines.join("\n") + "\n"
        })
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(code in program()) {
        let once = cleanup_unused_imports(&code);
        prop_assert_eq!(cleanup_unused_imports(&once), once.clone());
    }

    #[test]
    fn merge_is_idempotent(code in program()) {
        let once = merge_duplicate_imports(&code);
        prop_assert_eq!(merge_duplicate_imports(&once), once.clone());
    }

    #[test]
    fn rewriting_keeps_code_valid(code in program()) {
        let out = merge_duplicate_imports(&cleanup_unused_imports(&code));
        prop_assert!(!ParsedSource::parse(&out).unwrap().has_error());
    }
}
