//! Snippet translation properties over the whole table

use csm_knowledge::Mapper;
use proptest::prelude::*;

fn translate(mapper: &Mapper, code: &str) -> String {
    mapper
        .map_snippet(code, "general")
        .example
        .map(|e| e.after)
        .unwrap_or_default()
}

#[test]
fn every_pair_translates() {
    let mapper = Mapper::new();
    for (v1, v2) in mapper.pairs() {
        let after = translate(&mapper, v1);
        assert!(after.contains(v2), "{v1} → {after}, expected {v2}");
        if !v2.contains(v1) {
            assert!(!after.contains(v1), "{v1} retained in {after}");
        }
    }
}

fn pair_index() -> impl Strategy<Value = usize> {
    0..Mapper::new().pairs().len()
}

proptest! {
    #[test]
    fn pairs_translate_inside_surrounding_code(index in pair_index(), indent in 0usize..8) {
        let mapper = Mapper::new();
        let (v1, v2) = mapper.pairs()[index];
        let code = format!("{}x = {v1}\n", " ".repeat(indent));
        let after = translate(&mapper, &code);
        prop_assert!(after.contains(v2));
        if !v2.contains(v1) {
            prop_assert!(!after.contains(v1));
        }
    }

    #[test]
    fn unrelated_code_is_untouched(code in "[a-z ]{0,40}") {
        let mapper = Mapper::new();
        prop_assume!(!code.contains("base_url") && !code.contains("readable_columns"));
        prop_assert_eq!(translate(&mapper, &code), code);
    }
}
