//! Complexity scoring never decreases as a project grows

use csm_core::ComplexityAssessment;
use csm_test_utils::{declaration, report};
use proptest::prelude::*;

proptest! {
    #[test]
    fn adding_a_model_never_lowers_the_score(
        models in 0usize..200,
        handlers in 0usize..200,
        custom in 0usize..400,
        hooks in 0usize..400,
    ) {
        let before = ComplexityAssessment::from_counts(models, handlers, custom, hooks);
        let after = ComplexityAssessment::from_counts(models + 1, handlers, custom, hooks);
        prop_assert!(after.score >= before.score);
        prop_assert!(after.level >= before.level);
        prop_assert!(after.estimated_hours >= before.estimated_hours);
        prop_assert!(after.estimated_hours >= 1);
    }

    #[test]
    fn reports_grow_monotonically(count in 0usize..30) {
        let declarations = |n: usize| (0..n).map(|i| declaration(&format!("M{i}"), &[])).collect();
        let before = ComplexityAssessment::assess(&report(declarations(count), vec![]));
        let after = ComplexityAssessment::assess(&report(declarations(count + 1), vec![]));
        prop_assert!(after.score >= before.score);
    }
}
