//! Validating hand-written and generated v2 files

use csm_model::{MigrationFile, MigrationPlan, Severity};
use csm_validate::MigrationValidator;

const LEGACY_BOOTSTRAP: &str = r#"import clearskies

api = clearskies.Application(
    clearskies.handlers.RestfulApi,
    {"model_class": User, "readable_columns": ["name"]},
)
"#;

const MODEL_WITHOUT_BACKEND: &str = r#"import clearskies
from clearskies import columns


class User(clearskies.Model):
    id_column_name = "id"
    name = columns.String()
"#;

fn plan(files: &[(&str, &str)]) -> MigrationPlan {
    let mut builder = MigrationPlan::builder();
    for (path, content) in files {
        builder.file(MigrationFile::create(*path, *content)).unwrap();
    }
    builder.build()
}

#[test]
fn legacy_bootstrap_alone_is_a_warning() {
    let report = MigrationValidator::new().validate(&plan(&[("app.py", LEGACY_BOOTSTRAP)]));
    assert!(report.is_valid());
    assert!(report
        .issues()
        .iter()
        .any(|i| i.severity == Severity::Warning && i.message.contains("Application()")));
}

#[test]
fn legacy_bootstrap_with_missing_backend_is_invalid() {
    let report = MigrationValidator::new().validate(&plan(&[
        ("app.py", LEGACY_BOOTSTRAP),
        ("models/user.py", MODEL_WITHOUT_BACKEND),
    ]));
    assert!(!report.is_valid());
    let errors: Vec<_> = report.issues_with(Severity::Error).map(|i| i.message.as_str()).collect();
    assert_eq!(errors, vec!["Model User missing backend attribute"]);
}

#[test]
fn same_file_gets_both_shapes_checked() {
    let mixed = format!("{MODEL_WITHOUT_BACKEND}\n{}", LEGACY_BOOTSTRAP.trim_start_matches("import clearskies\n"));
    let report = MigrationValidator::new().validate(&plan(&[("legacy.py", &mixed)]));
    assert!(!report.is_valid());
    assert!(report.issues().iter().any(|i| i.message.contains("Application()")));
}
