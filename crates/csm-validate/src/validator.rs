//! Whole-plan validation

use crate::structure::{
    check_column_import, check_endpoints, check_legacy_imports, check_models, check_syntax,
};
use csm_model::{MigrationFile, MigrationPlan, ValidationReport};
use csm_parser::ParsedSource;

/// Runs every per-file check over a plan
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationValidator;

impl MigrationValidator {
    /// Create validator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate every file of `plan`
    #[must_use]
    pub fn validate(&self, plan: &MigrationPlan) -> ValidationReport {
        self.validate_files(plan.files())
    }

    /// Validate a set of files, generated or read back from disk
    #[must_use]
    pub fn validate_files(&self, files: &[MigrationFile]) -> ValidationReport {
        let mut report = ValidationReport::new();
        for file in files {
            self.validate_file(file, &mut report);
        }
        tracing::info!(
            "Validated {} files: {} issues, valid={}",
            files.len(),
            report.issues().len(),
            report.is_valid()
        );
        report
    }

    fn validate_file(&self, file: &MigrationFile, report: &mut ValidationReport) {
        let path = file.path.as_path();
        let parsed = match ParsedSource::parse(&file.content) {
            Ok(parsed) => parsed,
            Err(e) => {
                report.add_error(
                    format!("Could not parse {}: {e}", path.display()),
                    Some(path.to_path_buf()),
                    None,
                );
                return;
            }
        };

        check_legacy_imports(&parsed, path, report);
        if !check_syntax(&parsed, path, report) {
            tracing::debug!("Skipping structural checks for {}", path.display());
            return;
        }
        check_column_import(&parsed, path, report);
        check_models(&parsed, path, report);
        check_endpoints(&parsed, path, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_model::Severity;

    fn plan(files: &[(&str, &str)]) -> MigrationPlan {
        let mut builder = MigrationPlan::builder();
        for (path, content) in files {
            builder.file(MigrationFile::create(*path, *content)).unwrap();
        }
        builder.build()
    }

    #[test]
    fn syntax_errors_carry_file_and_line() {
        let report = MigrationValidator::new().validate(&plan(&[("models/a.py", "x = 1\ndef broken(:\n")]));
        assert!(!report.is_valid());
        let issue = &report.issues()[0];
        assert_eq!(issue.message, "Invalid Python syntax in generated file");
        assert_eq!(issue.line, Some(2));
        assert_eq!(issue.file.as_deref(), Some(std::path::Path::new("models/a.py")));
    }

    #[test]
    fn issues_are_additive_across_files() {
        let report = MigrationValidator::new().validate(&plan(&[
            ("models/user.py", "import clearskies\n\n\nclass User(clearskies.Model):\n    pass\n"),
            ("app.py", "import clearskies\n\napp = clearskies.Application()\n"),
        ]));
        assert!(!report.is_valid());
        assert_eq!(report.issues_with(Severity::Error).count(), 1);
        assert_eq!(report.issues_with(Severity::Warning).count(), 1);
    }
}
