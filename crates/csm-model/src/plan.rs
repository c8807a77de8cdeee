//! Migration plans
//!
//! A [`MigrationPlan`] is write-once: it is assembled through a
//! [`MigrationPlanBuilder`] that rejects duplicate output paths, and applying
//! it overwrites every target file wholesale.

use crate::error::{ApplyError, PlanError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What applying a file does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperation {
    /// New file
    #[default]
    Create,
    /// Replace an existing file
    Update,
}

impl FileOperation {
    /// What writing to `target` will actually do right now
    #[must_use]
    pub fn at(self, target: &Path) -> Self {
        if target.is_file() {
            Self::Update
        } else {
            self
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
        })
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Path relative to the output directory
    pub path: PathBuf,
    /// Generated content
    pub content: String,
    /// Operation
    pub operation: FileOperation,
}

impl MigrationFile {
    /// File to create
    #[inline]
    #[must_use]
    pub fn create(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            operation: FileOperation::Create,
        }
    }
}

/// Generated files plus the reports that go with them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    files: Vec<MigrationFile>,
    breaking_changes: Vec<String>,
    warnings: Vec<String>,
    manual_steps: Vec<String>,
}

impl MigrationPlan {
    /// Start a plan
    #[inline]
    #[must_use]
    pub fn builder() -> MigrationPlanBuilder {
        MigrationPlanBuilder::default()
    }

    /// Files, in generation order
    #[inline]
    #[must_use]
    pub fn files(&self) -> &[MigrationFile] {
        &self.files
    }

    /// File by relative path
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&MigrationFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }

    /// Breaking changes
    #[inline]
    #[must_use]
    pub fn breaking_changes(&self) -> &[String] {
        &self.breaking_changes
    }

    /// Warnings carried over from analysis
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Ordered manual follow-up steps
    #[inline]
    #[must_use]
    pub fn manual_steps(&self) -> &[String] {
        &self.manual_steps
    }

    /// Serializable representation
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Write every file under `output`, or print the intended operations
    ///
    /// # Errors
    /// Returns the first directory-creation or write failure. Files written
    /// before the failure stay on disk.
    pub fn apply(&self, output: &Path, dry_run: bool) -> Result<Vec<PathBuf>, ApplyError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.apply_with(output, dry_run, &mut lock)
    }

    /// [`Self::apply`] with dry-run lines sent to `out`
    ///
    /// # Errors
    /// See [`Self::apply`].
    pub fn apply_with(
        &self,
        output: &Path,
        dry_run: bool,
        out: &mut impl Write,
    ) -> Result<Vec<PathBuf>, ApplyError> {
        let mut touched = Vec::with_capacity(self.files.len());

        for file in &self.files {
            let target = output.join(&file.path);

            let operation = file.operation.at(&target);

            if dry_run {
                writeln!(out, "Would {operation}: {}", target.display())
                    .map_err(|e| ApplyError::io_error(&target, e))?;
                touched.push(target);
                continue;
            }

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ApplyError::io_error(parent, e))?;
            }
            std::fs::write(&target, &file.content).map_err(|e| ApplyError::io_error(&target, e))?;
            tracing::debug!(
                "{operation} {} ({} bytes)",
                target.display(),
                file.content.len()
            );
            touched.push(target);
        }

        tracing::info!(
            "{} {} files under {}",
            if dry_run { "Planned" } else { "Wrote" },
            touched.len(),
            output.display()
        );
        Ok(touched)
    }
}

/// Assembles a [`MigrationPlan`]
#[derive(Debug, Clone, Default)]
pub struct MigrationPlanBuilder {
    plan: MigrationPlan,
    paths: HashSet<PathBuf>,
}

impl MigrationPlanBuilder {
    /// Whether `path` is already taken
    #[inline]
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Add a file
    ///
    /// # Errors
    /// Returns [`PlanError::DuplicatePath`] if the path is already taken.
    pub fn file(&mut self, file: MigrationFile) -> Result<&mut Self, PlanError> {
        if !self.paths.insert(file.path.clone()) {
            return Err(PlanError::DuplicatePath(file.path));
        }
        self.plan.files.push(file);
        Ok(self)
    }

    /// Add a breaking change
    pub fn breaking_change(&mut self, change: impl Into<String>) -> &mut Self {
        self.plan.breaking_changes.push(change.into());
        self
    }

    /// Add a warning
    pub fn warning(&mut self, warning: impl Into<String>) -> &mut Self {
        self.plan.warnings.push(warning.into());
        self
    }

    /// Add a manual step
    pub fn manual_step(&mut self, step: impl Into<String>) -> &mut Self {
        self.plan.manual_steps.push(step.into());
        self
    }

    /// Freeze the plan
    #[inline]
    #[must_use]
    pub fn build(self) -> MigrationPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> MigrationPlan {
        let mut builder = MigrationPlan::builder();
        builder
            .file(MigrationFile::create("models/user.py", "class User: ...\n"))
            .unwrap()
            .file(MigrationFile::create("app.py", "import clearskies\n"))
            .unwrap();
        builder.breaking_change("Handlers → Endpoints (renamed)");
        builder.build()
    }

    #[test]
    fn duplicate_paths_rejected() {
        let mut builder = MigrationPlan::builder();
        builder.file(MigrationFile::create("app.py", "")).unwrap();
        let err = builder.file(MigrationFile::create("app.py", "x")).unwrap_err();
        assert!(matches!(err, PlanError::DuplicatePath(p) if p == Path::new("app.py")));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let touched = sample_plan().apply_with(dir.path(), true, &mut out).unwrap();

        assert_eq!(touched.len(), 2);
        assert!(!dir.path().join("app.py").exists());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Would create:"));
        assert!(printed.contains("user.py"));
    }

    #[test]
    fn dry_run_reports_existing_targets_as_updates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.py"), "stale").unwrap();
        let mut out = Vec::new();
        sample_plan().apply_with(dir.path(), true, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let app_line = printed.lines().find(|l| l.ends_with("app.py")).unwrap();
        assert!(app_line.starts_with("Would update:"), "{printed}");
        let user_line = printed.lines().find(|l| l.ends_with("user.py")).unwrap();
        assert!(user_line.starts_with("Would create:"), "{printed}");
        pretty_assertions::assert_eq!(std::fs::read_to_string(dir.path().join("app.py")).unwrap(), "stale");
    }

    #[test]
    fn apply_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.py"), "stale").unwrap();

        sample_plan().apply_with(dir.path(), false, &mut std::io::sink()).unwrap();

        let app = std::fs::read_to_string(dir.path().join("app.py")).unwrap();
        pretty_assertions::assert_eq!(app, "import clearskies\n");
        assert!(dir.path().join("models/user.py").is_file());
    }

    #[test]
    fn apply_propagates_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed
        std::fs::write(dir.path().join("models"), "").unwrap();

        let err = sample_plan()
            .apply_with(dir.path(), false, &mut std::io::sink())
            .unwrap_err();
        assert!(matches!(err, ApplyError::Io { .. }));
    }

    #[test]
    fn json_lists_files() {
        let json = sample_plan().to_json();
        assert_eq!(json["files"][0]["path"], "models/user.py");
        assert_eq!(json["files"][0]["operation"], "create");
    }
}
