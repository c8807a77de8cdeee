//! Named operations
//!
//! Each operation is an isolated request/response call returning a JSON
//! value, for use behind whatever transport embeds the engine.

use crate::analyzer::Analyzer;
use crate::complexity::ComplexityAssessment;
use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use crate::planner::Planner;
use csm_knowledge::Mapper;
use csm_model::{MigrationFile, ValidationReport};
use csm_validate::MigrationValidator;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Project report with its complexity assessment under `complexity`
///
/// # Errors
/// Returns [`MigrationError::InvalidRoot`] if `project` is not a directory
pub fn analyze_project(project: &Path, config: &MigrationConfig) -> Result<Value> {
    let report = Analyzer::new(config.clone()).analyze(project)?;
    let mut value = report.to_json();
    value["complexity"] = ComplexityAssessment::assess(&report).to_json();
    Ok(value)
}

/// Plan plus its validation, written under `output` unless `dry_run`
///
/// The result lists the target paths under `written` or, on a dry run,
/// under `planned`.
///
/// # Errors
/// Returns [`MigrationError::InvalidRoot`] for a bad project directory, or
/// the first write failure
pub fn generate_migration(
    project: &Path,
    output: &Path,
    dry_run: bool,
    config: &MigrationConfig,
) -> Result<Value> {
    let report = Analyzer::new(config.clone()).analyze(project)?;
    let plan = Planner::new(config.clone()).generate_all(&report)?;
    let validation = MigrationValidator::new().validate(&plan);

    let mut value = json!({
        "plan": plan.to_json(),
        "validation": validation.to_json(),
    });
    if dry_run {
        let planned: Vec<PathBuf> = plan.files().iter().map(|f| output.join(&f.path)).collect();
        value["planned"] = json!(planned);
    } else {
        let written = plan.apply(output, false)?;
        value["written"] = json!(written);
    }
    Ok(value)
}

/// v2 rewrite of a snippet
#[must_use]
pub fn map_snippet(code: &str, context: &str) -> Value {
    let result = Mapper::new().map_snippet(code, context);
    json!({
        "v2_code": result.example.map(|e| e.after).unwrap_or_default(),
        "breaking_changes": result.breaking_changes,
        "notes": result.notes,
    })
}

/// Markdown explanation of a concept
#[must_use]
pub fn explain_concept(concept: &str) -> String {
    csm_knowledge::explain_concept(concept)
}

/// Phase → tasks checklist
#[must_use]
pub fn migration_checklist() -> Value {
    json!(csm_knowledge::migration_checklist())
}

/// Validate an already generated tree
///
/// Files that cannot be read become error issues.
///
/// # Errors
/// Returns [`MigrationError::InvalidRoot`] if `dir` is not a directory
pub fn validate_output(dir: &Path, config: &MigrationConfig) -> Result<ValidationReport> {
    if !dir.is_dir() {
        return Err(MigrationError::InvalidRoot(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    let mut unreadable = Vec::new();
    for path in Analyzer::new(config.clone()).discover(dir) {
        let relative = path.strip_prefix(dir).unwrap_or(&path).to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(content) => files.push(MigrationFile::create(relative, content)),
            Err(e) => unreadable.push((relative, e)),
        }
    }

    let mut report = MigrationValidator::new().validate_files(&files);
    for (path, e) in unreadable {
        report.add_error(format!("Could not read file: {e}"), Some(path), None);
    }
    Ok(report)
}
