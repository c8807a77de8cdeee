//! Subcommand handlers
//!
//! Each handler prints its result to stdout and reports whether the run
//! succeeded; only I/O and configuration problems are errors.

use anyhow::{Context, Result};
use csm_core::{tools, Analyzer, ComplexityAssessment, MigrationConfig, Planner};
use csm_model::{Severity, ValidationReport};
use csm_validate::MigrationValidator;
use std::io::Read;
use std::path::Path;

pub(crate) fn analyze(path: &Path, json: bool, config: &MigrationConfig) -> Result<bool> {
    if json {
        let value = tools::analyze_project(path, config)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(true);
    }

    let report = Analyzer::new(config.clone()).analyze(path)?;
    let complexity = ComplexityAssessment::assess(&report);
    println!("Project: {}", report.root().display());
    println!("  Models:   {}", report.declarations().len());
    println!("  Handlers: {}", report.handlers().len());
    println!(
        "  Complexity: {} (score {}, ~{}h)",
        complexity.level, complexity.score, complexity.estimated_hours
    );
    for declaration in report.declarations() {
        println!(
            "  - {} [{}] {} fields, {} hooks, {} custom methods",
            declaration.name,
            declaration.location,
            declaration.fields.len(),
            declaration.hooks.len(),
            declaration.custom_methods.len()
        );
    }
    print_list("Warnings", report.warnings());
    print_list("Errors", report.errors());
    Ok(true)
}

pub(crate) fn generate(
    project: &Path,
    output: &Path,
    write: bool,
    config: &MigrationConfig,
) -> Result<bool> {
    let report = Analyzer::new(config.clone()).analyze(project)?;
    let plan = Planner::new(config.clone()).generate_all(&report)?;
    let validation = MigrationValidator::new().validate(&plan);

    plan.apply(output, !write)
        .with_context(|| format!("writing migration to {}", output.display()))?;

    print_list("Breaking changes", plan.breaking_changes());
    print_list("Warnings", plan.warnings());
    print_validation(&validation);
    println!();
    for step in plan.manual_steps() {
        println!("{step}");
    }
    if !write {
        println!("Dry run; pass --write to create the files.");
    }
    Ok(validation.is_valid())
}

pub(crate) fn map(file: &Path, context: &str) -> Result<bool> {
    let code = if file == Path::new("-") {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("reading snippet from stdin")?;
        code
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };

    let value = tools::map_snippet(&code, context);
    println!("{}", value["v2_code"].as_str().unwrap_or_default());
    for (key, title) in [("breaking_changes", "Breaking changes"), ("notes", "Notes")] {
        let items: Vec<String> = value[key]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        print_list(title, &items);
    }
    Ok(true)
}

pub(crate) fn explain(concept: &str) -> bool {
    println!("{}", tools::explain_concept(concept));
    true
}

pub(crate) fn checklist() -> Result<bool> {
    let value = tools::migration_checklist();
    let phases = value.as_object().context("checklist is not a mapping")?;
    for (phase, tasks) in phases {
        println!("{phase}:");
        for task in tasks.as_array().into_iter().flatten() {
            println!("  [ ] {}", task.as_str().unwrap_or_default());
        }
    }
    Ok(true)
}

pub(crate) fn validate(dir: &Path, config: &MigrationConfig) -> Result<bool> {
    let report = tools::validate_output(dir, config)?;
    print_validation(&report);
    Ok(report.is_valid())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
}

fn print_validation(report: &ValidationReport) {
    let errors = report.issues_with(Severity::Error).count();
    let warnings = report.issues_with(Severity::Warning).count();
    println!(
        "Validation: {} ({errors} errors, {warnings} warnings)",
        if report.is_valid() { "valid" } else { "INVALID" }
    );
    for issue in report.issues() {
        println!("  {issue}");
    }
}
