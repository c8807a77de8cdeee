//! Migration planning
//!
//! Turns one [`ProjectReport`] into a [`MigrationPlan`]. Generation is a pure
//! function of the report: the same report always yields byte-identical
//! files.

use crate::config::MigrationConfig;
use crate::error::Result;
use csm_codegen::{
    generate_context, module_path, snake_case, unreserved, ContextWiring, DeclarationGenerator,
    EndpointGenerator, ModelRef,
};
use csm_knowledge::Mapper;
use csm_model::{BindingKind, ContextKind, MigrationFile, MigrationPlan, ProjectReport};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Changes every migrated project is subject to
pub const BREAKING_CHANGES: [&str; 4] = [
    "Models: columns_configuration() → class attributes",
    "Handlers → Endpoints (renamed)",
    "Application → Context wrappers",
    "Explicit readable/writeable column configuration required",
];

/// What the generated code already covers
const AUTOMATED: [&str; 7] = [
    "Type hints (Python 3.13+)",
    "Mixins (Configurable, InjectableProperties, Loggable)",
    "Configuration (configs.* attributes)",
    "DI property injection",
    "Import organization",
    "Authentication configuration",
    "Column definitions",
];

const RULE_WIDTH: usize = 80;

/// Builds migration plans
#[derive(Debug, Clone)]
pub struct Planner {
    config: MigrationConfig,
    mapper: Mapper,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(MigrationConfig::default())
    }
}

impl Planner {
    /// Planner using `config` and the static knowledge base
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            config,
            mapper: Mapper::new(),
        }
    }

    /// Resolve names through `mapper` instead
    #[inline]
    #[must_use]
    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Plan for `report`
    ///
    /// One module per model, the combined endpoints module when there are
    /// handlers, and always one context module.
    ///
    /// # Errors
    /// Returns [`crate::MigrationError::Plan`] if two files resolve to the
    /// same path, which only happens when the layout points the endpoints or
    /// context module into the models directory.
    pub fn generate_all(&self, report: &ProjectReport) -> Result<MigrationPlan> {
        let layout = &self.config.layout;
        let mut builder = MigrationPlan::builder();

        let paths = self.declaration_paths(report);
        let modules: Vec<String> = paths.iter().map(|p| module_path(p)).collect();
        let declarations = DeclarationGenerator::new(&self.mapper);
        for (declaration, path) in report.declarations().iter().zip(&paths) {
            builder.file(MigrationFile::create(path, declarations.generate(declaration)))?;
        }

        let refs: Vec<ModelRef<'_>> = report
            .declarations()
            .iter()
            .zip(&modules)
            .map(|(declaration, module)| ModelRef {
                declaration,
                module: module.as_str(),
            })
            .collect();

        let mut wiring = ContextWiring {
            model_imports: refs
                .iter()
                .map(|m| format!("from {} import {}", m.module, m.declaration.name))
                .collect(),
            ..ContextWiring::default()
        };

        if !report.handlers().is_empty() {
            let endpoints = EndpointGenerator::new(&self.mapper).generate_file(report.handlers(), &refs);
            builder.file(MigrationFile::create(&layout.handler_file, endpoints.content))?;
            wiring.endpoint_module = Some(module_path(Path::new(&layout.handler_file)));
            wiring.endpoints = endpoints.variables;
        }

        for binding in report.bindings() {
            match binding.kind {
                BindingKind::Instance => wiring.bindings.push(binding.clone()),
                BindingKind::Class => wiring.classes.push(binding.name.clone()),
                BindingKind::Module => wiring.modules.push(binding.name.clone()),
            }
        }
        let context = self.context(report);
        builder.file(MigrationFile::create(
            &layout.bootstrap_file,
            generate_context(context, &wiring),
        ))?;

        for change in BREAKING_CHANGES {
            builder.breaking_change(change);
        }
        for step in self.manual_steps(report, context) {
            builder.manual_step(step);
        }
        for warning in report.warnings() {
            builder.warning(warning.clone());
        }

        let plan = builder.build();
        tracing::info!(
            "Planned {} files ({} models, {} handlers, context {})",
            plan.files().len(),
            report.declarations().len(),
            report.handlers().len(),
            context
        );
        Ok(plan)
    }

    /// Context of the first bootstrap, else the configured default
    fn context(&self, report: &ProjectReport) -> ContextKind {
        report
            .bootstraps()
            .first()
            .map_or(self.config.default_context, |b| b.context)
    }

    /// `<dir>/<snake>.py` per declaration, suffixed on collision
    ///
    /// Keyword stems take a trailing `_` so the module stays importable.
    fn declaration_paths(&self, report: &ProjectReport) -> Vec<PathBuf> {
        let dir = Path::new(&self.config.layout.declarations_dir);
        let mut taken = HashSet::new();
        report
            .declarations()
            .iter()
            .map(|declaration| {
                let stem = unreserved(&snake_case(&declaration.name));
                let mut candidate = stem.clone();
                let mut n = 2;
                while !taken.insert(candidate.clone()) {
                    candidate = format!("{stem}_{n}");
                    n += 1;
                }
                dir.join(format!("{candidate}.py"))
            })
            .collect()
    }

    fn manual_steps(&self, report: &ProjectReport, context: ContextKind) -> Vec<String> {
        let rule = "=".repeat(RULE_WIDTH);
        let mut steps = vec![
            rule.clone(),
            "MIGRATION COMPLETE - MANUAL STEPS REQUIRED (~15% of work)".to_string(),
            rule.clone(),
            String::new(),
        ];

        steps.push("1. CUSTOM BUSINESS LOGIC (~5% of migration)".into());
        steps.push("   Review all TODO comments in generated code:".into());
        for declaration in report.declarations() {
            if !declaration.hooks.is_empty() || !declaration.custom_methods.is_empty() {
                steps.push(format!(
                    "   - {} ({}): Migrate logic from {} hooks, {} custom methods",
                    declaration.name,
                    declaration.location,
                    declaration.hooks.len(),
                    declaration.custom_methods.len()
                ));
            }
        }
        steps.push("   Action: Copy business logic from v1, adapt for breaking changes".into());
        steps.push(String::new());

        steps.push("2. ENDPOINT SECURITY REVIEW (~3% of migration)".into());
        steps.push("   Verify readable/writeable column lists:".into());
        for handler in report.handlers().iter().filter(|h| h.declaration.is_some()) {
            steps.push(format!(
                "   - {}: Remove sensitive columns (passwords, tokens, etc.) from readable_column_names",
                handler.name
            ));
        }
        steps.push("   Action: Remove password_hash, api_tokens, secrets from exposed columns".into());
        steps.push(String::new());

        steps.push("3. PRODUCTION CONTEXT SETUP (~2% of migration)".into());
        steps.push(format!(
            "   Configure production context in {}:",
            self.config.layout.bootstrap_file
        ));
        if context == ContextKind::WsgiRef {
            steps.push("   - Switch from WsgiRef (dev) → Wsgi (production)".into());
        } else {
            steps.push(format!("   - Review {context} context settings"));
        }
        steps.push("   - Set up production DI bindings".into());
        steps.push("   - Configure database connections".into());
        steps.push("   Action: Update context wrapper for your deployment environment".into());
        steps.push(String::new());

        steps.push("4. COMPLEX DI PATTERNS (~2% of migration)".into());
        steps.push("   Review any dynamic or computed DI patterns:".into());
        steps.push("   - Dynamic class loading (di.build(computed_name))".into());
        steps.push("   - Conditional DI".into());
        steps.push("   - Factory patterns".into());
        steps.push("   Action: Manually convert to appropriate inject.* pattern".into());
        steps.push(String::new());

        steps.push("5. TESTING & VALIDATION (~3% of migration)".into());
        steps.push("   - Run all tests: pytest tests/".into());
        steps.push("   - Compare v1 vs v2 behavior on critical workflows".into());
        steps.push("   - Test authentication flows".into());
        steps.push("   - Load testing if applicable".into());
        steps.push("   Action: Ensure feature parity between v1 and v2".into());
        steps.push(String::new());

        steps.push("AUTOMATED (Already completed by migration tool):".into());
        steps.extend(AUTOMATED.iter().map(|item| format!("  ✅ {item}")));
        steps.push(String::new());
        steps.push("Need help? Run: explain_concept('<topic>')".into());
        steps.push(rule);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_test_utils::{bootstrap_report, declaration, handler, report, user_declaration};
    use pretty_assertions::assert_eq;

    fn paths(plan: &MigrationPlan) -> Vec<String> {
        plan.files().iter().map(|f| f.path.display().to_string()).collect()
    }

    #[test]
    fn files_per_entity() {
        let plan = Planner::default()
            .generate_all(&report(vec![user_declaration()], vec![handler("users", "User")]))
            .unwrap();
        assert_eq!(paths(&plan), vec!["models/user.py", "endpoints.py", "app.py"]);
        assert_eq!(plan.breaking_changes().len(), 4);

        let endpoints = &plan.file("endpoints.py").unwrap().content;
        assert!(endpoints.starts_with("from models.user import User\n"));

        let app = &plan.file("app.py").unwrap().content;
        assert!(app.contains("# from endpoints import users\n"));
        assert!(app.contains("# from models.user import User\n"));
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let plan = Planner::default()
            .generate_all(&report(
                vec![declaration("UserProfile", &[]), declaration("User_Profile", &[])],
                vec![],
            ))
            .unwrap();
        assert_eq!(
            paths(&plan),
            vec!["models/user_profile.py", "models/user_profile_2.py", "app.py"]
        );
    }

    #[test]
    fn keyword_module_names_are_suffixed() {
        let plan = Planner::default()
            .generate_all(&report(vec![declaration("Return", &[])], vec![handler("returns", "Return")]))
            .unwrap();
        assert_eq!(paths(&plan), vec!["models/return_.py", "endpoints.py", "app.py"]);
        let endpoints = &plan.file("endpoints.py").unwrap().content;
        assert!(endpoints.starts_with("from models.return_ import Return\n"));
        let app = &plan.file("app.py").unwrap().content;
        assert!(app.contains("# from models.return_ import Return\n"));
    }

    #[test]
    fn bootstrap_context_is_used() {
        let plan = Planner::default().generate_all(&bootstrap_report(ContextKind::Lambda)).unwrap();
        let app = &plan.file("app.py").unwrap().content;
        assert!(app.contains("app = clearskies.contexts.Lambda("));
        assert!(plan.manual_steps().iter().any(|s| s == "   - Review Lambda context settings"));
    }

    #[test]
    fn manual_steps_shape() {
        let plan = Planner::default()
            .generate_all(&report(vec![user_declaration()], vec![handler("users", "User")]))
            .unwrap();
        let steps = plan.manual_steps();
        assert_eq!(steps[0], "=".repeat(80));
        assert_eq!(steps[1], "MIGRATION COMPLETE - MANUAL STEPS REQUIRED (~15% of work)");
        assert!(steps.iter().any(|s| s.starts_with("   - User (models/user.py:1): Migrate logic from 1 hooks")));
        assert!(steps.iter().any(|s| s.starts_with("   - users: Remove sensitive columns")));
        for section in ["1. CUSTOM", "2. ENDPOINT", "3. PRODUCTION", "4. COMPLEX", "5. TESTING"] {
            assert!(steps.iter().any(|s| s.starts_with(section)), "{section}");
        }
        assert_eq!(steps.iter().filter(|s| s.contains('✅')).count(), 7);
        assert_eq!(steps[steps.len() - 2], "Need help? Run: explain_concept('<topic>')");
    }

    #[test]
    fn generation_is_deterministic() {
        let input = report(vec![user_declaration()], vec![handler("users", "User")]);
        let planner = Planner::default();
        assert_eq!(planner.generate_all(&input).unwrap(), planner.generate_all(&input).unwrap());
    }
}
