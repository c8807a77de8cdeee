//! Detector settings
//!
//! The conventional names the structural heuristics look for. They are
//! configuration rather than literals so that projects with other
//! conventions can widen (or narrow) detection. Accepting both `di` and
//! `_di` as container attributes is a known source of over-detection when
//! a class uses either name for something unrelated.

use serde::{Deserialize, Serialize};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

/// Names the parser and capability detector match against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    /// Base-class names marking a declaration (`Model`, `x.Model`)
    pub declaration_bases: Vec<String>,
    /// Callables constructing a legacy application
    pub bootstrap_constructors: Vec<String>,
    /// Initializer parameters that receive the DI container
    pub di_parameters: Vec<String>,
    /// Receiver attributes holding the DI container
    pub di_attributes: Vec<String>,
    /// Container methods that build a dependency by name
    pub build_methods: Vec<String>,
    /// Attributes holding a logger
    pub logger_attributes: Vec<String>,
    /// Logger level methods
    pub log_levels: Vec<String>,
    /// Modules providing logging
    pub logging_modules: Vec<String>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            declaration_bases: strings(&["Model"]),
            bootstrap_constructors: strings(&["Application"]),
            di_parameters: strings(&["di"]),
            di_attributes: strings(&["di", "_di"]),
            build_methods: strings(&["build"]),
            logger_attributes: strings(&["logger"]),
            log_levels: strings(&["debug", "info", "warning", "error", "critical"]),
            logging_modules: strings(&["logging"]),
        }
    }
}

impl DetectorSettings {
    /// Replace DI container attribute names
    #[inline]
    #[must_use]
    pub fn with_di_attributes(mut self, names: &[&str]) -> Self {
        self.di_attributes = strings(names);
        self
    }

    /// Replace DI container parameter names
    #[inline]
    #[must_use]
    pub fn with_di_parameters(mut self, names: &[&str]) -> Self {
        self.di_parameters = strings(names);
        self
    }

    /// Replace declaration base markers
    #[inline]
    #[must_use]
    pub fn with_declaration_bases(mut self, names: &[&str]) -> Self {
        self.declaration_bases = strings(names);
        self
    }

    /// Replace logger attribute names
    #[inline]
    #[must_use]
    pub fn with_logger_attributes(mut self, names: &[&str]) -> Self {
        self.logger_attributes = strings(names);
        self
    }

    pub(crate) fn matches(list: &[String], name: &str) -> bool {
        list.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_container_attributes() {
        let settings = DetectorSettings::default();
        assert!(DetectorSettings::matches(&settings.di_attributes, "_di"));
        assert!(DetectorSettings::matches(&settings.di_attributes, "di"));
        assert_eq!(settings.log_levels.len(), 5);
    }

    #[test]
    fn builders_replace_lists() {
        let settings = DetectorSettings::default().with_di_attributes(&["container"]);
        assert_eq!(settings.di_attributes, vec!["container"]);
    }
}
