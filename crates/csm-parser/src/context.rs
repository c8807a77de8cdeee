//! Runtime-context inference for bootstrap files

use csm_model::ContextKind;
use std::path::Path;

/// Picks the target runtime context for a bootstrap site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextDetector {
    default: ContextKind,
}

impl ContextDetector {
    /// Detector falling back to `default`
    #[inline]
    #[must_use]
    pub fn new(default: ContextKind) -> Self {
        Self { default }
    }

    /// Infer from the file name, then the handler kind
    ///
    /// File name keywords win over the handler kind.
    #[must_use]
    pub fn infer(&self, path: &Path, handler_kind: Option<&str>) -> ContextKind {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if file_name.contains("lambda") {
            return ContextKind::Lambda;
        }
        if ["cli", "command", "console"].iter().any(|k| file_name.contains(k)) {
            return ContextKind::Cli;
        }
        if file_name.contains("wsgi") && !file_name.contains("ref") {
            return ContextKind::Wsgi;
        }
        if handler_kind.is_some_and(|k| k.to_ascii_lowercase().contains("cli")) {
            return ContextKind::Cli;
        }
        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_pick_context() {
        let detector = ContextDetector::default();
        assert_eq!(detector.infer(Path::new("src/lambda_handler.py"), None), ContextKind::Lambda);
        assert_eq!(detector.infer(Path::new("manage_console.py"), None), ContextKind::Cli);
        assert_eq!(detector.infer(Path::new("wsgi.py"), None), ContextKind::Wsgi);
        assert_eq!(detector.infer(Path::new("wsgiref_app.py"), None), ContextKind::WsgiRef);
    }

    #[test]
    fn handler_kind_is_consulted_last() {
        let detector = ContextDetector::default();
        assert_eq!(detector.infer(Path::new("app.py"), Some("CliHandler")), ContextKind::Cli);
        assert_eq!(detector.infer(Path::new("lambda.py"), Some("CliHandler")), ContextKind::Lambda);
    }

    #[test]
    fn configured_default_applies() {
        let detector = ContextDetector::new(ContextKind::Wsgi);
        assert_eq!(detector.infer(Path::new("app.py"), Some("RestfulApi")), ContextKind::Wsgi);
    }
}
