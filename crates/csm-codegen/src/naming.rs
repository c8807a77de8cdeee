//! Python identifier and source-text helpers

use std::path::Path;

/// Reserved words that can never name a binding
pub static PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Whether `name` can be written as a Python attribute, variable or module name
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !PYTHON_KEYWORDS.contains(&name)
}

/// `name`, with a trailing `_` when it is a keyword (`return` → `return_`)
#[must_use]
pub fn unreserved(name: &str) -> String {
    if PYTHON_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// `text` folded onto one line so it can sit behind a `#`
#[must_use]
pub(crate) fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `UserProfile` → `user_profile`, `HTTPServer` → `http_server`
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Class name guessed from a build target
///
/// Names that already carry capitals are kept; `payment_gateway` and
/// `payment-gateway` become `PaymentGateway`.
#[must_use]
pub fn class_guess(target: &str) -> String {
    if target.chars().any(char::is_uppercase) {
        return target.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect();
    }
    target
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Dotted module path for a relative `.py` path (`models/user.py` → `models.user`)
#[must_use]
pub fn module_path(path: &Path) -> String {
    path.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_cases() {
        assert_eq!(snake_case("User"), "user");
        assert_eq!(snake_case("UserProfile"), "user_profile");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn class_guesses() {
        assert_eq!(class_guess("payment_gateway"), "PaymentGateway");
        assert_eq!(class_guess("Cursor"), "Cursor");
        assert_eq!(class_guess("mailer"), "Mailer");
        assert_eq!(class_guess("payment-gateway"), "PaymentGateway");
        assert_eq!(class_guess("smtp.client"), "SmtpClient");
    }

    #[test]
    fn identifiers_exclude_keywords() {
        assert!(is_identifier("first_name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("match"));
        assert!(!is_identifier("from"));
        assert!(!is_identifier("None"));
        assert!(!is_identifier("first-name"));
        assert!(!is_identifier("2fa"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn folded_text() {
        assert_eq!(single_line("{k: v for k in\n    load()}"), "{k: v for k in load()}");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn keywords_get_a_suffix() {
        assert_eq!(unreserved("return"), "return_");
        assert_eq!(unreserved("user"), "user");
    }

    #[test]
    fn module_paths() {
        assert_eq!(module_path(Path::new("models/user.py")), "models.user");
        assert_eq!(module_path(Path::new("app/models/order_item.py")), "app.models.order_item");
    }
}
