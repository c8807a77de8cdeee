//! Authentication sub-generators
//!
//! One literal constructor per known kind. Options present on the legacy
//! descriptor are rendered verbatim; missing required ones get a placeholder.

use crate::naming::is_identifier;
use csm_knowledge::Mapper;
use csm_model::literal::quote;
use csm_model::AuthDescriptor;

/// Required options carry a placeholder, optional ones are emitted only when set
type OptionSpec = (&'static str, Option<&'static str>);

static AUTH_TEMPLATES: &[(&str, &[OptionSpec])] = &[
    ("SecretBearer", &[("environment_key", Some("API_SECRET"))]),
    (
        "SecretBasic",
        &[
            ("username_key", Some("API_USERNAME")),
            ("password_key", Some("API_PASSWORD")),
        ],
    ),
    (
        "JWKS",
        &[
            ("jwks_url", Some("https://example.com/.well-known/jwks.json")),
            ("audience", Some("your-audience")),
            ("issuer", None),
        ],
    ),
    ("JWT", &[("secret_key", Some("JWT_SECRET")), ("algorithm", Some("HS256"))]),
    ("Public", &[]),
    (
        "OAuth2",
        &[
            ("client_id", Some("your-client-id")),
            ("client_secret", Some("your-client-secret")),
            ("authorization_url", Some("https://provider.com/oauth/authorize")),
            ("token_url", Some("https://provider.com/oauth/token")),
        ],
    ),
];

/// Kinds whose placeholders always need a human
static NEEDS_REVIEW: &[&str] = &["OAuth2"];

/// Generated authentication for an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCode {
    /// `authentication=...` keyword argument, indented for an endpoint call
    Keyword(String),
    /// No generator for the kind; a TODO comment line
    Todo(String),
}

impl AuthCode {
    /// Lines to place inside the endpoint call (without leading indentation)
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Keyword(code) => format!("{code},"),
            Self::Todo(comment) => comment.clone(),
        }
    }
}

/// Generate the v2 authentication for a legacy descriptor
#[must_use]
pub fn generate_auth(auth: &AuthDescriptor, mapper: &Mapper) -> AuthCode {
    let Some(kind) = mapper.map_auth_kind(&auth.kind) else {
        tracing::debug!("No authentication generator for {}", auth.kind);
        return AuthCode::Todo(format!("# TODO: Configure {} authentication", auth.kind));
    };
    let template = AUTH_TEMPLATES
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(&[][..], |(_, options)| *options);

    let mut arguments: Vec<String> = Vec::new();
    for (key, placeholder) in template {
        match (auth.options.get(*key), placeholder) {
            (Some(value), _) => arguments.push(format!("{key}={}", value.to_python())),
            (None, Some(placeholder)) => arguments.push(format!("{key}={}", quote(placeholder))),
            (None, None) => {}
        }
    }
    let mut unsupported = Vec::new();
    for (key, value) in &auth.options {
        if template.iter().any(|(k, _)| k == key) {
            continue;
        }
        if is_identifier(key) {
            arguments.push(format!("{key}={}", value.to_python()));
        } else {
            unsupported.push(format!("        # TODO: migrate option {}", quote(key)));
        }
    }

    let constructor = format!("authentication=clearskies.authentication.{kind}(");
    if arguments.is_empty() && unsupported.is_empty() {
        return AuthCode::Keyword(format!("{constructor})"));
    }
    let mut lines = vec![constructor];
    if NEEDS_REVIEW.contains(&kind) {
        lines.push(format!("        # TODO: Configure {kind} parameters"));
    }
    lines.extend(arguments.into_iter().map(|a| format!("        {a},")));
    lines.extend(unsupported);
    lines.push("    )".to_string());
    AuthCode::Keyword(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm_model::LiteralValue;
    use pretty_assertions::assert_eq;

    fn render(auth: &AuthDescriptor) -> String {
        generate_auth(auth, &Mapper::new()).render()
    }

    #[test]
    fn bearer_uses_configured_key() {
        let auth = AuthDescriptor::new("SecretBearer")
            .with_option("environment_key", LiteralValue::from("ORDERS_KEY"));
        assert_eq!(
            render(&auth),
            "authentication=clearskies.authentication.SecretBearer(\n        environment_key=\"ORDERS_KEY\",\n    ),"
        );
    }

    #[test]
    fn basic_gets_placeholders() {
        let out = render(&AuthDescriptor::new("secret_basic"));
        assert!(out.contains("username_key=\"API_USERNAME\""));
        assert!(out.contains("password_key=\"API_PASSWORD\""));
    }

    #[test]
    fn unbindable_option_names_become_todos() {
        let auth = AuthDescriptor::new("SecretBearer")
            .with_option("header-name", LiteralValue::from("X-Token"))
            .with_option("lambda", LiteralValue::from("x"))
            .with_option("header_prefix", LiteralValue::from("Token "));
        assert_eq!(
            render(&auth),
            "authentication=clearskies.authentication.SecretBearer(\n        environment_key=\"API_SECRET\",\n        header_prefix=\"Token \",\n        # TODO: migrate option \"header-name\"\n        # TODO: migrate option \"lambda\"\n    ),"
        );
    }

    #[test]
    fn jwks_issuer_only_when_present() {
        let out = render(&AuthDescriptor::new("JWKS"));
        assert!(out.contains("audience=\"your-audience\","));
        assert!(!out.contains("issuer"));

        let with_issuer = AuthDescriptor::new("JWKS").with_option("issuer", "https://id".into());
        assert!(render(&with_issuer).contains("issuer=\"https://id\","));
    }

    #[test]
    fn public_has_no_arguments() {
        assert_eq!(
            render(&AuthDescriptor::new("public")),
            "authentication=clearskies.authentication.Public(),"
        );
    }

    #[test]
    fn oauth2_is_flagged() {
        let out = render(&AuthDescriptor::new("OAuth2"));
        assert!(out.contains("# TODO: Configure OAuth2 parameters"));
        assert!(out.contains("token_url=\"https://provider.com/oauth/token\","));
    }

    #[test]
    fn extra_options_pass_through() {
        let auth = AuthDescriptor::new("SecretBearer").with_option("header", "X-Token".into());
        let out = render(&auth);
        assert!(out.contains("environment_key=\"API_SECRET\","));
        assert!(out.contains("header=\"X-Token\","));
    }

    #[test]
    fn unknown_kind_is_a_todo() {
        assert_eq!(
            generate_auth(&AuthDescriptor::new("Kerberos"), &Mapper::new()),
            AuthCode::Todo("# TODO: Configure Kerberos authentication".into())
        );
    }
}
