//! Everything the generators emit must be valid Python

use csm_codegen::{
    generate_context, generate_property_injection, ContextWiring, DeclarationGenerator,
    EndpointGenerator, ModelRef,
};
use csm_knowledge::Mapper;
use csm_model::{AuthDescriptor, ContextKind, LiteralValue};
use csm_parser::{ParsedSource, SourceParser};
use csm_test_utils::{handler, secured_handler, user_declaration, V1_BUSY_MODEL, V1_DI_MODEL, V1_USER_MODEL};
use std::path::Path;

fn assert_parses(code: &str) {
    let parsed = ParsedSource::parse(code).unwrap();
    assert!(!parsed.has_error(), "generated code does not parse:\n{code}");
}

#[test]
fn models_from_fixtures_parse() {
    let mapper = Mapper::new();
    let generator = DeclarationGenerator::new(&mapper);
    let parser = SourceParser::new();
    for (name, source) in [
        ("models.py", V1_USER_MODEL),
        ("orders.py", V1_DI_MODEL),
        ("busy.py", V1_BUSY_MODEL),
    ] {
        let file = parser.parse_source(Path::new(name), source).unwrap();
        assert!(!file.declarations.is_empty(), "{name}");
        for declaration in &file.declarations {
            assert_parses(&generator.generate(declaration));
        }
    }
}

#[test]
fn endpoints_parse() {
    let mapper = Mapper::new();
    let user = user_declaration();
    let mut jwks = AuthDescriptor::new("JWKS");
    jwks = jwks.with_option("jwks_url", LiteralValue::from("https://example.com/.well-known/jwks.json"));
    let mut secured = secured_handler("admin", "User", "SecretBearer");
    secured.authentication = Some(jwks);

    let module = EndpointGenerator::new(&mapper).generate_file(
        &[
            handler("users", "User"),
            secured,
            secured_handler("orders", "Order", "OAuth2"),
        ],
        &[ModelRef {
            declaration: &user,
            module: "models.user",
        }],
    );
    assert_eq!(module.variables, vec!["users", "admin", "orders"]);
    assert_parses(&module.content);
}

#[test]
fn contexts_parse() {
    for kind in [ContextKind::WsgiRef, ContextKind::Wsgi, ContextKind::Cli, ContextKind::Lambda] {
        assert_parses(&generate_context(kind, &ContextWiring::default()));
    }
}

#[test]
fn property_injection_parses() {
    assert_parses(&generate_property_injection("Order", &["PaymentGateway", "HTTPClient"]));
}
