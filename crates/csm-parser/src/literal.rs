//! Syntax node → [`LiteralValue`]

use crate::syntax::{dotted_text, named_children, node_text, string_value};
use csm_model::LiteralValue;
use tree_sitter::Node;

/// Extract a literal from an expression node
///
/// Expressions without a static value come back as [`LiteralValue::Expr`]
/// holding their source text.
#[must_use]
pub fn literal(node: Node<'_>, source: &str) -> LiteralValue {
    let text = node_text(node, source);
    match node.kind() {
        "string" => string_value(text).map_or_else(|| LiteralValue::Expr(text.to_string()), LiteralValue::Str),
        "concatenated_string" => {
            let parts: Option<Vec<String>> = named_children(node)
                .into_iter()
                .map(|part| string_value(node_text(part, source)))
                .collect();
            parts.map_or_else(|| LiteralValue::Expr(text.to_string()), |p| LiteralValue::Str(p.concat()))
        }
        "integer" => parse_int(text).map_or_else(|| LiteralValue::Expr(text.to_string()), LiteralValue::Int),
        "float" => text
            .replace('_', "")
            .parse::<f64>()
            .map_or_else(|_| LiteralValue::Expr(text.to_string()), LiteralValue::Float),
        "true" => LiteralValue::Bool(true),
        "false" => LiteralValue::Bool(false),
        "none" => LiteralValue::None,
        "identifier" => LiteralValue::Name(text.to_string()),
        "attribute" => LiteralValue::Name(dotted_text(node, source)),
        "unary_operator" => unary(node, source),
        "list" | "tuple" | "set" => LiteralValue::List(
            named_children(node)
                .into_iter()
                .map(|n| literal(n, source))
                .collect(),
        ),
        "parenthesized_expression" => match named_children(node).as_slice() {
            [inner] => literal(*inner, source),
            _ => LiteralValue::Expr(text.to_string()),
        },
        "dictionary" => LiteralValue::Dict(
            named_children(node)
                .into_iter()
                .filter(|n| n.kind() == "pair")
                .filter_map(|pair| {
                    let key = pair.child_by_field_name("key")?;
                    let value = pair.child_by_field_name("value")?;
                    Some((literal(key, source), literal(value, source)))
                })
                .collect(),
        ),
        "call" => call(node, source).unwrap_or_else(|| LiteralValue::Expr(text.to_string())),
        _ => LiteralValue::Expr(text.to_string()),
    }
}

/// Dictionary entries whose keys are strings or names
#[must_use]
pub fn string_keyed(value: LiteralValue) -> Vec<(String, LiteralValue)> {
    match value {
        LiteralValue::Dict(pairs) => pairs
            .into_iter()
            .filter_map(|(k, v)| k.as_symbol().map(|k| (k.to_string(), v)))
            .collect(),
        _ => Vec::new(),
    }
}

fn unary(node: Node<'_>, source: &str) -> LiteralValue {
    let text = node_text(node, source);
    let operator = node
        .child_by_field_name("operator")
        .map_or("", |op| node_text(op, source));
    let Some(argument) = node.child_by_field_name("argument") else {
        return LiteralValue::Expr(text.to_string());
    };
    match (operator, literal(argument, source)) {
        ("-", LiteralValue::Int(i)) => i
            .checked_neg()
            .map_or_else(|| LiteralValue::Expr(text.to_string()), LiteralValue::Int),
        ("-", LiteralValue::Float(f)) => LiteralValue::Float(-f),
        ("+", value @ (LiteralValue::Int(_) | LiteralValue::Float(_))) => value,
        _ => LiteralValue::Expr(text.to_string()),
    }
}

fn call(node: Node<'_>, source: &str) -> Option<LiteralValue> {
    let function = node.child_by_field_name("function")?;
    if !matches!(function.kind(), "identifier" | "attribute") {
        return None;
    }
    let arguments = node.child_by_field_name("arguments")?;
    if arguments.kind() != "argument_list" {
        return None;
    }

    let mut positional = Vec::new();
    let mut keywords = Vec::new();
    for arg in named_children(arguments) {
        match arg.kind() {
            "keyword_argument" => {
                let name = arg.child_by_field_name("name")?;
                let value = arg.child_by_field_name("value")?;
                keywords.push((node_text(name, source).to_string(), literal(value, source)));
            }
            "list_splat" | "dictionary_splat" => return None,
            _ => positional.push(literal(arg, source)),
        }
    }

    Some(LiteralValue::Call {
        callee: dotted_text(function, source),
        arguments: positional,
        keywords,
    })
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParsedSource;

    fn value_of(expr: &str) -> LiteralValue {
        let src = format!("x = {expr}\n");
        let parsed = ParsedSource::parse(&src).unwrap();
        let assignment = crate::syntax::descendants_of_kind(parsed.root(), "assignment")[0];
        let right = assignment.child_by_field_name("right").unwrap();
        literal(right, &src)
    }

    #[test]
    fn scalars() {
        assert_eq!(value_of("'users'"), LiteralValue::Str("users".into()));
        assert_eq!(value_of("42"), LiteralValue::Int(42));
        assert_eq!(value_of("-7"), LiteralValue::Int(-7));
        assert_eq!(value_of("0x10"), LiteralValue::Int(16));
        assert_eq!(value_of("1.5"), LiteralValue::Float(1.5));
        assert_eq!(value_of("True"), LiteralValue::Bool(true));
        assert_eq!(value_of("None"), LiteralValue::None);
    }

    #[test]
    fn names_and_attributes() {
        assert_eq!(value_of("User"), LiteralValue::Name("User".into()));
        assert_eq!(
            value_of("clearskies.column_types.UUID"),
            LiteralValue::Name("clearskies.column_types.UUID".into())
        );
    }

    #[test]
    fn containers() {
        assert_eq!(
            value_of("['id', 'name']"),
            LiteralValue::List(vec!["id".into(), "name".into()])
        );
        let dict = value_of("{'model_class': User, 'base_url': 'users'}");
        assert_eq!(dict.get("model_class"), Some(&LiteralValue::Name("User".into())));
        assert_eq!(dict.get("base_url").and_then(LiteralValue::as_str), Some("users"));
    }

    #[test]
    fn calls_keep_keywords() {
        let value = value_of("clearskies.authentication.SecretBearer(environment_key='KEY')");
        let LiteralValue::Call { callee, keywords, .. } = value else {
            panic!("expected call");
        };
        assert_eq!(callee, "clearskies.authentication.SecretBearer");
        assert_eq!(keywords, vec![("environment_key".to_string(), LiteralValue::Str("KEY".into()))]);
    }

    #[test]
    fn dynamic_values_fall_back_to_text() {
        assert_eq!(value_of("f'{a}'"), LiteralValue::Expr("f'{a}'".into()));
        assert_eq!(value_of("a + b"), LiteralValue::Expr("a + b".into()));
    }

    #[test]
    fn string_keyed_skips_other_keys() {
        let pairs = string_keyed(value_of("{'a': 1, 2: 3}"));
        assert_eq!(pairs, vec![("a".to_string(), LiteralValue::Int(1))]);
    }
}
