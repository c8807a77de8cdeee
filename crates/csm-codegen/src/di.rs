//! Property-injection snippets
//!
//! Shows the v2 replacement for constructor injection: one `inject.ByClass`
//! property per dependency and a method reading them from `self`.

use crate::imports::assemble_module;
use crate::naming::{snake_case, unreserved};

/// Module declaring `class_name` with one injected property per dependency
#[must_use]
pub fn generate_property_injection(class_name: &str, dependencies: &[&str]) -> String {
    let mut lines = vec![
        format!("class {class_name}(InjectableProperties, clearskies.Model):"),
        "    # Property-based dependency injection".to_string(),
    ];
    let properties: Vec<String> = dependencies.iter().map(|d| unreserved(&snake_case(d))).collect();
    for (property, dependency) in properties.iter().zip(dependencies) {
        lines.push(format!("    {property} = inject.ByClass({dependency})"));
    }
    lines.push(String::new());
    lines.push("    def my_method(self) -> None:".into());
    if properties.is_empty() {
        lines.push("        pass".into());
    }
    for property in &properties {
        lines.push(format!("        self.{property}.do_something()"));
    }
    assemble_module(&lines.join("\n"), &[])
}
