use crate::utils::error::{AppError, AppResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Keyword-value substitutions applied to a template at execution time
pub type Bindings = HashMap<String, String>;

// `{{` and `}}` are literal braces; `{name}` is a placeholder.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Build bindings from borrowed pairs
pub fn bind(pairs: &[(&str, &str)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parse placeholder names from a template in order of first appearance
pub fn parse_template_variables(template: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();

    for cap in PLACEHOLDER.captures_iter(template) {
        if let Some(name) = cap.get(1) {
            let name = name.as_str().to_string();
            if !variables.contains(&name) {
                variables.push(name);
            }
        }
    }

    variables
}

/// Substitute every placeholder with its binding.
///
/// Fails with [`AppError::Binding`] listing every placeholder that has no
/// binding; extra bindings are ignored.
pub fn render_template(template: &str, bindings: &Bindings) -> AppResult<String> {
    let missing: Vec<String> = parse_template_variables(template)
        .into_iter()
        .filter(|name| !bindings.contains_key(name))
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Binding(missing));
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| match caps.get(1) {
        Some(name) => bindings
            .get(name.as_str())
            .cloned()
            .unwrap_or_default(),
        None => caps[0][..1].to_string(),
    });

    Ok(rendered.into_owned())
}

/// Parse `key=value` pairs given on the command line
pub fn parse_variables(var_args: &[String]) -> AppResult<Bindings> {
    let mut bindings = Bindings::new();

    for arg in var_args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(AppError::Validation(format!(
                "Invalid variable '{}', expected key=value",
                arg
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid variable '{}', key is empty",
                arg
            )));
        }
        bindings.insert(key.to_string(), value.to_string());
    }

    Ok(bindings)
}
