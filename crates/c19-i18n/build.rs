//! Build script for c19-i18n crate
//!
//! Validates the bundled Fluent files at compile time: every file must
//! parse, and every locale must define the same message ids with the same
//! variables.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

type Messages = BTreeMap<String, BTreeSet<String>>;

fn extract_messages(content: &str) -> Result<Messages, String> {
    let resource = parse(content).map_err(|(_, errors)| format!("parse errors: {errors:?}"))?;

    let mut messages = BTreeMap::new();
    for entry in resource.body {
        if let Entry::Message(message) = entry {
            let mut params = BTreeSet::new();
            if let Some(pattern) = &message.value {
                collect_pattern(pattern, &mut params);
            }
            for attribute in &message.attributes {
                collect_pattern(&attribute.value, &mut params);
            }
            messages.insert(message.id.name.to_string(), params);
        }
    }
    Ok(messages)
}

fn collect_pattern(pattern: &Pattern<&str>, params: &mut BTreeSet<String>) {
    for element in &pattern.elements {
        if let PatternElement::Placeable { expression } = element {
            collect_expression(expression, params);
        }
    }
}

fn collect_expression(expression: &Expression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        Expression::Select { selector, variants } => {
            collect_inline(selector, params);
            for variant in variants {
                collect_pattern(&variant.value, params);
            }
        }
        Expression::Inline(inline) => collect_inline(inline, params),
    }
}

fn collect_inline(expression: &InlineExpression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        InlineExpression::VariableReference { id } => {
            params.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for arg in &arguments.positional {
                collect_inline(arg, params);
            }
            for arg in &arguments.named {
                collect_inline(&arg.value, params);
            }
        }
        InlineExpression::Placeable { expression } => collect_expression(expression, params),
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

fn find_locale_files(locales_dir: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    let mut files = BTreeMap::new();
    let entries = fs::read_dir(locales_dir)
        .map_err(|e| format!("cannot read {}: {e}", locales_dir.display()))?;

    for entry in entries {
        let path = entry.map_err(|e| e.to_string())?.path();
        let main_ftl = path.join("main.ftl");
        if path.is_dir() && main_ftl.exists() {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| format!("invalid locale directory {}", path.display()))?;
            files.insert(name.to_string(), main_ftl);
        }
    }

    if files.is_empty() {
        return Err(format!("no locale files under {}", locales_dir.display()));
    }
    Ok(files)
}

fn validate_locales() -> Result<(), String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| "CARGO_MANIFEST_DIR not set")?;
    let locales_dir = Path::new(&manifest_dir).join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut parsed = BTreeMap::new();
    let mut problems = Vec::new();
    for (locale, path) in find_locale_files(&locales_dir)? {
        println!("cargo:rerun-if-changed={}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        match extract_messages(&content) {
            Ok(messages) => {
                parsed.insert(locale, messages);
            }
            Err(e) => problems.push(format!("{locale}: {e}")),
        }
    }

    let mut locales = parsed.iter();
    if let Some((reference_locale, reference)) = locales.next() {
        for (locale, messages) in locales {
            for (key, params) in reference {
                match messages.get(key) {
                    None => problems.push(format!("{locale}: missing message '{key}'")),
                    Some(other) if other != params => problems.push(format!(
                        "{locale}: '{key}' uses {other:?}, {reference_locale} uses {params:?}"
                    )),
                    Some(_) => {}
                }
            }
            for key in messages.keys().filter(|k| !reference.contains_key(*k)) {
                problems.push(format!("{locale}: extra message '{key}'"));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn main() {
    if let Err(e) = validate_locales() {
        eprintln!("locale validation failed:\n{e}");
        process::exit(1);
    }
}
