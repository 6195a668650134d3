//! Mapping from model shapes to names in the client crate under test.

use prototest_core::model::traits;
use prototest_core::{Member, Shape};

/// Resolves shapes and fixtures to Rust paths and identifiers.
pub trait SymbolProvider {
    /// Client type constructed with `with_transport`.
    fn client(&self) -> String;

    /// Async client method invoking an operation.
    fn operation_method(&self, operation: &Shape) -> String;

    /// Constructible type of a structure, union, or enum shape.
    fn shape_type(&self, shape: &Shape) -> String;

    /// Error enum returned by an operation.
    fn operation_error(&self, operation: &Shape) -> String;

    /// Variant of the operation error enum holding `error`.
    fn error_variant(&self, operation: &Shape, error: &Shape) -> String {
        format!("{}::{}", self.operation_error(operation), error.id.name())
    }

    /// Field and builder setter name of a structure member.
    fn member_name(&self, member: &Member) -> String;

    /// Variant name of a union member.
    fn union_variant(&self, member: &Member) -> String;

    /// Runtime primitive type (`Blob`, `DateTime`, `Document`).
    fn primitive(&self, name: &str) -> String;

    /// Test function name for a fixture id.
    fn test_name(&self, fixture_id: &str) -> String;

    /// Test function name for an error fixture, qualified by the operation
    /// since an error shape and its fixtures may be shared between operations.
    fn error_test_name(&self, operation: &Shape, fixture_id: &str) -> String {
        self.test_name(&format!("{}_{fixture_id}", operation.id.name()))
    }
}

/// Default provider for a client crate laid out as:
///
/// - `{crate}::Client`
/// - `{crate}::types::{Shape}` and `{crate}::types::error::{Error}`
/// - `{crate}::operation::{operation}::{Operation}Error`
/// - `{crate}::primitives::{Blob, DateTime, Document}`
#[derive(Debug, Clone)]
pub struct RustSymbolProvider {
    crate_name: String,
}

impl RustSymbolProvider {
    pub fn new(crate_name: &str) -> Self {
        Self {
            crate_name: crate_name.replace('-', "_"),
        }
    }
}

impl SymbolProvider for RustSymbolProvider {
    fn client(&self) -> String {
        format!("{}::Client", self.crate_name)
    }

    fn operation_method(&self, operation: &Shape) -> String {
        escape_keyword(to_snake_case(operation.id.name()))
    }

    fn shape_type(&self, shape: &Shape) -> String {
        let name = to_pascal_case(shape.id.name());
        if shape.traits.contains_key(traits::ERROR) {
            format!("{}::types::error::{name}", self.crate_name)
        } else {
            format!("{}::types::{name}", self.crate_name)
        }
    }

    fn operation_error(&self, operation: &Shape) -> String {
        let name = operation.id.name();
        format!(
            "{}::operation::{}::{}Error",
            self.crate_name,
            to_snake_case(name),
            to_pascal_case(name)
        )
    }

    fn member_name(&self, member: &Member) -> String {
        escape_keyword(to_snake_case(&member.name))
    }

    fn union_variant(&self, member: &Member) -> String {
        to_pascal_case(&member.name)
    }

    fn primitive(&self, name: &str) -> String {
        format!("{}::primitives::{name}", self.crate_name)
    }

    fn test_name(&self, fixture_id: &str) -> String {
        escape_keyword(to_snake_case(fixture_id))
    }
}

/// `SayHelloBasic` → `say_hello_basic`, `RestJsonHTTPPayload` → `rest_json_http_payload`.
///
/// Runs of non-alphanumeric characters become one `_`; a leading digit gets a `_` prefix.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// `string_value` / `stringValue` → `StringValue`.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper = false;
        } else {
            upper = true;
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

// Path keywords cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "super", "Self", "_"];

fn escape_keyword(ident: String) -> String {
    if RESERVED.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}
