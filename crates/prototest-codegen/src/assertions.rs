//! Renders `Check` calls comparing wire values and modeled members with a fixture.
//!
//! Every call is rendered against a `check` variable in scope; the caller
//! opens it with `Check::new` and closes it with `check.finish()?`.

use prototest_core::{HttpRequestTestCase, KeyPolicy, Model, Shape};

use crate::GenerateError;
use crate::symbols::SymbolProvider;
use crate::value::is_float_like;
use crate::writer::{CodeWriter, rust_string};

fn str_slice<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.into_iter().map(rust_string).collect();
    format!("&[{}]", quoted.join(", "))
}

fn media_type_arg(media_type: Option<&str>) -> String {
    match media_type {
        Some(m) => format!("Some({})", rust_string(m)),
        None => "None".to_string(),
    }
}

/// Body check for a wire value bound to `var`.
pub(crate) fn body(w: &mut CodeWriter, var: &str, body: Option<&str>, media_type: Option<&str>) {
    match body {
        Some(text) if !text.is_empty() => {
            w.write(format!(
                "check.body({}, {}, &{var}.body);",
                rust_string(text),
                media_type_arg(media_type)
            ));
        }
        _ => {
            w.write(format!("check.body_empty(&{var}.body);"));
        }
    }
}

/// Checks over a captured request bound to `request`.
///
/// `method` and `uri` are required; everything else is asserted only when the
/// fixture names it, apart from the body and the unspecified-key policy.
///
/// # Errors
///
/// Returns [`GenerateError::MissingExpectation`] when `method` or `uri` is absent.
pub(crate) fn request(
    w: &mut CodeWriter,
    case: &HttpRequestTestCase,
    policy: KeyPolicy,
) -> Result<(), GenerateError> {
    let missing = |field| GenerateError::MissingExpectation {
        id: case.id.clone(),
        field,
    };
    let method = case.method.as_deref().ok_or_else(|| missing("method"))?;
    let uri = case.uri.as_deref().ok_or_else(|| missing("uri"))?;

    w.write(format!(
        "check.method({}, &request.method);",
        rust_string(method)
    ));
    w.write(format!("check.path({}, request.path());", rust_string(uri)));
    // `host` is the endpoint the client is configured with, not an expectation.
    if let Some(host) = case.resolved_host.as_deref() {
        w.write(format!("check.host({}, request.host());", rust_string(host)));
    }

    // Query string
    if !case.query_params.is_empty() {
        w.write(format!(
            "check.query_params({}, request.query());",
            str_slice(case.query_params.iter().map(String::as_str))
        ));
    }
    if !case.forbid_query_params.is_empty() {
        w.write(format!(
            "check.forbidden_query_params({}, request.query());",
            str_slice(case.forbid_query_params.iter().map(String::as_str))
        ));
    }
    if !case.require_query_params.is_empty() {
        w.write(format!(
            "check.required_query_params({}, request.query());",
            str_slice(case.require_query_params.iter().map(String::as_str))
        ));
    }
    if policy == KeyPolicy::Forbid {
        let mut allowed: Vec<&str> = case
            .query_params
            .iter()
            .map(|p| p.split_once('=').map_or(p.as_str(), |(k, _)| k))
            .chain(case.require_query_params.iter().map(String::as_str))
            .collect();
        allowed.sort_unstable();
        allowed.dedup();
        w.write(format!(
            "check.no_unspecified_query_params({}, request.query());",
            str_slice(allowed)
        ));
    }

    // Headers
    if !case.headers.is_empty() {
        let pairs: Vec<String> = case
            .headers
            .iter()
            .map(|(k, v)| format!("({}, {})", rust_string(k), rust_string(v)))
            .collect();
        w.write(format!(
            "check.headers(&[{}], &request.headers);",
            pairs.join(", ")
        ));
    }
    if !case.forbid_headers.is_empty() {
        w.write(format!(
            "check.forbidden_headers({}, &request.headers);",
            str_slice(case.forbid_headers.iter().map(String::as_str))
        ));
    }
    if !case.require_headers.is_empty() {
        w.write(format!(
            "check.required_headers({}, &request.headers);",
            str_slice(case.require_headers.iter().map(String::as_str))
        ));
    }
    if policy == KeyPolicy::Forbid {
        let mut allowed: Vec<&str> = case
            .headers
            .keys()
            .map(String::as_str)
            .chain(case.require_headers.iter().map(String::as_str))
            .collect();
        allowed.sort_by_key(|h| h.to_ascii_lowercase());
        allowed.dedup_by_key(|h| h.to_ascii_lowercase());
        w.write(format!(
            "check.no_unspecified_headers({}, &request.headers);",
            str_slice(allowed)
        ));
    }

    body(w, "request", case.body.as_deref(), case.body_media_type.as_deref());
    Ok(())
}

/// Member-by-member comparison of `expected` and `actual`, both instances of `shape`.
///
/// Every member is compared, so members the fixture leaves out must be unset
/// in `actual` too. Members holding floats use `float_member` so NaN matches NaN.
pub(crate) fn members(
    w: &mut CodeWriter,
    model: &Model,
    symbols: &dyn SymbolProvider,
    shape: &Shape,
) -> Result<(), GenerateError> {
    for member in shape.members() {
        let field = symbols.member_name(member);
        let method = if is_float_like(model, model.target_of(member)?) {
            "float_member"
        } else {
            "member"
        };
        w.write(format!(
            "check.{method}({}, &expected.{field}, &actual.{field});",
            rust_string(&member.name)
        ));
    }
    Ok(())
}
