//! Response tests: inject a canned response and check the deserialized output or error.

use prototest_core::{HttpResponseTestCase, Model, Shape, ShapeId};

use crate::assertions;
use crate::context::GenerationContext;
use crate::request::{data_shape, open_test, write_builder};
use crate::symbols::SymbolProvider;
use crate::value::ValueRenderer;
use crate::writer::{CodeWriter, rust_string};
use crate::GenerateError;

/// `let response = HttpResponse::new(..)...;` and the client over it.
fn write_injection(
    w: &mut CodeWriter,
    symbols: &dyn SymbolProvider,
    case: &HttpResponseTestCase,
) -> Result<(), GenerateError> {
    let code = case.code.ok_or_else(|| GenerateError::MissingExpectation {
        id: case.id.clone(),
        field: "code",
    })?;
    let mut chain: Vec<String> = case
        .headers
        .iter()
        .map(|(name, value)| format!(".header({}, {})", rust_string(name), rust_string(value)))
        .collect();
    if let Some(body) = case.body.as_deref().filter(|b| !b.is_empty()) {
        chain.push(format!(".body({})", rust_string(body)));
    }

    match chain.split_last_mut() {
        None => {
            w.write(format!("let response = HttpResponse::new({code});"));
        }
        Some((last, _)) => {
            last.push(';');
            w.write(format!("let response = HttpResponse::new({code})"));
            w.indent();
            for link in &chain {
                w.write(link);
            }
            w.dedent();
        }
    }
    w.write(format!(
        "let client = {}::with_transport(InjectingTransport::new(response));",
        symbols.client()
    ));
    Ok(())
}

/// Expected value from params plus a check of every member against `actual`.
fn write_member_checks(
    w: &mut CodeWriter,
    model: &Model,
    symbols: &dyn SymbolProvider,
    shape: Option<&Shape>,
    case: &HttpResponseTestCase,
    subject: &ShapeId,
) -> Result<(), GenerateError> {
    let renderer = ValueRenderer::new(model, symbols, &case.id);
    match shape {
        Some(shape) => {
            write_builder(w, "expected", &renderer, symbols, shape, &case.params)?;
        }
        None if !case.params.is_empty() => {
            return Err(GenerateError::InvalidParam {
                fixture: case.id.clone(),
                path: "params".into(),
                message: format!("given, but {subject} has no output members"),
            });
        }
        None => {}
    }
    w.write(format!("let mut check = Check::new({});", rust_string(&case.id)));
    if let Some(shape) = shape {
        assertions::members(w, model, symbols, shape)?;
    }
    w.write("check.finish()?;");
    w.write("Ok(())");
    Ok(())
}

fn append(
    ctx: &mut GenerationContext<'_>,
    w: &CodeWriter,
    case: &HttpResponseTestCase,
    test_name: &str,
) -> Result<(), GenerateError> {
    let file = ctx.file();
    file.register(&case.id, test_name)?;
    file.writer().write_raw(w.as_str());
    Ok(())
}

/// Append one success response test for `case`.
///
/// # Errors
///
/// Returns error on a missing status code, params that do not fit the output
/// shape, or a test name already taken in the file.
pub(crate) fn render_success(
    ctx: &mut GenerationContext<'_>,
    model: &Model,
    symbols: &dyn SymbolProvider,
    operation: &Shape,
    case: &HttpResponseTestCase,
) -> Result<(), GenerateError> {
    let test_name = symbols.test_name(&case.id);
    let output = data_shape(operation.as_operation().and_then(|op| op.output.as_ref()))
        .map(|id| model.expect(id))
        .transpose()?;

    let mut w = CodeWriter::new();
    w.blank_line();
    open_test(&mut w, case, &operation.id, &test_name);
    write_injection(&mut w, symbols, case)?;
    w.open_block(format!(
        "let actual = match client.{}(Default::default()).await? {{",
        symbols.operation_method(operation)
    ));
    w.write("Outcome::Completed(output) => output,");
    w.open_block("Outcome::Captured(request) => {");
    w.write(
        "return Err(format!(\"expected the response to be deserialized, but the request was captured: {request:?}\").into());",
    );
    w.close_block("}");
    w.close_block("};");
    write_member_checks(&mut w, model, symbols, output, case, &operation.id)?;
    w.close_block("}");

    append(ctx, &w, case, &test_name)?;
    tracing::debug!(
        fixture = %case.id,
        operation = %operation.id,
        test = %test_name,
        "rendered response test"
    );
    Ok(())
}

/// Append one error response test for `case`, declared on `error`.
///
/// # Errors
///
/// Same conditions as [`render_success`], against the error shape.
pub(crate) fn render_error(
    ctx: &mut GenerationContext<'_>,
    model: &Model,
    symbols: &dyn SymbolProvider,
    operation: &Shape,
    error: &Shape,
    case: &HttpResponseTestCase,
) -> Result<(), GenerateError> {
    let test_name = symbols.error_test_name(operation, &case.id);
    let error_name = error.id.name();

    let mut w = CodeWriter::new();
    w.blank_line();
    open_test(&mut w, case, &error.id, &test_name);
    write_injection(&mut w, symbols, case)?;
    w.open_block(format!(
        "let err = match client.{}(Default::default()).await {{",
        symbols.operation_method(operation)
    ));
    w.write("Err(err) => err,");
    w.open_block("Ok(outcome) => {");
    w.write(format!(
        "return Err(format!(\"expected the {error_name} error, but the call returned {{outcome:?}}\").into());"
    ));
    w.close_block("}");
    w.close_block("};");
    w.open_block("let actual = match err {");
    w.write(format!(
        "{}(actual) => actual,",
        symbols.error_variant(operation, error)
    ));
    w.open_block("other => {");
    w.write(format!(
        "return Err(format!(\"expected the {error_name} error, but discriminated {{other:?}}\").into());"
    ));
    w.close_block("}");
    w.close_block("};");
    write_member_checks(&mut w, model, symbols, Some(error), case, &error.id)?;
    w.close_block("}");

    append(ctx, &w, case, &test_name)?;
    tracing::debug!(
        fixture = %case.id,
        operation = %operation.id,
        error = %error.id,
        test = %test_name,
        "rendered error test"
    );
    Ok(())
}
