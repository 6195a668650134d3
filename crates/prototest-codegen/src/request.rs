//! Request tests: serialize an input over a capturing transport and check the wire request.

use prototest_core::model::PRELUDE_NAMESPACE;
use prototest_core::{HttpRequestTestCase, Model, Shape, ShapeId, TestCase};

use crate::assertions;
use crate::context::GenerationContext;
use crate::symbols::SymbolProvider;
use crate::value::ValueRenderer;
use crate::writer::{CodeWriter, rust_string};
use crate::GenerateError;

/// Doc lines, fixture comment, and the test function signature.
pub(crate) fn open_test(w: &mut CodeWriter, case: &dyn TestCase, subject: &ShapeId, test_name: &str) {
    if let Some(docs) = case.documentation() {
        w.write_docs(docs);
    }
    w.write_comment(&format!("{} ({subject})", case.id()));
    w.write("#[tokio::test]");
    w.open_block(format!("async fn {test_name}() -> TestResult {{"));
}

/// Input or output shape id, `None` for absent or `smithy.api#Unit`.
pub(crate) fn data_shape(id: Option<&ShapeId>) -> Option<&ShapeId> {
    id.filter(|id| id.as_str() != format!("{PRELUDE_NAMESPACE}#Unit"))
}

/// `let {var} = Type::builder()...build()?;` for a structure built from params.
pub(crate) fn write_builder(
    w: &mut CodeWriter,
    var: &str,
    renderer: &ValueRenderer<'_>,
    symbols: &dyn SymbolProvider,
    shape: &Shape,
    params: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), GenerateError> {
    let setters = renderer.setters(shape, params, "params")?;
    w.write(format!("let {var} = {}::builder()", symbols.shape_type(shape)));
    w.indent();
    for setter in setters {
        w.write(setter);
    }
    w.write(".build()?;");
    w.dedent();
    Ok(())
}

/// Append one request test for `case` to the context's file.
///
/// # Errors
///
/// Returns error on a missing expectation, params that do not fit the input
/// shape, or a test name already taken in the file.
pub(crate) fn render(
    ctx: &mut GenerationContext<'_>,
    model: &Model,
    symbols: &dyn SymbolProvider,
    operation: &Shape,
    case: &HttpRequestTestCase,
) -> Result<(), GenerateError> {
    let test_name = symbols.test_name(&case.id);
    let renderer = ValueRenderer::new(model, symbols, &case.id);
    let input = data_shape(operation.as_operation().and_then(|op| op.input.as_ref()));

    let mut w = CodeWriter::new();
    w.blank_line();
    open_test(&mut w, case, &operation.id, &test_name);
    w.write(format!(
        "let client = {}::with_transport(CapturingTransport);",
        symbols.client()
    ));
    match input {
        Some(input_id) => {
            let input_shape = model.expect(input_id)?;
            write_builder(&mut w, "input", &renderer, symbols, input_shape, &case.params)?;
        }
        None if case.params.is_empty() => {
            w.write("let input = Default::default();");
        }
        None => {
            return Err(GenerateError::InvalidParam {
                fixture: case.id.clone(),
                path: "params".into(),
                message: format!("given, but {} takes no input", operation.id),
            });
        }
    }
    w.open_block(format!(
        "let request = match client.{}(input).await? {{",
        symbols.operation_method(operation)
    ));
    w.write("Outcome::Captured(request) => request,");
    w.open_block("Outcome::Completed(output) => {");
    w.write(
        "return Err(format!(\"expected the request to be captured, but the call completed with {output:?}\").into());",
    );
    w.close_block("}");
    w.close_block("};");
    w.write(format!("let mut check = Check::new({});", rust_string(&case.id)));
    assertions::request(&mut w, case, ctx.config().unspecified_keys)?;
    w.write("check.finish()?;");
    w.write("Ok(())");
    w.close_block("}");

    let file = ctx.file();
    file.register(&case.id, &test_name)?;
    file.writer().write_raw(w.as_str());
    tracing::debug!(
        fixture = %case.id,
        operation = %operation.id,
        test = %test_name,
        "rendered request test"
    );
    Ok(())
}
