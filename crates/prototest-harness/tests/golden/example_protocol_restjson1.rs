// Code generated by prototest. DO NOT EDIT.
//
// HTTP protocol conformance tests. Request tests run the client over a
// CapturingTransport and compare the serialized request with the fixture.
// Response tests run it over an InjectingTransport and compare the
// deserialized output or error with the fixture params.

#[allow(unused_imports)]
use prototest_harness::{CapturingTransport, Check, HttpResponse, InjectingTransport, Outcome};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Serializes the name into the JSON body.
// SayHelloBasic (example#SayHello)
#[tokio::test]
async fn say_hello_basic() -> TestResult {
    let client = greeting_client::Client::with_transport(CapturingTransport);
    let input = greeting_client::types::SayHelloInput::builder()
        .name("world".to_owned())
        .build()?;
    let request = match client.say_hello(input).await? {
        Outcome::Captured(request) => request,
        Outcome::Completed(output) => {
            return Err(format!("expected the request to be captured, but the call completed with {output:?}").into());
        }
    };
    let mut check = Check::new("SayHelloBasic");
    check.method("POST", &request.method);
    check.path("/greet", request.path());
    check.body(r#"{"name":"world"}"#, Some("application/json"), &request.body);
    check.finish()?;
    Ok(())
}

// GetResourceOk (example#GetResource)
#[tokio::test]
async fn get_resource_ok() -> TestResult {
    let response = HttpResponse::new(200)
        .header("Content-Type", "application/json")
        .body(r#"{"score":"NaN"}"#);
    let client = greeting_client::Client::with_transport(InjectingTransport::new(response));
    let actual = match client.get_resource(Default::default()).await? {
        Outcome::Completed(output) => output,
        Outcome::Captured(request) => {
            return Err(format!("expected the response to be deserialized, but the request was captured: {request:?}").into());
        }
    };
    let expected = greeting_client::types::GetResourceOutput::builder()
        .score(f64::NAN)
        .build()?;
    let mut check = Check::new("GetResourceOk");
    check.float_member("score", &expected.score, &actual.score);
    check.finish()?;
    Ok(())
}

// ResourceNotFoundError (example#ResourceNotFound)
#[tokio::test]
async fn get_resource_resource_not_found_error() -> TestResult {
    let response = HttpResponse::new(404)
        .header("Content-Type", "application/json")
        .body(r#"{"message":"missing"}"#);
    let client = greeting_client::Client::with_transport(InjectingTransport::new(response));
    let err = match client.get_resource(Default::default()).await {
        Err(err) => err,
        Ok(outcome) => {
            return Err(format!("expected the ResourceNotFound error, but the call returned {outcome:?}").into());
        }
    };
    let actual = match err {
        greeting_client::operation::get_resource::GetResourceError::ResourceNotFound(actual) => actual,
        other => {
            return Err(format!("expected the ResourceNotFound error, but discriminated {other:?}").into());
        }
    };
    let expected = greeting_client::types::error::ResourceNotFound::builder()
        .message("missing".to_owned())
        .build()?;
    let mut check = Check::new("ResourceNotFoundError");
    check.member("message", &expected.message, &actual.message);
    check.finish()?;
    Ok(())
}
