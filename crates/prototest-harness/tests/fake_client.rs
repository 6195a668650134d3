//! Drives a hand-written client through the harness the way generated tests do.

use proptest::prelude::*;
use prototest_harness::{
    CapturingTransport, Check, HttpRequest, HttpResponse, InjectingTransport, Outcome,
};

mod greeting_client;

use greeting_client::Client;
use greeting_client::operation::say_hello::SayHelloError;
use greeting_client::types::SayHelloInput;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn captured_request_passes_checks() -> TestResult {
    let client = Client::with_transport(CapturingTransport);
    let input = SayHelloInput {
        name: Some("world".to_owned()),
        lang: Some("en".to_owned()),
    };
    let request = match client.say_hello(input).await? {
        Outcome::Captured(request) => request,
        Outcome::Completed(output) => {
            return Err(format!("expected the request to be captured, got {output:?}").into());
        }
    };
    let mut check = Check::new("SayHelloBasic");
    check.method("POST", &request.method);
    check.path("/greet", request.path());
    check.host("greeter.example.com", request.host());
    check.query_params(&["lang=en"], request.query());
    check.no_unspecified_query_params(&["lang"], request.query());
    check.headers(&[("Content-Type", "application/json")], &request.headers);
    check.body(r#"{"name": "world"}"#, Some("application/json"), &request.body);
    check.finish()?;
    Ok(())
}

#[tokio::test]
async fn injected_response_completes() -> TestResult {
    let response = HttpResponse::new(200)
        .header("Content-Type", "application/json")
        .body(r#"{"greeting":"hi","score":"NaN"}"#);
    let client = Client::with_transport(InjectingTransport::new(response));
    let output = match client.say_hello(Default::default()).await? {
        Outcome::Completed(output) => output,
        Outcome::Captured(request) => {
            return Err(format!("expected a completed call, captured {request:?}").into());
        }
    };
    let mut check = Check::new("SayHelloOk");
    check.member("greeting", &Some("hi".to_owned()), &output.greeting);
    check.float_member("score", &Some(f64::NAN), &output.score);
    check.finish()?;
    Ok(())
}

#[tokio::test]
async fn injected_error_is_discriminated() -> TestResult {
    let response = HttpResponse::new(404).body(r#"{"message":"missing"}"#);
    let client = Client::with_transport(InjectingTransport::new(response));
    let err = match client.say_hello(Default::default()).await {
        Err(err) => err,
        Ok(outcome) => return Err(format!("expected an error, got {outcome:?}").into()),
    };
    let actual = match err {
        SayHelloError::ResourceNotFound(actual) => actual,
        other => {
            return Err(format!("expected the ResourceNotFound error, but discriminated {other:?}").into());
        }
    };
    let mut check = Check::new("ResourceMissing");
    check.member("message", &Some("missing".to_owned()), &actual.message);
    check.finish()?;
    Ok(())
}

#[tokio::test]
async fn mismatches_surface_as_test_error() {
    let client = Client::with_transport(CapturingTransport);
    let request = client
        .say_hello(SayHelloInput::default())
        .await
        .unwrap()
        .captured()
        .unwrap();
    let mut check = Check::new("WrongExpectations");
    check.method("PUT", &request.method);
    check.body(r#"{"name":"someone"}"#, Some("application/json"), &request.body);
    let err = check.finish().unwrap_err();
    let fields: Vec<&str> = err.mismatches.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, vec!["method", "body at $.name"]);
}

fn capture(name: &str) -> HttpRequest {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let client = Client::with_transport(CapturingTransport);
    let input = SayHelloInput {
        name: Some(name.to_owned()),
        lang: None,
    };
    rt.block_on(client.say_hello(input))
        .unwrap()
        .captured()
        .unwrap()
}

proptest! {
    // Changing exactly one expected field fails exactly that assertion.
    #[test]
    fn single_field_change_isolated(name in "[a-z]{1,12}", which in 0usize..3) {
        let request = capture(&name);
        let mut method = "POST".to_string();
        let mut path = "/greet".to_string();
        let mut body = serde_json::json!({ "name": name }).to_string();
        match which {
            0 => method = "DELETE".into(),
            1 => path = "/other".into(),
            _ => body = serde_json::json!({ "name": format!("{name}x") }).to_string(),
        }

        let mut check = Check::new("prop");
        check.method(&method, &request.method);
        check.path(&path, request.path());
        check.body(&body, Some("application/json"), &request.body);
        let err = check.finish().unwrap_err();

        let expected_field = ["method", "path", "body at $.name"][which];
        prop_assert_eq!(err.mismatches.len(), 1);
        prop_assert_eq!(err.mismatches[0].field.as_str(), expected_field);
    }
}
