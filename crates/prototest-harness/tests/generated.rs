//! Checked-in generator output run against the hand-written client.
//!
//! The codegen test `golden_file_matches_generator_output` keeps
//! `golden/example_protocol_restjson1.rs` identical to what `generate` writes.

mod greeting_client;

include!("golden/example_protocol_restjson1.rs");

#[test]
fn error_test_fails_on_wrong_variant() {
    greeting_client::mislabel_errors(true);
    let result = get_resource_resource_not_found_error();
    greeting_client::mislabel_errors(false);

    let err = result.unwrap_err().to_string();
    assert_eq!(
        err,
        "expected the ResourceNotFound error, but discriminated Unhandled(\"status 404\")"
    );
}

#[test]
fn generated_tests_pass_when_called_directly() {
    say_hello_basic().unwrap();
    get_resource_ok().unwrap();
    get_resource_resource_not_found_error().unwrap();
}
