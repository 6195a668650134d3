//! Trait ids read by the generator

pub const SPARSE: &str = "smithy.api#sparse";
pub const ENUM: &str = "smithy.api#enum";
pub const ERROR: &str = "smithy.api#error";

pub const HTTP_REQUEST_TESTS: &str = "smithy.test#httpRequestTests";
pub const HTTP_RESPONSE_TESTS: &str = "smithy.test#httpResponseTests";
