//! JSON Schema for the protocol test fixture format
//!
//! Tools that author fixtures outside a Smithy model (or lint the trait values
//! inside one) can validate against this schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Config;
use crate::fixture::{HttpRequestTestCase, HttpResponseTestCase};

/// The two protocol test traits as they appear on an operation or error shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProtocolTestTraits {
    /// `smithy.test#httpRequestTests`
    #[serde(
        rename = "smithy.test#httpRequestTests",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub request_tests: Vec<HttpRequestTestCase>,
    /// `smithy.test#httpResponseTests`
    #[serde(
        rename = "smithy.test#httpResponseTests",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub response_tests: Vec<HttpResponseTestCase>,
}

/// Generate the fixture JSON Schema as a pretty-printed string.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(ProtocolTestTraits);
    pretty(&schema)
}

/// Generate the `prototest.toml` JSON Schema as a pretty-printed string.
#[must_use]
pub fn generate_config_schema() -> String {
    let schema = schemars::schema_for!(Config);
    pretty(&schema)
}

fn pretty(schema: &schemars::Schema) -> String {
    // Schema is a plain JSON value; serializing it cannot fail.
    serde_json::to_string_pretty(schema).unwrap_or_default()
}
