//! HTTP protocol test fixtures (`smithy.test#httpRequestTests` /
//! `smithy.test#httpResponseTests`).
//!
//! Expectation fields a renderer cannot do without (`method`, `uri`, `code`)
//! are optional here so that a missing field surfaces as a generation defect
//! naming the fixture, not as an opaque deserialization error.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ModelError, Shape, traits};

/// Which side of the protocol a fixture exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppliesTo {
    Client,
    Server,
}

/// An expected HTTP request for a set of input parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestTestCase {
    /// Test id, unique per operation and protocol; becomes the test name
    pub id: String,
    /// Shape id of the protocol this fixture applies to
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Resolved request path, without the query string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Host the client is configured with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Host the serialized request must be sent to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_host: Option<String>,
    /// Exact `key=value` pairs (percent-encoded) that must appear
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbid_query_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_query_params: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbid_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_media_type: Option<String>,
    /// Input parameters
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<AppliesTo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// An HTTP response and the modeled output (or error) it deserializes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponseTestCase {
    pub id: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// HTTP status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbid_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_media_type: Option<String>,
    /// Output (or error) members
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<AppliesTo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Fields shared by request and response fixtures.
pub trait TestCase {
    fn id(&self) -> &str;
    fn protocol(&self) -> &str;
    fn documentation(&self) -> Option<&str>;
    fn applies_to(&self) -> Option<AppliesTo>;
    fn params(&self) -> &serde_json::Map<String, serde_json::Value>;
}

macro_rules! impl_test_case {
    ($ty:ty) => {
        impl TestCase for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn protocol(&self) -> &str {
                &self.protocol
            }
            fn documentation(&self) -> Option<&str> {
                self.documentation.as_deref()
            }
            fn applies_to(&self) -> Option<AppliesTo> {
                self.applies_to
            }
            fn params(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.params
            }
        }
    };
}

impl_test_case!(HttpRequestTestCase);
impl_test_case!(HttpResponseTestCase);

fn decode<T: serde::de::DeserializeOwned>(
    shape: &Shape,
    trait_id: &str,
) -> Result<Vec<T>, ModelError> {
    match shape.traits.get(trait_id) {
        None => Ok(Vec::new()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| ModelError::InvalidTrait {
                shape: shape.id.to_string(),
                trait_id: trait_id.to_string(),
                message: e.to_string(),
            })
        }
    }
}

/// Request fixtures attached to an operation, in declaration order.
///
/// # Errors
///
/// Returns [`ModelError::InvalidTrait`] if the trait value is malformed.
pub fn request_tests(operation: &Shape) -> Result<Vec<HttpRequestTestCase>, ModelError> {
    decode(operation, traits::HTTP_REQUEST_TESTS)
}

/// Response fixtures attached to an operation or error, in declaration order.
///
/// # Errors
///
/// Returns [`ModelError::InvalidTrait`] if the trait value is malformed.
pub fn response_tests(shape: &Shape) -> Result<Vec<HttpResponseTestCase>, ModelError> {
    decode(shape, traits::HTTP_RESPONSE_TESTS)
}
