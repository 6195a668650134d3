//! Fixture discovery over a service's operations.

use prototest_core::fixture::{self, HttpRequestTestCase, HttpResponseTestCase};
use prototest_core::{Model, Shape, ShapeId};

use crate::GenerateError;

/// Fixtures attached to one operation and to its declared errors.
#[derive(Debug)]
pub struct OperationFixtures<'m> {
    pub operation: &'m Shape,
    pub request_tests: Vec<HttpRequestTestCase>,
    pub response_tests: Vec<HttpResponseTestCase>,
    pub error_tests: Vec<ErrorFixture<'m>>,
}

/// A response fixture declared on an error shape.
#[derive(Debug)]
pub struct ErrorFixture<'m> {
    pub error: &'m Shape,
    pub case: HttpResponseTestCase,
}

impl OperationFixtures<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.request_tests.is_empty() && self.response_tests.is_empty() && self.error_tests.is_empty()
    }
}

/// Collect fixtures for every operation of `service`.
///
/// Operations come in [`Model::contained_operations`] order; fixtures keep
/// declaration order; error fixtures follow the operation's error order.
///
/// # Errors
///
/// Returns error if the service or a referenced shape is missing, or a
/// fixture trait is malformed.
pub fn extract<'m>(
    model: &'m Model,
    service: &ShapeId,
) -> Result<Vec<OperationFixtures<'m>>, GenerateError> {
    let mut out = Vec::new();
    for operation in model.contained_operations(service)? {
        let mut error_tests = Vec::new();
        for error in model.errors_of(operation)? {
            for case in fixture::response_tests(error)? {
                error_tests.push(ErrorFixture { error, case });
            }
        }
        out.push(OperationFixtures {
            operation,
            request_tests: fixture::request_tests(operation)?,
            response_tests: fixture::response_tests(operation)?,
            error_tests,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "smithy": "2.0",
        "shapes": {
            "example#Svc": {
                "type": "service",
                "operations": [{"target": "example#B"}, {"target": "example#A"}]
            },
            "example#A": {
                "type": "operation",
                "errors": [{"target": "example#Gone"}, {"target": "example#Quiet"}],
                "traits": {
                    "smithy.test#httpRequestTests": [
                        {"id": "A1", "protocol": "p#one", "method": "GET", "uri": "/a"},
                        {"id": "A2", "protocol": "p#two", "method": "GET", "uri": "/a"}
                    ]
                }
            },
            "example#B": {"type": "operation"},
            "example#Gone": {
                "type": "structure",
                "traits": {
                    "smithy.api#error": "client",
                    "smithy.test#httpResponseTests": [
                        {"id": "Gone1", "protocol": "p#one", "code": 410}
                    ]
                }
            },
            "example#Quiet": {
                "type": "structure",
                "traits": {"smithy.api#error": "server"}
            }
        }
    }"#;

    #[test]
    fn keeps_operation_and_fixture_order() {
        let model = Model::from_json_str(MODEL).unwrap();
        let ops = extract(&model, &"example#Svc".into()).unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.operation.id.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(ops[0].is_empty());

        let a = &ops[1];
        let ids: Vec<&str> = a.request_tests.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2"]);
        assert!(a.response_tests.is_empty());
        assert_eq!(a.error_tests.len(), 1);
        assert_eq!(a.error_tests[0].error.id.name(), "Gone");
        assert_eq!(a.error_tests[0].case.code, Some(410));
    }

    #[test]
    fn unknown_service_is_error() {
        let model = Model::from_json_str(MODEL).unwrap();
        assert!(extract(&model, &"example#Nope".into()).is_err());
    }
}
