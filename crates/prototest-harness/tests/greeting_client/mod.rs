//! Hand-written client laid out the way generated tests address it.
#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;

use prototest_harness::{Dispatch, HttpRequest, HttpResponse, Outcome, Transport};
use serde_json::Value;

thread_local! {
    static MISLABEL_ERRORS: Cell<bool> = const { Cell::new(false) };
}

/// While set, modeled error responses on this thread come back as `Unhandled`.
pub fn mislabel_errors(on: bool) {
    MISLABEL_ERRORS.with(|m| m.set(on));
}

macro_rules! structure {
    ($name:ident, $builder:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: Option<$ty>,)*
        }

        impl $name {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }

        #[derive(Debug, Default)]
        pub struct $builder {
            $($field: Option<$ty>,)*
        }

        impl $builder {
            $(
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*

            pub fn build(self) -> Result<$name, std::convert::Infallible> {
                Ok($name {
                    $($field: self.$field,)*
                })
            }
        }
    };
}

pub mod types {
    structure!(SayHelloInput, SayHelloInputBuilder { name: String, lang: String });
    structure!(SayHelloOutput, SayHelloOutputBuilder { greeting: String, score: f64 });
    structure!(GetResourceInput, GetResourceInputBuilder { id: String });
    structure!(GetResourceOutput, GetResourceOutputBuilder { score: f64 });

    pub mod error {
        structure!(ResourceNotFound, ResourceNotFoundBuilder { message: String });
    }
}

macro_rules! operation_error {
    ($name:ident) => {
        #[derive(Debug)]
        pub enum $name {
            ResourceNotFound($crate::greeting_client::types::error::ResourceNotFound),
            Unhandled(String),
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{self:?}")
            }
        }

        impl std::error::Error for $name {}

        impl From<Failure> for $name {
            fn from(failure: Failure) -> Self {
                match failure {
                    Failure::NotFound(err) => Self::ResourceNotFound(err),
                    Failure::Unhandled(message) => Self::Unhandled(message),
                }
            }
        }
    };
}

pub mod operation {
    pub mod say_hello {
        use crate::greeting_client::Failure;
        operation_error!(SayHelloError);
    }

    pub mod get_resource {
        use crate::greeting_client::Failure;
        operation_error!(GetResourceError);
    }
}

use operation::get_resource::GetResourceError;
use operation::say_hello::SayHelloError;
use types::error::ResourceNotFound;
use types::{GetResourceInput, GetResourceOutput, SayHelloInput, SayHelloOutput};

/// Error side of a response before it is typed by operation.
pub enum Failure {
    NotFound(ResourceNotFound),
    Unhandled(String),
}

fn document(response: &HttpResponse) -> Result<Value, Failure> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| Failure::Unhandled(e.to_string()))
}

fn text(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// JSON numbers, or the strings `NaN`, `Infinity` and `-Infinity`.
fn number(doc: &Value, key: &str) -> Option<f64> {
    doc.get(key)
        .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
}

fn failure(response: &HttpResponse, doc: &Value) -> Failure {
    match response.status {
        404 if !MISLABEL_ERRORS.with(Cell::get) => Failure::NotFound(ResourceNotFound {
            message: text(doc, "message"),
        }),
        status => Failure::Unhandled(format!("status {status}")),
    }
}

pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The transport's response, its body as JSON, or the captured request.
    fn send(&self, request: HttpRequest) -> Result<Result<(HttpResponse, Value), HttpRequest>, Failure> {
        match self.transport.dispatch(request) {
            Dispatch::Captured(request) => Ok(Err(request)),
            Dispatch::Respond(response) => {
                let doc = document(&response)?;
                if response.status >= 300 {
                    return Err(failure(&response, &doc));
                }
                Ok(Ok((response, doc)))
            }
        }
    }

    pub async fn say_hello(
        &self,
        input: SayHelloInput,
    ) -> Result<Outcome<SayHelloOutput>, SayHelloError> {
        let uri = match &input.lang {
            Some(lang) => format!("/greet?lang={lang}"),
            None => "/greet".to_string(),
        };
        let body = serde_json::json!({ "name": input.name }).to_string();
        let request = HttpRequest::new("POST", uri)
            .with_header("Host", "greeter.example.com")
            .with_header("Content-Type", "application/json")
            .with_body(body);

        match self.send(request)? {
            Err(request) => Ok(Outcome::Captured(request)),
            Ok((_, doc)) => Ok(Outcome::Completed(SayHelloOutput {
                greeting: text(&doc, "greeting"),
                score: number(&doc, "score"),
            })),
        }
    }

    pub async fn get_resource(
        &self,
        input: GetResourceInput,
    ) -> Result<Outcome<GetResourceOutput>, GetResourceError> {
        let uri = match &input.id {
            Some(id) => format!("/resources/{id}"),
            None => "/resources".to_string(),
        };
        let request = HttpRequest::new("GET", uri).with_header("Host", "greeter.example.com");

        match self.send(request)? {
            Err(request) => Ok(Outcome::Captured(request)),
            Ok((_, doc)) => Ok(Outcome::Completed(GetResourceOutput {
                score: number(&doc, "score"),
            })),
        }
    }
}
