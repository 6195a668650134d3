//! Transport seam between a generated client and the network.
//!
//! A client under test hands each serialized request to its [`Transport`].
//! The transport either captures the request, which ends the call with
//! [`Outcome::Captured`], or answers it with a response for the client to
//! deserialize.

use std::sync::Arc;

use crate::wire::{HttpRequest, HttpResponse};

/// What a transport did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Stop here and return the request to the caller
    Captured(HttpRequest),
    /// Deserialize this response as if it came from the server
    Respond(HttpResponse),
}

/// Successful result of an operation call made through a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response was deserialized into the operation output
    Completed(T),
    /// The transport captured the request before it was sent
    Captured(HttpRequest),
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn captured(self) -> Option<HttpRequest> {
        match self {
            Self::Captured(request) => Some(request),
            Self::Completed(_) => None,
        }
    }

    #[must_use]
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(output) => Some(output),
            Self::Captured(_) => None,
        }
    }
}

pub trait Transport: Send + Sync {
    fn dispatch(&self, request: HttpRequest) -> Dispatch;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn dispatch(&self, request: HttpRequest) -> Dispatch {
        (**self).dispatch(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn dispatch(&self, request: HttpRequest) -> Dispatch {
        (**self).dispatch(request)
    }
}

/// Captures every request; nothing is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapturingTransport;

impl Transport for CapturingTransport {
    fn dispatch(&self, request: HttpRequest) -> Dispatch {
        Dispatch::Captured(request)
    }
}

/// Answers every request with the same canned response.
#[derive(Debug, Clone)]
pub struct InjectingTransport {
    response: HttpResponse,
}

impl InjectingTransport {
    #[must_use]
    pub fn new(response: HttpResponse) -> Self {
        Self { response }
    }
}

impl Transport for InjectingTransport {
    fn dispatch(&self, _request: HttpRequest) -> Dispatch {
        Dispatch::Respond(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_returns_request() {
        let req = HttpRequest::new("PUT", "/things/1").with_body("x");
        assert_eq!(
            CapturingTransport.dispatch(req.clone()),
            Dispatch::Captured(req)
        );
    }

    #[test]
    fn injecting_repeats_response() {
        let transport = Arc::new(InjectingTransport::new(HttpResponse::new(404).body("gone")));
        for _ in 0..2 {
            match transport.dispatch(HttpRequest::new("GET", "/")) {
                Dispatch::Respond(resp) => {
                    assert_eq!(resp.status, 404);
                    assert_eq!(resp.body, b"gone");
                }
                other => panic!("expected a response, got {other:?}"),
            }
        }
    }

    #[test]
    fn outcome_accessors() {
        let done: Outcome<u8> = Outcome::Completed(7);
        assert_eq!(done.clone().completed(), Some(7));
        assert!(done.captured().is_none());

        let captured: Outcome<u8> = Outcome::Captured(HttpRequest::new("GET", "/"));
        assert_eq!(captured.captured().map(|r| r.method), Some("GET".to_string()));
    }
}
