//! prototest-harness: runtime support for generated protocol tests
//!
//! Generated test files import this crate from their preamble. It supplies
//! the wire types a client under test exchanges with its transport, two
//! transport substitutes (one that captures the serialized request, one that
//! injects a canned response), and [`Check`], which collects every assertion
//! mismatch of a test so they can be reported together.

pub mod body;
mod check;
mod transport;
mod wire;

pub use check::{Check, CheckFailure, Mismatch, NanEq};
pub use transport::{CapturingTransport, Dispatch, InjectingTransport, Outcome, Transport};
pub use wire::{HttpRequest, HttpResponse};
