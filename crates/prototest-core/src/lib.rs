//! prototest-core: model, fixture, and configuration types
//!
//! This crate holds everything the generator reads: the Smithy model and its
//! indexes, the HTTP protocol test fixtures attached to operations and errors,
//! and the project configuration.

pub mod config;
pub mod fixture;
pub mod model;
pub mod plan;
pub mod schema;

pub use config::{Config, ConfigError, KeyPolicy};
pub use fixture::{AppliesTo, HttpRequestTestCase, HttpResponseTestCase, TestCase};
pub use model::{Member, Model, ModelError, Shape, ShapeId, ShapeKind, SimpleType};
pub use plan::{
    ErrorTestPlan, GenerationPlan, OperationPlan, ProtocolPlan, Validation, ValidationStatus,
};
pub use schema::ProtocolTestTraits;
