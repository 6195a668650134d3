//! prototest-codegen: protocol conformance test generation
//!
//! Walks a service's operations, keeps the `smithy.test` fixtures that target
//! one protocol, and renders each into an async Rust test that drives the
//! generated client through a `prototest_harness` transport.
//!
//! A run produces at most one file per protocol. Nothing is allocated until
//! the first fixture renders, so a protocol with no matching fixtures yields
//! no file at all.

mod assertions;
pub mod context;
mod error;
pub mod extract;
pub mod filter;
mod request;
mod response;
pub mod symbols;
mod value;
pub mod writer;

use prototest_core::plan::{ErrorTestPlan, OperationPlan, ProtocolPlan, validate_config};
use prototest_core::{Config, GenerationPlan, Model, TestCase};

pub use context::GenerationContext;
pub use error::GenerateError;
pub use extract::{ErrorFixture, OperationFixtures, extract};
pub use filter::{Selection, SkipReason, accepts, select};
pub use symbols::{RustSymbolProvider, SymbolProvider};
pub use writer::{CodeWriter, rust_string};

/// One generated test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory
    pub path: String,
    pub protocol: String,
    pub contents: String,
    /// Number of test functions in the file
    pub tests: usize,
}

/// Renders protocol tests for a model under one config.
#[derive(Debug, Clone)]
pub struct Generator<S = RustSymbolProvider> {
    config: Config,
    symbols: S,
}

impl Generator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let symbols = RustSymbolProvider::new(&config.crate_name);
        Self { config, symbols }
    }
}

impl<S: SymbolProvider> Generator<S> {
    /// Use a custom naming scheme for the client under test.
    pub fn with_symbols<T: SymbolProvider>(self, symbols: T) -> Generator<T> {
        Generator {
            config: self.config,
            symbols,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate the test file for one protocol.
    ///
    /// Returns an empty vec when no fixture in the service targets `protocol`.
    ///
    /// # Errors
    ///
    /// Returns error on the first fixture that cannot be rendered; no file is
    /// produced for the protocol in that case.
    pub fn generate(&self, model: &Model, protocol: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
        let service = model.service(self.config.service.as_deref())?;
        let operations = extract(model, &service.id)?;
        let mut ctx = GenerationContext::new(protocol, &self.config);
        let symbols: &dyn SymbolProvider = &self.symbols;

        for op in &operations {
            for case in &op.request_tests {
                if self.selected(case, protocol) {
                    request::render(&mut ctx, model, symbols, op.operation, case)?;
                }
            }
            for case in &op.response_tests {
                if self.selected(case, protocol) {
                    response::render_success(&mut ctx, model, symbols, op.operation, case)?;
                }
            }
            for ErrorFixture { error, case } in &op.error_tests {
                if self.selected(case, protocol) {
                    response::render_error(&mut ctx, model, symbols, op.operation, error, case)?;
                }
            }
        }

        match ctx.finish() {
            Some(file) => {
                tracing::info!(
                    protocol,
                    path = %file.path,
                    tests = file.tests,
                    "generated protocol tests"
                );
                Ok(vec![file])
            }
            None => {
                tracing::info!(protocol, "no fixtures for protocol, nothing generated");
                Ok(Vec::new())
            }
        }
    }

    /// Generate for every protocol in the config, in config order.
    ///
    /// # Errors
    ///
    /// Returns the first error of any protocol.
    pub fn generate_all(&self, model: &Model) -> Result<Vec<GeneratedFile>, GenerateError> {
        let mut files = Vec::new();
        for protocol in &self.config.protocols {
            files.extend(self.generate(model, protocol)?);
        }
        Ok(files)
    }

    /// What [`Self::generate_all`] would produce, without rendering.
    ///
    /// # Errors
    ///
    /// Returns error if the service or a referenced shape cannot be resolved.
    pub fn plan(&self, model: &Model) -> Result<GenerationPlan, GenerateError> {
        let service = model.service(self.config.service.as_deref())?;
        let operations = extract(model, &service.id)?;

        let protocols = self
            .config
            .protocols
            .iter()
            .map(|protocol| self.plan_protocol(&operations, protocol))
            .collect();

        Ok(GenerationPlan {
            service: service.id.to_string(),
            protocols,
            validations: validate_config(&self.config),
        })
    }

    fn plan_protocol(&self, operations: &[OperationFixtures<'_>], protocol: &str) -> ProtocolPlan {
        let mut plan = ProtocolPlan {
            protocol: protocol.to_string(),
            ..ProtocolPlan::default()
        };
        let mut keep = |case: &dyn TestCase| match select(case, protocol, &self.config) {
            Selection::Render => true,
            Selection::OtherProtocol => false,
            Selection::Skipped(_) => {
                plan.skipped.push(case.id().to_string());
                false
            }
        };

        let mut planned = Vec::new();
        for op in operations {
            let request_tests = op
                .request_tests
                .iter()
                .filter(|c| keep(*c as &dyn TestCase))
                .map(|c| c.id.clone())
                .collect();
            let response_tests = op
                .response_tests
                .iter()
                .filter(|c| keep(*c as &dyn TestCase))
                .map(|c| c.id.clone())
                .collect();
            let error_tests = op
                .error_tests
                .iter()
                .filter(|e| keep(&e.case as &dyn TestCase))
                .map(|e| ErrorTestPlan {
                    error: e.error.id.to_string(),
                    id: e.case.id.clone(),
                })
                .collect();
            let op_plan = OperationPlan {
                operation: op.operation.id.to_string(),
                request_tests,
                response_tests,
                error_tests,
            };
            if op_plan.test_count() > 0 {
                planned.push(op_plan);
            }
        }

        plan.operations = planned;
        if plan.test_count() > 0 {
            plan.file = Some(context::test_file_path(&self.config.file_template, protocol));
        }
        plan
    }

    fn selected(&self, case: &dyn TestCase, protocol: &str) -> bool {
        match select(case, protocol, &self.config) {
            Selection::Render => true,
            Selection::OtherProtocol => false,
            Selection::Skipped(reason) => {
                tracing::debug!(fixture = case.id(), protocol, %reason, "skipping fixture");
                false
            }
        }
    }
}

/// Generate the test file for one protocol with the default naming scheme.
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate(model: &Model, config: &Config, protocol: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
    Generator::new(config.clone()).generate(model, protocol)
}
