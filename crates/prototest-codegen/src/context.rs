//! Per-run generation state and the lazily allocated output file.

use std::collections::BTreeMap;

use prototest_core::Config;
use prototest_core::config::PROTOCOL_PLACEHOLDER;

use crate::writer::CodeWriter;
use crate::{GenerateError, GeneratedFile};

/// Fixed preamble written once at the top of every generated file.
pub const PREAMBLE: &str = include_str!("../templates/protocol_test_stub.rs.in");

/// Normalize a protocol id for use in a file name.
///
/// Lower-cases, collapses every run of non-alphanumeric characters into one
/// `_`, and trims `_` from both ends: `aws.protocols#restJson1` →
/// `aws_protocols_restjson1`.
#[must_use]
pub fn normalize_protocol(protocol: &str) -> String {
    let mut out = String::with_capacity(protocol.len());
    for c in protocol.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Output path for a protocol under a file template.
#[must_use]
pub fn test_file_path(template: &str, protocol: &str) -> String {
    template.replace(PROTOCOL_PLACEHOLDER, &normalize_protocol(protocol))
}

/// The single output file of a run.
#[derive(Debug)]
pub struct TestFile {
    path: String,
    writer: CodeWriter,
    /// Test function name → fixture id that claimed it
    tests: BTreeMap<String, String>,
}

impl TestFile {
    fn new(path: String) -> Self {
        let mut writer = CodeWriter::new();
        writer.write_raw(PREAMBLE);
        Self {
            path,
            writer,
            tests: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn writer(&mut self) -> &mut CodeWriter {
        &mut self.writer
    }

    /// Claim a test function name for a fixture.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::DuplicateFixtureId`] if an earlier fixture
    /// already produced the same name.
    pub fn register(&mut self, fixture_id: &str, test_name: &str) -> Result<(), GenerateError> {
        if let Some(previous) = self.tests.get(test_name) {
            return Err(GenerateError::DuplicateFixtureId {
                id: fixture_id.to_string(),
                previous: previous.clone(),
                test: test_name.to_string(),
                file: self.path.clone(),
            });
        }
        self.tests
            .insert(test_name.to_string(), fixture_id.to_string());
        Ok(())
    }

    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

/// State of one generation run for one protocol.
#[derive(Debug)]
pub struct GenerationContext<'c> {
    protocol: String,
    config: &'c Config,
    file: Option<TestFile>,
}

impl<'c> GenerationContext<'c> {
    pub fn new(protocol: impl Into<String>, config: &'c Config) -> Self {
        Self {
            protocol: protocol.into(),
            config,
            file: None,
        }
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.file.is_some()
    }

    /// The output file, created with its preamble on first call.
    pub fn file(&mut self) -> &mut TestFile {
        let (template, protocol) = (&self.config.file_template, &self.protocol);
        self.file.get_or_insert_with(|| {
            let path = test_file_path(template, protocol);
            tracing::debug!(protocol = %protocol, path = %path, "allocated test file");
            TestFile::new(path)
        })
    }

    /// Close the run; `None` when no fixture was accepted.
    #[must_use]
    pub fn finish(self) -> Option<GeneratedFile> {
        self.file.map(|file| GeneratedFile {
            tests: file.test_count(),
            path: file.path,
            protocol: self.protocol,
            contents: file.writer.into_string(),
        })
    }
}
