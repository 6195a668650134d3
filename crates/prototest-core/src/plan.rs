//! Generation plan types and config validation
//!
//! Describes which tests a run *would* generate without writing anything.
//! Used for `--dry-run` previews and CI checks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Config;
use crate::config::PROTOCOL_PLACEHOLDER;

// ── Plan types ──

/// Complete plan: per-protocol test lists plus config validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GenerationPlan {
    /// Service shape id
    pub service: String,
    /// One entry per requested protocol
    pub protocols: Vec<ProtocolPlan>,
    /// Config/model validation results
    pub validations: Vec<Validation>,
}

/// Tests planned for one protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProtocolPlan {
    pub protocol: String,
    /// Output file, or `None` when no fixture matches
    pub file: Option<String>,
    /// Operations contributing at least one test
    pub operations: Vec<OperationPlan>,
    /// Fixtures for this protocol left out (server-only or skip list)
    pub skipped: Vec<String>,
}

/// Tests planned for one operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OperationPlan {
    /// Operation shape id
    pub operation: String,
    pub request_tests: Vec<String>,
    pub response_tests: Vec<String>,
    pub error_tests: Vec<ErrorTestPlan>,
}

/// A planned error response test.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorTestPlan {
    /// Error shape id
    pub error: String,
    pub id: String,
}

/// A validation check result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub check: String,
    pub status: ValidationStatus,
    pub message: String,
}

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl OperationPlan {
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.request_tests.len() + self.response_tests.len() + self.error_tests.len()
    }
}

impl ProtocolPlan {
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.operations.iter().map(OperationPlan::test_count).sum()
    }
}

// ── Config validation ──

fn is_rust_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate config and produce validation results.
#[must_use]
pub fn validate_config(config: &Config) -> Vec<Validation> {
    let mut checks = Vec::new();

    // Model file exists
    if config.model.exists() {
        checks.push(Validation {
            check: "model".into(),
            status: ValidationStatus::Ok,
            message: format!("model: {} (exists)", config.model.display()),
        });
    } else {
        checks.push(Validation {
            check: "model".into(),
            status: ValidationStatus::Error,
            message: format!("model: {} (not found)", config.model.display()),
        });
    }

    // Protocols
    if config.protocols.is_empty() {
        checks.push(Validation {
            check: "protocols".into(),
            status: ValidationStatus::Error,
            message: "protocols: none configured".into(),
        });
    } else {
        checks.push(Validation {
            check: "protocols".into(),
            status: ValidationStatus::Ok,
            message: format!("protocols: {}", config.protocols.join(", ")),
        });
    }

    // Crate name must be usable as a path root in generated code
    let crate_ident = config.crate_name.replace('-', "_");
    if is_rust_identifier(&crate_ident) {
        checks.push(Validation {
            check: "crate_name".into(),
            status: ValidationStatus::Ok,
            message: format!("crate_name: {}", config.crate_name),
        });
    } else {
        checks.push(Validation {
            check: "crate_name".into(),
            status: ValidationStatus::Error,
            message: format!("crate_name: `{}` is not a valid crate name", config.crate_name),
        });
    }

    // Without the placeholder every protocol writes the same file
    if !config.file_template.contains(PROTOCOL_PLACEHOLDER) {
        checks.push(Validation {
            check: "file_template".into(),
            status: if config.protocols.len() > 1 {
                ValidationStatus::Error
            } else {
                ValidationStatus::Warning
            },
            message: format!(
                "file_template: `{}` has no {PROTOCOL_PLACEHOLDER} placeholder",
                config.file_template
            ),
        });
    }

    if !config.skip.is_empty() {
        checks.push(Validation {
            check: "skip".into(),
            status: ValidationStatus::Ok,
            message: format!("skip: {} fixture ids", config.skip.len()),
        });
    }

    checks
}

// ── Display helpers ──

impl GenerationPlan {
    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        let total: usize = self.protocols.iter().map(ProtocolPlan::test_count).sum();
        lines.push(format!(
            "Dry run: {} for {} protocols, {} tests planned\n",
            self.service,
            self.protocols.len(),
            total,
        ));

        for proto in &self.protocols {
            match &proto.file {
                Some(file) => lines.push(format!(
                    "{} -> {} ({} tests):",
                    proto.protocol,
                    file,
                    proto.test_count()
                )),
                None => lines.push(format!("{} -> no matching fixtures", proto.protocol)),
            }

            for op in &proto.operations {
                lines.push(format!("  {}:", op.operation));
                if !op.request_tests.is_empty() {
                    lines.push(format!("    Requests: {}", op.request_tests.join(", ")));
                }
                if !op.response_tests.is_empty() {
                    lines.push(format!("    Responses: {}", op.response_tests.join(", ")));
                }
                for err in &op.error_tests {
                    lines.push(format!("    Error [{}]: {}", err.error, err.id));
                }
            }
            if !proto.skipped.is_empty() {
                lines.push(format!("  Skipped: {}", proto.skipped.join(", ")));
            }
            lines.push(String::new());
        }

        // Validations
        lines.push("Config validation:".into());
        for v in &self.validations {
            lines.push(format!("  [{}] {}", v.status, v.message));
        }

        lines.join("\n")
    }

    /// Returns true if any validation has Error status.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Error)
    }

    /// Returns true if any validation has Warning status.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Warning)
    }
}
