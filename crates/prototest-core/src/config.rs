//! Project configuration for protocol test generation

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder in [`Config::file_template`] replaced by the normalized protocol id.
pub const PROTOCOL_PLACEHOLDER: &str = "{protocol}";

/// Project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Smithy model (JSON AST, or the same structure as YAML)
    pub model: PathBuf,

    /// Service shape id; optional when the model contains a single service
    pub service: Option<String>,

    /// Protocols to generate tests for, one output file each
    pub protocols: Vec<String>,

    /// Crate name of the generated client the tests exercise
    pub crate_name: String,

    /// Root directory generated files are written under
    pub output_dir: PathBuf,

    /// Output path relative to `output_dir`; `{protocol}` is replaced
    pub file_template: String,

    /// How query parameters and headers the fixture does not mention are treated
    pub unspecified_keys: KeyPolicy,

    /// Fixture ids never rendered
    pub skip: Vec<String>,
}

/// Rule for query keys and header names a fixture neither requires nor forbids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Unmentioned keys may appear freely
    #[default]
    Ignore,
    /// Only keys named by the fixture may appear
    Forbid,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: PathBuf::from("model.json"),
            service: None,
            protocols: Vec::new(),
            crate_name: "client".to_string(),
            output_dir: PathBuf::from("."),
            file_template: format!("tests/{PROTOCOL_PLACEHOLDER}.rs"),
            unspecified_keys: KeyPolicy::Ignore,
            skip: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (prototest.toml)
    ///
    /// # Errors
    ///
    /// Returns error if a candidate file exists but cannot be parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = ["prototest.toml", ".prototest.toml", "prototest.json"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    /// Whether a fixture id is on the skip list.
    #[must_use]
    pub fn skips(&self, fixture_id: &str) -> bool {
        self.skip.iter().any(|s| s == fixture_id)
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# prototest configuration

# Smithy model (JSON AST; YAML with the same structure also works)
model = "model.json"

# Service to generate for (optional when the model has exactly one service)
# service = "example.weather#Weather"

# One test file is generated per protocol that has matching fixtures
protocols = ["aws.protocols#restJson1"]

# Crate name of the generated client under test
crate_name = "weather_client"

# Where generated files go; {protocol} becomes e.g. aws_protocols_restjson1
output_dir = "."
file_template = "tests/{protocol}.rs"

# Query params / headers not mentioned by a fixture: "ignore" or "forbid"
unspecified_keys = "ignore"

# Fixture ids to leave out
# skip = ["RestJsonHttpChecksumRequired"]
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
