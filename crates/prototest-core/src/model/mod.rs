//! Smithy model: shapes, traits, and the indexes the generator reads.
//!
//! Loaded from the Smithy 2.0 JSON AST (or the same document written as YAML).
//! Shapes live in a `BTreeMap` keyed by shape id, so every walk over the model
//! is deterministic.

mod ast;
mod shape;
pub mod traits;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use shape::{
    Member, OperationShape, ResourceShape, ServiceShape, Shape, ShapeKind, SimpleType,
};

/// Namespace of the Smithy prelude.
pub const PRELUDE_NAMESPACE: &str = "smithy.api";

/// Raw trait values keyed by absolute trait id.
pub type Traits = BTreeMap<String, serde_json::Value>;

/// Absolute shape id, e.g. `example.weather#GetForecast`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace before `#`, empty for relative ids.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.split_once('#').map_or("", |(ns, _)| ns)
    }

    /// Shape name after `#`, without any `$member` suffix.
    #[must_use]
    pub fn name(&self) -> &str {
        let name = self.0.split_once('#').map_or(self.0.as_str(), |(_, n)| n);
        name.split_once('$').map_or(name, |(n, _)| n)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An indexed Smithy model.
#[derive(Debug, Clone)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    /// Build a model from shapes; prelude shapes are added unless overridden.
    #[must_use]
    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut map: BTreeMap<ShapeId, Shape> = shape::prelude()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        for s in shapes {
            map.insert(s.id.clone(), s);
        }
        Self { shapes: map }
    }

    /// Parse a Smithy JSON AST document.
    ///
    /// # Errors
    ///
    /// Returns error on malformed JSON, an unsupported `smithy` version, or an
    /// unsupported shape type.
    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let ast: ast::AstModel = serde_json::from_str(content)
            .map_err(|e| ModelError::Parse(format!("Invalid JSON: {e}")))?;
        Self::from_ast(ast)
    }

    /// Parse a Smithy AST document written as YAML.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Model::from_json_str`].
    pub fn from_yaml_str(content: &str) -> Result<Self, ModelError> {
        let ast: ast::AstModel = serde_yml::from_str(content)
            .map_err(|e| ModelError::Parse(format!("Invalid YAML: {e}")))?;
        Self::from_ast(ast)
    }

    /// Load a model file.
    ///
    /// Detection strategy: extension first (`.yaml`/`.yml`/`.json`), then
    /// content sniffing (leading `{` → JSON, otherwise YAML).
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Io(format!("{}: {e}", path.display())))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => {
                if content.trim_start().starts_with('{') {
                    Self::from_json_str(&content)
                } else {
                    Self::from_yaml_str(&content)
                }
            }
        }
    }

    fn from_ast(ast: ast::AstModel) -> Result<Self, ModelError> {
        if !matches!(ast.smithy.as_str(), "1.0" | "2.0" | "2") {
            return Err(ModelError::UnsupportedVersion(ast.smithy));
        }
        let shapes = ast
            .shapes
            .into_iter()
            .map(|(id, s)| s.lower(&id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_shapes(shapes))
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Look up a shape that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownShape`] if the id is not in the model.
    pub fn expect(&self, id: &ShapeId) -> Result<&Shape, ModelError> {
        self.get(id)
            .ok_or_else(|| ModelError::UnknownShape(id.to_string()))
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &Shape> {
        self.shapes().filter(|s| s.as_service().is_some())
    }

    /// Resolve the service to generate for.
    ///
    /// With an explicit id the shape must exist and be a service; without one
    /// the model must contain exactly one service.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Service`] when the service is missing or ambiguous.
    pub fn service(&self, id: Option<&str>) -> Result<&Shape, ModelError> {
        if let Some(id) = id {
            return match self.get(&ShapeId::from(id)) {
                Some(shape) if shape.as_service().is_some() => Ok(shape),
                Some(_) => Err(ModelError::Service(format!("`{id}` is not a service"))),
                None => Err(ModelError::Service(format!("`{id}` not found in model"))),
            };
        }

        let mut services = self.services();
        match (services.next(), services.next()) {
            (Some(service), None) => Ok(service),
            (None, _) => Err(ModelError::Service("model contains no service".into())),
            (Some(_), Some(_)) => {
                let ids: Vec<String> = self.services().map(|s| s.id.to_string()).collect();
                Err(ModelError::Service(format!(
                    "model contains several services, pick one of: {}",
                    ids.join(", ")
                )))
            }
        }
    }

    /// Operations reachable from a service, in stable traversal order.
    ///
    /// Service operations come first in declaration order, then resources
    /// depth-first. Each operation is visited once.
    ///
    /// # Errors
    ///
    /// Returns error if the shape is not a service or a bound shape is missing.
    pub fn contained_operations(&self, service: &ShapeId) -> Result<Vec<&Shape>, ModelError> {
        let svc = self
            .expect(service)?
            .as_service()
            .ok_or_else(|| ModelError::Service(format!("`{service}` is not a service")))?;

        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for op in &svc.operations {
            self.push_operation(op, &mut seen, &mut out)?;
        }
        let mut visited_resources = BTreeSet::new();
        for resource in &svc.resources {
            self.walk_resource(resource, &mut visited_resources, &mut seen, &mut out)?;
        }
        Ok(out)
    }

    fn walk_resource<'a>(
        &'a self,
        id: &ShapeId,
        visited: &mut BTreeSet<ShapeId>,
        seen: &mut BTreeSet<ShapeId>,
        out: &mut Vec<&'a Shape>,
    ) -> Result<(), ModelError> {
        if !visited.insert(id.clone()) {
            return Ok(());
        }
        let resource = self.expect(id)?.as_resource().ok_or_else(|| ModelError::InvalidShape {
            shape: id.to_string(),
            message: "bound as a resource but is not one".into(),
        })?;
        for op in resource.bound_operations() {
            self.push_operation(op, seen, out)?;
        }
        for child in &resource.resources {
            self.walk_resource(child, visited, seen, out)?;
        }
        Ok(())
    }

    fn push_operation<'a>(
        &'a self,
        id: &ShapeId,
        seen: &mut BTreeSet<ShapeId>,
        out: &mut Vec<&'a Shape>,
    ) -> Result<(), ModelError> {
        if !seen.insert(id.clone()) {
            return Ok(());
        }
        let shape = self.expect(id)?;
        if shape.as_operation().is_none() {
            return Err(ModelError::InvalidShape {
                shape: id.to_string(),
                message: "bound as an operation but is not one".into(),
            });
        }
        out.push(shape);
        Ok(())
    }

    /// Error shapes declared on an operation, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns error if the shape is not an operation or an error is missing.
    pub fn errors_of(&self, operation: &Shape) -> Result<Vec<&Shape>, ModelError> {
        let op = operation.as_operation().ok_or_else(|| ModelError::InvalidShape {
            shape: operation.id.to_string(),
            message: "not an operation".into(),
        })?;
        op.errors.iter().map(|e| self.expect(e)).collect()
    }

    /// Follow a member's target to its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownShape`] for dangling targets.
    pub fn target_of(&self, member: &Member) -> Result<&Shape, ModelError> {
        self.expect(&member.target)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported Smithy IDL version `{0}`")]
    UnsupportedVersion(String),
    #[error("Invalid shape {shape}: {message}")]
    InvalidShape { shape: String, message: String },
    #[error("Unknown shape `{0}`")]
    UnknownShape(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("Invalid trait `{trait_id}` on {shape}: {message}")]
    InvalidTrait {
        shape: String,
        trait_id: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str = r#"{
        "smithy": "2.0",
        "shapes": {
            "example.weather#Weather": {
                "type": "service",
                "version": "2006-03-01",
                "operations": [{"target": "example.weather#GetCurrentTime"}],
                "resources": [{"target": "example.weather#City"}]
            },
            "example.weather#City": {
                "type": "resource",
                "read": {"target": "example.weather#GetCity"},
                "list": {"target": "example.weather#ListCities"},
                "resources": [{"target": "example.weather#Forecast"}]
            },
            "example.weather#Forecast": {
                "type": "resource",
                "read": {"target": "example.weather#GetForecast"}
            },
            "example.weather#GetCurrentTime": {"type": "operation"},
            "example.weather#GetCity": {
                "type": "operation",
                "input": {"target": "example.weather#GetCityInput"},
                "errors": [{"target": "example.weather#NoSuchResource"}]
            },
            "example.weather#ListCities": {"type": "operation"},
            "example.weather#GetForecast": {"type": "operation"},
            "example.weather#GetCityInput": {
                "type": "structure",
                "members": {
                    "cityId": {
                        "target": "smithy.api#String",
                        "traits": {"smithy.api#required": {}}
                    }
                }
            },
            "example.weather#NoSuchResource": {
                "type": "structure",
                "members": {"resourceType": {"target": "smithy.api#String"}},
                "traits": {"smithy.api#error": "client"}
            }
        }
    }"#;

    #[test]
    fn shape_id_parts() {
        let id = ShapeId::from("example.weather#GetCity$cityId");
        assert_eq!(id.namespace(), "example.weather");
        assert_eq!(id.name(), "GetCity");
        assert_eq!(ShapeId::from("Relative").name(), "Relative");
    }

    #[test]
    fn parses_json_ast() {
        let model = Model::from_json_str(WEATHER).unwrap();
        let input = model.expect(&"example.weather#GetCityInput".into()).unwrap();
        let member = input.member("cityId").unwrap();
        assert!(member.traits.contains_key("smithy.api#required"));
        assert_eq!(member.target.as_str(), "smithy.api#String");
        assert!(matches!(
            model.target_of(member).unwrap().kind,
            ShapeKind::Simple(SimpleType::String)
        ));
    }

    #[test]
    fn contained_operations_service_first_then_resources() {
        let model = Model::from_json_str(WEATHER).unwrap();
        let ops: Vec<&str> = model
            .contained_operations(&"example.weather#Weather".into())
            .unwrap()
            .into_iter()
            .map(|s| s.id.name())
            .collect();
        assert_eq!(
            ops,
            vec!["GetCurrentTime", "GetCity", "ListCities", "GetForecast"]
        );
    }

    #[test]
    fn errors_of_operation() {
        let model = Model::from_json_str(WEATHER).unwrap();
        let op = model.expect(&"example.weather#GetCity".into()).unwrap();
        let errors = model.errors_of(op).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id.name(), "NoSuchResource");
    }

    #[test]
    fn single_service_is_implicit() {
        let model = Model::from_json_str(WEATHER).unwrap();
        assert_eq!(model.service(None).unwrap().id.name(), "Weather");
        assert!(model.service(Some("example.weather#GetCity")).is_err());
        assert!(model.service(Some("example.weather#Missing")).is_err());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = Model::from_json_str(r#"{"smithy": "3.0", "shapes": {}}"#).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedVersion(v) if v == "3.0"));
    }

    #[test]
    fn rejects_unknown_shape_type() {
        let err = Model::from_json_str(
            r#"{"smithy": "2.0", "shapes": {"a#B": {"type": "widget"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidShape { .. }));
    }

    #[test]
    fn parses_yaml_ast() {
        let yaml = r#"
smithy: "2.0"
shapes:
  example#Tags:
    type: list
    member:
      target: smithy.api#String
    traits:
      smithy.api#sparse: {}
"#;
        let model = Model::from_yaml_str(yaml).unwrap();
        let tags = model.expect(&"example#Tags".into()).unwrap();
        assert!(tags.is_sparse());
        assert!(matches!(tags.kind, ShapeKind::List { .. }));
    }

    #[test]
    fn load_sniffs_content_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        std::fs::write(&path, WEATHER).unwrap();
        let model = Model::load(&path).unwrap();
        assert_eq!(model.services().count(), 1);
    }

    #[test]
    fn prelude_shapes_resolve() {
        let model = Model::from_shapes([]);
        assert!(model.get(&"smithy.api#Timestamp".into()).is_some());
        assert!(model.get(&"smithy.api#Unit".into()).is_some());
    }

    proptest::proptest! {
        #[test]
        fn shape_id_splits_absolute_ids(
            ns in "[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9]{0,8}){0,2}",
            name in "[A-Z][A-Za-z0-9]{0,12}",
            member in proptest::option::of("[a-z][A-Za-z0-9]{0,8}"),
        ) {
            let raw = match &member {
                Some(m) => format!("{ns}#{name}${m}"),
                None => format!("{ns}#{name}"),
            };
            let id = ShapeId::new(raw.clone());
            proptest::prop_assert_eq!(id.namespace(), ns.as_str());
            proptest::prop_assert_eq!(id.name(), name.as_str());
            proptest::prop_assert_eq!(id.to_string(), raw);
        }
    }
}
