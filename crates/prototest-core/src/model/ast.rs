//! Raw Smithy JSON AST: deserialized as-is, then lowered into [`Shape`]s.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::shape::{
    Member, OperationShape, ResourceShape, ServiceShape, Shape, ShapeKind, SimpleType,
};
use super::{ModelError, ShapeId, Traits};

#[derive(Debug, Deserialize)]
pub(super) struct AstModel {
    pub(super) smithy: String,
    #[serde(default)]
    pub(super) shapes: BTreeMap<String, AstShape>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AstShape {
    #[serde(rename = "type")]
    shape_type: String,
    #[serde(default)]
    traits: Traits,
    #[serde(default)]
    members: BTreeMap<String, AstMember>,
    #[serde(default)]
    member: Option<AstMember>,
    #[serde(default)]
    key: Option<AstMember>,
    #[serde(default)]
    value: Option<AstMember>,
    #[serde(default)]
    input: Option<AstTarget>,
    #[serde(default)]
    output: Option<AstTarget>,
    #[serde(default)]
    errors: Vec<AstTarget>,
    #[serde(default)]
    operations: Vec<AstTarget>,
    #[serde(default)]
    collection_operations: Vec<AstTarget>,
    #[serde(default)]
    resources: Vec<AstTarget>,
    #[serde(default)]
    create: Option<AstTarget>,
    #[serde(default)]
    put: Option<AstTarget>,
    #[serde(default)]
    read: Option<AstTarget>,
    #[serde(default)]
    update: Option<AstTarget>,
    #[serde(default)]
    delete: Option<AstTarget>,
    #[serde(default)]
    list: Option<AstTarget>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AstMember {
    target: String,
    #[serde(default)]
    traits: Traits,
}

#[derive(Debug, Deserialize)]
struct AstTarget {
    target: String,
}

fn target(t: Option<AstTarget>) -> Option<ShapeId> {
    t.map(|t| ShapeId::new(t.target))
}

fn targets(ts: Vec<AstTarget>) -> Vec<ShapeId> {
    ts.into_iter().map(|t| ShapeId::new(t.target)).collect()
}

fn lower_member(name: &str, member: AstMember) -> Member {
    Member {
        name: name.to_string(),
        target: ShapeId::new(member.target),
        traits: member.traits,
    }
}

fn lower_members(members: BTreeMap<String, AstMember>) -> Vec<Member> {
    members
        .into_iter()
        .map(|(name, m)| lower_member(&name, m))
        .collect()
}

fn required_member(
    id: &str,
    field: &'static str,
    member: Option<AstMember>,
) -> Result<Member, ModelError> {
    member
        .map(|m| lower_member(field, m))
        .ok_or_else(|| ModelError::InvalidShape {
            shape: id.to_string(),
            message: format!("missing `{field}` member"),
        })
}

impl AstShape {
    /// Lower one AST entry into a [`Shape`].
    pub(super) fn lower(self, id: &str) -> Result<Shape, ModelError> {
        let kind = match self.shape_type.as_str() {
            "structure" => ShapeKind::Structure {
                members: lower_members(self.members),
            },
            "union" => ShapeKind::Union {
                members: lower_members(self.members),
            },
            "enum" => ShapeKind::Enum {
                members: lower_members(self.members),
            },
            "intEnum" => ShapeKind::IntEnum {
                members: lower_members(self.members),
            },
            "list" | "set" => ShapeKind::List {
                member: required_member(id, "member", self.member)?,
            },
            "map" => ShapeKind::Map {
                key: required_member(id, "key", self.key)?,
                value: required_member(id, "value", self.value)?,
            },
            "operation" => ShapeKind::Operation(OperationShape {
                input: target(self.input),
                output: target(self.output),
                errors: targets(self.errors),
            }),
            "resource" => ShapeKind::Resource(ResourceShape {
                create: target(self.create),
                put: target(self.put),
                read: target(self.read),
                update: target(self.update),
                delete: target(self.delete),
                list: target(self.list),
                operations: targets(self.operations),
                collection_operations: targets(self.collection_operations),
                resources: targets(self.resources),
            }),
            "service" => ShapeKind::Service(ServiceShape {
                version: self.version,
                operations: targets(self.operations),
                resources: targets(self.resources),
                errors: targets(self.errors),
            }),
            other => match SimpleType::from_ast_name(other) {
                Some(simple) => ShapeKind::Simple(simple),
                None => {
                    return Err(ModelError::InvalidShape {
                        shape: id.to_string(),
                        message: format!("unsupported shape type `{other}`"),
                    });
                }
            },
        };

        Ok(Shape {
            id: ShapeId::new(id),
            kind,
            traits: self.traits,
        })
    }
}
