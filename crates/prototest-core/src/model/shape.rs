//! Shape definitions

use super::{ShapeId, Traits, traits};

/// A named type definition in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Simple(SimpleType),
    /// `list` and `set`
    List {
        member: Member,
    },
    Map {
        key: Member,
        value: Member,
    },
    Structure {
        members: Vec<Member>,
    },
    Union {
        members: Vec<Member>,
    },
    Enum {
        members: Vec<Member>,
    },
    IntEnum {
        members: Vec<Member>,
    },
    Operation(OperationShape),
    Resource(ResourceShape),
    Service(ServiceShape),
}

/// Scalar shape types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    Blob,
    Boolean,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
    Document,
}

impl SimpleType {
    /// Map a JSON AST `type` value to a simple type.
    #[must_use]
    pub fn from_ast_name(name: &str) -> Option<Self> {
        Some(match name {
            "blob" => Self::Blob,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "bigInteger" => Self::BigInteger,
            "bigDecimal" => Self::BigDecimal,
            "timestamp" => Self::Timestamp,
            "document" => Self::Document,
            _ => return None,
        })
    }

    /// Integer-valued types (`byte` through `long`).
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Integer | Self::Long)
    }

    /// `float` and `double`.
    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

/// A structure, union, collection, or enum member.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub target: ShapeId,
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationShape {
    pub input: Option<ShapeId>,
    pub output: Option<ShapeId>,
    pub errors: Vec<ShapeId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceShape {
    pub create: Option<ShapeId>,
    pub put: Option<ShapeId>,
    pub read: Option<ShapeId>,
    pub update: Option<ShapeId>,
    pub delete: Option<ShapeId>,
    pub list: Option<ShapeId>,
    pub operations: Vec<ShapeId>,
    pub collection_operations: Vec<ShapeId>,
    pub resources: Vec<ShapeId>,
}

impl ResourceShape {
    /// Every operation bound directly to this resource, lifecycle first.
    pub fn bound_operations(&self) -> impl Iterator<Item = &ShapeId> {
        [
            &self.create,
            &self.put,
            &self.read,
            &self.update,
            &self.delete,
            &self.list,
        ]
        .into_iter()
        .flatten()
        .chain(&self.operations)
        .chain(&self.collection_operations)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceShape {
    pub version: Option<String>,
    pub operations: Vec<ShapeId>,
    pub resources: Vec<ShapeId>,
    pub errors: Vec<ShapeId>,
}

impl Shape {
    #[must_use]
    pub fn simple(id: impl Into<String>, simple: SimpleType) -> Self {
        Self {
            id: ShapeId::new(id),
            kind: ShapeKind::Simple(simple),
            traits: Traits::new(),
        }
    }

    #[must_use]
    pub fn as_operation(&self) -> Option<&OperationShape> {
        match &self.kind {
            ShapeKind::Operation(op) => Some(op),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_service(&self) -> Option<&ServiceShape> {
        match &self.kind {
            ShapeKind::Service(service) => Some(service),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_resource(&self) -> Option<&ResourceShape> {
        match &self.kind {
            ShapeKind::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Members of a structure or union, empty otherwise.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            ShapeKind::Structure { members } | ShapeKind::Union { members } => members,
            _ => &[],
        }
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members().iter().find(|m| m.name == name)
    }

    /// `sparse` lists and maps allow `null` entries.
    #[must_use]
    pub fn is_sparse(&self) -> bool {
        self.traits.contains_key(traits::SPARSE)
    }

    /// Smithy 1.0 string enums carry the `enum` trait instead of being `enum` shapes.
    #[must_use]
    pub fn has_enum_trait(&self) -> bool {
        self.traits.contains_key(traits::ENUM)
    }
}

/// Prelude shapes resolvable without being declared in the model.
pub(super) fn prelude() -> Vec<Shape> {
    let simple = [
        ("Blob", SimpleType::Blob),
        ("Boolean", SimpleType::Boolean),
        ("PrimitiveBoolean", SimpleType::Boolean),
        ("String", SimpleType::String),
        ("Byte", SimpleType::Byte),
        ("PrimitiveByte", SimpleType::Byte),
        ("Short", SimpleType::Short),
        ("PrimitiveShort", SimpleType::Short),
        ("Integer", SimpleType::Integer),
        ("PrimitiveInteger", SimpleType::Integer),
        ("Long", SimpleType::Long),
        ("PrimitiveLong", SimpleType::Long),
        ("Float", SimpleType::Float),
        ("PrimitiveFloat", SimpleType::Float),
        ("Double", SimpleType::Double),
        ("PrimitiveDouble", SimpleType::Double),
        ("BigInteger", SimpleType::BigInteger),
        ("BigDecimal", SimpleType::BigDecimal),
        ("Timestamp", SimpleType::Timestamp),
        ("Document", SimpleType::Document),
    ];

    let mut shapes: Vec<Shape> = simple
        .into_iter()
        .map(|(name, ty)| Shape::simple(format!("{}#{name}", super::PRELUDE_NAMESPACE), ty))
        .collect();
    shapes.push(Shape {
        id: ShapeId::new(format!("{}#Unit", super::PRELUDE_NAMESPACE)),
        kind: ShapeKind::Structure {
            members: Vec::new(),
        },
        traits: Traits::new(),
    });
    shapes
}
