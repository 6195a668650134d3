//! Fixture params → Rust expressions that construct modeled values.
//!
//! Values are rendered by walking the target shape, so every literal gets the
//! type the client expects. Params that do not fit the shape are generation
//! defects naming the fixture and the param path.

use std::collections::BTreeSet;

use prototest_core::{Member, Model, Shape, ShapeId, ShapeKind, SimpleType, model::PRELUDE_NAMESPACE};
use serde_json::{Map, Value};

use crate::GenerateError;
use crate::symbols::SymbolProvider;
use crate::writer::rust_string;

pub(crate) struct ValueRenderer<'a> {
    model: &'a Model,
    symbols: &'a dyn SymbolProvider,
    fixture: &'a str,
}

impl<'a> ValueRenderer<'a> {
    pub(crate) fn new(model: &'a Model, symbols: &'a dyn SymbolProvider, fixture: &'a str) -> Self {
        Self {
            model,
            symbols,
            fixture,
        }
    }

    fn invalid(&self, path: &str, message: impl Into<String>) -> GenerateError {
        GenerateError::InvalidParam {
            fixture: self.fixture.to_string(),
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Builder setter calls (`.name(value)`) for the params present, in member order.
    ///
    /// Unknown param names are rejected; `null` params are treated as absent.
    pub(crate) fn setters(
        &self,
        shape: &Shape,
        params: &Map<String, Value>,
        path: &str,
    ) -> Result<Vec<String>, GenerateError> {
        if let Some(unknown) = params.keys().find(|k| shape.member(k).is_none()) {
            return Err(GenerateError::UnknownMember {
                fixture: self.fixture.to_string(),
                path: format!("{path}.{unknown}"),
                shape: shape.id.to_string(),
            });
        }
        let mut setters = Vec::new();
        for member in shape.members() {
            let Some(value) = params.get(&member.name).filter(|v| !v.is_null()) else {
                continue;
            };
            let target = self.model.target_of(member)?;
            let expr = self.render(target, value, &format!("{path}.{}", member.name))?;
            setters.push(format!(".{}({expr})", self.symbols.member_name(member)));
        }
        Ok(setters)
    }

    /// Expression constructing `value` as an instance of `shape`.
    pub(crate) fn render(
        &self,
        shape: &Shape,
        value: &Value,
        path: &str,
    ) -> Result<String, GenerateError> {
        match &shape.kind {
            ShapeKind::Simple(simple) => self.simple(shape, *simple, value, path),
            ShapeKind::Enum { .. } => match value {
                Value::String(s) => Ok(format!(
                    "{}::from({})",
                    self.symbols.shape_type(shape),
                    rust_string(s)
                )),
                _ => Err(self.invalid(path, "must be a string enum value")),
            },
            ShapeKind::IntEnum { .. } => match value.as_i64() {
                Some(n) => Ok(format!("{}::from({n})", self.symbols.shape_type(shape))),
                None => Err(self.invalid(path, "must be an integer enum value")),
            },
            ShapeKind::List { member } => {
                let Value::Array(items) = value else {
                    return Err(self.invalid(path, "must be an array"));
                };
                if items.is_empty() {
                    return Ok("Vec::new()".to_string());
                }
                let target = self.model.target_of(member)?;
                let sparse = shape.is_sparse();
                let rendered = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.element(target, item, sparse, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("vec![{}]", rendered.join(", ")))
            }
            ShapeKind::Map { key, value: val } => {
                let Value::Object(entries) = value else {
                    return Err(self.invalid(path, "must be an object"));
                };
                if entries.is_empty() {
                    return Ok("::std::collections::HashMap::new()".to_string());
                }
                let key_shape = self.model.target_of(key)?;
                let value_shape = self.model.target_of(val)?;
                let sparse = shape.is_sparse();
                let mut pairs = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let entry_path = format!("{path}.{k}");
                    let key_expr = self.render(key_shape, &Value::String(k.clone()), &entry_path)?;
                    let value_expr = self.element(value_shape, v, sparse, &entry_path)?;
                    pairs.push(format!("({key_expr}, {value_expr})"));
                }
                Ok(format!(
                    "::std::collections::HashMap::from([{}])",
                    pairs.join(", ")
                ))
            }
            ShapeKind::Structure { .. } => {
                let Value::Object(params) = value else {
                    return Err(self.invalid(path, "must be an object"));
                };
                let setters = self.setters(shape, params, path)?;
                Ok(format!(
                    "{}::builder(){}.build()?",
                    self.symbols.shape_type(shape),
                    setters.concat()
                ))
            }
            ShapeKind::Union { .. } => self.union(shape, value, path),
            ShapeKind::Operation(_) | ShapeKind::Resource(_) | ShapeKind::Service(_) => Err(
                self.invalid(path, format!("targets {}, which is not a data shape", shape.id)),
            ),
        }
    }

    /// List or map element; `null` only in sparse collections.
    fn element(
        &self,
        shape: &Shape,
        value: &Value,
        sparse: bool,
        path: &str,
    ) -> Result<String, GenerateError> {
        match (sparse, value) {
            (true, Value::Null) => Ok("None".to_string()),
            (true, v) => Ok(format!("Some({})", self.render(shape, v, path)?)),
            (false, Value::Null) => Err(self.invalid(path, "is null in a non-sparse collection")),
            (false, v) => self.render(shape, v, path),
        }
    }

    fn union(&self, shape: &Shape, value: &Value, path: &str) -> Result<String, GenerateError> {
        let set: Vec<(&String, &Value)> = match value {
            Value::Object(map) => map.iter().filter(|(_, v)| !v.is_null()).collect(),
            _ => return Err(self.invalid(path, "must be an object")),
        };
        let [(name, inner)] = set.as_slice() else {
            return Err(self.invalid(path, "must set exactly one union member"));
        };
        let member_path = format!("{path}.{name}");
        let member = shape
            .member(name)
            .ok_or_else(|| GenerateError::UnknownMember {
                fixture: self.fixture.to_string(),
                path: member_path.clone(),
                shape: shape.id.to_string(),
            })?;
        let variant = format!(
            "{}::{}",
            self.symbols.shape_type(shape),
            self.symbols.union_variant(member)
        );
        if member.target.as_str() == format!("{PRELUDE_NAMESPACE}#Unit") {
            return Ok(variant);
        }
        let target = self.model.target_of(member)?;
        Ok(format!("{variant}({})", self.render(target, inner, &member_path)?))
    }

    fn simple(
        &self,
        shape: &Shape,
        simple: SimpleType,
        value: &Value,
        path: &str,
    ) -> Result<String, GenerateError> {
        match simple {
            SimpleType::String => match value {
                Value::String(s) if shape.has_enum_trait() => Ok(format!(
                    "{}::from({})",
                    self.symbols.shape_type(shape),
                    rust_string(s)
                )),
                Value::String(s) => Ok(format!("{}.to_owned()", rust_string(s))),
                _ => Err(self.invalid(path, "must be a string")),
            },
            SimpleType::Boolean => match value {
                Value::Bool(b) => Ok(b.to_string()),
                _ => Err(self.invalid(path, "must be a boolean")),
            },
            SimpleType::Byte | SimpleType::Short | SimpleType::Integer | SimpleType::Long => {
                let (min, max) = match simple {
                    SimpleType::Byte => (i64::from(i8::MIN), i64::from(i8::MAX)),
                    SimpleType::Short => (i64::from(i16::MIN), i64::from(i16::MAX)),
                    SimpleType::Integer => (i64::from(i32::MIN), i64::from(i32::MAX)),
                    _ => (i64::MIN, i64::MAX),
                };
                match value.as_i64() {
                    Some(n) if (min..=max).contains(&n) => Ok(n.to_string()),
                    Some(n) => Err(self.invalid(path, format!("{n} is out of range"))),
                    None => Err(self.invalid(path, "must be an integer")),
                }
            }
            SimpleType::Float | SimpleType::Double => {
                let ty = if simple == SimpleType::Float { "f32" } else { "f64" };
                match value {
                    Value::Number(n) => {
                        let x = n.as_f64().unwrap_or_default();
                        Ok(format!("{x:?}_{ty}"))
                    }
                    Value::String(s) => match s.as_str() {
                        "NaN" => Ok(format!("{ty}::NAN")),
                        "Infinity" => Ok(format!("{ty}::INFINITY")),
                        "-Infinity" => Ok(format!("{ty}::NEG_INFINITY")),
                        other => Err(self.invalid(path, format!("`{other}` is not a number"))),
                    },
                    _ => Err(self.invalid(path, "must be a number")),
                }
            }
            SimpleType::BigInteger | SimpleType::BigDecimal => match value {
                Value::Number(n) => Ok(format!("{}.parse()?", rust_string(&n.to_string()))),
                Value::String(s) => Ok(format!("{}.parse()?", rust_string(s))),
                _ => Err(self.invalid(path, "must be a number")),
            },
            SimpleType::Blob => match value {
                Value::String(s) => Ok(format!(
                    "{}::new({})",
                    self.symbols.primitive("Blob"),
                    rust_string(s)
                )),
                _ => Err(self.invalid(path, "must be a string")),
            },
            SimpleType::Timestamp => {
                let date_time = self.symbols.primitive("DateTime");
                match value {
                    Value::Number(n) => match n.as_i64() {
                        Some(secs) => Ok(format!("{date_time}::from_secs({secs})")),
                        None => {
                            let secs = n.as_f64().unwrap_or_default();
                            Ok(format!("{date_time}::from_secs_f64({secs:?})"))
                        }
                    },
                    _ => Err(self.invalid(path, "must be epoch seconds")),
                }
            }
            SimpleType::Document => Ok(format!(
                "{}::from_json({})?",
                self.symbols.primitive("Document"),
                rust_string(&value.to_string())
            )),
        }
    }
}

/// Whether a member of this shape is compared with `float_member`: the shape
/// holds a float anywhere below it, through list elements, map values and
/// aggregate members.
pub(crate) fn is_float_like(model: &Model, shape: &Shape) -> bool {
    holds_float(model, shape, &mut BTreeSet::new())
}

fn holds_float<'m>(model: &'m Model, shape: &'m Shape, seen: &mut BTreeSet<&'m ShapeId>) -> bool {
    if !seen.insert(&shape.id) {
        return false;
    }
    let mut targets = |member: &'m Member| {
        model
            .target_of(member)
            .is_ok_and(|target| holds_float(model, target, seen))
    };
    match &shape.kind {
        ShapeKind::Simple(simple) => simple.is_floating(),
        ShapeKind::List { member } => targets(member),
        ShapeKind::Map { value, .. } => targets(value),
        ShapeKind::Structure { members } | ShapeKind::Union { members } => {
            members.iter().any(targets)
        }
        _ => false,
    }
}
