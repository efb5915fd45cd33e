//! Feature, attribute and schema types shared by sources, sinks and the join.
//!
//! Attribute rows are positional. Names are resolved once against a [`Schema`]
//! into a [`FieldIndex`], and all per-feature access goes through that index.

use geo::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a feature within its collection.
pub type FeatureId = u64;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Declared type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    Integer,
    Real,
    Text,
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Position of a column inside a [`Schema`], resolved once by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldIndex(usize);

impl FieldIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: FieldIndex) -> Option<&Field> {
        self.fields.get(index.get())
    }

    /// Resolves a field name to its position.
    ///
    /// An exact match wins; otherwise the first ASCII case-insensitive match is
    /// returned, so `numpoints` finds a `NUMPOINTS` column.
    pub fn lookup_field(&self, name: &str) -> Option<FieldIndex> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|f| f.name.eq_ignore_ascii_case(name))
            })
            .map(FieldIndex)
    }

    /// Returns a copy of this schema with `field` appended as the last column.
    pub fn with_appended(&self, field: Field) -> Self {
        let mut fields = self.fields.clone();
        fields.push(field);
        Self { fields }
    }
}

/// Geometry type declared by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    MultiPoint,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    pub fn is_point_like(self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::MultiPoint)
    }

    pub fn is_polygonal(self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

/// Spatial reference identifier, e.g. `EPSG:4326`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(String);

impl Crs {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a sink needs to know before the first feature arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub geometry_kind: GeometryKind,
    pub crs: Option<Crs>,
    pub schema: Schema,
}

/// A feature: identifier, geometry and a positional attribute row.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry<f64>,
    pub attributes: Vec<Value>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: impl Into<Geometry<f64>>, attributes: Vec<Value>) -> Self {
        Self {
            id,
            geometry: geometry.into(),
            attributes,
        }
    }

    #[inline]
    pub fn attribute(&self, index: FieldIndex) -> Option<&Value> {
        self.attributes.get(index.get())
    }
}
