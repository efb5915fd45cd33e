//! Output schema resolution.
//!
//! The output column is resolved once per run: an existing column with the
//! requested name is overwritten in place, otherwise one column is appended.
//! The value encoding is fixed against the column's declared type at the same
//! time, so every output row matches the schema declared to the sink.

use crate::compute::weight::Accumulator;
use crate::config::AggregateMode;
use crate::error::{PolysumError, Result};
use crate::types::{Field, FieldIndex, FieldType, LayerDescriptor, Schema, Value};

/// Where the aggregate goes in each output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSlot {
    /// Reuse the existing column at this index.
    Overwrite(FieldIndex),
    /// New last column; the index equals the input schema length.
    Append(FieldIndex),
}

/// Resolved output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    name: String,
    slot: OutputSlot,
    input_width: usize,
    field_type: FieldType,
    mode: AggregateMode,
}

impl OutputField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> OutputSlot {
        self.slot
    }

    pub fn index(&self) -> FieldIndex {
        match self.slot {
            OutputSlot::Overwrite(index) | OutputSlot::Append(index) => index,
        }
    }

    pub fn is_appended(&self) -> bool {
        matches!(self.slot, OutputSlot::Append(_))
    }

    /// Declared type of the output column.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Aggregate mode actually applied, after adapting to an existing column.
    pub fn mode(&self) -> AggregateMode {
        self.mode
    }

    /// Render a polygon's sum as a value of the column's declared type.
    pub fn encode(&self, acc: &Accumulator) -> Value {
        match acc.finish(self.mode) {
            Value::Null => Value::Null,
            value if self.field_type == FieldType::Text => Value::Text(value.to_string()),
            value => value,
        }
    }

    /// Write `value` into an input attribute row, producing the output row.
    pub fn apply(&self, mut attributes: Vec<Value>, value: Value) -> Result<Vec<Value>> {
        if attributes.len() != self.input_width {
            return Err(PolysumError::InvalidInput(format!(
                "Polygon row has {} attributes, schema has {}",
                attributes.len(),
                self.input_width
            )));
        }

        match self.slot {
            OutputSlot::Overwrite(index) => attributes[index.get()] = value,
            OutputSlot::Append(_) => attributes.push(value),
        }
        Ok(attributes)
    }
}

/// Decide between overwriting an existing column and appending a new one.
///
/// An appended column gets the type of `mode`. An existing column keeps its
/// type and the mode is adapted to it:
///
/// - `Integer`: `Truncate` and `Round` as requested, `Float` falls back to `Truncate`.
/// - `Real`: always the exact sum.
/// - `Text`: the value `mode` produces, formatted as text.
/// - `Bool`: rejected with [`PolysumError::InvalidConfig`].
pub fn resolve_output_field(
    schema: &Schema,
    name: &str,
    mode: AggregateMode,
) -> Result<OutputField> {
    let (slot, field_type, mode) = match schema.lookup_field(name) {
        None => (
            OutputSlot::Append(FieldIndex::new(schema.len())),
            mode.field_type(),
            mode,
        ),
        Some(index) => {
            let field_type = schema
                .field(index)
                .map(|f| f.field_type)
                .ok_or_else(|| {
                    PolysumError::InvalidInput(format!("Field '{}' out of range", name))
                })?;
            let adapted = match (field_type, mode) {
                (FieldType::Integer, AggregateMode::Float) => {
                    log::warn!(
                        "Output field '{}' is an integer column, truncating sums",
                        name
                    );
                    AggregateMode::Truncate
                }
                (FieldType::Integer, other) | (FieldType::Text, other) => other,
                (FieldType::Real, _) => AggregateMode::Float,
                (FieldType::Bool, _) => {
                    return Err(PolysumError::InvalidConfig(format!(
                        "Output field '{}' is a boolean column and cannot hold a sum",
                        name
                    )));
                }
            };
            (OutputSlot::Overwrite(index), field_type, adapted)
        }
    };

    Ok(OutputField {
        name: name.to_string(),
        slot,
        input_width: schema.len(),
        field_type,
        mode,
    })
}

/// Resolve the weight column on the point layer.
pub fn resolve_weight_field(schema: &Schema, name: &str) -> Result<FieldIndex> {
    schema
        .lookup_field(name)
        .ok_or_else(|| PolysumError::FieldNotFound {
            field: name.to_string(),
            layer: "point".to_string(),
        })
}

/// Schema declared to the sink.
pub fn output_schema(input: &Schema, field: &OutputField) -> Schema {
    match field.slot {
        OutputSlot::Overwrite(_) => input.clone(),
        OutputSlot::Append(_) => input.with_appended(Field::new(field.name(), field.field_type)),
    }
}

/// Sink layout: polygon geometry kind and CRS with the output schema.
pub fn output_descriptor(input: &LayerDescriptor, field: &OutputField) -> LayerDescriptor {
    LayerDescriptor {
        geometry_kind: input.geometry_kind,
        crs: input.crs.clone(),
        schema: output_schema(&input.schema, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Crs, GeometryKind};

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("name", FieldType::Text),
            Field::new("NUMPOINTS", FieldType::Integer),
            Field::new("density", FieldType::Real),
            Field::new("flag", FieldType::Bool),
        ])
    }

    fn sum_of(weights: &[f64]) -> Accumulator {
        let mut acc = Accumulator::new();
        for w in weights {
            acc.add(&Value::Float(*w));
        }
        acc
    }

    #[test]
    fn test_existing_field_is_overwritten() {
        let field = resolve_output_field(&schema(), "NUMPOINTS", AggregateMode::Truncate).unwrap();
        assert_eq!(field.slot(), OutputSlot::Overwrite(FieldIndex::new(1)));
        assert!(!field.is_appended());
        assert_eq!(output_schema(&schema(), &field), schema());

        let row = field
            .apply(
                vec!["a".into(), Value::Int(99), Value::Null, Value::Null],
                field.encode(&sum_of(&[5.0])),
            )
            .unwrap();
        assert_eq!(row[1], Value::Int(5));
    }

    #[test]
    fn test_new_field_is_appended() {
        let field = resolve_output_field(&schema(), "total", AggregateMode::Float).unwrap();
        assert_eq!(field.slot(), OutputSlot::Append(FieldIndex::new(4)));

        let out = output_schema(&schema(), &field);
        assert_eq!(out.len(), 5);
        assert_eq!(out.fields()[4], Field::new("total", FieldType::Real));
        assert_eq!(field.encode(&sum_of(&[2.5])), Value::Float(2.5));
    }

    #[test]
    fn test_integer_column_with_float_mode() {
        let field = resolve_output_field(&schema(), "NUMPOINTS", AggregateMode::Float).unwrap();
        assert_eq!(field.field_type(), FieldType::Integer);
        assert_eq!(field.mode(), AggregateMode::Truncate);
        assert_eq!(field.encode(&sum_of(&[1.5])), Value::Int(1));

        let rounded = resolve_output_field(&schema(), "NUMPOINTS", AggregateMode::Round).unwrap();
        assert_eq!(rounded.encode(&sum_of(&[1.5])), Value::Int(2));
    }

    #[test]
    fn test_real_column_gets_exact_sum() {
        let field = resolve_output_field(&schema(), "density", AggregateMode::Truncate).unwrap();
        assert_eq!(field.mode(), AggregateMode::Float);
        assert_eq!(field.encode(&sum_of(&[1.25, 0.5])), Value::Float(1.75));
    }

    #[test]
    fn test_text_column_gets_formatted_sum() {
        let field = resolve_output_field(&schema(), "name", AggregateMode::Truncate).unwrap();
        assert_eq!(field.encode(&sum_of(&[1.5])), Value::from("1"));

        let float = resolve_output_field(&schema(), "name", AggregateMode::Float).unwrap();
        assert_eq!(float.encode(&sum_of(&[1.5])), Value::from("1.5"));
    }

    #[test]
    fn test_bool_column_rejected() {
        assert!(matches!(
            resolve_output_field(&schema(), "flag", AggregateMode::Truncate),
            Err(PolysumError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_apply_rejects_short_rows() {
        let field = resolve_output_field(&schema(), "total", AggregateMode::Truncate).unwrap();
        assert!(matches!(
            field.apply(vec![Value::Null], Value::Int(0)),
            Err(PolysumError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_weight_field_resolution() {
        assert_eq!(
            resolve_weight_field(&schema(), "name").unwrap(),
            FieldIndex::new(0)
        );
        assert!(matches!(
            resolve_weight_field(&schema(), "pop"),
            Err(PolysumError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_descriptor_copies_geometry_and_crs() {
        let input = LayerDescriptor {
            geometry_kind: GeometryKind::MultiPolygon,
            crs: Some(Crs::new("EPSG:3857")),
            schema: schema(),
        };
        let field = resolve_output_field(&input.schema, "total", AggregateMode::Truncate).unwrap();
        let out = output_descriptor(&input, &field);

        assert_eq!(out.geometry_kind, GeometryKind::MultiPolygon);
        assert_eq!(out.crs, Some(Crs::new("EPSG:3857")));
        assert_eq!(out.schema.fields()[4].field_type, FieldType::Integer);
    }
}
