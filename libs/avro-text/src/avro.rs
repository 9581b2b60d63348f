//! `apache_avro` values → [`Value`] trees.
//!
//! The reader hands out values with logical types already applied but without
//! the schema details needed for text output (decimal scale, fixed names).
//! Those come from walking the writer schema alongside the value.

use std::collections::HashMap;

use apache_avro::Schema;
use apache_avro::schema::Name;
use apache_avro::types::Value as AvroValue;

use crate::error::Error;
use crate::model::{LogicalType, SchemaName, Value};

/// Writer schema plus a lookup table for its named types.
pub struct SchemaIndex<'s> {
    root: &'s Schema,
    named: HashMap<&'s Name, &'s Schema>,
}

impl<'s> SchemaIndex<'s> {
    pub fn new(root: &'s Schema) -> Self {
        let mut named = HashMap::new();
        collect_named(root, &mut named);
        Self { root, named }
    }

    /// Number of fields of the top-level record.
    ///
    /// For a top-level union the smallest record branch counts. `None` when
    /// no record is reachable without descending into a container.
    pub fn top_level_field_count(&self) -> Option<usize> {
        let record_len = |schema: &'s Schema| match self.resolve(schema).ok()? {
            Schema::Record(r) => Some(r.fields.len()),
            _ => None,
        };
        match self.resolve(self.root).ok()? {
            Schema::Union(u) => u.variants().iter().filter_map(record_len).min(),
            other => record_len(other),
        }
    }

    /// Convert one top-level datum.
    pub fn convert(&self, value: &AvroValue) -> Result<Value, Error> {
        self.convert_node(value, self.root)
    }

    fn resolve(&self, schema: &'s Schema) -> Result<&'s Schema, Error> {
        match schema {
            Schema::Ref { name } => self
                .named
                .get(name)
                .copied()
                .ok_or_else(|| Error::Decode(format!("unknown named type '{}'", name.name))),
            other => Ok(other),
        }
    }

    fn convert_node(&self, value: &AvroValue, schema: &'s Schema) -> Result<Value, Error> {
        let schema = self.resolve(schema)?;
        let converted = match value {
            AvroValue::Null => {
                expect(matches!(schema, Schema::Null), "null")?;
                Value::Null
            }
            AvroValue::Boolean(b) => {
                expect(matches!(schema, Schema::Boolean), "boolean")?;
                Value::Boolean(*b)
            }
            AvroValue::Int(i) => {
                expect(matches!(schema, Schema::Int), "int")?;
                Value::int(*i)
            }
            AvroValue::Long(l) => {
                expect(matches!(schema, Schema::Long), "long")?;
                Value::long(*l)
            }
            AvroValue::Float(f) => {
                expect(matches!(schema, Schema::Float), "float")?;
                Value::Float(*f)
            }
            AvroValue::Double(d) => {
                expect(matches!(schema, Schema::Double), "double")?;
                Value::Double(*d)
            }
            AvroValue::Bytes(b) => {
                expect(matches!(schema, Schema::Bytes), "bytes")?;
                Value::bytes(copy_bytes(b)?)
            }
            AvroValue::Fixed(size, b) => {
                expect(
                    matches!(schema, Schema::Fixed(f) if f.size == *size && b.len() == *size),
                    "fixed",
                )?;
                Value::Fixed {
                    bytes: copy_bytes(b)?,
                    name: fixed_name(schema),
                    logical: None,
                }
            }
            AvroValue::String(s) => {
                expect(matches!(schema, Schema::String), "string")?;
                Value::String(s.clone())
            }
            AvroValue::Enum(index, symbol) => {
                let declared = match schema {
                    Schema::Enum(e) => e.symbols.get(*index as usize),
                    _ => None,
                };
                expect(declared == Some(symbol), "enum")?;
                Value::Enum {
                    index: *index,
                    symbol: symbol.clone(),
                }
            }
            AvroValue::Union(index, inner) => {
                let Schema::Union(u) = schema else {
                    return Err(mismatch("union"));
                };
                let branch = u
                    .variants()
                    .get(*index as usize)
                    .ok_or_else(|| Error::Decode(format!("union branch {index} out of range")))?;
                Value::union(self.convert_node(inner, branch)?)
            }
            AvroValue::Array(items) => {
                let Schema::Array(array) = schema else {
                    return Err(mismatch("array"));
                };
                let mut out = Vec::new();
                out.try_reserve(items.len())?;
                for (i, item) in items.iter().enumerate() {
                    out.push(
                        self.convert_node(item, &array.items)
                            .map_err(|e| e.with_context(format!("item {i}")))?,
                    );
                }
                Value::Array(out)
            }
            AvroValue::Map(entries) => {
                let Schema::Map(map) = schema else {
                    return Err(mismatch("map"));
                };
                let mut out = Vec::new();
                out.try_reserve(entries.len())?;
                for (key, entry) in entries {
                    let converted = self
                        .convert_node(entry, &map.types)
                        .map_err(|e| e.with_context(format!("key '{key}'")))?;
                    out.push((key.clone(), converted));
                }
                // the decoder's map has no stable order
                out.sort_by(|a, b| a.0.cmp(&b.0));
                Value::Map(out)
            }
            AvroValue::Record(fields) => {
                let Schema::Record(record) = schema else {
                    return Err(mismatch("record"));
                };
                if fields.len() != record.fields.len() {
                    return Err(Error::Decode(format!(
                        "record '{}' has {} fields, schema declares {}",
                        record.name.name,
                        fields.len(),
                        record.fields.len()
                    )));
                }
                let mut out = Vec::new();
                out.try_reserve(fields.len())?;
                for ((name, field), declared) in fields.iter().zip(&record.fields) {
                    let converted = self
                        .convert_node(field, &declared.schema)
                        .map_err(|e| e.with_context(format!("field '{name}'")))?;
                    out.push((name.clone(), converted));
                }
                Value::Record(out)
            }
            AvroValue::Date(d) => logical_int(*d, LogicalType::Date),
            AvroValue::TimeMillis(t) => logical_int(*t, LogicalType::TimeMillis),
            AvroValue::TimeMicros(t) => logical_long(*t, LogicalType::TimeMicros),
            AvroValue::TimestampMillis(t) => logical_long(*t, LogicalType::TimestampMillis),
            AvroValue::TimestampMicros(t) => logical_long(*t, LogicalType::TimestampMicros),
            AvroValue::TimestampNanos(t) => logical_long(*t, LogicalType::TimestampNanos),
            AvroValue::LocalTimestampMillis(t) => {
                logical_long(*t, LogicalType::LocalTimestampMillis)
            }
            AvroValue::LocalTimestampMicros(t) => {
                logical_long(*t, LogicalType::LocalTimestampMicros)
            }
            AvroValue::LocalTimestampNanos(t) => {
                logical_long(*t, LogicalType::LocalTimestampNanos)
            }
            AvroValue::Decimal(d) => {
                let Schema::Decimal(decimal) = schema else {
                    return Err(mismatch("decimal"));
                };
                let bytes = Vec::<u8>::try_from(d)?;
                let logical = Some(LogicalType::Decimal {
                    precision: decimal.precision,
                    scale: decimal.scale,
                });
                match self.resolve(&decimal.inner)? {
                    Schema::Fixed(fixed) => Value::Fixed {
                        bytes,
                        name: Some(schema_name(&fixed.name)),
                        logical,
                    },
                    _ => Value::Bytes { bytes, logical },
                }
            }
            AvroValue::BigDecimal(d) => Value::String(d.to_string()),
            AvroValue::Uuid(u) => Value::String(u.to_string()),
            AvroValue::Duration(d) => Value::Fixed {
                bytes: <[u8; 12]>::from(*d).to_vec(),
                name: fixed_name(schema),
                logical: Some(LogicalType::Duration),
            },
        };
        Ok(converted)
    }
}

fn collect_named<'s>(schema: &'s Schema, named: &mut HashMap<&'s Name, &'s Schema>) {
    match schema {
        Schema::Record(record) => {
            if named.insert(&record.name, schema).is_none() {
                for field in &record.fields {
                    collect_named(&field.schema, named);
                }
            }
        }
        Schema::Enum(e) => {
            named.insert(&e.name, schema);
        }
        Schema::Fixed(fixed) => {
            named.insert(&fixed.name, schema);
        }
        Schema::Decimal(decimal) => collect_named(&decimal.inner, named),
        Schema::Array(array) => collect_named(&array.items, named),
        Schema::Map(map) => collect_named(&map.types, named),
        Schema::Union(u) => {
            for variant in u.variants() {
                collect_named(variant, named);
            }
        }
        _ => {}
    }
}

fn schema_name(name: &Name) -> SchemaName {
    SchemaName::new(name.namespace.as_deref(), &name.name)
}

fn fixed_name(schema: &Schema) -> Option<SchemaName> {
    match schema {
        Schema::Fixed(fixed) => Some(schema_name(&fixed.name)),
        _ => None,
    }
}

fn copy_bytes(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    out.try_reserve_exact(bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(out)
}

fn logical_int(value: i32, logical: LogicalType) -> Value {
    Value::Int {
        value,
        logical: Some(logical),
    }
}

fn logical_long(value: i64, logical: LogicalType) -> Value {
    Value::Long {
        value,
        logical: Some(logical),
    }
}

fn mismatch(kind: &str) -> Error {
    Error::Decode(format!("{kind} value does not match the writer schema"))
}

fn expect(matches_schema: bool, kind: &str) -> Result<(), Error> {
    if matches_schema {
        Ok(())
    } else {
        Err(mismatch(kind))
    }
}
