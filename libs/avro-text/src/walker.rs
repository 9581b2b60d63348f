//! Value → JSON tree / CSV row.
//!
//! One traversal serves both output formats. Scalars are classified once
//! ([`Scalar`]) and then either become JSON nodes or are written straight to
//! the CSV sink. Arrays, maps and nested records inside a CSV row are
//! embedded as quoted JSON text.

use std::borrow::Cow;
use std::io::Write;

use serde_json::{Map, Number, Value as JsonValue};

use crate::binary;
use crate::cache::ScratchCache;
use crate::csv;
use crate::error::Error;
use crate::json;
use crate::model::{LogicalType, Value};
use crate::policy::{self, OutputPolicy};
use crate::temporal;

/// Which text representation a stream is converted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Json,
    Csv,
}

enum Scalar<'a> {
    Null,
    Bool(bool),
    Int(i64),
    /// Always finite.
    Float(f64),
    Text(Cow<'a, str>),
}

impl Scalar<'_> {
    fn into_json(self) -> JsonValue {
        match self {
            Scalar::Null => JsonValue::Null,
            Scalar::Bool(b) => JsonValue::Bool(b),
            Scalar::Int(i) => JsonValue::from(i),
            Scalar::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Scalar::Text(s) => JsonValue::String(s.into_owned()),
        }
    }

    fn write_csv<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(out, "{b}"),
            Scalar::Int(i) => write!(out, "{i}"),
            Scalar::Float(f) => out.write_all(csv::format_g17(*f).as_bytes()),
            Scalar::Text(s) => csv::write_text(out, s),
        }
    }
}

fn float(value: f64) -> Scalar<'static> {
    if value.is_nan() {
        Scalar::Text(Cow::Borrowed("NaN"))
    } else if value.is_infinite() {
        Scalar::Text(Cow::Borrowed("Infinity"))
    } else {
        Scalar::Float(value)
    }
}

fn int_scalar(
    value: i32,
    logical: Option<&LogicalType>,
    policy: &OutputPolicy,
) -> Result<Scalar<'static>, Error> {
    let Some(logical) = logical.filter(|_| policy.decode_logical_types) else {
        return Ok(Scalar::Int(i64::from(value)));
    };
    let text = match logical {
        LogicalType::Date => temporal::date_from_epoch_days(value),
        LogicalType::TimeMillis => temporal::time_of_day_from_millis(value),
        other => return Err(Error::unsupported(other, "int")),
    };
    Ok(Scalar::Text(Cow::Owned(text)))
}

fn long_scalar(
    value: i64,
    logical: Option<&LogicalType>,
    policy: &OutputPolicy,
) -> Result<Scalar<'static>, Error> {
    let Some(logical) = logical.filter(|_| policy.decode_logical_types) else {
        return Ok(Scalar::Int(value));
    };
    let text = match logical {
        LogicalType::TimeMicros => temporal::time_of_day_from_micros(value),
        LogicalType::TimestampMillis | LogicalType::LocalTimestampMillis => {
            temporal::timestamp_from_millis(value)
        }
        LogicalType::TimestampMicros | LogicalType::LocalTimestampMicros => {
            temporal::timestamp_from_micros(value)
        }
        LogicalType::TimestampNanos => temporal::timestamp_from_nanos_utc(value),
        LogicalType::LocalTimestampNanos => temporal::local_timestamp_from_nanos(value),
        other => return Err(Error::unsupported(other, "long")),
    };
    Ok(Scalar::Text(Cow::Owned(text)))
}

/// Classify a non-container value. `None` for arrays, maps, records and unions.
fn scalar<'a>(
    value: &'a Value,
    policy: &OutputPolicy,
    cache: &'a mut ScratchCache,
) -> Result<Option<Scalar<'a>>, Error> {
    let scalar = match value {
        Value::Null => Scalar::Null,
        Value::Boolean(b) => Scalar::Bool(*b),
        Value::Int { value, logical } => int_scalar(*value, logical.as_ref(), policy)?,
        Value::Long { value, logical } => long_scalar(*value, logical.as_ref(), policy)?,
        Value::Float(f) => float(f64::from(*f)),
        Value::Double(d) => float(*d),
        Value::Bytes { bytes, logical } | Value::Fixed { bytes, logical, .. } => {
            if policy.decode_logical_types
                && let Some(LogicalType::Decimal { scale, .. }) = logical
            {
                return Ok(Some(Scalar::Text(Cow::Borrowed(cache.decimal_text(bytes, *scale)?))));
            }
            if policy.decode_guid
                && let Value::Fixed { name: Some(name), .. } = value
                && name.is_system_guid()
                && let Ok(guid) = <&[u8; 16]>::try_from(bytes.as_slice())
            {
                return Ok(Some(Scalar::Text(Cow::Owned(binary::guid_to_string(guid)))));
            }
            Scalar::Text(Cow::Borrowed(cache.latin1_text(bytes)?))
        }
        Value::String(s) => Scalar::Text(Cow::Borrowed(s)),
        Value::Enum { symbol, .. } => Scalar::Text(Cow::Borrowed(symbol)),
        Value::Array(_) | Value::Map(_) | Value::Record(_) | Value::Union(_) => return Ok(None),
    };
    Ok(Some(scalar))
}

/// Convert `value` into a JSON tree.
///
/// `top_level` enables projection on the outermost record; unions pass it
/// through unchanged.
pub fn to_json(
    value: &Value,
    top_level: bool,
    policy: &OutputPolicy,
    cache: &mut ScratchCache,
) -> Result<JsonValue, Error> {
    match value {
        Value::Union(branch) => to_json(branch, top_level, policy, cache),
        Value::Array(items) => {
            let mut out = Vec::new();
            out.try_reserve(items.len())?;
            for (i, item) in items.iter().enumerate() {
                let converted = to_json(item, false, policy, cache)
                    .map_err(|e| e.with_context(format!("item {i}")))?;
                out.push(converted);
            }
            Ok(JsonValue::Array(out))
        }
        Value::Map(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                let converted = to_json(entry, false, policy, cache)
                    .map_err(|e| e.with_context(format!("key '{key}'")))?;
                out.insert(key.clone(), converted);
            }
            Ok(JsonValue::Object(out))
        }
        Value::Record(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (name, field) in policy.fields(fields, top_level) {
                let converted = to_json(field, false, policy, cache)
                    .map_err(|e| e.with_context(format!("field '{name}'")))?;
                if policy.prune && policy::is_empty_value(&converted) {
                    continue;
                }
                out.insert(name.clone(), converted);
            }
            Ok(JsonValue::Object(out))
        }
        scalar_value => match scalar(scalar_value, policy, cache)? {
            Some(s) => Ok(s.into_json()),
            None => Err(Error::Decode(format!("unexpected {}", scalar_value.type_name()))),
        },
    }
}

/// Write `value` as one CSV row, without the line terminator.
///
/// A record becomes one column per visited field; any other value is a
/// single-column row. Top-level columns are never pruned, so rows keep their
/// shape; pruning still applies inside embedded JSON.
pub fn write_csv<W: Write + ?Sized>(
    value: &Value,
    policy: &OutputPolicy,
    cache: &mut ScratchCache,
    out: &mut W,
) -> Result<(), Error> {
    match value {
        Value::Union(branch) => write_csv(branch, policy, cache, out),
        Value::Record(fields) => {
            for (i, (name, field)) in policy.fields(fields, true).enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                write_csv_field(field, policy, cache, out)
                    .map_err(|e| e.with_context(format!("field '{name}'")))?;
            }
            Ok(())
        }
        other => write_csv_field(other, policy, cache, out),
    }
}

fn write_csv_field<W: Write + ?Sized>(
    value: &Value,
    policy: &OutputPolicy,
    cache: &mut ScratchCache,
    out: &mut W,
) -> Result<(), Error> {
    match value {
        Value::Union(branch) => write_csv_field(branch, policy, cache, out),
        Value::Array(_) | Value::Map(_) | Value::Record(_) => {
            let tree = to_json(value, false, policy, cache)?;
            let text = json::to_compact_string(&tree)?;
            csv::write_quoted(out, &text)?;
            Ok(())
        }
        scalar_value => match scalar(scalar_value, policy, cache)? {
            Some(s) => Ok(s.write_csv(out)?),
            None => Err(Error::Decode(format!("unexpected {}", scalar_value.type_name()))),
        },
    }
}

/// Policy plus scratch buffers for one stream.
#[derive(Debug)]
pub struct Converter {
    policy: OutputPolicy,
    cache: ScratchCache,
}

impl Converter {
    pub fn new(policy: OutputPolicy) -> Self {
        Self {
            policy,
            cache: ScratchCache::new(),
        }
    }

    pub fn to_json(&mut self, value: &Value) -> Result<JsonValue, Error> {
        to_json(value, true, &self.policy, &mut self.cache)
    }

    pub fn write_csv<W: Write + ?Sized>(
        &mut self,
        value: &Value,
        out: &mut W,
    ) -> Result<(), Error> {
        write_csv(value, &self.policy, &mut self.cache, out)
    }

    /// Write one newline-terminated output line for `value`.
    pub fn write_record<W: Write + ?Sized>(
        &mut self,
        value: &Value,
        mode: OutputMode,
        out: &mut W,
    ) -> Result<(), Error> {
        match mode {
            OutputMode::Json => {
                let tree = self.to_json(value)?;
                json::write_compact(out, &tree)?;
            }
            OutputMode::Csv => self.write_csv(value, out)?,
        }
        out.write_all(b"\n")?;
        Ok(())
    }
}
