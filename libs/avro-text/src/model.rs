use std::fmt;

/// Semantic refinement attached to an `int`, `long`, `bytes` or `fixed` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Decimal { precision: usize, scale: usize },
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    TimestampNanos,
    LocalTimestampMillis,
    LocalTimestampMicros,
    LocalTimestampNanos,
    Duration,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Decimal { precision, scale } => write!(f, "decimal({precision}, {scale})"),
            LogicalType::Date => write!(f, "date"),
            LogicalType::TimeMillis => write!(f, "time-millis"),
            LogicalType::TimeMicros => write!(f, "time-micros"),
            LogicalType::TimestampMillis => write!(f, "timestamp-millis"),
            LogicalType::TimestampMicros => write!(f, "timestamp-micros"),
            LogicalType::TimestampNanos => write!(f, "timestamp-nanos"),
            LogicalType::LocalTimestampMillis => write!(f, "local-timestamp-millis"),
            LogicalType::LocalTimestampMicros => write!(f, "local-timestamp-micros"),
            LogicalType::LocalTimestampNanos => write!(f, "local-timestamp-nanos"),
            LogicalType::Duration => write!(f, "duration"),
        }
    }
}

/// Full name of a named schema (`fixed` here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName {
    pub namespace: Option<String>,
    pub name: String,
}

impl SchemaName {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Microsoft `System.Guid` convention for `fixed(16)` values.
    pub fn is_system_guid(&self) -> bool {
        self.namespace.as_deref() == Some("System") && self.name == "Guid"
    }
}

/// A decoded value, one variant per Avro type.
///
/// Logical annotations are resolved once, when the tree is built, and travel
/// with the node that carries them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int {
        value: i32,
        logical: Option<LogicalType>,
    },
    Long {
        value: i64,
        logical: Option<LogicalType>,
    },
    Float(f32),
    Double(f64),
    Bytes {
        bytes: Vec<u8>,
        logical: Option<LogicalType>,
    },
    Fixed {
        bytes: Vec<u8>,
        name: Option<SchemaName>,
        logical: Option<LogicalType>,
    },
    String(String),
    Enum {
        index: u32,
        symbol: String,
    },
    Array(Vec<Value>),
    /// Entries in iteration order, keys unique.
    Map(Vec<(String, Value)>),
    /// Fields in schema declaration order.
    Record(Vec<(String, Value)>),
    /// Currently selected branch.
    Union(Box<Value>),
}

impl Value {
    pub fn int(value: i32) -> Self {
        Value::Int { value, logical: None }
    }

    pub fn long(value: i64) -> Self {
        Value::Long { value, logical: None }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes {
            bytes: bytes.into(),
            logical: None,
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn union(branch: Value) -> Self {
        Value::Union(Box::new(branch))
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int { .. } => "int",
            Value::Long { .. } => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bytes { .. } => "bytes",
            Value::Fixed { .. } => "fixed",
            Value::String(_) => "string",
            Value::Enum { .. } => "enum",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Union(_) => "union",
        }
    }
}
