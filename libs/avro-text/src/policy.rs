use serde_json::{Map, Value as JsonValue};

use crate::error::Error;
use crate::model::Value;

/// Per-run output options. Built once before the first record.
///
/// Projection uses an explicit list of 1-based field positions: fields are
/// emitted in list order and a position may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPolicy {
    pub prune: bool,
    pub decode_logical_types: bool,
    pub decode_guid: bool,
    pub projected_columns: Option<Vec<usize>>,
}

impl OutputPolicy {
    pub fn with_prune(mut self) -> Self {
        self.prune = true;
        self
    }

    pub fn with_logical_types(mut self) -> Self {
        self.decode_logical_types = true;
        self
    }

    pub fn with_guid(mut self) -> Self {
        self.decode_guid = true;
        self
    }

    pub fn with_columns(mut self, columns: Vec<usize>) -> Self {
        self.projected_columns = Some(columns);
        self
    }

    /// Check the projection against the field count of the top-level record.
    ///
    /// `field_count` is `None` when the top-level schema has no record.
    pub fn validate(&self, field_count: Option<usize>) -> Result<(), Error> {
        let Some(columns) = &self.projected_columns else {
            return Ok(());
        };
        if columns.is_empty() {
            return Err(Error::Config("column list is empty".into()));
        }
        let Some(count) = field_count else {
            return Err(Error::Config(
                "column projection needs a record at the top level".into(),
            ));
        };
        match columns.iter().find(|&&c| c == 0 || c > count) {
            Some(bad) => Err(Error::Config(format!(
                "column {bad} is out of range, record has {count} fields"
            ))),
            None => Ok(()),
        }
    }

    /// Fields of a record to visit, in output order.
    ///
    /// Projection only applies when `top_level` is set.
    pub fn fields<'v>(
        &'v self,
        fields: &'v [(String, Value)],
        top_level: bool,
    ) -> impl Iterator<Item = &'v (String, Value)> + 'v {
        let projection = self.projected_columns.as_deref().filter(|_| top_level);
        let all = match projection {
            None => Some(fields.iter()),
            Some(_) => None,
        };
        let picked = projection.map(move |columns| {
            columns
                .iter()
                .filter_map(move |&pos| fields.get(pos.checked_sub(1)?))
        });
        all.into_iter().flatten().chain(picked.into_iter().flatten())
    }
}

/// `null`, `[]` and `{}` are dropped by pruning.
pub fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

/// Drop empty members of an already converted object.
pub fn prune_fields(object: &mut Map<String, JsonValue>) {
    object.retain(|_, v| !is_empty_value(v));
}
