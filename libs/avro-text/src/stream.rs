//! Whole-stream conversion: container file in, one text line per record out.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use apache_avro::types::Value as AvroValue;
use apache_avro::{Reader, Schema};

use crate::avro::SchemaIndex;
use crate::error::Error;
use crate::policy::OutputPolicy;
use crate::walker::{Converter, OutputMode};

/// Outcome of a finished stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records written to the output.
    pub records: u64,
    /// Records dropped after a per-record error.
    pub skipped: u64,
}

fn open(path: &Path) -> Result<Reader<'static, BufReader<File>>, Error> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Reader::new(BufReader::new(file))?)
}

/// Writer schema stored in the container header.
pub fn read_schema(path: &Path) -> Result<Schema, Error> {
    Ok(open(path)?.writer_schema().clone())
}

/// Convert every record of the container file at `path`.
pub fn convert_file<W: Write + ?Sized>(
    path: &Path,
    mode: OutputMode,
    policy: &OutputPolicy,
    out: &mut W,
) -> Result<RunStats, Error> {
    let reader = open(path)?;
    let schema = reader.writer_schema().clone();
    tracing::debug!(path = %path.display(), ?mode, "converting");
    convert_stream(reader, &schema, mode, policy, out)
}

/// Convert a sequence of decoded records written with `schema`.
///
/// The policy is checked against the schema before the first record. A
/// record that fails to convert is skipped with a warning and nothing of it
/// reaches `out`; I/O and read errors stop the stream.
pub fn convert_stream<I, W>(
    records: I,
    schema: &Schema,
    mode: OutputMode,
    policy: &OutputPolicy,
    out: &mut W,
) -> Result<RunStats, Error>
where
    I: IntoIterator<Item = Result<AvroValue, apache_avro::Error>>,
    W: Write + ?Sized,
{
    let index = SchemaIndex::new(schema);
    policy.validate(index.top_level_field_count())?;

    let mut converter = Converter::new(policy.clone());
    let mut line = Vec::new();
    let mut stats = RunStats::default();

    for (n, record) in records.into_iter().enumerate() {
        let record = record.map_err(|e| Error::from(e).with_context(format!("record {n}")))?;

        line.clear();
        let written = index
            .convert(&record)
            .and_then(|value| converter.write_record(&value, mode, &mut line));
        match written {
            Ok(()) => {
                out.write_all(&line)?;
                stats.records += 1;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(record = n, error = %e, "skipping record");
                stats.skipped += 1;
            }
        }
    }

    out.flush()?;
    tracing::info!(records = stats.records, skipped = stats.skipped, "conversion finished");
    Ok(stats)
}
