use std::io::{self, BufWriter, Write};

use super::config::Effective;
use super::error::CliError;

pub fn run(eff: &Effective) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if eff.show_schema {
        let schema = avro_text::read_schema(&eff.file)?;
        avro_text::json::write_compact(&mut out, &schema)?;
        out.write_all(b"\n")?;
        out.flush()?;
        return Ok(());
    }

    let stats = avro_text::convert_file(&eff.file, eff.mode, &eff.policy, &mut out)?;
    if stats.skipped > 0 {
        tracing::warn!(
            file = %eff.file.display(),
            skipped = stats.skipped,
            "some records could not be converted"
        );
    }
    Ok(())
}
