use crate::binary;
use crate::decimal::Decimal;
use crate::error::Error;

/// Buffers reused across the records of one stream.
///
/// Buffers only ever grow: each one ends up sized for the largest value seen
/// so far. A cache belongs to a single stream and is not shared.
#[derive(Debug, Default)]
pub struct ScratchCache {
    decimal_bytes: Vec<u8>,
    decimal_text: String,
    utf8: String,
}

impl ScratchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a decimal from `bytes` (left untouched) and render it.
    pub fn decimal_text(&mut self, bytes: &[u8], scale: usize) -> Result<&str, Error> {
        self.decimal_bytes.clear();
        self.decimal_bytes.try_reserve(bytes.len())?;
        self.decimal_bytes.extend_from_slice(bytes);

        let decimal = Decimal::decode(&mut self.decimal_bytes, scale);
        self.decimal_text.clear();
        decimal.render_into(&mut self.decimal_text)?;
        Ok(&self.decimal_text)
    }

    /// ISO-8859-1 → UTF-8 recoding of `bytes`.
    pub fn latin1_text(&mut self, bytes: &[u8]) -> Result<&str, Error> {
        self.utf8.clear();
        binary::latin1_to_utf8(bytes, &mut self.utf8)?;
        Ok(&self.utf8)
    }

    /// Total bytes currently reserved by the buffers.
    pub fn capacity(&self) -> usize {
        self.decimal_bytes.capacity() + self.decimal_text.capacity() + self.utf8.capacity()
    }
}
