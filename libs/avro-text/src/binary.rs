//! Text forms of raw `bytes` / `fixed` payloads.

use std::collections::TryReserveError;

/// Append `bytes` to `out` reading each byte as an ISO-8859-1 code point.
///
/// Bytes below 0x80 are copied as-is, the rest become two-byte UTF-8
/// sequences, so [`utf8_to_latin1`] recovers the input exactly.
pub fn latin1_to_utf8(bytes: &[u8], out: &mut String) -> Result<(), TryReserveError> {
    let high = bytes.iter().filter(|b| **b >= 0x80).count();
    out.try_reserve(bytes.len() + high)?;
    out.extend(bytes.iter().map(|&b| char::from(b)));
    Ok(())
}

/// Inverse of [`latin1_to_utf8`]. `None` if a char is above U+00FF.
pub fn utf8_to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(c).ok()).collect()
}

/// Canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form of a .NET `System.Guid`.
///
/// The first three groups are stored little-endian, the last eight bytes in
/// order.
pub fn guid_to_string(bytes: &[u8; 16]) -> String {
    const ORDER: [usize; 16] = [3, 2, 1, 0, 5, 4, 7, 6, 8, 9, 10, 11, 12, 13, 14, 15];
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(36);
    for (i, &at) in ORDER.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        let byte = bytes[at];
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
