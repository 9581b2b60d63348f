//! Compact, ASCII-only JSON text.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::error::Error;

/// Compact formatter that writes every non-ASCII char as `\uXXXX`
/// (surrogate pairs above the BMP).
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize `value` to `out` without a trailing newline.
pub fn write_compact<W, T>(out: &mut W, value: &T) -> Result<(), Error>
where
    W: io::Write + ?Sized,
    T: Serialize + ?Sized,
{
    let mut ser = Serializer::with_formatter(out, AsciiFormatter);
    value.serialize(&mut ser)?;
    Ok(())
}

pub fn to_compact_string<T>(value: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    write_compact(&mut buf, value)?;
    String::from_utf8(buf).map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_is_compact() {
        let text = to_compact_string(&json!({"a": [1, 2], "b": {"c": null}})).unwrap();
        assert_eq!(text, r#"{"a":[1,2],"b":{"c":null}}"#);
    }

    #[test]
    fn non_ascii_is_escaped() {
        let text = to_compact_string(&json!("caf\u{e9} \u{1F600}")).unwrap();
        assert_eq!(text, r#""caf\u00e9 \ud83d\ude00""#);
        assert!(text.is_ascii());
        let back: String = serde_json::from_str(&text).unwrap();
        assert_eq!(back, "caf\u{e9} \u{1F600}");
    }

    #[test]
    fn control_chars_keep_standard_escapes() {
        let text = to_compact_string(&json!("a\"b\\c\n\u{1}")).unwrap();
        assert_eq!(text, r#""a\"b\\c\n\u0001""#);
    }

    #[test]
    fn field_order_is_preserved() {
        let mut object = serde_json::Map::new();
        object.insert("z".into(), json!(1));
        object.insert("a".into(), json!(2));
        let text = to_compact_string(&serde_json::Value::Object(object)).unwrap();
        assert_eq!(text, r#"{"z":1,"a":2}"#);
    }
}
