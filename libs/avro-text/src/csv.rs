//! CSV field writing.

use std::io::{self, Write};

/// Strings are quoted only when they contain a comma or a double quote.
pub fn needs_quotes(text: &str) -> bool {
    text.contains([',', '"'])
}

/// Write `text` wrapped in double quotes, embedded quotes doubled.
pub fn write_quoted<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(b"\"")?;
    let mut parts = text.split('"');
    if let Some(first) = parts.next() {
        out.write_all(first.as_bytes())?;
    }
    for part in parts {
        out.write_all(b"\"\"")?;
        out.write_all(part.as_bytes())?;
    }
    out.write_all(b"\"")
}

/// Write a string field, quoting it only when needed.
pub fn write_text<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    if needs_quotes(text) {
        write_quoted(out, text)
    } else {
        out.write_all(text.as_bytes())
    }
}

/// Finite `value` with 17 significant digits, printf `%.17g` style.
pub fn format_g17(value: f64) -> String {
    const PRECISION: i32 = 17;

    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
