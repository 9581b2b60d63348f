//! Fixed-point decimals stored as big-endian two's-complement bytes.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::Error;

/// Unscaled magnitude, scale and sign of an Avro `decimal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    magnitude: BigUint,
    scale: usize,
    negative: bool,
}

impl Decimal {
    /// Decode big-endian two's-complement bytes.
    ///
    /// Negative input is turned into its magnitude in place: copy the buffer
    /// first if the caller still needs the original bytes.
    pub fn decode(bytes: &mut [u8], scale: usize) -> Self {
        let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
        if negative {
            for b in bytes.iter_mut() {
                *b = !*b;
            }
            for b in bytes.iter_mut().rev() {
                *b = b.wrapping_add(1);
                if *b != 0 {
                    break;
                }
            }
        }
        Self {
            magnitude: BigUint::from_bytes_be(bytes),
            scale,
            negative,
        }
    }

    /// Parse a plain decimal string (`-12.5`, `0.05`, `7`) at `scale`.
    ///
    /// Fails when the text has more fractional digits than `scale`.
    pub fn parse(text: &str, scale: usize) -> Result<Self, Error> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(Error::Decode(format!("invalid decimal '{text}'")));
        }
        if frac_part.len() > scale {
            return Err(Error::Decode(format!(
                "decimal '{text}' has more than {scale} fractional digits"
            )));
        }

        let mut digits = String::with_capacity(int_part.len() + scale);
        digits.push_str(int_part);
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat_n('0', scale - frac_part.len()));
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Decode(format!("invalid decimal '{text}'")));
        }

        let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| Error::Decode(format!("invalid decimal '{text}'")))?;
        Ok(Self {
            magnitude,
            scale,
            negative,
        })
    }

    /// Minimal big-endian two's-complement encoding of the unscaled value.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.magnitude.clone()).to_signed_bytes_be()
    }

    /// Append the canonical text form to `out`.
    ///
    /// Zero renders as `0` whatever the scale or sign. Trailing fractional
    /// zeros are stripped, and so is the point when nothing follows it.
    pub fn render_into(&self, out: &mut String) -> Result<(), Error> {
        let digits = self.magnitude.to_str_radix(10);
        if digits == "0" {
            out.try_reserve(1)?;
            out.push('0');
            return Ok(());
        }

        let scale = self.scale;
        out.try_reserve(digits.len().max(scale) + 3)?;
        if self.negative {
            out.push('-');
        }

        if scale == 0 {
            out.push_str(&digits);
            return Ok(());
        }

        let (int_part, frac_digits) = if digits.len() > scale {
            digits.split_at(digits.len() - scale)
        } else {
            ("", digits.as_str())
        };
        let leading_zeros = scale - frac_digits.len();
        let frac = frac_digits.trim_end_matches('0');

        if int_part.is_empty() {
            out.push('0');
        } else {
            out.push_str(int_part);
        }
        if !frac.is_empty() {
            out.push('.');
            out.extend(std::iter::repeat_n('0', leading_zeros));
            out.push_str(frac);
        }
        Ok(())
    }

    pub fn render(&self) -> Result<String, Error> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(unscaled: i64, scale: usize) -> String {
        let mut bytes = BigInt::from(unscaled).to_signed_bytes_be();
        Decimal::decode(&mut bytes, scale).render().unwrap()
    }

    #[test]
    fn strips_trailing_fraction_zeros() {
        assert_eq!(render(12340, 3), "12.34");
        assert_eq!(render(12000, 3), "12");
        assert_eq!(render(12345, 0), "12345");
    }

    #[test]
    fn zero_ignores_scale_and_sign() {
        assert_eq!(render(0, 5), "0");
        assert_eq!(render(0, 0), "0");
        let mut empty: [u8; 0] = [];
        assert_eq!(Decimal::decode(&mut empty, 3).render().unwrap(), "0");
    }

    #[test]
    fn pads_small_magnitudes() {
        assert_eq!(render(-5, 2), "-0.05");
        assert_eq!(render(5, 4), "0.0005");
        assert_eq!(render(50, 4), "0.005");
        assert_eq!(render(100, 2), "1");
    }

    #[test]
    fn negative_boundaries() {
        let mut bytes = [0x80];
        assert_eq!(Decimal::decode(&mut bytes, 0).render().unwrap(), "-128");
        assert_eq!(bytes, [0x80]);

        let mut bytes = [0xFF, 0xFF];
        assert_eq!(Decimal::decode(&mut bytes, 1).render().unwrap(), "-0.1");
        assert_eq!(bytes, [0x00, 0x01]);

        let mut bytes = [0xFF, 0x00];
        assert_eq!(Decimal::decode(&mut bytes, 0).render().unwrap(), "-256");
    }

    #[test]
    fn wide_values_beyond_i128() {
        let mut bytes = vec![0x7F];
        bytes.extend(std::iter::repeat_n(0xFF, 19));
        let expected = (BigUint::from(1u8) << 159u32) - 1u32;
        let decimal = Decimal::decode(&mut bytes, 0);
        assert_eq!(decimal.render().unwrap(), expected.to_string());
    }

    #[test]
    fn parse_and_encode() {
        let d = Decimal::parse("-12.5", 3).unwrap();
        assert_eq!(d.to_be_bytes(), BigInt::from(-12500).to_signed_bytes_be());
        assert_eq!(d.to_string(), "-12.5");

        assert_eq!(Decimal::parse(".05", 2).unwrap().to_string(), "0.05");
        assert!(Decimal::parse("1.234", 2).is_err());
        assert!(Decimal::parse("1x", 2).is_err());
        assert!(Decimal::parse("-", 2).is_err());
    }

    proptest! {
        #[test]
        fn round_trips_through_bytes(unscaled in any::<i128>(), scale in 0usize..40) {
            let mut bytes = BigInt::from(unscaled).to_signed_bytes_be();
            let text = Decimal::decode(&mut bytes, scale).render().unwrap();
            let reparsed = Decimal::parse(&text, scale).unwrap();
            prop_assert_eq!(reparsed.to_be_bytes(), BigInt::from(unscaled).to_signed_bytes_be());
        }

        #[test]
        fn rendering_is_canonical(unscaled in any::<i64>(), scale in 1usize..20) {
            let mut bytes = BigInt::from(unscaled).to_signed_bytes_be();
            let text = Decimal::decode(&mut bytes, scale).render().unwrap();
            prop_assert!(!text.ends_with('.'));
            if text.contains('.') {
                prop_assert!(!text.ends_with('0'));
            }
        }
    }
}
