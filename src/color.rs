//! Pad color: a color name or hex value, rendered in encoder filter syntax.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::GeometryError;

/// Background color for padded frames.
///
/// Accepts:
/// - color names (ASCII letters, case-insensitive): `black`, `White`
/// - `RGB` / `RGBA`: short hex, expanded per nibble
/// - `RRGGBB` / `RRGGBBAA`
///
/// Hex values may carry a `#` or `0x` prefix. They render as `0xRRGGBB` or
/// `0xRRGGBBAA`, names render lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PadColor {
    /// Named color, stored lowercase.
    Named(String),
    /// Explicit color. `a` is `None` for opaque hex without alpha.
    Rgb { r: u8, g: u8, b: u8, a: Option<u8> },
}

impl Default for PadColor {
    fn default() -> Self {
        Self::black()
    }
}

impl PadColor {
    /// Opaque black.
    pub fn black() -> Self {
        Self::Named(String::from("black"))
    }

    /// Parse a color name or hex value.
    pub fn parse(s: &str) -> Result<Self, GeometryError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GeometryError::InvalidPadColor);
        }

        let hex = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"));

        match hex {
            Some(h) => parse_hex(h),
            // Bare hex like "fff" is also a valid name shape; hex wins when all digits qualify.
            None => parse_hex(s).or_else(|_| parse_name(s)),
        }
    }
}

impl FromStr for PadColor {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadColor::Named(name) => f.write_str(name),
            PadColor::Rgb { r, g, b, a: None } => write!(f, "0x{r:02X}{g:02X}{b:02X}"),
            PadColor::Rgb {
                r,
                g,
                b,
                a: Some(a),
            } => write!(f, "0x{r:02X}{g:02X}{b:02X}{a:02X}"),
        }
    }
}

fn parse_name(s: &str) -> Result<PadColor, GeometryError> {
    if !s.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(GeometryError::InvalidPadColor);
    }
    Ok(PadColor::Named(s.to_ascii_lowercase()))
}

fn parse_hex(hex: &str) -> Result<PadColor, GeometryError> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(GeometryError::InvalidPadColor);
    }

    let b = hex.as_bytes();
    let color = match b.len() {
        3 => PadColor::Rgb {
            r: expand_nibble(b[0]),
            g: expand_nibble(b[1]),
            b: expand_nibble(b[2]),
            a: None,
        },
        4 => PadColor::Rgb {
            r: expand_nibble(b[0]),
            g: expand_nibble(b[1]),
            b: expand_nibble(b[2]),
            a: Some(expand_nibble(b[3])),
        },
        6 => PadColor::Rgb {
            r: byte(b[0], b[1]),
            g: byte(b[2], b[3]),
            b: byte(b[4], b[5]),
            a: None,
        },
        8 => PadColor::Rgb {
            r: byte(b[0], b[1]),
            g: byte(b[2], b[3]),
            b: byte(b[4], b[5]),
            a: Some(byte(b[6], b[7])),
        },
        _ => return Err(GeometryError::InvalidPadColor),
    };
    Ok(color)
}

/// Expand a single hex nibble: 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> u8 {
    let n = hex_val(ch);
    n << 4 | n
}

fn byte(hi: u8, lo: u8) -> u8 {
    hex_val(hi) << 4 | hex_val(lo)
}

// Callers have already checked `is_ascii_hexdigit`.
fn hex_val(ch: u8) -> u8 {
    match ch {
        b'0'..=b'9' => ch - b'0',
        b'a'..=b'f' => ch - b'a' + 10,
        b'A'..=b'F' => ch - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn default_is_black() {
        assert_eq!(PadColor::default().to_string(), "black");
    }

    #[test]
    fn names_lowercased() {
        assert_eq!(PadColor::parse("White").unwrap().to_string(), "white");
        assert_eq!(PadColor::parse(" DarkSlateGray ").unwrap().to_string(), "darkslategray");
    }

    #[test]
    fn hex_forms() {
        assert_eq!(PadColor::parse("#ff8000").unwrap().to_string(), "0xFF8000");
        assert_eq!(PadColor::parse("0x102030").unwrap().to_string(), "0x102030");
        assert_eq!(PadColor::parse("#f80").unwrap().to_string(), "0xFF8800");
        assert_eq!(PadColor::parse("#f808").unwrap().to_string(), "0xFF880088");
        assert_eq!(PadColor::parse("#11223344").unwrap().to_string(), "0x11223344");
    }

    #[test]
    fn bare_hex_and_hex_like_names() {
        assert_eq!(
            PadColor::parse("abc").unwrap(),
            PadColor::Rgb {
                r: 0xAA,
                g: 0xBB,
                b: 0xCC,
                a: None
            }
        );
        // Non-hex letters, so it's a name.
        assert_eq!(PadColor::parse("beige").unwrap().to_string(), "beige");
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12345", "#gggggg", "red,blue", "pad=1", "0x"] {
            assert_eq!(PadColor::parse(bad), Err(GeometryError::InvalidPadColor), "{bad:?}");
        }
    }
}
