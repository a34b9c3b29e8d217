//! Error type shared by the parser, resolver and color validation.

use core::fmt;

/// Geometry parsing or resolution error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeometryError {
    /// Geometry string has no numeric width or height.
    InvalidGeometry,
    /// A dimension's digits do not fit in `u32`.
    DimensionOverflow,
    /// Source metadata carries no usable size.
    UnresolvableGeometry,
    /// Output would have a zero width or height: a stretch with an unset
    /// axis, or an aspect ratio extreme enough to collapse the derived axis.
    ZeroDimension,
    /// Pad color is neither a color name nor a hex value.
    InvalidPadColor,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidGeometry => {
                write!(f, "invalid geometry: expected WxH, Wx or xH")
            }
            GeometryError::DimensionOverflow => write!(f, "geometry dimension out of range"),
            GeometryError::UnresolvableGeometry => {
                write!(f, "cannot resolve geometry: source size unknown")
            }
            GeometryError::ZeroDimension => {
                write!(f, "geometry resolves to a zero-sized frame")
            }
            GeometryError::InvalidPadColor => {
                write!(f, "invalid pad color: expected a color name or hex value")
            }
        }
    }
}

impl core::error::Error for GeometryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_mentions_cause() {
        assert!(
            GeometryError::UnresolvableGeometry
                .to_string()
                .contains("source size")
        );
        assert!(GeometryError::InvalidGeometry.to_string().contains("WxH"));
    }
}
