//! Video filter fragments emitted for pad geometries.

use alloc::string::String;
use core::fmt;

use crate::color::PadColor;

/// A scale step followed by a pad or crop step.
///
/// Renders in encoder filter-graph syntax:
///
/// ```
/// use transcode_geometry::{FilterFragment, PadColor};
///
/// let pad = FilterFragment::Pad {
///     width: 300,
///     height: 400,
///     y: 50,
///     color: PadColor::black(),
/// };
/// assert_eq!(pad.to_string(), "scale=300:-1,pad=300:400:0:50:black");
///
/// let crop = FilterFragment::Crop { width: 300, height: 224 };
/// assert_eq!(crop.to_string(), "scale=300:-1,crop=300:224");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterFragment {
    /// Scale to `width` (height follows aspect), then pad to
    /// `width`×`height` with the image placed `y` pixels from the top.
    Pad {
        width: u32,
        height: u32,
        y: u32,
        color: PadColor,
    },
    /// Scale to `width` (height follows aspect), then crop to `width`×`height`.
    Crop { width: u32, height: u32 },
}

impl FilterFragment {
    /// Width of the scale step.
    pub fn scale_width(&self) -> u32 {
        match self {
            FilterFragment::Pad { width, .. } | FilterFragment::Crop { width, .. } => *width,
        }
    }

    /// Whether this fragment pads rather than crops.
    pub fn is_pad(&self) -> bool {
        matches!(self, FilterFragment::Pad { .. })
    }
}

impl fmt::Display for FilterFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterFragment::Pad {
                width,
                height,
                y,
                color,
            } => write!(f, "scale={width}:-1,pad={width}:{height}:0:{y}:{color}"),
            FilterFragment::Crop { width, height } => {
                write!(f, "scale={width}:-1,crop={width}:{height}")
            }
        }
    }
}

/// Prepend `fragment` to an existing filter chain, so caller-supplied
/// filters run after it.
pub fn merge_filters(fragment: &FilterFragment, existing: Option<&str>) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    // Writing to a String never fails.
    let _ = write!(out, "{fragment}");
    if let Some(rest) = existing.map(str::trim).filter(|s| !s.is_empty()) {
        out.push(',');
        out.push_str(rest);
    }
    out
}
