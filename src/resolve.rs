//! Geometry resolution: output dimensions and filter fragments.
//!
//! Combines a [`GeometrySpec`] with source [`MediaMetadata`] into concrete
//! output dimensions. Pure computation: no I/O, no logging.
//!
//! All dimensions derived from the aspect ratio truncate toward zero. Every
//! output dimension is then floored to an even number, which chroma-subsampled
//! encoders require.
//!
//! # Example
//!
//! ```
//! use transcode_geometry::{GeometrySpec, MediaMetadata, Resolver};
//!
//! let spec: GeometrySpec = "640x480<".parse().unwrap();
//! let out = Resolver::new()
//!     .resolve(&spec, &MediaMetadata::new(320, 240))
//!     .unwrap()
//!     .expect("source is narrower, so it is enlarged");
//! assert_eq!((out.width, out.height), (640, 480));
//!
//! // Already wide enough: nothing to do.
//! let out = Resolver::new()
//!     .resolve(&spec, &MediaMetadata::new(1280, 720))
//!     .unwrap();
//! assert!(out.is_none());
//! ```

use alloc::string::String;

use crate::color::PadColor;
use crate::error::GeometryError;
use crate::filter::FilterFragment;
use crate::geometry::{GeometrySpec, ResizeMode};
use crate::media::{AspectRatio, MediaMetadata, Size};
use crate::rotation::RotationCompensation;

/// Output of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedGeometry {
    /// Output width (even).
    pub width: u32,
    /// Output height (even).
    pub height: u32,
    /// Scale+pad or scale+crop step. Only set for pad geometries.
    pub filter: Option<FilterFragment>,
}

impl ResolvedGeometry {
    fn sized(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            filter: None,
        }
    }

    /// Output dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The filter fragment in encoder syntax.
    pub fn filter_fragment(&self) -> Option<String> {
        use alloc::string::ToString;
        self.filter.as_ref().map(ToString::to_string)
    }
}

/// Resolution settings.
///
/// # Example
///
/// ```
/// use transcode_geometry::{GeometrySpec, MediaMetadata, PadColor, Resolver};
///
/// let out = Resolver::new()
///     .pad_color(PadColor::parse("white").unwrap())
///     .resolve(&"400x300#".parse().unwrap(), &MediaMetadata::new(1000, 500))
///     .unwrap()
///     .unwrap();
///
/// assert_eq!((out.width, out.height), (400, 300));
/// assert_eq!(
///     out.filter_fragment().as_deref(),
///     Some("scale=400:-1,pad=400:300:0:50:white")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolver {
    /// Size rotated sources as they appear on playback.
    pub auto_rotate: bool,
    /// Which rotation tags trigger compensation.
    pub compensation: RotationCompensation,
    /// Pad color for pad geometries.
    pub pad_color: PadColor,
}

impl Resolver {
    /// Defaults: no rotation compensation, black padding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable rotation compensation.
    pub fn auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.auto_rotate = auto_rotate;
        self
    }

    /// Choose which rotation tags are compensated.
    pub fn compensation(mut self, compensation: RotationCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Set the pad color.
    pub fn pad_color(mut self, color: PadColor) -> Self {
        self.pad_color = color;
        self
    }

    /// Resolve `spec` against `meta`.
    ///
    /// Returns `Ok(None)` when an enlarge-only or shrink-only geometry
    /// leaves the source untouched. The caller should then omit the output
    /// size entirely.
    pub fn resolve(
        &self,
        spec: &GeometrySpec,
        meta: &MediaMetadata,
    ) -> Result<Option<ResolvedGeometry>, GeometryError> {
        let source = meta
            .size
            .filter(|s| !s.is_empty())
            .ok_or(GeometryError::UnresolvableGeometry)?;
        let aspect = meta
            .effective_aspect()
            .ok_or(GeometryError::UnresolvableGeometry)?;
        let (source, aspect) = self.oriented(source, aspect, meta.rotation);

        if spec.mode == ResizeMode::ForceAspect {
            return stretch(spec.width, spec.height).map(Some);
        }

        // Single-axis geometries derive the other axis from aspect ratio,
        // whatever the modifier.
        let resolved = match (spec.width, spec.height) {
            (None, Some(h)) => Some(ResolvedGeometry::sized(by_height(h, aspect))),
            (Some(w), None) => Some(ResolvedGeometry::sized(by_width(w, aspect))),
            (Some(tw), Some(th)) => match spec.mode {
                ResizeMode::EnlargeOnly => {
                    enlarge_only(source, tw, aspect).map(ResolvedGeometry::sized)
                }
                ResizeMode::ShrinkOnly => {
                    shrink_only(source, tw, th, aspect).map(ResolvedGeometry::sized)
                }
                ResizeMode::Pad => Some(self.pad(tw, th, aspect)),
                ResizeMode::None | ResizeMode::ForceAspect => {
                    Some(ResolvedGeometry::sized(fit(source, tw, th, aspect)))
                }
            },
            (None, None) => return Err(GeometryError::InvalidGeometry),
        };

        // An axis that truncates and floors to 0 is not a frame the encoder
        // can produce.
        match resolved {
            Some(r) if r.size().is_empty() => Err(GeometryError::ZeroDimension),
            other => Ok(other),
        }
    }

    /// Source size and aspect as seen after rotation compensation.
    fn oriented(
        &self,
        source: Size,
        aspect: AspectRatio,
        rotation: Option<i32>,
    ) -> (Size, AspectRatio) {
        let swap = self.auto_rotate && rotation.is_some_and(|deg| self.compensation.applies(deg));
        if swap {
            (source.transposed(), aspect.inverse())
        } else {
            (source, aspect)
        }
    }

    /// Width-driven scale, then pad to the target height when the scaled
    /// frame is shorter, else crop.
    fn pad(&self, tw: u32, th: u32, aspect: AspectRatio) -> ResolvedGeometry {
        let scaled = by_width(tw, aspect);
        let canvas_h = even(th);
        let pad_y = (canvas_h as i64 - scaled.height as i64) / 2;

        if pad_y > 0 {
            ResolvedGeometry {
                width: scaled.width,
                height: canvas_h,
                filter: Some(FilterFragment::Pad {
                    width: scaled.width,
                    height: canvas_h,
                    y: pad_y as u32,
                    color: self.pad_color.clone(),
                }),
            }
        } else {
            ResolvedGeometry {
                width: scaled.width,
                height: scaled.height,
                filter: Some(FilterFragment::Crop {
                    width: scaled.width,
                    height: scaled.height,
                }),
            }
        }
    }
}

/// Resolve with default rotation policy.
///
/// Shorthand for `Resolver::new().auto_rotate(..).pad_color(..).resolve(..)`.
pub fn resolve(
    spec: &GeometrySpec,
    meta: &MediaMetadata,
    auto_rotate: bool,
    pad_color: PadColor,
) -> Result<Option<ResolvedGeometry>, GeometryError> {
    Resolver::new()
        .auto_rotate(auto_rotate)
        .pad_color(pad_color)
        .resolve(spec, meta)
}

// ============================================================================
// Internal geometry
// ============================================================================

/// Floor to the nearest multiple of 2.
const fn even(v: u32) -> u32 {
    v - (v % 2)
}

/// Width fixed, height from aspect ratio.
fn by_width(width: u32, aspect: AspectRatio) -> Size {
    Size::new(even(width), even(aspect.height_for(width)))
}

/// Height fixed, width from aspect ratio.
fn by_height(height: u32, aspect: AspectRatio) -> Size {
    Size::new(even(aspect.width_for(height)), even(height))
}

/// Exact target dimensions, aspect ignored.
fn stretch(width: Option<u32>, height: Option<u32>) -> Result<ResolvedGeometry, GeometryError> {
    let size = Size::new(even(width.unwrap_or(0)), even(height.unwrap_or(0)));
    if size.is_empty() {
        return Err(GeometryError::ZeroDimension);
    }
    Ok(ResolvedGeometry::sized(size))
}

/// Drive by whichever axis fits tighter: height when `th/sh < tw/sw`.
fn fit(source: Size, tw: u32, th: u32, aspect: AspectRatio) -> Size {
    if ratio_lt(th, source.height, tw, source.width) {
        by_height(th, aspect)
    } else {
        by_width(tw, aspect)
    }
}

/// Resize to target width only when the source is narrower.
fn enlarge_only(source: Size, tw: u32, aspect: AspectRatio) -> Option<Size> {
    (source.width < tw).then(|| by_width(tw, aspect))
}

/// Resize only when the source exceeds the target on some axis.
fn shrink_only(source: Size, tw: u32, th: u32, aspect: AspectRatio) -> Option<Size> {
    if source.width > tw {
        // The smaller scale factor binds: height when `th/sh < tw/sw`.
        if ratio_lt(th, source.height, tw, source.width) {
            Some(by_height(th, aspect))
        } else {
            Some(by_width(tw, aspect))
        }
    } else if source.height > th {
        Some(by_height(th, aspect))
    } else {
        None
    }
}

/// `a / b < c / d` by cross-multiplication. `b` and `d` are non-zero.
fn ratio_lt(a: u32, b: u32, c: u32, d: u32) -> bool {
    (a as u64) * (d as u64) < (c as u64) * (b as u64)
}
